/// Unified cost equalization across routes
pub mod balance;
/// Grid-sized bitset for visited and on-route cell tracking
pub mod bitset;
/// Biased random walks painting routes onto the grid
pub mod drawer;
/// Route enumeration, entry correction and targeted repair
pub mod enumeration;
/// Main pipeline executor and orchestration
pub mod executor;
/// Reachability checks and rock-to-bridge repair
pub mod repair;
/// Requirement assignment along path groups and entry flagging
pub mod requirements;
/// Grid synthesis from static layouts or procedural patterns
pub mod synthesis;
