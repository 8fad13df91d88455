//! CLI entry point for the puzzle board generator

use clap::Parser;
use unlockgen::io::cli::{BoardProcessor, Cli};

fn main() -> unlockgen::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let mut processor = BoardProcessor::new(cli);
    processor.process()
}
