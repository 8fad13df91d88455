//! Command-line interface for batch board generation and re-analysis

use crate::algorithm::executor::{BoardGenerator, GeneratedBoard};
use crate::analysis::reanalysis::reanalyze;
use crate::io::configuration::{
    ANALYSIS_SUFFIX, DEFAULT_ATTEMPTS, DEFAULT_BOARD_COUNT, DEFAULT_SEED, GeneratorConfig,
    OUTPUT_PREFIX, PathPattern,
};
use crate::io::document::{load_board, load_config, write_board, write_json};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::export_board_as_png;
use crate::io::progress::ProgressManager;
use clap::Parser;
use log::{LevelFilter, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "unlockgen")]
#[command(
    author,
    version,
    about = "Generate balanced merge-and-unlock puzzle boards"
)]
/// Command-line arguments for the board generator
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// JSON generator configuration
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seed of the first board (defaults to the configured seed, then 42)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Number of boards to generate, one per consecutive seed
    #[arg(short = 'n', long, default_value_t = DEFAULT_BOARD_COUNT)]
    pub count: usize,

    /// Number of unlock paths (overrides the configuration)
    #[arg(short, long)]
    pub paths: Option<usize>,

    /// Path shape strategy (overrides the configuration)
    #[arg(long, value_enum)]
    pub pattern: Option<PathPattern>,

    /// Rock cells opened up as free tiles (overrides the configuration)
    #[arg(long)]
    pub free_tiles: Option<usize>,

    /// Output directory for board documents
    #[arg(short, long, default_value = "boards")]
    pub output: PathBuf,

    /// Also write a PNG preview next to each board
    #[arg(long)]
    pub preview: bool,

    /// Draws per board before it is given up
    #[arg(short, long, default_value_t = DEFAULT_ATTEMPTS)]
    pub attempts: usize,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Regenerate boards even if their output exists
    #[arg(long)]
    pub no_skip: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Re-analyse an edited board document instead of generating
    #[arg(short, long, value_name = "BOARD")]
    pub reanalyze: Option<PathBuf>,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level selected by the verbosity flags
    pub const fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Configuration file contents with command-line overrides applied
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded or the
    /// resulting configuration is invalid
    pub fn resolve_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GeneratorConfig::default(),
        };

        if let Some(paths) = self.paths {
            config.path_count = paths;
        }
        if let Some(pattern) = self.pattern {
            config.path_pattern = pattern;
        }
        if let Some(free_tiles) = self.free_tiles {
            config.free_tile_count = free_tiles;
        }

        config.validate()?;
        Ok(config)
    }

    /// Seed of the first board
    pub fn first_seed(&self, config: &GeneratorConfig) -> u64 {
        self.seed.or(config.seed).unwrap_or(DEFAULT_SEED)
    }
}

/// Orchestrates batch generation with progress tracking
pub struct BoardProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl BoardProcessor {
    /// Create a new board processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Run the requested generation or re-analysis
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a document cannot
    /// be read or written
    pub fn process(&mut self) -> Result<()> {
        let config = self.cli.resolve_config()?;

        if let Some(board_path) = self.cli.reanalyze.clone() {
            return Self::process_reanalysis(&board_path, &config);
        }

        if self.cli.attempts == 0 {
            return Err(invalid_parameter(
                "attempts",
                &self.cli.attempts,
                &"at least one attempt is required",
            ));
        }

        let first_seed = self.cli.first_seed(&config);
        let seeds: Vec<u64> = (0..self.cli.count as u64)
            .map(|offset| first_seed.wrapping_add(offset))
            .filter(|&seed| self.should_process_seed(seed))
            .collect();

        if seeds.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(seeds.len());
        }

        let mut discarded = 0;
        for seed in seeds {
            if self.process_seed(&config, seed)?.is_discarded() {
                discarded += 1;
            }
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }
        if discarded > 0 {
            warn!("{discarded} boards could not be connected and were written empty");
        }

        Ok(())
    }

    fn should_process_seed(&self, seed: u64) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = self.board_path(seed);
        if output_path.exists() {
            info!("Skipping seed {seed}: {} exists", output_path.display());
            false
        } else {
            true
        }
    }

    fn process_seed(&mut self, config: &GeneratorConfig, seed: u64) -> Result<GeneratedBoard> {
        let start_time = Instant::now();
        let output_path = self.board_path(seed);
        let name = format!("{OUTPUT_PREFIX}{seed}");

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_board(&name, self.cli.attempts);
        }

        let mut generator = BoardGenerator::new(config.clone(), seed)?;
        let mut board = GeneratedBoard::discarded();
        for attempt in 1..=self.cli.attempts {
            if let Some(ref mut pm) = self.progress_manager {
                pm.update_attempt(attempt);
            }

            board = generator.generate()?;
            if !board.is_discarded() {
                info!("{name}: accepted after {attempt} attempts");
                break;
            }
        }

        write_board(&board, &output_path)?;

        if self.cli.preview && !board.is_discarded() {
            export_board_as_png(&board.tiles, &output_path.with_extension("png"))?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_board(board.is_discarded(), start_time.elapsed());
        }

        Ok(board)
    }

    fn process_reanalysis(board_path: &Path, config: &GeneratorConfig) -> Result<()> {
        let board = load_board(board_path)?;
        let analysis = reanalyze(
            &board.tiles,
            config.milestones.clone(),
            config.max_paths_per_entry,
        )?;

        let output_path = Self::analysis_path(board_path);
        info!(
            "Writing analysis of {} to {}",
            board_path.display(),
            output_path.display()
        );
        write_json(&analysis, &output_path)
    }

    fn board_path(&self, seed: u64) -> PathBuf {
        self.cli.output.join(format!("{OUTPUT_PREFIX}{seed}.json"))
    }

    fn analysis_path(board_path: &Path) -> PathBuf {
        let stem = board_path.file_stem().unwrap_or_default();
        let analysis_name = format!("{}{ANALYSIS_SUFFIX}.json", stem.to_string_lossy());

        if let Some(parent) = board_path.parent() {
            parent.join(analysis_name)
        } else {
            PathBuf::from(analysis_name)
        }
    }
}
