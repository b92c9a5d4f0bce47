//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use imgspider_core::DEFAULT_WORKERS;

/// Harvest a bounded number of images for a search term.
///
/// Imgspider renders the infinite-scroll search listing in a headless
/// browser, collects image references, and downloads them concurrently into
/// `{save-dir}/{key-word}/` as `0.jpg`, `1.png`, ... up to the quota.
#[derive(Parser, Debug)]
#[command(name = "imgspider")]
#[command(author, version, about)]
pub struct Args {
    /// Key word of the images to harvest
    #[arg(short = 'k', long)]
    pub key_word: String,

    /// Number of images to save (quota)
    #[arg(short = 'n', long, default_value_t = 300, value_parser = clap::value_parser!(u32).range(1..))]
    pub number: u32,

    /// Directory for storing images (a per-key-word subdirectory is created)
    #[arg(short = 'd', long, default_value = ".")]
    pub save_dir: PathBuf,

    /// Concurrent download workers (1-32)
    #[arg(short = 'c', long, default_value_t = DEFAULT_WORKERS as u8, value_parser = clap::value_parser!(u8).range(1..=32))]
    pub workers: u8,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
