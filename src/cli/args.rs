//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Convert SVG icons into 1-bit bitmap headers and an `icons.h` index
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory containing SVG files, scanned recursively (default: ./icons)
    #[arg(long = "svg-dir", value_hint = clap::ValueHint::DirPath)]
    pub svg_dir: Option<PathBuf>,

    /// Directory where generated headers are written (default: ./include/icons)
    #[arg(long = "output-dir", value_hint = clap::ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,

    /// Config file path (default: icons.toml, if present)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
