//! epd-icons - convert SVG icons into 1-bit bitmap headers for e-paper firmware.

#![allow(dead_code)]

mod batch;
mod bitmap;
mod cli;
mod config;
mod emit;
mod logger;
mod raster;
mod symbol;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::IconsConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = IconsConfig::load(&cli)?;
    debug!("config"; "svg_dir={} output_dir={}", config.svg_dir.display(), config.output_dir.display());

    logger::banner("epd-icons: converting icons");
    // Partial failures are reported in the log; the exit status stays zero
    batch::run(&config)?;
    logger::banner_end("epd-icons: done");

    Ok(())
}
