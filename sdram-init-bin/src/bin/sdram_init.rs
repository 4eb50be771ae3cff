use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use log::info;
use sdram_init_bin::init_logging;
use sdram_init_bin::renderer::{OutputFormat, write_artifact};
use sdram_init_core::SdramConfig;
use serde::Serialize;

/// CLI arguments for the `sdram-init` binary.
///
/// Loads a board configuration, builds its init sequence and renders it in
/// each requested format.
#[derive(Debug, Parser, Serialize, Clone)]
struct CliArgs {
    /// The board configuration file.
    #[clap(long = "config", default_value = "config/ddr3.json")]
    config: PathBuf,
    /// Output formats to render (repeatable).
    #[clap(long = "format", value_enum, default_values_t = [OutputFormat::C])]
    formats: Vec<OutputFormat>,
    /// Write each artifact to its conventional file name in this directory
    /// instead of printing it.
    #[clap(long = "output-dir")]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();

    let args = CliArgs::parse();
    info!("CLI args: {:?}", args);

    let config = SdramConfig::from_jsonfile(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let sequence = config.init_sequence()?;

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)?;
    }
    let mut stdout = std::io::stdout().lock();
    for format in args.formats.iter().unique() {
        let renderer = format.renderer();
        match &args.output_dir {
            Some(dir) => {
                write_artifact(renderer.as_ref(), &config.phy, &sequence, dir)?;
            }
            None => stdout.write_all(renderer.render(&config.phy, &sequence).as_bytes())?,
        }
    }
    stdout.flush()?;
    Ok(())
}
