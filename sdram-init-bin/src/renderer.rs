//! Output formats selectable on the command line.
//!
//! To add a format, implement [`SequenceRenderer`] for it and add a variant to
//! [`OutputFormat`].

use sdram_init_core::PhySettings;
use sdram_init_core::render::SequenceRenderer;
use sdram_init_core::sequence::InitSequence;
use sdram_init_c::CHeader;
use sdram_init_descriptor::Descriptor;
use sdram_init_rust::RustModule;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Artifact kinds the binary can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Firmware C header
    C,
    /// Host-side descriptor
    Descriptor,
    /// Firmware Rust module
    Rust,
    /// Step list as JSON
    Json,
}

/// Dumps the sequence as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDump;

impl SequenceRenderer for JsonDump {
    fn name(&self) -> &'static str {
        "json"
    }

    fn file_name(&self) -> &'static str {
        "sdram_init.json"
    }

    fn render(&self, _phy: &PhySettings, sequence: &InitSequence) -> String {
        let mut json = serde_json::to_string_pretty(sequence).expect("InitSequence serializes");
        json.push('\n');
        json
    }
}

impl OutputFormat {
    /// Renderer producing this format.
    pub fn renderer(&self) -> Box<dyn SequenceRenderer> {
        match self {
            OutputFormat::C => Box::new(CHeader),
            OutputFormat::Descriptor => Box::new(Descriptor),
            OutputFormat::Rust => Box::new(RustModule),
            OutputFormat::Json => Box::new(JsonDump),
        }
    }
}

/// Renders `sequence` with `renderer` into `dir`, returning the written file name.
pub fn write_artifact(
    renderer: &dyn SequenceRenderer,
    phy: &PhySettings,
    sequence: &InitSequence,
    dir: &Path,
) -> anyhow::Result<String> {
    let path = dir.join(renderer.file_name());
    let mut writer = BufWriter::new(File::create(&path)?);
    writer.write_all(renderer.render(phy, sequence).as_bytes())?;
    writer.flush()?;
    info!("{} written to {}", renderer.name(), path.display());
    Ok(path.display().to_string())
}
