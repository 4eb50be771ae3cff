use itertools::Itertools;
use log::debug;
use sdram_init_core::PhySettings;
use sdram_init_core::render::SequenceRenderer;
use sdram_init_core::sequence::{InitSequence, command_symbols, control_symbols};
use std::fmt::{self, Display, Formatter};

/// Renders the host-side descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Descriptor;

impl SequenceRenderer for Descriptor {
    fn name(&self) -> &'static str {
        "descriptor"
    }

    fn file_name(&self) -> &'static str {
        "sdram_init.py"
    }

    fn render(&self, _phy: &PhySettings, sequence: &InitSequence) -> String {
        debug!("Rendering descriptor for {} steps", sequence.len());
        DescriptorFile { sequence }.to_string()
    }
}

struct DescriptorFile<'a> {
    sequence: &'a InitSequence,
}

/// Writes `name = 0x..` lines with the `=` signs aligned.
fn constants(f: &mut Formatter, symbols: &[(String, u8)]) -> fmt::Result {
    let width = symbols.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, bits) in symbols {
        writeln!(f, "{:<width$} = {:#04x}", name.to_lowercase(), bits)?;
    }
    writeln!(f)
}

impl Display for DescriptorFile<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        constants(f, &control_symbols())?;
        constants(f, &command_symbols())?;
        if let Some(mr1) = self.sequence.mr1() {
            write!(f, "ddrx_mr1 = {mr1:#x}\n\n")?;
        }
        f.write_str("init_sequence = [\n")?;
        for step in self.sequence {
            let command = step.command.symbols().iter().map(|s| s.to_lowercase()).join("|");
            writeln!(
                f,
                "    ({:?}, {}, {}, {}, {}),",
                step.label, step.address, step.bank_address, command, step.delay
            )?;
        }
        f.write_str("]\n")
    }
}
