use itertools::Itertools;
use log::debug;
use sdram_init_core::PhySettings;
use sdram_init_core::render::SequenceRenderer;
use sdram_init_core::sequence::{Command, InitSequence, command_symbols, control_symbols};
use std::fmt::{self, Display, Formatter};

/// Renders the Rust firmware module.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustModule;

impl SequenceRenderer for RustModule {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn file_name(&self) -> &'static str {
        "sdram_phy.rs"
    }

    fn render(&self, phy: &PhySettings, sequence: &InitSequence) -> String {
        debug!("Rendering Rust module for {} steps", sequence.len());
        Module { phy, sequence }.to_string()
    }
}

struct Module<'a> {
    phy: &'a PhySettings,
    sequence: &'a InitSequence,
}

const INDENT: &str = "    ";

impl Module<'_> {
    fn constants(&self, f: &mut Formatter) -> fmt::Result {
        for symbols in [control_symbols(), command_symbols()] {
            let width = symbols.iter().map(|(name, _)| name.len() + 1).max().unwrap_or(0);
            for (name, bits) in symbols {
                writeln!(f, "{INDENT}pub const {:<width$} u8 = {:#04x};", format!("{name}:"), bits)?;
            }
            writeln!(f)?;
        }
        write!(f, "{INDENT}pub const DFII_NPHASES: usize = {};\n\n", self.phy.nphases)
    }

    fn command_helpers(&self, f: &mut Formatter) -> fmt::Result {
        for n in 0..self.phy.nphases {
            writeln!(f, "{INDENT}pub unsafe fn command_p{n}(cmd: u8) {{")?;
            writeln!(f, "{INDENT}{INDENT}csr::dfii::pi{n}_command_write(cmd);")?;
            writeln!(f, "{INDENT}{INDENT}csr::dfii::pi{n}_command_issue_write(1);")?;
            write!(f, "{INDENT}}}\n\n")?;
        }
        let (rd, wr) = (self.phy.rdphase, self.phy.wrphase);
        writeln!(f, "{INDENT}pub unsafe fn dfii_pird_address_write(a: u16) {{ csr::dfii::pi{rd}_address_write(a) }}")?;
        write!(f, "{INDENT}pub unsafe fn dfii_piwr_address_write(a: u16) {{ csr::dfii::pi{wr}_address_write(a) }}\n\n")?;
        writeln!(f, "{INDENT}pub unsafe fn dfii_pird_baddress_write(a: u8) {{ csr::dfii::pi{rd}_baddress_write(a) }}")?;
        write!(f, "{INDENT}pub unsafe fn dfii_piwr_baddress_write(a: u8) {{ csr::dfii::pi{wr}_baddress_write(a) }}\n\n")?;
        writeln!(f, "{INDENT}pub unsafe fn command_prd(cmd: u8) {{ command_p{rd}(cmd) }}")?;
        write!(f, "{INDENT}pub unsafe fn command_pwr(cmd: u8) {{ command_p{wr}(cmd) }}\n\n")
    }

    fn data_addresses(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{INDENT}pub const DFII_PIX_DATA_SIZE: usize = csr::dfii::PI0_WRDATA_SIZE;\n\n")?;
        for dir in ["WR", "RD"] {
            writeln!(
                f,
                "{INDENT}pub const DFII_PIX_{dir}DATA_ADDR: [*mut u32; {}] = [",
                self.phy.nphases
            )?;
            for n in 0..self.phy.nphases {
                writeln!(f, "{INDENT}{INDENT}csr::dfii::PI{n}_{dir}DATA_ADDR,")?;
            }
            write!(f, "{INDENT}];\n\n")?;
        }
        Ok(())
    }

    fn initialize(&self, f: &mut Formatter) -> fmt::Result {
        if let Some(mr1) = self.sequence.mr1() {
            write!(f, "{INDENT}pub const DDRX_MR1: u16 = {mr1:#x};\n\n")?;
        }
        let body = self
            .sequence
            .steps()
            .iter()
            .map(|step| {
                let mut lines = vec![
                    format!("/* {} */", step.label),
                    format!("csr::dfii::pi0_address_write({:#x});", step.address),
                    format!("csr::dfii::pi0_baddress_write({});", step.bank_address),
                    match step.command {
                        Command::Control(_) => format!("csr::dfii::control_write({});", step.command),
                        Command::Issue(_) => format!("command_p0({});", step.command),
                    },
                ];
                if step.delay > 0 {
                    lines.push(format!("spin_cycles({});", step.delay));
                }
                lines
                    .iter()
                    .map(|line| format!("{INDENT}{INDENT}{line}\n"))
                    .collect::<String>()
            })
            .join("\n");
        writeln!(f, "{INDENT}pub unsafe fn initialize() {{")?;
        f.write_str(&body)?;
        writeln!(f, "{INDENT}}}")
    }
}

impl Display for Module<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str("// Include this file as:\n")?;
        f.write_str("//     include!(concat!(env!(\"BUILDINC_DIRECTORY\"), \"/generated/sdram_phy.rs\"));\n")?;
        f.write_str("#[allow(dead_code)]\npub mod sdram_phy {\n")?;
        writeln!(f, "{INDENT}use csr;\n")?;
        writeln!(f, "{INDENT}pub fn spin_cycles(mut cycles: usize) {{")?;
        writeln!(f, "{INDENT}{INDENT}while cycles > 0 {{")?;
        writeln!(f, "{INDENT}{INDENT}{INDENT}core::hint::spin_loop();")?;
        writeln!(f, "{INDENT}{INDENT}{INDENT}cycles -= 1;")?;
        writeln!(f, "{INDENT}{INDENT}}}")?;
        write!(f, "{INDENT}}}\n\n")?;
        self.constants(f)?;
        self.command_helpers(f)?;
        self.data_addresses(f)?;
        self.initialize(f)?;
        f.write_str("}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdram_init_core::{MemoryType, TimingSettings, build_init_sequence};

    fn render(phy: &PhySettings) -> String {
        let sequence = build_init_sequence(phy, &TimingSettings::new(2)).unwrap();
        RustModule.render(phy, &sequence)
    }

    #[test]
    fn test_ddr3_module() {
        let phy = PhySettings::new(MemoryType::Ddr3, 7, 4, 1, 2).with_cwl(6);
        let module = render(&phy);
        assert!(module.contains("    pub const DFII_CONTROL_SEL:     u8 = 0x01;\n"));
        assert!(module.contains("    pub const DFII_CONTROL_RESET_N: u8 = 0x08;\n"));
        assert!(module.contains("    pub const DFII_COMMAND_CS:     u8 = 0x01;\n"));
        assert!(module.contains("    pub const DFII_COMMAND_RDDATA: u8 = 0x20;\n"));
        assert!(module.contains("    pub const DFII_NPHASES: usize = 4;\n"));
        assert!(module.contains("    pub unsafe fn command_p3(cmd: u8) {\n"));
        assert!(module.contains("    pub unsafe fn command_prd(cmd: u8) { command_p1(cmd) }\n"));
        assert!(module.contains("        csr::dfii::PI3_RDDATA_ADDR,\n    ];\n"));
        assert!(module.contains("    pub const DDRX_MR1: u16 = 0x6;\n"));
        assert!(module.contains(
            "        /* Load Mode Register 0, CL=7, BL=8 */\n\
             \x20       csr::dfii::pi0_address_write(0x930);\n\
             \x20       csr::dfii::pi0_baddress_write(0);\n\
             \x20       command_p0(DFII_COMMAND_RAS|DFII_COMMAND_CAS|DFII_COMMAND_WE|DFII_COMMAND_CS);\n\
             \x20       spin_cycles(200);\n"
        ));
        assert!(module.ends_with("        spin_cycles(200);\n    }\n}\n"));
    }

    #[test]
    fn test_control_steps() {
        let phy = PhySettings::new(MemoryType::Ddr, 3, 2, 0, 1);
        let module = render(&phy);
        assert!(module.contains("        csr::dfii::control_write(DFII_CONTROL_CKE|DFII_CONTROL_ODT|DFII_CONTROL_RESET_N);\n"));
        assert!(!module.contains("DDRX_MR1"));
        assert_eq!(module.matches("spin_cycles(").count(), 1 + 5);
    }
}
