use itertools::Itertools;
use log::debug;
use sdram_init_core::PhySettings;
use sdram_init_core::render::SequenceRenderer;
use sdram_init_core::sequence::{Command, InitSequence};
use std::fmt::{self, Display, Formatter};

/// Renders the C header.
#[derive(Debug, Clone, Copy, Default)]
pub struct CHeader;

impl SequenceRenderer for CHeader {
    fn name(&self) -> &'static str {
        "c"
    }

    fn file_name(&self) -> &'static str {
        "sdram_phy.h"
    }

    fn render(&self, phy: &PhySettings, sequence: &InitSequence) -> String {
        debug!("Rendering C header for {} steps", sequence.len());
        Header { phy, sequence }.to_string()
    }
}

struct Header<'a> {
    phy: &'a PhySettings,
    sequence: &'a InitSequence,
}

impl Header<'_> {
    fn preamble(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str("#ifndef __GENERATED_SDRAM_PHY_H\n#define __GENERATED_SDRAM_PHY_H\n")?;
        f.write_str("#include <hw/common.h>\n#include <generated/csr.h>\n#include <hw/flags.h>\n\n")?;
        write!(f, "#define DFII_NPHASES {}\n\n", self.phy.nphases)?;
        f.write_str("static void cdelay(int i);\n")
    }

    fn command_helpers(&self, f: &mut Formatter) -> fmt::Result {
        for n in 0..self.phy.nphases {
            write!(
                f,
                "\n__attribute__((unused)) static void command_p{n}(int cmd)\n{{\n    \
                 sdram_dfii_pi{n}_command_write(cmd);\n    \
                 sdram_dfii_pi{n}_command_issue_write(1);\n}}"
            )?;
        }
        f.write_str("\n\n")?;
        let (rd, wr) = (self.phy.rdphase, self.phy.wrphase);
        writeln!(f)?;
        writeln!(f, "#define sdram_dfii_pird_address_write(X) sdram_dfii_pi{rd}_address_write(X)")?;
        writeln!(f, "#define sdram_dfii_piwr_address_write(X) sdram_dfii_pi{wr}_address_write(X)")?;
        writeln!(f, "#define sdram_dfii_pird_baddress_write(X) sdram_dfii_pi{rd}_baddress_write(X)")?;
        writeln!(f, "#define sdram_dfii_piwr_baddress_write(X) sdram_dfii_pi{wr}_baddress_write(X)")?;
        writeln!(f, "#define command_prd(X) command_p{rd}(X)")?;
        writeln!(f, "#define command_pwr(X) command_p{wr}(X)")?;
        writeln!(f)
    }

    fn data_addresses(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str("#define DFII_PIX_DATA_SIZE CSR_SDRAM_DFII_PI0_WRDATA_SIZE\n")?;
        for dir in ["WR", "RD"] {
            let entries = (0..self.phy.nphases)
                .map(|n| format!("CSR_SDRAM_DFII_PI{n}_{dir}DATA_ADDR"))
                .join(",\n\t");
            write!(
                f,
                "\nconst unsigned long sdram_dfii_pix_{}data_addr[{}] = {{\n    {}\n}};\n",
                dir.to_lowercase(),
                self.phy.nphases,
                entries
            )?;
        }
        writeln!(f)
    }

    fn init_sequence(&self, f: &mut Formatter) -> fmt::Result {
        if let Some(mr1) = self.sequence.mr1() {
            // reprogrammed during write leveling
            write!(f, "#define DDRX_MR1 {mr1}\n\n")?;
        }
        f.write_str("static void init_sequence(void)\n{\n")?;
        for step in self.sequence {
            writeln!(f, "\t/* {} */", step.label)?;
            writeln!(f, "\tsdram_dfii_pi0_address_write({:#x});", step.address)?;
            writeln!(f, "\tsdram_dfii_pi0_baddress_write({});", step.bank_address)?;
            match step.command {
                Command::Control(_) => writeln!(f, "\tsdram_dfii_control_write({});", step.command)?,
                Command::Issue(_) => writeln!(f, "\tcommand_p0({});", step.command)?,
            }
            if step.delay > 0 {
                writeln!(f, "\tcdelay({});", step.delay)?;
            }
            writeln!(f)?;
        }
        f.write_str("}\n")
    }
}

impl Display for Header<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.preamble(f)?;
        self.command_helpers(f)?;
        self.data_addresses(f)?;
        self.init_sequence(f)?;
        f.write_str("#endif\n")
    }
}
