use bitflags::bitflags;
use itertools::Itertools;
use serde::{Serialize, Serializer};
use std::fmt::{self, Display, Formatter};

bitflags! {
    /// DFI injector control lines (`sdram_dfii_control`).
    ///
    /// Declaration order is the order used in rendered expressions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlFlags: u8 {
        /// Software control of the DFI bus
        const SEL = 0x01;
        /// Clock enable
        const CKE = 0x02;
        /// On-die termination
        const ODT = 0x04;
        /// Active-low reset, released
        const RESET_N = 0x08;
    }
}

bitflags! {
    /// DFI injector command lines (`sdram_dfii_piN_command`).
    ///
    /// Declaration order is the order used in rendered expressions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CommandFlags: u8 {
        /// Row address strobe
        const RAS = 0x08;
        /// Column address strobe
        const CAS = 0x04;
        /// Write enable
        const WE = 0x02;
        /// Chip select
        const CS = 0x01;
        /// Write data phase
        const WRDATA = 0x10;
        /// Read data phase
        const RDDATA = 0x20;
    }
}

/// Symbol prefix of the control flags.
pub const CONTROL_PREFIX: &str = "DFII_CONTROL_";
/// Symbol prefix of the command flags.
pub const COMMAND_PREFIX: &str = "DFII_COMMAND_";

/// Signal assertion of one init step.
///
/// A control step writes the injector control register directly; a command
/// step is issued as a DFI command on phase 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Control register write
    Control(ControlFlags),
    /// DFI command issue
    Issue(CommandFlags),
}

impl Command {
    /// Release reset, keep CKE low.
    pub const UNRESET: Command = Command::Control(ControlFlags::ODT.union(ControlFlags::RESET_N));
    /// Bring CKE high.
    pub const CKE: Command = Command::Control(
        ControlFlags::CKE
            .union(ControlFlags::ODT)
            .union(ControlFlags::RESET_N),
    );
    /// Precharge all banks (with A10 high).
    pub const PRECHARGE_ALL: Command = Command::Issue(
        CommandFlags::RAS
            .union(CommandFlags::WE)
            .union(CommandFlags::CS),
    );
    /// Load mode register.
    pub const MODE_REGISTER: Command = Command::Issue(
        CommandFlags::RAS
            .union(CommandFlags::CAS)
            .union(CommandFlags::WE)
            .union(CommandFlags::CS),
    );
    /// Auto refresh.
    pub const AUTO_REFRESH: Command = Command::Issue(
        CommandFlags::RAS
            .union(CommandFlags::CAS)
            .union(CommandFlags::CS),
    );
    /// ZQ calibration long (with A10 high).
    pub const ZQ_CALIBRATION: Command = Command::Issue(CommandFlags::WE.union(CommandFlags::CS));

    /// Whether the step writes the control register instead of issuing a command.
    pub fn is_control(&self) -> bool {
        matches!(self, Command::Control(_))
    }

    /// Raw register value.
    pub fn bits(&self) -> u8 {
        match self {
            Command::Control(flags) => flags.bits(),
            Command::Issue(flags) => flags.bits(),
        }
    }

    /// Symbol names of the asserted lines, e.g. `["DFII_CONTROL_ODT", "DFII_CONTROL_RESET_N"]`.
    pub fn symbols(&self) -> Vec<String> {
        match self {
            Command::Control(flags) => flags
                .iter_names()
                .map(|(name, _)| format!("{CONTROL_PREFIX}{name}"))
                .collect(),
            Command::Issue(flags) => flags
                .iter_names()
                .map(|(name, _)| format!("{COMMAND_PREFIX}{name}"))
                .collect(),
        }
    }

    /// Bitwise-OR expression of [`symbols()`](Command::symbols).
    pub fn expression(&self) -> String {
        self.symbols().iter().join("|")
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.expression())
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.expression())
    }
}

/// Named flag constants sorted by value, e.g. `("DFII_CONTROL_SEL", 0x01)`.
pub fn control_symbols() -> Vec<(String, u8)> {
    ControlFlags::all()
        .iter_names()
        .map(|(name, flag)| (format!("{CONTROL_PREFIX}{name}"), flag.bits()))
        .sorted_by_key(|&(_, bits)| bits)
        .collect()
}

/// Named flag constants sorted by value, e.g. `("DFII_COMMAND_CS", 0x01)`.
pub fn command_symbols() -> Vec<(String, u8)> {
    CommandFlags::all()
        .iter_names()
        .map(|(name, flag)| (format!("{COMMAND_PREFIX}{name}"), flag.bits()))
        .sorted_by_key(|&(_, bits)| bits)
        .collect()
}
