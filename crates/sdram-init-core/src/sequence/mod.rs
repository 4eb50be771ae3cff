//! Init step model and the per-generation sequence builders.
//!
//! A [`Generation`] encodes the mode registers of one memory generation and
//! lays out the power-up protocol around them. [`build_init_sequence`] picks the
//! generation from [`PhySettings::memtype`] and returns the immutable
//! [`InitSequence`] every renderer consumes.

mod command;
mod generation;

pub use self::command::{
    COMMAND_PREFIX, CONTROL_PREFIX, Command, CommandFlags, ControlFlags, command_symbols,
    control_symbols,
};
pub use self::generation::{Ddr2, Ddr3, Ddr4, Generation, Legacy, build_init_sequence};

use crate::settings::MemoryType;
use serde::Serialize;

/// Address word of precharge-all and ZQ calibration (A10 high).
pub const A10: u16 = 0x0400;

/// One register-level step of the power-up protocol.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InitStep {
    /// Human readable description, for traceability only
    pub label: String,
    /// Raw address or packed mode-register value
    pub address: u16,
    /// Bank address, selects the mode register
    pub bank_address: u8,
    /// Asserted lines
    pub command: Command,
    /// Cycles to wait before the next step
    pub delay: u32,
}

impl InitStep {
    /// Creates a step.
    pub fn new(
        label: impl Into<String>,
        address: u16,
        bank_address: u8,
        command: Command,
        delay: u32,
    ) -> Self {
        InitStep {
            label: label.into(),
            address,
            bank_address,
            command,
            delay,
        }
    }

    /// Loads `value` into the mode register selected by `bank_address`.
    pub fn load_mode_register(
        label: impl Into<String>,
        value: impl Into<u16>,
        bank_address: u8,
        delay: u32,
    ) -> Self {
        InitStep::new(label, value.into(), bank_address, Command::MODE_REGISTER, delay)
    }

    /// Precharges all banks.
    pub fn precharge_all() -> Self {
        InitStep::new("Precharge All", A10, 0, Command::PRECHARGE_ALL, 0)
    }

    /// Issues one auto refresh.
    pub fn auto_refresh() -> Self {
        InitStep::new("Auto Refresh", 0, 0, Command::AUTO_REFRESH, 4)
    }

    /// Raises CKE and waits `delay` cycles.
    pub fn bring_cke_high(delay: u32) -> Self {
        InitStep::new("Bring CKE high", 0, 0, Command::CKE, delay)
    }

    /// Releases reset with CKE still low.
    pub fn release_reset(delay: u32) -> Self {
        InitStep::new("Release reset", 0, 0, Command::UNRESET, delay)
    }

    /// Starts long ZQ calibration.
    pub fn zq_calibration() -> Self {
        InitStep::new("ZQ Calibration", A10, 0, Command::ZQ_CALIBRATION, 200)
    }
}

/// Ordered power-up protocol of one memory configuration.
///
/// The step order is the protocol. It is fixed when the sequence is built and
/// renderers only read it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InitSequence {
    memtype: MemoryType,
    steps: Vec<InitStep>,
    mr1: Option<u16>,
}

impl InitSequence {
    pub(crate) fn new(memtype: MemoryType, steps: Vec<InitStep>, mr1: Option<u16>) -> Self {
        InitSequence {
            memtype,
            steps,
            mr1,
        }
    }

    /// Generation the sequence was built for.
    pub fn memtype(&self) -> MemoryType {
        self.memtype
    }

    /// Steps in issue order.
    pub fn steps(&self) -> &[InitStep] {
        &self.steps
    }

    /// MR1 as loaded by the sequence; only DDR3 and DDR4 report it.
    pub fn mr1(&self) -> Option<u16> {
        self.mr1
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the sequence has no steps. Never true for a built sequence.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sum of all settle delays in cycles.
    pub fn total_delay(&self) -> u64 {
        self.steps.iter().map(|step| u64::from(step.delay)).sum()
    }
}

impl<'a> IntoIterator for &'a InitSequence {
    type Item = &'a InitStep;
    type IntoIter = std::slice::Iter<'a, InitStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
