//! Mode-register encoders.
//!
//! Each memory generation lays out its mode registers differently and accepts a
//! different set of latencies. The submodules hold one encoder/decoder per
//! register and the JEDEC lookup tables behind them:
//!
//! - [`legacy`]: SDR, DDR and LPDDR (one mode register, one zeroed extended register)
//! - [`ddr2`]: DDR2 (mode register with write recovery, three extended registers)
//! - [`ddr3`]: DDR3 (MR0 to MR3)
//! - [`ddr4`]: DDR4 (MR0 to MR6)
//!
//! Lookups on values outside a table fail with
//! [`Error::UnsupportedParameterValue`]; nothing is silently rounded.

pub mod ddr2;
pub mod ddr3;
pub mod ddr4;
pub mod legacy;

use crate::error::{Error, Result};
use crate::settings::{MemoryType, PhySettings, TimingSettings};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// DLL reset bit of MR0 (A8), shared by every generation.
pub const DLL_RESET: u16 = 1 << 8;

/// Write-leveling enable bit of DDR3/DDR4 MR1 (A7).
pub const WRITE_LEVELING: u16 = 1 << 7;

/// Bit pattern of one mode register, as driven on the address bus.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct ModeRegisterValue(u16);

impl ModeRegisterValue {
    /// All-zero (reserved) register.
    pub const ZERO: ModeRegisterValue = ModeRegisterValue(0);

    /// Wraps a raw register value.
    pub const fn new(value: u16) -> Self {
        ModeRegisterValue(value)
    }

    /// Raw register value.
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Extracts `width` bits starting at bit `shift`.
    pub const fn field(&self, shift: u32, width: u32) -> u16 {
        (self.0 >> shift) & ((1 << width) - 1)
    }

    /// Returns whether bit `n` is set.
    pub const fn bit(&self, n: u32) -> bool {
        self.field(n, 1) == 1
    }
}

impl From<ModeRegisterValue> for u16 {
    fn from(value: ModeRegisterValue) -> Self {
        value.0
    }
}

impl Display for ModeRegisterValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Maps legal device values to their register codes.
#[derive(Debug)]
pub struct LookupTable<K: 'static> {
    parameter: &'static str,
    entries: &'static [(K, u16)],
}

impl<K> LookupTable<K> {
    /// Creates a table for `parameter`.
    pub const fn new(parameter: &'static str, entries: &'static [(K, u16)]) -> Self {
        LookupTable { parameter, entries }
    }

    /// Name of the encoded parameter.
    pub fn parameter(&self) -> &'static str {
        self.parameter
    }

    /// `(value, code)` pairs in table order.
    pub fn entries(&self) -> &'static [(K, u16)] {
        self.entries
    }
}

impl<K: Copy + PartialEq> LookupTable<K> {
    /// Returns the legal values.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.iter().map(|&(key, _)| key)
    }

    /// Inverse lookup: the value encoded by `code`.
    pub fn key(&self, code: u16) -> Option<K> {
        self.entries
            .iter()
            .find(|&&(_, c)| c == code)
            .map(|&(key, _)| key)
    }
}

impl LookupTable<u32> {
    /// Returns the code of `value`.
    pub fn code(&self, value: u32) -> Option<u16> {
        self.entries
            .iter()
            .find(|&&(key, _)| key == value)
            .map(|&(_, code)| code)
    }

    /// Returns the code of `value` or [`Error::UnsupportedParameterValue`].
    pub fn encode(&self, memtype: MemoryType, value: u32) -> Result<u16> {
        self.code(value).ok_or(Error::UnsupportedParameterValue {
            memtype,
            parameter: self.parameter,
            value,
        })
    }
}

impl LookupTable<&'static str> {
    /// Returns the code of the symbolic value `name`.
    pub fn code_of_name(&self, name: &str) -> Option<u16> {
        self.entries
            .iter()
            .find(|&&(key, _)| key == name)
            .map(|&(_, code)| code)
    }
}

/// Burst length field of MR0, shared by DDR3 and DDR4 (BC4 on the fly is not used).
pub const DDRX_BURST_LENGTH: LookupTable<u32> = LookupTable::new("bl", &[(4, 0b10), (8, 0b00)]);

/// Write recovery cycles the generator programs for `phy` and `timing`.
///
/// `tWTR * nphases`, never less than `floor`. The result must still be a key of
/// the generation's write-recovery table.
///
/// # Errors
///
/// [`Error::UnsupportedParameterValue`] naming `tWTR` if the product does not
/// fit in 32 bits.
pub fn write_recovery(phy: &PhySettings, timing: &TimingSettings, floor: u32) -> Result<u32> {
    u32::try_from(phy.nphases)
        .ok()
        .and_then(|nphases| timing.t_wtr.checked_mul(nphases))
        .map(|wr| wr.max(floor))
        .ok_or(Error::UnsupportedParameterValue {
            memtype: phy.memtype,
            parameter: "tWTR",
            value: timing.t_wtr,
        })
}

/// Sets or clears the write-leveling bit of a DDR3/DDR4 MR1 value.
pub fn write_leveling_mr1(mr1: u16, enabled: bool) -> u16 {
    (mr1 & !WRITE_LEVELING) | ((enabled as u16) << 7)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: LookupTable<u32> = LookupTable::new("cl", &[(5, 0b0010), (12, 0b0001)]);

    #[test]
    fn test_lookup() {
        assert_eq!(TABLE.code(12), Some(0b0001));
        assert_eq!(TABLE.key(0b0010), Some(5));
        assert_eq!(TABLE.key(0b1111), None);
        assert_eq!(TABLE.keys().collect::<Vec<_>>(), vec![5, 12]);
        assert_eq!(
            TABLE.encode(MemoryType::Ddr3, 4),
            Err(Error::UnsupportedParameterValue {
                memtype: MemoryType::Ddr3,
                parameter: "cl",
                value: 4
            })
        );
    }

    #[test]
    fn test_field() {
        let mr = ModeRegisterValue::new(0x930);
        assert_eq!(mr.field(4, 3), 0b011);
        assert_eq!(mr.field(9, 3), 0b100);
        assert!(mr.bit(8));
        assert!(!mr.bit(2));
        assert_eq!(mr.to_string(), "0x0930");
    }

    #[test]
    fn test_write_recovery() {
        let phy = PhySettings::new(MemoryType::Ddr3, 8, 2, 0, 1);
        assert_eq!(write_recovery(&phy, &TimingSettings::new(2), 5), Ok(5));
        let phy = PhySettings::new(MemoryType::Ddr3, 8, 4, 0, 1);
        assert_eq!(write_recovery(&phy, &TimingSettings::new(2), 5), Ok(8));
        assert_eq!(write_recovery(&phy, &TimingSettings::new(2), 10), Ok(10));
    }

    #[test]
    fn test_write_recovery_overflow() {
        let phy = PhySettings::new(MemoryType::Ddr3, 8, 2, 0, 1);
        let expected = |t_wtr| {
            Err(Error::UnsupportedParameterValue {
                memtype: MemoryType::Ddr3,
                parameter: "tWTR",
                value: t_wtr,
            })
        };
        assert_eq!(write_recovery(&phy, &TimingSettings::new(u32::MAX), 5), expected(u32::MAX));
        // would wrap to 8 in 32 bits
        assert_eq!(
            write_recovery(&phy, &TimingSettings::new(0x8000_0004), 5),
            expected(0x8000_0004)
        );
    }

    #[test]
    fn test_write_leveling_mr1() {
        assert_eq!(write_leveling_mr1(0x6, true), 0x86);
        assert_eq!(write_leveling_mr1(0x86, false), 0x6);
        assert_eq!(write_leveling_mr1(0x86, true), 0x86);
    }
}
