//! DDR2 mode and extended mode registers.
//!
//! ```text
//! MR:   11..9 WR-1 | 8 DLL reset | 6..4 CL | 3 type | 2..0 log2(BL)
//! EMR:  9..7 OCD program | others left at zero
//! ```

use super::{DLL_RESET, LookupTable, ModeRegisterValue};
use super::legacy::BURST_LENGTH;
use crate::error::Result;
use crate::settings::{MemoryType, PhySettings};

/// CAS latency.
pub const CAS_LATENCY: LookupTable<u32> =
    LookupTable::new("cl", &[(4, 0b100), (5, 0b101), (6, 0b110), (7, 0b111)]);

/// Write recovery in clock cycles.
pub const WRITE_RECOVERY: LookupTable<u32> = LookupTable::new(
    "wr",
    &[
        (2, 0b001),
        (3, 0b010),
        (4, 0b011),
        (5, 0b100),
        (6, 0b101),
        (7, 0b110),
        (8, 0b111),
    ],
);

/// Write recovery the generator programs.
pub const DEFAULT_WRITE_RECOVERY: u32 = 3;

/// Burst length the controller runs the device with.
pub const DEFAULT_BURST_LENGTH: u32 = 4;

/// OCD calibration default (program field all ones).
pub const OCD_DEFAULT: u16 = 0b111 << 7;

/// Logical content of the mode register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mr {
    /// Burst length
    pub burst_length: u32,
    /// CAS latency
    pub cas_latency: u32,
    /// Write recovery in clock cycles
    pub write_recovery: u32,
    /// DLL reset request
    pub dll_reset: bool,
}

impl Mr {
    /// Packs the register.
    pub fn encode(&self) -> Result<ModeRegisterValue> {
        let memtype = MemoryType::Ddr2;
        let bl = BURST_LENGTH.encode(memtype, self.burst_length)?;
        let cl = CAS_LATENCY.encode(memtype, self.cas_latency)?;
        let wr = WRITE_RECOVERY.encode(memtype, self.write_recovery)?;
        let mut mr = bl | (cl << 4) | (wr << 9);
        if self.dll_reset {
            mr |= DLL_RESET;
        }
        Ok(ModeRegisterValue::new(mr))
    }

    /// Unpacks a register value.
    pub fn decode(value: ModeRegisterValue) -> Option<Self> {
        Some(Mr {
            burst_length: BURST_LENGTH.key(value.field(0, 3))?,
            cas_latency: CAS_LATENCY.key(value.field(4, 3))?,
            write_recovery: WRITE_RECOVERY.key(value.field(9, 3))?,
            dll_reset: value.bit(8),
        })
    }
}

/// Extended mode register (EMR1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Emr {
    /// Enter OCD calibration default
    pub ocd_default: bool,
}

impl Emr {
    /// Packs the register.
    pub fn encode(&self) -> ModeRegisterValue {
        ModeRegisterValue::new(if self.ocd_default { OCD_DEFAULT } else { 0 })
    }

    /// Unpacks a register value.
    pub fn decode(value: ModeRegisterValue) -> Self {
        Emr {
            ocd_default: value.field(7, 3) == 0b111,
        }
    }
}

/// Register values loaded during DDR2 initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRegisters {
    /// Mode register without DLL reset
    pub mr: ModeRegisterValue,
    /// EMR1
    pub emr: ModeRegisterValue,
    /// EMR2 (reserved)
    pub emr2: ModeRegisterValue,
    /// EMR3 (reserved)
    pub emr3: ModeRegisterValue,
}

impl ModeRegisters {
    /// Encodes the registers for `phy`.
    pub fn new(phy: &PhySettings) -> Result<Self> {
        let mr = Mr {
            burst_length: DEFAULT_BURST_LENGTH,
            cas_latency: phy.cl,
            write_recovery: DEFAULT_WRITE_RECOVERY,
            dll_reset: false,
        };
        Ok(ModeRegisters {
            mr: mr.encode()?,
            emr: Emr::default().encode(),
            emr2: ModeRegisterValue::ZERO,
            emr3: ModeRegisterValue::ZERO,
        })
    }

    /// Mode register with the DLL reset bit set.
    pub fn mr_dll_reset(&self) -> ModeRegisterValue {
        ModeRegisterValue::new(self.mr.value() | DLL_RESET)
    }

    /// EMR1 entering OCD calibration default.
    pub fn emr_ocd_default(&self) -> ModeRegisterValue {
        ModeRegisterValue::new(self.emr.value() | OCD_DEFAULT)
    }
}
