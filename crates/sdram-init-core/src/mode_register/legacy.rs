//! SDR, DDR and LPDDR mode register.
//!
//! ```text
//!  11..9  8         7   6..4  3     2..0
//!  -      DLL reset -   CL    type  log2(BL)
//! ```
//!
//! DDR and LPDDR also have an extended mode register, loaded as zero.

use super::{DLL_RESET, LookupTable, ModeRegisterValue};
use crate::error::Result;
use crate::settings::{MemoryType, PhySettings};

/// Burst length, encoded as its base-2 logarithm.
pub const BURST_LENGTH: LookupTable<u32> =
    LookupTable::new("bl", &[(1, 0b000), (2, 0b001), (4, 0b010), (8, 0b011)]);

/// SDR CAS latency.
pub const SDR_CAS_LATENCY: LookupTable<u32> = LookupTable::new("cl", &[(2, 0b010), (3, 0b011)]);
/// DDR CAS latency (CL 2.5 is not expressible in whole cycles).
pub const DDR_CAS_LATENCY: LookupTable<u32> = LookupTable::new("cl", &[(2, 0b010), (3, 0b011)]);
/// LPDDR CAS latency.
pub const LPDDR_CAS_LATENCY: LookupTable<u32> = LookupTable::new("cl", &[(2, 0b010), (3, 0b011)]);

/// Generations sharing the single mode-register layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyKind {
    /// SDR SDRAM
    Sdr,
    /// DDR SDRAM
    Ddr,
    /// LPDDR SDRAM
    Lpddr,
}

impl LegacyKind {
    /// The corresponding memory type.
    pub const fn memtype(&self) -> MemoryType {
        match self {
            LegacyKind::Sdr => MemoryType::Sdr,
            LegacyKind::Ddr => MemoryType::Ddr,
            LegacyKind::Lpddr => MemoryType::Lpddr,
        }
    }

    /// Burst length the controller runs the device with.
    pub const fn burst_length(&self) -> u32 {
        match self {
            LegacyKind::Sdr => 1,
            LegacyKind::Ddr | LegacyKind::Lpddr => 4,
        }
    }

    /// Bank address selecting the extended mode register, if there is one.
    pub const fn extended_bank(&self) -> Option<u8> {
        match self {
            LegacyKind::Sdr => None,
            LegacyKind::Ddr => Some(1),
            LegacyKind::Lpddr => Some(2),
        }
    }

    /// CAS latency table of the generation.
    pub const fn cas_latency(&self) -> &'static LookupTable<u32> {
        match self {
            LegacyKind::Sdr => &SDR_CAS_LATENCY,
            LegacyKind::Ddr => &DDR_CAS_LATENCY,
            LegacyKind::Lpddr => &LPDDR_CAS_LATENCY,
        }
    }
}

/// Logical content of the mode register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mr {
    /// Burst length
    pub burst_length: u32,
    /// CAS latency
    pub cas_latency: u32,
    /// DLL reset request
    pub dll_reset: bool,
}

impl Mr {
    /// Packs the register for `kind`.
    pub fn encode(&self, kind: LegacyKind) -> Result<ModeRegisterValue> {
        let memtype = kind.memtype();
        let bl = BURST_LENGTH.encode(memtype, self.burst_length)?;
        let cl = kind.cas_latency().encode(memtype, self.cas_latency)?;
        let mut mr = bl | (cl << 4);
        if self.dll_reset {
            mr |= DLL_RESET;
        }
        Ok(ModeRegisterValue::new(mr))
    }

    /// Unpacks a register value of `kind`.
    pub fn decode(kind: LegacyKind, value: ModeRegisterValue) -> Option<Self> {
        Some(Mr {
            burst_length: BURST_LENGTH.key(value.field(0, 3))?,
            cas_latency: kind.cas_latency().key(value.field(4, 3))?,
            dll_reset: value.bit(8),
        })
    }
}

/// Register values loaded during SDR, DDR or LPDDR initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRegisters {
    /// Mode register without DLL reset
    pub mr: ModeRegisterValue,
    /// Extended mode register and its bank address, if the generation has one
    pub emr: Option<(u8, ModeRegisterValue)>,
}

impl ModeRegisters {
    /// Encodes the registers of `kind` for `phy`.
    pub fn new(kind: LegacyKind, phy: &PhySettings) -> Result<Self> {
        let mr = Mr {
            burst_length: kind.burst_length(),
            cas_latency: phy.cl,
            dll_reset: false,
        };
        Ok(ModeRegisters {
            mr: mr.encode(kind)?,
            emr: kind.extended_bank().map(|bank| (bank, ModeRegisterValue::ZERO)),
        })
    }

    /// Mode register with the DLL reset bit set.
    pub fn mr_dll_reset(&self) -> ModeRegisterValue {
        ModeRegisterValue::new(self.mr.value() | DLL_RESET)
    }
}
