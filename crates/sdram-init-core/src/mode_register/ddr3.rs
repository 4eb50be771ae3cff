//! DDR3 mode registers (JESD79-3).
//!
//! ```text
//! MR0: 12 PPD | 11..9 WR | 8 DLL reset | 7 TM | 6..4 CL[3:1] | 3 RBT | 2 CL[0] | 1..0 BL
//! MR1: 9 Rtt_nom[2] | 7 write leveling | 6 Rtt_nom[1] | 5 D.I.C[1] | 4..3 AL | 2 Rtt_nom[0] | 1 D.I.C[0] | 0 DLL disable
//! MR2: 10..9 Rtt_WR | 5..3 CWL-5
//! MR3: MPR, left at zero
//! ```

use super::{DDRX_BURST_LENGTH, DLL_RESET, LookupTable, ModeRegisterValue, WRITE_LEVELING};
use crate::electrical;
use crate::error::Result;
use crate::settings::{MemoryType, PhySettings, TimingSettings};

const MEMTYPE: MemoryType = MemoryType::Ddr3;

/// Burst length the controller runs the device with.
pub const DEFAULT_BURST_LENGTH: u32 = 8;

/// Lowest write recovery the generator programs.
pub const WRITE_RECOVERY_FLOOR: u32 = 5;

/// CAS latency. The code is split over A2 (bit 0) and A6..A4 (bits 3..1).
pub const CAS_LATENCY: LookupTable<u32> = LookupTable::new(
    "cl",
    &[
        (5, 0b0010),
        (6, 0b0100),
        (7, 0b0110),
        (8, 0b1000),
        (9, 0b1010),
        (10, 0b1100),
        (11, 0b1110),
        (12, 0b0001),
        (13, 0b0011),
        (14, 0b0101),
    ],
);

/// Write recovery in clock cycles.
pub const WRITE_RECOVERY: LookupTable<u32> = LookupTable::new(
    "wr",
    &[
        (16, 0b000),
        (5, 0b001),
        (6, 0b010),
        (7, 0b011),
        (8, 0b100),
        (10, 0b101),
        (12, 0b110),
        (14, 0b111),
    ],
);

/// CAS write latency.
pub const CAS_WRITE_LATENCY: LookupTable<u32> = LookupTable::new(
    "cwl",
    &[
        (5, 0b000),
        (6, 0b001),
        (7, 0b010),
        (8, 0b011),
        (9, 0b100),
        (10, 0b101),
        (11, 0b110),
        (12, 0b111),
    ],
);

/// MR0 fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mr0 {
    /// Burst length
    pub burst_length: u32,
    /// CAS latency
    pub cas_latency: u32,
    /// Write recovery in clock cycles
    pub write_recovery: u32,
    /// DLL reset request
    pub dll_reset: bool,
}

impl Mr0 {
    /// Packs MR0.
    pub fn encode(&self) -> Result<ModeRegisterValue> {
        let bl = DDRX_BURST_LENGTH.encode(MEMTYPE, self.burst_length)?;
        let cl = CAS_LATENCY.encode(MEMTYPE, self.cas_latency)?;
        let wr = WRITE_RECOVERY.encode(MEMTYPE, self.write_recovery)?;
        let mut mr0 = bl;
        mr0 |= (cl & 1) << 2;
        mr0 |= ((cl >> 1) & 0b111) << 4;
        if self.dll_reset {
            mr0 |= DLL_RESET;
        }
        mr0 |= wr << 9;
        Ok(ModeRegisterValue::new(mr0))
    }

    /// Unpacks MR0.
    pub fn decode(value: ModeRegisterValue) -> Option<Self> {
        let cl = value.field(2, 1) | (value.field(4, 3) << 1);
        Some(Mr0 {
            burst_length: DDRX_BURST_LENGTH.key(value.field(0, 2))?,
            cas_latency: CAS_LATENCY.key(cl)?,
            write_recovery: WRITE_RECOVERY.key(value.field(9, 3))?,
            dll_reset: value.bit(8),
        })
    }
}

/// MR1 fields. `ron` and `rtt_nom` are codes from [`electrical::DDR3`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mr1 {
    /// Output driver impedance code
    pub ron: u16,
    /// Nominal termination code
    pub rtt_nom: u16,
    /// Write leveling enable
    pub write_leveling: bool,
}

impl Mr1 {
    /// Packs MR1.
    pub fn encode(&self) -> ModeRegisterValue {
        let mut mr1 = (self.ron & 1) << 1;
        mr1 |= ((self.ron >> 1) & 1) << 5;
        mr1 |= (self.rtt_nom & 1) << 2;
        mr1 |= ((self.rtt_nom >> 1) & 1) << 6;
        mr1 |= ((self.rtt_nom >> 2) & 1) << 9;
        if self.write_leveling {
            mr1 |= WRITE_LEVELING;
        }
        ModeRegisterValue::new(mr1)
    }

    /// Unpacks MR1.
    pub fn decode(value: ModeRegisterValue) -> Self {
        Mr1 {
            ron: value.field(1, 1) | (value.field(5, 1) << 1),
            rtt_nom: value.field(2, 1) | (value.field(6, 1) << 1) | (value.field(9, 1) << 2),
            write_leveling: value.bit(7),
        }
    }
}

/// MR2 fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mr2 {
    /// CAS write latency
    pub cas_write_latency: u32,
    /// Dynamic termination code from [`electrical::DDR3`]
    pub rtt_wr: u16,
}

impl Mr2 {
    /// Packs MR2.
    pub fn encode(&self) -> Result<ModeRegisterValue> {
        let cwl = CAS_WRITE_LATENCY.encode(MEMTYPE, self.cas_write_latency)?;
        Ok(ModeRegisterValue::new((cwl << 3) | (self.rtt_wr << 9)))
    }

    /// Unpacks MR2.
    pub fn decode(value: ModeRegisterValue) -> Option<Self> {
        Some(Mr2 {
            cas_write_latency: CAS_WRITE_LATENCY.key(value.field(3, 3))?,
            rtt_wr: value.field(9, 2),
        })
    }
}

/// Register values loaded during DDR3 initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRegisters {
    /// MR0 with DLL reset
    pub mr0: ModeRegisterValue,
    /// MR1
    pub mr1: ModeRegisterValue,
    /// MR2
    pub mr2: ModeRegisterValue,
    /// MR3 (reserved)
    pub mr3: ModeRegisterValue,
}

impl ModeRegisters {
    /// Encodes the registers for `phy` and `timing`.
    ///
    /// # Errors
    ///
    /// Fails if the CAS latency, CAS write latency or derived write recovery is
    /// not in its table, if `cwl` is missing, or if an electrical override is
    /// invalid.
    pub fn new(phy: &PhySettings, timing: &TimingSettings) -> Result<Self> {
        let cwl = phy.require_cwl()?;
        let electrical = electrical::DDR3.resolve(&phy.electrical)?;
        let mr0 = Mr0 {
            burst_length: DEFAULT_BURST_LENGTH,
            cas_latency: phy.cl,
            write_recovery: super::write_recovery(phy, timing, WRITE_RECOVERY_FLOOR)?,
            dll_reset: true,
        };
        let mr1 = Mr1 {
            ron: electrical.ron,
            rtt_nom: electrical.rtt_nom,
            write_leveling: false,
        };
        let mr2 = Mr2 {
            cas_write_latency: cwl,
            rtt_wr: electrical.rtt_wr,
        };
        Ok(ModeRegisters {
            mr0: mr0.encode()?,
            mr1: mr1.encode(),
            mr2: mr2.encode()?,
            mr3: ModeRegisterValue::ZERO,
        })
    }
}
