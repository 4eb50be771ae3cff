//! DDR4 mode registers (JESD79-4).
//!
//! ```text
//! MR0: 13 WR[3] | 12 CL[4] | 11..9 WR[2:0] | 8 DLL reset | 6..4 CL[3:1] | 2 CL[0] | 1..0 BL
//! MR1: 10..8 Rtt_nom | 7 write leveling | 2..1 ODI | 0 DLL enable
//! MR2: 11..9 Rtt_WR | 5..3 CWL
//! MR6: 12..10 tCCD_L
//! MR3, MR4, MR5: left at zero
//! ```

use super::{DDRX_BURST_LENGTH, DLL_RESET, LookupTable, ModeRegisterValue, WRITE_LEVELING};
use crate::electrical;
use crate::error::Result;
use crate::settings::{MemoryType, PhySettings, TimingSettings};

const MEMTYPE: MemoryType = MemoryType::Ddr4;

/// Burst length the controller runs the device with.
pub const DEFAULT_BURST_LENGTH: u32 = 8;

/// Lowest write recovery the generator programs.
pub const WRITE_RECOVERY_FLOOR: u32 = 10;

/// tCCD_L programmed into MR6.
///
/// TODO: derive from `TimingSettings` once it carries tCCD_L.
pub const TCCD_L: u32 = 4;

/// CAS latency. The code is split over A2 (bit 0), A6..A4 (bits 3..1) and A12 (bit 4).
pub const CAS_LATENCY: LookupTable<u32> = LookupTable::new(
    "cl",
    &[
        (9, 0b00000),
        (10, 0b00001),
        (11, 0b00010),
        (12, 0b00011),
        (13, 0b00100),
        (14, 0b00101),
        (15, 0b00110),
        (16, 0b00111),
        (18, 0b01000),
        (20, 0b01001),
        (22, 0b01010),
        (24, 0b01011),
        (23, 0b01100),
        (17, 0b01101),
        (19, 0b01110),
        (21, 0b01111),
        (25, 0b10000),
        (26, 0b10001),
        (27, 0b10010),
        (28, 0b10011),
        (29, 0b10100),
        (30, 0b10101),
        (31, 0b10110),
        (32, 0b10111),
    ],
);

/// Write recovery in clock cycles. The code is split over A11..A9 and A13.
pub const WRITE_RECOVERY: LookupTable<u32> = LookupTable::new(
    "wr",
    &[
        (10, 0b0000),
        (12, 0b0001),
        (14, 0b0010),
        (16, 0b0011),
        (18, 0b0100),
        (20, 0b0101),
        (24, 0b0110),
        (22, 0b0111),
        (26, 0b1000),
        (28, 0b1001),
    ],
);

/// CAS write latency.
pub const CAS_WRITE_LATENCY: LookupTable<u32> = LookupTable::new(
    "cwl",
    &[
        (9, 0b000),
        (10, 0b001),
        (11, 0b010),
        (12, 0b011),
        (14, 0b100),
        (16, 0b101),
        (18, 0b110),
        (20, 0b111),
    ],
);

/// Long CAS-to-CAS delay (same bank group).
pub const CCD_L: LookupTable<u32> = LookupTable::new(
    "tccd_l",
    &[(4, 0b000), (5, 0b001), (6, 0b010), (7, 0b011), (8, 0b100)],
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
        mr0 |= (cl & 0b1) << 2;
        mr0 |= ((cl >> 1) & 0b111) << 4;
        mr0 |= ((cl >> 4) & 0b1) << 12;
        if self.dll_reset {
            mr0 |= DLL_RESET;
        }
        mr0 |= (wr & 0b111) << 9;
        mr0 |= (wr >> 3) << 13;
        Ok(ModeRegisterValue::new(mr0))
    }

    /// Unpacks MR0.
    pub fn decode(value: ModeRegisterValue) -> Option<Self> {
        let cl = value.field(2, 1) | (value.field(4, 3) << 1) | (value.field(12, 1) << 4);
        let wr = value.field(9, 3) | (value.field(13, 1) << 3);
        Some(Mr0 {
            burst_length: DDRX_BURST_LENGTH.key(value.field(0, 2))?,
            cas_latency: CAS_LATENCY.key(cl)?,
            write_recovery: WRITE_RECOVERY.key(wr)?,
            dll_reset: value.bit(8),
        })
    }
}

/// MR1 fields. `ron` and `rtt_nom` are codes from [`electrical::DDR4`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mr1 {
    /// DLL enable
    pub dll_enable: bool,
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
        let mut mr1 = self.dll_enable as u16;
        mr1 |= (self.ron & 0b1) << 1;
        mr1 |= ((self.ron >> 1) & 0b1) << 2;
        mr1 |= (self.rtt_nom & 0b1) << 8;
        mr1 |= ((self.rtt_nom >> 1) & 0b1) << 9;
        mr1 |= ((self.rtt_nom >> 2) & 0b1) << 10;
        if self.write_leveling {
            mr1 |= WRITE_LEVELING;
        }
        ModeRegisterValue::new(mr1)
    }

    /// Unpacks MR1.
    pub fn decode(value: ModeRegisterValue) -> Self {
        Mr1 {
            dll_enable: value.bit(0),
            ron: value.field(1, 2),
            rtt_nom: value.field(8, 3),
            write_leveling: value.bit(7),
        }
    }
}

/// MR2 fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mr2 {
    /// CAS write latency
    pub cas_write_latency: u32,
    /// Dynamic termination code from [`electrical::DDR4`]
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
            rtt_wr: value.field(9, 3),
        })
    }
}

/// MR6 fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mr6 {
    /// tCCD_L in clock cycles
    pub tccd_l: u32,
}

impl Mr6 {
    /// Packs MR6.
    pub fn encode(&self) -> Result<ModeRegisterValue> {
        let tccd = CCD_L.encode(MEMTYPE, self.tccd_l)?;
        Ok(ModeRegisterValue::new(tccd << 10))
    }

    /// Unpacks MR6.
    pub fn decode(value: ModeRegisterValue) -> Option<Self> {
        Some(Mr6 {
            tccd_l: CCD_L.key(value.field(10, 3))?,
        })
    }
}

/// Register values loaded during DDR4 initialization.
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
    /// MR4 (reserved)
    pub mr4: ModeRegisterValue,
    /// MR5 (reserved)
    pub mr5: ModeRegisterValue,
    /// MR6
    pub mr6: ModeRegisterValue,
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
        let electrical = electrical::DDR4.resolve(&phy.electrical)?;
        let mr0 = Mr0 {
            burst_length: DEFAULT_BURST_LENGTH,
            cas_latency: phy.cl,
            write_recovery: super::write_recovery(phy, timing, WRITE_RECOVERY_FLOOR)?,
            dll_reset: true,
        };
        let mr1 = Mr1 {
            dll_enable: true,
            ron: electrical.ron,
            rtt_nom: electrical.rtt_nom,
            write_leveling: false,
        };
        let mr2 = Mr2 {
            cas_write_latency: cwl,
            rtt_wr: electrical.rtt_wr,
        };
        let mr6 = Mr6 { tccd_l: TCCD_L };
        Ok(ModeRegisters {
            mr0: mr0.encode()?,
            mr1: mr1.encode(),
            mr2: mr2.encode()?,
            mr3: ModeRegisterValue::ZERO,
            mr4: ModeRegisterValue::ZERO,
            mr5: ModeRegisterValue::ZERO,
            mr6: mr6.encode()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::electrical::ElectricalOverrides;

    #[test]
    fn test_default_registers() {
        // CL11, CWL9, WR = max(2 * 4, 10) = 10
        let phy = PhySettings::new(MemoryType::Ddr4, 11, 4, 1, 2).with_cwl(9);
        let regs = ModeRegisters::new(&phy, &TimingSettings::new(2)).unwrap();
        // CL11 code 0b00010 -> A4 set
        assert_eq!(regs.mr0.value(), (1 << 4) | DLL_RESET);
        // DLL enable, RZQ/7 driver, rtt_nom 40 ohm (0b011)
        assert_eq!(regs.mr1.value(), 0b1 | (1 << 8) | (1 << 9));
        // CWL9, rtt_wr 120 ohm
        assert_eq!(regs.mr2.value(), 1 << 9);
        assert_eq!(regs.mr6.value(), 0);
        for reserved in [regs.mr3, regs.mr4, regs.mr5] {
            assert_eq!(reserved, ModeRegisterValue::ZERO);
        }
    }

    #[test]
    fn test_mr0_high_bits() {
        let mr0 = Mr0 {
            burst_length: 8,
            cas_latency: 25,
            write_recovery: 26,
            dll_reset: false,
        };
        let value = mr0.encode().unwrap();
        assert!(value.bit(12));
        assert!(value.bit(13));
        assert_eq!(value.field(9, 3), 0);
        assert_eq!(Mr0::decode(value), Some(mr0));
    }

    #[test]
    fn test_mr1_overrides() {
        let phy = PhySettings::new(MemoryType::Ddr4, 16, 4, 1, 2)
            .with_cwl(12)
            .with_electrical(ElectricalOverrides {
                rtt_nom: Some("34ohm".into()),
                ron: Some("48ohm".into()),
                rtt_wr: Some("high-z".into()),
            });
        let regs = ModeRegisters::new(&phy, &TimingSettings::new(4)).unwrap();
        let mr1 = Mr1::decode(regs.mr1);
        assert_eq!(mr1.rtt_nom, 0b111);
        assert_eq!(mr1.ron, 0b01);
        assert!(mr1.dll_enable);
        assert_eq!(Mr2::decode(regs.mr2).map(|mr2| mr2.rtt_wr), Some(0b011));
    }

    #[test]
    fn test_unsupported_cwl() {
        let phy = PhySettings::new(MemoryType::Ddr4, 11, 4, 1, 2).with_cwl(13);
        assert_eq!(
            ModeRegisters::new(&phy, &TimingSettings::new(2)),
            Err(Error::UnsupportedParameterValue {
                memtype: MemoryType::Ddr4,
                parameter: "cwl",
                value: 13
            })
        );
    }
}
