use super::{InitSequence, InitStep};
use crate::electrical;
use crate::error::Result;
use crate::mode_register::legacy::LegacyKind;
use crate::mode_register::{ddr2, ddr3, ddr4, legacy};
use crate::settings::{MemoryType, PhySettings, TimingSettings};
use log::{debug, info, trace};

/// CKE settle time of SDR, DDR, LPDDR and DDR2.
const LEGACY_CKE_DELAY: u32 = 20000;
/// Reset release time of DDR3 and DDR4.
const DDRX_RESET_DELAY: u32 = 50000;
/// CKE settle time of DDR3 and DDR4.
const DDRX_CKE_DELAY: u32 = 10000;

/// Capabilities of one memory generation.
///
/// Encoding the mode registers is the only fallible part; laying out the steps
/// around an encoded register set cannot fail.
pub trait Generation {
    /// Encoded register set loaded by the sequence.
    type Registers;

    /// The generation's memory type.
    fn memtype(&self) -> MemoryType;

    /// Encodes the mode registers for `phy` and `timing`.
    fn mode_registers(&self, phy: &PhySettings, timing: &TimingSettings) -> Result<Self::Registers>;

    /// Lays out the ordered steps loading `registers`.
    fn steps(&self, phy: &PhySettings, registers: &Self::Registers) -> Vec<InitStep>;

    /// MR1 value retained for write leveling.
    fn mr1(&self, _registers: &Self::Registers) -> Option<u16> {
        None
    }

    /// Encodes the registers and assembles the sequence.
    fn build(&self, phy: &PhySettings, timing: &TimingSettings) -> Result<InitSequence> {
        let registers = self.mode_registers(phy, timing)?;
        let steps = self.steps(phy, &registers);
        for (i, step) in steps.iter().enumerate() {
            trace!(
                "step {}: {} (a={:#06x}, ba={}, {}, delay={})",
                i, step.label, step.address, step.bank_address, step.command, step.delay
            );
        }
        Ok(InitSequence::new(self.memtype(), steps, self.mr1(&registers)))
    }
}

/// DLL reset, precharge and double refresh, then the final mode register load.
///
/// Shared tail of the legacy and DDR2 protocols.
fn dll_reset_and_refresh(cl: u32, bl: u32, mr: u16, mr_dll_reset: u16) -> [InitStep; 5] {
    [
        InitStep::load_mode_register(
            format!("Load Mode Register / Reset DLL, CL={cl}, BL={bl}"),
            mr_dll_reset,
            0,
            200,
        ),
        InitStep::precharge_all(),
        InitStep::auto_refresh(),
        InitStep::auto_refresh(),
        InitStep::load_mode_register(format!("Load Mode Register / CL={cl}, BL={bl}"), mr, 0, 200),
    ]
}

/// SDR, DDR and LPDDR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Legacy(pub LegacyKind);

impl Generation for Legacy {
    type Registers = legacy::ModeRegisters;

    fn memtype(&self) -> MemoryType {
        self.0.memtype()
    }

    fn mode_registers(&self, phy: &PhySettings, _timing: &TimingSettings) -> Result<Self::Registers> {
        // warns about overrides this generation cannot program
        electrical::resolve(phy)?;
        let registers = legacy::ModeRegisters::new(self.0, phy)?;
        debug!("{}: MR={}", self.memtype(), registers.mr);
        Ok(registers)
    }

    fn steps(&self, phy: &PhySettings, registers: &Self::Registers) -> Vec<InitStep> {
        let mut steps = vec![
            InitStep::bring_cke_high(LEGACY_CKE_DELAY),
            InitStep::precharge_all(),
        ];
        if let Some((bank, emr)) = registers.emr {
            steps.push(InitStep::load_mode_register(
                "Load Extended Mode Register",
                emr,
                bank,
                0,
            ));
        }
        steps.extend(dll_reset_and_refresh(
            phy.cl,
            self.0.burst_length(),
            registers.mr.value(),
            registers.mr_dll_reset().value(),
        ));
        steps
    }
}

/// DDR2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ddr2;

impl Generation for Ddr2 {
    type Registers = ddr2::ModeRegisters;

    fn memtype(&self) -> MemoryType {
        MemoryType::Ddr2
    }

    fn mode_registers(&self, phy: &PhySettings, _timing: &TimingSettings) -> Result<Self::Registers> {
        electrical::resolve(phy)?;
        let registers = ddr2::ModeRegisters::new(phy)?;
        debug!("DDR2: MR={} EMR={}", registers.mr, registers.emr);
        Ok(registers)
    }

    fn steps(&self, phy: &PhySettings, registers: &Self::Registers) -> Vec<InitStep> {
        let mut steps = vec![
            InitStep::bring_cke_high(LEGACY_CKE_DELAY),
            InitStep::precharge_all(),
            InitStep::load_mode_register("Load Extended Mode Register 3", registers.emr3, 3, 0),
            InitStep::load_mode_register("Load Extended Mode Register 2", registers.emr2, 2, 0),
            InitStep::load_mode_register("Load Extended Mode Register", registers.emr, 1, 0),
        ];
        steps.extend(dll_reset_and_refresh(
            phy.cl,
            ddr2::DEFAULT_BURST_LENGTH,
            registers.mr.value(),
            registers.mr_dll_reset().value(),
        ));
        steps.push(InitStep::load_mode_register(
            "Load Extended Mode Register / OCD Default",
            registers.emr_ocd_default(),
            1,
            0,
        ));
        steps.push(InitStep::load_mode_register(
            "Load Extended Mode Register / OCD Exit",
            registers.emr,
            1,
            0,
        ));
        steps
    }
}

/// DDR3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ddr3;

impl Generation for Ddr3 {
    type Registers = ddr3::ModeRegisters;

    fn memtype(&self) -> MemoryType {
        MemoryType::Ddr3
    }

    fn mode_registers(&self, phy: &PhySettings, timing: &TimingSettings) -> Result<Self::Registers> {
        let registers = ddr3::ModeRegisters::new(phy, timing)?;
        debug!(
            "DDR3: MR0={} MR1={} MR2={} MR3={}",
            registers.mr0, registers.mr1, registers.mr2, registers.mr3
        );
        Ok(registers)
    }

    fn steps(&self, phy: &PhySettings, registers: &Self::Registers) -> Vec<InitStep> {
        // validated by mode_registers
        let cwl = phy.cwl.unwrap_or_default();
        vec![
            InitStep::release_reset(DDRX_RESET_DELAY),
            InitStep::bring_cke_high(DDRX_CKE_DELAY),
            InitStep::load_mode_register(format!("Load Mode Register 2, CWL={cwl}"), registers.mr2, 2, 0),
            InitStep::load_mode_register("Load Mode Register 3", registers.mr3, 3, 0),
            InitStep::load_mode_register("Load Mode Register 1", registers.mr1, 1, 0),
            InitStep::load_mode_register(
                format!(
                    "Load Mode Register 0, CL={}, BL={}",
                    phy.cl,
                    ddr3::DEFAULT_BURST_LENGTH
                ),
                registers.mr0,
                0,
                200,
            ),
            InitStep::zq_calibration(),
        ]
    }

    fn mr1(&self, registers: &Self::Registers) -> Option<u16> {
        Some(registers.mr1.value())
    }
}

/// DDR4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ddr4;

impl Generation for Ddr4 {
    type Registers = ddr4::ModeRegisters;

    fn memtype(&self) -> MemoryType {
        MemoryType::Ddr4
    }

    fn mode_registers(&self, phy: &PhySettings, timing: &TimingSettings) -> Result<Self::Registers> {
        let registers = ddr4::ModeRegisters::new(phy, timing)?;
        debug!(
            "DDR4: MR0={} MR1={} MR2={} MR6={}",
            registers.mr0, registers.mr1, registers.mr2, registers.mr6
        );
        Ok(registers)
    }

    fn steps(&self, phy: &PhySettings, registers: &Self::Registers) -> Vec<InitStep> {
        // validated by mode_registers
        let cwl = phy.cwl.unwrap_or_default();
        vec![
            InitStep::release_reset(DDRX_RESET_DELAY),
            InitStep::bring_cke_high(DDRX_CKE_DELAY),
            InitStep::load_mode_register("Load Mode Register 3", registers.mr3, 3, 0),
            InitStep::load_mode_register("Load Mode Register 6", registers.mr6, 6, 0),
            InitStep::load_mode_register("Load Mode Register 5", registers.mr5, 5, 0),
            InitStep::load_mode_register("Load Mode Register 4", registers.mr4, 4, 0),
            InitStep::load_mode_register(format!("Load Mode Register 2, CWL={cwl}"), registers.mr2, 2, 0),
            InitStep::load_mode_register("Load Mode Register 1", registers.mr1, 1, 0),
            InitStep::load_mode_register(
                format!(
                    "Load Mode Register 0, CL={}, BL={}",
                    phy.cl,
                    ddr4::DEFAULT_BURST_LENGTH
                ),
                registers.mr0,
                0,
                200,
            ),
            InitStep::zq_calibration(),
        ]
    }

    fn mr1(&self, registers: &Self::Registers) -> Option<u16> {
        Some(registers.mr1.value())
    }
}

/// Builds the init sequence for `phy` and `timing`.
///
/// # Errors
///
/// Fails with the first illegal setting found: a phase index out of range, a
/// latency outside the generation's tables, a missing CAS write latency or an
/// unknown electrical setting. No partial sequence is returned.
pub fn build_init_sequence(phy: &PhySettings, timing: &TimingSettings) -> Result<InitSequence> {
    phy.validate_phases()?;
    let sequence = match phy.memtype {
        MemoryType::Sdr => Legacy(LegacyKind::Sdr).build(phy, timing),
        MemoryType::Ddr => Legacy(LegacyKind::Ddr).build(phy, timing),
        MemoryType::Lpddr => Legacy(LegacyKind::Lpddr).build(phy, timing),
        MemoryType::Ddr2 => Ddr2.build(phy, timing),
        MemoryType::Ddr3 => Ddr3.build(phy, timing),
        MemoryType::Ddr4 => Ddr4.build(phy, timing),
    }?;
    info!(
        "Built {} init sequence: {} steps, {} delay cycles",
        sequence.memtype(),
        sequence.len(),
        sequence.total_delay()
    );
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::electrical::ElectricalOverrides;
    use crate::sequence::{A10, Command};

    fn labels(sequence: &InitSequence) -> Vec<&str> {
        sequence.steps().iter().map(|step| step.label.as_str()).collect()
    }

    #[test]
    fn test_sdr_sequence() {
        let phy = PhySettings::new(MemoryType::Sdr, 2, 1, 0, 0);
        let sequence = build_init_sequence(&phy, &TimingSettings::new(2)).unwrap();
        assert_eq!(
            labels(&sequence),
            vec![
                "Bring CKE high",
                "Precharge All",
                "Load Mode Register / Reset DLL, CL=2, BL=1",
                "Precharge All",
                "Auto Refresh",
                "Auto Refresh",
                "Load Mode Register / CL=2, BL=1",
            ]
        );
        let steps = sequence.steps();
        assert_eq!(steps[0].delay, 20000);
        assert_eq!(steps[1].address, A10);
        assert_eq!(steps[2].address, 0x120);
        assert_eq!(steps[2].delay, 200);
        assert_eq!(steps[4].delay, 4);
        assert_eq!(steps[6].address, 0x20);
        assert_eq!(sequence.mr1(), None);
    }

    #[test]
    fn test_ddr_sequence() {
        let phy = PhySettings::new(MemoryType::Ddr, 2, 2, 0, 1);
        let sequence = build_init_sequence(&phy, &TimingSettings::new(2)).unwrap();
        assert_eq!(sequence.len(), 8);
        let emr = &sequence.steps()[2];
        assert_eq!(emr.label, "Load Extended Mode Register");
        assert_eq!((emr.address, emr.bank_address), (0, 1));
        assert_eq!(sequence.steps()[3].address, 0x122);
        assert_eq!(sequence.mr1(), None);
    }

    #[test]
    fn test_lpddr_extended_bank() {
        let phy = PhySettings::new(MemoryType::Lpddr, 3, 2, 0, 1);
        let sequence = build_init_sequence(&phy, &TimingSettings::new(2)).unwrap();
        assert_eq!(sequence.steps()[2].bank_address, 2);
        assert_eq!(sequence.steps()[7].label, "Load Mode Register / CL=3, BL=4");
    }

    #[test]
    fn test_ddr2_sequence() {
        let phy = PhySettings::new(MemoryType::Ddr2, 4, 2, 0, 1);
        let sequence = build_init_sequence(&phy, &TimingSettings::new(2)).unwrap();
        assert_eq!(sequence.len(), 12);
        let steps = sequence.steps();
        assert_eq!((steps[2].bank_address, steps[3].bank_address, steps[4].bank_address), (3, 2, 1));
        assert_eq!(steps[5].address, 0x442 | crate::mode_register::DLL_RESET);
        assert_eq!(steps[9].address, 0x442);
        assert_eq!(steps[10].label, "Load Extended Mode Register / OCD Default");
        assert_eq!((steps[10].address, steps[10].bank_address), (0x380, 1));
        assert_eq!((steps[11].address, steps[11].bank_address), (0, 1));
    }

    #[test]
    fn test_ddr3_sequence() {
        let phy = PhySettings::new(MemoryType::Ddr3, 7, 4, 1, 2)
            .with_cwl(6)
            .with_electrical(ElectricalOverrides {
                rtt_wr: Some("120ohm".into()),
                ..Default::default()
            });
        let sequence = build_init_sequence(&phy, &TimingSettings::new(2)).unwrap();
        assert_eq!(
            labels(&sequence),
            vec![
                "Release reset",
                "Bring CKE high",
                "Load Mode Register 2, CWL=6",
                "Load Mode Register 3",
                "Load Mode Register 1",
                "Load Mode Register 0, CL=7, BL=8",
                "ZQ Calibration",
            ]
        );
        let steps = sequence.steps();
        assert_eq!(steps[0].command, Command::UNRESET);
        assert_eq!(steps[0].delay, 50000);
        assert_eq!(steps[1].delay, 10000);
        assert_eq!((steps[2].address, steps[2].bank_address), (0x408, 2));
        assert_eq!((steps[5].address, steps[5].delay), (0x930, 200));
        assert_eq!(sequence.mr1(), Some(0x6));
        let zq = &steps[6];
        assert_eq!((zq.address, zq.command, zq.delay), (A10, Command::ZQ_CALIBRATION, 200));
    }

    #[test]
    fn test_ddr4_sequence() {
        let phy = PhySettings::new(MemoryType::Ddr4, 11, 4, 1, 2).with_cwl(9);
        let sequence = build_init_sequence(&phy, &TimingSettings::new(2)).unwrap();
        let banks: Vec<u8> = sequence.steps().iter().map(|step| step.bank_address).collect();
        assert_eq!(banks, vec![0, 0, 3, 6, 5, 4, 2, 1, 0, 0]);
        assert_eq!(sequence.steps()[6].label, "Load Mode Register 2, CWL=9");
        assert_eq!(sequence.steps()[8].label, "Load Mode Register 0, CL=11, BL=8");
        assert_eq!(sequence.mr1(), Some(sequence.steps()[7].address));
        assert_eq!(sequence.steps().last().map(|step| step.delay), Some(200));
    }

    #[test]
    fn test_phase_validation() {
        let phy = PhySettings::new(MemoryType::Ddr3, 7, 4, 4, 2).with_cwl(6);
        assert_eq!(
            build_init_sequence(&phy, &TimingSettings::new(2)),
            Err(Error::UnsupportedParameterValue {
                memtype: MemoryType::Ddr3,
                parameter: "rdphase",
                value: 4
            })
        );
    }

    #[test]
    fn test_invalid_electrical() {
        let phy = PhySettings::new(MemoryType::Ddr3, 7, 4, 1, 2)
            .with_cwl(6)
            .with_electrical(ElectricalOverrides {
                rtt_nom: Some("90ohm".into()),
                ..Default::default()
            });
        assert!(matches!(
            build_init_sequence(&phy, &TimingSettings::new(2)),
            Err(Error::InvalidElectricalSetting { .. })
        ));
    }

    #[test]
    fn test_write_recovery_overflow() {
        let phy = PhySettings::new(MemoryType::Ddr3, 8, 2, 0, 1).with_cwl(6);
        assert_eq!(
            build_init_sequence(&phy, &TimingSettings::new(0x8000_0004)),
            Err(Error::UnsupportedParameterValue {
                memtype: MemoryType::Ddr3,
                parameter: "tWTR",
                value: 0x8000_0004
            })
        );
        let phy = PhySettings::new(MemoryType::Ddr4, 11, 4, 1, 2).with_cwl(9);
        assert!(matches!(
            build_init_sequence(&phy, &TimingSettings::new(u32::MAX)),
            Err(Error::UnsupportedParameterValue { parameter: "tWTR", .. })
        ));
    }

    #[test]
    fn test_generation_dispatch() {
        let phy = PhySettings::new(MemoryType::Ddr, 3, 2, 0, 1);
        let direct = Legacy(LegacyKind::Ddr).build(&phy, &TimingSettings::new(2)).unwrap();
        assert_eq!(build_init_sequence(&phy, &TimingSettings::new(2)).unwrap(), direct);
        assert_eq!(direct.memtype(), MemoryType::Ddr);
    }
}
