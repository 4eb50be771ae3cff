use crate::electrical::ElectricalOverrides;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// SDRAM generation driven by the PHY.
///
/// The set is closed: any other name fails to parse with
/// [`Error::UnsupportedMemoryType`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum MemoryType {
    /// Single data rate SDRAM
    Sdr,
    /// DDR SDRAM
    Ddr,
    /// Low power DDR (mobile DDR)
    Lpddr,
    /// DDR2 SDRAM
    Ddr2,
    /// DDR3 SDRAM
    Ddr3,
    /// DDR4 SDRAM
    Ddr4,
}

impl MemoryType {
    /// All supported generations.
    pub const ALL: [MemoryType; 6] = [
        MemoryType::Sdr,
        MemoryType::Ddr,
        MemoryType::Lpddr,
        MemoryType::Ddr2,
        MemoryType::Ddr3,
        MemoryType::Ddr4,
    ];

    /// Canonical upper-case name.
    pub const fn name(&self) -> &'static str {
        match self {
            MemoryType::Sdr => "SDR",
            MemoryType::Ddr => "DDR",
            MemoryType::Lpddr => "LPDDR",
            MemoryType::Ddr2 => "DDR2",
            MemoryType::Ddr3 => "DDR3",
            MemoryType::Ddr4 => "DDR4",
        }
    }
}

impl Display for MemoryType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MemoryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MemoryType::ALL
            .into_iter()
            .find(|memtype| memtype.name() == s)
            .ok_or_else(|| Error::UnsupportedMemoryType(s.to_string()))
    }
}

impl TryFrom<String> for MemoryType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// PHY settings supplied by the hardware description.
///
/// Unknown keys are rejected when deserializing, so a misspelled setting never
/// falls back to a default.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PhySettings {
    /// Memory generation
    pub memtype: MemoryType,
    /// CAS latency in clock cycles
    pub cl: u32,
    /// CAS write latency in clock cycles (DDR3/DDR4 only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwl: Option<u32>,
    /// Number of DFI phases per controller clock
    pub nphases: usize,
    /// Phase carrying read commands
    pub rdphase: usize,
    /// Phase carrying write commands
    pub wrphase: usize,
    /// Optional termination and drive-strength overrides (DDR3/DDR4 only)
    #[serde(default, skip_serializing_if = "ElectricalOverrides::is_empty")]
    pub electrical: ElectricalOverrides,
}

impl PhySettings {
    /// Creates settings with no CAS write latency and default electrical settings.
    pub fn new(memtype: MemoryType, cl: u32, nphases: usize, rdphase: usize, wrphase: usize) -> Self {
        PhySettings {
            memtype,
            cl,
            cwl: None,
            nphases,
            rdphase,
            wrphase,
            electrical: ElectricalOverrides::default(),
        }
    }

    /// Sets the CAS write latency.
    pub fn with_cwl(mut self, cwl: u32) -> Self {
        self.cwl = Some(cwl);
        self
    }

    /// Replaces the electrical overrides.
    pub fn with_electrical(mut self, electrical: ElectricalOverrides) -> Self {
        self.electrical = electrical;
        self
    }

    /// Returns the CAS write latency or [`Error::MissingParameter`].
    pub fn require_cwl(&self) -> Result<u32> {
        self.cwl.ok_or(Error::MissingParameter {
            memtype: self.memtype,
            parameter: "cwl",
        })
    }

    /// Checks the phase count and the read/write phase indices.
    pub fn validate_phases(&self) -> Result<()> {
        let unsupported = |parameter: &'static str, value: usize| Error::UnsupportedParameterValue {
            memtype: self.memtype,
            parameter,
            value: u32::try_from(value).unwrap_or(u32::MAX),
        };
        if self.nphases == 0 {
            return Err(unsupported("nphases", self.nphases));
        }
        if self.rdphase >= self.nphases {
            return Err(unsupported("rdphase", self.rdphase));
        }
        if self.wrphase >= self.nphases {
            return Err(unsupported("wrphase", self.wrphase));
        }
        Ok(())
    }
}

/// Device timing settings in controller clock cycles.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct TimingSettings {
    /// Minimum write-to-read turnaround
    #[serde(rename = "tWTR")]
    pub t_wtr: u32,
}

impl TimingSettings {
    /// Creates timing settings.
    pub fn new(t_wtr: u32) -> Self {
        TimingSettings { t_wtr }
    }
}
