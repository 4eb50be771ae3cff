//! Termination and drive-strength settings.
//!
//! DDR3 and DDR4 devices program their on-die termination (`rtt_nom`, `rtt_wr`)
//! and output driver impedance (`ron`) through mode registers. Boards name these
//! settings symbolically (`"60ohm"`, `"disabled"`, ...); this module merges the
//! board overrides over the per-generation defaults and maps the names to the
//! register codes.
//!
//! Other generations have no such fields and resolve to `None`.

use crate::error::{Error, Result};
use crate::mode_register::LookupTable;
use crate::settings::{MemoryType, PhySettings};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Electrical setting that can be overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElectricalField {
    /// Nominal on-die termination
    RttNom,
    /// Dynamic on-die termination during writes
    RttWr,
    /// Output driver impedance
    Ron,
}

impl ElectricalField {
    /// Settings key of the field.
    pub const fn name(&self) -> &'static str {
        match self {
            ElectricalField::RttNom => "rtt_nom",
            ElectricalField::RttWr => "rtt_wr",
            ElectricalField::Ron => "ron",
        }
    }
}

impl Display for ElectricalField {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Board-supplied overrides. Unset fields keep the generation default.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ElectricalOverrides {
    /// Nominal termination, e.g. `"60ohm"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtt_nom: Option<String>,
    /// Termination during writes, e.g. `"120ohm"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtt_wr: Option<String>,
    /// Driver impedance, e.g. `"34ohm"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ron: Option<String>,
}

impl ElectricalOverrides {
    /// Returns true if no field is overridden.
    pub fn is_empty(&self) -> bool {
        self.rtt_nom.is_none() && self.rtt_wr.is_none() && self.ron.is_none()
    }
}

/// Symbolic electrical settings after defaults and overrides were merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElectricalSettings<'a> {
    /// Nominal termination
    pub rtt_nom: &'a str,
    /// Termination during writes
    pub rtt_wr: &'a str,
    /// Driver impedance
    pub ron: &'a str,
}

impl<'a> ElectricalSettings<'a> {
    /// Replaces every field that `overrides` sets.
    pub fn merge(self, overrides: &'a ElectricalOverrides) -> Self {
        ElectricalSettings {
            rtt_nom: overrides.rtt_nom.as_deref().unwrap_or(self.rtt_nom),
            rtt_wr: overrides.rtt_wr.as_deref().unwrap_or(self.rtt_wr),
            ron: overrides.ron.as_deref().unwrap_or(self.ron),
        }
    }
}

/// Register codes of the resolved electrical settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElectricalCodes {
    /// `rtt_nom` code
    pub rtt_nom: u16,
    /// `rtt_wr` code
    pub rtt_wr: u16,
    /// `ron` code
    pub ron: u16,
}

/// Electrical enumeration and point-to-point defaults of one generation.
#[derive(Debug)]
pub struct Electrical {
    /// Generation the tables belong to
    pub memtype: MemoryType,
    /// Settings used for fields the board does not override
    pub defaults: ElectricalSettings<'static>,
    /// Nominal termination codes
    pub rtt_nom: LookupTable<&'static str>,
    /// Write termination codes
    pub rtt_wr: LookupTable<&'static str>,
    /// Driver impedance codes
    pub ron: LookupTable<&'static str>,
}

/// DDR3 termination and drive-strength settings.
pub const DDR3: Electrical = Electrical {
    memtype: MemoryType::Ddr3,
    defaults: ElectricalSettings {
        rtt_nom: "60ohm",
        rtt_wr: "60ohm",
        ron: "34ohm",
    },
    rtt_nom: LookupTable::new(
        "rtt_nom",
        &[
            ("disabled", 0),
            ("60ohm", 1),
            ("120ohm", 2),
            ("40ohm", 3),
            ("20ohm", 4),
            ("30ohm", 5),
        ],
    ),
    rtt_wr: LookupTable::new("rtt_wr", &[("disabled", 0), ("60ohm", 1), ("120ohm", 2)]),
    ron: LookupTable::new("ron", &[("40ohm", 0), ("34ohm", 1)]),
};

/// DDR4 termination and drive-strength settings.
pub const DDR4: Electrical = Electrical {
    memtype: MemoryType::Ddr4,
    defaults: ElectricalSettings {
        rtt_nom: "40ohm",
        rtt_wr: "120ohm",
        ron: "34ohm",
    },
    rtt_nom: LookupTable::new(
        "rtt_nom",
        &[
            ("disabled", 0b000),
            ("60ohm", 0b001),
            ("120ohm", 0b010),
            ("40ohm", 0b011),
            ("240ohm", 0b100),
            ("48ohm", 0b101),
            ("80ohm", 0b110),
            ("34ohm", 0b111),
        ],
    ),
    rtt_wr: LookupTable::new(
        "rtt_wr",
        &[
            ("disabled", 0b000),
            ("120ohm", 0b001),
            ("240ohm", 0b010),
            ("high-z", 0b011),
            ("80ohm", 0b100),
        ],
    ),
    ron: LookupTable::new("ron", &[("34ohm", 0b00), ("48ohm", 0b01)]),
};

impl Electrical {
    /// Returns the electrical settings of `memtype`, if it has any.
    pub fn of(memtype: MemoryType) -> Option<&'static Electrical> {
        match memtype {
            MemoryType::Ddr3 => Some(&DDR3),
            MemoryType::Ddr4 => Some(&DDR4),
            MemoryType::Sdr | MemoryType::Ddr | MemoryType::Lpddr | MemoryType::Ddr2 => None,
        }
    }

    /// Merges `overrides` over the defaults and maps the result to register codes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidElectricalSetting`] naming the first field whose value is
    /// not in the generation's enumeration.
    pub fn resolve(&self, overrides: &ElectricalOverrides) -> Result<ElectricalCodes> {
        let settings = self.defaults.merge(overrides);
        let code = |field, table: &LookupTable<&'static str>, name: &str| {
            table
                .code_of_name(name)
                .ok_or_else(|| Error::InvalidElectricalSetting {
                    memtype: self.memtype,
                    field,
                    name: name.to_string(),
                })
        };
        let codes = ElectricalCodes {
            rtt_nom: code(ElectricalField::RttNom, &self.rtt_nom, settings.rtt_nom)?,
            rtt_wr: code(ElectricalField::RttWr, &self.rtt_wr, settings.rtt_wr)?,
            ron: code(ElectricalField::Ron, &self.ron, settings.ron)?,
        };
        debug!("{} electrical settings {:?} -> {:?}", self.memtype, settings, codes);
        Ok(codes)
    }
}

/// Resolves the electrical codes for `phy`.
///
/// Returns `Ok(None)` for generations without termination or drive-strength
/// fields; overrides given for those are ignored.
pub fn resolve(phy: &PhySettings) -> Result<Option<ElectricalCodes>> {
    match Electrical::of(phy.memtype) {
        Some(electrical) => electrical.resolve(&phy.electrical).map(Some),
        None => {
            if !phy.electrical.is_empty() {
                warn!(
                    "{} has no termination or drive-strength settings, ignoring {:?}",
                    phy.memtype, phy.electrical
                );
            }
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phy(memtype: MemoryType, electrical: ElectricalOverrides) -> PhySettings {
        PhySettings::new(memtype, 7, 4, 1, 2).with_electrical(electrical)
    }

    #[test]
    fn test_defaults() {
        let ddr3 = resolve(&phy(MemoryType::Ddr3, Default::default())).unwrap();
        assert_eq!(
            ddr3,
            Some(ElectricalCodes {
                rtt_nom: 1,
                rtt_wr: 1,
                ron: 1
            })
        );
        let ddr4 = resolve(&phy(MemoryType::Ddr4, Default::default())).unwrap();
        assert_eq!(
            ddr4,
            Some(ElectricalCodes {
                rtt_nom: 0b011,
                rtt_wr: 0b001,
                ron: 0b00
            })
        );
    }

    #[test]
    fn test_override_per_field() {
        let overrides = ElectricalOverrides {
            rtt_wr: Some("120ohm".into()),
            ..Default::default()
        };
        let codes = resolve(&phy(MemoryType::Ddr3, overrides)).unwrap().unwrap();
        assert_eq!(codes.rtt_wr, 2);
        assert_eq!(codes.rtt_nom, 1);
        assert_eq!(codes.ron, 1);
    }

    #[test]
    fn test_invalid_override() {
        let overrides = ElectricalOverrides {
            rtt_nom: Some("90ohm".into()),
            ..Default::default()
        };
        assert_eq!(
            resolve(&phy(MemoryType::Ddr3, overrides)),
            Err(Error::InvalidElectricalSetting {
                memtype: MemoryType::Ddr3,
                field: ElectricalField::RttNom,
                name: "90ohm".into()
            })
        );

        // valid for DDR4, not for DDR3
        let overrides = ElectricalOverrides {
            ron: Some("48ohm".into()),
            ..Default::default()
        };
        assert!(resolve(&phy(MemoryType::Ddr4, overrides.clone())).is_ok());
        assert!(matches!(
            resolve(&phy(MemoryType::Ddr3, overrides)),
            Err(Error::InvalidElectricalSetting {
                field: ElectricalField::Ron,
                ..
            })
        ));
    }

    #[test]
    fn test_ignored_for_legacy() {
        let overrides = ElectricalOverrides {
            rtt_nom: Some("90ohm".into()),
            ..Default::default()
        };
        for memtype in [MemoryType::Sdr, MemoryType::Ddr, MemoryType::Lpddr, MemoryType::Ddr2] {
            assert_eq!(resolve(&phy(memtype, overrides.clone())), Ok(None));
        }
    }
}
