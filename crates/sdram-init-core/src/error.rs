use crate::electrical::ElectricalField;
use crate::settings::MemoryType;
use thiserror::Error;

/// Errors raised while resolving settings and building an init sequence.
///
/// Every variant names the offending field and value. None of them is
/// recoverable: the caller gets a complete sequence or nothing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The memory generation name is not one of `SDR`, `DDR`, `LPDDR`, `DDR2`, `DDR3`, `DDR4`.
    #[error("Unsupported memory type: {0}")]
    UnsupportedMemoryType(String),
    /// A timing or geometry value is not a key of the generation's lookup table.
    #[error("Unsupported {parameter} value {value} for {memtype}")]
    UnsupportedParameterValue {
        /// Memory generation the lookup was made for
        memtype: MemoryType,
        /// Name of the parameter (`cl`, `cwl`, `bl`, `wr`, ...)
        parameter: &'static str,
        /// The rejected value
        value: u32,
    },
    /// An electrical override names a value outside the generation's enumeration.
    #[error("Invalid {field} setting \"{name}\" for {memtype}")]
    InvalidElectricalSetting {
        /// Memory generation the override was made for
        memtype: MemoryType,
        /// The overridden field
        field: ElectricalField,
        /// The rejected symbolic value
        name: String,
    },
    /// A parameter the generation depends on was not supplied.
    #[error("{memtype} requires {parameter}")]
    MissingParameter {
        /// Memory generation that needs the parameter
        memtype: MemoryType,
        /// Name of the missing parameter
        parameter: &'static str,
    },
}

/// Result type of the generator.
pub type Result<T> = std::result::Result<T, Error>;
