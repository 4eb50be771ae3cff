use crate::error;
use crate::sequence::{InitSequence, build_init_sequence};
use crate::settings::{PhySettings, TimingSettings};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a board configuration.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}

/// Result type for [`SdramConfig`] loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Board SDRAM configuration: PHY and timing settings.
///
/// Loaded from JSON files of the form
///
/// ```json
/// {
///   "phy": {
///     "memtype": "DDR3", "cl": 7, "cwl": 6, "nphases": 4, "rdphase": 1, "wrphase": 2,
///     "electrical": {"rtt_wr": "120ohm"}
///   },
///   "timing": {"tWTR": 2}
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SdramConfig {
    /// PHY settings
    pub phy: PhySettings,
    /// Device timing settings
    pub timing: TimingSettings,
}

impl SdramConfig {
    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed, including an unknown
    /// memory type name.
    pub fn from_jsonfile<P: AsRef<Path>>(filepath: P) -> Result<SdramConfig> {
        let mut file = File::open(filepath.as_ref())?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let config: SdramConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Builds the init sequence for this configuration.
    pub fn init_sequence(&self) -> error::Result<InitSequence> {
        build_init_sequence(&self.phy, &self.timing)
    }
}
