//! Serialization of an [`InitSequence`] into a target artifact.

use crate::sequence::InitSequence;
use crate::settings::PhySettings;

/// Turns one built sequence into the text of an artifact.
///
/// Implementations own their formatting rules. They receive a sequence that
/// already passed every legality check and settings with validated phase
/// indices, so rendering cannot fail.
pub trait SequenceRenderer {
    /// Short name used to select the renderer, e.g. `"c"`.
    fn name(&self) -> &'static str;

    /// File name the artifact is conventionally written to.
    fn file_name(&self) -> &'static str;

    /// Renders `sequence` for the PHY described by `phy`.
    fn render(&self, phy: &PhySettings, sequence: &InitSequence) -> String;
}
