//! # SDRAM Init Core
//!
//! `sdram-init-core` turns a declarative description of a memory PHY into the
//! command sequence that brings an SDR/DDR-family device out of reset, and into
//! the bit-packed mode-register values that sequence programs.
//!
//! ## Architecture Overview
//!
//! The generator is a pure, build-time transform built from four parts:
//!
//! - [`electrical`] - Resolves symbolic termination and drive-strength settings
//!   (`"60ohm"`, `"34ohm"`, ...) into the generation-specific codes, applying the
//!   per-generation defaults.
//!
//! - [`mode_register`] - One encoder/decoder module per memory generation packing
//!   logical parameters (CAS latency, burst length, write recovery, ...) into the
//!   JEDEC register layouts.
//!
//! - [`sequence`] - The [`InitStep`](sequence::InitStep) model and the
//!   [`Generation`](sequence::Generation) implementations assembling the ordered
//!   power-up protocol of each memory generation.
//!
//! - [`render::SequenceRenderer`] - The interface renderer crates implement to
//!   serialize one [`InitSequence`](sequence::InitSequence) into an artifact.
//!
//! ## Main Entry Points
//!
//! - [`build_init_sequence`] - Builds the sequence for a [`PhySettings`] /
//!   [`TimingSettings`] pair.
//! - [`SdramConfig`] - Loads both settings records from a JSON file.
//!
//! All legality checks happen while building the sequence. Renderers never fail.

#![warn(missing_docs)]

mod config;
pub mod electrical;
mod error;
pub mod mode_register;
pub mod render;
pub mod sequence;
mod settings;

pub use crate::config::{ConfigError, SdramConfig};
pub use crate::error::{Error, Result};
pub use crate::sequence::build_init_sequence;
pub use crate::settings::{MemoryType, PhySettings, TimingSettings};
