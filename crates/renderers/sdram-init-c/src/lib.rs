//! Firmware C header renderer.
//!
//! Renders an [`InitSequence`](sdram_init_core::sequence::InitSequence) into the
//! `sdram_phy.h` header consumed by the BIOS: DFI injector helpers for every
//! phase, the per-phase data address tables, `DDRX_MR1` for DDR3/DDR4 and an
//! `init_sequence()` routine replaying the steps.
//!
//! Implements the [`sdram_init_core::render::SequenceRenderer`] trait.

#![warn(missing_docs)]

mod header;

pub use header::CHeader;
