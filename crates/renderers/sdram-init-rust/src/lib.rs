//! Firmware Rust module renderer.
//!
//! Renders an [`InitSequence`](sdram_init_core::sequence::InitSequence) as a
//! `sdram_phy` module for Rust firmware, meant to be pulled in with
//! `include!`. The module talks to the DFI injector through the firmware's
//! generated `csr::dfii` accessors.

#![warn(missing_docs)]

mod module;

pub use module::RustModule;
