//! # sdram-init
//!
//! sdram-init generates the power-up command sequence and the mode-register
//! values of SDR, DDR, LPDDR, DDR2, DDR3 and DDR4 memories, and renders them
//! into the artifacts firmware and host tools consume.
//!
//! ## Quickstart guide
//!
//! ```sh
//! cargo run --release --bin=sdram-init -- --config config/ddr3.json --format c
//! ```
//!
//! This prints the `sdram_phy.h` header for the DDR3 sample board. Use
//! `--format descriptor`, `--format rust` or `--format json` for the other
//! artifacts and `--output-dir` to write them to files.
//!
//! ## Modules
//!
//! - `electrical`, `mode_register`, `sequence`, `render`: settings, electrical
//!   resolver, mode-register encoders and the sequence builders from
//!   `sdram-init-core` (always present).
//! - `c`: firmware C header renderer (feature `c-header`, default).
//! - `descriptor`: host-side descriptor renderer (feature `descriptor`, default).
//! - `rust`: firmware Rust module renderer (feature `rust-module`).

pub use sdram_init_core::{
    ConfigError, Error, MemoryType, PhySettings, Result, SdramConfig, TimingSettings,
    build_init_sequence, electrical, mode_register, render, sequence,
};

#[cfg(feature = "c-header")]
pub use sdram_init_c as c;
#[cfg(feature = "descriptor")]
pub use sdram_init_descriptor as descriptor;
#[cfg(feature = "rust-module")]
pub use sdram_init_rust as rust;
