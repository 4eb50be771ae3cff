//! Host-side init sequence descriptor renderer.
//!
//! Renders an [`InitSequence`](sdram_init_core::sequence::InitSequence) as a
//! Python data file (`sdram_init.py`) holding the DFI flag constants, the MR1
//! value of DDR3/DDR4 and the step list as
//! `(label, address, bank_address, command, delay)` tuples. Host tools load it
//! to replay or patch the sequence, e.g. around a write-leveling scan.

#![warn(missing_docs)]

mod descriptor;

pub use descriptor::Descriptor;
