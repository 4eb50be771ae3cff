//! Support code of the `sdram-init` command line front end.

#[macro_use]
extern crate log;

pub mod renderer;

/// Installs `env_logger`, logging at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    debug!("Logging initialized");
}
