//! Stderr diagnostics
//!
//! Records are written as the bare message so error lines read like
//! `[Parent] read() failed/short: ...`. The level comes from the command
//! line only; `RUST_LOG` is not consulted.

use log::LevelFilter;
use std::io::Write;

/// Install the global logger; a second call is a no-op
pub fn init(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .try_init();
}
