//! Process-wide setup: logging and panic/error reporting. Called exactly
//! once, at the top of `main`.

use clap_verbosity_flag::{LogLevel, Verbosity};

/// Installs `env_logger` with a compact formatter (level, target, message —
/// no timestamp: index builds and alignment runs are invoked from scripts
/// that timestamp their own output) at the level selected by `-v`/`-q`.
pub fn setup_logger<L: LogLevel>(verbosity: &Verbosity<L>) {
  let level = verbosity.log_level_filter();
  env_logger::Builder::new()
    .filter_level(level)
    .format(|buf, record| {
      use std::io::Write as _;
      writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args())
    })
    .init();
}
