#![allow(clippy::multiple_crate_versions)]

//! Click2Hide - click a running app's Dock icon again to hide it.
//!
//! This binary serves as both the background daemon and the CLI:
//! - When called with no arguments or with `run`: starts the daemon
//! - When called with other subcommands (e.g., `click2hide disable`): runs
//!   the one-shot command and exits
//!
//! A running daemon watches the preferences file, so `enable`, `disable` and
//! `toggle` take effect without a restart.

fn main() {
    if let Err(err) = click2hide_lib::cli::run() {
        eprintln!("click2hide: {err}");
        std::process::exit(1);
    }
}
