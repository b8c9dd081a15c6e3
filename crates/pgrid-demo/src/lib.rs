#![forbid(unsafe_code)]

//! Headless PinchGrid demo.
//!
//! Replays a pinch script against a [`SimulatedHost`](pgrid_harness::SimulatedHost),
//! settling the host's animation after every gesture, and reports the layout
//! the grid lands on. `--layouts`, `--preview` and `--print-policy` inspect the
//! configured catalog without replaying anything.

pub mod cli;
pub mod error;
pub mod run;

use clap::Parser;

pub use cli::Cli;
pub use error::{DemoError, Result};

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run::init_logging(&cli.log_level);
    let stdout = std::io::stdout();
    run::run(&cli, &mut stdout.lock())
}
