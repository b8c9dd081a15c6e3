use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{DemoError, Result};

/// Pinch out past the threshold, then start pinching in and back off.
pub const DEFAULT_SCRIPT: &str =
    "began; changed 1.3; changed 2.0; ended; began; changed 0.8; changed 0.9; ended";

/// Longest settle frame accepted by `--frame-ms`.
pub const MAX_FRAME_MS: u64 = 1_000;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "pgrid-demo",
    about = "Replay pinch gestures against a simulated grid and report where it lands",
    version
)]
pub struct Cli {
    /// Transition policy file (TOML, or JSON with a .json extension).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Pinch script, e.g. "began; changed 1.4; changed 2.0; ended".
    #[arg(long, default_value = DEFAULT_SCRIPT)]
    pub script: String,

    /// Settle animation frame length in milliseconds (1 to 1000).
    #[arg(long, default_value_t = 16)]
    pub frame_ms: u64,

    /// Frames the host may spend settling after each gesture.
    #[arg(long, default_value_t = 600)]
    pub max_frames: usize,

    /// Print reports as JSON.
    #[arg(long)]
    pub json: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// List the catalog's layouts and exit.
    #[arg(long, conflicts_with_all = ["preview", "print_policy"])]
    pub layouts: bool,

    /// Show what a pinch at SCALE would do from the initial layout, and exit.
    #[arg(
        long,
        value_name = "SCALE",
        allow_negative_numbers = true,
        conflicts_with = "print_policy"
    )]
    pub preview: Option<f64>,

    /// Print the effective policy as TOML and exit.
    #[arg(long)]
    pub print_policy: bool,
}

/// What a run should do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Replay,
    Layouts,
    Preview(f64),
    PrintPolicy,
}

impl Cli {
    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.layouts {
            Mode::Layouts
        } else if let Some(scale) = self.preview {
            Mode::Preview(scale)
        } else if self.print_policy {
            Mode::PrintPolicy
        } else {
            Mode::Replay
        }
    }

    pub fn frame(&self) -> Result<Duration> {
        if self.frame_ms == 0 {
            return Err(DemoError::invalid("--frame-ms must be > 0"));
        }
        if self.frame_ms > MAX_FRAME_MS {
            return Err(DemoError::invalid(format!(
                "--frame-ms must be at most {MAX_FRAME_MS}, got {}",
                self.frame_ms
            )));
        }
        Ok(Duration::from_millis(self.frame_ms))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, DEFAULT_SCRIPT, MAX_FRAME_MS, Mode};

    #[test]
    fn defaults_replay_the_built_in_script() {
        let cli = Cli::try_parse_from(["pgrid-demo"]).unwrap();
        assert_eq!(cli.mode(), Mode::Replay);
        assert_eq!(cli.script, DEFAULT_SCRIPT);
        assert_eq!(cli.frame().unwrap().as_millis(), 16);
        assert_eq!(cli.log_level, "warn");
        assert!(cli.config.is_none());
    }

    #[test]
    fn replay_flags_parse() {
        let cli = Cli::try_parse_from([
            "pgrid-demo",
            "--script",
            "began; changed 0.4; ended",
            "--frame-ms",
            "8",
            "--json",
            "--config",
            "policy.toml",
        ])
        .unwrap();
        assert_eq!(cli.script, "began; changed 0.4; ended");
        assert_eq!(cli.frame().unwrap().as_millis(), 8);
        assert!(cli.json);
        assert_eq!(cli.config.unwrap().to_str(), Some("policy.toml"));
    }

    #[test]
    fn zero_frame_is_rejected() {
        let cli = Cli::try_parse_from(["pgrid-demo", "--frame-ms", "0"]).unwrap();
        assert_eq!(cli.frame().unwrap_err().exit_code(), 2);
    }

    #[test]
    fn oversized_frame_is_rejected() {
        let cli = Cli::try_parse_from(["pgrid-demo", "--frame-ms", "18446744073709551615"]).unwrap();
        assert_eq!(cli.frame().unwrap_err().exit_code(), 2);

        let limit = MAX_FRAME_MS.to_string();
        let cli = Cli::try_parse_from(["pgrid-demo", "--frame-ms", limit.as_str()]).unwrap();
        assert_eq!(cli.frame().unwrap().as_millis(), u128::from(MAX_FRAME_MS));
    }

    #[test]
    fn one_exit_mode_at_a_time() {
        assert!(Cli::try_parse_from(["pgrid-demo", "--layouts", "--preview", "2"]).is_err());
        let cli = Cli::try_parse_from(["pgrid-demo", "--preview", "0.5"]).unwrap();
        assert_eq!(cli.mode(), Mode::Preview(0.5));
        let cli = Cli::try_parse_from(["pgrid-demo", "--print-policy"]).unwrap();
        assert_eq!(cli.mode(), Mode::PrintPolicy);
    }
}
