use pgrid_core::TransitionError;
use pgrid_harness::ScriptError;
use pgrid_layout::LayoutError;
use pgrid_runtime::PolicyConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("policy error: {0}")]
    Policy(#[from] PolicyConfigError),

    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("invalid pinch: {0}")]
    Transition(#[from] TransitionError),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl DemoError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } | Self::Script(_) | Self::Transition(_) => 2,
            Self::Policy(_) | Self::Layout(_) => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
