#![forbid(unsafe_code)]

//! Policy-as-data configuration for pinch transitions.
//!
//! Captures every tunable of the catalog and the controller as a single
//! [`TransitionPolicy`] that can be loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # pgrid-policy.toml
//! [catalog]
//! columns = [17, 11, 9, 7, 5, 3, 1]
//! initial_index = 2
//! container_width = 390.0
//!
//! [transition]
//! commit_threshold = 0.5
//! ```
//!
//! ```rust,ignore
//! let policy = TransitionPolicy::from_toml_file("pgrid-policy.toml")?;
//! let controller = policy.build_controller(host)?;
//! ```
//!
//! # Defaults
//!
//! `TransitionPolicy::default()` is a phone-width grid of 200 items moving
//! through 17, 11, 9, 7, 5, 3 and 1 columns, starting at 9, with a 0.5
//! commit threshold.

#[cfg(feature = "policy-config")]
use std::path::Path;

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};

use pgrid_layout::{LayoutCatalog, LayoutError};

use crate::controller::{DEFAULT_COMMIT_THRESHOLD, TransitionController};
use crate::host::HostSurface;

// ---------------------------------------------------------------------------
// Top-level TransitionPolicy
// ---------------------------------------------------------------------------

/// Top-level policy for a pinch-driven grid.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct TransitionPolicy {
    /// Layout catalog parameters.
    pub catalog: CatalogPolicyConfig,

    /// Controller parameters.
    pub transition: TransitionPolicyConfig,
}

impl TransitionPolicy {
    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, PolicyConfigError> {
        toml::from_str(s).map_err(PolicyConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PolicyConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PolicyConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, PolicyConfigError> {
        serde_json::from_str(s).map_err(PolicyConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PolicyConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PolicyConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the policy
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let catalog = &self.catalog;

        if catalog.columns.is_empty() {
            errors.push("catalog.columns must not be empty".into());
        }
        if catalog.columns.contains(&0) {
            errors.push("catalog.columns entries must be > 0".into());
        }
        if !catalog.columns.is_empty() && catalog.initial_index >= catalog.columns.len() {
            errors.push(format!(
                "catalog.initial_index must be < {}, got {}",
                catalog.columns.len(),
                catalog.initial_index
            ));
        }
        if !catalog.container_width.is_finite() || catalog.container_width <= 0.0 {
            errors.push(format!(
                "catalog.container_width must be > 0, got {}",
                catalog.container_width
            ));
        }
        if !catalog.spacing.is_finite() || catalog.spacing < 0.0 {
            errors.push(format!(
                "catalog.spacing must be >= 0, got {}",
                catalog.spacing
            ));
        }

        let threshold = self.transition.commit_threshold;
        if !(0.0..1.0).contains(&threshold) {
            errors.push(format!(
                "transition.commit_threshold must be in [0, 1), got {threshold}"
            ));
        }

        errors
    }

    /// Validate, then build the layout catalog.
    pub fn build_catalog(&self) -> Result<LayoutCatalog, PolicyConfigError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(PolicyConfigError::Validation(errors));
        }
        let c = &self.catalog;
        LayoutCatalog::from_columns(&c.columns, c.container_width, c.spacing, c.initial_index)
            .map_err(PolicyConfigError::Layout)
    }

    /// Validate, then build an idle controller driving `host`.
    pub fn build_controller<H: HostSurface>(
        &self,
        host: H,
    ) -> Result<TransitionController<H>, PolicyConfigError> {
        let catalog = self.build_catalog()?;
        Ok(TransitionController::new(catalog, host)
            .with_commit_threshold(self.transition.commit_threshold))
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Layout catalog parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct CatalogPolicyConfig {
    /// Column count of each layout, in pinch-out order. Default: [17, 11, 9, 7, 5, 3, 1].
    pub columns: Vec<u16>,
    /// Layout displayed at startup. Default: 2.
    pub initial_index: usize,
    /// Width the grid fills, in points. Default: 390.0.
    pub container_width: f64,
    /// Gap between items and between rows. Default: 1.0.
    pub spacing: f64,
    /// Items in the collection. Default: 200.
    pub item_count: usize,
}

impl Default for CatalogPolicyConfig {
    fn default() -> Self {
        Self {
            columns: vec![17, 11, 9, 7, 5, 3, 1],
            initial_index: 2,
            container_width: 390.0,
            spacing: 1.0,
            item_count: 200,
        }
    }
}

/// Transition controller parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct TransitionPolicyConfig {
    /// Progress strictly above which a release commits. Default: 0.5.
    pub commit_threshold: f64,
}

impl Default for TransitionPolicyConfig {
    fn default() -> Self {
        Self {
            commit_threshold: DEFAULT_COMMIT_THRESHOLD,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading or applying a transition policy.
#[derive(Debug)]
pub enum PolicyConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "policy-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
    /// The catalog geometry could not be built.
    Layout(LayoutError),
}

impl std::fmt::Display for PolicyConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
            Self::Layout(e) => write!(f, "layout error: {e}"),
        }
    }
}

impl std::error::Error for PolicyConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
            Self::Layout(e) => Some(e),
        }
    }
}

impl From<LayoutError> for PolicyConfigError {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}
