//! Error types shared across the engine.
//!
//! Placement rejections are ordinary values: they occur on every invalid
//! pointer position during a live gesture. Configuration errors are fatal for
//! the timeline they concern.

use std::path::PathBuf;

use thiserror::Error;

/// Why a create or resize request was refused. Never leaves a store mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementRejection {
    #[error("interval shorter than the minimum duration")]
    TooShort,

    #[error("interval outside the 04:00-04:00 window")]
    OutOfBounds,

    #[error("interval overlaps {with}")]
    Overlaps { with: String },

    #[error("no interval with id {id}")]
    UnknownInterval { id: String },
}

impl PlacementRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementRejection::TooShort => "too_short",
            PlacementRejection::OutOfBounds => "out_of_bounds",
            PlacementRejection::Overlaps { .. } => "overlaps",
            PlacementRejection::UnknownInterval { .. } => "unknown_interval",
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Malformed, missing or unreachable timeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("[CFG-1001] failed to read configuration at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[CFG-1002] configuration parse failure in {context}: {details}")]
    Parse {
        context: &'static str,
        details: String,
    },

    #[error("[CFG-1003] invalid timeline {key}: {details}")]
    Invalid { key: String, details: String },

    #[error("[CFG-1004] timeline {key} is not defined")]
    MissingTimeline { key: String },

    #[error("[CFG-1005] requested timeline {expected} but received {actual}")]
    KeyMismatch { expected: String, actual: String },

    #[error("[CFG-1006] configuration defines no timelines")]
    NoTimelines,

    #[error("[CFG-1007] invalid engine settings: {details}")]
    Settings { details: String },
}

impl ConfigError {
    /// Stable machine-parseable error code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "CFG-1001",
            Self::Parse { .. } => "CFG-1002",
            Self::Invalid { .. } => "CFG-1003",
            Self::MissingTimeline { .. } => "CFG-1004",
            Self::KeyMismatch { .. } => "CFG-1005",
            Self::NoTimelines => "CFG-1006",
            Self::Settings { .. } => "CFG-1007",
        }
    }

    pub fn invalid(key: &str, details: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_string(),
            details: details.into(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}
