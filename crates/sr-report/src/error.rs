//! Error and warning types for report generation.

use crate::charts::ChartSlot;
use crate::sections::SectionKind;
use serde::{Deserialize, Serialize};
use sr_common::Domain;
use std::fmt;
use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors raised by the page cursor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A dimension was NaN or infinite.
    #[error("{what} is not finite ({value})")]
    NonFinite { what: &'static str, value: f32 },

    /// A dimension that must be positive was zero or negative.
    #[error("{what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f32 },
}

/// Fatal errors. Any of these means no document was produced.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A section writer failed; the whole generation is aborted.
    #[error("section '{section}' failed: {source}")]
    SectionFailure {
        section: SectionKind,
        #[source]
        source: LayoutError,
    },

    /// The assembled document could not be encoded.
    #[error("failed to serialize document: {0}")]
    Serialization(#[from] lopdf::Error),

    /// Request data was rejected before composition started.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] sr_common::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ReportError {
    /// Pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            ReportError::SectionFailure { .. } => "section",
            ReportError::Serialization(_) => "serialize",
            ReportError::InvalidRequest(_) | ReportError::JsonError(_) => "request",
            ReportError::InvalidConfig(_) => "config",
        }
    }

    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ReportError::InvalidConfig(_) => 10,
            ReportError::InvalidRequest(_) => 20,
            ReportError::JsonError(_) => 21,
            ReportError::SectionFailure { .. } => 30,
            ReportError::Serialization(_) => 40,
        }
    }

    /// Failing section, if the error came from a writer.
    pub fn section(&self) -> Option<SectionKind> {
        match self {
            ReportError::SectionFailure { section, .. } => Some(*section),
            _ => None,
        }
    }
}

/// Non-fatal conditions recorded while generating a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportWarning {
    /// A telemetry domain was absent and rendered as a placeholder.
    MissingData { domain: Domain },
    /// A chart slot fell back to text.
    ImageUnavailable { slot: ChartSlot, reason: String },
}

impl ReportWarning {
    pub fn is_missing_data(&self) -> bool {
        matches!(self, ReportWarning::MissingData { .. })
    }

    pub fn is_image_unavailable(&self) -> bool {
        matches!(self, ReportWarning::ImageUnavailable { .. })
    }
}

impl fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportWarning::MissingData { domain } => {
                write!(f, "{} data missing; rendered as placeholder", domain)
            }
            ReportWarning::ImageUnavailable { slot, reason } => {
                write!(f, "chart '{}' unavailable: {}", slot, reason)
            }
        }
    }
}
