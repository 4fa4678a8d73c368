//! Security report shared types.
//!
//! This crate provides the data model shared by the report engine:
//! - Report period and filename derivation
//! - Telemetry domain identifiers
//! - Raw (possibly partial) telemetry request types
//! - Normalized metric bundles and safe percentage arithmetic

pub mod domain;
pub mod error;
pub mod input;
pub mod metrics;
pub mod period;

pub use domain::Domain;
pub use error::{Error, Result};
pub use input::{
    AnalyticsInput, DeviceInput, EndpointInput, LogInput, ReportRequest, SessionInput,
    ThreatIntelInput, TicketInput,
};
pub use metrics::{
    percentage, ratio_pct, round1, AnalyticsMetrics, BreakdownEntry, DeviceMetrics,
    EndpointMetrics, LogMetrics, NormalizedMetrics, SessionMetrics, ThreatIntelMetrics,
    TicketMetrics,
};
pub use period::ReportPeriod;
