//! Telemetry domain identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the seven telemetry domains a report is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Logs,
    Endpoints,
    Devices,
    Tickets,
    Sessions,
    ThreatIntel,
    Analytics,
}

impl Domain {
    /// All domains in request order.
    pub const ALL: [Domain; 7] = [
        Domain::Logs,
        Domain::Endpoints,
        Domain::Devices,
        Domain::Tickets,
        Domain::Sessions,
        Domain::ThreatIntel,
        Domain::Analytics,
    ];

    /// Human-readable name used in report text.
    pub fn display_name(&self) -> &'static str {
        match self {
            Domain::Logs => "Log",
            Domain::Endpoints => "Endpoint",
            Domain::Devices => "Device",
            Domain::Tickets => "Ticket",
            Domain::Sessions => "Session",
            Domain::ThreatIntel => "Threat intelligence",
            Domain::Analytics => "Advanced analytics",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Logs => write!(f, "logs"),
            Domain::Endpoints => write!(f, "endpoints"),
            Domain::Devices => write!(f, "devices"),
            Domain::Tickets => write!(f, "tickets"),
            Domain::Sessions => write!(f, "sessions"),
            Domain::ThreatIntel => write!(f, "threat_intel"),
            Domain::Analytics => write!(f, "analytics"),
        }
    }
}
