//! Raw telemetry request types.
//!
//! Everything here mirrors what upstream API clients hand over: every field
//! is optional, counts are signed so malformed negatives survive parsing,
//! and breakdowns are ordered maps so iteration is deterministic.

use crate::error::Result;
use crate::period::ReportPeriod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label → count breakdown as received.
pub type RawBreakdown = BTreeMap<String, i64>;

/// Log volume statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogInput {
    /// Total events ingested.
    pub total: Option<i64>,
    /// Events at major/critical level.
    pub major: Option<i64>,
    /// Events per level.
    pub by_level: RawBreakdown,
}

/// Endpoint agent health.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointInput {
    pub total: Option<i64>,
    pub active: Option<i64>,
    pub disconnected: Option<i64>,
    pub never_connected: Option<i64>,
    pub pending: Option<i64>,
    /// Agents per operating system.
    pub by_os: RawBreakdown,
}

/// Device inventory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceInput {
    pub total: Option<i64>,
    pub online: Option<i64>,
    pub offline: Option<i64>,
    /// Devices per type (firewall, switch, ...).
    pub by_type: RawBreakdown,
}

/// Ticket backlog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketInput {
    pub total: Option<i64>,
    pub open: Option<i64>,
    pub in_progress: Option<i64>,
    pub resolved: Option<i64>,
    pub by_priority: RawBreakdown,
}

/// Authentication session statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionInput {
    pub total: Option<i64>,
    pub successful: Option<i64>,
    pub failed: Option<i64>,
    pub blocked: Option<i64>,
    pub unique_users: Option<i64>,
    /// Sessions per service (VPN, SSH, portal, ...).
    pub by_service: RawBreakdown,
}

/// Threat-intelligence geography.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatIntelInput {
    pub total_events: Option<i64>,
    pub blocked: Option<i64>,
    pub unique_sources: Option<i64>,
    /// Events per source country.
    pub by_country: RawBreakdown,
}

/// Advanced analytics output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsInput {
    pub alerts: Option<i64>,
    pub anomalies: Option<i64>,
    pub false_positives: Option<i64>,
    pub mean_time_to_detect_minutes: Option<f64>,
    pub mean_time_to_respond_minutes: Option<f64>,
    /// Alerts per MITRE ATT&CK tactic.
    pub by_tactic: RawBreakdown,
}

/// One report-generation request: the period plus seven optional domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub period: ReportPeriod,
    #[serde(default)]
    pub logs: Option<LogInput>,
    #[serde(default)]
    pub endpoints: Option<EndpointInput>,
    #[serde(default)]
    pub devices: Option<DeviceInput>,
    #[serde(default)]
    pub tickets: Option<TicketInput>,
    #[serde(default)]
    pub sessions: Option<SessionInput>,
    #[serde(default)]
    pub threat_intel: Option<ThreatIntelInput>,
    #[serde(default)]
    pub analytics: Option<AnalyticsInput>,
}

impl ReportRequest {
    /// Create a request with no telemetry attached.
    pub fn new(period: ReportPeriod) -> Self {
        Self {
            period,
            logs: None,
            endpoints: None,
            devices: None,
            tickets: None,
            sessions: None,
            threat_intel: None,
            analytics: None,
        }
    }

    /// Load a request from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_logs(mut self, logs: LogInput) -> Self {
        self.logs = Some(logs);
        self
    }

    pub fn with_endpoints(mut self, endpoints: EndpointInput) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    pub fn with_devices(mut self, devices: DeviceInput) -> Self {
        self.devices = Some(devices);
        self
    }

    pub fn with_tickets(mut self, tickets: TicketInput) -> Self {
        self.tickets = Some(tickets);
        self
    }

    pub fn with_sessions(mut self, sessions: SessionInput) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn with_threat_intel(mut self, threat_intel: ThreatIntelInput) -> Self {
        self.threat_intel = Some(threat_intel);
        self
    }

    pub fn with_analytics(mut self, analytics: AnalyticsInput) -> Self {
        self.analytics = Some(analytics);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_request() {
        let json = r#"{
            "period": {"label": "Week 42", "start_date": "2026-10-12", "end_date": "2026-10-18"},
            "logs": {"total": 1000, "major": 120},
            "endpoints": {"total": 50, "active": 40}
        }"#;
        let request = ReportRequest::from_json(json).unwrap();
        let logs = request.logs.as_ref().unwrap();
        assert_eq!(logs.total, Some(1000));
        assert_eq!(logs.major, Some(120));
        assert!(logs.by_level.is_empty());
        assert_eq!(request.endpoints.as_ref().unwrap().disconnected, None);
        assert!(request.devices.is_none());
        assert!(request.analytics.is_none());
    }

    #[test]
    fn test_negative_counts_parse() {
        let json = r#"{
            "period": {"label": "x", "start_date": "2026-10-01", "end_date": "2026-10-02"},
            "tickets": {"total": -3, "by_priority": {"high": -1}}
        }"#;
        let request = ReportRequest::from_json(json).unwrap();
        let tickets = request.tickets.unwrap();
        assert_eq!(tickets.total, Some(-3));
        assert_eq!(tickets.by_priority.get("high"), Some(&-1));
    }

    #[test]
    fn test_missing_period_is_error() {
        let err = ReportRequest::from_json(r#"{"logs": {}}"#).unwrap_err();
        assert_eq!(err.code(), 21);
    }
}
