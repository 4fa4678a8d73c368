//! Normalized metric bundles.
//!
//! Every field here is populated: counts default to 0, percentages are
//! rounded to one decimal, and a domain that was absent from the request is
//! present with `available == false`.

use crate::domain::Domain;
use crate::period::ReportPeriod;
use serde::{Deserialize, Serialize};

/// Exact percentage of `part` in `whole`, for threshold comparisons.
///
/// Returns 0 when `whole` is 0.
pub fn ratio_pct(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Percentage of `part` in `whole`, rounded to one decimal for display.
///
/// Returns 0 when `whole` is 0.
pub fn percentage(part: u64, whole: u64) -> f64 {
    round1(ratio_pct(part, whole))
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One row of a label → count breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub count: u64,
    /// Share of the breakdown's own sum.
    pub pct: f64,
}

/// Sum of all counts in a breakdown.
pub fn breakdown_total(entries: &[BreakdownEntry]) -> u64 {
    entries.iter().map(|e| e.count).sum()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogMetrics {
    pub available: bool,
    pub total: u64,
    pub major: u64,
    /// Events below major level.
    pub minor: u64,
    pub major_pct: f64,
    pub by_level: Vec<BreakdownEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointMetrics {
    pub available: bool,
    pub total: u64,
    pub active: u64,
    pub disconnected: u64,
    pub never_connected: u64,
    pub pending: u64,
    pub active_pct: f64,
    pub disconnected_pct: f64,
    pub never_connected_pct: f64,
    pub by_os: Vec<BreakdownEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceMetrics {
    pub available: bool,
    pub total: u64,
    pub online: u64,
    pub offline: u64,
    pub online_pct: f64,
    pub offline_pct: f64,
    pub by_type: Vec<BreakdownEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketMetrics {
    pub available: bool,
    pub total: u64,
    pub open: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub open_pct: f64,
    pub resolved_pct: f64,
    pub by_priority: Vec<BreakdownEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub available: bool,
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub blocked: u64,
    pub unique_users: u64,
    pub success_pct: f64,
    pub failed_pct: f64,
    pub blocked_pct: f64,
    pub by_service: Vec<BreakdownEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreatIntelMetrics {
    pub available: bool,
    pub total_events: u64,
    pub blocked: u64,
    pub unique_sources: u64,
    pub blocked_pct: f64,
    pub by_country: Vec<BreakdownEntry>,
}

impl ThreatIntelMetrics {
    /// The country contributing the most events, if any.
    pub fn top_country(&self) -> Option<&BreakdownEntry> {
        self.by_country.first().filter(|e| e.count > 0)
    }

    /// Unrounded share of the top country in the country breakdown.
    pub fn top_country_share(&self) -> f64 {
        self.top_country().map_or(0.0, |c| {
            ratio_pct(c.count, breakdown_total(&self.by_country))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsMetrics {
    pub available: bool,
    pub alerts: u64,
    pub anomalies: u64,
    pub false_positives: u64,
    pub false_positive_pct: f64,
    pub mean_time_to_detect_minutes: f64,
    pub mean_time_to_respond_minutes: f64,
    pub by_tactic: Vec<BreakdownEntry>,
}

/// Fully populated telemetry for one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetrics {
    pub period: ReportPeriod,
    pub logs: LogMetrics,
    pub endpoints: EndpointMetrics,
    pub devices: DeviceMetrics,
    pub tickets: TicketMetrics,
    pub sessions: SessionMetrics,
    pub threat_intel: ThreatIntelMetrics,
    pub analytics: AnalyticsMetrics,
}

impl NormalizedMetrics {
    /// Whether the given domain was present in the request.
    pub fn is_available(&self, domain: Domain) -> bool {
        match domain {
            Domain::Logs => self.logs.available,
            Domain::Endpoints => self.endpoints.available,
            Domain::Devices => self.devices.available,
            Domain::Tickets => self.tickets.available,
            Domain::Sessions => self.sessions.available,
            Domain::ThreatIntel => self.threat_intel.available,
            Domain::Analytics => self.analytics.available,
        }
    }

    /// Domains absent from the request, in request order.
    pub fn missing_domains(&self) -> Vec<Domain> {
        Domain::ALL
            .into_iter()
            .filter(|d| !self.is_available(*d))
            .collect()
    }

    /// True when no domain carried any data.
    pub fn is_empty(&self) -> bool {
        Domain::ALL.iter().all(|d| !self.is_available(*d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_zero_denominator() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(17, 0), 0.0);
    }

    #[test]
    fn test_ratio_pct_is_unrounded() {
        assert_eq!(ratio_pct(0, 0), 0.0);
        assert!(ratio_pct(1004, 10_000) > 10.0);
        assert_eq!(percentage(1004, 10_000), 10.0);
        assert!(ratio_pct(7996, 10_000) < 80.0);
        assert_eq!(percentage(7996, 10_000), 80.0);
    }

    #[test]
    fn test_top_country_share() {
        let intel = ThreatIntelMetrics {
            available: true,
            by_country: vec![
                BreakdownEntry { label: "NL".into(), count: 5004, pct: 50.0 },
                BreakdownEntry { label: "DE".into(), count: 4996, pct: 50.0 },
            ],
            ..Default::default()
        };
        assert!((intel.top_country_share() - 50.04).abs() < 1e-9);
        assert_eq!(ThreatIntelMetrics::default().top_country_share(), 0.0);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(120, 1000), 12.0);
        assert_eq!(percentage(40, 50), 80.0);
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
    }

    #[test]
    fn test_top_country_skips_zero() {
        let mut threat = ThreatIntelMetrics::default();
        assert!(threat.top_country().is_none());
        threat.by_country.push(BreakdownEntry {
            label: "NL".to_string(),
            count: 0,
            pct: 0.0,
        });
        assert!(threat.top_country().is_none());
    }
}
