//! Metrics normalizer.
//!
//! Turns a possibly-partial [`ReportRequest`] into [`NormalizedMetrics`] with
//! every field populated. Absent domains become all-zero bundles flagged as
//! unavailable, each recorded as a `MissingData` warning.

use crate::error::ReportWarning;
use sr_common::input::RawBreakdown;
use sr_common::metrics::round1;
use sr_common::{
    percentage, AnalyticsInput, AnalyticsMetrics, BreakdownEntry, DeviceInput, DeviceMetrics,
    EndpointInput, EndpointMetrics, LogInput, LogMetrics, NormalizedMetrics,
    ReportRequest, SessionInput, SessionMetrics, ThreatIntelInput, ThreatIntelMetrics,
    TicketInput, TicketMetrics,
};
use tracing::{debug, warn};

/// Output of normalization.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub metrics: NormalizedMetrics,
    pub warnings: Vec<ReportWarning>,
}

/// Normalize a request.
pub fn normalize(request: &ReportRequest) -> Normalized {
    let metrics = NormalizedMetrics {
        period: request.period.clone(),
        logs: request.logs.as_ref().map(normalize_logs).unwrap_or_default(),
        endpoints: request
            .endpoints
            .as_ref()
            .map(normalize_endpoints)
            .unwrap_or_default(),
        devices: request
            .devices
            .as_ref()
            .map(normalize_devices)
            .unwrap_or_default(),
        tickets: request
            .tickets
            .as_ref()
            .map(normalize_tickets)
            .unwrap_or_default(),
        sessions: request
            .sessions
            .as_ref()
            .map(normalize_sessions)
            .unwrap_or_default(),
        threat_intel: request
            .threat_intel
            .as_ref()
            .map(normalize_threat_intel)
            .unwrap_or_default(),
        analytics: request
            .analytics
            .as_ref()
            .map(normalize_analytics)
            .unwrap_or_default(),
    };

    let warnings: Vec<ReportWarning> = metrics
        .missing_domains()
        .into_iter()
        .map(|domain| {
            debug!(%domain, "domain absent; normalizing to zero");
            ReportWarning::MissingData { domain }
        })
        .collect();

    Normalized { metrics, warnings }
}

/// Clamp a raw count to a non-negative value, defaulting to 0.
fn count(field: &str, value: Option<i64>) -> u64 {
    match value {
        Some(v) if v < 0 => {
            warn!(field, value = v, "negative count clamped to 0");
            0
        }
        Some(v) => v as u64,
        None => 0,
    }
}

fn duration(field: &str, value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => round1(v),
        Some(v) => {
            warn!(field, value = v, "invalid duration replaced with 0");
            0.0
        }
        None => 0.0,
    }
}

/// Sorted breakdown: count descending, then label ascending.
fn breakdown(field: &str, raw: &RawBreakdown) -> Vec<BreakdownEntry> {
    let mut entries: Vec<(String, u64)> = Vec::with_capacity(raw.len());
    for (label, value) in raw {
        let label = label.trim();
        let label = if label.is_empty() { "Unknown" } else { label };
        let c = count(field, Some(*value));
        match entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, existing)) => *existing += c,
            None => entries.push((label.to_string(), c)),
        }
    }
    let sum: u64 = entries.iter().map(|(_, c)| *c).sum();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
        .into_iter()
        .map(|(label, count)| BreakdownEntry {
            pct: percentage(count, sum),
            label,
            count,
        })
        .collect()
}

fn normalize_logs(raw: &LogInput) -> LogMetrics {
    let total = count("logs.total", raw.total);
    let major = count("logs.major", raw.major);
    LogMetrics {
        available: true,
        total,
        major,
        minor: total.saturating_sub(major),
        major_pct: percentage(major, total),
        by_level: breakdown("logs.by_level", &raw.by_level),
    }
}

fn normalize_endpoints(raw: &EndpointInput) -> EndpointMetrics {
    let total = count("endpoints.total", raw.total);
    let active = count("endpoints.active", raw.active);
    let disconnected = count("endpoints.disconnected", raw.disconnected);
    let never_connected = count("endpoints.never_connected", raw.never_connected);
    EndpointMetrics {
        available: true,
        total,
        active,
        disconnected,
        never_connected,
        pending: count("endpoints.pending", raw.pending),
        active_pct: percentage(active, total),
        disconnected_pct: percentage(disconnected, total),
        never_connected_pct: percentage(never_connected, total),
        by_os: breakdown("endpoints.by_os", &raw.by_os),
    }
}

fn normalize_devices(raw: &DeviceInput) -> DeviceMetrics {
    let total = count("devices.total", raw.total);
    let online = count("devices.online", raw.online);
    let offline = count("devices.offline", raw.offline);
    DeviceMetrics {
        available: true,
        total,
        online,
        offline,
        online_pct: percentage(online, total),
        offline_pct: percentage(offline, total),
        by_type: breakdown("devices.by_type", &raw.by_type),
    }
}

fn normalize_tickets(raw: &TicketInput) -> TicketMetrics {
    let total = count("tickets.total", raw.total);
    let open = count("tickets.open", raw.open);
    let resolved = count("tickets.resolved", raw.resolved);
    TicketMetrics {
        available: true,
        total,
        open,
        in_progress: count("tickets.in_progress", raw.in_progress),
        resolved,
        open_pct: percentage(open, total),
        resolved_pct: percentage(resolved, total),
        by_priority: breakdown("tickets.by_priority", &raw.by_priority),
    }
}

fn normalize_sessions(raw: &SessionInput) -> SessionMetrics {
    let total = count("sessions.total", raw.total);
    let successful = count("sessions.successful", raw.successful);
    let failed = count("sessions.failed", raw.failed);
    let blocked = count("sessions.blocked", raw.blocked);
    SessionMetrics {
        available: true,
        total,
        successful,
        failed,
        blocked,
        unique_users: count("sessions.unique_users", raw.unique_users),
        success_pct: percentage(successful, total),
        failed_pct: percentage(failed, total),
        blocked_pct: percentage(blocked, total),
        by_service: breakdown("sessions.by_service", &raw.by_service),
    }
}

fn normalize_threat_intel(raw: &ThreatIntelInput) -> ThreatIntelMetrics {
    let total_events = count("threat_intel.total_events", raw.total_events);
    let blocked = count("threat_intel.blocked", raw.blocked);
    ThreatIntelMetrics {
        available: true,
        total_events,
        blocked,
        unique_sources: count("threat_intel.unique_sources", raw.unique_sources),
        blocked_pct: percentage(blocked, total_events),
        by_country: breakdown("threat_intel.by_country", &raw.by_country),
    }
}

fn normalize_analytics(raw: &AnalyticsInput) -> AnalyticsMetrics {
    let alerts = count("analytics.alerts", raw.alerts);
    let false_positives = count("analytics.false_positives", raw.false_positives);
    AnalyticsMetrics {
        available: true,
        alerts,
        anomalies: count("analytics.anomalies", raw.anomalies),
        false_positives,
        false_positive_pct: percentage(false_positives, alerts),
        mean_time_to_detect_minutes: duration(
            "analytics.mean_time_to_detect_minutes",
            raw.mean_time_to_detect_minutes,
        ),
        mean_time_to_respond_minutes: duration(
            "analytics.mean_time_to_respond_minutes",
            raw.mean_time_to_respond_minutes,
        ),
        by_tactic: breakdown("analytics.by_tactic", &raw.by_tactic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sr_common::ReportPeriod;

    fn period() -> ReportPeriod {
        ReportPeriod::new(
            "October 2026",
            NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
        )
    }

    #[test]
    fn test_all_absent_is_all_zero() {
        let out = normalize(&ReportRequest::new(period()));
        assert!(out.metrics.is_empty());
        assert_eq!(out.warnings.len(), 7);
        assert!(out.warnings.iter().all(|w| w.is_missing_data()));
        assert_eq!(out.metrics.logs.total, 0);
        assert_eq!(out.metrics.logs.major_pct, 0.0);
        assert_eq!(out.metrics.endpoints.active_pct, 0.0);
    }

    #[test]
    fn test_zero_totals_give_zero_percentages() {
        let request = ReportRequest::new(period())
            .with_logs(LogInput {
                total: Some(0),
                major: Some(5),
                ..Default::default()
            })
            .with_sessions(SessionInput {
                total: Some(0),
                failed: Some(3),
                blocked: Some(2),
                ..Default::default()
            })
            .with_analytics(AnalyticsInput {
                alerts: Some(0),
                false_positives: Some(1),
                ..Default::default()
            });
        let m = normalize(&request).metrics;
        assert_eq!(m.logs.major_pct, 0.0);
        assert_eq!(m.logs.minor, 0);
        assert_eq!(m.sessions.failed_pct, 0.0);
        assert_eq!(m.sessions.blocked_pct, 0.0);
        assert_eq!(m.analytics.false_positive_pct, 0.0);
    }

    #[test]
    fn test_scenario_rates() {
        let request = ReportRequest::new(period())
            .with_logs(LogInput {
                total: Some(1000),
                major: Some(120),
                ..Default::default()
            })
            .with_endpoints(EndpointInput {
                total: Some(50),
                active: Some(40),
                ..Default::default()
            });
        let out = normalize(&request);
        assert_eq!(out.metrics.logs.major_pct, 12.0);
        assert_eq!(out.metrics.logs.minor, 880);
        assert_eq!(out.metrics.endpoints.active_pct, 80.0);
        assert_eq!(out.metrics.endpoints.disconnected, 0);
        assert_eq!(out.warnings.len(), 5);
    }

    #[test]
    fn test_negative_counts_clamped() {
        let request = ReportRequest::new(period()).with_tickets(TicketInput {
            total: Some(-10),
            open: Some(4),
            ..Default::default()
        });
        let tickets = normalize(&request).metrics.tickets;
        assert_eq!(tickets.total, 0);
        assert_eq!(tickets.open, 4);
        assert_eq!(tickets.open_pct, 0.0);
    }

    #[test]
    fn test_breakdown_sorted_and_merged() {
        let mut by_country = RawBreakdown::new();
        by_country.insert("US".to_string(), 30);
        by_country.insert("CN".to_string(), 50);
        by_country.insert("DE".to_string(), 30);
        by_country.insert("".to_string(), 5);
        by_country.insert("  ".to_string(), 5);
        by_country.insert("RU".to_string(), -2);
        let request = ReportRequest::new(period()).with_threat_intel(ThreatIntelInput {
            total_events: Some(120),
            by_country,
            ..Default::default()
        });
        let threat = normalize(&request).metrics.threat_intel;
        let labels: Vec<&str> = threat.by_country.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["CN", "DE", "US", "Unknown", "RU"]);
        assert_eq!(threat.by_country[3].count, 10);
        assert_eq!(threat.by_country[0].pct, 41.7);
        assert_eq!(threat.top_country().unwrap().label, "CN");
    }

    #[test]
    fn test_invalid_durations() {
        let request = ReportRequest::new(period()).with_analytics(AnalyticsInput {
            mean_time_to_detect_minutes: Some(f64::NAN),
            mean_time_to_respond_minutes: Some(-4.0),
            ..Default::default()
        });
        let analytics = normalize(&request).metrics.analytics;
        assert_eq!(analytics.mean_time_to_detect_minutes, 0.0);
        assert_eq!(analytics.mean_time_to_respond_minutes, 0.0);
        assert!(analytics.available);
    }
}
