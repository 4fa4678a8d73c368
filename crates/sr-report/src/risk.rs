//! Risk classifier.
//!
//! Maps normalized metrics to a three-tier level. Clauses are evaluated in
//! order and the first match wins:
//!
//! | Level  | Condition                                             |
//! |--------|-------------------------------------------------------|
//! | High   | critical rate > high threshold OR health < high floor  |
//! | Medium | critical rate > medium threshold OR health < medium floor |
//! | Low    | otherwise                                             |

use crate::config::RiskThresholds;
use serde::{Deserialize, Serialize};
use sr_common::{ratio_pct, round1, NormalizedMetrics};
use std::fmt;

/// Qualitative risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metric a risk factor refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskMetric {
    CriticalEventRate,
    EndpointHealth,
}

/// One threshold crossed by the assessed metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub metric: RiskMetric,
    pub value: f64,
    pub threshold: f64,
    /// Level this crossing implies on its own.
    pub level: RiskLevel,
}

impl RiskFactor {
    /// Sentence used in the executive summary.
    pub fn describe(&self) -> String {
        match self.metric {
            RiskMetric::CriticalEventRate => format!(
                "Critical event rate {:.1}% exceeds the {:.1}% {} threshold",
                self.value,
                self.threshold,
                self.level.label().to_lowercase()
            ),
            RiskMetric::EndpointHealth => format!(
                "Endpoint health {:.1}% is below the {:.1}% {} threshold",
                self.value,
                self.threshold,
                self.level.label().to_lowercase()
            ),
        }
    }
}

/// Result of classification. Derived per call, never stored.
///
/// Rates are rounded to one decimal for display. Classification itself
/// compares the unrounded ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    /// Major events as a percentage of all events.
    pub critical_event_rate: f64,
    /// Active endpoints as a percentage of all endpoints. 0 with no endpoints.
    pub endpoint_health: f64,
    /// Every threshold crossed, most severe first.
    pub factors: Vec<RiskFactor>,
}

impl RiskAssessment {
    /// One-line explanation of the level.
    pub fn summary(&self) -> String {
        match self.factors.first() {
            Some(factor) => format!(
                "Overall risk is {}: {}.",
                self.level,
                factor.describe().to_lowercase()
            ),
            None => format!(
                "Overall risk is {}: no monitored threshold was crossed.",
                self.level
            ),
        }
    }
}

/// Classify from the two unrounded rates.
pub fn classify_rates(
    critical_event_rate: f64,
    endpoint_health: f64,
    thresholds: &RiskThresholds,
) -> RiskAssessment {
    let level = if critical_event_rate > thresholds.high_critical_rate
        || endpoint_health < thresholds.high_endpoint_health
    {
        RiskLevel::High
    } else if critical_event_rate > thresholds.medium_critical_rate
        || endpoint_health < thresholds.medium_endpoint_health
    {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    let critical_display = round1(critical_event_rate);
    let health_display = round1(endpoint_health);

    let mut factors = Vec::new();
    if critical_event_rate > thresholds.high_critical_rate {
        factors.push(RiskFactor {
            metric: RiskMetric::CriticalEventRate,
            value: critical_display,
            threshold: thresholds.high_critical_rate,
            level: RiskLevel::High,
        });
    } else if critical_event_rate > thresholds.medium_critical_rate {
        factors.push(RiskFactor {
            metric: RiskMetric::CriticalEventRate,
            value: critical_display,
            threshold: thresholds.medium_critical_rate,
            level: RiskLevel::Medium,
        });
    }
    if endpoint_health < thresholds.high_endpoint_health {
        factors.push(RiskFactor {
            metric: RiskMetric::EndpointHealth,
            value: health_display,
            threshold: thresholds.high_endpoint_health,
            level: RiskLevel::High,
        });
    } else if endpoint_health < thresholds.medium_endpoint_health {
        factors.push(RiskFactor {
            metric: RiskMetric::EndpointHealth,
            value: health_display,
            threshold: thresholds.medium_endpoint_health,
            level: RiskLevel::Medium,
        });
    }
    // Stable: critical rate stays ahead of health within a level.
    factors.sort_by(|a, b| b.level.cmp(&a.level));

    RiskAssessment {
        level,
        critical_event_rate: critical_display,
        endpoint_health: health_display,
        factors,
    }
}

/// Classify normalized metrics.
pub fn classify(metrics: &NormalizedMetrics, thresholds: &RiskThresholds) -> RiskAssessment {
    let critical_event_rate = ratio_pct(metrics.logs.major, metrics.logs.total);
    let endpoint_health = ratio_pct(metrics.endpoints.active, metrics.endpoints.total);
    classify_rates(critical_event_rate, endpoint_health, thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use chrono::NaiveDate;
    use sr_common::{EndpointInput, LogInput, ReportPeriod, ReportRequest};

    fn thresholds() -> RiskThresholds {
        RiskThresholds::default()
    }

    fn metrics(major: i64, logs: i64, active: i64, endpoints: i64) -> NormalizedMetrics {
        let request = ReportRequest::new(ReportPeriod::new(
            "Test",
            NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
        ))
        .with_logs(LogInput {
            total: Some(logs),
            major: Some(major),
            ..Default::default()
        })
        .with_endpoints(EndpointInput {
            total: Some(endpoints),
            active: Some(active),
            ..Default::default()
        });
        normalize(&request).metrics
    }

    #[test]
    fn test_first_clause_wins() {
        let a = classify_rates(11.0, 95.0, &thresholds());
        assert_eq!(a.level, RiskLevel::High);
        assert_eq!(a.factors.len(), 1);
        assert_eq!(a.factors[0].metric, RiskMetric::CriticalEventRate);
    }

    #[test]
    fn test_health_alone_high() {
        let a = classify_rates(0.0, 79.9, &thresholds());
        assert_eq!(a.level, RiskLevel::High);
    }

    #[test]
    fn test_boundaries_are_strict() {
        assert_eq!(classify_rates(10.0, 80.0, &thresholds()).level, RiskLevel::Medium);
        assert_eq!(classify_rates(5.0, 90.0, &thresholds()).level, RiskLevel::Low);
        assert_eq!(classify_rates(5.1, 100.0, &thresholds()).level, RiskLevel::Medium);
        assert_eq!(classify_rates(0.0, 89.9, &thresholds()).level, RiskLevel::Medium);
    }

    // ========================================================================
    // Unrounded comparisons
    // ========================================================================

    #[test]
    fn test_critical_rate_just_over_high_threshold() {
        let a = classify(&metrics(1004, 10_000, 100, 100), &thresholds());
        assert_eq!(a.level, RiskLevel::High);
        assert_eq!(a.critical_event_rate, 10.0);
        assert_eq!(a.factors[0].value, 10.0);
        assert_eq!(a.factors[0].level, RiskLevel::High);
    }

    #[test]
    fn test_health_just_under_high_floor() {
        let a = classify(&metrics(0, 100, 7996, 10_000), &thresholds());
        assert_eq!(a.level, RiskLevel::High);
        assert_eq!(a.endpoint_health, 80.0);
        assert_eq!(a.factors[0].metric, RiskMetric::EndpointHealth);
    }

    #[test]
    fn test_exact_boundary_counts_stay_medium() {
        let a = classify(&metrics(1000, 10_000, 8000, 10_000), &thresholds());
        assert_eq!(a.level, RiskLevel::Medium);
    }

    #[test]
    fn test_empty_fleet_reads_as_zero_health() {
        let a = classify(&metrics(0, 100, 0, 0), &thresholds());
        assert_eq!(a.endpoint_health, 0.0);
        assert_eq!(a.level, RiskLevel::High);
        assert_eq!(a.factors[0].metric, RiskMetric::EndpointHealth);
    }

    #[test]
    fn test_factors_ordered_by_severity() {
        let a = classify_rates(7.0, 50.0, &thresholds());
        assert_eq!(a.level, RiskLevel::High);
        assert_eq!(a.factors.len(), 2);
        assert_eq!(a.factors[0].metric, RiskMetric::EndpointHealth);
        assert_eq!(a.factors[0].level, RiskLevel::High);
        assert_eq!(a.factors[1].level, RiskLevel::Medium);
    }

    #[test]
    fn test_low_has_no_factors() {
        let a = classify_rates(0.0, 100.0, &thresholds());
        assert_eq!(a.level, RiskLevel::Low);
        assert!(a.factors.is_empty());
        assert!(a.summary().contains("no monitored threshold"));
    }

    #[test]
    fn test_pure_and_repeatable() {
        let first = classify_rates(6.5, 85.0, &thresholds());
        let second = classify_rates(6.5, 85.0, &thresholds());
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = RiskThresholds {
            high_critical_rate: 2.0,
            medium_critical_rate: 1.0,
            high_endpoint_health: 95.0,
            medium_endpoint_health: 99.0,
        };
        assert_eq!(classify_rates(3.0, 100.0, &strict).level, RiskLevel::High);
        assert_eq!(classify_rates(0.5, 97.0, &strict).level, RiskLevel::Medium);
    }

    #[test]
    fn test_factor_description() {
        let a = classify_rates(12.0, 80.0, &thresholds());
        let text = a.factors[0].describe();
        assert!(text.contains("12.0%"), "{}", text);
        assert!(text.contains("high threshold"), "{}", text);
    }
}
