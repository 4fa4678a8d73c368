//! Advanced analytics.

use super::blocks::{
    breakdown, chart, fmt_count, fmt_pct, heading, key_values, not_available, subheading,
};
use super::{SectionInput, SectionKind};
use crate::charts::ChartSlot;
use crate::error::{LayoutError, ReportWarning};
use crate::layout::PageCursor;
use sr_common::Domain;

fn minutes(value: f64) -> String {
    format!("{:.1} min", value)
}

pub fn write(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    warnings: &mut Vec<ReportWarning>,
) -> Result<(), LayoutError> {
    heading(input, cursor, SectionKind::AdvancedAnalytics.title())?;
    let analytics = &input.metrics.analytics;
    if !analytics.available {
        return not_available(input, cursor, Domain::Analytics);
    }

    subheading(input, cursor, "Detection")?;
    key_values(
        input,
        cursor,
        &[
            ("Alerts", fmt_count(analytics.alerts)),
            ("Anomalies", fmt_count(analytics.anomalies)),
            ("False positives", fmt_count(analytics.false_positives)),
            ("False positive rate", fmt_pct(analytics.false_positive_pct)),
            (
                "Mean time to detect",
                minutes(analytics.mean_time_to_detect_minutes),
            ),
            (
                "Mean time to respond",
                minutes(analytics.mean_time_to_respond_minutes),
            ),
        ],
    )?;

    subheading(input, cursor, "Alerts by tactic")?;
    breakdown(input, cursor, "Tactic", &analytics.by_tactic, usize::MAX)?;
    chart(input, cursor, warnings, ChartSlot::AnalyticsTactics, false)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::Fixture;
    use super::super::SectionKind;
    use sr_common::{AnalyticsInput, ReportRequest};

    #[test]
    fn test_placeholder() {
        let (text, _, _) = Fixture::empty().run(SectionKind::AdvancedAnalytics);
        assert_eq!(text.last().unwrap(), "Advanced analytics data not available");
    }

    #[test]
    fn test_figures() {
        let period = Fixture::empty().metrics.period;
        let request = ReportRequest::new(period).with_analytics(AnalyticsInput {
            alerts: Some(40),
            anomalies: Some(3),
            false_positives: Some(10),
            mean_time_to_detect_minutes: Some(12.34),
            ..Default::default()
        });
        let (text, warnings, _) = Fixture::from_request(request).run(SectionKind::AdvancedAnalytics);
        assert!(text.iter().any(|t| t == "25.0%"));
        assert!(text.iter().any(|t| t == "12.3 min"));
        assert!(text.iter().any(|t| t == "0.0 min"));
        assert!(text.iter().any(|t| t == "No breakdown by tactic was reported"));
        assert_eq!(warnings.len(), 1);
    }
}
