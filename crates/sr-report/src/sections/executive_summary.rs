//! Executive summary: risk level, the figures behind it, top actions.

use super::blocks::{bullet, fmt_count, fmt_pct, heading, key_values, note, paragraph, subheading};
use super::{SectionInput, SectionKind};
use crate::error::{LayoutError, ReportWarning};
use crate::layout::{PageCursor, TextStyle};

/// Recommendations repeated in the summary.
const TOP_RECOMMENDATIONS: usize = 3;

const NOT_AVAILABLE: &str = "Not available";

pub fn write(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    _warnings: &mut Vec<ReportWarning>,
) -> Result<(), LayoutError> {
    let config = input.config;
    let metrics = input.metrics;
    let risk = input.risk;
    heading(input, cursor, SectionKind::ExecutiveSummary.title())?;

    cursor.write_text(
        &format!("Overall risk: {}", risk.level),
        TextStyle::bold(config.typography.subheading_size, config.palette.risk_color(risk.level)),
        config.page.margin_left,
        config.page.content_width(),
        config.typography.line_height + 1.5,
    )?;
    paragraph(input, cursor, &risk.summary())?;

    if metrics.is_empty() {
        note(input, cursor, "Telemetry data not available for this period")?;
    } else {
        subheading(input, cursor, "Risk factors")?;
        if risk.factors.is_empty() {
            paragraph(input, cursor, "No monitored risk threshold was crossed.")?;
        }
        for factor in &risk.factors {
            bullet(input, cursor, "-", &factor.describe())?;
        }

        subheading(input, cursor, "Key figures")?;
        let or_na = |available: bool, value: String| {
            if available {
                value
            } else {
                NOT_AVAILABLE.to_string()
            }
        };
        key_values(
            input,
            cursor,
            &[
                ("Log events", or_na(metrics.logs.available, fmt_count(metrics.logs.total))),
                (
                    "Critical event rate",
                    or_na(metrics.logs.available, fmt_pct(risk.critical_event_rate)),
                ),
                (
                    "Endpoint health",
                    or_na(metrics.endpoints.available, fmt_pct(risk.endpoint_health)),
                ),
                (
                    "Open tickets",
                    or_na(metrics.tickets.available, fmt_count(metrics.tickets.open)),
                ),
                (
                    "Sessions",
                    or_na(metrics.sessions.available, fmt_count(metrics.sessions.total)),
                ),
                (
                    "Threat events",
                    or_na(
                        metrics.threat_intel.available,
                        fmt_count(metrics.threat_intel.total_events),
                    ),
                ),
            ],
        )?;
    }

    subheading(input, cursor, "Top recommendations")?;
    for (i, rec) in input
        .recommendations
        .iter()
        .take(TOP_RECOMMENDATIONS)
        .enumerate()
    {
        bullet(
            input,
            cursor,
            &format!("{}.", i + 1),
            &format!("[{}] {}", rec.priority, rec.text),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::Fixture;
    use super::super::SectionKind;
    use sr_common::{EndpointInput, LogInput, ReportRequest};

    #[test]
    fn test_empty_telemetry_line() {
        let (text, warnings, _) = Fixture::empty().run(SectionKind::ExecutiveSummary);
        assert!(warnings.is_empty());
        assert!(text
            .iter()
            .any(|t| t == "Telemetry data not available for this period"));
        assert!(text.iter().any(|t| t.contains("Overall risk: HIGH")));
        assert!(!text.iter().any(|t| t == "Key figures"));
    }

    #[test]
    fn test_high_risk_summary() {
        let empty = Fixture::empty();
        let request = ReportRequest::new(empty.metrics.period.clone())
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
        let (text, _, _) = Fixture::from_request(request).run(SectionKind::ExecutiveSummary);
        assert!(text.iter().any(|t| t == "Overall risk: HIGH"));
        assert!(text.iter().any(|t| t == "12.0%"));
        assert!(text.iter().any(|t| t == "80.0%"));
        assert!(text.iter().any(|t| t == "Not available"));
        assert!(text.iter().any(|t| t.starts_with("[Urgent]")));
    }
}
