//! Session statistics.

use super::blocks::{
    breakdown, chart, fmt_count, fmt_pct, heading, key_values, not_available, subheading,
};
use super::{SectionInput, SectionKind};
use crate::charts::ChartSlot;
use crate::error::{LayoutError, ReportWarning};
use crate::layout::PageCursor;
use sr_common::Domain;

pub fn write(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    warnings: &mut Vec<ReportWarning>,
) -> Result<(), LayoutError> {
    heading(input, cursor, SectionKind::SessionStatistics.title())?;
    let sessions = &input.metrics.sessions;
    if !sessions.available {
        return not_available(input, cursor, Domain::Sessions);
    }

    subheading(input, cursor, "Session outcomes")?;
    let share = |count: u64, pct: f64| format!("{} ({})", fmt_count(count), fmt_pct(pct));
    key_values(
        input,
        cursor,
        &[
            ("Total sessions", fmt_count(sessions.total)),
            ("Successful", share(sessions.successful, sessions.success_pct)),
            ("Failed", share(sessions.failed, sessions.failed_pct)),
            ("Blocked", share(sessions.blocked, sessions.blocked_pct)),
            ("Unique users", fmt_count(sessions.unique_users)),
        ],
    )?;

    subheading(input, cursor, "Sessions by service")?;
    breakdown(input, cursor, "Service", &sessions.by_service, usize::MAX)?;
    chart(input, cursor, warnings, ChartSlot::SessionServices, false)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::Fixture;
    use super::super::SectionKind;
    use sr_common::{ReportRequest, SessionInput};

    #[test]
    fn test_outcomes() {
        let period = Fixture::empty().metrics.period;
        let request = ReportRequest::new(period).with_sessions(SessionInput {
            total: Some(200),
            successful: Some(180),
            failed: Some(15),
            blocked: Some(5),
            unique_users: Some(42),
            by_service: [("vpn".to_string(), 120), ("ssh".to_string(), 80)].into(),
        });
        let (text, _, _) = Fixture::from_request(request).run(SectionKind::SessionStatistics);
        assert!(text.iter().any(|t| t == "180 (90.0%)"));
        assert!(text.iter().any(|t| t == "42"));
        let vpn = text.iter().position(|t| t == "vpn").unwrap();
        let ssh = text.iter().position(|t| t == "ssh").unwrap();
        assert!(vpn < ssh);
    }
}
