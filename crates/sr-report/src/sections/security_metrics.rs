//! Log volume and severity.

use super::blocks::{breakdown, chart, fmt_count, fmt_pct, heading, key_values, not_available, subheading};
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
    heading(input, cursor, SectionKind::SecurityMetrics.title())?;
    let logs = &input.metrics.logs;
    if !logs.available {
        return not_available(input, cursor, Domain::Logs);
    }

    subheading(input, cursor, "Log volume")?;
    key_values(
        input,
        cursor,
        &[
            ("Total events", fmt_count(logs.total)),
            ("Major events", fmt_count(logs.major)),
            ("Minor events", fmt_count(logs.minor)),
            ("Critical event rate", fmt_pct(logs.major_pct)),
        ],
    )?;

    subheading(input, cursor, "Events by level")?;
    breakdown(input, cursor, "Level", &logs.by_level, usize::MAX)?;
    chart(input, cursor, warnings, ChartSlot::LogLevels, false)
}
