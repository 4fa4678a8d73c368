//! Threat intelligence.

use super::blocks::{
    breakdown, chart, fmt_count, fmt_pct, heading, key_values, not_available, subheading,
};
use super::{SectionInput, SectionKind};
use crate::charts::{ChartSlot, TOP_COUNTRIES};
use crate::error::{LayoutError, ReportWarning};
use crate::layout::PageCursor;
use sr_common::Domain;

pub fn write(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    warnings: &mut Vec<ReportWarning>,
) -> Result<(), LayoutError> {
    heading(input, cursor, SectionKind::ThreatIntelligence.title())?;
    let threat = &input.metrics.threat_intel;
    if !threat.available {
        return not_available(input, cursor, Domain::ThreatIntel);
    }

    subheading(input, cursor, "Threat activity")?;
    key_values(
        input,
        cursor,
        &[
            ("Threat events", fmt_count(threat.total_events)),
            ("Blocked", fmt_count(threat.blocked)),
            ("Block rate", fmt_pct(threat.blocked_pct)),
            ("Unique sources", fmt_count(threat.unique_sources)),
            (
                "Top source country",
                threat
                    .top_country()
                    .map(|c| format!("{} ({})", c.label, fmt_pct(c.pct)))
                    .unwrap_or_else(|| "None".to_string()),
            ),
        ],
    )?;

    subheading(input, cursor, &format!("Top {} source countries", TOP_COUNTRIES))?;
    breakdown(input, cursor, "Country", &threat.by_country, TOP_COUNTRIES)?;
    chart(input, cursor, warnings, ChartSlot::ThreatCountries, true)
}
