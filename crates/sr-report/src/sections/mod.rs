//! Section writers.
//!
//! Each section is a plain function over a shared [`SectionInput`] and the
//! one [`PageCursor`] of the generation. Sections run in [`SectionKind::ALL`]
//! order; every section after the cover starts on a fresh page.

pub mod analytics;
pub mod blocks;
pub mod cover;
pub mod executive_summary;
pub mod infrastructure;
pub mod recommendations;
pub mod security_metrics;
pub mod sessions;
pub mod threat_intel;

use crate::charts::ChartImages;
use crate::config::ReportConfig;
use crate::error::{LayoutError, ReportWarning};
use crate::layout::PageCursor;
use crate::recommend::Recommendation;
use crate::risk::RiskAssessment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sr_common::NormalizedMetrics;
use std::fmt;

/// Report section, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Cover,
    ExecutiveSummary,
    SecurityMetrics,
    InfrastructureStatus,
    Recommendations,
    AdvancedAnalytics,
    SessionStatistics,
    ThreatIntelligence,
}

impl SectionKind {
    /// All sections in the order they are written.
    pub const ALL: [SectionKind; 8] = [
        SectionKind::Cover,
        SectionKind::ExecutiveSummary,
        SectionKind::SecurityMetrics,
        SectionKind::InfrastructureStatus,
        SectionKind::Recommendations,
        SectionKind::AdvancedAnalytics,
        SectionKind::SessionStatistics,
        SectionKind::ThreatIntelligence,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Cover => "Cover",
            SectionKind::ExecutiveSummary => "Executive Summary",
            SectionKind::SecurityMetrics => "Security Metrics",
            SectionKind::InfrastructureStatus => "Infrastructure Status",
            SectionKind::Recommendations => "Recommendations",
            SectionKind::AdvancedAnalytics => "Advanced Analytics",
            SectionKind::SessionStatistics => "Session Statistics",
            SectionKind::ThreatIntelligence => "Threat Intelligence",
        }
    }

    /// Writer function for this section.
    pub fn writer(&self) -> SectionWriter {
        match self {
            SectionKind::Cover => cover::write,
            SectionKind::ExecutiveSummary => executive_summary::write,
            SectionKind::SecurityMetrics => security_metrics::write,
            SectionKind::InfrastructureStatus => infrastructure::write,
            SectionKind::Recommendations => recommendations::write,
            SectionKind::AdvancedAnalytics => analytics::write,
            SectionKind::SessionStatistics => sessions::write,
            SectionKind::ThreatIntelligence => threat_intel::write,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Read-only data shared by every section of one generation.
pub struct SectionInput<'a> {
    pub config: &'a ReportConfig,
    pub metrics: &'a NormalizedMetrics,
    pub risk: &'a RiskAssessment,
    pub recommendations: &'a [Recommendation],
    pub charts: &'a ChartImages,
    pub generated_at: DateTime<Utc>,
}

/// Signature shared by all section writers.
pub type SectionWriter =
    fn(&SectionInput<'_>, &mut PageCursor, &mut Vec<ReportWarning>) -> Result<(), LayoutError>;

/// Write one section at the cursor.
pub fn write_section(
    kind: SectionKind,
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    warnings: &mut Vec<ReportWarning>,
) -> Result<(), LayoutError> {
    (kind.writer())(input, cursor, warnings)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_order_and_titles() {
        assert_eq!(SectionKind::ALL[0], SectionKind::Cover);
        assert_eq!(SectionKind::ALL[7], SectionKind::ThreatIntelligence);
        assert_eq!(SectionKind::InfrastructureStatus.to_string(), "Infrastructure Status");
        assert_eq!(
            serde_json::to_value(SectionKind::SessionStatistics).unwrap(),
            "session_statistics"
        );
    }
}
