//! Report generator implementation.

use crate::charts::{acquire_chart_images, chart_specs, ChartImages, ChartRenderer};
use crate::config::ReportConfig;
use crate::error::{ReportError, ReportWarning, Result};
use crate::layout::{Document, PageCursor, SectionMark};
use crate::normalize::{normalize, Normalized};
use crate::pdf;
use crate::recommend::{recommend, Recommendation};
use crate::risk::{classify, RiskAssessment};
use crate::sections::{write_section, SectionInput, SectionKind};

use chrono::{DateTime, Utc};
use sr_common::{ReportPeriod, ReportRequest};
use std::sync::Arc;
use tracing::{debug, info};

/// Prefix of every generated filename.
const FILENAME_PREFIX: &str = "security-report";

/// Output of one successful generation.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    /// Suggested filename, derived from the report period.
    pub filename: String,
    /// Encoded PDF.
    pub bytes: Vec<u8>,
    /// The composed page model the PDF was encoded from.
    pub document: Document,
    pub page_count: usize,
    pub risk: RiskAssessment,
    pub recommendations: Vec<Recommendation>,
    /// Non-fatal conditions, in the order they were encountered.
    pub warnings: Vec<ReportWarning>,
    /// SHA-256 over the page content.
    pub fingerprint: String,
    /// Generator version.
    pub generator_version: String,
}

/// Report generator.
///
/// Holds only configuration, so one instance can serve concurrent
/// `generate` calls.
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    /// Create a new report generator with configuration.
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Create a generator with default configuration.
    pub fn default_config() -> Self {
        Self::new(ReportConfig::default())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Generate a report stamped with the current time.
    pub fn generate(&self, request: &ReportRequest, charts: &ChartImages) -> Result<GeneratedReport> {
        self.generate_at(request, charts, Utc::now())
    }

    /// Generate a report from JSON request data.
    pub fn generate_from_json(&self, json: &str, charts: &ChartImages) -> Result<GeneratedReport> {
        let request: ReportRequest = serde_json::from_str(json)?;
        self.generate(&request, charts)
    }

    /// Render charts with `renderer`, then compose.
    ///
    /// Composition starts only after every chart slot is resolved or timed
    /// out.
    pub fn generate_with_renderer(
        &self,
        request: &ReportRequest,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Result<GeneratedReport> {
        self.config.validate()?;
        request.period.validate()?;
        let normalized = normalize(request);
        let specs = chart_specs(&normalized.metrics);
        let charts = acquire_chart_images(renderer, specs, &self.config.charts);
        self.compose(&request.period, normalized, &charts, Utc::now())
    }

    /// Generate a report with a fixed generation timestamp.
    ///
    /// Identical inputs and timestamp yield an identical document.
    pub fn generate_at(
        &self,
        request: &ReportRequest,
        charts: &ChartImages,
        generated_at: DateTime<Utc>,
    ) -> Result<GeneratedReport> {
        self.config.validate()?;
        request.period.validate()?;
        self.compose(&request.period, normalize(request), charts, generated_at)
    }

    /// Assess and lay out already-normalized telemetry, then encode.
    fn compose(
        &self,
        period: &ReportPeriod,
        normalized: Normalized,
        charts: &ChartImages,
        generated_at: DateTime<Utc>,
    ) -> Result<GeneratedReport> {
        debug!(period = %period.label, "Generating report");

        let metrics = normalized.metrics;
        let mut warnings = normalized.warnings;
        let risk = classify(&metrics, &self.config.risk);
        let recommendations = recommend(&metrics, &risk, &self.config.rules);
        debug!(
            risk = %risk.level,
            recommendations = recommendations.len(),
            missing = warnings.len(),
            "Assessment complete"
        );

        let input = SectionInput {
            config: &self.config,
            metrics: &metrics,
            risk: &risk,
            recommendations: &recommendations,
            charts,
            generated_at,
        };

        let mut cursor = PageCursor::new(self.config.page.clone());
        let mut sections = Vec::with_capacity(SectionKind::ALL.len());
        for kind in SectionKind::ALL {
            if kind != SectionKind::Cover {
                cursor.new_page();
            }
            sections.push(SectionMark {
                kind,
                first_page: cursor.page_number(),
            });
            write_section(kind, &input, &mut cursor, &mut warnings).map_err(|source| {
                ReportError::SectionFailure {
                    section: kind,
                    source,
                }
            })?;
            debug!(section = %kind, page = cursor.page_number(), "Section written");
        }

        let (pages, images) = cursor.finish();
        let document = Document {
            title: self.config.title().to_string(),
            generated_at,
            page_size: (self.config.page.width, self.config.page.height),
            pages,
            images,
            sections,
        };
        let bytes = pdf::encode(&document, &self.config)?;
        let fingerprint = document.fingerprint();
        let filename = period.filename(FILENAME_PREFIX, "pdf");

        info!(
            filename = %filename,
            pages = document.page_count(),
            bytes = bytes.len(),
            warnings = warnings.len(),
            risk = %risk.level,
            "Report generated"
        );

        Ok(GeneratedReport {
            filename,
            bytes,
            page_count: document.page_count(),
            document,
            risk,
            recommendations,
            warnings,
            fingerprint,
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}
