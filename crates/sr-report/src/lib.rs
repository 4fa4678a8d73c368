//! PDF security report composition engine.
//!
//! Turns a period's worth of (possibly partial) security telemetry into a
//! paginated PDF: normalized metrics, a three-tier risk assessment, a
//! prioritized list of recommendations, tables and embedded charts.
//!
//! # Pipeline
//!
//! - **Normalize**: fill absent domains with zeros, clamp bad counts, compute
//!   one-decimal percentages
//! - **Classify**: first-match risk rules over the critical event rate and
//!   endpoint health
//! - **Recommend**: a static rule table; every matching rule fires
//! - **Compose**: eight section writers share one page cursor that owns
//!   every page break
//! - **Encode**: the page model is written out with `lopdf`
//!
//! Charts are rendered outside the engine. Either pass pre-rendered bytes in
//! a [`ChartImages`] map, or hand a [`ChartRenderer`] to
//! [`ReportGenerator::generate_with_renderer`], which renders all slots on a
//! bounded worker pool before composition starts.
//!
//! # Example
//!
//! ```no_run
//! use sr_report::{ChartImages, ReportConfig, ReportGenerator};
//! use sr_common::ReportRequest;
//!
//! let json = std::fs::read_to_string("request.json").unwrap();
//! let request = ReportRequest::from_json(&json).unwrap();
//! let generator = ReportGenerator::new(ReportConfig::default().with_organization("Acme"));
//! let report = generator.generate(&request, &ChartImages::new()).unwrap();
//! std::fs::write(&report.filename, &report.bytes).unwrap();
//! ```

pub mod charts;
pub mod config;
pub mod error;
pub mod generator;
pub mod layout;
pub mod normalize;
pub mod pdf;
pub mod recommend;
pub mod risk;
pub mod sections;

pub use charts::{
    acquire_chart_images, chart_specs, ChartError, ChartImages, ChartKind, ChartRenderer,
    ChartSlot, ChartSpec,
};
pub use config::{
    ChartFetchConfig, Color, ImageLayout, PageLayout, Palette, ReportConfig, RiskThresholds,
    RuleThresholds, Typography,
};
pub use error::{LayoutError, ReportError, ReportWarning, Result};
pub use generator::{GeneratedReport, ReportGenerator};
pub use layout::{Document, PageCursor};
pub use normalize::{normalize, Normalized};
pub use recommend::{recommend, Priority, Recommendation, Rule, RULES};
pub use risk::{classify, RiskAssessment, RiskFactor, RiskLevel};
pub use sections::SectionKind;
