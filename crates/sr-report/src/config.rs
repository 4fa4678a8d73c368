//! Report configuration types.
//!
//! The engine owns all document styling. Nothing here is read from ambient
//! UI state; a config is either the default or loaded from JSON.

use crate::error::{ReportError, Result};
use crate::risk::RiskLevel;
use serde::{Deserialize, Serialize};

/// RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to 0..=1 for PDF color operators.
    pub fn components(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

/// Fixed document palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default = "default_text_color")]
    pub text: Color,
    #[serde(default = "default_muted_color")]
    pub muted: Color,
    #[serde(default = "default_accent_color")]
    pub accent: Color,
    #[serde(default = "default_table_header_color")]
    pub table_header: Color,
    #[serde(default = "default_rule_color")]
    pub rule: Color,
    #[serde(default = "default_risk_low")]
    pub risk_low: Color,
    #[serde(default = "default_risk_medium")]
    pub risk_medium: Color,
    #[serde(default = "default_risk_high")]
    pub risk_high: Color,
}

fn default_text_color() -> Color {
    Color::rgb(17, 24, 39)
}

fn default_muted_color() -> Color {
    Color::rgb(107, 114, 128)
}

fn default_accent_color() -> Color {
    Color::rgb(37, 99, 235)
}

fn default_table_header_color() -> Color {
    Color::rgb(229, 231, 235)
}

fn default_rule_color() -> Color {
    Color::rgb(209, 213, 219)
}

fn default_risk_low() -> Color {
    Color::rgb(22, 163, 74)
}

fn default_risk_medium() -> Color {
    Color::rgb(217, 119, 6)
}

fn default_risk_high() -> Color {
    Color::rgb(220, 38, 38)
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            text: default_text_color(),
            muted: default_muted_color(),
            accent: default_accent_color(),
            table_header: default_table_header_color(),
            rule: default_rule_color(),
            risk_low: default_risk_low(),
            risk_medium: default_risk_medium(),
            risk_high: default_risk_high(),
        }
    }
}

impl Palette {
    /// Color used to code a risk level.
    pub fn risk_color(&self, level: RiskLevel) -> Color {
        match level {
            RiskLevel::Low => self.risk_low,
            RiskLevel::Medium => self.risk_medium,
            RiskLevel::High => self.risk_high,
        }
    }
}

/// Page geometry in millimetres.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    #[serde(default = "default_page_width")]
    pub width: f32,
    #[serde(default = "default_page_height")]
    pub height: f32,
    #[serde(default = "default_margin")]
    pub margin_top: f32,
    #[serde(default = "default_margin_bottom")]
    pub margin_bottom: f32,
    #[serde(default = "default_margin")]
    pub margin_left: f32,
    #[serde(default = "default_margin")]
    pub margin_right: f32,
    /// Space kept free above the bottom margin for the footer.
    #[serde(default = "default_footer_reserve")]
    pub footer_reserve: f32,
    /// Fixed text printed in every footer next to the page number.
    #[serde(default = "default_footer_label")]
    pub footer_label: String,
}

fn default_page_width() -> f32 {
    210.0
}

fn default_page_height() -> f32 {
    297.0
}

fn default_margin() -> f32 {
    20.0
}

fn default_margin_bottom() -> f32 {
    15.0
}

fn default_footer_reserve() -> f32 {
    10.0
}

fn default_footer_label() -> String {
    "Security Report - Confidential".to_string()
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: default_page_width(),
            height: default_page_height(),
            margin_top: default_margin(),
            margin_bottom: default_margin_bottom(),
            margin_left: default_margin(),
            margin_right: default_margin(),
            footer_reserve: default_footer_reserve(),
            footer_label: default_footer_label(),
        }
    }
}

impl PageLayout {
    /// Lowest y a block may reach before a page break.
    pub fn content_limit(&self) -> f32 {
        self.height - self.margin_bottom - self.footer_reserve
    }

    /// Height available between the top margin and the content limit.
    pub fn writable_height(&self) -> f32 {
        self.content_limit() - self.margin_top
    }

    /// Width between the side margins.
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }
}

/// Font sizes (points) and base line height (millimetres).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Typography {
    #[serde(default = "default_title_size")]
    pub title_size: f32,
    #[serde(default = "default_heading_size")]
    pub heading_size: f32,
    #[serde(default = "default_subheading_size")]
    pub subheading_size: f32,
    #[serde(default = "default_body_size")]
    pub body_size: f32,
    #[serde(default = "default_small_size")]
    pub small_size: f32,
    #[serde(default = "default_line_height")]
    pub line_height: f32,
}

fn default_title_size() -> f32 {
    26.0
}

fn default_heading_size() -> f32 {
    16.0
}

fn default_subheading_size() -> f32 {
    12.0
}

fn default_body_size() -> f32 {
    10.0
}

fn default_small_size() -> f32 {
    8.0
}

fn default_line_height() -> f32 {
    5.5
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            title_size: default_title_size(),
            heading_size: default_heading_size(),
            subheading_size: default_subheading_size(),
            body_size: default_body_size(),
            small_size: default_small_size(),
            line_height: default_line_height(),
        }
    }
}

/// Thresholds for the three-tier risk classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Critical event rate (%) above which risk is high.
    #[serde(default = "default_high_critical_rate")]
    pub high_critical_rate: f64,
    /// Critical event rate (%) above which risk is at least medium.
    #[serde(default = "default_medium_critical_rate")]
    pub medium_critical_rate: f64,
    /// Endpoint health (%) below which risk is high.
    #[serde(default = "default_high_endpoint_health")]
    pub high_endpoint_health: f64,
    /// Endpoint health (%) below which risk is at least medium.
    #[serde(default = "default_medium_endpoint_health")]
    pub medium_endpoint_health: f64,
}

fn default_high_critical_rate() -> f64 {
    10.0
}

fn default_medium_critical_rate() -> f64 {
    5.0
}

fn default_high_endpoint_health() -> f64 {
    80.0
}

fn default_medium_endpoint_health() -> f64 {
    90.0
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high_critical_rate: default_high_critical_rate(),
            medium_critical_rate: default_medium_critical_rate(),
            high_endpoint_health: default_high_endpoint_health(),
            medium_endpoint_health: default_medium_endpoint_health(),
        }
    }
}

/// Thresholds used by individual recommendation rules (all percentages).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleThresholds {
    #[serde(default = "default_rule_critical_rate")]
    pub critical_event_rate: f64,
    #[serde(default = "default_open_ticket_pct")]
    pub open_ticket_pct: f64,
    #[serde(default = "default_session_block_pct")]
    pub session_block_pct: f64,
    #[serde(default = "default_failed_login_pct")]
    pub failed_login_pct: f64,
    #[serde(default = "default_threat_country_pct")]
    pub threat_country_pct: f64,
}

fn default_rule_critical_rate() -> f64 {
    5.0
}

fn default_open_ticket_pct() -> f64 {
    30.0
}

fn default_session_block_pct() -> f64 {
    10.0
}

fn default_failed_login_pct() -> f64 {
    15.0
}

fn default_threat_country_pct() -> f64 {
    50.0
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            critical_event_rate: default_rule_critical_rate(),
            open_ticket_pct: default_open_ticket_pct(),
            session_block_pct: default_session_block_pct(),
            failed_login_pct: default_failed_login_pct(),
            threat_country_pct: default_threat_country_pct(),
        }
    }
}

/// Chart block placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageLayout {
    /// Image-heavy sections start a fresh page before a chart once the
    /// cursor is past this y offset.
    #[serde(default = "default_break_threshold")]
    pub break_threshold: f32,
    /// Maximum chart width; defaults to the content width.
    #[serde(default = "default_image_max_width")]
    pub max_width: f32,
}

fn default_break_threshold() -> f32 {
    200.0
}

fn default_image_max_width() -> f32 {
    170.0
}

impl Default for ImageLayout {
    fn default() -> Self {
        Self {
            break_threshold: default_break_threshold(),
            max_width: default_image_max_width(),
        }
    }
}

/// Concurrency limits for chart acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartFetchConfig {
    /// Renders in flight at once (clamped to 1..=8).
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Per-render timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_workers() -> usize {
    4
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for ChartFetchConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ChartFetchConfig {
    /// Worker count actually used.
    pub fn effective_workers(&self) -> usize {
        self.workers.clamp(1, 8)
    }
}

/// Complete report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Custom report title.
    pub title: Option<String>,
    /// Organization shown on the cover.
    pub organization: Option<String>,
    #[serde(default)]
    pub page: PageLayout,
    #[serde(default)]
    pub typography: Typography,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub risk: RiskThresholds,
    #[serde(default)]
    pub rules: RuleThresholds,
    #[serde(default)]
    pub images: ImageLayout,
    #[serde(default)]
    pub charts: ChartFetchConfig,
}

fn default_schema_version() -> String {
    "1.0.0".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            title: None,
            organization: None,
            page: PageLayout::default(),
            typography: Typography::default(),
            palette: Palette::default(),
            risk: RiskThresholds::default(),
            rules: RuleThresholds::default(),
            images: ImageLayout::default(),
            charts: ChartFetchConfig::default(),
        }
    }
}

impl ReportConfig {
    /// Create a new report configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the organization name.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Replace the page layout.
    pub fn with_page(mut self, page: PageLayout) -> Self {
        self.page = page;
        self
    }

    /// Replace the risk thresholds.
    pub fn with_risk_thresholds(mut self, risk: RiskThresholds) -> Self {
        self.risk = risk;
        self
    }

    /// Replace the chart acquisition limits.
    pub fn with_chart_fetch(mut self, charts: ChartFetchConfig) -> Self {
        self.charts = charts;
        self
    }

    /// Title printed on the cover and in document metadata.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Security Report")
    }

    /// Load configuration from JSON.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check the configuration for values the layout cannot work with.
    pub fn validate(&self) -> Result<()> {
        let page = &self.page;
        for (field, value) in [
            ("page.width", page.width),
            ("page.height", page.height),
            ("typography.line_height", self.typography.line_height),
            ("typography.body_size", self.typography.body_size),
            ("images.max_width", self.images.max_width),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("{} must be positive, got {}", field, value)));
            }
        }
        for (field, value) in [
            ("page.margin_top", page.margin_top),
            ("page.margin_bottom", page.margin_bottom),
            ("page.margin_left", page.margin_left),
            ("page.margin_right", page.margin_right),
            ("page.footer_reserve", page.footer_reserve),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{} must be >= 0, got {}", field, value)));
            }
        }
        if page.writable_height() < self.typography.line_height * 4.0 {
            return Err(invalid(format!(
                "margins leave {:.1} mm of writable height",
                page.writable_height()
            )));
        }
        if page.content_width() <= 0.0 {
            return Err(invalid(format!(
                "margins leave {:.1} mm of content width",
                page.content_width()
            )));
        }
        if self.risk.medium_critical_rate > self.risk.high_critical_rate {
            return Err(invalid(format!(
                "risk.medium_critical_rate ({}) exceeds risk.high_critical_rate ({})",
                self.risk.medium_critical_rate, self.risk.high_critical_rate
            )));
        }
        if self.risk.high_endpoint_health > self.risk.medium_endpoint_health {
            return Err(invalid(format!(
                "risk.high_endpoint_health ({}) exceeds risk.medium_endpoint_health ({})",
                self.risk.high_endpoint_health, self.risk.medium_endpoint_health
            )));
        }
        if self.charts.workers == 0 {
            return Err(invalid("charts.workers must be at least 1".to_string()));
        }
        if self.charts.timeout_ms == 0 {
            return Err(invalid("charts.timeout_ms must be positive".to_string()));
        }
        Ok(())
    }
}

fn invalid(message: String) -> ReportError {
    ReportError::InvalidConfig(message)
}
