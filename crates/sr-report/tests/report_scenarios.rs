//! End-to-end report generation scenarios.
//!
//! Validates:
//! - Risk and recommendations for a known telemetry mix
//! - Placeholders when every domain is missing
//! - Text fallbacks when no chart images are supplied
//! - Deterministic output for a fixed clock
//! - Atomic failure naming the failing section
//! - Emitted bytes parse as a PDF with the expected page count

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sr_common::{
    AnalyticsInput, DeviceInput, Domain, EndpointInput, LogInput, ReportPeriod, ReportRequest,
    SessionInput, ThreatIntelInput, TicketInput,
};
use sr_report::{
    ChartImages, ChartSlot, Priority, ReportConfig, ReportError, ReportGenerator, ReportWarning,
    RiskLevel, SectionKind,
};
use std::io::Cursor;
use std::sync::Arc;

fn period() -> ReportPeriod {
    ReportPeriod::new(
        "September 2026",
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
    )
}

fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap()
}

fn full_request() -> ReportRequest {
    ReportRequest::new(period())
        .with_logs(LogInput {
            total: Some(48_210),
            major: Some(1_204),
            by_level: [
                ("critical".to_string(), 204),
                ("error".to_string(), 1_000),
                ("warning".to_string(), 7_006),
                ("info".to_string(), 40_000),
            ]
            .into(),
        })
        .with_endpoints(EndpointInput {
            total: Some(320),
            active: Some(301),
            disconnected: Some(12),
            never_connected: Some(4),
            pending: Some(3),
            by_os: [
                ("Windows".to_string(), 210),
                ("Linux".to_string(), 80),
                ("macOS".to_string(), 30),
            ]
            .into(),
        })
        .with_devices(DeviceInput {
            total: Some(58),
            online: Some(55),
            offline: Some(3),
            by_type: [("Firewall".to_string(), 6), ("Switch".to_string(), 52)].into(),
        })
        .with_tickets(TicketInput {
            total: Some(90),
            open: Some(31),
            in_progress: Some(20),
            resolved: Some(39),
            by_priority: [("P1".to_string(), 5), ("P2".to_string(), 85)].into(),
        })
        .with_sessions(SessionInput {
            total: Some(12_000),
            successful: Some(11_000),
            failed: Some(700),
            blocked: Some(300),
            unique_users: Some(410),
            by_service: [("vpn".to_string(), 7_000), ("sso".to_string(), 5_000)].into(),
        })
        .with_threat_intel(ThreatIntelInput {
            total_events: Some(5_400),
            blocked: Some(5_100),
            unique_sources: Some(880),
            by_country: [
                ("CN".to_string(), 2_100),
                ("RU".to_string(), 1_300),
                ("US".to_string(), 900),
                ("BR".to_string(), 1_100),
            ]
            .into(),
        })
        .with_analytics(AnalyticsInput {
            alerts: Some(140),
            anomalies: Some(9),
            false_positives: Some(21),
            mean_time_to_detect_minutes: Some(14.2),
            mean_time_to_respond_minutes: Some(48.9),
            by_tactic: [
                ("Initial Access".to_string(), 60),
                ("Execution".to_string(), 80),
            ]
            .into(),
        })
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([30, 90, 200]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn png_with_alpha(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 128]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn all_charts() -> ChartImages {
    ChartSlot::ALL
        .into_iter()
        .fold(ChartImages::new(), |images, slot| match slot {
            ChartSlot::ThreatCountries => images.with(slot, png_with_alpha(300, 200)),
            _ => images.with(slot, png(400, 250)),
        })
}

fn pdf_page_count(bytes: &[u8]) -> usize {
    lopdf::Document::load_mem(bytes)
        .expect("valid PDF")
        .get_pages()
        .len()
}

// ============================================================================
// Risk scenario
// ============================================================================

#[test]
fn high_critical_rate_and_weak_endpoints_are_high_risk() {
    let request = ReportRequest::new(period())
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
    let report = ReportGenerator::default_config()
        .generate_at(&request, &ChartImages::new(), fixed_clock())
        .unwrap();

    assert_eq!(report.risk.level, RiskLevel::High);
    assert_eq!(report.risk.critical_event_rate, 12.0);
    assert_eq!(report.risk.endpoint_health, 80.0);

    let critical = report
        .recommendations
        .iter()
        .find(|r| r.rule_id == "critical_event_rate")
        .expect("critical rate recommendation");
    assert_eq!(critical.priority, Priority::High);
    assert!(critical
        .text
        .to_lowercase()
        .contains("investigate elevated critical event rate"));
    assert!(report
        .recommendations
        .windows(2)
        .all(|w| w[0].priority >= w[1].priority));
    assert!(report.document.contains_text("OVERALL RISK: HIGH"));
}

// ============================================================================
// Missing data
// ============================================================================

#[test]
fn all_domains_absent_still_produces_a_document() {
    let report = ReportGenerator::default_config()
        .generate_at(&ReportRequest::new(period()), &ChartImages::new(), fixed_clock())
        .unwrap();

    // No endpoints reads as 0% health.
    assert_eq!(report.risk.endpoint_health, 0.0);
    assert_eq!(report.risk.level, RiskLevel::High);
    assert_eq!(report.recommendations[0].rule_id, "escalate_high_risk");
    assert_eq!(report.warnings.len(), Domain::ALL.len());
    assert!(report.warnings.iter().all(ReportWarning::is_missing_data));

    let summary = report.document.section_text(SectionKind::ExecutiveSummary);
    assert!(summary.contains(&"Telemetry data not available for this period"));

    for kind in [
        SectionKind::SecurityMetrics,
        SectionKind::InfrastructureStatus,
        SectionKind::AdvancedAnalytics,
        SectionKind::SessionStatistics,
        SectionKind::ThreatIntelligence,
    ] {
        let text = report.document.section_text(kind);
        assert!(
            text.iter().any(|t| t.ends_with("data not available")),
            "{} has no placeholder: {:?}",
            kind,
            text
        );
    }

    let numbers: Vec<u32> = report.document.pages.iter().map(|p| p.footer.page_number).collect();
    let expected: Vec<u32> = (1..=report.page_count as u32).collect();
    assert_eq!(numbers, expected);
    assert!(report
        .document
        .pages
        .iter()
        .all(|p| p.footer.label == "Security Report - Confidential"));
    assert_eq!(pdf_page_count(&report.bytes), report.page_count);
}

#[test]
fn empty_chart_map_falls_back_to_text() {
    let report = ReportGenerator::default_config()
        .generate_at(&full_request(), &ChartImages::new(), fixed_clock())
        .unwrap();

    assert!(!report.warnings.is_empty());
    assert!(report.warnings.iter().all(ReportWarning::is_image_unavailable));
    assert_eq!(report.warnings.len(), ChartSlot::ALL.len());
    assert!(report.document.images.is_empty());

    for kind in [
        SectionKind::SecurityMetrics,
        SectionKind::InfrastructureStatus,
        SectionKind::AdvancedAnalytics,
        SectionKind::SessionStatistics,
        SectionKind::ThreatIntelligence,
    ] {
        let text = report.document.section_text(kind);
        assert!(
            text.iter().any(|t| t.contains("Chart unavailable")),
            "{} has no fallback",
            kind
        );
    }
}

// ============================================================================
// Charts
// ============================================================================

#[test]
fn supplied_charts_are_embedded() {
    let report = ReportGenerator::default_config()
        .generate_at(&full_request(), &all_charts(), fixed_clock())
        .unwrap();

    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.document.images.len(), ChartSlot::ALL.len());
    assert!(report
        .document
        .images
        .iter()
        .any(|img| img.alpha.is_some()));

    let limit = ReportConfig::default().page.content_limit();
    for page in &report.document.pages {
        for op in &page.ops {
            if let sr_report::layout::DrawOp::Image { y, height, .. } = op {
                assert!(y + height <= limit + 1e-3, "image crosses page {}", page.number);
            }
        }
    }
    assert_eq!(pdf_page_count(&report.bytes), report.page_count);
}

#[test]
fn undecodable_chart_is_a_warning() {
    let charts = ChartImages::new().with(ChartSlot::LogLevels, b"GIF89a-not-really".to_vec());
    let report = ReportGenerator::default_config()
        .generate_at(&full_request(), &charts, fixed_clock())
        .unwrap();
    let log_warning = report
        .warnings
        .iter()
        .find(|w| matches!(w, ReportWarning::ImageUnavailable { slot: ChartSlot::LogLevels, .. }))
        .expect("log chart warning");
    assert!(log_warning.to_string().contains("decode failed"));
}

// ============================================================================
// Determinism and concurrency
// ============================================================================

#[test]
fn identical_inputs_give_identical_documents() {
    let generator = ReportGenerator::new(ReportConfig::default().with_organization("Acme"));
    let charts = all_charts();
    let a = generator.generate_at(&full_request(), &charts, fixed_clock()).unwrap();
    let b = generator.generate_at(&full_request(), &charts, fixed_clock()).unwrap();

    assert_eq!(a.page_count, b.page_count);
    assert_eq!(a.fingerprint, b.fingerprint);
    assert_eq!(a.document.sections, b.document.sections);
    for number in 1..=a.page_count as u32 {
        assert_eq!(a.document.page_text(number), b.document.page_text(number));
    }
    assert_eq!(a.filename, "security-report_september-2026_20260901_20260930.pdf");
}

#[test]
fn different_clock_changes_fingerprint() {
    let generator = ReportGenerator::default_config();
    let a = generator
        .generate_at(&full_request(), &ChartImages::new(), fixed_clock())
        .unwrap();
    let later = Utc.with_ymd_and_hms(2026, 10, 2, 8, 0, 0).unwrap();
    let b = generator
        .generate_at(&full_request(), &ChartImages::new(), later)
        .unwrap();
    assert_ne!(a.fingerprint, b.fingerprint);
}

#[test]
fn concurrent_generations_are_independent() {
    let generator = Arc::new(ReportGenerator::default_config());
    let charts = Arc::new(all_charts());
    let expected = generator
        .generate_at(&full_request(), &charts, fixed_clock())
        .unwrap()
        .fingerprint;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let generator = Arc::clone(&generator);
            let charts = Arc::clone(&charts);
            std::thread::spawn(move || {
                generator
                    .generate_at(&full_request(), &charts, fixed_clock())
                    .unwrap()
                    .fingerprint
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

// ============================================================================
// Failure
// ============================================================================

#[test]
fn section_failure_names_section_and_returns_no_document() {
    let mut config = ReportConfig::default();
    config.typography.heading_size = -1.0;
    let err = ReportGenerator::new(config)
        .generate_at(&full_request(), &ChartImages::new(), fixed_clock())
        .unwrap_err();

    match &err {
        ReportError::SectionFailure { section, .. } => {
            assert_eq!(*section, SectionKind::ExecutiveSummary)
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Executive Summary"));
    assert_eq!(err.stage(), "section");
}

#[test]
fn request_json_round_trip_generates() {
    let json = full_request().to_json().unwrap();
    let report = ReportGenerator::default_config()
        .generate_from_json(&json, &ChartImages::new())
        .unwrap();
    assert_eq!(pdf_page_count(&report.bytes), report.page_count);
    assert!(report.page_count >= SectionKind::ALL.len());

    let err = ReportGenerator::default_config()
        .generate_from_json("{not json", &ChartImages::new())
        .unwrap_err();
    assert_eq!(err.stage(), "request");
}
