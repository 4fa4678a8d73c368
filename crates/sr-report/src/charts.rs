//! Chart slots and concurrent chart-image acquisition.
//!
//! The engine never draws charts itself. It describes what each slot should
//! show ([`chart_specs`]), hands the specs to an external [`ChartRenderer`]
//! and embeds whatever raster bytes come back. Renders run on a fixed pool
//! of worker threads with a per-render timeout; a slot that fails or times
//! out is simply absent and falls back to text during composition.

use crate::config::ChartFetchConfig;
use serde::{Deserialize, Serialize};
use sr_common::{BreakdownEntry, NormalizedMetrics};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Countries shown in the threat chart and table.
pub const TOP_COUNTRIES: usize = 10;

/// Named chart position in the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ChartSlot {
    LogLevels,
    EndpointStatus,
    TicketStatus,
    AnalyticsTactics,
    SessionServices,
    ThreatCountries,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 6] = [
        ChartSlot::LogLevels,
        ChartSlot::EndpointStatus,
        ChartSlot::TicketStatus,
        ChartSlot::AnalyticsTactics,
        ChartSlot::SessionServices,
        ChartSlot::ThreatCountries,
    ];

    /// Stable identifier.
    pub fn id(&self) -> &'static str {
        match self {
            ChartSlot::LogLevels => "log_levels",
            ChartSlot::EndpointStatus => "endpoint_status",
            ChartSlot::TicketStatus => "ticket_status",
            ChartSlot::AnalyticsTactics => "analytics_tactics",
            ChartSlot::SessionServices => "session_services",
            ChartSlot::ThreatCountries => "threat_countries",
        }
    }

    /// Human-readable chart title.
    pub fn caption(&self) -> &'static str {
        match self {
            ChartSlot::LogLevels => "Log events by level",
            ChartSlot::EndpointStatus => "Endpoint status",
            ChartSlot::TicketStatus => "Ticket status",
            ChartSlot::AnalyticsTactics => "Alerts by tactic",
            ChartSlot::SessionServices => "Sessions by service",
            ChartSlot::ThreatCountries => "Threat events by country",
        }
    }
}

impl fmt::Display for ChartSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ChartSlot {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartSlot::ALL
            .into_iter()
            .find(|slot| slot.id() == s)
            .ok_or_else(|| ChartError::UnknownSlot(s.to_string()))
    }
}

/// Chart style requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Doughnut,
    Bar,
}

/// What the renderer should draw for one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub slot: ChartSlot,
    pub title: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

/// Chart errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("unknown chart slot: {0}")]
    UnknownSlot(String),

    #[error("render failed: {0}")]
    Render(String),

    #[error("render timed out after {0} ms")]
    Timeout(u64),

    #[error("all {0} render workers stalled past the timeout")]
    Stalled(usize),
}

/// External chart renderer.
///
/// Implementations turn a spec into PNG or JPEG bytes. They are called from
/// worker threads, possibly several at once.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>, ChartError>;
}

/// Raster bytes per slot, plus the reason for each slot that is missing.
#[derive(Debug, Clone, Default)]
pub struct ChartImages {
    images: BTreeMap<ChartSlot, Vec<u8>>,
    failures: BTreeMap<ChartSlot, String>,
}

impl ChartImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, slot: ChartSlot, bytes: Vec<u8>) -> Self {
        self.insert(slot, bytes);
        self
    }

    pub fn insert(&mut self, slot: ChartSlot, bytes: Vec<u8>) {
        self.failures.remove(&slot);
        self.images.insert(slot, bytes);
    }

    pub fn get(&self, slot: ChartSlot) -> Option<&[u8]> {
        self.images.get(&slot).map(Vec::as_slice)
    }

    /// Record why a slot has no image.
    pub fn mark_unavailable(&mut self, slot: ChartSlot, reason: impl Into<String>) {
        self.images.remove(&slot);
        self.failures.insert(slot, reason.into());
    }

    pub fn unavailable_reason(&self, slot: ChartSlot) -> Option<&str> {
        self.failures.get(&slot).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

fn breakdown_spec(
    slot: ChartSlot,
    kind: ChartKind,
    entries: &[BreakdownEntry],
    limit: usize,
) -> Option<ChartSpec> {
    let entries: Vec<&BreakdownEntry> = entries.iter().filter(|e| e.count > 0).take(limit).collect();
    if entries.is_empty() {
        return None;
    }
    Some(ChartSpec {
        slot,
        title: slot.caption().to_string(),
        kind,
        labels: entries.iter().map(|e| e.label.clone()).collect(),
        values: entries.iter().map(|e| e.count).collect(),
    })
}

fn status_spec(slot: ChartSlot, kind: ChartKind, parts: &[(&str, u64)]) -> Option<ChartSpec> {
    if parts.iter().all(|(_, v)| *v == 0) {
        return None;
    }
    Some(ChartSpec {
        slot,
        title: slot.caption().to_string(),
        kind,
        labels: parts.iter().map(|(l, _)| l.to_string()).collect(),
        values: parts.iter().map(|(_, v)| *v).collect(),
    })
}

/// Specs for every slot whose domain is available and has data.
pub fn chart_specs(metrics: &NormalizedMetrics) -> Vec<ChartSpec> {
    let mut specs = Vec::new();

    let logs = &metrics.logs;
    if logs.available {
        let spec = breakdown_spec(ChartSlot::LogLevels, ChartKind::Pie, &logs.by_level, usize::MAX)
            .or_else(|| {
                status_spec(
                    ChartSlot::LogLevels,
                    ChartKind::Pie,
                    &[("Major", logs.major), ("Minor", logs.minor)],
                )
            });
        specs.extend(spec);
    }

    let endpoints = &metrics.endpoints;
    if endpoints.available {
        specs.extend(status_spec(
            ChartSlot::EndpointStatus,
            ChartKind::Doughnut,
            &[
                ("Active", endpoints.active),
                ("Disconnected", endpoints.disconnected),
                ("Never connected", endpoints.never_connected),
                ("Pending", endpoints.pending),
            ],
        ));
    }

    let tickets = &metrics.tickets;
    if tickets.available {
        specs.extend(status_spec(
            ChartSlot::TicketStatus,
            ChartKind::Bar,
            &[
                ("Open", tickets.open),
                ("In progress", tickets.in_progress),
                ("Resolved", tickets.resolved),
            ],
        ));
    }

    if metrics.analytics.available {
        specs.extend(breakdown_spec(
            ChartSlot::AnalyticsTactics,
            ChartKind::Bar,
            &metrics.analytics.by_tactic,
            usize::MAX,
        ));
    }

    if metrics.sessions.available {
        specs.extend(breakdown_spec(
            ChartSlot::SessionServices,
            ChartKind::Bar,
            &metrics.sessions.by_service,
            usize::MAX,
        ));
    }

    if metrics.threat_intel.available {
        specs.extend(breakdown_spec(
            ChartSlot::ThreatCountries,
            ChartKind::Bar,
            &metrics.threat_intel.by_country,
            TOP_COUNTRIES,
        ));
    }

    debug!(count = specs.len(), "chart specs built");
    specs
}

/// Message sent from a render worker to the collector.
enum WorkerEvent {
    Started(ChartSlot, Instant),
    Finished(ChartSlot, Result<Vec<u8>, ChartError>),
}

fn next_spec(queue: &Mutex<VecDeque<ChartSpec>>) -> Option<ChartSpec> {
    queue.lock().ok().and_then(|mut q| q.pop_front())
}

fn render_worker(
    renderer: Arc<dyn ChartRenderer>,
    queue: Arc<Mutex<VecDeque<ChartSpec>>>,
    tx: mpsc::Sender<WorkerEvent>,
) {
    while let Some(spec) = next_spec(&queue) {
        if tx.send(WorkerEvent::Started(spec.slot, Instant::now())).is_err() {
            return;
        }
        let result = panic::catch_unwind(AssertUnwindSafe(|| renderer.render(&spec)))
            .unwrap_or_else(|_| Err(ChartError::Render("renderer panicked".to_string())));
        // The collector is gone once every slot was resolved.
        if tx.send(WorkerEvent::Finished(spec.slot, result)).is_err() {
            return;
        }
    }
}

fn record(images: &mut ChartImages, slot: ChartSlot, result: Result<Vec<u8>, ChartError>) {
    match result {
        Ok(bytes) if !bytes.is_empty() => {
            debug!(%slot, bytes = bytes.len(), "chart rendered");
            images.insert(slot, bytes);
        }
        Ok(_) => {
            warn!(%slot, "renderer returned no bytes");
            images.mark_unavailable(slot, "renderer returned no bytes");
        }
        Err(e) => {
            warn!(%slot, error = %e, "chart render failed");
            images.mark_unavailable(slot, e.to_string());
        }
    }
}

/// Render every spec on a bounded worker pool.
///
/// A fixed set of `effective_workers()` threads pulls specs from a shared
/// queue, so no more than that many renders ever run at once. Each render
/// gets `timeout_ms` from the moment it starts; a render past its deadline
/// is abandoned and its slot marked unavailable, while its worker stays
/// occupied until the renderer returns. When every worker is held by an
/// abandoned render, the specs still queued are marked unavailable.
/// Returns only once every slot is resolved.
pub fn acquire_chart_images(
    renderer: Arc<dyn ChartRenderer>,
    specs: Vec<ChartSpec>,
    config: &ChartFetchConfig,
) -> ChartImages {
    let start = Instant::now();
    let total = specs.len();
    let workers = config.effective_workers().min(total);
    let timeout = Duration::from_millis(config.timeout_ms);
    let mut images = ChartImages::new();
    if total == 0 {
        return images;
    }

    let queue = Arc::new(Mutex::new(specs.into_iter().collect::<VecDeque<_>>()));
    let (tx, rx) = mpsc::channel::<WorkerEvent>();
    for _ in 0..workers {
        let renderer = Arc::clone(&renderer);
        let queue = Arc::clone(&queue);
        let tx = tx.clone();
        std::thread::spawn(move || render_worker(renderer, queue, tx));
    }
    drop(tx);

    let mut running: BTreeMap<ChartSlot, Instant> = BTreeMap::new();
    let mut stalled = 0usize;
    let mut resolved = 0usize;

    while resolved < total {
        if stalled == workers && running.is_empty() {
            let queued: Vec<ChartSpec> = queue
                .lock()
                .map(|mut q| q.drain(..).collect())
                .unwrap_or_default();
            for spec in queued {
                warn!(slot = %spec.slot, "no free render worker");
                images.mark_unavailable(spec.slot, ChartError::Stalled(workers).to_string());
                resolved += 1;
            }
            // A freed worker may already hold a spec whose start is still queued
            // in the channel.
            if resolved == total {
                break;
            }
        }

        let now = Instant::now();
        let wait = running
            .values()
            .min()
            .map_or(timeout, |deadline| deadline.saturating_duration_since(now));

        match rx.recv_timeout(wait) {
            Ok(WorkerEvent::Started(slot, at)) => {
                running.insert(slot, at + timeout);
            }
            Ok(WorkerEvent::Finished(slot, result)) => {
                if running.remove(&slot).is_some() {
                    record(&mut images, slot, result);
                    resolved += 1;
                } else {
                    debug!(%slot, "late chart result discarded");
                    stalled = stalled.saturating_sub(1);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let now = Instant::now();
                let expired: Vec<ChartSlot> = running
                    .iter()
                    .filter(|(_, deadline)| **deadline <= now)
                    .map(|(slot, _)| *slot)
                    .collect();
                for slot in expired {
                    running.remove(&slot);
                    warn!(%slot, timeout_ms = config.timeout_ms, "chart render timed out");
                    images.mark_unavailable(slot, ChartError::Timeout(config.timeout_ms).to_string());
                    resolved += 1;
                    stalled += 1;
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                let queued: Vec<ChartSlot> = queue
                    .lock()
                    .map(|mut q| q.drain(..).map(|spec| spec.slot).collect())
                    .unwrap_or_default();
                for slot in std::mem::take(&mut running).into_keys().chain(queued) {
                    warn!(%slot, "chart worker exited without a result");
                    images.mark_unavailable(slot, "renderer exited without a result");
                    resolved += 1;
                }
                break;
            }
        }
    }

    info!(
        rendered = images.len(),
        workers,
        stalled,
        duration_ms = start.elapsed().as_millis() as u64,
        "chart acquisition finished"
    );
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use chrono::NaiveDate;
    use sr_common::{LogInput, ReportPeriod, ReportRequest, ThreatIntelInput};

    fn request() -> ReportRequest {
        ReportRequest::new(ReportPeriod::new(
            "Q4",
            NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        ))
    }

    #[test]
    fn test_slot_ids_roundtrip() {
        for slot in ChartSlot::ALL {
            assert_eq!(slot.id().parse::<ChartSlot>().unwrap(), slot);
        }
        assert!(matches!(
            "pie_chart".parse::<ChartSlot>(),
            Err(ChartError::UnknownSlot(_))
        ));
    }

    #[test]
    fn test_no_specs_without_data() {
        let metrics = normalize(&request()).metrics;
        assert!(chart_specs(&metrics).is_empty());
    }

    #[test]
    fn test_log_spec_falls_back_to_major_minor() {
        let req = request().with_logs(LogInput {
            total: Some(100),
            major: Some(10),
            ..Default::default()
        });
        let specs = chart_specs(&normalize(&req).metrics);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].slot, ChartSlot::LogLevels);
        assert_eq!(specs[0].labels, vec!["Major", "Minor"]);
        assert_eq!(specs[0].values, vec![10, 90]);
    }

    #[test]
    fn test_threat_spec_limited_to_top_countries() {
        let by_country = (0..15)
            .map(|i| (format!("C{:02}", i), 100 - i as i64))
            .collect();
        let req = request().with_threat_intel(ThreatIntelInput {
            total_events: Some(1500),
            by_country,
            ..Default::default()
        });
        let specs = chart_specs(&normalize(&req).metrics);
        assert_eq!(specs[0].labels.len(), TOP_COUNTRIES);
        assert_eq!(specs[0].labels[0], "C00");
    }

    #[test]
    fn test_images_mark_and_insert() {
        let mut images = ChartImages::new();
        images.mark_unavailable(ChartSlot::TicketStatus, "boom");
        assert_eq!(images.unavailable_reason(ChartSlot::TicketStatus), Some("boom"));
        images.insert(ChartSlot::TicketStatus, vec![1, 2, 3]);
        assert!(images.unavailable_reason(ChartSlot::TicketStatus).is_none());
        assert_eq!(images.get(ChartSlot::TicketStatus), Some(&[1u8, 2, 3][..]));
    }
}
