//! Recommendation rules engine.
//!
//! Rules are a static, ordered table of independent predicate → message
//! pairs. Predicates compare unrounded ratios; messages show the rounded
//! figures. Every matching rule fires. Two standing low-priority rules always
//! match, so the output is never empty. Output is sorted by priority
//! descending; the sort is stable, so ties keep table order.

use crate::config::RuleThresholds;
use crate::risk::{RiskAssessment, RiskLevel};
use serde::{Deserialize, Serialize};
use sr_common::{ratio_pct, NormalizedMetrics};
use std::fmt;
use tracing::debug;

/// Recommendation priority. Ordering is Low < Medium < High < Urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// All priorities, most urgent first.
    pub const DESCENDING: [Priority; 4] =
        [Priority::Urgent, Priority::High, Priority::Medium, Priority::Low];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One action item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    /// Identifier of the rule that produced it.
    pub rule_id: String,
    pub text: String,
}

/// Everything a rule may look at.
pub struct RuleContext<'a> {
    pub metrics: &'a NormalizedMetrics,
    pub risk: &'a RiskAssessment,
    pub thresholds: &'a RuleThresholds,
}

/// A declarative recommendation rule.
pub struct Rule {
    pub id: &'static str,
    pub priority: Priority,
    pub applies: fn(&RuleContext<'_>) -> bool,
    pub message: fn(&RuleContext<'_>) -> String,
}

fn plural(n: u64, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

/// The rule table, in evaluation order.
pub static RULES: &[Rule] = &[
    Rule {
        id: "escalate_high_risk",
        priority: Priority::Urgent,
        applies: |ctx| ctx.risk.level == RiskLevel::High,
        message: |ctx| {
            format!(
                "Escalate to incident response: overall risk is HIGH (critical event rate {:.1}%, endpoint health {:.1}%)",
                ctx.risk.critical_event_rate, ctx.risk.endpoint_health
            )
        },
    },
    Rule {
        id: "reconnect_endpoints",
        priority: Priority::High,
        applies: |ctx| ctx.metrics.endpoints.disconnected > 0,
        message: |ctx| {
            format!(
                "Reconnect {} to restore monitoring coverage",
                plural(
                    ctx.metrics.endpoints.disconnected,
                    "disconnected endpoint",
                    "disconnected endpoints"
                )
            )
        },
    },
    Rule {
        id: "critical_event_rate",
        priority: Priority::High,
        applies: |ctx| {
            let logs = &ctx.metrics.logs;
            ratio_pct(logs.major, logs.total) > ctx.thresholds.critical_event_rate
        },
        message: |ctx| {
            format!(
                "Investigate elevated critical event rate: {:.1}% of {} events were major",
                ctx.risk.critical_event_rate, ctx.metrics.logs.total
            )
        },
    },
    Rule {
        id: "session_block_rate",
        priority: Priority::High,
        applies: |ctx| {
            let sessions = &ctx.metrics.sessions;
            ratio_pct(sessions.blocked, sessions.total) > ctx.thresholds.session_block_pct
        },
        message: |ctx| {
            format!(
                "Review authentication controls: {:.1}% of sessions ({}) were blocked",
                ctx.metrics.sessions.blocked_pct, ctx.metrics.sessions.blocked
            )
        },
    },
    Rule {
        id: "configure_endpoints",
        priority: Priority::Medium,
        applies: |ctx| ctx.metrics.endpoints.never_connected > 0,
        message: |ctx| {
            format!(
                "Configure {} that have never connected",
                plural(ctx.metrics.endpoints.never_connected, "endpoint", "endpoints")
            )
        },
    },
    Rule {
        id: "ticket_backlog",
        priority: Priority::Medium,
        applies: |ctx| {
            let tickets = &ctx.metrics.tickets;
            ratio_pct(tickets.open, tickets.total) > ctx.thresholds.open_ticket_pct
        },
        message: |ctx| {
            format!(
                "Prioritize ticket resolution: {} of {} tickets ({:.1}%) remain open",
                ctx.metrics.tickets.open, ctx.metrics.tickets.total, ctx.metrics.tickets.open_pct
            )
        },
    },
    Rule {
        id: "failed_logins",
        priority: Priority::Medium,
        applies: |ctx| {
            let sessions = &ctx.metrics.sessions;
            ratio_pct(sessions.failed, sessions.total) > ctx.thresholds.failed_login_pct
        },
        message: |ctx| {
            format!(
                "Audit failed logins: {:.1}% of sessions ({}) failed authentication",
                ctx.metrics.sessions.failed_pct, ctx.metrics.sessions.failed
            )
        },
    },
    Rule {
        id: "offline_devices",
        priority: Priority::Medium,
        applies: |ctx| ctx.metrics.devices.offline > 0,
        message: |ctx| {
            format!(
                "Restore connectivity for {}",
                plural(ctx.metrics.devices.offline, "offline device", "offline devices")
            )
        },
    },
    Rule {
        id: "threat_concentration",
        priority: Priority::Medium,
        applies: |ctx| {
            ctx.metrics.threat_intel.top_country_share() > ctx.thresholds.threat_country_pct
        },
        message: |ctx| match ctx.metrics.threat_intel.top_country() {
            Some(c) => format!(
                "Evaluate geo-blocking for {}, the source of {:.1}% of threat activity",
                c.label, c.pct
            ),
            None => String::new(),
        },
    },
    Rule {
        id: "analytics_anomalies",
        priority: Priority::Medium,
        applies: |ctx| ctx.metrics.analytics.anomalies > 0,
        message: |ctx| {
            format!(
                "Triage {} flagged by advanced analytics",
                plural(ctx.metrics.analytics.anomalies, "anomaly", "anomalies")
            )
        },
    },
    Rule {
        id: "security_training",
        priority: Priority::Low,
        applies: |_| true,
        message: |_| "Continue ongoing security awareness training for all staff".to_string(),
    },
    Rule {
        id: "quarterly_review",
        priority: Priority::Low,
        applies: |_| true,
        message: |_| "Schedule a quarterly review of security policies and controls".to_string(),
    },
];

/// Evaluate a rule table against a context.
pub fn evaluate(rules: &[Rule], ctx: &RuleContext<'_>) -> Vec<Recommendation> {
    let mut out: Vec<Recommendation> = rules
        .iter()
        .filter(|rule| (rule.applies)(ctx))
        .map(|rule| {
            debug!(rule = rule.id, priority = %rule.priority, "rule fired");
            Recommendation {
                priority: rule.priority,
                rule_id: rule.id.to_string(),
                text: (rule.message)(ctx),
            }
        })
        .collect();
    out.sort_by(|a, b| b.priority.cmp(&a.priority));
    out
}

/// Evaluate the built-in rule table.
pub fn recommend(
    metrics: &NormalizedMetrics,
    risk: &RiskAssessment,
    thresholds: &RuleThresholds,
) -> Vec<Recommendation> {
    let ctx = RuleContext {
        metrics,
        risk,
        thresholds,
    };
    evaluate(RULES, &ctx)
}
