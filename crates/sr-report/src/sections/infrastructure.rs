//! Endpoints, devices and tickets.

use super::blocks::{
    breakdown, chart, fmt_count, fmt_pct, heading, key_values, not_available, subheading,
};
use super::{SectionInput, SectionKind};
use crate::charts::ChartSlot;
use crate::error::{LayoutError, ReportWarning};
use crate::layout::PageCursor;
use sr_common::Domain;

fn with_pct(count: u64, pct: f64) -> String {
    format!("{} ({})", fmt_count(count), fmt_pct(pct))
}

pub fn write(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    warnings: &mut Vec<ReportWarning>,
) -> Result<(), LayoutError> {
    heading(input, cursor, SectionKind::InfrastructureStatus.title())?;
    let metrics = input.metrics;

    subheading(input, cursor, "Endpoints")?;
    let endpoints = &metrics.endpoints;
    if endpoints.available {
        key_values(
            input,
            cursor,
            &[
                ("Total endpoints", fmt_count(endpoints.total)),
                ("Active", with_pct(endpoints.active, endpoints.active_pct)),
                (
                    "Disconnected",
                    with_pct(endpoints.disconnected, endpoints.disconnected_pct),
                ),
                (
                    "Never connected",
                    with_pct(endpoints.never_connected, endpoints.never_connected_pct),
                ),
                ("Pending", fmt_count(endpoints.pending)),
            ],
        )?;
        breakdown(input, cursor, "Operating system", &endpoints.by_os, usize::MAX)?;
        chart(input, cursor, warnings, ChartSlot::EndpointStatus, true)?;
    } else {
        not_available(input, cursor, Domain::Endpoints)?;
    }

    subheading(input, cursor, "Devices")?;
    let devices = &metrics.devices;
    if devices.available {
        key_values(
            input,
            cursor,
            &[
                ("Total devices", fmt_count(devices.total)),
                ("Online", with_pct(devices.online, devices.online_pct)),
                ("Offline", with_pct(devices.offline, devices.offline_pct)),
            ],
        )?;
        breakdown(input, cursor, "Device type", &devices.by_type, usize::MAX)?;
    } else {
        not_available(input, cursor, Domain::Devices)?;
    }

    subheading(input, cursor, "Tickets")?;
    let tickets = &metrics.tickets;
    if tickets.available {
        key_values(
            input,
            cursor,
            &[
                ("Total tickets", fmt_count(tickets.total)),
                ("Open", with_pct(tickets.open, tickets.open_pct)),
                ("In progress", fmt_count(tickets.in_progress)),
                ("Resolved", with_pct(tickets.resolved, tickets.resolved_pct)),
            ],
        )?;
        breakdown(input, cursor, "Priority", &tickets.by_priority, usize::MAX)?;
        chart(input, cursor, warnings, ChartSlot::TicketStatus, true)?;
    } else {
        not_available(input, cursor, Domain::Tickets)?;
    }
    Ok(())
}
