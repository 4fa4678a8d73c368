//! Building blocks shared by the section writers.

use super::SectionInput;
use crate::charts::ChartSlot;
use crate::config::Color;
use crate::error::{LayoutError, ReportWarning};
use crate::layout::text::{self, MM_PER_PT};
use crate::layout::{DrawOp, ImageOutcome, PageCursor, TextStyle};
use sr_common::{BreakdownEntry, Domain};

/// Cell padding inside table columns.
const CELL_PADDING: f32 = 2.0;

/// Group digits in thousands: `12345` becomes `12,345`.
pub fn fmt_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn fmt_pct(pct: f64) -> String {
    format!("{:.1}%", pct)
}

/// Line height for a font size, never tighter than the body line height.
fn line_height_for(input: &SectionInput<'_>, size: f32) -> f32 {
    (size * MM_PER_PT * 1.45).max(input.config.typography.line_height)
}

fn left(input: &SectionInput<'_>) -> f32 {
    input.config.page.margin_left
}

fn width(input: &SectionInput<'_>) -> f32 {
    input.config.page.content_width()
}

/// Section title with a rule underneath.
pub fn heading(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    title: &str,
) -> Result<(), LayoutError> {
    let typo = &input.config.typography;
    let palette = &input.config.palette;
    let lh = line_height_for(input, typo.heading_size);
    cursor.write_text(
        title,
        TextStyle::bold(typo.heading_size, palette.accent),
        left(input),
        width(input),
        lh,
    )?;
    cursor.rule(palette.rule, 4.0)?;
    Ok(())
}

/// Sub-heading, kept on the same page as at least a few lines after it.
pub fn subheading(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    title: &str,
) -> Result<(), LayoutError> {
    subheading_colored(input, cursor, title, input.config.palette.text)
}

pub fn subheading_colored(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    title: &str,
    color: Color,
) -> Result<(), LayoutError> {
    let typo = &input.config.typography;
    let lh = line_height_for(input, typo.subheading_size);
    cursor.skip(2.0)?;
    cursor.ensure_space(lh + typo.line_height * 3.0)?;
    cursor.write_text(
        title,
        TextStyle::bold(typo.subheading_size, color),
        left(input),
        width(input),
        lh,
    )?;
    cursor.skip(1.0)
}

/// Body paragraph across the content width.
pub fn paragraph(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    body: &str,
) -> Result<(), LayoutError> {
    let typo = &input.config.typography;
    cursor.write_text(
        body,
        TextStyle::regular(typo.body_size, input.config.palette.text),
        left(input),
        width(input),
        typo.line_height,
    )?;
    Ok(())
}

/// Smaller, muted paragraph.
pub fn note(input: &SectionInput<'_>, cursor: &mut PageCursor, body: &str) -> Result<(), LayoutError> {
    let typo = &input.config.typography;
    cursor.write_text(
        body,
        TextStyle::regular(typo.small_size, input.config.palette.muted),
        left(input),
        width(input),
        typo.line_height,
    )?;
    Ok(())
}

/// Indented list item with a leading marker.
pub fn bullet(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    marker: &str,
    body: &str,
) -> Result<(), LayoutError> {
    let typo = &input.config.typography;
    let style = TextStyle::regular(typo.body_size, input.config.palette.text);
    let indent = text::text_width(marker, typo.body_size, false) + 2.0;
    let x = left(input) + 4.0;
    let placement = cursor.write_text(
        body,
        style,
        x + indent,
        width(input) - 4.0 - indent,
        typo.line_height,
    )?;
    if placement.lines > 0 && placement.first_page == cursor.page_number() {
        cursor.draw_text(marker, style, x, placement.top, typo.line_height);
    }
    Ok(())
}

/// The single placeholder line for a domain without data.
pub fn not_available(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    domain: Domain,
) -> Result<(), LayoutError> {
    note(input, cursor, &format!("{} data not available", domain.display_name()))
}

pub fn spacer(cursor: &mut PageCursor, height: f32) -> Result<(), LayoutError> {
    cursor.skip(height)
}

/// Column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Table column: header, share of the content width, alignment.
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub fraction: f32,
    pub align: Align,
}

impl Column {
    pub fn left(header: &str, fraction: f32) -> Self {
        Self {
            header: header.to_string(),
            fraction,
            align: Align::Left,
        }
    }

    pub fn right(header: &str, fraction: f32) -> Self {
        Self {
            header: header.to_string(),
            fraction,
            align: Align::Right,
        }
    }
}

/// Simple row-based table.
#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, cells: Vec<String>) -> Self {
        self.rows.push(cells);
        self
    }
}

fn draw_row(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    table: &Table,
    cells: &[String],
    header: bool,
) -> Result<(), LayoutError> {
    let typo = &input.config.typography;
    let palette = &input.config.palette;
    let row_height = typo.line_height + 1.5;
    let top = cursor.advance(row_height)?;
    let total = width(input);
    let style = if header {
        cursor.draw(DrawOp::Rect {
            x: left(input),
            y: top,
            width: total,
            height: row_height,
            fill: palette.table_header,
        });
        TextStyle::bold(typo.body_size, palette.text)
    } else {
        TextStyle::regular(typo.body_size, palette.text)
    };

    let mut x = left(input);
    for (column, cell) in table.columns.iter().zip(cells) {
        let col_width = total * column.fraction;
        let inner = (col_width - 2.0 * CELL_PADDING).max(1.0);
        let fitted = text::truncate_to_width(cell, style.size, style.is_bold(), inner);
        let cell_x = match column.align {
            Align::Left => x + CELL_PADDING,
            Align::Right => {
                x + col_width - CELL_PADDING - text::text_width(&fitted, style.size, style.is_bold())
            }
        };
        cursor.draw_text(&fitted, style, cell_x, top + 0.75, typo.line_height);
        x += col_width;
    }
    if !header {
        cursor.draw(DrawOp::Line {
            x1: left(input),
            y1: top + row_height,
            x2: left(input) + total,
            y2: top + row_height,
            color: palette.rule,
            width: 0.2,
        });
    }
    Ok(())
}

/// Draw a table row by row, repeating the header after every page break.
pub fn table(input: &SectionInput<'_>, cursor: &mut PageCursor, table: &Table) -> Result<(), LayoutError> {
    let row_height = input.config.typography.line_height + 1.5;
    let headers: Vec<String> = table.columns.iter().map(|c| c.header.clone()).collect();

    // Header plus the first row stay together.
    cursor.ensure_space(row_height * 2.0)?;
    draw_row(input, cursor, table, &headers, true)?;
    for cells in &table.rows {
        if cursor.remaining() < row_height && !cursor.at_top() {
            cursor.new_page();
            draw_row(input, cursor, table, &headers, true)?;
        }
        draw_row(input, cursor, table, cells, false)?;
    }
    cursor.skip(3.0)
}

/// Two-column metric/value table.
pub fn key_values(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    rows: &[(&str, String)],
) -> Result<(), LayoutError> {
    let mut t = Table::new(vec![Column::left("Metric", 0.6), Column::right("Value", 0.4)]);
    for (label, value) in rows {
        t = t.row(vec![label.to_string(), value.clone()]);
    }
    table(input, cursor, &t)
}

/// Label/count/share table for a breakdown, or a note when it is empty.
pub fn breakdown(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    label_header: &str,
    entries: &[BreakdownEntry],
    limit: usize,
) -> Result<(), LayoutError> {
    if entries.is_empty() {
        return note(
            input,
            cursor,
            &format!("No breakdown by {} was reported", label_header.to_lowercase()),
        );
    }
    let mut t = Table::new(vec![
        Column::left(label_header, 0.5),
        Column::right("Count", 0.25),
        Column::right("Share", 0.25),
    ]);
    for entry in entries.iter().take(limit) {
        t = t.row(vec![entry.label.clone(), fmt_count(entry.count), fmt_pct(entry.pct)]);
    }
    table(input, cursor, &t)
}

/// Place a chart image, or its fallback line plus a warning.
///
/// With `reserve` set, a cursor already past the configured image threshold
/// moves to a fresh page first.
pub fn chart(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    warnings: &mut Vec<ReportWarning>,
    slot: ChartSlot,
    reserve: bool,
) -> Result<(), LayoutError> {
    let typo = &input.config.typography;
    let images = &input.config.images;
    if reserve {
        cursor.break_if_past(images.break_threshold)?;
    }
    let max_width = images.max_width.min(width(input));
    let outcome = cursor.write_image(
        slot,
        input.charts.get(slot),
        left(input),
        max_width,
        TextStyle::regular(typo.small_size, input.config.palette.muted),
        typo.line_height,
    )?;
    match outcome {
        ImageOutcome::Placed { .. } => {
            note(input, cursor, slot.caption())?;
        }
        ImageOutcome::Fallback { reason } => {
            let reason = input
                .charts
                .unavailable_reason(slot)
                .map(str::to_string)
                .unwrap_or(reason);
            warnings.push(ReportWarning::ImageUnavailable { slot, reason });
        }
    }
    cursor.skip(3.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_count() {
        assert_eq!(fmt_count(0), "0");
        assert_eq!(fmt_count(999), "999");
        assert_eq!(fmt_count(1000), "1,000");
        assert_eq!(fmt_count(1234567), "1,234,567");
    }

    #[test]
    fn test_fmt_pct() {
        assert_eq!(fmt_pct(12.0), "12.0%");
        assert_eq!(fmt_pct(0.04), "0.0%");
    }
}
