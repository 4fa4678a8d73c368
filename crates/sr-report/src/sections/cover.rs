//! Cover page.

use super::blocks::{note, paragraph, spacer};
use super::SectionInput;
use crate::config::Color;
use crate::error::{LayoutError, ReportWarning};
use crate::layout::text::MM_PER_PT;
use crate::layout::{DrawOp, PageCursor, TextStyle};

const BADGE_WIDTH: f32 = 80.0;
const BADGE_HEIGHT: f32 = 12.0;
const BADGE_TEXT: Color = Color::rgb(255, 255, 255);

pub fn write(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    _warnings: &mut Vec<ReportWarning>,
) -> Result<(), LayoutError> {
    let config = input.config;
    let typo = &config.typography;
    let palette = &config.palette;
    let page = &config.page;
    let period = &input.metrics.period;

    spacer(cursor, 40.0)?;
    cursor.write_text(
        config.title(),
        TextStyle::bold(typo.title_size, palette.accent),
        page.margin_left,
        page.content_width(),
        typo.title_size * MM_PER_PT * 1.3,
    )?;
    if let Some(org) = &config.organization {
        cursor.write_text(
            org,
            TextStyle::regular(typo.heading_size, palette.text),
            page.margin_left,
            page.content_width(),
            typo.heading_size * MM_PER_PT * 1.4,
        )?;
    }
    cursor.rule(palette.rule, 8.0)?;

    cursor.write_text(
        &period.label,
        TextStyle::bold(typo.subheading_size, palette.text),
        page.margin_left,
        page.content_width(),
        typo.line_height + 1.0,
    )?;
    paragraph(input, cursor, &format!("Reporting period: {}", period.range_formatted()))?;
    note(
        input,
        cursor,
        &format!("Generated: {}", input.generated_at.format("%Y-%m-%d %H:%M UTC")),
    )?;
    spacer(cursor, 12.0)?;

    let level = input.risk.level;
    let top = cursor.advance(BADGE_HEIGHT)?;
    cursor.draw(DrawOp::Rect {
        x: page.margin_left,
        y: top,
        width: BADGE_WIDTH,
        height: BADGE_HEIGHT,
        fill: palette.risk_color(level),
    });
    cursor.draw_text(
        &format!("OVERALL RISK: {}", level),
        TextStyle::bold(typo.subheading_size, BADGE_TEXT),
        page.margin_left + 4.0,
        top,
        BADGE_HEIGHT,
    );
    spacer(cursor, 4.0)?;
    paragraph(input, cursor, &input.risk.summary())
}
