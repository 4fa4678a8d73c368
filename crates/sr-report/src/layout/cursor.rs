//! Page cursor.
//!
//! The cursor owns the pages being written and the vertical write offset.
//! Every block goes through [`PageCursor::advance`], which is the single
//! place page breaks happen. Invariants:
//!
//! - `y_offset` never drops below the top margin.
//! - A block that fits on a page never extends past the content limit.
//! - A page still at its top margin is never broken again, so an oversize
//!   block causes at most one break.

use crate::charts::ChartSlot;
use crate::config::{Color, PageLayout};
use crate::error::LayoutError;
use crate::layout::document::{DrawOp, Footer, ImageResource, Page, TextRun, TextStyle};
use crate::layout::text;
use image::GenericImageView;
use tracing::{debug, trace};

/// Tolerance for float accumulation when comparing against the limit.
const EPSILON: f32 = 1e-3;

/// Where a text block ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlacement {
    pub lines: usize,
    pub first_page: u32,
    pub top: f32,
}

/// Result of an image write.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    Placed {
        page: u32,
        width: f32,
        height: f32,
    },
    /// The image was skipped and a fallback line written instead.
    Fallback { reason: String },
}

/// Stateful layout cursor for one generation.
pub struct PageCursor {
    layout: PageLayout,
    page_number: u32,
    y_offset: f32,
    ops: Vec<DrawOp>,
    pages: Vec<Page>,
    images: Vec<ImageResource>,
}

fn check_finite(what: &'static str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LayoutError::NonFinite { what, value })
    }
}

fn check_positive(what: &'static str, value: f32) -> Result<(), LayoutError> {
    check_finite(what, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::NonPositive { what, value })
    }
}

impl PageCursor {
    /// Start on page 1 at the top margin.
    pub fn new(layout: PageLayout) -> Self {
        let y_offset = layout.margin_top;
        Self {
            layout,
            page_number: 1,
            y_offset,
            ops: Vec::new(),
            pages: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn y_offset(&self) -> f32 {
        self.y_offset
    }

    /// Lowest y a block may reach on the current page.
    pub fn limit(&self) -> f32 {
        self.layout.content_limit()
    }

    /// Space left on the current page.
    pub fn remaining(&self) -> f32 {
        (self.limit() - self.y_offset).max(0.0)
    }

    /// True when nothing has advanced the cursor on this page yet.
    pub fn at_top(&self) -> bool {
        self.y_offset <= self.layout.margin_top + EPSILON
    }

    /// Finalize the current page and open the next one.
    pub fn new_page(&mut self) {
        let page = Page {
            number: self.page_number,
            ops: std::mem::take(&mut self.ops),
            footer: Footer {
                label: self.layout.footer_label.clone(),
                page_number: self.page_number,
            },
        };
        trace!(page = page.number, ops = page.ops.len(), "page finalized");
        self.pages.push(page);
        self.page_number += 1;
        self.y_offset = self.layout.margin_top;
    }

    /// Reserve `height` for a block and return the y where it starts.
    ///
    /// Breaks first when the block would cross the content limit, unless the
    /// page is still empty. A block taller than the writable area starts at
    /// the top of a fresh page and leaves the cursor at the limit.
    pub fn advance(&mut self, height: f32) -> Result<f32, LayoutError> {
        check_finite("advance height", height)?;
        let height = height.max(0.0);
        if self.y_offset + height > self.limit() + EPSILON && !self.at_top() {
            debug!(
                page = self.page_number,
                y = self.y_offset,
                height,
                "block does not fit; breaking page"
            );
            self.new_page();
        }
        let start = self.y_offset;
        self.y_offset = (start + height).min(self.limit()).max(start);
        Ok(start)
    }

    /// Break when fewer than `height` units remain on a non-empty page.
    pub fn ensure_space(&mut self, height: f32) -> Result<(), LayoutError> {
        check_finite("reserved height", height)?;
        if self.remaining() + EPSILON < height && !self.at_top() {
            self.new_page();
        }
        Ok(())
    }

    /// Break when the cursor is already below `y` on a non-empty page.
    pub fn break_if_past(&mut self, y: f32) -> Result<(), LayoutError> {
        check_finite("break threshold", y)?;
        if self.y_offset > y && !self.at_top() {
            debug!(page = self.page_number, y = self.y_offset, threshold = y, "early break");
            self.new_page();
        }
        Ok(())
    }

    /// Add vertical space without drawing. Never breaks the page.
    pub fn skip(&mut self, height: f32) -> Result<(), LayoutError> {
        check_finite("skip height", height)?;
        self.y_offset = (self.y_offset + height.max(0.0))
            .min(self.limit())
            .max(self.layout.margin_top);
        Ok(())
    }

    /// Append a draw operation to the current page.
    pub fn draw(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    /// Draw a single line of text with its top at `top`.
    pub fn draw_text(&mut self, text: &str, style: TextStyle, x: f32, top: f32, line_height: f32) {
        self.ops.push(DrawOp::Text(TextRun {
            x,
            y: baseline(top, line_height, style.size),
            style,
            text: text.to_string(),
        }));
    }

    /// Wrap and write a paragraph.
    ///
    /// The whole block advances atomically, so a paragraph that does not
    /// fit moves to a fresh page intact. Only a paragraph taller than a full
    /// page is split, into page-sized chunks.
    pub fn write_text(
        &mut self,
        text: &str,
        style: TextStyle,
        x: f32,
        max_width: f32,
        line_height: f32,
    ) -> Result<TextPlacement, LayoutError> {
        check_finite("text x", x)?;
        check_positive("text max width", max_width)?;
        check_positive("line height", line_height)?;
        check_positive("font size", style.size)?;

        let lines = text::wrap(text, style.size, style.is_bold(), max_width);
        if lines.is_empty() {
            return Ok(TextPlacement {
                lines: 0,
                first_page: self.page_number,
                top: self.y_offset,
            });
        }

        let per_page = ((self.layout.writable_height() + EPSILON) / line_height)
            .floor()
            .max(1.0) as usize;
        let mut placement = None;
        for chunk in lines.chunks(per_page) {
            let top = self.advance(line_height * chunk.len() as f32)?;
            if placement.is_none() {
                placement = Some(TextPlacement {
                    lines: lines.len(),
                    first_page: self.page_number,
                    top,
                });
            }
            for (i, line) in chunk.iter().enumerate() {
                self.draw_text(line, style, x, top + line_height * i as f32, line_height);
            }
        }
        Ok(placement.unwrap_or(TextPlacement {
            lines: 0,
            first_page: self.page_number,
            top: self.y_offset,
        }))
    }

    /// Place a raster image at its native aspect ratio.
    ///
    /// Missing or undecodable bytes never fail: a one-line fallback is
    /// written and the reason returned. Images are scaled down to the
    /// writable height and never straddle a page break.
    pub fn write_image(
        &mut self,
        slot: ChartSlot,
        bytes: Option<&[u8]>,
        x: f32,
        max_width: f32,
        fallback_style: TextStyle,
        line_height: f32,
    ) -> Result<ImageOutcome, LayoutError> {
        check_finite("image x", x)?;
        check_positive("image max width", max_width)?;
        check_positive("line height", line_height)?;

        let decoded = match bytes {
            None => Err("image not supplied".to_string()),
            Some(bytes) => image::load_from_memory(bytes).map_err(|e| format!("decode failed: {}", e)),
        };
        let img = match decoded {
            Ok(img) if img.width() > 0 && img.height() > 0 => img,
            Ok(_) => return self.image_fallback(slot, "image has no pixels", x, max_width, fallback_style, line_height),
            Err(reason) => return self.image_fallback(slot, &reason, x, max_width, fallback_style, line_height),
        };

        let (px_w, px_h) = img.dimensions();
        let aspect = px_h as f32 / px_w as f32;
        let mut width = max_width;
        let mut height = width * aspect;
        let writable = self.layout.writable_height();
        if height > writable {
            height = writable;
            width = height / aspect;
        }

        let top = self.advance(height)?;
        let alpha = img
            .color()
            .has_alpha()
            .then(|| img.to_rgba8().pixels().map(|p| p[3]).collect::<Vec<u8>>());
        let resource = self.images.len();
        self.images.push(ImageResource {
            slot,
            width_px: px_w,
            height_px: px_h,
            rgb: img.to_rgb8().into_raw(),
            alpha,
        });
        self.ops.push(DrawOp::Image {
            resource,
            x,
            y: top,
            width,
            height,
        });
        debug!(%slot, page = self.page_number, width, height, "image placed");
        Ok(ImageOutcome::Placed {
            page: self.page_number,
            width,
            height,
        })
    }

    fn image_fallback(
        &mut self,
        slot: ChartSlot,
        reason: &str,
        x: f32,
        max_width: f32,
        style: TextStyle,
        line_height: f32,
    ) -> Result<ImageOutcome, LayoutError> {
        debug!(%slot, reason, "image unavailable; writing fallback");
        let line = format!("[Chart unavailable: {}]", slot.caption());
        let fitted = text::truncate_to_width(&line, style.size, style.is_bold(), max_width);
        let top = self.advance(line_height)?;
        self.draw_text(&fitted, style, x, top, line_height);
        Ok(ImageOutcome::Fallback {
            reason: reason.to_string(),
        })
    }

    /// Draw a horizontal rule across the content width at the current y.
    pub fn rule(&mut self, color: Color, gap: f32) -> Result<(), LayoutError> {
        let top = self.advance(gap)?;
        let y = top + gap / 2.0;
        self.ops.push(DrawOp::Line {
            x1: self.layout.margin_left,
            y1: y,
            x2: self.layout.width - self.layout.margin_right,
            y2: y,
            color,
            width: 0.3,
        });
        Ok(())
    }

    /// Finalize the last page and hand over pages and images.
    pub fn finish(mut self) -> (Vec<Page>, Vec<ImageResource>) {
        self.new_page();
        (self.pages, self.images)
    }
}

/// Baseline for a line whose box starts at `top`.
fn baseline(top: f32, line_height: f32, size_pt: f32) -> f32 {
    let glyph = size_pt * text::MM_PER_PT;
    top + (line_height + glyph * 0.7) / 2.0
}
