//! In-memory document model.
//!
//! A [`Document`] is the engine's only artifact: ordered pages of draw
//! operations in page coordinates (millimetres, origin top-left), plus the
//! decoded images they reference and the page each section starts on.

use crate::charts::ChartSlot;
use crate::config::Color;
use crate::sections::SectionKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Font face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Bold,
}

/// Text appearance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub size: f32,
    pub weight: FontWeight,
    pub color: Color,
}

impl TextStyle {
    pub fn regular(size: f32, color: Color) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
            color,
        }
    }

    pub fn bold(size: f32, color: Color) -> Self {
        Self {
            size,
            weight: FontWeight::Bold,
            color,
        }
    }

    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Bold
    }
}

/// A single line of text. `y` is the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub style: TextStyle,
    pub text: String,
}

/// One drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Text(TextRun),
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Color,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Color,
        width: f32,
    },
    Image {
        /// Index into [`Document::images`].
        resource: usize,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// Decoded raster ready for embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageResource {
    pub slot: ChartSlot,
    pub width_px: u32,
    pub height_px: u32,
    /// Packed 8-bit RGB samples.
    pub rgb: Vec<u8>,
    /// 8-bit alpha samples, when the source had transparency.
    pub alpha: Option<Vec<u8>>,
}

/// Page footer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footer {
    pub label: String,
    pub page_number: u32,
}

impl Footer {
    pub fn page_text(&self) -> String {
        format!("Page {}", self.page_number)
    }
}

/// A finalized page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub number: u32,
    pub ops: Vec<DrawOp>,
    pub footer: Footer,
}

impl Page {
    /// Text lines in drawing order.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            _ => None,
        })
    }

    pub fn image_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Image { .. }))
            .count()
    }
}

/// Where a section begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionMark {
    pub kind: SectionKind,
    pub first_page: u32,
}

/// The assembled report.
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    /// Page width and height in millimetres.
    pub page_size: (f32, f32),
    pub pages: Vec<Page>,
    pub images: Vec<ImageResource>,
    pub sections: Vec<SectionMark>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text on a page (1-based), one entry per line.
    pub fn page_text(&self, number: u32) -> Vec<&str> {
        self.pages
            .iter()
            .find(|p| p.number == number)
            .map(|p| p.text_runs().map(|r| r.text.as_str()).collect())
            .unwrap_or_default()
    }

    /// Whether any line on any page contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.pages
            .iter()
            .flat_map(|p| p.text_runs())
            .any(|r| r.text.contains(needle))
    }

    /// First page of a section.
    pub fn section_start(&self, kind: SectionKind) -> Option<u32> {
        self.sections
            .iter()
            .find(|m| m.kind == kind)
            .map(|m| m.first_page)
    }

    /// Pages belonging to a section (from its start up to the next section).
    pub fn section_pages(&self, kind: SectionKind) -> Vec<&Page> {
        let Some(pos) = self.sections.iter().position(|m| m.kind == kind) else {
            return Vec::new();
        };
        let start = self.sections[pos].first_page;
        let end = self
            .sections
            .get(pos + 1)
            .map(|m| m.first_page)
            .unwrap_or(u32::MAX);
        self.pages
            .iter()
            .filter(|p| p.number >= start && p.number < end)
            .collect()
    }

    /// Text of every page in a section.
    pub fn section_text(&self, kind: SectionKind) -> Vec<&str> {
        self.section_pages(kind)
            .into_iter()
            .flat_map(|p| p.text_runs().map(|r| r.text.as_str()))
            .collect()
    }

    /// SHA-256 over page content, image samples and section layout.
    ///
    /// Two documents with the same fingerprint render identically.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        for page in &self.pages {
            hasher.update(page.number.to_le_bytes());
            for op in &page.ops {
                // Serialization of plain data into a Vec cannot fail.
                if let Ok(bytes) = serde_json::to_vec(op) {
                    hasher.update(&bytes);
                }
            }
            hasher.update(page.footer.label.as_bytes());
        }
        for image in &self.images {
            hasher.update(image.width_px.to_le_bytes());
            hasher.update(image.height_px.to_le_bytes());
            hasher.update(&image.rgb);
            if let Some(alpha) = &image.alpha {
                hasher.update(alpha);
            }
        }
        for mark in &self.sections {
            hasher.update(mark.kind.title().as_bytes());
            hasher.update(mark.first_page.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}
