//! Page layout: text measurement, the page cursor and the document model.

pub mod cursor;
pub mod document;
pub mod text;

pub use cursor::{ImageOutcome, PageCursor, TextPlacement};
pub use document::{
    Document, DrawOp, FontWeight, Footer, ImageResource, Page, SectionMark, TextRun, TextStyle,
};
