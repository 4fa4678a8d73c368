//! PDF encoding of a composed [`Document`].
//!
//! Page coordinates are millimetres from the top-left corner; PDF user space
//! is points from the bottom-left. Text uses the standard Helvetica faces
//! with WinAnsi encoding, so no fonts are embedded.

use crate::config::{Color, ReportConfig};
use crate::layout::text::text_width;
use crate::layout::{Document, DrawOp, Footer, ImageResource, TextStyle};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Object, ObjectId, Stream};
use tracing::debug;

const PT_PER_MM: f32 = 72.0 / 25.4;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";

/// Millimetre to point conversion with the y axis flipped.
struct Space {
    height_mm: f32,
}

impl Space {
    fn x(&self, mm: f32) -> f32 {
        mm * PT_PER_MM
    }

    fn y(&self, mm: f32) -> f32 {
        (self.height_mm - mm) * PT_PER_MM
    }

    fn len(&self, mm: f32) -> f32 {
        mm * PT_PER_MM
    }
}

/// Encode text as WinAnsi bytes; characters outside Latin-1 become `?`.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7e | 0xa0..=0xff => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

fn fill_color(color: Color) -> Operation {
    let [r, g, b] = color.components();
    Operation::new("rg", vec![r.into(), g.into(), b.into()])
}

fn stroke_color(color: Color) -> Operation {
    let [r, g, b] = color.components();
    Operation::new("RG", vec![r.into(), g.into(), b.into()])
}

fn text_ops(ops: &mut Vec<Operation>, space: &Space, x: f32, y: f32, style: TextStyle, text: &str) {
    let font = if style.is_bold() { FONT_BOLD } else { FONT_REGULAR };
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), style.size.into()]));
    ops.push(fill_color(style.color));
    ops.push(Operation::new(
        "Td",
        vec![space.x(x).into(), space.y(y).into()],
    ));
    ops.push(Operation::new(
        "Tj",
        vec![Object::string_literal(encode_text(text))],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn image_name(index: usize) -> String {
    format!("Im{}", index)
}

fn page_operations(
    space: &Space,
    ops_in: &[DrawOp],
    footer: &Footer,
    config: &ReportConfig,
) -> Vec<Operation> {
    let mut ops = Vec::new();
    for op in ops_in {
        match op {
            DrawOp::Text(run) => text_ops(&mut ops, space, run.x, run.y, run.style, &run.text),
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => {
                ops.push(fill_color(*fill));
                ops.push(Operation::new(
                    "re",
                    vec![
                        space.x(*x).into(),
                        space.y(y + height).into(),
                        space.len(*width).into(),
                        space.len(*height).into(),
                    ],
                ));
                ops.push(Operation::new("f", vec![]));
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                width,
            } => {
                ops.push(stroke_color(*color));
                ops.push(Operation::new("w", vec![space.len(*width).into()]));
                ops.push(Operation::new("m", vec![space.x(*x1).into(), space.y(*y1).into()]));
                ops.push(Operation::new("l", vec![space.x(*x2).into(), space.y(*y2).into()]));
                ops.push(Operation::new("S", vec![]));
            }
            DrawOp::Image {
                resource,
                x,
                y,
                width,
                height,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        space.len(*width).into(),
                        0i64.into(),
                        0i64.into(),
                        space.len(*height).into(),
                        space.x(*x).into(),
                        space.y(y + height).into(),
                    ],
                ));
                ops.push(Operation::new(
                    "Do",
                    vec![Object::Name(image_name(*resource).into_bytes())],
                ));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }

    // Footer sits in the reserved band above the bottom margin.
    let page = &config.page;
    let style = TextStyle::regular(config.typography.small_size, config.palette.muted);
    let baseline = page.content_limit() + page.footer_reserve * 0.6;
    text_ops(&mut ops, space, page.margin_left, baseline, style, &footer.label);
    let number = footer.page_text();
    let number_x = page.width - page.margin_right - text_width(&number, style.size, false);
    text_ops(&mut ops, space, number_x, baseline, style, &number);
    ops
}

fn image_object(doc: &mut lopdf::Document, image: &ImageResource) -> ObjectId {
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.width_px as i64,
        "Height" => image.height_px as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8i64,
    };
    if let Some(alpha) = &image.alpha {
        let mask = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width_px as i64,
                "Height" => image.height_px as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8i64,
            },
            alpha.clone(),
        );
        let mask_id = doc.add_object(mask);
        dict.set("SMask", Object::Reference(mask_id));
    }
    doc.add_object(Stream::new(dict, image.rgb.clone()))
}

fn pdf_date(document: &Document) -> String {
    format!("D:{}Z", document.generated_at.format("%Y%m%d%H%M%S"))
}

/// Serialize a document to PDF bytes.
pub fn encode(document: &Document, config: &ReportConfig) -> Result<Vec<u8>, lopdf::Error> {
    let (width_mm, height_mm) = document.page_size;
    let space = Space { height_mm };
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut xobjects = Dictionary::new();
    for (index, image) in document.images.iter().enumerate() {
        let id = image_object(&mut doc, image);
        xobjects.set(image_name(index), Object::Reference(id));
    }

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular_id,
            FONT_BOLD => bold_id,
        },
        "XObject" => xobjects,
    });

    let media_box: Vec<Object> = vec![
        0i64.into(),
        0i64.into(),
        space.len(width_mm).into(),
        space.len(height_mm).into(),
    ];

    let mut kids = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let content = Content {
            operations: page_operations(&space, &page.ops, &page.footer, config),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => media_box.clone(),
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_text(&document.title)),
        "Producer" => Object::string_literal(concat!("sr-report ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::string_literal(pdf_date(document)),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    debug!(
        pages = document.pages.len(),
        images = document.images.len(),
        bytes = bytes.len(),
        "PDF encoded"
    );
    Ok(bytes)
}
