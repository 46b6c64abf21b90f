//! Draw-op list to a finished single-page A4 document.
//!
//! Text is drawn with the Helvetica base font referenced as a non-embedded
//! Type1 face with WinAnsiEncoding, which keeps the file small and matches
//! the metrics used for layout. Coordinates arrive top-down from layout and
//! are flipped into PDF space here.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

use super::image;
use super::RenderError;
use crate::color::Color;
use crate::document::{DrawOp, ImageFit, TextSpan};
use crate::geometry::Rect;
use crate::layout::{PAGE_HEIGHT, PAGE_WIDTH};

const FONT_RESOURCE: &str = "F1";
const BASE_FONT: &str = "Helvetica";
/// Baseline offset from the top of a line, as a fraction of font size.
const BASELINE_FACTOR: f32 = 0.8;
/// Circle-to-Bézier constant for rounded corners.
const KAPPA: f32 = 0.552_284_8;

pub fn render_pdf(ops: &[DrawOp]) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut page = PageWriter::new(&mut doc);
    for op in ops {
        page.draw(op);
    }
    let PageWriter {
        content,
        xobjects,
        ext_gstates,
        image_count,
        gstate_count,
        ..
    } = page;

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => BASE_FONT,
        "Encoding" => "WinAnsiEncoding",
    });
    let mut resources = dictionary! {
        "Font" => dictionary! { FONT_RESOURCE => font_id },
    };
    if image_count > 0 {
        resources.set("XObject", Object::Dictionary(xobjects));
    }
    if gstate_count > 0 {
        resources.set("ExtGState", Object::Dictionary(ext_gstates));
    }

    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0f32.into(), 0f32.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        "Contents" => content_id,
        "Resources" => Object::Dictionary(resources),
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1_i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

struct PageWriter<'a> {
    doc: &'a mut Document,
    content: Content,
    xobjects: Dictionary,
    ext_gstates: Dictionary,
    image_count: usize,
    gstate_count: usize,
}

impl<'a> PageWriter<'a> {
    fn new(doc: &'a mut Document) -> Self {
        Self {
            doc,
            content: Content { operations: vec![] },
            xobjects: Dictionary::new(),
            ext_gstates: Dictionary::new(),
            image_count: 0,
            gstate_count: 0,
        }
    }

    fn draw(&mut self, op: &DrawOp) {
        match op {
            DrawOp::Image { data, region, fit } => self.draw_image(data, region, *fit),
            DrawOp::RoundedRect {
                region,
                radius,
                color,
                opacity,
            } => self.draw_rounded_rect(region, *radius, *color, *opacity),
            DrawOp::TextLine { y, spans } => self.draw_text_line(*y, spans),
        }
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn draw_image(&mut self, data: &[u8], region: &Rect, fit: ImageFit) {
        let prepared = match image::prepare(data) {
            Ok(prepared) => prepared,
            Err(reason) => {
                // Fetched fine but undrawable; the element is skipped the
                // same way an unresolved asset is.
                log::warn!("skipping undrawable image ({} bytes): {}", data.len(), reason);
                return;
            }
        };

        let (draw_w, draw_h) = match fit {
            ImageFit::Stretch => (region.width, region.height),
            ImageFit::Contain => {
                let scale = (region.width / prepared.width as f32)
                    .min(region.height / prepared.height as f32);
                (prepared.width as f32 * scale, prepared.height as f32 * scale)
            }
        };

        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        let stream_id = self.doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => prepared.width as i64,
                "Height" => prepared.height as i64,
                "ColorSpace" => prepared.color_space,
                "BitsPerComponent" => 8_i64,
                "Filter" => "DCTDecode",
            },
            prepared.data,
        ));
        self.xobjects.set(name.as_bytes(), Object::Reference(stream_id));

        let x = region.x;
        let y = PAGE_HEIGHT - region.y - draw_h;
        self.push("q", vec![]);
        self.push(
            "cm",
            vec![draw_w.into(), 0f32.into(), 0f32.into(), draw_h.into(), x.into(), y.into()],
        );
        self.push("Do", vec![Object::Name(name.into_bytes())]);
        self.push("Q", vec![]);
    }

    fn draw_rounded_rect(&mut self, region: &Rect, radius: f32, color: Color, opacity: f32) {
        self.push("q", vec![]);
        if opacity < 1.0 {
            self.gstate_count += 1;
            let name = format!("GS{}", self.gstate_count);
            self.ext_gstates.set(
                name.as_bytes(),
                Object::Dictionary(dictionary! {
                    "Type" => "ExtGState",
                    "ca" => opacity,
                    "CA" => opacity,
                }),
            );
            self.push("gs", vec![Object::Name(name.into_bytes())]);
        }
        self.set_fill_color(color);

        let x = region.x;
        let y = PAGE_HEIGHT - region.y - region.height;
        let w = region.width;
        let h = region.height;
        if radius > 0.0 {
            let r = radius.min(w / 2.0).min(h / 2.0);
            let k = KAPPA * r;
            self.push("m", vec![(x + r).into(), y.into()]);
            self.push("l", vec![(x + w - r).into(), y.into()]);
            self.push(
                "c",
                vec![
                    (x + w - r + k).into(), y.into(),
                    (x + w).into(), (y + r - k).into(),
                    (x + w).into(), (y + r).into(),
                ],
            );
            self.push("l", vec![(x + w).into(), (y + h - r).into()]);
            self.push(
                "c",
                vec![
                    (x + w).into(), (y + h - r + k).into(),
                    (x + w - r + k).into(), (y + h).into(),
                    (x + w - r).into(), (y + h).into(),
                ],
            );
            self.push("l", vec![(x + r).into(), (y + h).into()]);
            self.push(
                "c",
                vec![
                    (x + r - k).into(), (y + h).into(),
                    x.into(), (y + h - r + k).into(),
                    x.into(), (y + h - r).into(),
                ],
            );
            self.push("l", vec![x.into(), (y + r).into()]);
            self.push(
                "c",
                vec![
                    x.into(), (y + r - k).into(),
                    (x + r - k).into(), y.into(),
                    (x + r).into(), y.into(),
                ],
            );
            self.push("h", vec![]);
        } else {
            self.push("re", vec![x.into(), y.into(), w.into(), h.into()]);
        }
        self.push("f", vec![]);
        self.push("Q", vec![]);
    }

    fn draw_text_line(&mut self, top: f32, spans: &[TextSpan]) {
        let max_size = spans
            .iter()
            .map(|s| s.font_size)
            .fold(0.0_f32, f32::max);
        let baseline = PAGE_HEIGHT - (top + max_size * BASELINE_FACTOR);

        for span in spans {
            if span.text.is_empty() {
                continue;
            }
            self.push("BT", vec![]);
            self.push(
                "Tf",
                vec![Object::Name(FONT_RESOURCE.as_bytes().to_vec()), span.font_size.into()],
            );
            self.set_fill_color(span.color);
            self.push("Td", vec![span.x.into(), baseline.into()]);
            self.push(
                "Tj",
                vec![Object::String(to_win_ansi(&span.text), StringFormat::Literal)],
            );
            self.push("ET", vec![]);
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        self.push(
            "rg",
            vec![
                (f32::from(color.r) / 255.0).into(),
                (f32::from(color.g) / 255.0).into(),
                (f32::from(color.b) / 255.0).into(),
            ],
        );
    }
}

fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| if c as u32 <= 255 { c as u8 } else { b'?' })
        .collect()
}
