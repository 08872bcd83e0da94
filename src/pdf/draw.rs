use std::collections::HashMap;

use pdf_writer::{Content, Name, Str};

use crate::assets::AssetId;
use crate::fonts::{FaceKey, PdfFont};
use crate::layout::DrawOp;
use crate::model::Rgb;
use crate::render::Page;

/// CSS px (96 dpi) to PDF points (72 dpi).
pub(super) const PX_TO_PT: f32 = 0.75;

/// Circle approximation constant for four cubic Béziers.
const KAPPA: f32 = 0.552_284_8;

pub(super) struct PdfImage {
    pub(super) pdf_name: String,
    pub(super) pixel_width: u32,
    pub(super) pixel_height: u32,
}

/// Maps page px (top-left origin) into PDF points (bottom-left origin).
struct Space {
    page_height: f32,
}

impl Space {
    fn x(&self, x: f32) -> f32 {
        x * PX_TO_PT
    }

    fn y(&self, y: f32) -> f32 {
        (self.page_height - y) * PX_TO_PT
    }

    fn len(&self, v: f32) -> f32 {
        v * PX_TO_PT
    }
}

fn set_fill(content: &mut Content, color: Rgb) {
    content.set_fill_rgb(
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
    );
}

fn set_stroke(content: &mut Content, color: Rgb) {
    content.set_stroke_rgb(
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
    );
}

fn circle_path(content: &mut Content, cx: f32, cy: f32, r: f32) {
    let k = r * KAPPA;
    content.move_to(cx + r, cy);
    content.cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
    content.cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
    content.cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
    content.cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
    content.close_path();
}

pub(super) fn draw_page(
    content: &mut Content,
    page: &Page,
    fonts: &HashMap<FaceKey, PdfFont>,
    images: &HashMap<AssetId, PdfImage>,
) {
    let space = Space {
        page_height: page.height,
    };

    content.save_state();
    content.rect(0.0, 0.0, space.len(page.width), space.len(page.height));
    content.clip_nonzero();
    content.end_path();

    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                baseline,
                text,
                face,
                size,
                color,
            } => {
                let Some(font) = fonts.get(face) else {
                    log::warn!("No PDF font for {face:?}, dropping text");
                    continue;
                };
                content.begin_text();
                content.set_font(Name(font.pdf_name.as_bytes()), space.len(*size));
                set_fill(content, *color);
                content.next_line(space.x(*x), space.y(*baseline));
                content.show(Str(&font.encode(text)));
                content.end_text();
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                if *width <= 0.0 || *height <= 0.0 {
                    continue;
                }
                content.save_state();
                set_fill(content, *color);
                content.rect(
                    space.x(*x),
                    space.y(y + height),
                    space.len(*width),
                    space.len(*height),
                );
                content.fill_nonzero();
                content.restore_state();
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                thickness,
                color,
            } => {
                content.save_state();
                content.set_line_width(space.len(*thickness));
                set_stroke(content, *color);
                content.move_to(space.x(*x1), space.y(*y1));
                content.line_to(space.x(*x2), space.y(*y2));
                content.stroke();
                content.restore_state();
            }
            DrawOp::Circle { cx, cy, r, color } => {
                content.save_state();
                set_fill(content, *color);
                circle_path(content, space.x(*cx), space.y(*cy), space.len(*r));
                content.fill_nonzero();
                content.restore_state();
            }
            DrawOp::Image {
                x,
                y,
                width,
                height,
                asset,
                round,
            } => {
                let Some(image) = images.get(asset) else {
                    continue;
                };
                // Cover the box, cropping the overflow.
                let (iw, ih) = (image.pixel_width as f32, image.pixel_height as f32);
                if iw <= 0.0 || ih <= 0.0 {
                    continue;
                }
                let ratio = (width / iw).max(height / ih);
                let (dw, dh) = (iw * ratio, ih * ratio);
                let dx = x + (width - dw) / 2.0;
                let dy = y + (height - dh) / 2.0;

                content.save_state();
                if *round {
                    let r = width.min(*height) / 2.0;
                    circle_path(
                        content,
                        space.x(x + width / 2.0),
                        space.y(y + height / 2.0),
                        space.len(r),
                    );
                } else {
                    content.rect(
                        space.x(*x),
                        space.y(y + height),
                        space.len(*width),
                        space.len(*height),
                    );
                }
                content.clip_nonzero();
                content.end_path();
                content.transform([
                    space.len(dw),
                    0.0,
                    0.0,
                    space.len(dh),
                    space.x(dx),
                    space.y(dy + dh),
                ]);
                content.x_object(Name(image.pdf_name.as_bytes()));
                content.restore_state();
            }
        }
    }

    content.restore_state();
}
