//! Block tree and placement.
//!
//! Templates describe each chunk as a [`Block`]. [`layout`] places a block at a position
//! and width, appends the resulting [`DrawOp`]s, and returns the height it used. The
//! measurement pass and the page renderer both go through this one function, so a
//! chunk's measured height is exactly the height it occupies on its page.

mod text;

use crate::assets::AssetId;
use crate::fonts::{FaceKey, FontLibrary};
use crate::model::Rgb;

use text::{build_lines, natural_width};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub face: FaceKey,
    /// px
    pub size: f32,
    /// CSS line-height multiplier.
    pub line_height: f32,
    pub color: Rgb,
    pub align: Align,
}

impl TextStyle {
    pub fn new(family: &str, size: f32, line_height: f32, color: Rgb) -> Self {
        Self {
            face: FaceKey::new(family, false, false),
            size,
            line_height,
            color,
            align: Align::Left,
        }
    }

    pub fn bold(mut self) -> Self {
        self.face.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.face.italic = true;
        self
    }

    pub fn sized(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn colored(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Height of one line box.
    pub fn line_box(&self) -> f32 {
        self.size * self.line_height
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Insets {
    pub const ZERO: Insets = Insets {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn all(v: f32) -> Self {
        Self::symmetric(v, v)
    }

    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Text {
        text: String,
        style: TextStyle,
    },
    /// Children top to bottom.
    Stack {
        children: Vec<Block>,
        gap: f32,
        padding: Insets,
        background: Option<Rgb>,
    },
    /// Left fills, right takes its natural width (at most half) and is pinned to the right edge.
    Row {
        left: Box<Block>,
        right: Box<Block>,
        gap: f32,
    },
    /// Proficiency dots, `level` of `max` filled.
    Dots {
        level: u8,
        max: u8,
        diameter: f32,
        gap: f32,
        filled: Rgb,
        empty: Rgb,
    },
    /// Proficiency bar spanning the full width.
    Bar {
        fraction: f32,
        height: f32,
        fill: Rgb,
        track: Rgb,
    },
    Photo {
        asset: AssetId,
        size: f32,
        round: bool,
        align: Align,
    },
    Spacer(f32),
    Rule {
        thickness: f32,
        color: Rgb,
    },
}

impl Block {
    pub fn text(text: impl Into<String>, style: TextStyle) -> Self {
        Block::Text {
            text: text.into(),
            style,
        }
    }

    pub fn stack(children: Vec<Block>) -> Self {
        Block::Stack {
            children,
            gap: 0.0,
            padding: Insets::ZERO,
            background: None,
        }
    }

    pub fn row(left: Block, right: Block) -> Self {
        Block::Row {
            left: Box::new(left),
            right: Box::new(right),
            gap: 8.0,
        }
    }

    /// Sets the gap of a stack or row; no-op on other blocks.
    pub fn gap(mut self, value: f32) -> Self {
        match &mut self {
            Block::Stack { gap, .. } | Block::Row { gap, .. } => *gap = value,
            _ => {}
        }
        self
    }

    pub fn padding(mut self, value: Insets) -> Self {
        if let Block::Stack { padding, .. } = &mut self {
            *padding = value;
        }
        self
    }

    pub fn background(mut self, color: Rgb) -> Self {
        if let Block::Stack { background, .. } = &mut self {
            *background = Some(color);
        }
        self
    }
}

/// One primitive on a page, in px with a top-left origin.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        baseline: f32,
        text: String,
        face: FaceKey,
        size: f32,
        color: Rgb,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
        color: Rgb,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        color: Rgb,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        asset: AssetId,
        round: bool,
    },
}

/// Place `block` with its top-left corner at (`x`, `y`) and return the height used.
pub fn layout(
    block: &Block,
    fonts: &FontLibrary,
    x: f32,
    y: f32,
    width: f32,
    out: &mut Vec<DrawOp>,
) -> f32 {
    let width = width.max(0.0);
    match block {
        Block::Text { text, style } => {
            let face = fonts.face_by_key(&style.face);
            let lines = build_lines(text, &face, style.size, width);
            let line_box = style.line_box();
            // Half-leading: the glyph box is centred in the line box.
            let ascent = face.ascent(style.size);
            let half_leading = (line_box - ascent - face.descent(style.size)) / 2.0;
            for (i, line) in lines.iter().enumerate() {
                if line.chunks.is_empty() {
                    continue;
                }
                let lx = match style.align {
                    Align::Left => x,
                    Align::Center => x + (width - line.total_width) / 2.0,
                    Align::Right => x + width - line.total_width,
                };
                out.push(DrawOp::Text {
                    x: lx,
                    baseline: y + i as f32 * line_box + half_leading + ascent,
                    text: line.text(),
                    face: style.face.clone(),
                    size: style.size,
                    color: style.color,
                });
            }
            lines.len() as f32 * line_box
        }
        Block::Stack {
            children,
            gap,
            padding,
            background,
        } => {
            let bg_slot = background.map(|color| {
                out.push(DrawOp::Rect {
                    x,
                    y,
                    width,
                    height: 0.0,
                    color,
                });
                out.len() - 1
            });
            let inner_x = x + padding.left;
            let inner_w = width - padding.horizontal();
            let mut cy = y + padding.top;
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    cy += gap;
                }
                cy += layout(child, fonts, inner_x, cy, inner_w, out);
            }
            let height = cy - y + padding.bottom;
            if let Some(DrawOp::Rect { height: h, .. }) = bg_slot.and_then(|i| out.get_mut(i)) {
                *h = height;
            }
            height
        }
        Block::Row { left, right, gap } => {
            let right_w = intrinsic_width(right, fonts).min((width - gap).max(0.0) / 2.0);
            let left_w = (width - right_w - gap).max(0.0);
            let lh = layout(left, fonts, x, y, left_w, out);
            let rh = layout(right, fonts, x + width - right_w, y, right_w, out);
            lh.max(rh)
        }
        Block::Dots {
            level,
            max,
            diameter,
            gap,
            filled,
            empty,
        } => {
            let r = diameter / 2.0;
            for i in 0..*max {
                out.push(DrawOp::Circle {
                    cx: x + i as f32 * (diameter + gap) + r,
                    cy: y + r,
                    r,
                    color: if i < *level { *filled } else { *empty },
                });
            }
            *diameter
        }
        Block::Bar {
            fraction,
            height,
            fill,
            track,
        } => {
            out.push(DrawOp::Rect {
                x,
                y,
                width,
                height: *height,
                color: *track,
            });
            let filled_w = width * fraction.clamp(0.0, 1.0);
            if filled_w > 0.0 {
                out.push(DrawOp::Rect {
                    x,
                    y,
                    width: filled_w,
                    height: *height,
                    color: *fill,
                });
            }
            *height
        }
        Block::Photo {
            asset,
            size,
            round,
            align,
        } => {
            let size = size.min(width);
            let px = match align {
                Align::Left => x,
                Align::Center => x + (width - size) / 2.0,
                Align::Right => x + width - size,
            };
            out.push(DrawOp::Image {
                x: px,
                y,
                width: size,
                height: size,
                asset: *asset,
                round: *round,
            });
            size
        }
        Block::Spacer(h) => h.max(0.0),
        Block::Rule { thickness, color } => {
            out.push(DrawOp::Line {
                x1: x,
                y1: y + thickness / 2.0,
                x2: x + width,
                y2: y + thickness / 2.0,
                thickness: *thickness,
                color: *color,
            });
            *thickness
        }
    }
}

/// Width a block would take without wrapping.
pub fn intrinsic_width(block: &Block, fonts: &FontLibrary) -> f32 {
    match block {
        Block::Text { text, style } => {
            natural_width(text, &fonts.face_by_key(&style.face), style.size)
        }
        Block::Stack {
            children, padding, ..
        } => {
            children
                .iter()
                .map(|c| intrinsic_width(c, fonts))
                .fold(0.0, f32::max)
                + padding.horizontal()
        }
        Block::Row { left, right, gap } => {
            intrinsic_width(left, fonts) + gap + intrinsic_width(right, fonts)
        }
        Block::Dots {
            max, diameter, gap, ..
        } => {
            if *max == 0 {
                0.0
            } else {
                *max as f32 * diameter + (*max - 1) as f32 * gap
            }
        }
        Block::Photo { size, .. } => *size,
        Block::Bar { .. } | Block::Spacer(_) | Block::Rule { .. } => 0.0,
    }
}
