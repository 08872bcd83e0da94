use crate::layout::{Align, Block, DrawOp, Insets};
use crate::model::TemplateId;

use super::parts::{Palette, Parts, TEXT, Theme};
use super::{
    Chunk, Flow, PageFrame, SIDEBAR_ORDER, SectionPlan, Template, TemplateContext, assemble,
};

const SIDEBAR_WIDTH: f32 = 260.0;
const SIDEBAR_INSETS: Insets = Insets {
    top: 24.0,
    right: 24.0,
    bottom: 24.0,
    left: 24.0,
};

/// Accent sidebar carrying the profile and the short sections; timeline sections on the right.
pub(super) struct Luna;

impl Luna {
    fn theme(cx: &TemplateContext) -> Theme {
        let accent = cx.style.accent;
        let mut theme = Theme::new(Palette::light(TEXT, accent), Palette::on_accent(accent));
        theme.bullets = true;
        theme
    }
}

impl Template for Luna {
    fn id(&self) -> TemplateId {
        TemplateId::Luna
    }

    fn frame(&self, cx: &TemplateContext) -> PageFrame {
        let mut frame = PageFrame::two_column(
            cx.mode,
            Some(SIDEBAR_WIDTH),
            32.0,
            SIDEBAR_INSETS,
            Insets::ZERO,
            [Flow::Sidebar, Flow::Main],
        );
        if let Some((x, y, width, height)) = frame.column_rect(Flow::Sidebar, SIDEBAR_INSETS) {
            frame.background.push(DrawOp::Rect {
                x,
                y,
                width,
                height,
                color: cx.style.accent,
            });
        }
        frame
    }

    fn chunks(&self, cx: &TemplateContext) -> Vec<Chunk> {
        let theme = Self::theme(cx);
        let frame = self.frame(cx);
        let parts = Parts::new(cx, &theme);
        let flow = Flow::Sidebar;
        let centered = parts.body(flow).aligned(Align::Center);

        let header: Vec<Block> = [
            parts.photo(96.0, true, Align::Center),
            parts.name(parts.heading_style(flow).aligned(Align::Center), false),
            parts.lines(parts.contact_lines(), centered.clone()),
            parts.lines(parts.detail_lines(), centered),
        ]
        .into_iter()
        .flatten()
        .collect();

        let lead = parts
            .profile_chunk(flow, Block::stack(header).gap(8.0))
            .into_iter()
            .collect();
        assemble(
            &frame,
            &theme,
            cx,
            lead,
            &SectionPlan {
                order: &SIDEBAR_ORDER,
                unlisted: Flow::Main,
            },
        )
    }
}
