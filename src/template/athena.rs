use crate::layout::{Align, Block, DrawOp, Insets};
use crate::model::TemplateId;

use super::parts::{MUTED, Palette, Parts, RULE, TEXT, Theme};
use super::{
    Chunk, Flow, PageFrame, SIDEBAR_ORDER, SectionPlan, Template, TemplateContext, assemble,
};

const SIDEBAR_INSETS: Insets = Insets {
    top: 16.0,
    right: 16.0,
    bottom: 16.0,
    left: 16.0,
};

pub(super) struct Athena;

impl Template for Athena {
    fn id(&self) -> TemplateId {
        TemplateId::Athena
    }

    fn frame(&self, cx: &TemplateContext) -> PageFrame {
        let mut frame = PageFrame::two_column(
            cx.mode,
            None,
            24.0,
            SIDEBAR_INSETS,
            Insets::ZERO,
            [Flow::Main, Flow::Sidebar],
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
        let accent = cx.style.accent;
        let theme = Theme::new(Palette::light(TEXT, accent), Palette::on_accent(accent));
        let frame = self.frame(cx);
        let parts = Parts::new(cx, &theme);
        let flow = Flow::Main;

        let title = parts
            .heading_style(flow)
            .sized(cx.style.font_size.heading_px() * 1.6);
        let mut header: Vec<Block> = [
            parts.photo(120.0, true, Align::Left),
            parts.name(title, false),
            parts.lines(parts.contact_lines(), parts.body(flow).colored(MUTED)),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !header.is_empty() {
            header.push(Block::Spacer(8.0));
            header.push(Block::Rule {
                thickness: 1.0,
                color: RULE,
            });
        }

        let mut lead: Vec<Chunk> = parts
            .profile_chunk(flow, Block::stack(header).gap(8.0))
            .into_iter()
            .collect();
        lead.extend(parts.details_chunk(Flow::Sidebar, cx.content.labels.get("details")));

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
