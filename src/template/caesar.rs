use crate::layout::{Align, Block, Insets};
use crate::model::TemplateId;

use super::parts::{MUTED, Palette, Parts, RULE, Theme};
use super::{
    Chunk, Flow, PageFrame, SIDEBAR_ORDER, SectionPlan, Template, TemplateContext, assemble,
};

pub(super) struct Caesar;

impl Template for Caesar {
    fn id(&self) -> TemplateId {
        TemplateId::Caesar
    }

    fn frame(&self, cx: &TemplateContext) -> PageFrame {
        PageFrame::two_column(
            cx.mode,
            None,
            24.0,
            Insets::ZERO,
            Insets::ZERO,
            [Flow::Main, Flow::Sidebar],
        )
    }

    fn chunks(&self, cx: &TemplateContext) -> Vec<Chunk> {
        let accent = cx.style.accent;
        let palette = Palette::light(accent, accent);
        let theme = Theme::new(palette.clone(), palette);
        let frame = self.frame(cx);
        let parts = Parts::new(cx, &theme);
        let flow = Flow::Main;

        let title = parts
            .heading_style(flow)
            .sized(cx.style.font_size.heading_px() * 1.6)
            .aligned(Align::Center);
        let contact = parts.body(flow).colored(MUTED).aligned(Align::Center);
        let mut header: Vec<Block> = [
            parts.photo(96.0, true, Align::Center),
            parts.name(title, false),
            parts.lines(parts.contact_lines(), contact),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !header.is_empty() {
            header.insert(0, Block::Spacer(16.0));
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
