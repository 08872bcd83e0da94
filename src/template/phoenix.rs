use crate::layout::{Align, Block, Insets};
use crate::model::TemplateId;

use super::parts::{LevelStyle, Palette, Parts, TEXT, Theme, WHITE};
use super::{
    Chunk, Flow, PageFrame, SIDEBAR_ORDER, SectionPlan, Template, TemplateContext, assemble,
};

/// Accent header band, uppercase headings underlined in the accent colour, bar meters.
pub(super) struct Phoenix;

impl Template for Phoenix {
    fn id(&self) -> TemplateId {
        TemplateId::Phoenix
    }

    fn frame(&self, cx: &TemplateContext) -> PageFrame {
        PageFrame::two_column(
            cx.mode,
            None,
            24.0,
            Insets {
                right: 16.0,
                ..Insets::ZERO
            },
            Insets::ZERO,
            [Flow::Main, Flow::Sidebar],
        )
    }

    fn chunks(&self, cx: &TemplateContext) -> Vec<Chunk> {
        let accent = cx.style.accent;
        let palette = Palette::light(TEXT, accent).rule(Some(accent), 2.0);
        let mut theme = Theme::new(palette.clone(), palette);
        theme.uppercase_headings = true;
        theme.level = LevelStyle::Bar;
        let frame = self.frame(cx);
        let parts = Parts::new(cx, &theme);
        let flow = Flow::Main;

        let title = parts
            .heading_style(flow)
            .sized(cx.style.font_size.heading_px() * 1.8)
            .colored(WHITE);
        let text: Vec<Block> = [
            parts.name(title, true),
            parts.lines(parts.contact_lines(), parts.body(flow).colored(WHITE)),
        ]
        .into_iter()
        .flatten()
        .collect();

        let band = match (text.is_empty(), parts.photo(112.0, false, Align::Right)) {
            (true, None) => Block::stack(Vec::new()),
            (false, None) => Block::stack(text).gap(4.0),
            (true, Some(photo)) => Block::stack(vec![photo]),
            (false, Some(photo)) => {
                Block::stack(vec![Block::row(Block::stack(text).gap(4.0), photo).gap(24.0)])
            }
        }
        .background(accent)
        .padding(Insets::symmetric(20.0, 24.0));

        let mut lead: Vec<Chunk> = parts.profile_chunk(flow, band).into_iter().collect();
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
