use crate::layout::{Align, Block, Insets};
use crate::model::{SectionKind, TemplateId};

use super::parts::{BODY, Palette, Parts, RULE, TEXT, Theme};
use super::{Chunk, Flow, PageFrame, SectionPlan, Template, TemplateContext, assemble};

/// Skills and the other short lists come first, then the timeline sections.
const ORDER: [(SectionKind, Flow); 6] = [
    (SectionKind::Skills, Flow::Main),
    (SectionKind::Languages, Flow::Main),
    (SectionKind::Traits, Flow::Main),
    (SectionKind::Hobbies, Flow::Main),
    (SectionKind::Work, Flow::Main),
    (SectionKind::Education, Flow::Main),
];

pub(super) struct Gatsby;

impl Template for Gatsby {
    fn id(&self) -> TemplateId {
        TemplateId::Gatsby
    }

    fn frame(&self, cx: &TemplateContext) -> PageFrame {
        PageFrame::single(cx.mode, Insets::symmetric(0.0, 16.0))
    }

    fn chunks(&self, cx: &TemplateContext) -> Vec<Chunk> {
        let palette = Palette::light(TEXT, cx.style.accent);
        let theme = Theme::new(palette.clone(), palette);
        let frame = self.frame(cx);
        let parts = Parts::new(cx, &theme);
        let flow = Flow::Main;

        let title = parts
            .heading_style(flow)
            .sized(cx.style.font_size.heading_px() * 1.8)
            .aligned(Align::Center);
        let centered = parts.body(flow).colored(BODY).aligned(Align::Center);
        let mut header: Vec<Block> = [
            parts.photo(96.0, true, Align::Center),
            parts.name(title, true),
            parts.lines(parts.contact_lines(), centered.clone()),
            parts.lines(parts.detail_lines(), centered),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !header.is_empty() {
            header.push(Block::Rule {
                thickness: 1.0,
                color: RULE,
            });
        }

        let lead = parts
            .profile_chunk(
                flow,
                Block::stack(header).gap(8.0).padding(Insets::all(16.0)),
            )
            .into_iter()
            .collect();
        assemble(
            &frame,
            &theme,
            cx,
            lead,
            &SectionPlan {
                order: &ORDER,
                unlisted: Flow::Main,
            },
        )
    }
}
