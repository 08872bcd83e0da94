use crate::layout::{Align, Block, Insets};
use crate::model::{SectionKind, TemplateId};

use super::parts::{LevelStyle, MUTED, Palette, Parts, RULE, Theme, join_filled};
use super::{Chunk, Flow, PageFrame, SectionPlan, Template, TemplateContext, assemble};

const ORDER: [(SectionKind, Flow); 6] = [
    (SectionKind::Work, Flow::Main),
    (SectionKind::Education, Flow::Main),
    (SectionKind::Skills, Flow::Main),
    (SectionKind::Traits, Flow::Main),
    (SectionKind::Languages, Flow::Main),
    (SectionKind::Hobbies, Flow::Main),
];

/// Single column, centered uppercase header, text-only proficiency.
pub(super) struct Sherlock;

impl Template for Sherlock {
    fn id(&self) -> TemplateId {
        TemplateId::Sherlock
    }

    fn frame(&self, cx: &TemplateContext) -> PageFrame {
        PageFrame::single(cx.mode, Insets::symmetric(0.0, 16.0))
    }

    fn chunks(&self, cx: &TemplateContext) -> Vec<Chunk> {
        let accent = cx.style.accent;
        let palette = Palette::light(accent, accent);
        let mut theme = Theme::new(palette.clone(), palette);
        theme.level = LevelStyle::Hidden;
        theme.section_gap = 16.0;
        let frame = self.frame(cx);
        let parts = Parts::new(cx, &theme);
        let flow = Flow::Main;

        let title = parts
            .heading_style(flow)
            .sized(cx.style.font_size.heading_px() * 1.8)
            .aligned(Align::Center);
        let muted = parts.body(flow).colored(MUTED).aligned(Align::Center);
        let contact = join_filled(
            &parts
                .contact_lines()
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>(),
            " | ",
        );
        let contact = if contact.is_empty() {
            None
        } else {
            Some(Block::text(contact, muted.clone()))
        };

        let mut header: Vec<Block> = [
            parts.name(title, true),
            parts.photo(96.0, true, Align::Center),
            contact,
            parts.lines(parts.detail_lines(), muted),
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
                Block::stack(header).gap(8.0).padding(Insets {
                    top: 24.0,
                    ..Insets::ZERO
                }),
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
