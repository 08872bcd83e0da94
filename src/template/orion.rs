use crate::layout::{Align, Block, Insets};
use crate::model::{SectionKind, TemplateId};

use super::parts::{LevelStyle, Palette, Parts, TEXT, Theme, WHITE};
use super::{Chunk, ChunkKey, Flow, PageFrame, SectionPlan, Template, TemplateContext, assemble};

const ORDER: [(SectionKind, Flow); 9] = [
    (SectionKind::Work, Flow::Main),
    (SectionKind::Education, Flow::Main),
    (SectionKind::Internships, Flow::Main),
    (SectionKind::Courses, Flow::Main),
    (SectionKind::Certifications, Flow::Main),
    (SectionKind::Skills, Flow::Sidebar),
    (SectionKind::Traits, Flow::Sidebar),
    (SectionKind::Languages, Flow::Sidebar),
    (SectionKind::Hobbies, Flow::Sidebar),
];

/// Centered accent band on top of the main column; photo and personal details lead the aside.
pub(super) struct Orion;

impl Template for Orion {
    fn id(&self) -> TemplateId {
        TemplateId::Orion
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
        let palette = Palette::light(accent, accent).rule(None, 0.0);
        let mut theme = Theme::new(palette.clone(), palette);
        theme.level = LevelStyle::Bar;
        let frame = self.frame(cx);
        let parts = Parts::new(cx, &theme);

        let title = parts
            .heading_style(Flow::Main)
            .sized(cx.style.font_size.heading_px() * 1.6)
            .colored(WHITE)
            .aligned(Align::Center);
        let contact = parts
            .body(Flow::Main)
            .colored(WHITE)
            .aligned(Align::Center);
        let band: Vec<Block> = [
            parts.name(title, true),
            parts.lines(parts.contact_lines(), contact),
        ]
        .into_iter()
        .flatten()
        .collect();
        let band = Block::stack(band)
            .gap(6.0)
            .background(accent)
            .padding(Insets::symmetric(20.0, 24.0));
        let mut lead: Vec<Chunk> = parts.profile_chunk(Flow::Main, band).into_iter().collect();

        let side = Flow::Sidebar;
        let aside: Vec<Block> = [
            parts.photo(120.0, true, Align::Center),
            parts
                .lines(parts.detail_lines(), parts.body(side))
                .map(|lines| {
                    Block::stack(vec![
                        parts.heading(cx.content.labels.get("details"), side),
                        lines,
                    ])
                }),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !aside.is_empty() {
            lead.push(Chunk {
                flow: side,
                key: ChunkKey::Details,
                block: Block::stack(aside).gap(16.0),
            });
        }

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
