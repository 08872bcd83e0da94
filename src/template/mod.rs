//! Template variants.
//!
//! A template is asked two things: the page frame (geometry, flows, decorations) and the
//! full, ordered chunk list for a (content, style) pair. Pages index into that list, so
//! the measurement pass and every rendered page agree on chunk order and count.

mod athena;
mod caesar;
mod gatsby;
mod luna;
mod orion;
mod parts;
mod phoenix;
mod sherlock;

use crate::assets::AssetId;
use crate::layout::{Block, DrawOp, Insets};
use crate::model::{Content, EntryId, SectionKind, StyleSettings, TemplateId};
use crate::scale::DisplayMode;

pub use parts::{LevelStyle, Palette, Theme};

/// Canonical page size in CSS px (A4 at 96 dpi).
pub const PAGE_WIDTH: f32 = 794.0;
pub const PAGE_HEIGHT: f32 = 1123.0;

pub struct TemplateContext<'a> {
    pub content: &'a Content,
    pub style: &'a StyleSettings,
    pub mode: DisplayMode,
    pub photo: Option<AssetId>,
}

/// A vertical column that chunks stack into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flow {
    Main,
    Sidebar,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlowFrame {
    pub flow: Flow,
    pub x: f32,
    /// y of the first chunk on every page.
    pub top: f32,
    pub width: f32,
    /// Usable height per page.
    pub capacity: f32,
}

impl FlowFrame {
    fn new(flow: Flow, x: f32, width: f32, padding: &Insets, insets: Insets) -> Self {
        Self {
            flow,
            x: x + insets.left,
            top: padding.top + insets.top,
            width: width - insets.horizontal(),
            capacity: PAGE_HEIGHT - padding.vertical() - insets.vertical(),
        }
    }
}

/// Geometry shared by every page of a template.
#[derive(Clone, Debug, PartialEq)]
pub struct PageFrame {
    pub width: f32,
    pub height: f32,
    pub padding: Insets,
    /// In chunk grouping order.
    pub flows: Vec<FlowFrame>,
    /// Drawn under the chunks on every page.
    pub background: Vec<DrawOp>,
}

impl PageFrame {
    pub fn flow(&self, flow: Flow) -> Option<&FlowFrame> {
        self.flows.iter().find(|f| f.flow == flow)
    }

    fn content_box(mode: DisplayMode) -> (Insets, f32, f32) {
        let padding = mode.page_padding();
        let x = padding.left;
        let width = PAGE_WIDTH - padding.horizontal();
        (padding, x, width)
    }

    fn single(mode: DisplayMode, insets: Insets) -> Self {
        let (padding, x, width) = Self::content_box(mode);
        Self {
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            padding,
            flows: vec![FlowFrame::new(Flow::Main, x, width, &padding, insets)],
            background: Vec::new(),
        }
    }

    /// Sidebar on the left taking `sidebar_width` (or a third of the content box), main on the right.
    fn two_column(
        mode: DisplayMode,
        sidebar_width: Option<f32>,
        gap: f32,
        sidebar_insets: Insets,
        main_insets: Insets,
        order: [Flow; 2],
    ) -> Self {
        let (padding, x, width) = Self::content_box(mode);
        let side_w = sidebar_width.unwrap_or((width - gap) / 3.0);
        let main_w = width - gap - side_w;
        let sidebar = FlowFrame::new(Flow::Sidebar, x, side_w, &padding, sidebar_insets);
        let main = FlowFrame::new(Flow::Main, x + side_w + gap, main_w, &padding, main_insets);
        let flows = order
            .iter()
            .map(|f| match f {
                Flow::Main => main.clone(),
                Flow::Sidebar => sidebar.clone(),
            })
            .collect();
        Self {
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            padding,
            flows,
            background: Vec::new(),
        }
    }

    /// Column rectangle (x, y, width, height) of a flow, before its insets.
    fn column_rect(&self, flow: Flow, insets: Insets) -> Option<(f32, f32, f32, f32)> {
        self.flow(flow).map(|f| {
            (
                f.x - insets.left,
                self.padding.top,
                f.width + insets.horizontal(),
                self.height - self.padding.vertical(),
            )
        })
    }
}

/// What a chunk stands for. Stable across runs for an unchanged entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChunkKey {
    Profile,
    Details,
    Entry { section: SectionKind, id: EntryId },
}

/// One indivisible unit of pagination.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub flow: Flow,
    pub key: ChunkKey,
    pub block: Block,
}

pub trait Template: Sync {
    fn id(&self) -> TemplateId;

    fn frame(&self, cx: &TemplateContext) -> PageFrame;

    /// Every chunk in emission order, grouped by flow in frame order.
    fn chunks(&self, cx: &TemplateContext) -> Vec<Chunk>;
}

pub fn template_for(id: TemplateId) -> &'static dyn Template {
    match id {
        TemplateId::Luna => &luna::Luna,
        TemplateId::Athena => &athena::Athena,
        TemplateId::Phoenix => &phoenix::Phoenix,
        TemplateId::Orion => &orion::Orion,
        TemplateId::Caesar => &caesar::Caesar,
        TemplateId::Sherlock => &sherlock::Sherlock,
        TemplateId::Gatsby => &gatsby::Gatsby,
    }
}

/// Where a template puts each section.
pub(crate) struct SectionPlan<'a> {
    /// Explicit order; optional sections listed here only appear when enabled.
    pub order: &'a [(SectionKind, Flow)],
    /// Flow for optional sections not in `order`; they follow in addition order.
    pub unlisted: Flow,
}

/// Builds the chunk list shared by all variants: `lead` chunks first, then every visible
/// entry of every section, then a stable sort into frame flow order.
pub(crate) fn assemble(
    frame: &PageFrame,
    theme: &Theme,
    cx: &TemplateContext,
    lead: Vec<Chunk>,
    plan: &SectionPlan,
) -> Vec<Chunk> {
    let content = cx.content;
    let mut placed: Vec<(SectionKind, Flow)> = plan
        .order
        .iter()
        .filter(|(kind, _)| content.section(*kind).is_some())
        .copied()
        .collect();
    for section in content.optional_sections() {
        if !placed.iter().any(|(k, _)| *k == section.kind) {
            placed.push((section.kind, plan.unlisted));
        }
    }
    for section in content.sections() {
        if section.kind.is_fixed() && !placed.iter().any(|(k, _)| *k == section.kind) {
            log::debug!("Section '{}' not placed by template, skipping", section.kind);
        }
    }

    let parts = parts::Parts::new(cx, theme);
    let mut chunks = lead;
    for (kind, flow) in placed {
        if let Some(section) = content.section(kind) {
            chunks.extend(parts.section_chunks(section, flow));
        }
    }

    let rank = |flow: Flow| {
        frame
            .flows
            .iter()
            .position(|f| f.flow == flow)
            .unwrap_or(frame.flows.len())
    };
    chunks.sort_by_key(|c| rank(c.flow));
    chunks
}

/// Usual split for sidebar templates. Other optional sections go to the main flow.
pub(crate) const SIDEBAR_ORDER: [(SectionKind, Flow); 6] = [
    (SectionKind::Work, Flow::Main),
    (SectionKind::Education, Flow::Main),
    (SectionKind::Skills, Flow::Sidebar),
    (SectionKind::Traits, Flow::Sidebar),
    (SectionKind::Languages, Flow::Sidebar),
    (SectionKind::Hobbies, Flow::Sidebar),
];
