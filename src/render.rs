use crate::fonts::FontLibrary;
use crate::layout::{DrawOp, layout};
use crate::model::TemplateId;
use crate::paginate::{Partition, paginate};
use crate::template::{Chunk, ChunkKey, Flow, PageFrame};

/// One flow's chunks (global indices, in order) and how they split into pages.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowPlan {
    pub flow: Flow,
    pub chunks: Vec<usize>,
    /// Ranges over `chunks`, not over global indices.
    pub partition: Partition,
}

/// Which chunks land on which page.
#[derive(Clone, Debug, PartialEq)]
pub struct PagePlan {
    flows: Vec<FlowPlan>,
    page_count: usize,
    unpaginated: bool,
}

impl PagePlan {
    /// Paginate every flow of `frame` independently.
    ///
    /// When `heights` does not line up with `chunks` (failed or empty measurement) the
    /// plan degrades to a single page holding every chunk.
    pub fn build(chunks: &[Chunk], frame: &PageFrame, heights: &[f32]) -> Self {
        let unpaginated = heights.len() != chunks.len() || chunks.is_empty();
        if heights.len() != chunks.len() {
            log::warn!(
                "Measured {} of {} chunks; rendering a single unpaginated page",
                heights.len(),
                chunks.len(),
            );
        }

        let flows: Vec<FlowPlan> = frame
            .flows
            .iter()
            .map(|f| {
                let indices: Vec<usize> = chunks
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.flow == f.flow)
                    .map(|(i, _)| i)
                    .collect();
                let partition = if unpaginated {
                    paginate(&vec![0.0; indices.len()], f32::INFINITY)
                } else {
                    let flow_heights: Vec<f32> = indices.iter().map(|&i| heights[i]).collect();
                    paginate(&flow_heights, f.capacity)
                };
                FlowPlan {
                    flow: f.flow,
                    chunks: indices,
                    partition,
                }
            })
            .collect();

        let page_count = flows
            .iter()
            .map(|f| f.partition.len())
            .max()
            .unwrap_or(0)
            .max(1);
        Self {
            flows,
            page_count,
            unpaginated,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// True when measurement did not produce usable heights.
    pub fn is_unpaginated(&self) -> bool {
        self.unpaginated
    }

    pub fn flows(&self) -> &[FlowPlan] {
        &self.flows
    }

    /// Global chunk indices on `page`, per flow.
    pub fn page_chunks(&self, page: usize) -> Vec<(Flow, Vec<usize>)> {
        self.flows
            .iter()
            .map(|f| {
                let indices = f
                    .partition
                    .page(page)
                    .map(|r| f.chunks[r].to_vec())
                    .unwrap_or_default();
                (f.flow, indices)
            })
            .collect()
    }

    /// Global chunk indices per page, flows concatenated in frame order.
    pub fn pages(&self) -> Vec<Vec<usize>> {
        (0..self.page_count)
            .map(|p| {
                self.page_chunks(p)
                    .into_iter()
                    .flat_map(|(_, indices)| indices)
                    .collect()
            })
            .collect()
    }
}

/// A fixed-size rendered page.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub index: usize,
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
    pub chunks: Vec<usize>,
}

/// Everything one reflow run produced. Swapped in as a whole.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedDocument {
    pub template: TemplateId,
    pub frame: PageFrame,
    pub keys: Vec<ChunkKey>,
    pub heights: Vec<f32>,
    pub plan: PagePlan,
    pub pages: Vec<Page>,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page showing the chunk with `key`.
    pub fn page_of(&self, key: &ChunkKey) -> Option<usize> {
        let index = self.keys.iter().position(|k| k == key)?;
        self.pages.iter().position(|p| p.chunks.contains(&index))
    }
}

/// Lay out every page of `plan`. Chunks stack from the top of their flow in plan order.
pub fn render_pages(
    chunks: &[Chunk],
    frame: &PageFrame,
    plan: &PagePlan,
    fonts: &FontLibrary,
) -> Vec<Page> {
    (0..plan.page_count())
        .map(|index| {
            let mut ops = frame.background.clone();
            let mut on_page = Vec::new();
            for (flow, indices) in plan.page_chunks(index) {
                let Some(f) = frame.flow(flow) else {
                    continue;
                };
                let mut y = f.top;
                for i in indices {
                    y += layout(&chunks[i].block, fonts, f.x, y, f.width, &mut ops);
                    on_page.push(i);
                }
            }
            Page {
                index,
                width: frame.width,
                height: frame.height,
                ops,
                chunks: on_page,
            }
        })
        .collect()
}

/// Build the page plan and render it into a document.
pub fn render_document(
    template: TemplateId,
    chunks: &[Chunk],
    frame: &PageFrame,
    heights: Vec<f32>,
    fonts: &FontLibrary,
) -> RenderedDocument {
    let t0 = std::time::Instant::now();
    let plan = PagePlan::build(chunks, frame, &heights);
    let pages = render_pages(chunks, frame, &plan, fonts);
    log::debug!(
        "Rendered {} pages from {} chunks in {:.1}ms",
        pages.len(),
        chunks.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    RenderedDocument {
        template,
        frame: frame.clone(),
        keys: chunks.iter().map(|c| c.key).collect(),
        heights,
        plan,
        pages,
    }
}
