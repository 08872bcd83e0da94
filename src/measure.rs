use crate::fonts::FontLibrary;
use crate::layout::{DrawOp, layout};
use crate::template::{Chunk, PageFrame};

/// Heights are kept to 1/100 px so sums stay stable across runs.
fn quantize(h: f32) -> f32 {
    if h.is_finite() {
        (h.max(0.0) * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// Off-screen layout surface, one per document and reused across runs.
///
/// Chunks are laid out unconstrained at their flow's canonical width; only the
/// realized heights are kept.
#[derive(Debug, Default)]
pub struct LayoutSurface {
    scratch: Vec<DrawOp>,
    passes: u64,
}

impl LayoutSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heights of `chunks` in emission order. Empty when there is nothing to measure or a
    /// chunk targets a flow the frame does not define; callers treat that as "do not paginate".
    pub fn measure(&mut self, chunks: &[Chunk], frame: &PageFrame, fonts: &FontLibrary) -> Vec<f32> {
        let t0 = std::time::Instant::now();
        self.passes += 1;
        let mut heights = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let Some(flow) = frame.flow(chunk.flow) else {
                log::warn!("Chunk {i} targets {:?}, which the frame lacks", chunk.flow);
                return Vec::new();
            };
            if !(flow.width > 0.0) {
                log::warn!("Flow {:?} has no usable width ({})", flow.flow, flow.width);
                return Vec::new();
            }
            self.scratch.clear();
            let h = layout(&chunk.block, fonts, flow.x, 0.0, flow.width, &mut self.scratch);
            heights.push(quantize(h));
        }
        self.scratch.clear();
        log::debug!(
            "Measured {} chunks (pass {}) in {:.1}ms",
            heights.len(),
            self.passes,
            t0.elapsed().as_secs_f64() * 1000.0,
        );
        heights
    }

    /// Number of measurement passes run on this surface.
    pub fn passes(&self) -> u64 {
        self.passes
    }
}
