pub mod assets;
pub mod config;
pub mod content;
mod error;
pub mod fonts;
pub mod layout;
pub mod measure;
pub mod model;
pub mod paginate;
pub mod pdf;
pub mod reflow;
pub mod render;
pub mod scale;
pub mod template;

pub use config::{Config, FontConfig};
pub use error::Error;
pub use model::{Content, FontSizeTier, LineSpacing, Rgb, SectionKind, StyleSettings, TemplateId};
pub use reflow::{Input, ReflowOutcome, Session};
pub use render::RenderedDocument;
pub use scale::DisplayMode;

use std::path::Path;
use std::time::Instant;

use content::LoadedDocument;

/// Overrides applied on top of the settings stored in the input document.
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    pub template: Option<TemplateId>,
    pub font: Option<String>,
    pub font_size: Option<FontSizeTier>,
    pub line_spacing: Option<LineSpacing>,
    pub accent: Option<Rgb>,
    pub mode: DisplayMode,
    /// Container width in px; only the display scale depends on it.
    pub width: Option<f32>,
    pub config: Config,
}

impl RenderOptions {
    fn apply(&self, style: &mut StyleSettings) {
        if let Some(t) = self.template {
            style.template = t;
        }
        if let Some(font) = &self.font {
            style.font_family = font.clone();
        }
        if let Some(size) = self.font_size {
            style.font_size = size;
        }
        if let Some(spacing) = self.line_spacing {
            style.line_spacing = spacing;
        }
        if let Some(accent) = self.accent {
            style.accent = accent;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderSummary {
    pub template: TemplateId,
    pub pages: usize,
    pub chunks: usize,
    /// Global chunk indices per page.
    pub partition: Vec<Vec<usize>>,
    pub unpaginated: bool,
    pub scale: f32,
    pub bytes: usize,
}

fn render_loaded(
    doc: LoadedDocument,
    output: &Path,
    options: &RenderOptions,
    t0: Instant,
) -> Result<RenderSummary, Error> {
    let t_parse = t0.elapsed();

    let mut style = doc.style;
    options.apply(&mut style);

    let mut session = Session::new(options.config.clone());
    let now = Instant::now();
    session.submit(Input::DisplayMode(options.mode), now);
    if let Some(width) = options.width {
        session.submit(Input::Resize(width), now);
    }
    session.submit(Input::Style(style), now);
    session.submit(Input::Content(doc.content), now);
    session.settle(now);

    let Some(rendered) = session.displayed() else {
        return Err(Error::Pdf("no layout was produced".into()));
    };
    let t_layout = t0.elapsed();

    let bytes = pdf::write(rendered, session.fonts(), session.assets())?;
    let t_pdf = t0.elapsed();

    std::fs::write(output, &bytes)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, layout={:.1}ms, pdf={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_layout - t_parse).as_secs_f64() * 1000.0,
        (t_pdf - t_layout).as_secs_f64() * 1000.0,
        (t_total - t_pdf).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(RenderSummary {
        template: rendered.template,
        pages: rendered.page_count(),
        chunks: rendered.keys.len(),
        partition: rendered.plan.pages(),
        unpaginated: rendered.plan.is_unpaginated(),
        scale: session.scale(),
        bytes: bytes.len(),
    })
}

pub fn render_cv_to_pdf(
    input: &Path,
    output: &Path,
    options: &RenderOptions,
) -> Result<RenderSummary, Error> {
    let t0 = Instant::now();
    let doc = content::load(input)?;
    render_loaded(doc, output, options, t0)
}

/// Relative photo paths resolve against the working directory.
pub fn render_cv_bytes_to_pdf(
    input: &[u8],
    output: &Path,
    options: &RenderOptions,
) -> Result<RenderSummary, Error> {
    let t0 = Instant::now();
    let doc = content::parse_bytes(input, None)?;
    render_loaded(doc, output, options, t0)
}
