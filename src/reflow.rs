//! Reflow scheduling for one document.
//!
//! The host feeds whole-value inputs and drives time explicitly: `submit` records an input
//! and (re)arms the debounce deadline, `poll` advances the pipeline, `load_fonts` resolves
//! outstanding typography requests. One run is in flight at a time. A run captures a
//! snapshot of its inputs when it starts; if the inputs moved on by the time it completes,
//! its result is dropped and the next run waits for the deadline the newer input armed.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::assets::{AssetId, AssetStore};
use crate::config::Config;
use crate::fonts::{FontLibrary, FontRequestId, Readiness};
use crate::measure::LayoutSurface;
use crate::model::{Content, SectionKind, StyleSettings};
use crate::render::{RenderedDocument, render_document};
use crate::scale::{Breakpoint, DisplayMode, ScaleController};
use crate::template::{TemplateContext, template_for};

#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Content(Content),
    Style(StyleSettings),
    AddSection(SectionKind),
    RemoveSection(SectionKind),
    /// Container width in px.
    Resize(f32),
    DisplayMode(DisplayMode),
    TypographyReady(FontRequestId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReflowState {
    #[default]
    Idle,
    Measuring,
    Paginating,
    Rendered,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub runs_started: u64,
    pub runs_rendered: u64,
    pub runs_discarded: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReflowOutcome {
    /// A new document is displayed.
    Rendered { pages: usize, chunks: usize },
    /// The run finished against superseded inputs and was dropped.
    Discarded,
}

/// Inputs a run was started with.
#[derive(Clone, Debug, PartialEq)]
struct Snapshot {
    content: Content,
    style: StyleSettings,
    breakpoint: Breakpoint,
    mode: DisplayMode,
    photo: Option<AssetId>,
}

struct Run {
    snapshot: Snapshot,
    started: Instant,
    waiting: Option<FontRequestId>,
}

pub struct Session {
    debounce: Duration,
    content: Content,
    style: StyleSettings,
    fonts: FontLibrary,
    surface: LayoutSurface,
    assets: AssetStore,
    photo: Option<(PathBuf, Option<AssetId>)>,
    scale: ScaleController,
    state: ReflowState,
    deadline: Option<Instant>,
    in_flight: Option<Run>,
    displayed: Option<RenderedDocument>,
    stats: Stats,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            debounce: config.debounce,
            content: Content::default(),
            style: StyleSettings::default(),
            fonts: FontLibrary::new(config.fonts),
            surface: LayoutSurface::new(),
            assets: AssetStore::new(),
            photo: None,
            scale: ScaleController::new(DisplayMode::Full, config.thumbnail_scale_cap),
            state: ReflowState::Idle,
            deadline: None,
            in_flight: None,
            displayed: None,
            stats: Stats::default(),
        }
    }

    /// Record an input. Size-affecting changes (re)arm the debounce deadline.
    pub fn submit(&mut self, input: Input, now: Instant) {
        let dirty = match input {
            Input::Content(content) => {
                if content == self.content {
                    false
                } else {
                    self.content = content;
                    self.sync_photo();
                    true
                }
            }
            Input::Style(style) => {
                if style == self.style {
                    false
                } else {
                    self.style = style;
                    true
                }
            }
            Input::AddSection(kind) => self.content.add_section(kind),
            Input::RemoveSection(kind) => self.content.remove_section(kind),
            Input::Resize(width) => {
                let before = self.breakpoint();
                if self.scale.set_width(width) {
                    log::debug!("Scale → {:.3}", self.scale.scale());
                }
                before != self.breakpoint()
            }
            Input::DisplayMode(mode) => {
                let changed = self.scale.mode() != mode;
                self.scale.set_mode(mode);
                changed
            }
            Input::TypographyReady(id) => match &mut self.in_flight {
                Some(run) if run.waiting == Some(id) => {
                    log::debug!("Typography ready for {id:?}, resuming run");
                    run.waiting = None;
                    false
                }
                _ => self.displayed.is_some(),
            },
        };
        // The first input of a session always schedules the initial layout.
        let initial = self.displayed.is_none() && self.in_flight.is_none();
        if dirty || (initial && self.deadline.is_none()) {
            self.deadline = Some(now + self.debounce);
        }
    }

    /// Resolve pending font requests and feed their ready events back in.
    pub fn load_fonts(&mut self, now: Instant) -> Vec<FontRequestId> {
        let ready = self.fonts.load_pending();
        for &id in &ready {
            self.submit(Input::TypographyReady(id), now);
        }
        ready
    }

    /// Advance the pipeline. Returns an outcome when a run completes.
    pub fn poll(&mut self, now: Instant) -> Option<ReflowOutcome> {
        if let Some(run) = self.in_flight.take() {
            if run.waiting.is_some() {
                self.in_flight = Some(run);
                return None;
            }
            return Some(self.complete(run, now));
        }

        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        self.stats.runs_started += 1;
        self.state = ReflowState::Measuring;
        let mut run = Run {
            snapshot: self.snapshot(),
            started: now,
            waiting: None,
        };
        match self.fonts.request(&run.snapshot.style.font_family) {
            Readiness::Ready => Some(self.complete(run, now)),
            Readiness::Pending(id) => {
                log::debug!(
                    "Run {} waiting for font '{}' ({id:?})",
                    self.stats.runs_started,
                    run.snapshot.style.font_family
                );
                run.waiting = Some(id);
                self.in_flight = Some(run);
                None
            }
        }
    }

    fn complete(&mut self, run: Run, now: Instant) -> ReflowOutcome {
        let t0 = std::time::Instant::now();
        let snap = &run.snapshot;
        let cx = TemplateContext {
            content: &snap.content,
            style: &snap.style,
            mode: snap.mode,
            photo: snap.photo,
        };
        let template = template_for(snap.style.template);
        let frame = template.frame(&cx);
        let chunks = template.chunks(&cx);

        self.state = ReflowState::Measuring;
        let heights = self.surface.measure(&chunks, &frame, &self.fonts);
        let t_measure = t0.elapsed();

        self.state = ReflowState::Paginating;
        let doc = render_document(template.id(), &chunks, &frame, heights, &self.fonts);
        let t_render = t0.elapsed();

        if *snap != self.snapshot() {
            log::debug!("Discarding stale run");
            self.stats.runs_discarded += 1;
            self.state = ReflowState::Idle;
            // Inputs that arrived meanwhile already armed a deadline; keep debouncing them.
            if self.deadline.is_none() {
                self.deadline = Some(now);
            }
            return ReflowOutcome::Discarded;
        }

        let outcome = ReflowOutcome::Rendered {
            pages: doc.page_count(),
            chunks: chunks.len(),
        };
        log::info!(
            "Reflow ({}): {} chunks → {} pages, measure={:.1}ms, render={:.1}ms, since trigger={:.1}ms",
            template.id(),
            chunks.len(),
            doc.page_count(),
            t_measure.as_secs_f64() * 1000.0,
            (t_render - t_measure).as_secs_f64() * 1000.0,
            now.saturating_duration_since(run.started).as_secs_f64() * 1000.0,
        );
        self.displayed = Some(doc);
        self.state = ReflowState::Rendered;
        self.stats.runs_rendered += 1;
        outcome
    }

    /// Drive the session until nothing is pending: fonts load, deadlines elapse, stale runs
    /// rerun. Returns the instant the last step ran at.
    pub fn settle(&mut self, mut now: Instant) -> Instant {
        loop {
            if self.fonts.has_pending() {
                self.load_fonts(now);
            }
            if self.poll(now).is_some() {
                continue;
            }
            if self.in_flight.is_some() {
                if self.fonts.has_pending() {
                    continue;
                }
                log::warn!("Run waits on a font that is no longer pending");
                break;
            }
            match self.deadline {
                Some(d) => now = now.max(d),
                None => break,
            }
        }
        now
    }

    fn breakpoint(&self) -> Breakpoint {
        self.scale.breakpoint().unwrap_or(Breakpoint::Wide)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            content: self.content.clone(),
            style: self.style.clone(),
            breakpoint: self.breakpoint(),
            mode: self.scale.mode(),
            photo: self.photo.as_ref().and_then(|(_, id)| *id),
        }
    }

    /// Acquire the new photo before releasing the one it replaces.
    fn sync_photo(&mut self) {
        let wanted = self.content.profile.photo.clone();
        if self.photo.as_ref().map(|(path, _)| path) == wanted.as_ref() {
            return;
        }
        let next = wanted.map(|path| {
            let id = match self.assets.acquire(&path) {
                Ok(id) => Some(id),
                Err(e) => {
                    log::warn!("Photo unavailable, rendering without it: {e}");
                    None
                }
            };
            (path, id)
        });
        if let Some((_, Some(old))) = std::mem::replace(&mut self.photo, next)
            && let Err(e) = self.assets.release(old)
        {
            log::warn!("Releasing previous photo failed: {e}");
        }
    }

    pub fn displayed(&self) -> Option<&RenderedDocument> {
        self.displayed.as_ref()
    }

    pub fn scale(&self) -> f32 {
        self.scale.scale()
    }

    pub fn state(&self) -> ReflowState {
        self.state
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// A run is suspended on typography.
    pub fn is_waiting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn style(&self) -> &StyleSettings {
        &self.style
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn surface(&self) -> &LayoutSurface {
        &self.surface
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.scale.mode()
    }
}
