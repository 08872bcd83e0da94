use crate::layout::Insets;
use crate::template::PAGE_WIDTH;

/// Full preview or thumbnail strip. Affects page padding, so switching it reflows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    #[default]
    Full,
    Thumbnail,
}

impl DisplayMode {
    pub fn page_padding(self) -> Insets {
        match self {
            DisplayMode::Full => Insets::symmetric(40.0, 50.0),
            DisplayMode::Thumbnail => Insets::ZERO,
        }
    }
}

pub const BREAKPOINT_PX: f32 = 768.0;

/// Host layout class. Only crossing between classes is size-affecting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Breakpoint {
    Narrow,
    Wide,
}

impl Breakpoint {
    pub fn for_width(width: f32) -> Self {
        if width < BREAKPOINT_PX {
            Breakpoint::Narrow
        } else {
            Breakpoint::Wide
        }
    }
}

/// Scale changes smaller than this are ignored.
const SCALE_EPSILON: f32 = 0.001;

pub const DEFAULT_THUMBNAIL_SCALE: f32 = 0.325;

/// Uniform display scale for every page, derived from container width only.
#[derive(Clone, Debug)]
pub struct ScaleController {
    mode: DisplayMode,
    width: Option<f32>,
    thumbnail_cap: f32,
    scale: f32,
}

impl ScaleController {
    pub fn new(mode: DisplayMode, thumbnail_cap: f32) -> Self {
        let scale = match mode {
            DisplayMode::Full => 1.0,
            DisplayMode::Thumbnail => DEFAULT_THUMBNAIL_SCALE.min(thumbnail_cap),
        };
        Self {
            mode,
            width: None,
            thumbnail_cap,
            scale,
        }
    }

    pub fn compute(mode: DisplayMode, width: f32, thumbnail_cap: f32) -> f32 {
        let ratio = width / PAGE_WIDTH;
        match mode {
            DisplayMode::Full => ratio.min(1.0),
            DisplayMode::Thumbnail => ratio.min(thumbnail_cap),
        }
    }

    /// Returns true when the displayed scale changed. Non-positive or non-finite widths
    /// are ignored.
    pub fn set_width(&mut self, width: f32) -> bool {
        if !width.is_finite() || width <= 0.0 {
            log::debug!("Ignoring container width {width}");
            return false;
        }
        self.width = Some(width);
        self.update()
    }

    pub fn set_mode(&mut self, mode: DisplayMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        match self.width {
            Some(_) => self.update(),
            None => {
                let before = self.scale;
                self.scale = Self::new(mode, self.thumbnail_cap).scale;
                (before - self.scale).abs() > SCALE_EPSILON
            }
        }
    }

    fn update(&mut self) -> bool {
        let Some(width) = self.width else {
            return false;
        };
        let next = Self::compute(self.mode, width, self.thumbnail_cap);
        if (next - self.scale).abs() > SCALE_EPSILON {
            self.scale = next;
            true
        } else {
            false
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn width(&self) -> Option<f32> {
        self.width
    }

    pub fn breakpoint(&self) -> Option<Breakpoint> {
        self.width.map(Breakpoint::for_width)
    }
}
