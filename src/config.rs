use std::path::PathBuf;
use std::time::Duration;

/// Where the font library looks for faces.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Extra directories searched before the platform ones.
    pub dirs: Vec<PathBuf>,
    /// Include the platform font directories.
    pub system_fonts: bool,
    /// Persist the scanned index between runs.
    pub index_cache: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            dirs: Vec::new(),
            system_fonts: true,
            index_cache: true,
        }
    }
}

impl FontConfig {
    /// Only the built-in Helvetica metrics are available. Every family request
    /// still goes through the pending/ready cycle.
    pub fn builtin_only() -> Self {
        Self {
            dirs: Vec::new(),
            system_fonts: false,
            index_cache: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub fonts: FontConfig,
    /// Quiet period after the last size-affecting input before a reflow starts.
    pub debounce: Duration,
    /// Upper bound of the display scale in thumbnail mode.
    pub thumbnail_scale_cap: f32,
}

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);
pub const DEFAULT_THUMBNAIL_SCALE_CAP: f32 = 0.34;

impl Default for Config {
    fn default() -> Self {
        Self {
            fonts: FontConfig::default(),
            debounce: DEFAULT_DEBOUNCE,
            thumbnail_scale_cap: DEFAULT_THUMBNAIL_SCALE_CAP,
        }
    }
}

impl Config {
    /// Defaults overridden by `CVPAGER_*` environment variables:
    ///
    /// - `CVPAGER_FONTS`: extra font directories (`:`-separated, `;` on Windows)
    /// - `CVPAGER_NO_FONT_CACHE`: disable the on-disk font index
    /// - `CVPAGER_NO_SYSTEM_FONTS`: skip platform font directories
    /// - `CVPAGER_DEBOUNCE_MS`: reflow quiet period in milliseconds
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(val) = std::env::var("CVPAGER_FONTS") {
            let sep = if cfg!(windows) { ';' } else { ':' };
            for part in val.split(sep) {
                let trimmed = part.trim();
                if !trimmed.is_empty() {
                    cfg.fonts.dirs.push(PathBuf::from(trimmed));
                }
            }
        }
        if std::env::var("CVPAGER_NO_FONT_CACHE").is_ok() {
            cfg.fonts.index_cache = false;
        }
        if std::env::var("CVPAGER_NO_SYSTEM_FONTS").is_ok() {
            cfg.fonts.system_fonts = false;
        }
        if let Ok(val) = std::env::var("CVPAGER_DEBOUNCE_MS") {
            match val.trim().parse::<u64>() {
                Ok(ms) => cfg.debounce = Duration::from_millis(ms),
                Err(_) => log::warn!("Ignoring CVPAGER_DEBOUNCE_MS={val:?}: not a number"),
            }
        }

        cfg
    }
}
