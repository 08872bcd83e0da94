use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use memmap2::Mmap;
use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::config::FontConfig;

/// Lowercased family plus style flags.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceKey {
    pub family: String,
    pub bold: bool,
    pub italic: bool,
}

impl FaceKey {
    pub fn new(family: &str, bold: bool, italic: bool) -> Self {
        Self {
            family: family.trim().to_lowercase(),
            bold,
            italic,
        }
    }
}

pub(crate) enum FaceSource {
    Builtin,
    Loaded {
        data: Arc<Vec<u8>>,
        face_index: u32,
        name: String,
    },
}

/// Metrics for one face. Widths are in 1000-unit em.
pub struct FontFace {
    key: FaceKey,
    pub(crate) source: FaceSource,
    widths_1000: Vec<f32>,
    char_widths_1000: HashMap<char, f32>,
    ascender_ratio: f32,
    descender_ratio: f32,
}

const BUILTIN_FAMILY: &str = "helvetica";

/// Extra code point ranges measured up front, beyond WinAnsi.
const MEASURED_RANGES: [(u32, u32); 4] = [
    (0x0100, 0x024F), // Latin Extended-A/B
    (0x2000, 0x206F), // general punctuation
    (0x20A0, 0x20CF), // currency
    (0x2190, 0x21FF), // arrows
];

impl FontFace {
    fn builtin(bold: bool, italic: bool) -> Self {
        Self {
            key: FaceKey::new(BUILTIN_FAMILY, bold, italic),
            source: FaceSource::Builtin,
            widths_1000: helvetica_widths(),
            char_widths_1000: HashMap::new(),
            ascender_ratio: 0.718,
            descender_ratio: 0.207,
        }
    }

    fn from_data(key: FaceKey, data: Arc<Vec<u8>>, face_index: u32) -> Option<Self> {
        let face = Face::parse(&data, face_index).ok()?;
        let units = face.units_per_em() as f32;
        let advance = |ch: char| {
            face.glyph_index(ch)
                .and_then(|gid| face.glyph_hor_advance(gid))
                .map(|adv| adv as f32 / units * 1000.0)
        };

        let widths_1000: Vec<f32> = (32u8..=255u8)
            .map(|byte| advance(winansi_to_char(byte)).unwrap_or(0.0))
            .collect();

        let mut char_widths_1000 = HashMap::new();
        for (lo, hi) in MEASURED_RANGES {
            for cp in lo..=hi {
                if let Some(ch) = char::from_u32(cp)
                    && let Some(w) = advance(ch)
                {
                    char_widths_1000.insert(ch, w);
                }
            }
        }

        let name = font_family_name(&face).unwrap_or_else(|| key.family.clone());
        let ascender_ratio = face.ascender() as f32 / units;
        let descender_ratio = -(face.descender() as f32) / units;
        drop(face);

        Some(Self {
            key,
            source: FaceSource::Loaded {
                data,
                face_index,
                name,
            },
            widths_1000,
            char_widths_1000,
            ascender_ratio,
            descender_ratio,
        })
    }

    pub fn key(&self) -> &FaceKey {
        &self.key
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.source, FaceSource::Builtin)
    }

    /// Width of a single character in 1000-units. WinAnsi chars come from the
    /// table, a few extra ranges from the per-char map, anything else measures as 'n'.
    pub fn char_width_1000(&self, ch: char) -> f32 {
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            return self.widths_1000[(byte - 32) as usize];
        }
        if let Some(&w) = self.char_widths_1000.get(&ch) {
            return w;
        }
        if ch.is_control() {
            return 0.0;
        }
        self.widths_1000[(b'n' - 32) as usize]
    }

    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    pub fn space_width(&self, font_size: f32) -> f32 {
        self.widths_1000[0] * font_size / 1000.0
    }

    pub fn ascent(&self, font_size: f32) -> f32 {
        self.ascender_ratio * font_size
    }

    pub fn descent(&self, font_size: f32) -> f32 {
        self.descender_ratio * font_size
    }
}

/// Handle for one outstanding family load. Fires exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontRequestId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Pending(FontRequestId),
}

enum FamilyState {
    Pending(FontRequestId),
    Ready,
}

/// Loaded faces plus the asynchronous-load bookkeeping for requested families.
pub struct FontLibrary {
    config: FontConfig,
    index: Option<FontLookup>,
    families: HashMap<String, FamilyState>,
    faces: HashMap<FaceKey, Arc<FontFace>>,
    builtin: [Arc<FontFace>; 4],
    next_request: u64,
}

impl FontLibrary {
    pub fn new(config: FontConfig) -> Self {
        Self {
            config,
            index: None,
            families: HashMap::new(),
            faces: HashMap::new(),
            builtin: [
                Arc::new(FontFace::builtin(false, false)),
                Arc::new(FontFace::builtin(true, false)),
                Arc::new(FontFace::builtin(false, true)),
                Arc::new(FontFace::builtin(true, true)),
            ],
            next_request: 1,
        }
    }

    /// Ask for a family. Built-in and already loaded families are ready at once;
    /// anything else stays pending until `load_pending` runs. Repeated requests for a
    /// pending family return the same id.
    pub fn request(&mut self, family: &str) -> Readiness {
        let key = family.trim().to_lowercase();
        if key == BUILTIN_FAMILY {
            return Readiness::Ready;
        }
        match self.families.get(&key) {
            Some(FamilyState::Ready) => Readiness::Ready,
            Some(FamilyState::Pending(id)) => Readiness::Pending(*id),
            None => {
                let id = FontRequestId(self.next_request);
                self.next_request += 1;
                log::debug!("Font request {id:?}: {family}");
                self.families.insert(key, FamilyState::Pending(id));
                Readiness::Pending(id)
            }
        }
    }

    pub fn is_ready(&self, family: &str) -> bool {
        let key = family.trim().to_lowercase();
        key == BUILTIN_FAMILY || matches!(self.families.get(&key), Some(FamilyState::Ready))
    }

    pub fn has_pending(&self) -> bool {
        self.families
            .values()
            .any(|s| matches!(s, FamilyState::Pending(_)))
    }

    /// Load every pending family and return the ids that became ready, in request order.
    pub fn load_pending(&mut self) -> Vec<FontRequestId> {
        let mut pending: Vec<(String, FontRequestId)> = self
            .families
            .iter()
            .filter_map(|(family, state)| match state {
                FamilyState::Pending(id) => Some((family.clone(), *id)),
                FamilyState::Ready => None,
            })
            .collect();
        if pending.is_empty() {
            return Vec::new();
        }
        pending.sort_by_key(|(_, id)| *id);

        let t0 = std::time::Instant::now();
        let mut ready = Vec::with_capacity(pending.len());
        for (family, id) in pending {
            let loaded = self.load_family(&family);
            if loaded == 0 {
                log::warn!("Font not found: {family}, using built-in Helvetica metrics");
            }
            self.families.insert(family, FamilyState::Ready);
            ready.push(id);
        }
        log::debug!(
            "load_pending: {} families → {:.1}ms",
            ready.len(),
            t0.elapsed().as_secs_f64() * 1000.0,
        );
        ready
    }

    fn load_family(&mut self, family: &str) -> usize {
        let mut loaded = 0;
        for (bold, italic) in [(false, false), (true, false), (false, true), (true, true)] {
            let Some((path, face_index)) = self.find_font_file(family, bold, italic) else {
                continue;
            };
            let data = match std::fs::read(&path) {
                Ok(d) => Arc::new(d),
                Err(e) => {
                    log::warn!("Cannot read font {}: {e}", path.display());
                    continue;
                }
            };
            let key = FaceKey::new(family, bold, italic);
            if let Some(face) = FontFace::from_data(key.clone(), data, face_index) {
                self.faces.insert(key, Arc::new(face));
                loaded += 1;
            }
        }
        loaded
    }

    fn find_font_file(&mut self, family: &str, bold: bool, italic: bool) -> Option<(PathBuf, u32)> {
        let config = &self.config;
        let index = self.index.get_or_insert_with(|| scan_font_dirs(config));
        let key = family.to_lowercase();
        index
            .get(&(key.clone(), bold, italic))
            .or_else(|| {
                if bold || italic {
                    index.get(&(key, false, false))
                } else {
                    None
                }
            })
            .cloned()
    }

    /// Resolved face for drawing and measuring. Falls back to the regular style of the
    /// family, then to the built-in face.
    pub fn face(&self, family: &str, bold: bool, italic: bool) -> Arc<FontFace> {
        let key = FaceKey::new(family, bold, italic);
        if let Some(face) = self.faces.get(&key) {
            return Arc::clone(face);
        }
        if let Some(face) = self.faces.get(&FaceKey::new(family, false, false)) {
            return Arc::clone(face);
        }
        let slot = match (bold, italic) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        };
        Arc::clone(&self.builtin[slot])
    }

    pub fn face_by_key(&self, key: &FaceKey) -> Arc<FontFace> {
        self.face(&key.family, key.bold, key.italic)
    }
}

/// (lowercase family name, bold, italic) -> (file path, face index within TTC)
type FontLookup = HashMap<(String, bool, bool), (PathBuf, u32)>;

fn font_family_name(face: &Face) -> Option<String> {
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

fn read_font_style(data: &[u8], face_index: u32) -> Option<(String, bool, bool)> {
    let face = Face::parse(data, face_index).ok()?;
    let family = font_family_name(&face)?;
    Some((family, face.is_bold(), face.is_italic()))
}

fn font_directories(config: &FontConfig) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = config.dirs.clone();
    if !config.system_fonts {
        return dirs;
    }

    #[cfg(target_os = "macos")]
    {
        dirs.extend([
            "/Library/Fonts".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(&home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(&home).join(".local/share/fonts"));
            dirs.push(PathBuf::from(home).join(".fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        } else {
            dirs.push("C:\\Windows\\Fonts".into());
        }
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            dirs.push(PathBuf::from(local).join("Microsoft\\Windows\\Fonts"));
        }
    }

    dirs
}

struct CachedFace {
    family: String,
    bold: bool,
    italic: bool,
    face_index: u32,
}

struct CachedFile {
    faces: Vec<CachedFace>,
}

#[derive(Default)]
struct FontCache {
    dir_mtimes: HashMap<PathBuf, i64>,
    files: HashMap<PathBuf, CachedFile>,
}

fn cache_path() -> Option<PathBuf> {
    let dir = if cfg!(target_os = "macos") {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library/Caches/cvpager"))
    } else if cfg!(target_os = "windows") {
        std::env::var("LOCALAPPDATA")
            .ok()
            .map(|d| PathBuf::from(d).join("cvpager/cache"))
    } else {
        std::env::var("XDG_CACHE_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".cache"))
            })
            .map(|d| d.join("cvpager"))
    };
    dir.map(|d| d.join("font-index.tsv"))
}

const CACHE_VERSION: &str = "v1";

fn load_cache() -> FontCache {
    let mut fc = FontCache::default();
    let Some(path) = cache_path() else {
        return fc;
    };
    let Ok(content) = std::fs::read_to_string(&path) else {
        return fc;
    };
    let mut lines = content.lines();
    if lines.next() != Some(CACHE_VERSION) {
        return fc;
    }
    for line in lines {
        let parts: Vec<&str> = line.split('\t').collect();
        match parts.first().copied() {
            Some("D") if parts.len() == 3 => {
                let Ok(mtime) = parts[2].parse::<i64>() else {
                    continue;
                };
                fc.dir_mtimes.insert(PathBuf::from(parts[1]), mtime);
            }
            Some("F") if parts.len() == 6 => {
                let Ok(face_index) = parts[5].parse::<u32>() else {
                    continue;
                };
                fc.files
                    .entry(PathBuf::from(parts[1]))
                    .or_insert(CachedFile { faces: Vec::new() })
                    .faces
                    .push(CachedFace {
                        family: parts[2].to_string(),
                        bold: parts[3] == "1",
                        italic: parts[4] == "1",
                        face_index,
                    });
            }
            Some("F") if parts.len() == 3 && parts[2] == "-" => {
                fc.files
                    .entry(PathBuf::from(parts[1]))
                    .or_insert(CachedFile { faces: Vec::new() });
            }
            _ => {}
        }
    }
    fc
}

fn save_cache(cache: &FontCache) {
    let Some(path) = cache_path() else {
        return;
    };
    if let Some(dir) = path.parent()
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        log::debug!("Font index cache dir {}: {e}", dir.display());
        return;
    }
    let mut out = String::from(CACHE_VERSION);
    out.push('\n');
    for (dir_path, mtime) in &cache.dir_mtimes {
        out.push_str(&format!("D\t{}\t{}\n", dir_path.to_string_lossy(), mtime));
    }
    for (file_path, cached) in &cache.files {
        let path_str = file_path.to_string_lossy();
        if cached.faces.is_empty() {
            out.push_str(&format!("F\t{}\t-\n", path_str));
        } else {
            for face in &cached.faces {
                out.push_str(&format!(
                    "F\t{}\t{}\t{}\t{}\t{}\n",
                    path_str,
                    face.family,
                    if face.bold { "1" } else { "0" },
                    if face.italic { "1" } else { "0" },
                    face.face_index,
                ));
            }
        }
    }
    if let Err(e) = std::fs::write(&path, out) {
        log::debug!("Font index cache write {}: {e}", path.display());
    }
}

fn dir_mtime(path: &std::path::Path) -> i64 {
    std::fs::metadata(path)
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn is_font_file(path: &std::path::Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("ttf" | "otf" | "ttc")
    )
}

fn is_font_collection(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttc"))
}

fn scan_font_dirs(config: &FontConfig) -> FontLookup {
    let t0 = std::time::Instant::now();
    let mut index = FontLookup::new();
    let cache = if config.index_cache {
        load_cache()
    } else {
        FontCache::default()
    };
    let mut new_cache = FontCache::default();
    let mut files_scanned = 0u32;
    let mut dirs_cached = 0u32;
    let mut dirs_scanned = 0u32;
    let mut visited_dirs: HashSet<PathBuf> = HashSet::new();

    // Earlier directories win: user dirs come first, so pop from the back of a reversed stack.
    let mut stack: Vec<PathBuf> = font_directories(config);
    stack.reverse();
    while let Some(dir) = stack.pop() {
        if !visited_dirs.insert(dir.clone()) {
            continue;
        }

        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };

        let mut subdirs = Vec::new();
        let mut font_files = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                subdirs.push(path);
            } else if is_font_file(&path) {
                font_files.push(path);
            }
        }
        font_files.sort();
        stack.extend(subdirs);

        if font_files.is_empty() {
            continue;
        }

        let current_mtime = dir_mtime(&dir);

        if let Some(&cached_mtime) = cache.dir_mtimes.get(&dir)
            && cached_mtime == current_mtime
        {
            dirs_cached += 1;
            new_cache.dir_mtimes.insert(dir.clone(), current_mtime);
            for file_path in &font_files {
                if let Some(cached_file) = cache.files.get(file_path) {
                    for face in &cached_file.faces {
                        index
                            .entry((face.family.to_lowercase(), face.bold, face.italic))
                            .or_insert((file_path.clone(), face.face_index));
                    }
                    new_cache.files.insert(
                        file_path.clone(),
                        CachedFile {
                            faces: cached_file
                                .faces
                                .iter()
                                .map(|f| CachedFace {
                                    family: f.family.clone(),
                                    bold: f.bold,
                                    italic: f.italic,
                                    face_index: f.face_index,
                                })
                                .collect(),
                        },
                    );
                }
            }
            continue;
        }

        dirs_scanned += 1;
        new_cache.dir_mtimes.insert(dir, current_mtime);
        for file_path in font_files {
            files_scanned += 1;
            let Ok(file) = std::fs::File::open(&file_path) else {
                continue;
            };
            // SAFETY: font files are opened read-only and only parsed while mapped.
            let Ok(data) = (unsafe { Mmap::map(&file) }) else {
                continue;
            };
            let face_count = if is_font_collection(&file_path) {
                ttf_parser::fonts_in_collection(&data).unwrap_or(1)
            } else {
                1
            };
            let mut faces = Vec::new();
            for face_idx in 0..face_count {
                if let Some((family, bold, italic)) = read_font_style(&data, face_idx) {
                    index
                        .entry((family.to_lowercase(), bold, italic))
                        .or_insert((file_path.clone(), face_idx));
                    faces.push(CachedFace {
                        family,
                        bold,
                        italic,
                        face_index: face_idx,
                    });
                }
            }
            new_cache.files.insert(file_path, CachedFile { faces });
        }
    }

    if config.index_cache {
        save_cache(&new_cache);
    }

    log::info!(
        "Font scan: {:.1}ms, {} dirs cached / {} scanned, {} files parsed → {} entries",
        t0.elapsed().as_secs_f64() * 1000.0,
        dirs_cached,
        dirs_scanned,
        files_scanned,
        index.len(),
    );

    index
}

/// Windows-1252 (WinAnsi) byte to Unicode char mapping.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => byte as char,
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi bytes for PDF Str encoding. Unmappable chars are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .filter_map(|c| match char_to_winansi(c) {
            0 => None,
            b => Some(b),
        })
        .collect()
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
pub(crate) fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.push((gid >> 8) as u8);
        out.push((gid & 0xFF) as u8);
    }
    out
}

/// Approximate Helvetica widths at 1000 units/em for WinAnsi chars 32..=255.
fn helvetica_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,
            33..=47 => 333.0,
            48..=57 => 556.0,
            58..=64 => 333.0,
            73 | 74 => 278.0,
            77 => 833.0,
            65..=90 => 667.0,
            91..=96 => 333.0,
            102 | 105 | 106 | 108 | 116 => 278.0,
            109 | 119 => 833.0,
            97..=122 => 556.0,
            _ => 556.0,
        })
        .collect()
}

/// A face registered in a PDF document.
#[derive(Clone)]
pub(crate) struct PdfFont {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    /// Present for embedded CID fonts; standard fonts use WinAnsi bytes.
    pub(crate) char_to_gid: Option<HashMap<char, u16>>,
}

impl PdfFont {
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

/// Embed a TrueType/OpenType face as a CIDFont (Type0 composite) with Identity-H encoding,
/// subset to `used_chars`.
#[allow(clippy::too_many_arguments)]
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    descriptor_ref: Ref,
    data_ref: Ref,
    font_name: &str,
    font_data: &[u8],
    face_index: u32,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<HashMap<char, u16>> {
    let face = Face::parse(font_data, face_index).ok()?;

    let units = face.units_per_em() as f32;
    let ascent = face.ascender() as f32 / units * 1000.0;
    let descent = face.descender() as f32 / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 / units * 1000.0)
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        bb.x_min as f32 / units * 1000.0,
        bb.y_min as f32 / units * 1000.0,
        bb.x_max as f32 / units * 1000.0,
        bb.y_max as f32 / units * 1000.0,
    );

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut chars: Vec<char> = used_chars.iter().copied().collect();
    chars.sort_unstable();
    for ch in chars {
        if let Some(gid) = face.glyph_index(ch) {
            char_to_gid.insert(ch, remapper.remap(gid.0));
        }
    }

    let subset_data = subsetter::subset(font_data, face_index, &remapper).unwrap_or_else(|e| {
        log::warn!("Font subsetting failed for {font_name}: {e}, embedding full font");
        font_data.to_vec()
    });

    let data_len = i32::try_from(subset_data.len()).ok()?;
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name: String = font_name.chars().filter(|c| !c.is_whitespace()).collect();

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(ascent)
        .descent(descent)
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let cid_font_ref = alloc();
    let system_info = pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info);
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        let mut gid_widths: Vec<(u16, f32)> = char_to_gid
            .iter()
            .filter_map(|(&ch, &new_gid)| {
                face.glyph_index(ch)
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .map(|adv| (new_gid, adv as f32 / units * 1000.0))
            })
            .collect();
        gid_widths.sort_by_key(|&(gid, _)| gid);
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let tounicode_ref = alloc();
    let cmap_name = format!("{}-UTF16", ps_name);
    let mut cmap = pdf_writer::types::UnicodeCmap::new(
        Name(cmap_name.as_bytes()),
        pdf_writer::types::SystemInfo {
            registry: pdf_writer::Str(b"Adobe"),
            ordering: pdf_writer::Str(b"Identity"),
            supplement: 0,
        },
    );
    for (&ch, &new_gid) in &char_to_gid {
        cmap.pair(new_gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Some(char_to_gid)
}

fn standard_font_name(bold: bool, italic: bool) -> &'static [u8] {
    match (bold, italic) {
        (false, false) => b"Helvetica",
        (true, false) => b"Helvetica-Bold",
        (false, true) => b"Helvetica-Oblique",
        (true, true) => b"Helvetica-BoldOblique",
    }
}

pub(crate) fn register_pdf_font(
    pdf: &mut Pdf,
    face: &FontFace,
    pdf_name: String,
    alloc: &mut impl FnMut() -> Ref,
    used_chars: &HashSet<char>,
) -> PdfFont {
    let t0 = std::time::Instant::now();
    let font_ref = alloc();

    let char_to_gid = match &face.source {
        FaceSource::Loaded {
            data,
            face_index,
            name,
        } => {
            let descriptor_ref = alloc();
            let data_ref = alloc();
            embed_truetype(
                pdf,
                font_ref,
                descriptor_ref,
                data_ref,
                name,
                data,
                *face_index,
                used_chars,
                alloc,
            )
        }
        FaceSource::Builtin => None,
    };

    if char_to_gid.is_none() {
        if !face.is_builtin() {
            log::warn!(
                "Embedding failed for {:?}, writing standard Helvetica instead",
                face.key()
            );
        }
        pdf.type1_font(font_ref)
            .base_font(Name(standard_font_name(face.key.bold, face.key.italic)))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    log::debug!(
        "register_pdf_font: {:?} → {:.1}ms",
        face.key(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    PdfFont {
        pdf_name,
        font_ref,
        char_to_gid,
    }
}
