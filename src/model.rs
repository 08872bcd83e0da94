use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use uuid::Uuid;

use crate::content::Labels;
use crate::error::Error;

pub type Rgb = [u8; 3];

/// Stable identity of an entry. Survives reordering and deletion of its neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub website: String,
    pub linkedin: String,
    pub birth_date: String,
    pub birthplace: String,
    pub nationality: String,
    pub gender: String,
    pub license: String,
    pub marital_status: String,
    /// Source of the profile photo. Loaded through the asset store.
    pub photo: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    Work,
    Education,
    Skills,
    Languages,
    Hobbies,
    Courses,
    Internships,
    Traits,
    Certifications,
}

impl SectionKind {
    /// Always present, in this order.
    pub const FIXED: [SectionKind; 5] = [
        SectionKind::Work,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Languages,
        SectionKind::Hobbies,
    ];

    /// Toggled by the user; ordered by when they were added.
    pub const OPTIONAL: [SectionKind; 4] = [
        SectionKind::Courses,
        SectionKind::Internships,
        SectionKind::Traits,
        SectionKind::Certifications,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SectionKind::Work => "work",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Languages => "languages",
            SectionKind::Hobbies => "hobbies",
            SectionKind::Courses => "courses",
            SectionKind::Internships => "internships",
            SectionKind::Traits => "traits",
            SectionKind::Certifications => "certifications",
        }
    }

    pub fn is_fixed(self) -> bool {
        Self::FIXED.contains(&self)
    }

    pub fn accepts(self, body: &EntryBody) -> bool {
        matches!(
            (self, body),
            (SectionKind::Work | SectionKind::Internships, EntryBody::Position(_))
                | (SectionKind::Education, EntryBody::Study(_))
                | (SectionKind::Courses | SectionKind::Certifications, EntryBody::Credential(_))
                | (SectionKind::Skills, EntryBody::Skill(_))
                | (SectionKind::Languages, EntryBody::Language(_))
                | (SectionKind::Traits, EntryBody::Trait(_))
                | (SectionKind::Hobbies, EntryBody::Hobby(_))
        )
    }
}

impl FromStr for SectionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "work" | "workexperience" | "work_experience" => SectionKind::Work,
            "education" => SectionKind::Education,
            "skills" => SectionKind::Skills,
            "languages" => SectionKind::Languages,
            "hobbies" => SectionKind::Hobbies,
            "courses" => SectionKind::Courses,
            "internships" => SectionKind::Internships,
            "traits" => SectionKind::Traits,
            "certifications" => SectionKind::Certifications,
            other => return Err(Error::InvalidContent(format!("unknown section '{other}'"))),
        };
        Ok(kind)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A month/year pair as entered. Month text is normalised at render time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatePoint {
    pub month: String,
    pub year: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Period {
    pub start: DatePoint,
    pub end: DatePoint,
    /// Still ongoing; the end point is ignored.
    pub current: bool,
}

impl Period {
    fn has_content(&self) -> bool {
        !self.start.month.trim().is_empty() || !self.start.year.trim().is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Position {
    pub title: String,
    pub employer: String,
    pub city: String,
    pub period: Period,
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Study {
    pub degree: String,
    pub institution: String,
    pub city: String,
    pub period: Period,
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Credential {
    pub title: String,
    pub institution: String,
    pub period: Period,
    pub description: String,
}

/// Proficiency on a 0..=5 scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Level(u8);

impl Level {
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Accepts a number or a proficiency word (English or Dutch). Unknown words are level 0.
    pub fn parse(text: &str) -> Self {
        let normalized = text.trim().to_lowercase();
        let named = match normalized.as_str() {
            "beginner" => Some(1),
            "fair" | "redelijk" => Some(2),
            "good" | "goed" => Some(3),
            "very good" | "verygood" | "zeer goed" | "vloeiend" => Some(4),
            "fluent" | "native" | "native speaker" | "excellent" | "uitstekend" | "moedertaal" => {
                Some(5)
            }
            _ => None,
        };
        match named {
            Some(v) => Self(v),
            None => normalized
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| Self::new(v.clamp(0.0, Self::MAX as f32) as u8))
                .unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rated {
    pub name: String,
    pub level: Option<Level>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Named {
    pub name: String,
}

/// Entry payload, one variant per section type.
#[derive(Clone, Debug, PartialEq)]
pub enum EntryBody {
    Position(Position),
    Study(Study),
    Credential(Credential),
    Skill(Rated),
    Language(Rated),
    Trait(Named),
    Hobby(Named),
}

impl EntryBody {
    /// True when the entry has any field that would render.
    pub fn has_content(&self) -> bool {
        let filled = |s: &str| !s.trim().is_empty();
        match self {
            EntryBody::Position(p) => {
                filled(&p.title)
                    || filled(&p.employer)
                    || filled(&p.city)
                    || filled(&p.description)
                    || p.period.has_content()
            }
            EntryBody::Study(s) => {
                filled(&s.degree)
                    || filled(&s.institution)
                    || filled(&s.city)
                    || filled(&s.description)
                    || s.period.has_content()
            }
            EntryBody::Credential(c) => {
                filled(&c.title)
                    || filled(&c.institution)
                    || filled(&c.description)
                    || c.period.has_content()
            }
            EntryBody::Skill(r) | EntryBody::Language(r) => filled(&r.name),
            EntryBody::Trait(n) | EntryBody::Hobby(n) => filled(&n.name),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub body: EntryBody,
}

impl Entry {
    pub fn new(body: EntryBody) -> Self {
        Self {
            id: EntryId::new(),
            body,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub entries: Vec<Entry>,
}

impl Section {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    pub fn has_content(&self) -> bool {
        self.entries.iter().any(|e| e.body.has_content())
    }

    /// Entries that would render, in order.
    pub fn visible_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.body.has_content())
    }
}

/// The canonical, template-independent CV.
#[derive(Clone, Debug, PartialEq)]
pub struct Content {
    pub profile: Profile,
    /// Fixed sections in `SectionKind::FIXED` order, then optional ones in addition order.
    sections: Vec<Section>,
    pub labels: Labels,
}

impl Default for Content {
    fn default() -> Self {
        Self::new(Profile::default())
    }
}

impl Content {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            sections: SectionKind::FIXED.iter().map(|&k| Section::new(k)).collect(),
            labels: Labels::default(),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn section_mut(&mut self, kind: SectionKind) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.kind == kind)
    }

    /// Optional sections in the order they were added.
    pub fn optional_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| !s.kind.is_fixed())
    }

    /// Adds an optional section at the end. Returns false if it was already present
    /// or is a fixed section.
    pub fn add_section(&mut self, kind: SectionKind) -> bool {
        if kind.is_fixed() || self.section(kind).is_some() {
            return false;
        }
        self.sections.push(Section::new(kind));
        true
    }

    /// Removes an optional section and its entries. Fixed sections stay.
    pub fn remove_section(&mut self, kind: SectionKind) -> bool {
        if kind.is_fixed() {
            return false;
        }
        let before = self.sections.len();
        self.sections.retain(|s| s.kind != kind);
        self.sections.len() != before
    }

    pub fn push_entry(&mut self, kind: SectionKind, body: EntryBody) -> Result<EntryId, Error> {
        self.insert_entry(kind, Entry::new(body))
    }

    /// Appends an entry that already carries its identity.
    pub fn insert_entry(&mut self, kind: SectionKind, entry: Entry) -> Result<EntryId, Error> {
        if !kind.accepts(&entry.body) {
            return Err(Error::InvalidContent(format!(
                "entry {} does not belong in section '{kind}'",
                entry.id
            )));
        }
        if self.entries().any(|(_, e)| e.id == entry.id) {
            return Err(Error::InvalidContent(format!("duplicate entry id {}", entry.id)));
        }
        let section = self
            .section_mut(kind)
            .ok_or_else(|| Error::InvalidContent(format!("section '{kind}' is not enabled")))?;
        let id = entry.id;
        section.entries.push(entry);
        Ok(id)
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries().find(|(_, e)| e.id == id).map(|(_, e)| e)
    }

    pub fn entry_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.entries.iter_mut())
            .find(|e| e.id == id)
    }

    pub fn remove_entry(&mut self, id: EntryId) -> Option<Entry> {
        for section in &mut self.sections {
            if let Some(pos) = section.entries.iter().position(|e| e.id == id) {
                return Some(section.entries.remove(pos));
            }
        }
        None
    }

    /// Moves an entry to `index` within its own section (clamped to the end).
    pub fn move_entry(&mut self, id: EntryId, index: usize) -> bool {
        for section in &mut self.sections {
            if let Some(pos) = section.entries.iter().position(|e| e.id == id) {
                let entry = section.entries.remove(pos);
                let to = index.min(section.entries.len());
                section.entries.insert(to, entry);
                return true;
            }
        }
        false
    }

    fn entries(&self) -> impl Iterator<Item = (SectionKind, &Entry)> {
        self.sections
            .iter()
            .flat_map(|s| s.entries.iter().map(move |e| (s.kind, e)))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TemplateId {
    #[default]
    Luna,
    Athena,
    Phoenix,
    Orion,
    Caesar,
    Sherlock,
    Gatsby,
}

impl TemplateId {
    pub const ALL: [TemplateId; 7] = [
        TemplateId::Luna,
        TemplateId::Athena,
        TemplateId::Phoenix,
        TemplateId::Orion,
        TemplateId::Caesar,
        TemplateId::Sherlock,
        TemplateId::Gatsby,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TemplateId::Luna => "luna",
            TemplateId::Athena => "athena",
            TemplateId::Phoenix => "phoenix",
            TemplateId::Orion => "orion",
            TemplateId::Caesar => "caesar",
            TemplateId::Sherlock => "sherlock",
            TemplateId::Gatsby => "gatsby",
        }
    }

    /// Unknown names fall back to Luna.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("Unknown template '{name}', using luna");
            TemplateId::default()
        })
    }
}

impl FromStr for TemplateId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        TemplateId::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| Error::InvalidContent(format!("unknown template '{s}'")))
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontSizeTier {
    Xs,
    S,
    #[default]
    M,
    L,
    Xl,
}

impl FontSizeTier {
    /// Body text size in px.
    pub fn body_px(self) -> f32 {
        match self {
            FontSizeTier::Xs => 11.0,
            FontSizeTier::S => 12.0,
            FontSizeTier::M => 13.0,
            FontSizeTier::L => 14.0,
            FontSizeTier::Xl => 15.0,
        }
    }

    /// Section heading size in px.
    pub fn heading_px(self) -> f32 {
        self.body_px() + 2.0
    }
}

impl FromStr for FontSizeTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xs" => Ok(FontSizeTier::Xs),
            "s" => Ok(FontSizeTier::S),
            "m" => Ok(FontSizeTier::M),
            "l" => Ok(FontSizeTier::L),
            "xl" => Ok(FontSizeTier::Xl),
            other => Err(Error::InvalidContent(format!("unknown font size '{other}'"))),
        }
    }
}

/// CSS-style line-height multiplier tiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineSpacing {
    Single,
    Comfortable,
    #[default]
    Standard,
    Relaxed,
    Double,
}

impl LineSpacing {
    pub fn multiplier(self) -> f32 {
        match self {
            LineSpacing::Single => 1.0,
            LineSpacing::Comfortable => 1.15,
            LineSpacing::Standard => 1.25,
            LineSpacing::Relaxed => 1.5,
            LineSpacing::Double => 2.0,
        }
    }
}

impl FromStr for LineSpacing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tiers = [
            LineSpacing::Single,
            LineSpacing::Comfortable,
            LineSpacing::Standard,
            LineSpacing::Relaxed,
            LineSpacing::Double,
        ];
        let value: f32 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidContent(format!("unknown line spacing '{s}'")))?;
        tiers
            .into_iter()
            .find(|t| (t.multiplier() - value).abs() < 0.001)
            .ok_or_else(|| Error::InvalidContent(format!("unsupported line spacing {value}")))
    }
}

pub const DEFAULT_ACCENT: Rgb = [0x3B, 0x82, 0xF6];
pub const DEFAULT_FONT_FAMILY: &str = "Poppins";

/// Every field affects rendered size, so any change is a reflow trigger.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleSettings {
    pub template: TemplateId,
    pub font_family: String,
    pub font_size: FontSizeTier,
    pub line_spacing: LineSpacing,
    pub accent: Rgb,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            template: TemplateId::default(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: FontSizeTier::default(),
            line_spacing: LineSpacing::default(),
            accent: DEFAULT_ACCENT,
        }
    }
}
