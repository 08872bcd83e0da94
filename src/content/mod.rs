mod dates;
mod labels;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use uuid::Uuid;

use crate::error::Error;
use crate::model::{
    Content, Credential, DEFAULT_ACCENT, DatePoint, Entry, EntryBody, EntryId, Level, Named,
    Period, Position, Profile, Rated, Rgb, SectionKind, StyleSettings, Study, TemplateId,
};

pub use dates::{format_date, format_period, month_index};
pub use labels::{Labels, capitalize};

/// A parsed input document: the content plus the style it was saved with.
#[derive(Clone, Debug)]
pub struct LoadedDocument {
    pub content: Content,
    pub style: StyleSettings,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawDocument {
    profile: RawProfile,
    sections: BTreeMap<String, Vec<serde_json::Value>>,
    #[serde(alias = "dynamicSteps")]
    extra_sections: Vec<String>,
    settings: Option<RawSettings>,
    labels: BTreeMap<String, String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawProfile {
    #[serde(alias = "firstName")]
    first_name: String,
    #[serde(alias = "lastName")]
    last_name: String,
    email: String,
    phone: String,
    address: String,
    #[serde(alias = "postalCode")]
    postal_code: String,
    city: String,
    country: String,
    website: String,
    linkedin: String,
    #[serde(alias = "birthdate")]
    birth_date: String,
    birthplace: String,
    nationality: String,
    gender: String,
    license: String,
    #[serde(alias = "maritalStatus")]
    marital_status: String,
    photo: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawDate {
    month: String,
    year: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawPeriodFields {
    start: RawDate,
    end: RawDate,
    #[serde(alias = "werktHier", alias = "heden")]
    current: bool,
}

impl RawPeriodFields {
    fn into_period(self) -> Period {
        Period {
            start: DatePoint {
                month: self.start.month,
                year: self.start.year,
            },
            end: DatePoint {
                month: self.end.month,
                year: self.end.year,
            },
            current: self.current,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawPosition {
    id: Option<Uuid>,
    #[serde(alias = "functie")]
    title: String,
    #[serde(alias = "bedrijf")]
    employer: String,
    #[serde(alias = "stad")]
    city: String,
    #[serde(flatten)]
    period: RawPeriodFields,
    #[serde(alias = "beschrijving")]
    description: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawStudy {
    id: Option<Uuid>,
    #[serde(alias = "opleiding")]
    degree: String,
    #[serde(alias = "instituut")]
    institution: String,
    #[serde(alias = "stad")]
    city: String,
    #[serde(flatten)]
    period: RawPeriodFields,
    #[serde(alias = "beschrijving")]
    description: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawCredential {
    id: Option<Uuid>,
    #[serde(alias = "titel")]
    title: String,
    #[serde(alias = "instituut", alias = "platform")]
    institution: String,
    #[serde(flatten)]
    period: RawPeriodFields,
    #[serde(alias = "beschrijving")]
    description: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLevel {
    Number(f64),
    Text(String),
}

impl RawLevel {
    fn into_level(self) -> Option<Level> {
        match self {
            RawLevel::Number(n) if n.is_finite() => {
                Some(Level::new(n.clamp(0.0, Level::MAX as f64) as u8))
            }
            RawLevel::Number(_) => None,
            RawLevel::Text(t) if t.trim().is_empty() => None,
            RawLevel::Text(t) => Some(Level::parse(&t)),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawRated {
    id: Option<Uuid>,
    #[serde(alias = "naam")]
    name: String,
    #[serde(alias = "niveau")]
    level: Option<RawLevel>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNamed {
    Plain(String),
    Object {
        #[serde(default)]
        id: Option<Uuid>,
        #[serde(alias = "naam")]
        name: String,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSpacing {
    Number(f64),
    Text(String),
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    template: Option<String>,
    #[serde(alias = "font_family")]
    font: Option<String>,
    #[serde(alias = "fontSize")]
    font_size: Option<String>,
    #[serde(alias = "lineSpacing")]
    line_spacing: Option<RawSpacing>,
    #[serde(alias = "themeColor")]
    accent: Option<String>,
}

/// Parse `#RRGGBB` / `RRGGBB`.
pub fn parse_hex_color(val: &str) -> Option<Rgb> {
    let val = val.trim().trim_start_matches('#');
    if val.len() != 6 || !val.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&val[0..2], 16).ok()?;
    let g = u8::from_str_radix(&val[2..4], 16).ok()?;
    let b = u8::from_str_radix(&val[4..6], 16).ok()?;
    Some([r, g, b])
}

fn entry_id(id: Option<Uuid>) -> EntryId {
    id.map(EntryId::from_uuid).unwrap_or_default()
}

fn parse_entry(kind: SectionKind, value: serde_json::Value) -> Result<Entry, Error> {
    let entry = match kind {
        SectionKind::Work | SectionKind::Internships => {
            let raw: RawPosition = serde_json::from_value(value)?;
            Entry {
                id: entry_id(raw.id),
                body: EntryBody::Position(Position {
                    title: raw.title,
                    employer: raw.employer,
                    city: raw.city,
                    period: raw.period.into_period(),
                    description: raw.description,
                }),
            }
        }
        SectionKind::Education => {
            let raw: RawStudy = serde_json::from_value(value)?;
            Entry {
                id: entry_id(raw.id),
                body: EntryBody::Study(Study {
                    degree: raw.degree,
                    institution: raw.institution,
                    city: raw.city,
                    period: raw.period.into_period(),
                    description: raw.description,
                }),
            }
        }
        SectionKind::Courses | SectionKind::Certifications => {
            let raw: RawCredential = serde_json::from_value(value)?;
            Entry {
                id: entry_id(raw.id),
                body: EntryBody::Credential(Credential {
                    title: raw.title,
                    institution: raw.institution,
                    period: raw.period.into_period(),
                    description: raw.description,
                }),
            }
        }
        SectionKind::Skills | SectionKind::Languages => {
            let raw: RawRated = serde_json::from_value(value)?;
            let rated = Rated {
                name: raw.name,
                level: raw.level.and_then(RawLevel::into_level),
            };
            let body = if kind == SectionKind::Skills {
                EntryBody::Skill(rated)
            } else {
                EntryBody::Language(rated)
            };
            Entry {
                id: entry_id(raw.id),
                body,
            }
        }
        SectionKind::Traits | SectionKind::Hobbies => {
            let (id, name) = match serde_json::from_value(value)? {
                RawNamed::Plain(name) => (None, name),
                RawNamed::Object { id, name } => (id, name),
            };
            let named = Named { name };
            let body = if kind == SectionKind::Traits {
                EntryBody::Trait(named)
            } else {
                EntryBody::Hobby(named)
            };
            Entry {
                id: entry_id(id),
                body,
            }
        }
    };
    Ok(entry)
}

fn parse_settings(raw: RawSettings) -> StyleSettings {
    let mut style = StyleSettings::default();
    if let Some(t) = raw.template {
        style.template = TemplateId::from_name_or_default(&t);
    }
    if let Some(font) = raw.font.filter(|f| !f.trim().is_empty()) {
        style.font_family = font.trim().to_string();
    }
    if let Some(size) = raw.font_size {
        match size.parse() {
            Ok(tier) => style.font_size = tier,
            Err(e) => log::warn!("{e}, using default"),
        }
    }
    if let Some(spacing) = raw.line_spacing {
        let text = match spacing {
            RawSpacing::Number(n) => n.to_string(),
            RawSpacing::Text(t) => t,
        };
        match text.parse() {
            Ok(tier) => style.line_spacing = tier,
            Err(e) => log::warn!("{e}, using default"),
        }
    }
    if let Some(accent) = raw.accent {
        style.accent = parse_hex_color(&accent).unwrap_or_else(|| {
            log::warn!("Invalid accent color {accent:?}, using default");
            DEFAULT_ACCENT
        });
    }
    style
}

fn build(raw: RawDocument, base_dir: Option<&Path>) -> Result<LoadedDocument, Error> {
    let p = raw.profile;
    let photo = p.photo.filter(|s| !s.trim().is_empty()).map(|s| {
        let path = PathBuf::from(s.trim());
        match base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path,
        }
    });
    let mut content = Content::new(Profile {
        first_name: p.first_name,
        last_name: p.last_name,
        email: p.email,
        phone: p.phone,
        address: p.address,
        postal_code: p.postal_code,
        city: p.city,
        country: p.country,
        website: p.website,
        linkedin: p.linkedin,
        birth_date: p.birth_date,
        birthplace: p.birthplace,
        nationality: p.nationality,
        gender: p.gender,
        license: p.license,
        marital_status: p.marital_status,
        photo,
    });
    content.labels = Labels::with_overrides(raw.labels);

    for key in &raw.extra_sections {
        let kind: SectionKind = key.parse()?;
        if kind.is_fixed() {
            log::debug!("Ignoring fixed section '{kind}' in extra_sections");
            continue;
        }
        content.add_section(kind);
    }

    let mut sections: Vec<(SectionKind, Vec<serde_json::Value>)> = raw
        .sections
        .into_iter()
        .map(|(key, entries)| key.parse().map(|kind| (kind, entries)))
        .collect::<Result<_, Error>>()?;
    sections.sort_by_key(|(kind, _)| *kind);

    for (kind, entries) in sections {
        if content.section(kind).is_none() && content.add_section(kind) {
            log::warn!("Section '{kind}' has entries but is not listed in extra_sections; appending");
        }
        for value in entries {
            let entry = parse_entry(kind, value)?;
            content.insert_entry(kind, entry)?;
        }
    }

    let style = raw.settings.map(parse_settings).unwrap_or_default();
    Ok(LoadedDocument { content, style })
}

/// Parse an input document. Relative photo paths resolve against `base_dir`.
pub fn parse_bytes(bytes: &[u8], base_dir: Option<&Path>) -> Result<LoadedDocument, Error> {
    let raw: RawDocument = serde_json::from_slice(bytes)?;
    build(raw, base_dir)
}

pub fn load(path: &Path) -> Result<LoadedDocument, Error> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    parse_bytes(&bytes, path.parent())
}
