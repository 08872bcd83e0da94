use crate::content::{capitalize, format_period};
use crate::layout::{Align, Block, Insets, TextStyle};
use crate::model::{Entry, EntryBody, Level, Rgb, Section};

use super::{Chunk, ChunkKey, Flow, TemplateContext};

pub(crate) const TEXT: Rgb = [0x1F, 0x29, 0x37];
pub(crate) const BODY: Rgb = [0x37, 0x41, 0x51];
pub(crate) const MUTED: Rgb = [0x4B, 0x55, 0x63];
pub(crate) const RULE: Rgb = [0xD1, 0xD5, 0xDB];
pub(crate) const WHITE: Rgb = [0xFF, 0xFF, 0xFF];

/// Linear blend from `a` (t = 0) to `b` (t = 1).
pub(crate) fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let ch = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    [ch(a[0], b[0]), ch(a[1], b[1]), ch(a[2], b[2])]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelStyle {
    Dots,
    Bar,
    Hidden,
}

/// Colors for one flow.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    pub text: Rgb,
    pub body: Rgb,
    pub muted: Rgb,
    pub heading: Rgb,
    pub rule: Option<Rgb>,
    pub rule_thickness: f32,
    pub meter_fill: Rgb,
    pub meter_track: Rgb,
}

impl Palette {
    /// Dark text on white.
    pub fn light(heading: Rgb, accent: Rgb) -> Self {
        Self {
            text: TEXT,
            body: BODY,
            muted: MUTED,
            heading,
            rule: Some(RULE),
            rule_thickness: 1.0,
            meter_fill: accent,
            meter_track: mix(accent, WHITE, 0.7),
        }
    }

    /// White text on an accent panel.
    pub fn on_accent(accent: Rgb) -> Self {
        Self {
            text: WHITE,
            body: WHITE,
            muted: mix(WHITE, accent, 0.15),
            heading: WHITE,
            rule: Some(WHITE),
            rule_thickness: 1.0,
            meter_fill: WHITE,
            meter_track: mix(accent, WHITE, 0.4),
        }
    }

    pub fn rule(mut self, color: Option<Rgb>, thickness: f32) -> Self {
        self.rule = color;
        self.rule_thickness = thickness;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub main: Palette,
    pub sidebar: Palette,
    pub uppercase_headings: bool,
    pub level: LevelStyle,
    /// Space above each section.
    pub section_gap: f32,
    /// Prefix trait and hobby names with a bullet.
    pub bullets: bool,
}

impl Theme {
    pub fn new(main: Palette, sidebar: Palette) -> Self {
        Self {
            main,
            sidebar,
            uppercase_headings: false,
            level: LevelStyle::Dots,
            section_gap: 24.0,
            bullets: false,
        }
    }
}

const HEADING_LINE_HEIGHT: f32 = 1.8;
const ENTRY_GAP: f32 = 8.0;
const LIST_GAP: f32 = 4.0;
const DOT_DIAMETER: f32 = 8.0;

/// Shared building blocks over one template context.
pub(crate) struct Parts<'a> {
    cx: &'a TemplateContext<'a>,
    theme: &'a Theme,
}

impl<'a> Parts<'a> {
    pub(crate) fn new(cx: &'a TemplateContext<'a>, theme: &'a Theme) -> Self {
        Self { cx, theme }
    }

    fn palette(&self, flow: Flow) -> &Palette {
        match flow {
            Flow::Main => &self.theme.main,
            Flow::Sidebar => &self.theme.sidebar,
        }
    }

    pub(crate) fn body(&self, flow: Flow) -> TextStyle {
        let style = self.cx.style;
        TextStyle::new(
            &style.font_family,
            style.font_size.body_px(),
            style.line_spacing.multiplier(),
            self.palette(flow).text,
        )
    }

    pub(crate) fn heading_style(&self, flow: Flow) -> TextStyle {
        let style = self.cx.style;
        TextStyle::new(
            &style.font_family,
            style.font_size.heading_px(),
            HEADING_LINE_HEIGHT,
            self.palette(flow).heading,
        )
        .bold()
    }

    pub(crate) fn heading(&self, title: &str, flow: Flow) -> Block {
        let palette = self.palette(flow);
        let title = if self.theme.uppercase_headings {
            title.to_uppercase()
        } else {
            title.to_string()
        };
        let mut children = vec![Block::text(title, self.heading_style(flow))];
        if let Some(color) = palette.rule {
            children.push(Block::Spacer(4.0));
            children.push(Block::Rule {
                thickness: palette.rule_thickness,
                color,
            });
        }
        Block::stack(children).padding(Insets {
            bottom: 8.0,
            ..Insets::ZERO
        })
    }

    /// One chunk per visible entry; the section heading rides on the first.
    pub(crate) fn section_chunks(&self, section: &Section, flow: Flow) -> Vec<Chunk> {
        let title = self.cx.content.labels.section_title(section.kind);
        section
            .visible_entries()
            .enumerate()
            .map(|(i, entry)| {
                let body = self.entry_block(entry, flow);
                let block = if i == 0 {
                    Block::stack(vec![self.heading(title, flow), body]).padding(Insets {
                        top: self.theme.section_gap,
                        ..Insets::ZERO
                    })
                } else {
                    body
                };
                Chunk {
                    flow,
                    key: ChunkKey::Entry {
                        section: section.kind,
                        id: entry.id,
                    },
                    block,
                }
            })
            .collect()
    }

    fn dated(&self, title: &str, period: String, flow: Flow) -> Block {
        let title = Block::text(capitalize(title), self.body(flow).bold());
        if period.is_empty() {
            title
        } else {
            let dates = self
                .body(flow)
                .colored(self.palette(flow).muted)
                .aligned(Align::Right);
            Block::row(title, Block::text(period, dates))
        }
    }

    fn timeline_entry(
        &self,
        title: &str,
        subtitle: &[&str],
        period: String,
        description: &str,
        flow: Flow,
    ) -> Block {
        let palette = self.palette(flow);
        let mut children = vec![self.dated(title, period, flow)];
        let subtitle = join_filled(subtitle, ", ");
        if !subtitle.is_empty() {
            children.push(Block::text(subtitle, self.body(flow).colored(palette.muted)));
        }
        if !description.trim().is_empty() {
            children.push(Block::text(
                description.trim(),
                self.body(flow).colored(palette.body),
            ));
        }
        Block::stack(children).gap(4.0).padding(Insets {
            bottom: ENTRY_GAP,
            ..Insets::ZERO
        })
    }

    fn rated_entry(&self, name: &str, level: Option<Level>, flow: Flow) -> Block {
        let palette = self.palette(flow);
        let body = self.body(flow);
        let name_block = Block::text(capitalize(name.trim()), body.clone());
        let meter = level.filter(|_| self.theme.level != LevelStyle::Hidden);
        let block = match (meter, self.theme.level) {
            (Some(level), LevelStyle::Dots) => {
                let offset = ((body.line_box() - DOT_DIAMETER) / 2.0).max(0.0);
                let dots = Block::stack(vec![Block::Dots {
                    level: level.get(),
                    max: Level::MAX,
                    diameter: DOT_DIAMETER,
                    gap: 4.0,
                    filled: palette.meter_fill,
                    empty: palette.meter_track,
                }])
                .padding(Insets {
                    top: offset,
                    ..Insets::ZERO
                });
                Block::row(name_block, dots)
            }
            (Some(level), LevelStyle::Bar) => Block::stack(vec![
                name_block,
                Block::Bar {
                    fraction: level.get() as f32 / Level::MAX as f32,
                    height: 4.0,
                    fill: palette.meter_fill,
                    track: palette.meter_track,
                },
            ])
            .gap(2.0),
            _ => name_block,
        };
        Block::stack(vec![block]).padding(Insets {
            bottom: LIST_GAP,
            ..Insets::ZERO
        })
    }

    fn named_entry(&self, name: &str, flow: Flow) -> Block {
        let name = capitalize(name.trim());
        let text = if self.theme.bullets {
            format!("\u{2022} {name}")
        } else {
            name.into_owned()
        };
        Block::stack(vec![Block::text(text, self.body(flow))]).padding(Insets {
            bottom: LIST_GAP,
            ..Insets::ZERO
        })
    }

    pub(crate) fn entry_block(&self, entry: &Entry, flow: Flow) -> Block {
        let labels = &self.cx.content.labels;
        match &entry.body {
            EntryBody::Position(p) => {
                let (title, subtitle): (&str, Vec<&str>) = if p.title.trim().is_empty() {
                    (p.employer.as_str(), vec![p.city.as_str()])
                } else {
                    (p.title.as_str(), vec![p.employer.as_str(), p.city.as_str()])
                };
                self.timeline_entry(
                    title,
                    &subtitle,
                    format_period(&p.period, labels, " - "),
                    &p.description,
                    flow,
                )
            }
            EntryBody::Study(s) => {
                let (title, subtitle): (&str, Vec<&str>) = if s.degree.trim().is_empty() {
                    (s.institution.as_str(), vec![s.city.as_str()])
                } else {
                    (s.degree.as_str(), vec![s.institution.as_str(), s.city.as_str()])
                };
                self.timeline_entry(
                    title,
                    &subtitle,
                    format_period(&s.period, labels, " - "),
                    &s.description,
                    flow,
                )
            }
            EntryBody::Credential(c) => self.timeline_entry(
                &c.title,
                &[c.institution.as_str()],
                format_period(&c.period, labels, " - "),
                &c.description,
                flow,
            ),
            EntryBody::Skill(r) | EntryBody::Language(r) => self.rated_entry(&r.name, r.level, flow),
            EntryBody::Trait(n) | EntryBody::Hobby(n) => self.named_entry(&n.name, flow),
        }
    }

    pub(crate) fn full_name(&self) -> String {
        let p = &self.cx.content.profile;
        let first = capitalize(p.first_name.trim());
        let last = capitalize(p.last_name.trim());
        join_filled(&[&*first, &*last], " ")
    }

    pub(crate) fn contact_lines(&self) -> Vec<String> {
        let p = &self.cx.content.profile;
        let place = join_filled(&[p.postal_code.as_str(), p.city.as_str()], " ");
        [
            p.email.trim(),
            p.phone.trim(),
            p.address.trim(),
            place.as_str(),
            p.country.trim(),
            p.website.trim(),
            p.linkedin.trim(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
    }

    /// "Caption: value" lines for the optional personal fields.
    pub(crate) fn detail_lines(&self) -> Vec<String> {
        let p = &self.cx.content.profile;
        let labels = &self.cx.content.labels;
        [
            ("birthDate", &p.birth_date, false),
            ("birthplace", &p.birthplace, false),
            ("nationality", &p.nationality, true),
            ("gender", &p.gender, true),
            ("license", &p.license, true),
            ("maritalStatus", &p.marital_status, true),
        ]
        .into_iter()
        .filter(|(_, value, _)| !value.trim().is_empty())
        .map(|(key, value, translate)| {
            let value = value.trim();
            let shown = if translate {
                labels.display_value(value)
            } else {
                value.into()
            };
            format!("{}: {shown}", labels.get(key))
        })
        .collect()
    }

    pub(crate) fn lines(&self, lines: Vec<String>, style: TextStyle) -> Option<Block> {
        if lines.is_empty() {
            return None;
        }
        Some(
            Block::stack(
                lines
                    .into_iter()
                    .map(|l| Block::text(l, style.clone()))
                    .collect(),
            )
            .gap(2.0),
        )
    }

    pub(crate) fn photo(&self, size: f32, round: bool, align: Align) -> Option<Block> {
        self.cx.photo.map(|asset| Block::Photo {
            asset,
            size,
            round,
            align,
        })
    }

    /// The profile header chunk, or nothing when every part of it is empty.
    pub(crate) fn profile_chunk(&self, flow: Flow, block: Block) -> Option<Chunk> {
        match &block {
            Block::Stack { children, .. } if children.is_empty() => None,
            _ => Some(Chunk {
                flow,
                key: ChunkKey::Profile,
                block,
            }),
        }
    }

    pub(crate) fn name(&self, style: TextStyle, uppercase: bool) -> Option<Block> {
        let name = self.full_name();
        if name.is_empty() {
            return None;
        }
        let name = if uppercase { name.to_uppercase() } else { name };
        Some(Block::text(name, style))
    }

    /// Personal details as their own sidebar chunk, if there are any.
    pub(crate) fn details_chunk(&self, flow: Flow, title: &str) -> Option<Chunk> {
        let lines = self.lines(self.detail_lines(), self.body(flow))?;
        let block = Block::stack(vec![self.heading(title, flow), lines]);
        Some(Chunk {
            flow,
            key: ChunkKey::Details,
            block,
        })
    }
}

pub(crate) fn join_filled(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}
