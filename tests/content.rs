mod common;

use std::path::Path;

use cvpager::Error;
use cvpager::content::{self, Labels, format_date, format_period, month_index, parse_hex_color};
use cvpager::model::{
    DatePoint, Entry, EntryBody, FontSizeTier, Level, LineSpacing, SectionKind, TemplateId,
};

const DOCUMENT: &str = r##"{
  "profile": {
    "firstName": "sanne",
    "lastName": "de Vries",
    "email": "sanne@example.org",
    "nationality": "Dutch",
    "photo": "me.png"
  },
  "extra_sections": ["certifications", "courses"],
  "sections": {
    "work": [
      { "title": "Engineer", "employer": "Acme", "start": { "month": "maart", "year": "2019" }, "current": true },
      { "functie": "Intern", "bedrijf": "Initech", "beschrijving": "Support tooling" }
    ],
    "skills": [
      { "name": "Rust", "level": 5 },
      { "name": "SQL", "level": "goed" },
      { "naam": "Go", "niveau": 9 }
    ],
    "hobbies": ["Cycling", { "name": "Chess" }],
    "courses": [{ "title": "Distributed systems", "institution": "Coursera" }]
  },
  "settings": {
    "template": "Orion",
    "font": "Inter",
    "font_size": "l",
    "line_spacing": 1.5,
    "accent": "#10b981"
  },
  "labels": { "work": "Werkervaring" }
}"##;

#[test]
fn parses_full_document() {
    let doc = content::parse_bytes(DOCUMENT.as_bytes(), Some(Path::new("/cv"))).unwrap();
    let content = &doc.content;

    assert_eq!(content.profile.first_name, "sanne");
    assert_eq!(content.profile.photo.as_deref(), Some(Path::new("/cv/me.png")));

    let optional: Vec<SectionKind> = content.optional_sections().map(|s| s.kind).collect();
    assert_eq!(optional, vec![SectionKind::Certifications, SectionKind::Courses]);

    let work = content.section(SectionKind::Work).unwrap();
    assert_eq!(work.entries.len(), 2);
    match &work.entries[1].body {
        EntryBody::Position(p) => {
            assert_eq!(p.title, "Intern");
            assert_eq!(p.employer, "Initech");
        }
        other => panic!("unexpected body {other:?}"),
    }

    let levels: Vec<Option<u8>> = content
        .section(SectionKind::Skills)
        .unwrap()
        .entries
        .iter()
        .map(|e| match &e.body {
            EntryBody::Skill(r) => r.level.map(Level::get),
            other => panic!("unexpected body {other:?}"),
        })
        .collect();
    assert_eq!(levels, vec![Some(5), Some(3), Some(5)]);

    assert_eq!(content.section(SectionKind::Hobbies).unwrap().entries.len(), 2);
    assert_eq!(content.labels.section_title(SectionKind::Work), "Werkervaring");
    assert_eq!(content.labels.section_title(SectionKind::Skills), "Skills");

    let style = &doc.style;
    assert_eq!(style.template, TemplateId::Orion);
    assert_eq!(style.font_family, "Inter");
    assert_eq!(style.font_size, FontSizeTier::L);
    assert_eq!(style.line_spacing, LineSpacing::Relaxed);
    assert_eq!(style.accent, [0x10, 0xb9, 0x81]);
}

#[test]
fn entry_ids_are_unique_when_absent() {
    let doc = content::parse_bytes(DOCUMENT.as_bytes(), None).unwrap();
    let ids = common::visible_ids(&doc.content);
    let mut deduped = ids.clone();
    deduped.sort_by_key(|id| *id.as_uuid());
    deduped.dedup();
    assert_eq!(ids.len(), deduped.len());
}

#[test]
fn invalid_settings_fall_back_to_defaults() {
    let json = r#"{ "settings": { "template": "nope", "accent": "blue", "font_size": "huge" } }"#;
    let doc = content::parse_bytes(json.as_bytes(), None).unwrap();
    assert_eq!(doc.style.template, TemplateId::Luna);
    assert_eq!(doc.style.accent, cvpager::model::DEFAULT_ACCENT);
    assert_eq!(doc.style.font_size, FontSizeTier::M);
}

#[test]
fn malformed_and_invalid_documents_are_rejected() {
    assert!(matches!(
        content::parse_bytes(b"{ not json", None),
        Err(Error::Json(_))
    ));
    assert!(matches!(
        content::parse_bytes(br#"{ "sections": { "pets": [] } }"#, None),
        Err(Error::InvalidContent(_))
    ));
    assert!(matches!(
        content::load(Path::new("/definitely/not/here.json")),
        Err(Error::Io(_))
    ));
}

#[test]
fn sections_reject_foreign_entries() {
    let mut content = common::sample_content(0);
    let err = content.push_entry(SectionKind::Skills, common::hobby("Chess"));
    assert!(matches!(err, Err(Error::InvalidContent(_))));
    // Optional sections must be enabled first.
    let err = content.push_entry(
        SectionKind::Traits,
        EntryBody::Trait(cvpager::model::Named {
            name: "Curious".into(),
        }),
    );
    assert!(matches!(err, Err(Error::InvalidContent(_))));
}

#[test]
fn entry_editing_keeps_identity() {
    let mut content = common::sample_content(3);
    let ids: Vec<_> = content
        .section(SectionKind::Work)
        .unwrap()
        .entries
        .iter()
        .map(|e| e.id)
        .collect();
    assert!(content.move_entry(ids[2], 0));
    let moved: Vec<_> = content
        .section(SectionKind::Work)
        .unwrap()
        .entries
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(moved, vec![ids[2], ids[0], ids[1]]);

    assert!(content.remove_entry(ids[1]).is_some());
    assert!(content.entry(ids[1]).is_none());
    assert!(content.entry(ids[0]).is_some());
}

#[test]
fn inserted_entries_keep_their_id() {
    let mut content = common::sample_content(1);
    let entry = Entry::new(common::skill("Rust", 4));
    let id = entry.id;
    assert_eq!(content.insert_entry(SectionKind::Skills, entry.clone()).unwrap(), id);
    assert!(content.entry(id).is_some());

    let err = content.insert_entry(SectionKind::Skills, entry);
    assert!(matches!(err, Err(Error::InvalidContent(_))));

    let stray = Entry::new(common::hobby("Chess"));
    let stray_id = stray.id;
    let err = content.insert_entry(SectionKind::Languages, stray);
    assert!(matches!(err, Err(Error::InvalidContent(_))));
    assert!(content.entry(stray_id).is_none());

    let skills = content.section(SectionKind::Skills).unwrap();
    assert_eq!(skills.entries.iter().filter(|e| e.id == id).count(), 1);
}

#[test]
fn entries_are_edited_in_place() {
    let mut content = common::sample_content(2);
    let work = &content.section(SectionKind::Work).unwrap().entries;
    let (id, before) = (work[0].id, work.len());

    match &mut content.entry_mut(id).unwrap().body {
        EntryBody::Position(p) => p.title = "Staff engineer".into(),
        other => panic!("unexpected body {other:?}"),
    }
    match &content.entry(id).unwrap().body {
        EntryBody::Position(p) => assert_eq!(p.title, "Staff engineer"),
        other => panic!("unexpected body {other:?}"),
    }
    assert_eq!(content.section(SectionKind::Work).unwrap().entries.len(), before);

    let missing = Entry::new(common::hobby("Chess")).id;
    assert!(content.entry_mut(missing).is_none());
}

#[test]
fn fixed_sections_cannot_be_toggled() {
    let mut content = common::sample_content(0);
    assert!(!content.remove_section(SectionKind::Work));
    assert!(!content.add_section(SectionKind::Work));
    assert!(content.add_section(SectionKind::Traits));
    assert!(!content.add_section(SectionKind::Traits));
    assert!(content.remove_section(SectionKind::Traits));
    assert!(content.section(SectionKind::Traits).is_none());
}

#[test]
fn month_names() {
    assert_eq!(month_index("January"), Some(0));
    assert_eq!(month_index("sep"), Some(8));
    assert_eq!(month_index("mei"), Some(4));
    assert_eq!(month_index("oktober"), Some(9));
    assert_eq!(month_index("12"), Some(11));
    assert_eq!(month_index("13"), None);
    assert_eq!(month_index(""), None);
}

#[test]
fn dates_and_periods() {
    let labels = Labels::default();
    let point = |m: &str, y: &str| DatePoint {
        month: m.into(),
        year: y.into(),
    };
    assert_eq!(format_date(&point("maart", "2021"), &labels), "Mar 2021");
    assert_eq!(format_date(&point("lente", "2021"), &labels), "Lente 2021");
    assert_eq!(format_date(&point("", "2021"), &labels), "");
    assert_eq!(format_date(&point("mar", ""), &labels), "");

    let ongoing = common::period("jan 2019", "", true);
    assert_eq!(format_period(&ongoing, &labels, " - "), "Jan 2019 - Present");
    let closed = common::period("jan 2019", "mar 2022", false);
    assert_eq!(format_period(&closed, &labels, " - "), "Jan 2019 - Mar 2022");
    let open = common::period("jan 2019", "", false);
    assert_eq!(format_period(&open, &labels, " - "), "Jan 2019");
}

#[test]
fn level_words_and_numbers() {
    assert_eq!(Level::parse("Beginner").get(), 1);
    assert_eq!(Level::parse("very good").get(), 4);
    assert_eq!(Level::parse("Moedertaal").get(), 5);
    assert_eq!(Level::parse("vloeiend").get(), 4);
    assert_eq!(Level::parse("3").get(), 3);
    assert_eq!(Level::parse("42").get(), 5);
    assert_eq!(Level::parse("whatever").get(), 0);
    assert_eq!(Level::new(9).get(), Level::MAX);
}

#[test]
fn hex_colors() {
    assert_eq!(parse_hex_color("#3B82F6"), Some([0x3B, 0x82, 0xF6]));
    assert_eq!(parse_hex_color("10b981"), Some([0x10, 0xb9, 0x81]));
    assert_eq!(parse_hex_color("#fff"), None);
    assert_eq!(parse_hex_color("#gggggg"), None);
}

#[test]
fn label_display_values() {
    let mut labels = Labels::default();
    assert_eq!(labels.display_value("married"), "Married");
    assert_eq!(labels.display_value("dutch"), "Dutch");
    labels.set("married", "Gehuwd");
    assert_eq!(labels.display_value("married"), "Gehuwd");
}
