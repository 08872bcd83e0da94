#![allow(dead_code)]

use std::time::{Duration, Instant};

use cvpager::model::{
    Content, DatePoint, EntryBody, EntryId, Level, Named, Period, Position, Profile, Rated,
    SectionKind, StyleSettings, Study, TemplateId,
};
use cvpager::scale::DisplayMode;
use cvpager::template::{Chunk, TemplateContext, template_for};
use cvpager::{Config, FontConfig};

pub const DEBOUNCE: Duration = Duration::from_millis(50);

/// Built-in metrics only, so runs never depend on fonts installed on the machine.
pub fn config() -> Config {
    Config {
        fonts: FontConfig::builtin_only(),
        debounce: DEBOUNCE,
        ..Config::default()
    }
}

/// Style whose font family is ready without a load.
pub fn style(template: TemplateId) -> StyleSettings {
    StyleSettings {
        template,
        font_family: "Helvetica".to_string(),
        ..StyleSettings::default()
    }
}

pub fn ms(base: Instant, millis: u64) -> Instant {
    base + Duration::from_millis(millis)
}

pub fn period(start: &str, end: &str, current: bool) -> Period {
    let point = |s: &str| {
        let mut it = s.splitn(2, ' ');
        DatePoint {
            month: it.next().unwrap_or("").to_string(),
            year: it.next().unwrap_or("").to_string(),
        }
    };
    Period {
        start: point(start),
        end: point(end),
        current,
    }
}

pub fn position(title: &str, employer: &str, paragraphs: usize) -> EntryBody {
    let description = (0..paragraphs)
        .map(|i| {
            format!(
                "Paragraph {i}: led the migration of the billing platform, coordinated four teams \
                 and reduced the monthly close from nine days to three."
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    EntryBody::Position(Position {
        title: title.to_string(),
        employer: employer.to_string(),
        city: "Utrecht".to_string(),
        period: period("jan 2019", "mar 2022", false),
        description,
    })
}

pub fn study(degree: &str) -> EntryBody {
    EntryBody::Study(Study {
        degree: degree.to_string(),
        institution: "Delft University of Technology".to_string(),
        city: "Delft".to_string(),
        period: period("sep 2012", "jul 2016", false),
        description: String::new(),
    })
}

pub fn skill(name: &str, level: u8) -> EntryBody {
    EntryBody::Skill(Rated {
        name: name.to_string(),
        level: Some(Level::new(level)),
    })
}

pub fn language(name: &str, level: u8) -> EntryBody {
    EntryBody::Language(Rated {
        name: name.to_string(),
        level: Some(Level::new(level)),
    })
}

pub fn hobby(name: &str) -> EntryBody {
    EntryBody::Hobby(Named {
        name: name.to_string(),
    })
}

pub fn profile() -> Profile {
    Profile {
        first_name: "sanne".to_string(),
        last_name: "de Vries".to_string(),
        email: "sanne@example.org".to_string(),
        phone: "+31 6 1234 5678".to_string(),
        city: "Utrecht".to_string(),
        nationality: "Dutch".to_string(),
        ..Profile::default()
    }
}

/// A CV with `jobs` work entries of a few paragraphs each plus short sections.
pub fn sample_content(jobs: usize) -> Content {
    let mut content = Content::new(profile());
    for i in 0..jobs {
        content
            .push_entry(
                SectionKind::Work,
                position(&format!("Engineer {i}"), "Acme", 3),
            )
            .expect("work entry");
    }
    content
        .push_entry(SectionKind::Education, study("MSc Computer Science"))
        .expect("education entry");
    for (name, level) in [("Rust", 5), ("SQL", 4), ("Kubernetes", 3)] {
        content
            .push_entry(SectionKind::Skills, skill(name, level))
            .expect("skill entry");
    }
    for (name, level) in [("Dutch", 5), ("English", 4)] {
        content
            .push_entry(SectionKind::Languages, language(name, level))
            .expect("language entry");
    }
    content
        .push_entry(SectionKind::Hobbies, hobby("Cycling"))
        .expect("hobby entry");
    content
}

/// Ids of every entry that would render, in storage order.
pub fn visible_ids(content: &Content) -> Vec<EntryId> {
    content
        .sections()
        .iter()
        .flat_map(|s| s.visible_entries().map(|e| e.id))
        .collect()
}

pub fn chunks_for(content: &Content, style: &StyleSettings, mode: DisplayMode) -> Vec<Chunk> {
    let cx = TemplateContext {
        content,
        style,
        mode,
        photo: None,
    };
    template_for(style.template).chunks(&cx)
}
