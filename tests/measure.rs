mod common;

use cvpager::FontConfig;
use cvpager::fonts::FontLibrary;
use cvpager::measure::LayoutSurface;
use cvpager::model::{Content, FontSizeTier, LineSpacing, StyleSettings, TemplateId};
use cvpager::scale::DisplayMode;
use cvpager::template::{PageFrame, TemplateContext, template_for};

fn frame(content: &Content, style: &StyleSettings) -> PageFrame {
    let cx = TemplateContext {
        content,
        style,
        mode: DisplayMode::Full,
        photo: None,
    };
    template_for(style.template).frame(&cx)
}

fn total_height(content: &Content, style: &StyleSettings) -> f32 {
    let fonts = FontLibrary::new(FontConfig::builtin_only());
    let chunks = common::chunks_for(content, style, DisplayMode::Full);
    LayoutSurface::new()
        .measure(&chunks, &frame(content, style), &fonts)
        .iter()
        .sum()
}

#[test]
fn measurement_is_deterministic() {
    let fonts = FontLibrary::new(FontConfig::builtin_only());
    let content = common::sample_content(4);
    for template in TemplateId::ALL {
        let style = common::style(template);
        let chunks = common::chunks_for(&content, &style, DisplayMode::Full);
        let frame = frame(&content, &style);
        let mut surface = LayoutSurface::new();
        let first = surface.measure(&chunks, &frame, &fonts);
        let second = surface.measure(&chunks, &frame, &fonts);
        assert_eq!(first, second, "{template}");
        assert_eq!(first.len(), chunks.len(), "{template}");
        assert!(first.iter().all(|h| *h > 0.0), "{template}: {first:?}");
        assert_eq!(surface.passes(), 2);
    }
}

#[test]
fn chunk_in_unknown_flow_yields_no_heights() {
    let fonts = FontLibrary::new(FontConfig::builtin_only());
    let content = common::sample_content(1);
    let luna = common::style(TemplateId::Luna);
    let chunks = common::chunks_for(&content, &luna, DisplayMode::Full);
    // Luna puts chunks in a sidebar; the single-column frame has none.
    let single = frame(&content, &common::style(TemplateId::Sherlock));
    assert!(LayoutSurface::new().measure(&chunks, &single, &fonts).is_empty());
}

#[test]
fn larger_type_measures_taller() {
    let content = common::sample_content(3);
    let small = StyleSettings {
        font_size: FontSizeTier::Xs,
        line_spacing: LineSpacing::Single,
        ..common::style(TemplateId::Gatsby)
    };
    let large = StyleSettings {
        font_size: FontSizeTier::Xl,
        line_spacing: LineSpacing::Double,
        ..common::style(TemplateId::Gatsby)
    };
    assert!(total_height(&content, &large) > total_height(&content, &small));
}

#[test]
fn longer_descriptions_measure_taller() {
    let short = common::sample_content(1);
    let mut long = short.clone();
    if let Some(section) = long.section_mut(cvpager::model::SectionKind::Work)
        && let Some(entry) = section.entries.first_mut()
        && let cvpager::model::EntryBody::Position(p) = &mut entry.body
    {
        p.description.push_str(&"\nOne more paragraph of detail.".repeat(5));
    }
    let style = common::style(TemplateId::Sherlock);
    assert!(total_height(&long, &style) > total_height(&short, &style));
}

#[test]
fn heights_are_kept_to_hundredths() {
    let fonts = FontLibrary::new(FontConfig::builtin_only());
    let content = common::sample_content(4);
    for template in TemplateId::ALL {
        let style = StyleSettings {
            line_spacing: LineSpacing::Comfortable,
            ..common::style(template)
        };
        let chunks = common::chunks_for(&content, &style, DisplayMode::Full);
        let heights = LayoutSurface::new().measure(&chunks, &frame(&content, &style), &fonts);
        for h in heights {
            assert_eq!((h * 100.0).round() / 100.0, h, "{template}: {h}");
        }
    }
}
