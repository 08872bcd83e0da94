mod common;

use std::time::Instant;

use common::ms;
use cvpager::model::{SectionKind, StyleSettings, TemplateId};
use cvpager::reflow::{Input, ReflowOutcome, ReflowState, Session};
use cvpager::scale::DisplayMode;
use cvpager::template::ChunkKey;

fn rendered_session(t0: Instant) -> Session {
    let mut session = Session::new(common::config());
    session.submit(Input::Style(common::style(TemplateId::Luna)), t0);
    session.submit(Input::Content(common::sample_content(3)), t0);
    let outcome = session.poll(ms(t0, 50));
    assert!(matches!(outcome, Some(ReflowOutcome::Rendered { .. })));
    session
}

#[test]
fn inputs_within_debounce_coalesce_into_one_run() {
    let t0 = Instant::now();
    let mut session = Session::new(common::config());
    session.submit(Input::Style(common::style(TemplateId::Luna)), t0);
    session.submit(Input::Content(common::sample_content(1)), ms(t0, 10));
    let last = common::sample_content(6);
    session.submit(Input::Content(last.clone()), ms(t0, 20));

    assert_eq!(session.next_deadline(), Some(ms(t0, 70)));
    assert_eq!(session.poll(ms(t0, 65)), None);
    assert_eq!(session.stats().runs_started, 0);

    let outcome = session.poll(ms(t0, 70));
    assert!(matches!(outcome, Some(ReflowOutcome::Rendered { .. })));
    let stats = session.stats();
    assert_eq!((stats.runs_started, stats.runs_rendered), (1, 1));
    assert_eq!(session.state(), ReflowState::Rendered);

    let doc = session.displayed().unwrap();
    for id in common::visible_ids(&last) {
        assert!(
            doc.keys.iter().any(|k| matches!(k, ChunkKey::Entry { id: e, .. } if *e == id)),
            "entry {id} missing from the displayed document"
        );
    }
}

#[test]
fn unchanged_inputs_do_not_schedule() {
    let t0 = Instant::now();
    let mut session = rendered_session(t0);
    let content = session.content().clone();
    let style = session.style().clone();

    session.submit(Input::Content(content), ms(t0, 100));
    session.submit(Input::Style(style), ms(t0, 100));
    session.submit(Input::AddSection(SectionKind::Work), ms(t0, 100));
    session.submit(Input::RemoveSection(SectionKind::Skills), ms(t0, 100));
    assert_eq!(session.next_deadline(), None);
    assert_eq!(session.poll(ms(t0, 500)), None);
}

#[test]
fn template_switch_remeasures() {
    let t0 = Instant::now();
    let mut session = rendered_session(t0);
    assert_eq!(session.surface().passes(), 1);

    session.submit(Input::Style(common::style(TemplateId::Sherlock)), ms(t0, 100));
    assert_eq!(session.next_deadline(), Some(ms(t0, 150)));
    session.settle(ms(t0, 100));

    assert_eq!(session.surface().passes(), 2);
    let doc = session.displayed().unwrap();
    assert_eq!(doc.template, TemplateId::Sherlock);
    assert_eq!(doc.frame.flows.len(), 1);
}

#[test]
fn resize_within_breakpoint_only_rescales() {
    let t0 = Instant::now();
    let mut session = rendered_session(t0);
    let before = session.displayed().cloned();

    session.submit(Input::Resize(780.0), ms(t0, 100));
    assert!((session.scale() - 780.0 / 794.0).abs() < 1e-4);
    assert_eq!(session.next_deadline(), None);

    session.submit(Input::Resize(1600.0), ms(t0, 110));
    assert_eq!(session.scale(), 1.0);
    assert_eq!(session.next_deadline(), None);
    assert_eq!(session.displayed().cloned(), before);
    assert_eq!(session.stats().runs_started, 1);

    session.submit(Input::Resize(600.0), ms(t0, 120));
    assert_eq!(session.next_deadline(), Some(ms(t0, 170)));
}

#[test]
fn display_mode_change_reflows_with_new_padding() {
    let t0 = Instant::now();
    let mut session = rendered_session(t0);
    let full_capacity = session.displayed().unwrap().frame.flows[0].capacity;

    session.submit(Input::DisplayMode(DisplayMode::Thumbnail), ms(t0, 100));
    assert!(session.scale() < 0.5);
    session.settle(ms(t0, 100));

    let doc = session.displayed().unwrap();
    assert!(doc.frame.flows[0].capacity > full_capacity);
    assert_eq!(session.display_mode(), DisplayMode::Thumbnail);
}

#[test]
fn empty_content_renders_one_page() {
    let t0 = Instant::now();
    let mut session = Session::new(common::config());
    session.submit(Input::Style(common::style(TemplateId::Luna)), t0);
    session.settle(t0);

    let doc = session.displayed().unwrap();
    assert_eq!(doc.page_count(), 1);
    assert_eq!(doc.plan.pages().len(), 1);
}

#[test]
fn long_content_spans_pages_and_keeps_every_chunk() {
    let t0 = Instant::now();
    let mut session = Session::new(common::config());
    session.submit(Input::Style(common::style(TemplateId::Sherlock)), t0);
    session.submit(Input::Content(common::sample_content(12)), t0);
    session.settle(t0);

    let doc = session.displayed().unwrap();
    assert!(doc.page_count() > 1, "expected overflow, got {} page(s)", doc.page_count());
    let shown: Vec<usize> = doc.pages.iter().flat_map(|p| p.chunks.clone()).collect();
    assert_eq!(shown, (0..doc.keys.len()).collect::<Vec<_>>());

    let capacity = doc.frame.flows[0].capacity;
    for page in doc.plan.pages() {
        let used: f32 = page.iter().map(|&i| doc.heights[i]).sum();
        assert!(page.len() == 1 || used <= capacity);
    }
}

#[test]
fn section_toggle_reflows() {
    let t0 = Instant::now();
    let mut session = rendered_session(t0);
    session.submit(Input::AddSection(SectionKind::Courses), ms(t0, 100));
    assert!(session.next_deadline().is_some());
    session.settle(ms(t0, 100));
    assert!(
        session
            .content()
            .optional_sections()
            .any(|s| s.kind == SectionKind::Courses)
    );
    assert_eq!(session.stats().runs_rendered, 2);
}

#[test]
fn stale_run_waiting_on_fonts_is_discarded() {
    let t0 = Instant::now();
    let mut session = Session::new(common::config());
    // Not built in: the first run waits for the family to load.
    let style = StyleSettings {
        font_family: "Poppins".to_string(),
        ..StyleSettings::default()
    };
    session.submit(Input::Style(style), t0);
    session.submit(Input::Content(common::sample_content(1)), t0);

    assert_eq!(session.poll(ms(t0, 50)), None);
    assert!(session.is_waiting());
    assert_eq!(session.stats().runs_started, 1);

    let newer = common::sample_content(2);
    session.submit(Input::Content(newer.clone()), ms(t0, 60));

    let ready = session.load_fonts(ms(t0, 70));
    assert_eq!(ready.len(), 1);
    assert_eq!(session.poll(ms(t0, 70)), Some(ReflowOutcome::Discarded));
    assert!(session.displayed().is_none());
    // The edit at 60 ms keeps its own debounce window.
    assert_eq!(session.next_deadline(), Some(ms(t0, 110)));
    assert_eq!(session.poll(ms(t0, 90)), None);

    let outcome = session.poll(ms(t0, 110));
    assert!(matches!(outcome, Some(ReflowOutcome::Rendered { .. })));
    let stats = session.stats();
    assert_eq!(
        (stats.runs_started, stats.runs_rendered, stats.runs_discarded),
        (2, 1, 1)
    );
    let doc = session.displayed().unwrap();
    let expected = common::visible_ids(&newer).len();
    let entries = doc
        .keys
        .iter()
        .filter(|k| matches!(k, ChunkKey::Entry { .. }))
        .count();
    assert_eq!(entries, expected);
}

#[test]
fn font_request_resolves_once() {
    let t0 = Instant::now();
    let mut session = Session::new(common::config());
    session.submit(
        Input::Style(StyleSettings {
            font_family: "Some Missing Family".to_string(),
            ..StyleSettings::default()
        }),
        t0,
    );
    assert_eq!(session.poll(ms(t0, 50)), None);
    assert_eq!(session.load_fonts(ms(t0, 50)).len(), 1);
    assert!(session.load_fonts(ms(t0, 51)).is_empty());
    assert!(matches!(
        session.poll(ms(t0, 51)),
        Some(ReflowOutcome::Rendered { .. })
    ));
    assert!(session.fonts().is_ready("some missing family"));
}

#[test]
fn typing_through_a_font_wait_yields_one_rerun() {
    let t0 = Instant::now();
    let mut session = Session::new(common::config());
    session.submit(
        Input::Style(StyleSettings {
            font_family: "Poppins".to_string(),
            ..StyleSettings::default()
        }),
        t0,
    );
    session.submit(Input::Content(common::sample_content(1)), t0);
    assert_eq!(session.poll(ms(t0, 50)), None);

    // Edits keep arriving while the font loads and after the stale run is dropped.
    session.submit(Input::Content(common::sample_content(2)), ms(t0, 60));
    session.load_fonts(ms(t0, 70));
    assert_eq!(session.poll(ms(t0, 70)), Some(ReflowOutcome::Discarded));
    session.submit(Input::Content(common::sample_content(3)), ms(t0, 80));
    session.submit(Input::Content(common::sample_content(4)), ms(t0, 100));

    assert_eq!(session.next_deadline(), Some(ms(t0, 150)));
    assert_eq!(session.poll(ms(t0, 120)), None);
    assert_eq!(session.stats().runs_started, 1);

    let last = session.settle(ms(t0, 120));
    assert_eq!(last, ms(t0, 150));
    let stats = session.stats();
    assert_eq!(
        (stats.runs_started, stats.runs_rendered, stats.runs_discarded),
        (2, 1, 1)
    );
}

#[test]
fn settle_resolves_fonts_and_finishes() {
    let t0 = Instant::now();
    let mut session = Session::new(common::config());
    session.submit(
        Input::Style(StyleSettings {
            font_family: "Another Missing Family".to_string(),
            ..StyleSettings::default()
        }),
        t0,
    );
    session.submit(Input::Content(common::sample_content(2)), t0);
    let last = session.settle(t0);

    assert_eq!(last, ms(t0, 50));
    assert!(!session.fonts().has_pending());
    assert!(session.fonts().is_ready("another missing family"));
    assert_eq!(session.state(), ReflowState::Rendered);
    assert_eq!(session.next_deadline(), None);
    assert_eq!(session.stats().runs_rendered, 1);
}
