use cvpager::scale::{Breakpoint, DEFAULT_THUMBNAIL_SCALE, DisplayMode, ScaleController};

const CAP: f32 = 0.34;

#[test]
fn full_mode_never_upscales() {
    assert_eq!(ScaleController::compute(DisplayMode::Full, 1600.0, CAP), 1.0);
    assert_eq!(ScaleController::compute(DisplayMode::Full, 794.0, CAP), 1.0);
    let half = ScaleController::compute(DisplayMode::Full, 397.0, CAP);
    assert!((half - 0.5).abs() < 1e-6);
}

#[test]
fn thumbnail_mode_is_capped() {
    assert_eq!(ScaleController::compute(DisplayMode::Thumbnail, 1600.0, CAP), CAP);
    let small = ScaleController::compute(DisplayMode::Thumbnail, 159.0, CAP);
    assert!((small - 159.0 / 794.0).abs() < 1e-6);
}

#[test]
fn initial_scale_per_mode() {
    assert_eq!(ScaleController::new(DisplayMode::Full, CAP).scale(), 1.0);
    assert_eq!(
        ScaleController::new(DisplayMode::Thumbnail, CAP).scale(),
        DEFAULT_THUMBNAIL_SCALE
    );
    assert_eq!(ScaleController::new(DisplayMode::Thumbnail, 0.2).scale(), 0.2);
}

#[test]
fn invalid_widths_are_ignored() {
    let mut scale = ScaleController::new(DisplayMode::Full, CAP);
    assert!(scale.set_width(500.0));
    for width in [0.0, -10.0, f32::NAN, f32::INFINITY] {
        assert!(!scale.set_width(width));
    }
    assert_eq!(scale.width(), Some(500.0));
    assert!((scale.scale() - 500.0 / 794.0).abs() < 1e-6);
}

#[test]
fn tiny_changes_do_not_report() {
    let mut scale = ScaleController::new(DisplayMode::Full, CAP);
    assert!(scale.set_width(600.0));
    assert!(!scale.set_width(600.2));
    assert!(scale.set_width(650.0));
}

#[test]
fn mode_switch_recomputes_from_width() {
    let mut scale = ScaleController::new(DisplayMode::Full, CAP);
    scale.set_width(700.0);
    assert!(scale.set_mode(DisplayMode::Thumbnail));
    assert_eq!(scale.scale(), CAP);
    assert!(!scale.set_mode(DisplayMode::Thumbnail));
    assert!(scale.set_mode(DisplayMode::Full));
    assert!((scale.scale() - 700.0 / 794.0).abs() < 1e-6);
}

#[test]
fn breakpoints() {
    assert_eq!(Breakpoint::for_width(767.9), Breakpoint::Narrow);
    assert_eq!(Breakpoint::for_width(768.0), Breakpoint::Wide);
    let mut scale = ScaleController::new(DisplayMode::Full, CAP);
    assert_eq!(scale.breakpoint(), None);
    scale.set_width(320.0);
    assert_eq!(scale.breakpoint(), Some(Breakpoint::Narrow));
}
