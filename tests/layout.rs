use cvpager::FontConfig;
use cvpager::fonts::FontLibrary;
use cvpager::layout::{Block, DrawOp, Insets, TextStyle, layout};

const INK: [u8; 3] = [20, 20, 20];

fn fonts() -> FontLibrary {
    FontLibrary::new(FontConfig::builtin_only())
}

fn style() -> TextStyle {
    TextStyle::new("Helvetica", 13.0, 1.25, INK)
}

fn texts(ops: &[DrawOp]) -> Vec<(String, f32)> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, baseline, .. } => Some((text.clone(), *baseline)),
            _ => None,
        })
        .collect()
}

#[test]
fn single_line_uses_one_line_box() {
    let mut ops = Vec::new();
    let h = layout(&Block::text("Short", style()), &fonts(), 0.0, 0.0, 500.0, &mut ops);
    assert!((h - style().line_box()).abs() < 1e-4);
    assert_eq!(texts(&ops).len(), 1);
}

#[test]
fn narrow_width_wraps_within_bounds() {
    let fonts = fonts();
    let text = "the quick brown fox jumps over the lazy dog ".repeat(6);
    let mut ops = Vec::new();
    let width = 160.0;
    let h = layout(&Block::text(text.trim(), style()), &fonts, 10.0, 0.0, width, &mut ops);
    let lines = texts(&ops);
    assert!(lines.len() > 3);
    assert!((h - lines.len() as f32 * style().line_box()).abs() < 1e-3);

    let face = fonts.face("Helvetica", false, false);
    for (line, _) in &lines {
        assert!(face.text_width(line, 13.0) <= width + 0.01, "{line:?} overflows");
    }
    let baselines: Vec<f32> = lines.iter().map(|(_, b)| *b).collect();
    assert!(baselines.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn hard_breaks_keep_empty_lines() {
    let mut ops = Vec::new();
    let h = layout(&Block::text("one\n\nthree", style()), &fonts(), 0.0, 0.0, 500.0, &mut ops);
    assert!((h - 3.0 * style().line_box()).abs() < 1e-4);
    assert_eq!(texts(&ops).len(), 2);
}

#[test]
fn stack_sums_children_gaps_and_padding() {
    let block = Block::stack(vec![Block::Spacer(10.0), Block::Spacer(20.0)])
        .gap(5.0)
        .padding(Insets::all(4.0))
        .background([1, 2, 3]);
    let mut ops = Vec::new();
    let h = layout(&block, &fonts(), 0.0, 100.0, 300.0, &mut ops);
    assert_eq!(h, 43.0);
    assert_eq!(
        ops,
        vec![DrawOp::Rect {
            x: 0.0,
            y: 100.0,
            width: 300.0,
            height: 43.0,
            color: [1, 2, 3],
        }]
    );
}

#[test]
fn row_takes_taller_side() {
    let block = Block::row(Block::Spacer(12.0), Block::text("2019", style()));
    let mut ops = Vec::new();
    let h = layout(&block, &fonts(), 0.0, 0.0, 400.0, &mut ops);
    assert!((h - style().line_box().max(12.0)).abs() < 1e-4);
}

#[test]
fn dots_fill_up_to_level() {
    let block = Block::Dots {
        level: 2,
        max: 5,
        diameter: 8.0,
        gap: 4.0,
        filled: [0, 0, 0],
        empty: [200, 200, 200],
    };
    let mut ops = Vec::new();
    assert_eq!(layout(&block, &fonts(), 0.0, 0.0, 200.0, &mut ops), 8.0);
    let filled = ops
        .iter()
        .filter(|op| matches!(op, DrawOp::Circle { color: [0, 0, 0], .. }))
        .count();
    assert_eq!((ops.len(), filled), (5, 2));
}
