//! Integration tests for alignment guides.
//!
//! Covers explicit overrides, custom identifiers that bubble through nested
//! containers, text baselines, and union-of-frames composition.

mod common;

use common::{approx, rect, run};
use tessera::{
    Alignment, AlignmentId, EdgeInsets, HorizontalAlignment, MonospaceMetrics, Size, VerticalAlignment, ViewTree,
};

#[test]
fn test_custom_alignment_lines_up_nested_fields() {
    let mut tree = ViewTree::new();
    let divider = tree.register_horizontal_alignment("divider", |size| size.width / 2.0);

    let short_label = tree.fixed(40.0, 20.0);
    let first_field = tree.fixed(100.0, 20.0);
    tree.alignment_guide(first_field, divider, |_| 0.0);
    let first_row = tree.hstack([short_label, first_field]);

    let long_label = tree.fixed(80.0, 20.0);
    let second_field = tree.fixed(100.0, 20.0);
    tree.alignment_guide(second_field, divider, |_| 0.0);
    let second_row = tree.hstack([long_label, second_field]);

    let form = tree.vstack_with(divider, Some(0.0), [first_row, second_row]);
    let placements = run(&tree, form, Size::new(400.0, 300.0), &MonospaceMetrics::new());

    let first = rect(&placements, first_field);
    let second = rect(&placements, second_field);
    assert_eq!(first.x, second.x);
    assert_eq!(first.x, 88.0);
    // Union of both rows once aligned: 88 before the divider, 100 after.
    assert_eq!(rect(&placements, form).width, 188.0);
}

#[test]
fn test_custom_default_applies_without_overrides() {
    let mut tree = ViewTree::new();
    let quarter = tree.register_horizontal_alignment("quarter", |size| size.width / 4.0);
    let wide = tree.fixed(80.0, 10.0);
    let narrow = tree.fixed(40.0, 10.0);
    let column = tree.vstack_with(quarter, Some(0.0), [wide, narrow]);

    let placements = run(&tree, column, Size::new(300.0, 300.0), &MonospaceMetrics::new());
    // Quarter marks at 20 and 10 line up: narrow starts 10 in.
    assert_eq!(rect(&placements, wide).x, 0.0);
    assert_eq!(rect(&placements, narrow).x, 10.0);
}

#[test]
fn test_first_baselines_line_up_through_padding() {
    let mut tree = ViewTree::new();
    let headline = tree.text("Title");
    let padded = tree.padding(headline, EdgeInsets::new(10.0, 0.0, 0.0, 0.0));
    let caption = tree.text("caption");
    let row = tree.hstack_with(VerticalAlignment::FIRST_TEXT_BASELINE, Some(0.0), [padded, caption]);

    let placements = run(&tree, row, Size::new(400.0, 100.0), &MonospaceMetrics::new());
    let headline_rect = rect(&placements, headline);
    let caption_rect = rect(&placements, caption);
    assert!(approx(headline_rect.y, caption_rect.y));
    assert!(approx(caption_rect.y, 10.0));
}

#[test]
fn test_badge_centered_on_corner() {
    let mut tree = ViewTree::new();
    let circle = tree.circle();
    let avatar = tree.frame(circle, Some(40.0), Some(40.0), Alignment::CENTER);
    let badge = tree.text("3");
    tree.alignment_guide(badge, HorizontalAlignment::TRAILING, |size| size.width / 2.0);
    tree.alignment_guide(badge, VerticalAlignment::TOP, |size| size.height / 2.0);
    let decorated = tree.overlay(avatar, badge, Alignment::TOP_TRAILING);

    let placements = run(&tree, decorated, Size::new(200.0, 200.0), &MonospaceMetrics::new());
    assert_eq!(rect(&placements, decorated).size(), Size::new(40.0, 40.0));

    let badge_rect = rect(&placements, badge);
    assert!(approx(badge_rect.x + badge_rect.width / 2.0, 40.0));
    assert!(approx(badge_rect.y + badge_rect.height / 2.0, 0.0));
}

#[test]
fn test_zstack_union_with_override() {
    let mut tree = ViewTree::new();
    let card = tree.fixed(100.0, 60.0);
    let tag = tree.fixed(30.0, 20.0);
    tree.alignment_guide(tag, AlignmentId::TOP, |size| size.height);
    let stacked = tree.zstack_aligned(Alignment::TOP_LEADING, [card, tag]);

    let placements = run(&tree, stacked, Size::new(300.0, 300.0), &MonospaceMetrics::new());
    // The tag sits entirely above the card, growing the union upward.
    assert_eq!(rect(&placements, stacked).size(), Size::new(100.0, 80.0));
    assert_eq!(rect(&placements, tag).y, 0.0);
    assert_eq!(rect(&placements, card).y, 20.0);
}

#[test]
fn test_offset_moves_content_not_layout() {
    let mut tree = ViewTree::new();
    let a = tree.fixed(20.0, 20.0);
    let shifted = tree.offset(a, 5.0, -3.0);
    let b = tree.fixed(20.0, 20.0);
    let row = tree.hstack_with(VerticalAlignment::TOP, Some(0.0), [shifted, b]);

    let placements = run(&tree, row, Size::new(100.0, 100.0), &MonospaceMetrics::new());
    assert_eq!(rect(&placements, shifted).x, 0.0);
    assert_eq!(rect(&placements, a).x, 5.0);
    assert_eq!(rect(&placements, a).y, -3.0);
    assert_eq!(rect(&placements, b).x, 20.0);
    assert_eq!(rect(&placements, row).width, 40.0);
}
