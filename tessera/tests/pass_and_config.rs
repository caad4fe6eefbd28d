//! Integration tests for pass validation, configuration, and the placement
//! tree's identity and lookup surface.

mod common;

use common::{init_tracing, rect, run};
use tessera::{layout, Engine, LayoutConfig, LayoutError, MonospaceMetrics, NodeId, Size, ViewTree};

#[test]
fn test_cycle_is_reported_not_followed() {
    init_tracing();
    let mut tree = ViewTree::new();
    let leaf = tree.fill();
    let inner = tree.vstack([leaf]);
    let outer = tree.hstack([inner]);
    assert!(tree.set_children(inner, vec![leaf, outer]));

    let err = layout(&tree, outer, Size::new(100.0, 100.0), &MonospaceMetrics::new(), &LayoutConfig::default())
        .expect_err("cyclic tree must be rejected");
    assert!(matches!(err, LayoutError::Cycle { .. }));
    assert!(err.to_string().contains("cycle"));
}

#[test]
fn test_depth_guard_uses_config() {
    init_tracing();
    let mut tree = ViewTree::new();
    let mut node = tree.fill();
    for _ in 0..6 {
        node = tree.padding_default(node);
    }

    let config = LayoutConfig::from_json_str(r#"{ "max_depth": 4 }"#).expect("valid config");
    let engine = Engine::with_config(MonospaceMetrics::new(), config);
    match engine.layout(&tree, node, Size::new(100.0, 100.0)) {
        Err(LayoutError::DepthExceeded { limit, .. }) => assert_eq!(limit, 4),
        other => panic!("expected depth error, got {other:?}"),
    }

    let roomy = Engine::new(MonospaceMetrics::new());
    assert_eq!(roomy.layout(&tree, node, Size::new(100.0, 100.0)).map(|p| p.len()).ok(), Some(7));
}

/// Alternating hstack/vstack nesting, each level `[inner, fill]`, whose
/// deepest leaf sits at `depth`.
fn nested_stacks(tree: &mut ViewTree, depth: usize) -> NodeId {
    let mut node = tree.fill();
    for level in 1..depth {
        let fill = tree.fill();
        node = if level % 2 == 0 { tree.vstack([node, fill]) } else { tree.hstack([node, fill]) };
    }
    node
}

#[test]
fn test_default_depth_limit_lays_out_on_small_stack() {
    init_tracing();
    let limit = LayoutConfig::default().max_depth;

    let worker = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || {
            let mut tree = ViewTree::new();
            let root = nested_stacks(&mut tree, limit);
            let placements = layout(&tree, root, Size::new(4000.0, 4000.0), &MonospaceMetrics::new(), &LayoutConfig::default())
                .expect("tree at the depth limit is accepted");
            let root_rect = placements.root().map(|p| p.rect).expect("root placed");

            let mut deeper = ViewTree::new();
            let too_deep = nested_stacks(&mut deeper, limit + 1);
            let rejected = layout(&deeper, too_deep, Size::new(4000.0, 4000.0), &MonospaceMetrics::new(), &LayoutConfig::default());
            (placements.len(), root_rect.size(), rejected.err())
        })
        .expect("spawn layout thread");

    let (placed, root_size, rejected) = worker.join().expect("layout thread finished without overflowing");
    assert_eq!(placed, 2 * limit - 1);
    assert_eq!(root_size, Size::new(4000.0, 4000.0));
    assert!(matches!(rejected, Some(LayoutError::DepthExceeded { limit: l, .. }) if l == limit));
}

#[test]
fn test_unknown_root() {
    let tree = ViewTree::new();
    let engine = Engine::new(MonospaceMetrics::new());
    assert!(matches!(
        engine.layout(&tree, NodeId::from_index(0), Size::new(1.0, 1.0)),
        Err(LayoutError::UnknownNode(_))
    ));
}

#[test]
fn test_config_changes_defaults() {
    let config = LayoutConfig::from_json_str(r#"{ "fill_fallback": 24.0, "default_spacing": 0.0 }"#)
        .expect("valid config");
    let mut tree = ViewTree::new();
    let a = tree.fill();
    let b = tree.fill();
    let row = tree.hstack([a, b]);

    let engine = Engine::with_config(MonospaceMetrics::new(), config);
    let handle = engine.handle(&tree, row).expect("valid");
    let size = tessera::Sizable::size_for(&handle, tessera::ProposedSize::UNSPECIFIED);
    assert_eq!(size, Size::new(48.0, 24.0));
}

#[test]
fn test_config_parse_error() {
    let err = LayoutConfig::from_json_str(r#"{ "max_depth": "deep" }"#).expect_err("wrong type");
    assert!(matches!(err, LayoutError::Config(_)));
}

#[test]
fn test_positional_keys_and_explicit_ids() {
    let mut tree = ViewTree::new();
    let title = tree.text("Inbox");
    let count = tree.text("12");
    let header = tree.hstack([title, count]);
    let body = tree.fill();
    let screen = tree.vstack([header, body]);
    tree.set_explicit_id(count, "unread");

    let placements = run(&tree, screen, Size::new(320.0, 480.0), &MonospaceMetrics::new());
    assert_eq!(placements.len(), 5);

    let by_id = placements.by_explicit_id("unread").expect("explicit id");
    assert_eq!(by_id.node, count);
    assert_eq!(by_id.key.path, vec![0, 1]);

    let by_path = placements.by_path(&[1]).expect("body");
    assert_eq!(by_path.node, body);
    assert_eq!(by_path.key.explicit, None);

    let root = placements.root().expect("root");
    assert_eq!(root.children.len(), 2);
    assert_eq!(placements.children_of(0).map(|p| p.node).collect::<Vec<_>>(), vec![header, body]);
}

#[test]
fn test_shared_subtree_is_placed_per_occurrence() {
    let mut tree = ViewTree::new();
    let chip = tree.fixed(30.0, 10.0);
    let row = tree.hstack([chip, chip, chip]);

    let placements = run(&tree, row, Size::new(200.0, 50.0), &MonospaceMetrics::new());
    let xs: Vec<f64> = placements.find_all(chip).map(|p| p.rect.x).collect();
    assert_eq!(xs, vec![0.0, 38.0, 76.0]);
    assert_eq!(rect(&placements, chip).x, 0.0);
}

#[test]
fn test_identical_passes_are_identical() {
    let mut tree = ViewTree::new();
    let text = tree.text("The quick brown fox jumps over the lazy dog");
    let spacer = tree.spacer();
    let icon = tree.image("star");
    let row = tree.hstack([text, spacer, icon]);
    let metrics = MonospaceMetrics::new();

    let first = run(&tree, row, Size::new(180.0, 60.0), &metrics);
    let second = run(&tree, row, Size::new(180.0, 60.0), &metrics);
    let first_json = serde_json::to_value(&first).expect("serializable");
    let second_json = serde_json::to_value(&second).expect("serializable");
    assert_eq!(first_json, second_json);
    assert_eq!(first_json["nodes"][0]["kind"], "HStack");
}

#[test]
fn test_view_that_fits_places_only_chosen_child() {
    let mut tree = ViewTree::new();
    let long = tree.text("A rather long status message");
    let short = tree.text("Short");
    let fits = tree.view_that_fits([long, short]);

    let placements = run(&tree, fits, Size::new(100.0, 40.0), &MonospaceMetrics::new());
    assert_eq!(placements.len(), 2);
    assert!(placements.find(long).is_none());
    assert_eq!(placements.by_path(&[1]).map(|p| p.node), Some(short));
}
