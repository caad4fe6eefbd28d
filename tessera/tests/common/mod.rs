//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::Once;

use tessera::{layout, LayoutConfig, LeafMetrics, NodeId, PlacementTree, Rect, Size, ViewTree};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Route engine logs to the test output when `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub const EPS: f64 = 1e-6;

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

/// Run a pass with default config, panicking on validation errors.
pub fn run(tree: &ViewTree, root: NodeId, available: Size, metrics: &dyn LeafMetrics) -> PlacementTree {
    init_tracing();
    layout(tree, root, available, metrics, &LayoutConfig::default()).expect("layout pass")
}

pub fn rect(placements: &PlacementTree, node: NodeId) -> Rect {
    placements.rect_of(node).expect("node was placed")
}
