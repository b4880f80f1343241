#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::Config;

/// Every case touches the filesystem, so keep the case count modest.
pub fn proptest_config() -> Config {
    Config {
        cases: 48,
        ..Config::default()
    }
}

/// A normalized label row: `(class_id, cx, cy, w, h)`.
pub fn arb_label_row() -> impl Strategy<Value = (u32, f64, f64, f64, f64)> {
    (0u32..80, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0)
}

pub fn arb_label_rows(max_rows: usize) -> impl Strategy<Value = Vec<(u32, f64, f64, f64, f64)>> {
    prop::collection::vec(arb_label_row(), 0..=max_rows)
}

pub fn arb_image_size() -> impl Strategy<Value = (u32, u32)> {
    (1u32..=4096, 1u32..=4096)
}

/// Render rows the way a label file stores them, shortest round-trip floats.
pub fn render_label_rows(rows: &[(u32, f64, f64, f64, f64)]) -> String {
    rows.iter()
        .map(|(class_id, cx, cy, w, h)| format!("{class_id} {cx:?} {cy:?} {w:?} {h:?}\n"))
        .collect()
}

pub fn approx_eq(left: f64, right: f64) -> bool {
    let scale = left.abs().max(right.abs()).max(1.0);
    (left - right).abs() <= 1e-9 * scale
}
