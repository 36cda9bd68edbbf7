mod common;

use linescan_core::config::AutoBaselineConfig;
use linescan_core::range::{auto_baseline, PixelRange, RangeModel};

use common::Lcg;

fn assert_invariant(range: PixelRange, bound: usize) {
    assert!(range.min() <= range.max(), "{range:?}");
    assert!(range.max() <= bound, "{range:?}");
    assert_eq!(range.bound(), bound);
}

#[test]
fn test_new_model_spans_frame() {
    let model = RangeModel::new(100, 40);
    assert_eq!((model.baseline().min(), model.baseline().max()), (0, 99));
    assert_eq!((model.structure().min(), model.structure().max()), (0, 39));
}

#[test]
fn test_out_of_order_endpoints_are_swapped() {
    let mut model = RangeModel::new(100, 40);
    model.set_structure(30, 10);
    assert_eq!((model.structure().min(), model.structure().max()), (10, 30));
}

#[test]
fn test_out_of_bounds_endpoints_are_clamped() {
    let mut model = RangeModel::new(100, 40);
    model.set_baseline(-5, 500);
    assert_eq!((model.baseline().min(), model.baseline().max()), (0, 99));
    model.set_structure(1000, 900);
    assert_eq!((model.structure().min(), model.structure().max()), (39, 39));
}

#[test]
fn test_invariant_holds_for_arbitrary_updates() {
    let mut rng = Lcg::new(7);
    let mut model = RangeModel::new(64, 128);

    for _ in 0..2000 {
        let a = rng.next_i64(-300, 300);
        let b = rng.next_i64(-300, 300);
        if rng.next_i64(0, 1) == 0 {
            model.set_baseline(a, b);
        } else {
            model.set_structure(a, b);
        }
        assert_invariant(model.baseline(), 63);
        assert_invariant(model.structure(), 127);
    }
}

#[test]
fn test_clamp_to_smaller_frame() {
    let mut model = RangeModel::new(100, 100);
    model.set_baseline(10, 90);
    model.set_structure(60, 80);

    model.clamp_to_bounds(50, 70);
    assert_eq!((model.baseline().min(), model.baseline().max()), (10, 49));
    assert_eq!((model.structure().min(), model.structure().max()), (60, 69));

    model.clamp_to_bounds(50, 30);
    assert_eq!((model.structure().min(), model.structure().max()), (29, 29));
    assert_invariant(model.structure(), 29);
}

#[test]
fn test_clamp_to_larger_frame_keeps_values() {
    let mut model = RangeModel::new(10, 10);
    model.set_structure(2, 5);
    model.clamp_to_bounds(20, 20);
    assert_eq!((model.structure().min(), model.structure().max()), (2, 5));
    model.set_structure(2, 15);
    assert_eq!(model.structure().max(), 15);
}

#[test]
fn test_zero_sized_frame() {
    let mut model = RangeModel::new(0, 0);
    model.set_baseline(3, 7);
    assert_eq!((model.baseline().min(), model.baseline().max()), (0, 0));
}

#[test]
fn test_auto_baseline_default_fractions() {
    let config = AutoBaselineConfig::default();
    assert_eq!(auto_baseline(500, &config), (10, 40));
    assert_eq!(auto_baseline(10, &config), (0, 0));

    let mut model = RangeModel::new(500, 20);
    model.auto_baseline(500, &config);
    assert_eq!((model.baseline().min(), model.baseline().max()), (10, 40));
}

#[test]
fn test_auto_baseline_custom_fractions() {
    let config = AutoBaselineConfig {
        start_fraction: 0.5,
        end_fraction: 0.25,
    };
    let mut model = RangeModel::new(100, 20);
    model.auto_baseline(100, &config);
    assert_eq!((model.baseline().min(), model.baseline().max()), (25, 50));
}

#[test]
fn test_indices_are_inclusive() {
    let range = PixelRange::new(3, 5, 10);
    assert_eq!(range.indices().collect::<Vec<_>>(), vec![3, 4, 5]);
    assert_eq!(range.pixel_count(), 3);
    assert!(range.contains(5));
    assert!(!range.contains(6));
}
