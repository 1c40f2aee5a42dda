use chamber_core::math::*;
use glam::{Vec2, Vec3};

#[test]
fn test_hash11_range() {
    for i in 0..1000 {
        let h = hash11(i as f32 * 0.1);
        assert!(h >= 0.0 && h < 1.0, "hash11({}) = {} out of range", i as f32 * 0.1, h);
    }
}

#[test]
fn test_hash_negative_inputs() {
    let h1 = hash11(-5.0);
    assert!(h1 >= 0.0 && h1 < 1.0, "hash11(-5.0) out of range: {}", h1);
}

#[test]
fn test_smoothstep_boundaries() {
    assert_eq!(smoothstep(0.0, 1.0, -0.1), 0.0);
    assert_eq!(smoothstep(0.0, 1.0, 0.0), 0.0);
    assert_eq!(smoothstep(0.0, 1.0, 1.0), 1.0);
    assert_eq!(smoothstep(0.0, 1.0, 1.5), 1.0);
    let mid = smoothstep(0.0, 1.0, 0.5);
    assert!((mid - 0.5).abs() < 0.01);
}

#[test]
fn test_smoothstep_inverted_edges() {
    // energy waves fade out with smoothstep(thickness, 0, band)
    let r = smoothstep(30.0, 0.0, 10.0);
    assert!(r > 0.5 && r < 1.0, "inverted smoothstep near the ring: {}", r);
    assert_eq!(smoothstep(30.0, 0.0, 40.0), 0.0);
}

#[test]
fn test_ease_in_out_quad() {
    assert_eq!(ease_in_out_quad(0.0), 0.0);
    assert_eq!(ease_in_out_quad(1.0), 1.0);
    assert!((ease_in_out_quad(0.5) - 0.5).abs() < 1e-6);
    let mut prev = 0.0;
    for i in 1..=100 {
        let t = i as f32 / 100.0;
        let v = ease_in_out_quad(t);
        assert!(v >= prev, "not monotonic at t={}: {} < {}", t, v, prev);
        prev = v;
    }
    assert_eq!(ease_in_out_quad(-1.0), 0.0);
    assert_eq!(ease_in_out_quad(2.0), 1.0);
}

#[test]
fn test_drift_bounded() {
    for i in 0..500 {
        let d = drift(i as f32 * 0.37, 0.6, i as f32 * 0.1);
        assert!(d.is_finite());
        assert!(d.abs().max_element() <= 1.0 + 1e-6, "drift out of range: {:?}", d);
    }
}

#[test]
fn test_project_centre_and_depth() {
    let center = Vec2::new(400.0, 300.0);
    let p = project(Vec3::new(400.0, 300.0, 0.0), center, 600.0).unwrap();
    assert_eq!(p.screen, center);
    assert!((p.scale - 1.0).abs() < 1e-6);

    let near = project(Vec3::new(500.0, 300.0, -100.0), center, 600.0).unwrap();
    let far = project(Vec3::new(500.0, 300.0, 100.0), center, 600.0).unwrap();
    assert!(near.scale > 1.0 && far.scale < 1.0);
    assert!(near.screen.x > far.screen.x, "nearer points spread further from centre");
}

#[test]
fn test_project_rejects_non_finite() {
    let center = Vec2::new(400.0, 300.0);
    assert!(project(Vec3::new(f32::NAN, 0.0, 0.0), center, 600.0).is_none());
    assert!(project(Vec3::new(0.0, f32::INFINITY, 0.0), center, 600.0).is_none());
    // behind the camera still projects to something finite
    let clamped = project(Vec3::new(0.0, 0.0, -5000.0), center, 600.0).unwrap();
    assert!(clamped.scale.is_finite() && clamped.screen.is_finite());
}

#[test]
fn test_rotate_about_keeps_distance() {
    let center = Vec2::new(400.0, 300.0);
    let pivot = center.extend(0.0);
    let p = Vec3::new(480.0, 250.0, 30.0);
    for axis in [Axis::Vertical, Axis::Horizontal] {
        for i in 0..16 {
            let q = rotate_about(p, center, axis, i as f32 * 0.4);
            assert!((q.distance(pivot) - p.distance(pivot)).abs() < 1e-3);
        }
    }
    let q = rotate_about(p, center, Axis::Vertical, 1.0);
    assert!((q.y - p.y).abs() < 1e-4, "vertical axis keeps height");
    let q = rotate_about(p, center, Axis::Horizontal, 1.0);
    assert!((q.x - p.x).abs() < 1e-4, "horizontal axis keeps x");
}
