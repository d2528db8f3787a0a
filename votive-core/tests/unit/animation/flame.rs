use super::*;

#[test]
fn loop_start_is_exact() {
    let v = flicker_offset(FrameIndex(0), 8);
    assert_eq!(v.x, 0.0);
    assert_eq!(v.y, 0.8);
}

#[test]
fn offsets_are_deterministic_regardless_of_call_order() {
    let forward: Vec<_> = (0..8).map(|i| flicker_offset(FrameIndex(i), 8)).collect();
    let backward: Vec<_> = (0..8)
        .rev()
        .map(|i| flicker_offset(FrameIndex(i), 8))
        .collect();
    for (i, v) in forward.iter().enumerate() {
        assert_eq!(*v, backward[7 - i]);
    }
}

#[test]
fn offsets_stay_within_amplitude() {
    for i in 0..8 {
        let v = flicker_offset(FrameIndex(i), 8);
        assert!(v.x.abs() <= 1.5 + 1e-12);
        assert!(v.y.abs() <= 0.8 + 1e-12);
    }
}

#[test]
fn known_frames_match_closed_form() {
    // frame 2 of 8: t = 0.25 -> sin(1.5 * pi) = -1, cos(0.75 * pi) = -sqrt(2)/2
    let v = flicker_offset(FrameIndex(2), 8);
    assert!((v.x + 1.5).abs() < 1e-9);
    assert!((v.y + 0.8 * std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
}

#[test]
fn zero_frame_count_samples_loop_start() {
    assert_eq!(flicker_offset(FrameIndex(5), 0), flicker_offset(FrameIndex(0), 8));
}

#[test]
fn still_lobes_are_symmetric_discs() {
    let outer = OUTER_LOBE.offsets(Vec2::ZERO);
    // r^2 < 10 covers 29 lattice points; r^2 < 3 covers 9.
    assert_eq!(outer.len(), 29);
    assert_eq!(INNER_LOBE.offsets(Vec2::ZERO).len(), 9);
    for (x, y) in &outer {
        assert!(outer.contains(&(-x, -y)));
    }
}

#[test]
fn lobes_follow_the_flicker() {
    let shift = Vec2::new(1.5, 0.0);
    let outer = OUTER_LOBE.offsets(shift);
    assert!(outer.contains(&(4, 0)));
    assert!(!outer.contains(&(-3, 0)));

    let inner = INNER_LOBE.offsets(shift);
    for (x, y) in inner {
        let dx = f64::from(x) - 0.75;
        let dy = f64::from(y);
        assert!(dx * dx + dy * dy < 3.0);
    }
}
