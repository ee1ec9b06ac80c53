//! Integration tests for the animation module.

use cards_core::animation::*;
use proptest::prelude::*;
use std::time::Duration;

const MS_16: Duration = Duration::from_millis(16);

fn frames_to_rest(anim: &mut impl Animation, cap: usize) -> usize {
    let mut frames = 0;
    while !anim.is_complete() && frames < cap {
        anim.tick(MS_16);
        frames += 1;
    }
    frames
}

#[test]
fn frame_rate_does_not_change_resting_point() {
    let mut coarse = Spring::new(400.0, 0.0, SpringParams::new(12.0, 2.0));
    let mut fine = coarse.clone();
    frames_to_rest(&mut coarse, 10_000);
    while !fine.is_complete() {
        fine.tick(Duration::from_millis(1));
    }
    assert_eq!(coarse.value(), fine.value());
}

#[test]
fn pop_spring_settles_within_a_few_seconds() {
    let mut spring = Spring::new(0.0, 700.0, SpringParams::new(12.0, 0.0)).with_velocity(1_500.0);
    let frames = frames_to_rest(&mut spring, 10_000);
    assert!(frames < 250, "took {frames} frames");
    assert_eq!(spring.value(), 700.0);
}

#[test]
fn motion_delegates_to_inner() {
    let mut motion = Curve::spring(12.0, 1.0).motion(-60.0, 0.0, 0.0, 0.01);
    motion.tick(MS_16);
    assert!(motion.value() > -60.0);
    assert!(motion.velocity() > 0.0);
}

#[test]
fn easing_functions_are_monotonic() {
    for easing in [linear, ease_in, ease_out, ease_in_out, ease_out_cubic] {
        let mut prev = 0.0f64;
        for i in 0..=100 {
            let t = f64::from(i) / 100.0;
            let v = easing(t);
            assert!(v >= prev - 1e-9, "easing should be monotonic at t={t}");
            prev = v;
        }
    }
}

proptest! {
    #[test]
    fn springs_always_settle_on_target(
        from in -2_000.0f64..2_000.0,
        to in -2_000.0f64..2_000.0,
        velocity in -5_000.0f64..5_000.0,
        bounciness in 0.0f64..10.0,
    ) {
        let mut spring = Spring::new(from, to, SpringParams::new(12.0, bounciness))
            .with_velocity(velocity);
        let frames = frames_to_rest(&mut spring, 20_000);
        prop_assert!(frames < 20_000);
        prop_assert_eq!(spring.value(), to);
        prop_assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn tweens_stay_between_endpoints(
        from in -500.0f64..500.0,
        to in -500.0f64..500.0,
        elapsed_ms in 0u64..1_000,
    ) {
        let mut tween = Tween::new(from, to, Duration::from_millis(300));
        tween.tick(Duration::from_millis(elapsed_ms));
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        prop_assert!(tween.value() >= lo - 1e-9 && tween.value() <= hi + 1e-9);
    }
}
