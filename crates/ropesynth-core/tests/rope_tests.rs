// Rope physics: anchor pinning, sag under gravity, constraint convergence
// and pointer dragging.

use glam::Vec2;
use ropesynth_core::{Bounds, CoreError, PointerState, Rope, RopeParams};

const DT: f32 = 1.0 / 60.0;
const GRAVITY: Vec2 = Vec2::new(0.0, 800.0);

fn hanging_rope() -> Rope {
    Rope::new(
        Vec2::new(400.0, 400.0),
        Vec2::new(400.0, 600.0),
        RopeParams {
            points: 10,
            rest_length: 100.0,
            iterations: 10,
            damping: 0.98,
            stiffness: 1.0,
            ..RopeParams::default()
        },
    )
    .expect("valid rope")
}

fn released() -> PointerState {
    PointerState::default()
}

fn held_at(x: f32, y: f32) -> PointerState {
    PointerState {
        position: Vec2::new(x, y),
        pressed: true,
    }
}

#[test]
fn construction_rejects_bad_params() {
    let start = Vec2::ZERO;
    let end = Vec2::new(0.0, 100.0);
    let few = Rope::new(
        start,
        end,
        RopeParams {
            points: 1,
            ..RopeParams::default()
        },
    );
    assert_eq!(few.unwrap_err(), CoreError::TooFewRopePoints(1));

    let zero_len = Rope::new(
        start,
        end,
        RopeParams {
            rest_length: 0.0,
            ..RopeParams::default()
        },
    );
    assert!(matches!(zero_len, Err(CoreError::InvalidRestLength(_))));

    let bad_damping = Rope::new(
        start,
        end,
        RopeParams {
            damping: 1.5,
            ..RopeParams::default()
        },
    );
    assert!(matches!(
        bad_damping,
        Err(CoreError::OutOfUnitRange { name: "damping", .. })
    ));
}

#[test]
fn new_rope_starts_at_rest_spacing() {
    let rope = hanging_rope();
    assert_eq!(rope.len(), 10);
    assert_eq!(rope.points()[0], rope.start());
    assert!(
        (rope.chain_length() - 100.0).abs() < 1e-3,
        "chain length {}",
        rope.chain_length()
    );
    assert!((rope.end().y - 500.0).abs() < 1e-3);
}

#[test]
fn end_argument_only_sets_the_direction() {
    let start = Vec2::new(100.0, 100.0);
    let rope = Rope::new(start, Vec2::new(1000.0, 100.0), RopeParams::default())
        .expect("valid rope");
    let rest = RopeParams::default().rest_length;
    assert!((rope.end() - Vec2::new(100.0 + rest, 100.0)).length() < 1e-3);
}

#[test]
fn anchor_stays_pinned_every_step() {
    let mut rope = hanging_rope();
    let anchor = rope.start();
    for step in 0..120 {
        let pointer = if (30..60).contains(&step) {
            held_at(450.0, 480.0)
        } else {
            released()
        };
        rope.step(GRAVITY, None, DT, pointer);
        assert_eq!(rope.points()[0], anchor, "anchor moved at step {step}");
        assert_eq!(rope.velocities()[0], Vec2::ZERO);
    }
}

#[test]
fn rope_sags_and_keeps_its_length_under_gravity() {
    let mut rope = hanging_rope();
    let initial_end_y = rope.end().y;
    for step in 0..60 {
        rope.step(GRAVITY, None, DT, released());
        let len = rope.chain_length();
        assert!(
            (95.0..=105.0).contains(&len),
            "chain length {len} outside +-5% at step {step}"
        );
    }
    assert!(
        rope.end().y > initial_end_y,
        "end y {} did not sag below {}",
        rope.end().y,
        initial_end_y
    );
}

#[test]
fn relaxation_converges_on_rest_spacing() {
    // Without relaxation inside `step`, a sideways pull stretches the first
    // segment while the anchor stays put.
    let mut rope = Rope::new(
        Vec2::new(400.0, 400.0),
        Vec2::new(400.0, 500.0),
        RopeParams {
            points: 10,
            iterations: 0,
            ..RopeParams::default()
        },
    )
    .expect("valid rope");
    for _ in 0..3 {
        rope.step(Vec2::new(9000.0, 0.0), Some(1.0), DT, released());
    }
    let target = rope.rest_length() / (rope.len() - 1) as f32;
    let stretched = rope.points()[0].distance(rope.points()[1]);
    assert!(stretched > target + 1.0, "first segment {stretched} not stretched");

    for _ in 0..200 {
        rope.relax();
    }
    for (i, w) in rope.points().windows(2).enumerate() {
        let d = w[0].distance(w[1]);
        assert!(
            (d - target).abs() < 1e-2,
            "segment {i} length {d} vs target {target}"
        );
    }
    assert_eq!(rope.points()[0], rope.start());
}

#[test]
fn non_positive_dt_is_a_no_op() {
    let mut rope = hanging_rope();
    let before = rope.points().to_vec();
    rope.step(GRAVITY, None, 0.0, released());
    rope.step(GRAVITY, None, -DT, released());
    rope.step(GRAVITY, None, f32::NAN, released());
    assert_eq!(rope.points(), &before[..]);
}

#[test]
fn end_prev_tracks_previous_step() {
    let mut rope = hanging_rope();
    rope.step(GRAVITY, None, DT, released());
    let after_first = rope.end();
    rope.step(GRAVITY, None, DT, released());
    assert_eq!(rope.end_prev(), after_first);
    assert_eq!(rope.end(), *rope.points().last().unwrap());
}

#[test]
fn grab_pins_end_to_pointer_and_release_flicks() {
    let mut rope = hanging_rope();

    rope.step(GRAVITY, None, DT, held_at(420.0, 510.0));
    assert!(rope.is_dragging());
    assert_eq!(rope.end(), Vec2::new(420.0, 510.0));

    // Once grabbed the end follows the pointer beyond the grab radius.
    rope.step(GRAVITY, None, DT, held_at(600.0, 510.0));
    assert!(rope.is_dragging());
    assert_eq!(rope.end(), Vec2::new(600.0, 510.0));

    rope.step(
        GRAVITY,
        None,
        DT,
        PointerState {
            position: Vec2::new(630.0, 510.0),
            pressed: false,
        },
    );
    assert!(!rope.is_dragging());
    let v = *rope.velocities().last().unwrap();
    assert!((v.x - 30.0 / DT).abs() < 1e-2, "flick vx {}", v.x);
    assert!(v.y.abs() < 1e-3, "flick vy {}", v.y);
}

#[test]
fn pointer_out_of_reach_does_not_grab() {
    let mut rope = hanging_rope();
    rope.step(GRAVITY, None, DT, held_at(0.0, 0.0));
    assert!(!rope.is_dragging());
    assert!(rope.end().distance(Vec2::ZERO) > 100.0);
}

#[test]
fn bounds_keep_points_inside() {
    let mut rope = Rope::new(
        Vec2::new(400.0, 400.0),
        Vec2::new(400.0, 500.0),
        RopeParams {
            bounds: Some(Bounds {
                min: Vec2::ZERO,
                max: Vec2::new(800.0, 450.0),
            }),
            ..RopeParams::default()
        },
    )
    .expect("valid rope");
    for _ in 0..120 {
        rope.step(GRAVITY, None, DT, released());
        for p in rope.points() {
            assert!(p.y <= 450.0 + 1e-3, "point escaped floor: {p:?}");
            assert!((0.0..=800.0).contains(&p.x), "point escaped walls: {p:?}");
        }
    }
}
