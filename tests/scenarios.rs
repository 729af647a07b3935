// Host integration tests for the `rookie-playground` simulation.
// Everything here runs under plain `cargo test`; nothing touches web APIs.
use approx::assert_relative_eq;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use rookie_playground::config::animation::*;
use rookie_playground::config::game::*;
use rookie_playground::sim::collision::touches_cup;
use rookie_playground::sim::{
    CupAnimation, Keys, Mode, Point, Rookie, RookieContext, TransformationPhase,
};

const IDLE: Keys = Keys {
    left: false,
    right: false,
    jump: false,
};
const RIGHT: Keys = Keys {
    left: false,
    right: true,
    jump: false,
};
const JUMP: Keys = Keys {
    left: false,
    right: false,
    jump: true,
};

/// Ticks once and checks every cross-frame property against the previous frame
fn step(rookie: &mut Rookie, keys: &Keys) {
    let before = *rookie.context();
    let mode_before = rookie.mode();
    rookie.update(keys);
    let after = rookie.context();

    assert!(after.box_hits >= before.box_hits);
    assert!(after.box_hits <= before.box_hits + 1);
    assert!(after.box_hits <= BOX_HITS_FOR_CUP);
    assert!(!before.has_transformed || after.has_transformed);
    assert!(!before.show_celebration || after.show_celebration);

    if mode_before != Mode::Normal {
        assert_eq!(after.position.x, before.position.x);
        assert_eq!(after.box_hits, before.box_hits);
        if !(mode_before == Mode::Transforming && rookie.mode() == Mode::Normal) {
            assert_eq!(after.velocity_y, before.velocity_y);
        }
    }

    let height = after.dimensions().height;
    if rookie.mode() == Mode::Normal && after.grounded && after.position.y != BOX_Y - height {
        assert_eq!(after.position.y, GROUND_Y - height);
    }
}

fn run_until(rookie: &mut Rookie, keys: &Keys, limit: usize, done: impl Fn(&Rookie) -> bool) {
    for _ in 0..limit {
        if done(rookie) {
            return;
        }
        step(rookie, keys);
    }
    assert!(done(rookie), "condition not reached within {} ticks", limit);
}

fn under_box_rising() -> RookieContext {
    RookieContext {
        position: Point { x: 400.0, y: 330.0 },
        velocity_y: -5.0,
        grounded: false,
        jumping: true,
        ..RookieContext::new()
    }
}

fn beside_landed_cup() -> RookieContext {
    let mut context = RookieContext::new();
    context.box_hits = BOX_HITS_FOR_CUP;
    context.cup.animation = CupAnimation::Landed;
    context.cup.visible = true;
    context.cup.position = Point { x: 550.0, y: 412.0 };
    context.position.x = 500.0;
    context
}

#[test]
fn upward_jump_under_box_registers_one_hit() {
    let mut rookie = Rookie::from_context(under_box_rising(), 11);
    step(&mut rookie, &JUMP);
    assert_eq!(rookie.context().box_hits, 1);
    assert_eq!(rookie.context().box_hit_animation, BOX_HIT_ANIMATION_FRAMES);
    assert_relative_eq!(rookie.context().velocity_y, BOX_HIT_BOUNCE_VELOCITY);
}

#[test]
fn fifth_hit_starts_cup_rising_in_same_tick() {
    let mut context = under_box_rising();
    context.box_hits = 4;
    let mut rookie = Rookie::from_context(context, 11);
    step(&mut rookie, &IDLE);
    assert_eq!(rookie.context().box_hits, 5);
    assert_eq!(rookie.context().cup.animation, CupAnimation::Rising);
    assert!(!rookie.context().cup.visible);
    assert!(rookie.context().is_wall());
}

#[test]
fn cup_crosses_threshold_then_lands_at_fixed_spot() {
    let mut context = RookieContext::new();
    context.box_hits = 5;
    context.cup.animation = CupAnimation::Rising;
    let mut rookie = Rookie::from_context(context, 5);

    run_until(&mut rookie, &IDLE, 400, |r| {
        r.context().cup.animation == CupAnimation::Falling
    });
    assert!(rookie.context().cup.position.y <= BOX_Y - CUP_RISE_CLEARANCE + CUP_RISE_SPEED);

    for _ in 0..CUP_FALL_FRAMES {
        step(&mut rookie, &IDLE);
    }
    let cup = rookie.context().cup;
    assert_eq!(cup.animation, CupAnimation::Landed);
    assert!(cup.visible);
    assert_eq!(cup.position, Point { x: BOX_X + 150.0, y: GROUND_Y - 44.0 });
}

#[test]
fn touching_cup_starts_drinking_then_transforming() {
    let mut rookie = Rookie::from_context(beside_landed_cup(), 2);
    step(&mut rookie, &IDLE);
    assert!(rookie.is_drinking());
    assert!(!rookie.context().cup.visible);

    for _ in 0..DRINKING_ANIMATION_FRAMES {
        step(&mut rookie, &RIGHT);
    }
    assert_eq!(rookie.mode(), Mode::Transforming);
    assert_eq!(rookie.transformation_phase(), TransformationPhase::Transforming);
}

#[test]
fn transformation_completes_with_latches_and_big_body() {
    let mut rookie = Rookie::from_context(beside_landed_cup(), 2);
    step(&mut rookie, &IDLE);
    for _ in 0..DRINKING_ANIMATION_FRAMES {
        step(&mut rookie, &IDLE);
    }
    // the hand-off tick already ran transformation step 1
    let remaining = TRANSFORMATION_CYCLES * FRAMES_PER_CYCLE + FINAL_GROWTH_FRAMES - 1;
    for _ in 0..remaining - 1 {
        step(&mut rookie, &IDLE);
        assert_eq!(rookie.mode(), Mode::Transforming);
    }
    step(&mut rookie, &IDLE);

    let context = rookie.context();
    assert_eq!(rookie.mode(), Mode::Normal);
    assert_eq!(rookie.transformation_phase(), TransformationPhase::Complete);
    assert!(context.has_transformed);
    assert!(context.show_celebration);
    assert_eq!(rookie.player_size(), 1.0);
    assert_eq!(context.position.y, GROUND_Y - BIG_PLAYER_HEIGHT);
    assert_relative_eq!(context.velocity_y, TRANSFORMATION_HOP_VELOCITY);

    // the hop plays out and the big body settles on the ground
    run_until(&mut rookie, &IDLE, 120, |r| r.context().grounded);
    assert_eq!(rookie.context().position.y, GROUND_Y - BIG_PLAYER_HEIGHT);
}

#[test]
fn cup_cannot_be_drunk_twice() {
    let mut context = beside_landed_cup();
    context.has_transformed = true;
    context.position.y = GROUND_Y - BIG_PLAYER_HEIGHT;
    // still overlapping the cup, only the latch keeps it from being drunk
    assert!(touches_cup(context.position, context.cup.position));
    let mut rookie = Rookie::from_context(context, 2);
    step(&mut rookie, &IDLE);
    assert_eq!(rookie.mode(), Mode::Normal);
    assert!(rookie.context().cup.visible);
}

#[test]
fn full_playthrough_reaches_celebration() {
    let mut rookie = Rookie::with_seed(2024);

    // walk under the box
    run_until(&mut rookie, &RIGHT, 200, |r| r.context().position.x >= BOX_X);
    run_until(&mut rookie, &IDLE, 10, |r| r.context().grounded);

    // head-butt it until it turns into a wall
    run_until(&mut rookie, &JUMP, 1_000, |r| r.context().box_hits == 5);
    assert!(rookie.context().is_wall());

    run_until(&mut rookie, &IDLE, 600, |r| r.context().cup.visible);

    // walk off the wall and into the cup
    run_until(&mut rookie, &RIGHT, 300, |r| r.is_drinking());
    run_until(&mut rookie, &IDLE, 300, |r| r.context().has_transformed);
    assert!(rookie.context().show_celebration);

    // latches survive whatever comes next
    let mut input = Pcg32::seed_from_u64(99);
    for _ in 0..2_000 {
        let keys = Keys {
            left: input.gen_bool(0.3),
            right: input.gen_bool(0.3),
            jump: input.gen_bool(0.2),
        };
        step(&mut rookie, &keys);
        assert_eq!(rookie.mode(), Mode::Normal);
        assert!(!(rookie.context().is_moving_left() && rookie.context().is_moving_right()));
    }
    assert!(rookie.context().has_transformed);
    assert!(rookie.context().show_celebration);
}

#[test]
fn random_play_keeps_player_on_canvas() {
    let mut rookie = Rookie::with_seed(8);
    let mut input = Pcg32::seed_from_u64(3);
    for _ in 0..5_000 {
        let keys = Keys {
            left: input.gen_bool(0.4),
            right: input.gen_bool(0.4),
            jump: input.gen_bool(0.1),
        };
        step(&mut rookie, &keys);
        let context = rookie.context();
        let width = context.dimensions().width;
        assert!(context.position.x >= 0.0);
        assert!(context.position.x + width <= CANVAS_WIDTH);
        assert!(context.position.y <= GROUND_Y - context.dimensions().height);
    }
}
