//! Secondary state machines: box hit shake, cup rise/fall, cup pickup and
//! the transformation size curve.
use crate::config::animation::*;
use crate::config::game::*;
use crate::sim::collision::{hits_box_from_below, touches_cup};
use crate::sim::state::{CupAnimation, RookieContext};
use crate::sim::Point;
use rand::Rng;

/// Jitter amplitude (x, y) for the remaining hit-animation frames.
/// The bands are hand tuned, there is no formula behind them.
pub fn shake_amplitude(remaining: u8) -> Option<(f64, f64)> {
    SHAKE_BANDS
        .iter()
        .find(|(above, _, _)| remaining > *above)
        .map(|&(_, x, y)| (x, y))
}

/// Player scale for the given transformation tick (1-based).
/// `None` once the final growth has finished.
pub fn transformation_size(counter: u32) -> Option<f64> {
    let cycle_frames = TRANSFORMATION_CYCLES * FRAMES_PER_CYCLE;

    if counter <= cycle_frames {
        let step = counter.saturating_sub(1);
        let cycle = step / FRAMES_PER_CYCLE;
        let progress = f64::from(step % FRAMES_PER_CYCLE) / f64::from(FRAMES_PER_CYCLE);
        let size = if cycle % 2 == 0 {
            1.0 + progress * CYCLE_GROWTH
        } else {
            1.0 + CYCLE_GROWTH - progress * CYCLE_GROWTH
        };
        return Some(size);
    }

    let progress = (f64::from(counter - cycle_frames) / f64::from(FINAL_GROWTH_FRAMES)).min(1.0);
    if progress < 1.0 {
        let ease_out = 1.0 - (1.0 - progress).powi(3);
        Some(1.0 + ease_out * FINAL_GROWTH)
    } else {
        None
    }
}

/// Cup position along its arc: linear in x, quadratic (easing in) in y
pub fn cup_fall_position(progress: f64) -> Point {
    let (start, end) = (cup_fall_start(), cup_fall_end());
    Point {
        x: start.x + (end.x - start.x) * progress,
        y: start.y + (end.y - start.y) * progress * progress,
    }
}

pub fn cup_fall_start() -> Point {
    Point {
        x: BOX_X + CUP_START_X_OFFSET,
        y: BOX_Y - CUP_RISE_CLEARANCE,
    }
}

pub fn cup_fall_end() -> Point {
    Point {
        x: BOX_X + CUP_FALL_TRAVEL_X,
        y: GROUND_Y - CUP_SIZE,
    }
}

impl RookieContext {
    pub(crate) fn decay_box_shake<R: Rng>(mut self, rng: &mut R) -> Self {
        self.screen_shake = Point::default();
        if self.box_hit_animation == 0 {
            return self;
        }

        self.box_hit_animation -= 1;
        let intensity = f64::from(self.box_hit_animation) / f64::from(BOX_HIT_ANIMATION_FRAMES);
        if let Some((x, y)) = shake_amplitude(self.box_hit_animation) {
            self.screen_shake = Point {
                x: (rng.gen::<f64>() - 0.5) * x * intensity,
                y: (rng.gen::<f64>() - 0.5) * y * intensity,
            };
        }
        self
    }

    /// ::advance_cup -> Rising until clear of the box, then Falling along
    /// the arc for CUP_FALL_FRAMES, then Landed (visible, collectible).
    /// A landed cup is at rest, its counter no longer moves.
    pub(crate) fn advance_cup(mut self) -> Self {
        match self.cup.animation {
            CupAnimation::Rising => {
                self.cup.counter += 1;
                self.cup.position.y -= CUP_RISE_SPEED;
                if self.cup.position.y <= BOX_Y - CUP_RISE_CLEARANCE {
                    self.cup.animation = CupAnimation::Falling;
                    self.cup.counter = 0;
                }
            }
            CupAnimation::Falling => {
                self.cup.counter += 1;
                if self.cup.counter >= CUP_FALL_FRAMES {
                    self.cup.animation = CupAnimation::Landed;
                    self.cup.position = cup_fall_end();
                    self.cup.visible = true;
                } else {
                    let progress = f64::from(self.cup.counter) / f64::from(CUP_FALL_FRAMES);
                    self.cup.position = cup_fall_position(progress);
                }
            }
            CupAnimation::None | CupAnimation::Landed => {}
        }
        self
    }

    /// ::check_box_hit -> only an upward-moving jump counts.
    /// The last hit turns the box into a wall and launches the cup.
    pub(crate) fn check_box_hit(mut self) -> Self {
        let hit = self.jumping
            && self.velocity_y < 0.0
            && hits_box_from_below(self.position, self.dimensions(), self.has_transformed);
        if !hit || self.box_hits >= BOX_HITS_FOR_CUP {
            return self;
        }

        self.box_hits += 1;
        self.box_hit_animation = BOX_HIT_ANIMATION_FRAMES;
        if self.box_hits == BOX_HITS_FOR_CUP {
            self.cup.animation = CupAnimation::Rising;
            self.cup.counter = 0;
            self.cup.position.y = BOX_Y;
            self.cup.visible = false;
        }
        self.velocity_y = BOX_HIT_BOUNCE_VELOCITY;
        self
    }

    /// Cup is only collectible once, before the transformation
    pub(crate) fn touches_visible_cup(&self) -> bool {
        self.cup.visible && !self.has_transformed && touches_cup(self.position, self.cup.position)
    }

    pub(crate) fn pick_up_cup(mut self) -> Self {
        self.cup.visible = false;
        self.cup.animation = CupAnimation::None;
        self
    }

    /// Latch the big form, stand it on the ground and give it a little hop
    pub(crate) fn finish_transformation(mut self) -> Self {
        self.has_transformed = true;
        self.show_celebration = true;
        self.position.y = GROUND_Y - BIG_PLAYER_HEIGHT;
        self.velocity_y = TRANSFORMATION_HOP_VELOCITY;
        self.grounded = false;
        self
    }
}
