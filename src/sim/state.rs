/// All code relating to individual modes sits behind the methods in this
/// file. A mode transition can only happen through them:
/// - PUBLIC  : RookieState and RookieContext are public
/// - PRIVATE : the mode payload and the transition helpers are not
///
/// Doesn't know about RookieStateMachine, which only wraps these states.
use crate::config::animation::DRINKING_ANIMATION_FRAMES;
use crate::config::game::*;
use crate::sim::animation;
use crate::sim::{Drinking, Keys, Normal, Point, Transforming};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub enum IsPlaying {
    Playing(RookieState<Normal>),
    Drinking(RookieState<Drinking>),
}

pub enum IsDrinking {
    Done(RookieState<Transforming>),
    InProgress(RookieState<Drinking>),
}

pub enum IsTransforming {
    Done(RookieState<Normal>),
    InProgress(RookieState<Transforming>),
}

/// Horizontal intent of the last accepted move.
/// Replaces a left/right flag pair that must never both be set.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Movement {
    #[default]
    Still,
    Left,
    Right,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CupAnimation {
    #[default]
    None,
    Rising,
    Falling,
    Landed,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cup {
    pub animation: CupAnimation,
    pub position: Point,
    /// frames since entering the current `animation` state
    pub counter: u32,
    /// landed and not yet drunk
    pub visible: bool,
}

impl Cup {
    fn new() -> Self {
        Cup {
            animation: CupAnimation::None,
            position: Point {
                x: BOX_X + CUP_START_X_OFFSET,
                y: BOX_Y,
            },
            counter: 0,
            visible: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
/// Shared data for every mode :
/// - physics : position + vertical velocity + ground flags
/// - progress : box hits, cup, one-way latches
/// - display : animation frame + screen shake
pub struct RookieContext {
    pub position: Point,
    pub velocity_y: f64,
    pub grounded: bool,
    pub jumping: bool,
    pub movement: Movement,
    /// one-way ratchet, 0..=5
    pub box_hits: u8,
    /// countdown, 0..=25
    pub box_hit_animation: u8,
    /// recomputed every normal tick, meaningless beyond one frame
    pub screen_shake: Point,
    pub cup: Cup,
    pub has_transformed: bool,
    pub show_celebration: bool,
    /// sprite sheet column, 0..=3
    pub animation_frame: u8,
    pub frame_counter: u32,
    pub jump_start_frame: u32,
}

impl RookieContext {
    pub fn new() -> Self {
        RookieContext {
            position: Point {
                x: PLAYER_START_X,
                y: GROUND_Y - PLAYER_HEIGHT,
            },
            velocity_y: 0.0,
            grounded: true,
            jumping: false,
            movement: Movement::Still,
            box_hits: 0,
            box_hit_animation: 0,
            screen_shake: Point::default(),
            cup: Cup::new(),
            has_transformed: false,
            show_celebration: false,
            animation_frame: 0,
            frame_counter: 0,
            jump_start_frame: 0,
        }
    }

    pub fn is_moving_left(&self) -> bool {
        self.movement == Movement::Left
    }

    pub fn is_moving_right(&self) -> bool {
        self.movement == Movement::Right
    }

    /// The box turns into an impassable wall after the last hit
    pub fn is_wall(&self) -> bool {
        self.box_hits >= BOX_HITS_FOR_CUP
    }

    fn tick(mut self) -> Self {
        self.frame_counter = self.frame_counter.wrapping_add(1);
        self
    }
}

impl Default for RookieContext {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RookieState<S> {
    context: RookieContext,
    // the mode payload both tags the state at compile time and carries
    // the counters that only exist inside that mode
    mode: S,
}

/// generic methods shared between all modes
impl<S> RookieState<S> {
    pub fn context(&self) -> &RookieContext {
        &self.context
    }

    pub fn mode(&self) -> &S {
        &self.mode
    }
}

impl RookieState<Normal> {
    pub fn new() -> Self {
        Self::from_context(RookieContext::new())
    }

    /// Resume normal play from an arbitrary snapshot
    pub fn from_context(context: RookieContext) -> Self {
        RookieState {
            context,
            mode: Normal,
        }
    }

    /// One tick of normal play. Order matters, each step consumes the
    /// previous step's output.
    pub fn update<R: Rng>(mut self, keys: &Keys, rng: &mut R) -> IsPlaying {
        self.context = self
            .context
            .tick()
            .decay_box_shake(rng)
            .advance_cup()
            .move_horizontally(keys)
            .jump(keys)
            .apply_gravity()
            .check_box_hit();

        if self.context.touches_visible_cup() {
            IsPlaying::Drinking(self.drink())
        } else {
            IsPlaying::Playing(self)
        }
    }

    fn drink(self) -> RookieState<Drinking> {
        RookieState {
            context: self.context.pick_up_cup(),
            mode: Drinking { counter: 0 },
        }
    }
}

impl Default for RookieState<Normal> {
    fn default() -> Self {
        Self::new()
    }
}

impl RookieState<Drinking> {
    pub fn counter(&self) -> u32 {
        self.mode.counter
    }

    pub fn update(mut self) -> IsDrinking {
        self.mode.counter += 1;
        if self.mode.counter >= DRINKING_ANIMATION_FRAMES {
            IsDrinking::Done(self.start_transforming())
        } else {
            IsDrinking::InProgress(self)
        }
    }

    fn start_transforming(self) -> RookieState<Transforming> {
        RookieState {
            context: self.context,
            mode: Transforming::default(),
        }
    }
}

impl RookieState<Transforming> {
    pub fn counter(&self) -> u32 {
        self.mode.counter
    }

    pub fn size(&self) -> f64 {
        self.mode.size
    }

    pub fn update(mut self) -> IsTransforming {
        self.mode.counter += 1;
        match animation::transformation_size(self.mode.counter) {
            Some(size) => {
                self.mode.size = size;
                IsTransforming::InProgress(self)
            }
            None => IsTransforming::Done(self.complete()),
        }
    }

    fn complete(self) -> RookieState<Normal> {
        RookieState {
            context: self.context.finish_transformation(),
            mode: Normal,
        }
    }
}
