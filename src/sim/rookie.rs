use crate::sim::collision;
use crate::sim::state::{IsDrinking, IsPlaying, IsTransforming, RookieContext, RookieState};
use crate::sim::{Drinking, Keys, Mode, Normal, Size, TransformationPhase, Transforming};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// ┌──────────────── Mode Transition Flow ───────────────────────┐
/// │  From Mode     →  Trigger                →  To Mode         │
/// ├─────────────────────────────────────────────────────────────┤
/// │  Normal        →  touches visible cup    →  Drinking        │
/// │  Drinking      →  drink timer done       →  Transforming    │
/// │  Transforming  →  growth finished        →  Normal          │
/// │                   (has_transformed + show_celebration latch)│
/// └─────────────────────────────────────────────────────────────┘
/// One tick never combines modes : Drinking and Transforming freeze
/// movement, gravity and collisions entirely.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum RookieStateMachine {
    Normal(RookieState<Normal>),
    Drinking(RookieState<Drinking>),
    Transforming(RookieState<Transforming>),
}

impl From<RookieState<Normal>> for RookieStateMachine {
    fn from(state: RookieState<Normal>) -> Self {
        RookieStateMachine::Normal(state)
    }
}

impl From<RookieState<Drinking>> for RookieStateMachine {
    fn from(state: RookieState<Drinking>) -> Self {
        RookieStateMachine::Drinking(state)
    }
}

impl From<RookieState<Transforming>> for RookieStateMachine {
    fn from(state: RookieState<Transforming>) -> Self {
        RookieStateMachine::Transforming(state)
    }
}

impl From<IsPlaying> for RookieStateMachine {
    fn from(is_playing: IsPlaying) -> Self {
        match is_playing {
            IsPlaying::Playing(normal_state) => normal_state.into(),
            IsPlaying::Drinking(drinking_state) => drinking_state.into(),
        }
    }
}

impl From<IsTransforming> for RookieStateMachine {
    fn from(is_transforming: IsTransforming) -> Self {
        match is_transforming {
            IsTransforming::Done(normal_state) => normal_state.into(),
            IsTransforming::InProgress(transforming_state) => transforming_state.into(),
        }
    }
}

impl From<IsDrinking> for RookieStateMachine {
    fn from(is_drinking: IsDrinking) -> Self {
        match is_drinking {
            // the hand-off tick already runs the first transformation step
            IsDrinking::Done(transforming_state) => transforming_state.update().into(),
            IsDrinking::InProgress(drinking_state) => drinking_state.into(),
        }
    }
}

impl RookieStateMachine {
    // CONSUMING self and returning the next state, so a finished mode can't
    // be touched again after its transition
    fn update<R: Rng>(self, keys: &Keys, rng: &mut R) -> Self {
        use RookieStateMachine::*;
        match self {
            Normal(state) => state.update(keys, rng).into(),
            Drinking(state) => state.update().into(),
            Transforming(state) => state.update().into(),
        }
    }

    pub fn context(&self) -> &RookieContext {
        use RookieStateMachine::*;
        match self {
            Normal(state) => state.context(),
            Drinking(state) => state.context(),
            Transforming(state) => state.context(),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            RookieStateMachine::Normal(_) => Mode::Normal,
            RookieStateMachine::Drinking(_) => Mode::Drinking,
            RookieStateMachine::Transforming(_) => Mode::Transforming,
        }
    }
}

impl Default for RookieStateMachine {
    fn default() -> Self {
        RookieState::<Normal>::new().into()
    }
}

/// The whole simulation: owned by the frame loop, mutated once per tick,
/// lent read-only to the renderer in between.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rookie {
    state: RookieStateMachine,
    // only feeds the screen-shake jitter
    rng: Pcg32,
}

/// Rookie
/// - update() -> RookieStateMachine::update()
/// - everything else is a read-only view for rendering
impl Rookie {
    pub fn new() -> Self {
        Rookie {
            state: RookieStateMachine::default(),
            rng: Pcg32::from_entropy(),
        }
    }

    /// Deterministic jitter, for tests and replays
    pub fn with_seed(seed: u64) -> Self {
        Self::from_context(RookieContext::new(), seed)
    }

    /// Normal play resumed from an arbitrary snapshot
    pub fn from_context(context: RookieContext, seed: u64) -> Self {
        Rookie {
            state: RookieState::<Normal>::from_context(context).into(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn update(&mut self, keys: &Keys) {
        self.state = self.state.update(keys, &mut self.rng);
    }

    pub fn state(&self) -> &RookieStateMachine {
        &self.state
    }

    pub fn context(&self) -> &RookieContext {
        self.state.context()
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn is_drinking(&self) -> bool {
        self.mode() == Mode::Drinking
    }

    pub fn drinking_counter(&self) -> Option<u32> {
        match &self.state {
            RookieStateMachine::Drinking(state) => Some(state.counter()),
            _ => None,
        }
    }

    pub fn transformation_counter(&self) -> Option<u32> {
        match &self.state {
            RookieStateMachine::Transforming(state) => Some(state.counter()),
            _ => None,
        }
    }

    pub fn transformation_phase(&self) -> TransformationPhase {
        match (&self.state, self.context().has_transformed) {
            (RookieStateMachine::Transforming(_), _) => TransformationPhase::Transforming,
            (_, true) => TransformationPhase::Complete,
            (_, false) => TransformationPhase::None,
        }
    }

    /// Scale factor, only differs from 1.0 while transforming
    pub fn player_size(&self) -> f64 {
        match &self.state {
            RookieStateMachine::Transforming(state) => state.size(),
            _ => 1.0,
        }
    }

    pub fn player_dimensions(&self) -> Size {
        let transforming_size = match &self.state {
            RookieStateMachine::Transforming(state) => Some(state.size()),
            _ => None,
        };
        collision::player_dimensions(self.context().has_transformed, transforming_size)
    }

    /// Drawn sprite sits this far below the collision box
    pub fn sprite_offset(&self) -> f64 {
        match &self.state {
            RookieStateMachine::Transforming(state) => {
                collision::sprite_offset(state.size() > crate::config::animation::BIG_SPRITE_THRESHOLD)
            }
            _ => collision::sprite_offset(self.context().has_transformed),
        }
    }
}

impl Default for Rookie {
    fn default() -> Self {
        Self::new()
    }
}
