// TABLE:
// ┌──────────────────────────────────────────────────────────────────────────┐
// │                          Simulation Layout                               │
// ├───────────────────┬──────────────────────────────────────────────────────┤
// │ File              │ Responsibility                                       │
// ├───────────────────┼──────────────────────────────────────────────────────┤
// │ mod.rs            │ Keys, geometry primitives, mode payloads             │
// │ collision.rs      │ pure geometric predicates (box, wall, cup)           │
// │ physics.rs        │ movement, jump, gravity + landing                    │
// │ animation.rs      │ box shake, cup flight, drinking, transformation      │
// │ state.rs          │ RookieContext + mode-typed RookieState<S>            │
// │ rookie.rs         │ RookieStateMachine + Rookie (frame orchestrator)     │
// └───────────────────┴──────────────────────────────────────────────────────┘
// Nothing in here touches web APIs, so the whole module runs under host tests.
use serde::{Deserialize, Serialize};

pub mod animation;
pub mod collision;
pub mod physics;
pub mod rookie;
pub mod state;

pub use rookie::{Rookie, RookieStateMachine};
pub use state::{Cup, CupAnimation, Movement, RookieContext, RookieState};

/// Level-triggered input vector: true while held.
/// The simulation never cares where a press came from (keyboard, touch, mouse).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Which updater set governs the current tick.
/// Exactly one mode is active; the variant of `RookieStateMachine` decides it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Normal,
    Drinking,
    Transforming,
}

/// Transformation progress as the renderer and HUD see it
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformationPhase {
    None,
    Transforming,
    Complete,
}

// ==================== Mode Payloads ====================
// Used as the `S` in RookieState<S>. Counters that only make sense inside
// a mode live in that mode, so e.g. a drinking counter can't exist while
// walking around.

/// Movement, physics and collisions run every tick
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normal;

/// Frozen in place while the cup is being drunk
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drinking {
    pub(crate) counter: u32,
}

/// Size oscillation from small to big form
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transforming {
    pub(crate) counter: u32,
    pub(crate) size: f64,
}

impl Default for Transforming {
    fn default() -> Self {
        Transforming {
            counter: 0,
            size: 1.0,
        }
    }
}
