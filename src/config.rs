// ==================== Tuning Constants ====================
// Every number the simulation depends on lives here. Values are per logical
// frame (60 Hz), not per second: the game is frame-rate coupled.

/// World geometry and player physics
pub mod game {
    pub const CANVAS_WIDTH: f64 = 800.0;
    pub const CANVAS_HEIGHT: f64 = 500.0;

    pub const GRAVITY: f64 = 0.45;
    pub const JUMP_POWER: f64 = -13.5; // negative because top left is origin
    pub const BIG_JUMP_MULTIPLIER: f64 = 1.15;
    pub const MOVE_SPEED: f64 = 3.0;
    pub const BIG_MOVE_SPEED: f64 = 4.5;

    pub const GROUND_Y: f64 = 456.0;

    pub const PLAYER_START_X: f64 = 100.0;
    pub const PLAYER_WIDTH: f64 = 64.0;
    pub const PLAYER_HEIGHT: f64 = 64.0;
    pub const BIG_PLAYER_WIDTH: f64 = 80.0;
    pub const BIG_PLAYER_HEIGHT: f64 = 96.0;

    pub const BOX_X: f64 = 400.0;
    pub const BOX_Y: f64 = 290.0;
    pub const BOX_WIDTH: f64 = 64.0;
    pub const BOX_HEIGHT: f64 = 64.0;
    pub const BOX_HITS_FOR_CUP: u8 = 5;

    // positive values push the drawn sprite DOWN, compensating for the
    // transparent padding at the top of the sprite images
    pub const SPRITE_Y_OFFSET: f64 = 16.0;
    pub const BIG_SPRITE_Y_OFFSET: f64 = 20.0;

    pub const CUP_SIZE: f64 = 44.0;
    pub const CUP_START_X_OFFSET: f64 = 12.0;
}

/// Frame budgets and animation curves
pub mod animation {
    pub const WALK_FRAME_INTERVAL: u32 = 8;
    pub const LANDING_DURATION: u32 = 8;

    pub const BOX_HIT_ANIMATION_FRAMES: u8 = 25;
    pub const BOX_HIT_BOUNCE_VELOCITY: f64 = 2.0;
    pub const WALL_CEILING_BOUNCE_VELOCITY: f64 = 3.0;

    /// (remaining frames greater than, x amplitude, y amplitude)
    pub const SHAKE_BANDS: [(u8, f64, f64); 4] = [
        (20, 10.0, 8.0),
        (15, 6.0, 5.0),
        (8, 4.0, 3.0),
        (3, 2.0, 1.5),
    ];

    pub const CUP_RISE_SPEED: f64 = 0.4;
    pub const CUP_RISE_CLEARANCE: f64 = 60.0;
    pub const CUP_FALL_FRAMES: u32 = 180;
    pub const CUP_FALL_TRAVEL_X: f64 = 150.0;

    pub const DRINKING_ANIMATION_FRAMES: u32 = 60;

    pub const TRANSFORMATION_CYCLES: u32 = 6;
    pub const FRAMES_PER_CYCLE: u32 = 12;
    pub const FINAL_GROWTH_FRAMES: u32 = 20;
    pub const CYCLE_GROWTH: f64 = 0.4;
    pub const FINAL_GROWTH: f64 = 0.3;
    pub const TRANSFORMATION_HOP_VELOCITY: f64 = -8.0;
    // above this size the big sprite is shown while transforming
    pub const BIG_SPRITE_THRESHOLD: f64 = 1.2;
}

/// Remote assets and decoration
pub mod assets {
    pub const SHORT_BOY_IDLE: &str =
        "https://605d1c1rw3.ufs.sh/f/exk2nUW1nV541bjuXVKB2pyIADmh6lgYZQGVzqWo9w7nX8Hc";
    pub const BIG_BOY: &str =
        "https://605d1c1rw3.ufs.sh/f/exk2nUW1nV54OTCkX1sECapO8eXbkz94UmAsvDxZHFWt0LgR";
    pub const BOX: &str =
        "https://605d1c1rw3.ufs.sh/f/exk2nUW1nV54WnjRLygC7EUuLfxON2G1PA3RM8gbKsoqtwT9";
    pub const BOY_DRINK: &str =
        "https://605d1c1rw3.ufs.sh/f/exk2nUW1nV54hT3hyyIaOyA6ZQ5PSWCNxip3f9IUDJ1tsbvo";
    pub const CUP: &str =
        "https://605d1c1rw3.ufs.sh/f/exk2nUW1nV5425QDgr7jDCg3tUxNIHpV2hK60X9qdMO5fPzZ";

    pub const MANIFEST_PATH: &str = "assets.json";
    pub const IMAGE_LOAD_TIMEOUT_MS: i32 = 10_000;

    pub const CONFETTI_COUNT: usize = 50;
    pub const CONFETTI_COLORS: [&str; 5] = ["#FFD700", "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4"];
}
