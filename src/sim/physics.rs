use crate::config::animation::{LANDING_DURATION, WALK_FRAME_INTERVAL, WALL_CEILING_BOUNCE_VELOCITY};
use crate::config::game::*;
use crate::sim::collision::{self, hits_wall, stands_on_box};
use crate::sim::state::{Movement, RookieContext};
use crate::sim::{Keys, Point, Size};

// sprite sheet columns
const IDLE_FRAME: u8 = 0;
const JUMP_FRAME: u8 = 3;

/// Which surface a landing snapped onto; decides the landing frame
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Surface {
    WallTop,
    BoxTop,
    Ground,
}

impl RookieContext {
    /// Collision size outside of the transformation
    pub fn dimensions(&self) -> Size {
        collision::player_dimensions(self.has_transformed, None)
    }

    pub fn move_speed(&self) -> f64 {
        if self.has_transformed {
            BIG_MOVE_SPEED
        } else {
            MOVE_SPEED
        }
    }

    pub fn jump_power(&self) -> f64 {
        if self.has_transformed {
            JUMP_POWER * BIG_JUMP_MULTIPLIER
        } else {
            JUMP_POWER
        }
    }

    /// Walk cycle alternates columns 1 and 2 every WALK_FRAME_INTERVAL frames
    fn walk_frame(&self) -> u8 {
        ((self.frame_counter / WALK_FRAME_INTERVAL) % 2) as u8 + 1
    }

    /// ::move_horizontally -> left is checked before right.
    /// A rejected move (canvas edge or wall) stops the player in place.
    pub(crate) fn move_horizontally(mut self, keys: &Keys) -> Self {
        let speed = self.move_speed();
        let width = self.dimensions().width;

        let (candidate, direction) = if keys.left && self.position.x > 0.0 {
            let new_x = self.position.x - speed;
            (Some(new_x).filter(|x| *x >= 0.0), Movement::Left)
        } else if keys.right {
            let new_x = self.position.x + speed;
            (
                Some(new_x).filter(|x| x + width <= CANVAS_WIDTH),
                Movement::Right,
            )
        } else {
            self.movement = Movement::Still;
            if self.grounded {
                self.animation_frame = IDLE_FRAME;
            }
            return self;
        };

        let accepted = candidate.filter(|x| !self.blocked_by_wall(*x));
        match accepted {
            Some(x) => {
                self.position.x = x;
                self.movement = direction;
                if self.grounded && !self.jumping {
                    self.animation_frame = self.walk_frame();
                }
            }
            None => self.movement = Movement::Still,
        }
        self
    }

    fn blocked_by_wall(&self, x: f64) -> bool {
        self.is_wall()
            && hits_wall(
                Point {
                    x,
                    y: self.position.y,
                },
                self.dimensions(),
            )
    }

    pub(crate) fn jump(mut self, keys: &Keys) -> Self {
        if keys.jump && self.grounded {
            self.velocity_y = self.jump_power();
            self.grounded = false;
            self.jumping = true;
            self.animation_frame = JUMP_FRAME;
            self.jump_start_frame = self.frame_counter;
        }
        if !self.grounded && self.jumping {
            self.animation_frame = JUMP_FRAME;
        }
        self
    }

    /// ::apply_gravity -> integrate while airborne, then resolve in order :
    /// 1. wall (after the last box hit) : land on top or bounce off its underside
    /// 2. box top : land when not moving upward
    /// 3. ground line
    ///
    /// While grounded, only checks whether the player walked off the box.
    pub(crate) fn apply_gravity(mut self) -> Self {
        let size = self.dimensions();
        if self.grounded {
            let resting_on_box = BOX_Y - size.height;
            if self.position.y == resting_on_box && !stands_on_box(self.position, size) {
                self.grounded = false;
                self.velocity_y = 0.0;
            }
            return self;
        }

        self.velocity_y += GRAVITY;
        let next = Point {
            x: self.position.x,
            y: self.position.y + self.velocity_y,
        };

        if self.is_wall() && hits_wall(next, size) {
            if self.velocity_y > 0.0 {
                self = self.land(BOX_Y - size.height, Surface::WallTop);
            } else if self.velocity_y < 0.0 {
                // keep the head under the wall and start falling right away
                self.position.y = BOX_Y + BOX_HEIGHT;
                self.velocity_y = WALL_CEILING_BOUNCE_VELOCITY;
                self.grounded = false;
                self.jumping = false;
            }
        } else {
            self.position.y = next.y;
        }

        if stands_on_box(self.position, size) && self.velocity_y >= 0.0 {
            self = self.land(BOX_Y - size.height, Surface::BoxTop);
        } else if self.position.y >= GROUND_Y - size.height {
            self = self.land(GROUND_Y - size.height, Surface::Ground);
        }
        self
    }

    fn land(mut self, rest_y: f64, surface: Surface) -> Self {
        self.position.y = rest_y;
        self.velocity_y = 0.0;
        self.grounded = true;
        self.jumping = false;

        let moving = self.movement != Movement::Still;
        match surface {
            Surface::WallTop => {
                if !moving {
                    self.animation_frame = IDLE_FRAME;
                }
            }
            Surface::BoxTop | Surface::Ground => {
                // landing lock : stay idle right after touchdown
                let since_jump = self.frame_counter.wrapping_sub(self.jump_start_frame);
                self.animation_frame = if since_jump < LANDING_DURATION || !moving {
                    IDLE_FRAME
                } else {
                    self.walk_frame()
                };
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const LEFT: Keys = Keys {
        left: true,
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

    fn airborne(x: f64, y: f64, velocity_y: f64) -> RookieContext {
        RookieContext {
            position: Point { x, y },
            velocity_y,
            grounded: false,
            jumping: true,
            ..RookieContext::new()
        }
    }

    #[test]
    fn walking_right_advances_walk_cycle() {
        let mut ctx = RookieContext::new();
        ctx.frame_counter = 8;
        let ctx = ctx.move_horizontally(&RIGHT);
        assert_relative_eq!(ctx.position.x, 103.0);
        assert!(ctx.is_moving_right());
        assert!(!ctx.is_moving_left());
        assert_eq!(ctx.animation_frame, 2);
    }

    #[test]
    fn left_takes_precedence_over_right() {
        let keys = Keys {
            left: true,
            right: true,
            jump: false,
        };
        let ctx = RookieContext::new().move_horizontally(&keys);
        assert_relative_eq!(ctx.position.x, 97.0);
        assert_eq!(ctx.movement, Movement::Left);
    }

    #[test]
    fn both_held_at_left_edge_moves_right() {
        let keys = Keys {
            left: true,
            right: true,
            jump: false,
        };
        let mut ctx = RookieContext::new();
        ctx.position.x = 0.0;
        let ctx = ctx.move_horizontally(&keys);
        assert_relative_eq!(ctx.position.x, 3.0);
        assert_eq!(ctx.movement, Movement::Right);
    }

    #[test]
    fn canvas_edges_reject_movement() {
        let mut ctx = RookieContext::new();
        ctx.position.x = 2.0;
        let ctx = ctx.move_horizontally(&LEFT);
        assert_relative_eq!(ctx.position.x, 2.0);
        assert_eq!(ctx.movement, Movement::Still);

        let mut ctx = RookieContext::new();
        ctx.position.x = CANVAS_WIDTH - PLAYER_WIDTH - 2.0;
        let ctx = ctx.move_horizontally(&RIGHT);
        assert_relative_eq!(ctx.position.x, CANVAS_WIDTH - PLAYER_WIDTH - 2.0);
        assert_eq!(ctx.movement, Movement::Still);
    }

    #[test]
    fn wall_blocks_only_after_five_hits() {
        let mut ctx = RookieContext::new();
        ctx.position = Point { x: 335.0, y: 300.0 };
        let open = ctx.move_horizontally(&RIGHT);
        assert_relative_eq!(open.position.x, 338.0);

        ctx.box_hits = 5;
        ctx.position.x = 337.0;
        let blocked = ctx.move_horizontally(&RIGHT);
        assert_relative_eq!(blocked.position.x, 337.0);
        assert_eq!(blocked.movement, Movement::Still);
    }

    #[test]
    fn no_input_goes_idle_when_grounded() {
        let mut ctx = RookieContext::new();
        ctx.movement = Movement::Right;
        ctx.animation_frame = 2;
        let ctx = ctx.move_horizontally(&Keys::default());
        assert_eq!(ctx.movement, Movement::Still);
        assert_eq!(ctx.animation_frame, IDLE_FRAME);
    }

    #[test]
    fn jump_sets_impulse_and_snapshot() {
        let mut ctx = RookieContext::new();
        ctx.frame_counter = 42;
        let ctx = ctx.jump(&JUMP);
        assert_relative_eq!(ctx.velocity_y, JUMP_POWER);
        assert!(!ctx.grounded);
        assert!(ctx.jumping);
        assert_eq!(ctx.jump_start_frame, 42);
        assert_eq!(ctx.animation_frame, JUMP_FRAME);
    }

    #[test]
    fn transformed_jump_is_stronger() {
        let mut ctx = RookieContext::new();
        ctx.has_transformed = true;
        let ctx = ctx.jump(&JUMP);
        assert_relative_eq!(ctx.velocity_y, -15.525, epsilon = 1e-9);
    }

    #[test]
    fn cannot_jump_in_the_air() {
        let ctx = airborne(100.0, 300.0, 1.0).jump(&JUMP);
        assert_relative_eq!(ctx.velocity_y, 1.0);
    }

    #[test]
    fn gravity_accelerates_airborne_player() {
        let ctx = airborne(100.0, 300.0, -5.0).apply_gravity();
        assert_relative_eq!(ctx.velocity_y, -4.55, epsilon = 1e-9);
        assert_relative_eq!(ctx.position.y, 295.45, epsilon = 1e-9);
        assert!(!ctx.grounded);
    }

    #[test]
    fn lands_exactly_on_ground_line() {
        let ctx = airborne(100.0, GROUND_Y - PLAYER_HEIGHT - 1.0, 5.0).apply_gravity();
        assert!(ctx.grounded);
        assert!(!ctx.jumping);
        assert_eq!(ctx.position.y, GROUND_Y - PLAYER_HEIGHT);
        assert_eq!(ctx.velocity_y, 0.0);
    }

    #[test]
    fn landing_lock_keeps_idle_frame() {
        let mut ctx = airborne(100.0, GROUND_Y - PLAYER_HEIGHT - 1.0, 5.0);
        ctx.movement = Movement::Right;
        ctx.frame_counter = 20;
        ctx.jump_start_frame = 15;
        assert_eq!(ctx.apply_gravity().animation_frame, IDLE_FRAME);

        ctx.jump_start_frame = 0;
        // 20 / 8 = 2 -> column 1
        assert_eq!(ctx.apply_gravity().animation_frame, 1);
    }

    #[test]
    fn lands_on_box_top() {
        let ctx = airborne(380.0, BOX_Y - PLAYER_HEIGHT - 1.0, 0.55).apply_gravity();
        assert!(ctx.grounded);
        assert_eq!(ctx.position.y, BOX_Y - PLAYER_HEIGHT);
    }

    #[test]
    fn walking_off_the_box_starts_a_fall() {
        let mut ctx = RookieContext::new();
        ctx.position = Point {
            x: 470.0,
            y: BOX_Y - PLAYER_HEIGHT,
        };
        let ctx = ctx.apply_gravity();
        assert!(!ctx.grounded);
        assert_eq!(ctx.velocity_y, 0.0);

        let ctx = ctx.apply_gravity();
        assert_relative_eq!(ctx.position.y, BOX_Y - PLAYER_HEIGHT + GRAVITY);
    }

    #[test]
    fn wall_underside_bounces_player_down() {
        let mut ctx = airborne(400.0, 360.0, -10.0);
        ctx.box_hits = 5;
        let ctx = ctx.apply_gravity();
        assert_eq!(ctx.position.y, BOX_Y + BOX_HEIGHT);
        assert_eq!(ctx.velocity_y, WALL_CEILING_BOUNCE_VELOCITY);
        assert!(!ctx.jumping);
        assert!(!ctx.grounded);
    }

    #[test]
    fn falling_onto_wall_lands_on_top() {
        let mut ctx = airborne(400.0, BOX_Y - PLAYER_HEIGHT - 2.0, 3.0);
        ctx.box_hits = 5;
        let ctx = ctx.apply_gravity();
        assert!(ctx.grounded);
        assert_eq!(ctx.position.y, BOX_Y - PLAYER_HEIGHT);
    }
}
