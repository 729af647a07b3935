//! Geometric predicates between the player, the box (or wall) and the cup.
//!
//! Nothing here mutates state. Positions are top-left corners in canvas
//! pixels, y grows downward.
use crate::config::game::*;
use crate::sim::{Point, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(position: Point, size: Size) -> Self {
        Rect { position, size }
    }

    pub fn left(&self) -> f64 {
        self.position.x
    }

    pub fn right(&self) -> f64 {
        self.position.x + self.size.width
    }

    pub fn top(&self) -> f64 {
        self.position.y
    }

    pub fn bottom(&self) -> f64 {
        self.position.y + self.size.height
    }

    /// Strict AABB overlap: touching edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

pub const fn box_rect() -> Rect {
    Rect::new(
        Point { x: BOX_X, y: BOX_Y },
        Size {
            width: BOX_WIDTH,
            height: BOX_HEIGHT,
        },
    )
}

/// Collision size of the player.
/// `transforming_size` is the scale factor while the transformation runs,
/// during which the small sprite is scaled instead of swapped.
pub fn player_dimensions(has_transformed: bool, transforming_size: Option<f64>) -> Size {
    match (transforming_size, has_transformed) {
        (Some(scale), _) => Size {
            width: PLAYER_WIDTH * scale,
            height: PLAYER_HEIGHT * scale,
        },
        (None, true) => Size {
            width: BIG_PLAYER_WIDTH,
            height: BIG_PLAYER_HEIGHT,
        },
        (None, false) => Size {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
        },
    }
}

/// Distance between the collision box top and the drawn sprite top
pub fn sprite_offset(has_transformed: bool) -> f64 {
    if has_transformed {
        BIG_SPRITE_Y_OFFSET
    } else {
        SPRITE_Y_OFFSET
    }
}

/// Head bump against the underside of the box.
/// Uses the sprite-offset (visual) box, with 5px of horizontal forgiveness
/// and a 30px band under the box bottom.
pub fn hits_box_from_below(position: Point, size: Size, has_transformed: bool) -> bool {
    let offset = sprite_offset(has_transformed);
    let player_left = position.x;
    let player_right = position.x + size.width;
    let player_top = position.y + offset;
    let player_bottom = position.y + size.height + offset;
    let block = box_rect();

    let horizontal_overlap =
        player_right > block.left() + 5.0 && player_left < block.right() - 5.0;
    let head_at_bottom = player_top <= block.bottom() && player_top >= block.bottom() - 30.0;
    let below_box = player_bottom > block.top() + 10.0;

    horizontal_overlap && head_at_bottom && below_box
}

/// Feet resting on the box top, within 1px
pub fn stands_on_box(position: Point, size: Size) -> bool {
    let player_bottom = position.y + size.height;
    let player_right = position.x + size.width;
    let block = box_rect();

    player_right > block.left() + 1.0
        && position.x < block.right() - 1.0
        && (player_bottom - block.top()).abs() <= 1.0
        && position.y < block.top()
}

/// Solid wall test, only meaningful once the box has turned into a wall
pub fn hits_wall(position: Point, size: Size) -> bool {
    Rect::new(position, size).intersects(&box_rect())
}

/// Cup pickup, using the plain small-player box (no sprite offset)
pub fn touches_cup(player: Point, cup: Point) -> bool {
    let player = Rect::new(
        player,
        Size {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
        },
    );
    let cup = Rect::new(
        cup,
        Size {
            width: CUP_SIZE,
            height: CUP_SIZE,
        },
    );
    player.intersects(&cup)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: Size = Size {
        width: PLAYER_WIDTH,
        height: PLAYER_HEIGHT,
    };

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(Point { x: 0.0, y: 0.0 }, Size { width: 10.0, height: 10.0 });
        let b = Rect::new(Point { x: 10.0, y: 0.0 }, Size { width: 10.0, height: 10.0 });
        assert!(!a.intersects(&b));
        let c = Rect::new(Point { x: 9.5, y: 9.5 }, Size { width: 10.0, height: 10.0 });
        assert!(a.intersects(&c));
    }

    #[test]
    fn head_bump_needs_visual_top_inside_band() {
        // visual top = y + 16 must sit within [324, 354]
        assert!(hits_box_from_below(Point { x: 400.0, y: 330.0 }, SMALL, false));
        assert!(hits_box_from_below(Point { x: 400.0, y: 338.0 }, SMALL, false));
        assert!(!hits_box_from_below(Point { x: 400.0, y: 339.0 }, SMALL, false));
        assert!(!hits_box_from_below(Point { x: 400.0, y: 300.0 }, SMALL, false));
    }

    #[test]
    fn head_bump_has_horizontal_margin() {
        // right edge must pass box_left + 5
        assert!(!hits_box_from_below(Point { x: 341.0, y: 330.0 }, SMALL, false));
        assert!(hits_box_from_below(Point { x: 342.0, y: 330.0 }, SMALL, false));
        // left edge must stay before box_right - 5
        assert!(hits_box_from_below(Point { x: 458.0, y: 330.0 }, SMALL, false));
        assert!(!hits_box_from_below(Point { x: 459.0, y: 330.0 }, SMALL, false));
    }

    #[test]
    fn head_bump_uses_bigger_offset_after_transformation() {
        let big = player_dimensions(true, None);
        // visual top = y + 20
        assert!(hits_box_from_below(Point { x: 400.0, y: 334.0 }, big, true));
        assert!(!hits_box_from_below(Point { x: 400.0, y: 335.0 }, big, true));
    }

    #[test]
    fn standing_on_box_has_tight_tolerance() {
        let resting = Point { x: 380.0, y: BOX_Y - PLAYER_HEIGHT };
        assert!(stands_on_box(resting, SMALL));
        assert!(stands_on_box(Point { y: resting.y + 1.0, ..resting }, SMALL));
        assert!(!stands_on_box(Point { y: resting.y + 1.5, ..resting }, SMALL));
        assert!(!stands_on_box(Point { y: resting.y - 1.5, ..resting }, SMALL));
        // fully past the right edge
        assert!(!stands_on_box(Point { x: 463.0, ..resting }, SMALL));
    }

    #[test]
    fn wall_is_a_plain_aabb() {
        assert!(hits_wall(Point { x: 340.0, y: 300.0 }, SMALL));
        assert!(!hits_wall(Point { x: 336.0, y: 300.0 }, SMALL));
        assert!(!hits_wall(Point { x: 400.0, y: BOX_Y + BOX_HEIGHT }, SMALL));
    }

    #[test]
    fn cup_pickup_ignores_sprite_offset() {
        let cup = Point { x: 550.0, y: GROUND_Y - CUP_SIZE };
        let on_ground = Point { x: 500.0, y: GROUND_Y - PLAYER_HEIGHT };
        assert!(touches_cup(on_ground, cup));
        assert!(!touches_cup(Point { x: 486.0, ..on_ground }, cup));
        assert!(!touches_cup(Point { x: 594.0, ..on_ground }, cup));
    }

    #[test]
    fn dimensions_follow_transformation() {
        assert_eq!(player_dimensions(false, None), SMALL);
        assert_eq!(
            player_dimensions(true, None),
            Size {
                width: BIG_PLAYER_WIDTH,
                height: BIG_PLAYER_HEIGHT
            }
        );
        let scaled = player_dimensions(false, Some(1.25));
        assert_eq!(scaled.width, 80.0);
        assert_eq!(scaled.height, 80.0);
    }
}
