//! Celebration confetti. Purely decorative and never part of the simulated
//! state: each frame's scatter is derived from a seed and the frame counter.
use crate::config::assets::{CONFETTI_COLORS, CONFETTI_COUNT};
use crate::sim::Size;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Square,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ConfettiParticle {
    pub x: f64,
    pub y: f64,
    pub color: &'static str,
    pub size: f64,
    pub shape: Shape,
    pub opacity: f64,
    /// degrees
    pub rotation: f64,
}

pub fn generate<R: Rng>(rng: &mut R, area: Size) -> Vec<ConfettiParticle> {
    (0..CONFETTI_COUNT)
        .map(|_| ConfettiParticle {
            x: rng.gen_range(0.0..area.width),
            y: rng.gen_range(0.0..area.height),
            color: CONFETTI_COLORS[rng.gen_range(0..CONFETTI_COLORS.len())],
            size: rng.gen_range(5.0..15.0),
            shape: if rng.gen_bool(0.5) {
                Shape::Circle
            } else {
                Shape::Square
            },
            opacity: rng.gen_range(0.2..1.0),
            rotation: rng.gen_range(0.0..360.0),
        })
        .collect()
}

/// The scatter for one simulated frame. Drawing the same frame twice gives
/// the same particles; the next frame gives a fresh scatter.
pub fn for_frame(seed: u64, frame_counter: u32, area: Size) -> Vec<ConfettiParticle> {
    let mut rng = Pcg32::seed_from_u64(seed ^ u64::from(frame_counter));
    generate(&mut rng, area)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Size = Size {
        width: 800.0,
        height: 500.0,
    };

    #[test]
    fn particles_stay_inside_area_and_ranges() {
        let mut rng = Pcg32::seed_from_u64(5);
        let area = Size {
            width: 800.0,
            height: 500.0,
        };
        let particles = generate(&mut rng, area);
        assert_eq!(particles.len(), CONFETTI_COUNT);
        for particle in &particles {
            assert!((0.0..800.0).contains(&particle.x));
            assert!((0.0..500.0).contains(&particle.y));
            assert!((5.0..15.0).contains(&particle.size));
            assert!((0.2..1.0).contains(&particle.opacity));
            assert!(CONFETTI_COLORS.contains(&particle.color));
        }
    }

    #[test]
    fn both_shapes_show_up() {
        let mut rng = Pcg32::seed_from_u64(5);
        let particles = generate(
            &mut rng,
            Size {
                width: 10.0,
                height: 10.0,
            },
        );
        assert!(particles.iter().any(|p| p.shape == Shape::Circle));
        assert!(particles.iter().any(|p| p.shape == Shape::Square));
    }

    #[test]
    fn redrawing_a_frame_repeats_its_scatter() {
        assert_eq!(for_frame(42, 300, AREA), for_frame(42, 300, AREA));
        assert_ne!(for_frame(42, 300, AREA), for_frame(42, 301, AREA));
        assert_ne!(for_frame(42, 300, AREA), for_frame(43, 300, AREA));
    }
}
