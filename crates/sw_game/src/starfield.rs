//! Scrolling starfield backdrop.
//!
//! Stars carry a depth factor that scales both drift speed and brightness,
//! which reads as parallax even though everything lives on one layer. A star
//! that drifts off the bottom re-enters at the top in a fresh column.

use glam::Vec2;
use rand::Rng;

const BASE_SCROLL_SPEED: f32 = 40.0;
const MIN_DEPTH: f32 = 0.3;

pub struct Star {
    pub position: Vec2,
    /// 0.3..=1.0; far stars are slow and dim.
    pub depth: f32,
}

pub struct Starfield {
    stars: Vec<Star>,
    width: f32,
    height: f32,
}

impl Starfield {
    pub fn new(width: f32, height: f32, count: usize, rng: &mut impl Rng) -> Self {
        let stars = (0..count)
            .map(|_| Star {
                position: Vec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height)),
                depth: rng.gen_range(MIN_DEPTH..=1.0),
            })
            .collect();
        Self {
            stars,
            width,
            height,
        }
    }

    pub fn scroll(&mut self, dt: f32, rng: &mut impl Rng) {
        for star in &mut self.stars {
            star.position.y += BASE_SCROLL_SPEED * star.depth * dt;
            if star.position.y > self.height {
                star.position.y -= self.height;
                star.position.x = rng.gen_range(0.0..self.width);
            }
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn stars_spawn_inside_the_field() {
        let mut rng = StdRng::seed_from_u64(9);
        let field = Starfield::new(960.0, 540.0, 80, &mut rng);
        assert_eq!(field.stars().len(), 80);
        for star in field.stars() {
            assert!((0.0..960.0).contains(&star.position.x));
            assert!((0.0..540.0).contains(&star.position.y));
            assert!((MIN_DEPTH..=1.0).contains(&star.depth));
        }
    }

    #[test]
    fn stars_stay_inside_after_long_scrolling() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut field = Starfield::new(960.0, 540.0, 40, &mut rng);
        for _ in 0..(60 * 120) {
            field.scroll(1.0 / 60.0, &mut rng);
        }
        for star in field.stars() {
            assert!((0.0..960.0).contains(&star.position.x));
            assert!(star.position.y <= 540.0 + 1.0);
        }
    }

    #[test]
    fn deeper_stars_drift_faster() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = Starfield::new(960.0, 540.0, 2, &mut rng);
        field.stars[0].position = Vec2::new(100.0, 100.0);
        field.stars[0].depth = 1.0;
        field.stars[1].position = Vec2::new(200.0, 100.0);
        field.stars[1].depth = MIN_DEPTH;

        field.scroll(1.0, &mut rng);
        let fast = field.stars()[0].position.y - 100.0;
        let slow = field.stars()[1].position.y - 100.0;
        assert!(fast > slow);
    }
}
