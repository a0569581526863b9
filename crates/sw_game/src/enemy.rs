//! The enemy wave: a single marching row sharing one sprite, color, speed
//! and collision radius.
//!
//! The wave is anchored to an origin point. Marching moves the anchor and
//! every enemy by the same delta; the reversal bounds test the anchor, not
//! the individual ships, so the row keeps its shape no matter how many of
//! its members are gone. An emptied row respawns immediately from wherever
//! the anchor currently is, with a fresh random count and the color keyed
//! to that count.

use glam::Vec2;
use rand::Rng;

use sw_core::geom::circle_contains;

use crate::tuning::WaveTuning;

pub struct EnemyWave {
    positions: Vec<Vec2>,
    origin: Vec2,
    speed: f32,
    color: [f32; 4],
    spawned_count: u32,
    sprite_size: Vec2,
}

impl EnemyWave {
    pub fn spawn(tuning: &WaveTuning, sprite_size: Vec2, rng: &mut impl Rng) -> Self {
        let mut wave = Self {
            positions: Vec::new(),
            origin: Vec2::new(tuning.origin_x, tuning.origin_y),
            speed: tuning.speed,
            color: [1.0; 4],
            spawned_count: 0,
            sprite_size,
        };
        wave.populate(tuning, rng);
        wave
    }

    fn populate(&mut self, tuning: &WaveTuning, rng: &mut impl Rng) {
        let count = rng.gen_range(tuning.min_count..=tuning.max_count);

        let mut position = self.origin;
        position.x -= self.sprite_size.x / 2.0;
        for _ in 0..count {
            self.positions.push(position);
            position.x += self.sprite_size.x + tuning.spacing;
        }

        self.color = color_for_count(count);
        self.spawned_count = count;
        log::debug!("Wave spawned: {count} enemies");
    }

    /// One fixed step of marching. Order matters: advance the anchor,
    /// reverse at the bounds, respawn an empty row, then move every enemy
    /// with the (possibly reversed) speed, the freshly spawned included.
    pub fn march(&mut self, dt: f32, tuning: &WaveTuning, rng: &mut impl Rng) {
        self.origin.x += self.speed * dt;

        if self.origin.x > tuning.march_max_x {
            self.speed = -self.speed.abs();
        } else if self.origin.x < tuning.march_min_x {
            self.speed = self.speed.abs();
        }

        if self.positions.is_empty() {
            self.populate(tuning, rng);
        }

        let delta = self.speed * dt;
        for position in &mut self.positions {
            position.x += delta;
        }
    }

    /// Collision radius: the larger sprite dimension. Generous on purpose,
    /// since positions are sprite corners rather than centers.
    pub fn radius(&self) -> f32 {
        self.sprite_size.x.max(self.sprite_size.y)
    }

    /// Index of the first enemy within collision radius of `point`.
    pub fn first_hit(&self, point: Vec2) -> Option<usize> {
        let radius = self.radius();
        self.positions
            .iter()
            .position(|&enemy| circle_contains(enemy, radius, point))
    }

    pub fn destroy(&mut self, index: usize) {
        self.positions.remove(index);
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn spawned_count(&self) -> u32 {
        self.spawned_count
    }

    pub fn sprite_size(&self) -> Vec2 {
        self.sprite_size
    }

    #[cfg(test)]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[cfg(test)]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }
}

/// Wave color keyed by spawn count, 3 through 10. The doubled yellow at 8
/// is intentional.
pub fn color_for_count(count: u32) -> [f32; 4] {
    match count {
        3 => [1.0, 0.0, 0.0, 1.0],
        4 => [0.0, 0.5, 0.0, 1.0],
        5 => [1.0, 1.0, 0.0, 1.0],
        6 => [0.0, 0.0, 1.0, 1.0],
        7 => [1.0, 0.0, 1.0, 1.0],
        8 => [1.0, 1.0, 0.0, 1.0],
        9 => [1.0, 1.0, 1.0, 1.0],
        10 => [0.0, 0.4, 0.0, 1.0],
        _ => [1.0, 1.0, 1.0, 1.0],
    }
}
