//! The player ship: a position, a size, and horizontal steering clamped to
//! the safe area. Vertical position is fixed for the whole run.

use glam::Vec2;
use sw_core::geom::Rect;

/// How far above the playfield bottom the ship sits.
const SHIP_BOTTOM_OFFSET: f32 = 100.0;

pub struct PlayerShip {
    /// Top-left corner, like every sprite on the field.
    pub position: Vec2,
    pub size: Vec2,
}

impl PlayerShip {
    pub fn new(playfield: Rect, size: Vec2) -> Self {
        let position = Vec2::new(
            playfield.min.x + (playfield.width() - size.x) / 2.0,
            playfield.max.y - SHIP_BOTTOM_OFFSET,
        );
        Self { position, size }
    }

    /// Apply one step of steering intent (-1, 0, +1) and re-clamp.
    pub fn steer(&mut self, move_x: f32, speed: f32, dt: f32, safe_area: &Rect) {
        self.position.x += move_x * speed * dt;
        self.clamp_to(safe_area);
    }

    /// Only X is clamped; the ship never leaves its row.
    pub fn clamp_to(&mut self, safe_area: &Rect) {
        self.position.x = self
            .position
            .x
            .clamp(safe_area.min.x, safe_area.max.x - self.size.x);
    }

    /// Spawn point for a laser: centered on the nose, just above the hull.
    pub fn muzzle(&self, laser_size: Vec2) -> Vec2 {
        Vec2::new(
            self.position.x + (self.size.x - laser_size.x) / 2.0,
            self.position.y - laser_size.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playfield() -> Rect {
        Rect::from_min_size(Vec2::ZERO, Vec2::new(960.0, 540.0))
    }

    #[test]
    fn new_ship_is_centered_near_the_bottom() {
        let ship = PlayerShip::new(playfield(), Vec2::new(48.0, 32.0));
        assert_eq!(ship.position.x, (960.0 - 48.0) / 2.0);
        assert_eq!(ship.position.y, 540.0 - 100.0);
    }

    #[test]
    fn steering_moves_horizontally_only() {
        let safe = playfield().inset_fraction(0.05);
        let mut ship = PlayerShip::new(playfield(), Vec2::new(48.0, 32.0));
        let start_y = ship.position.y;
        ship.steer(1.0, 300.0, 1.0 / 60.0, &safe);
        assert!(ship.position.x > (960.0 - 48.0) / 2.0);
        assert_eq!(ship.position.y, start_y);
    }

    #[test]
    fn clamp_stops_at_both_safe_area_edges() {
        let safe = playfield().inset_fraction(0.05);
        let mut ship = PlayerShip::new(playfield(), Vec2::new(48.0, 32.0));

        for _ in 0..2000 {
            ship.steer(-1.0, 300.0, 1.0 / 60.0, &safe);
        }
        assert_eq!(ship.position.x, safe.min.x);

        for _ in 0..2000 {
            ship.steer(1.0, 300.0, 1.0 / 60.0, &safe);
        }
        assert_eq!(ship.position.x, safe.max.x - ship.size.x);
    }

    #[test]
    fn muzzle_centers_the_laser_above_the_hull() {
        let ship = PlayerShip::new(playfield(), Vec2::new(48.0, 32.0));
        let muzzle = ship.muzzle(Vec2::new(4.0, 16.0));
        assert_eq!(muzzle.x, ship.position.x + 22.0);
        assert_eq!(muzzle.y, ship.position.y - 16.0);
    }
}
