//! Laser bookkeeping: advance the volley, expire shots that leave the top of
//! the screen, and resolve hits against the wave. One pass per fixed step.

use glam::Vec2;

use crate::enemy::EnemyWave;

pub struct Laser {
    /// Top-left corner.
    pub position: Vec2,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VolleyReport {
    pub kills: u32,
    pub expired: u32,
}

/// Advance every laser by one step. A laser dies either by leaving the screen
/// or by hitting an enemy; a hit removes exactly one enemy (the first within
/// radius) and both removals happen in the same step, so a single shot can
/// never score twice.
pub fn advance_lasers(
    lasers: &mut Vec<Laser>,
    wave: &mut EnemyWave,
    speed: f32,
    dt: f32,
    laser_height: f32,
) -> VolleyReport {
    let mut report = VolleyReport::default();

    let mut index = 0;
    while index < lasers.len() {
        lasers[index].position.y -= speed * dt;

        if lasers[index].position.y + laser_height < 0.0 {
            lasers.remove(index);
            report.expired += 1;
            continue;
        }

        if let Some(hit) = wave.first_hit(lasers[index].position) {
            wave.destroy(hit);
            lasers.remove(index);
            report.kills += 1;
            continue;
        }

        index += 1;
    }

    report
}
