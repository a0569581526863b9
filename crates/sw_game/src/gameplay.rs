//! The gameplay screen: ship, wave, lasers, score.
//!
//! Input is split from simulation the way the screen stack expects:
//! `handle_input` (focused screens only) records steering and fire intent,
//! `update` consumes it for exactly one fixed step. While the pause popup
//! holds focus the whole simulation freezes — enemies, lasers and starfield
//! alike.
//!
//! All randomness (wave sizes, star columns) flows through one seedable RNG
//! owned by the screen, so a seeded screen driven by a scripted input
//! sequence is fully deterministic. The shipping game seeds from entropy.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use sw_core::geom::Rect;
use sw_core::input::Key;
use sw_render::{GlyphFont, SpriteBatch};

use crate::audio::AudioBank;
use crate::enemy::EnemyWave;
use crate::laser::{advance_lasers, Laser};
use crate::menu::PauseMenuScreen;
use crate::player::PlayerShip;
use crate::screen::{Screen, ScreenCommand, SimStats, UpdateCtx};
use crate::sprites;
use crate::starfield::Starfield;
use crate::tuning::{load_tuning_from_path, GameTuning, TuningWatcher, TUNING_PATH};

/// Entity footprints, locked to the built-in sprite art dimensions.
pub const SHIP_SIZE: Vec2 = Vec2::new(48.0, 32.0);
pub const ENEMY_SIZE: Vec2 = Vec2::new(32.0, 32.0);
pub const LASER_SIZE: Vec2 = Vec2::new(4.0, 16.0);

const SAFE_AREA_FRACTION: f32 = 0.05;
const STAR_COUNT: usize = 90;
const SCORE_POSITION: Vec2 = Vec2::new(25.0, 25.0);
const SCORE_SCALE: f32 = 2.0;

pub struct GameplayScreen {
    tuning: GameTuning,
    tuning_watcher: TuningWatcher,
    ship: PlayerShip,
    lasers: Vec<Laser>,
    wave: EnemyWave,
    starfield: Starfield,
    score: u32,
    rng: StdRng,
    playfield: Rect,
    safe_area: Rect,
    move_intent: f32,
    fire_intent: bool,
}

impl GameplayScreen {
    pub fn new(playfield: Rect) -> Self {
        let tuning = match load_tuning_from_path(std::path::Path::new(TUNING_PATH)) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Using built-in tuning: {e}");
                GameTuning::default()
            }
        };
        Self::with_tuning(playfield, tuning, rand::random())
    }

    pub fn with_tuning(playfield: Rect, tuning: GameTuning, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let safe_area = playfield.inset_fraction(SAFE_AREA_FRACTION);
        let ship = PlayerShip::new(playfield, SHIP_SIZE);
        let wave = EnemyWave::spawn(&tuning.wave, ENEMY_SIZE, &mut rng);
        let starfield = Starfield::new(
            playfield.width(),
            playfield.height(),
            STAR_COUNT,
            &mut rng,
        );

        Self {
            tuning,
            tuning_watcher: TuningWatcher::new(TUNING_PATH.into()),
            ship,
            lasers: Vec::new(),
            wave,
            starfield,
            score: 0,
            rng,
            playfield,
            safe_area,
            move_intent: 0.0,
            fire_intent: false,
        }
    }

    /// One fixed simulation step.
    pub fn step(&mut self, move_x: f32, fire: bool, dt: f32, audio: &AudioBank) {
        self.ship
            .steer(move_x, self.tuning.ship.speed, dt, &self.safe_area);

        if fire {
            self.lasers.push(Laser {
                position: self.ship.muzzle(LASER_SIZE),
            });
            audio.play_laser();
        }

        self.wave.march(dt, &self.tuning.wave, &mut self.rng);

        let report = advance_lasers(
            &mut self.lasers,
            &mut self.wave,
            self.tuning.laser.speed,
            dt,
            LASER_SIZE.y,
        );
        self.score += report.kills;
        for _ in 0..report.kills {
            audio.play_explosion();
        }
        if report.expired > 0 {
            log::trace!("{} lasers left the field", report.expired);
        }

        self.starfield.scroll(dt, &mut self.rng);
    }

    fn reload_tuning(&mut self, reason: &str) {
        match load_tuning_from_path(self.tuning_watcher.path()) {
            Ok(tuning) => {
                self.tuning = tuning;
                log::info!("Tuning reloaded ({reason})");
            }
            Err(e) => {
                log::error!("Tuning reload failed ({reason}), keeping previous values: {e}");
            }
        }
    }

    #[cfg(test)]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[cfg(test)]
    pub fn ship(&self) -> &PlayerShip {
        &self.ship
    }

    #[cfg(test)]
    pub fn wave(&self) -> &EnemyWave {
        &self.wave
    }

    #[cfg(test)]
    pub fn laser_count(&self) -> usize {
        self.lasers.len()
    }
}

impl Screen for GameplayScreen {
    fn transition_on_secs(&self) -> f32 {
        1.5
    }

    fn transition_off_secs(&self) -> f32 {
        0.5
    }

    fn handle_input(&mut self, ctx: &UpdateCtx, commands: &mut Vec<ScreenCommand>) {
        if ctx.input.is_just_pressed(Key::Escape) || ctx.input.is_just_pressed(Key::P) {
            commands.push(ScreenCommand::Push(Box::new(PauseMenuScreen::new())));
            return;
        }
        if ctx.input.is_just_pressed(Key::R) {
            self.reload_tuning("manual trigger (R)");
        }

        let mut move_x = 0.0;
        if ctx.input.is_held(Key::Left) || ctx.input.is_held(Key::A) {
            move_x -= 1.0;
        }
        if ctx.input.is_held(Key::Right) || ctx.input.is_held(Key::D) {
            move_x += 1.0;
        }
        self.move_intent = move_x;
        self.fire_intent = ctx.input.is_just_pressed(Key::Space);
    }

    fn update(&mut self, ctx: &UpdateCtx, has_focus: bool, _covered: bool) {
        if self.tuning_watcher.should_reload() {
            self.reload_tuning("file watcher");
        }

        if has_focus {
            let move_x = self.move_intent;
            let fire = std::mem::take(&mut self.fire_intent);
            self.step(move_x, fire, ctx.dt, ctx.audio);
        } else {
            // Stale intent must not replay when focus returns after a pause.
            self.move_intent = 0.0;
            self.fire_intent = false;
        }
    }

    fn draw(&self, batch: &mut SpriteBatch, font: &GlyphFont, _playfield: Rect, alpha: f32) {
        for star in self.starfield.stars() {
            let brightness = 0.3 + 0.7 * star.depth;
            batch.quad(
                sprites::STAR,
                star.position,
                Vec2::splat(2.0),
                [brightness, brightness, brightness, alpha],
            );
        }

        batch.quad(
            sprites::SHIP,
            self.ship.position,
            self.ship.size,
            [1.0, 1.0, 1.0, alpha],
        );

        for laser in &self.lasers {
            batch.quad(
                sprites::LASER,
                laser.position,
                LASER_SIZE,
                [0.2, 1.0, 0.2, alpha],
            );
        }

        let [r, g, b, _] = self.wave.color();
        for &enemy in self.wave.positions() {
            batch.quad(
                sprites::ENEMY,
                enemy,
                self.wave.sprite_size(),
                [r, g, b, alpha],
            );
        }

        batch.text(
            font,
            &format!("HIGHSCORE: {}", self.score),
            SCORE_POSITION,
            SCORE_SCALE,
            [1.0, 1.0, 1.0, alpha],
        );
    }

    fn sim_stats(&self) -> Option<SimStats> {
        Some(SimStats {
            enemy_count: self.wave.len() as u32,
            wave_size: self.wave.spawned_count(),
            laser_count: self.lasers.len() as u32,
            score: self.score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playfield() -> Rect {
        Rect::from_min_size(Vec2::ZERO, Vec2::new(960.0, 540.0))
    }

    fn screen_with_seed(seed: u64) -> GameplayScreen {
        GameplayScreen::with_tuning(playfield(), GameTuning::default(), seed)
    }

    #[test]
    fn entity_sizes_match_builtin_art() {
        for (key, size) in [
            (sprites::SHIP, SHIP_SIZE),
            (sprites::ENEMY, ENEMY_SIZE),
            (sprites::LASER, LASER_SIZE),
        ] {
            let art = sprites::builtin_art(key).expect("art exists");
            assert_eq!(art.width as f32, size.x, "{key} width");
            assert_eq!(art.height as f32, size.y, "{key} height");
        }
    }

    #[test]
    fn firing_spawns_one_laser_per_edge() {
        let audio = AudioBank::disabled();
        let mut screen = screen_with_seed(4);
        screen.step(0.0, true, 1.0 / 60.0, &audio);
        assert_eq!(screen.laser_count(), 1);

        // Holding fire without a fresh edge adds nothing.
        screen.step(0.0, false, 1.0 / 60.0, &audio);
        assert_eq!(screen.laser_count(), 1);
    }

    #[test]
    fn ship_stays_inside_the_safe_area_forever() {
        let audio = AudioBank::disabled();
        let mut screen = screen_with_seed(4);
        let safe = playfield().inset_fraction(SAFE_AREA_FRACTION);

        for _ in 0..(60 * 10) {
            screen.step(1.0, false, 1.0 / 60.0, &audio);
        }
        assert_eq!(screen.ship().position.x, safe.max.x - SHIP_SIZE.x);

        for _ in 0..(60 * 10) {
            screen.step(-1.0, false, 1.0 / 60.0, &audio);
        }
        assert_eq!(screen.ship().position.x, safe.min.x);
    }

    #[test]
    fn wave_never_stays_empty_across_a_step() {
        let audio = AudioBank::disabled();
        let mut screen = screen_with_seed(8);
        // Long unattended run: the wave marches, occasionally bounces, and
        // must always hold at least one enemy after every step.
        for _ in 0..(60 * 30) {
            screen.step(0.0, false, 1.0 / 60.0, &audio);
            assert!(!screen.wave().is_empty());
        }
    }
}
