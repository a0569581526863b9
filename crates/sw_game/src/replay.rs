//! Scripted-input replays for exercising the gameplay simulation headless.
//! Compiled only for tests.

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayScript {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub move_x: f32,
    #[serde(default)]
    pub fire: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplayScript {
    /// Flatten to one `(move_x, fire)` intent per fixed step.
    pub fn expanded_inputs(&self) -> Vec<(f32, bool)> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push((frame.move_x.clamp(-1.0, 1.0), frame.fire));
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplayScript, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let script: ReplayScript = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&script)?;
    Ok(script)
}

fn validate_replay(script: &ReplayScript) -> Result<(), String> {
    if script.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if script.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioBank;
    use crate::gameplay::GameplayScreen;
    use crate::tuning::{GameTuning, WaveTuning};
    use glam::Vec2;
    use std::time::{SystemTime, UNIX_EPOCH};
    use sw_core::geom::Rect;

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "sw_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn playfield() -> Rect {
        Rect::from_min_size(Vec2::ZERO, Vec2::new(960.0, 540.0))
    }

    fn run_script(screen: &mut GameplayScreen, script: &ReplayScript) {
        let audio = AudioBank::disabled();
        for (move_x, fire) in script.expanded_inputs() {
            screen.step(move_x, fire, script.fixed_dt, &audio);
        }
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "move_x": 1.0, "repeat": 3 },
                { "fire": true }
              ]
            }"#,
        )
        .expect("write replay file");

        let script = load_replay_from_path(&path).expect("replay should load");
        let expanded = script.expanded_inputs();
        assert_eq!(expanded.len(), 4);
        assert_eq!(expanded[0], (1.0, false));
        assert_eq!(expanded[3], (0.0, true));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_empty_frames() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");

        let err = load_replay_from_path(&path).expect_err("empty frames should fail");
        assert!(err.contains("frames list is empty"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn identical_seeds_replay_to_identical_state() {
        let path = temp_file_path("deterministic");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "move_x": 1.0, "repeat": 60 },
                { "move_x": 1.0, "fire": true },
                { "repeat": 120 },
                { "fire": true },
                { "move_x": -1.0, "repeat": 90 },
                { "fire": true },
                { "repeat": 180 }
              ]
            }"#,
        )
        .expect("write replay file");

        let script = load_replay_from_path(&path).expect("replay should load");

        let mut run_a = GameplayScreen::with_tuning(playfield(), GameTuning::default(), 99);
        let mut run_b = GameplayScreen::with_tuning(playfield(), GameTuning::default(), 99);
        run_script(&mut run_a, &script);
        run_script(&mut run_b, &script);

        assert_eq!(run_a.score(), run_b.score());
        assert_eq!(run_a.laser_count(), run_b.laser_count());
        assert_eq!(run_a.wave().len(), run_b.wave().len());
        assert_eq!(run_a.wave().spawned_count(), run_b.wave().spawned_count());
        assert!((run_a.ship().position.x - run_b.ship().position.x).abs() < 1e-6);
        for (a, b) in run_a
            .wave()
            .positions()
            .iter()
            .zip(run_b.wave().positions())
        {
            assert!((a.x - b.x).abs() < 1e-6);
            assert!((a.y - b.y).abs() < 1e-6);
        }

        let _ = fs::remove_file(path);
    }

    #[test]
    fn scripted_shot_downs_one_enemy() {
        // Wave pinned under the ship's firing line: five enemies anchored at
        // x=400 puts the third at x=478, exactly the muzzle column. The shot
        // catches the second enemy as the row marches right.
        let tuning = GameTuning {
            wave: WaveTuning {
                min_count: 5,
                max_count: 5,
                origin_x: 400.0,
                march_min_x: 350.0,
                march_max_x: 450.0,
                ..WaveTuning::default()
            },
            ..GameTuning::default()
        };
        let mut screen = GameplayScreen::with_tuning(playfield(), tuning, 1);
        assert_eq!(screen.wave().len(), 5);

        let script = ReplayScript {
            fixed_dt: 1.0 / 60.0,
            frames: vec![
                ReplayFrame {
                    move_x: 0.0,
                    fire: true,
                    repeat: 1,
                },
                ReplayFrame {
                    move_x: 0.0,
                    fire: false,
                    repeat: 40,
                },
            ],
        };
        run_script(&mut screen, &script);

        assert_eq!(screen.score(), 1, "the volley should have scored");
        assert_eq!(screen.wave().len(), 4);
        assert_eq!(screen.laser_count(), 0, "the laser dies with its target");
    }

    #[test]
    fn holding_fire_every_step_spawns_a_laser_per_step() {
        let mut screen = GameplayScreen::with_tuning(playfield(), GameTuning::default(), 3);
        let audio = AudioBank::disabled();
        for _ in 0..5 {
            screen.step(0.0, true, 1.0 / 60.0, &audio);
        }
        // No hits possible this early and nothing expires in five steps.
        assert_eq!(screen.laser_count(), 5);
    }
}
