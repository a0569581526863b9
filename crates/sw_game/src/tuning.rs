//! Gameplay tuning: every hand-picked constant in one serde-backed struct.
//!
//! The file is optional. A missing `assets/tuning/starward.json` means
//! compiled defaults; a present-but-invalid file is rejected whole so a typo
//! cannot half-apply. During gameplay the file is watched by mtime polling
//! and reloaded at fixed-step boundaries, keeping the old values when the
//! new ones fail validation.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const TUNING_PATH: &str = "assets/tuning/starward.json";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GameTuning {
    #[serde(default)]
    pub ship: ShipTuning,
    #[serde(default)]
    pub laser: LaserTuning,
    #[serde(default)]
    pub wave: WaveTuning,
    #[serde(default)]
    pub audio: AudioTuning,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShipTuning {
    /// Horizontal speed in px/s.
    #[serde(default = "default_ship_speed")]
    pub speed: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LaserTuning {
    /// Upward speed in px/s.
    #[serde(default = "default_laser_speed")]
    pub speed: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WaveTuning {
    /// March speed in px/s. Sign is managed at runtime; this is the magnitude.
    #[serde(default = "default_wave_speed")]
    pub speed: f32,
    /// Inclusive bounds on the per-wave enemy count.
    #[serde(default = "default_min_count")]
    pub min_count: u32,
    #[serde(default = "default_max_count")]
    pub max_count: u32,
    /// Gap between enemies beyond their sprite width.
    #[serde(default = "default_spacing")]
    pub spacing: f32,
    /// Where the wave anchor starts.
    #[serde(default = "default_origin_x")]
    pub origin_x: f32,
    #[serde(default = "default_origin_y")]
    pub origin_y: f32,
    /// March reversal bounds for the anchor.
    #[serde(default = "default_march_min_x")]
    pub march_min_x: f32,
    #[serde(default = "default_march_max_x")]
    pub march_max_x: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AudioTuning {
    #[serde(default = "default_master_volume")]
    pub master_volume: f32,
}

impl Default for ShipTuning {
    fn default() -> Self {
        Self {
            speed: default_ship_speed(),
        }
    }
}

impl Default for LaserTuning {
    fn default() -> Self {
        Self {
            speed: default_laser_speed(),
        }
    }
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            speed: default_wave_speed(),
            min_count: default_min_count(),
            max_count: default_max_count(),
            spacing: default_spacing(),
            origin_x: default_origin_x(),
            origin_y: default_origin_y(),
            march_min_x: default_march_min_x(),
            march_max_x: default_march_max_x(),
        }
    }
}

impl Default for AudioTuning {
    fn default() -> Self {
        Self {
            master_volume: default_master_volume(),
        }
    }
}

pub fn load_tuning_from_path(path: &Path) -> Result<GameTuning, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let tuning: GameTuning = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse tuning JSON {}: {e}", path.display()))?;
    validate_tuning(&tuning)?;
    Ok(tuning)
}

fn validate_tuning(tuning: &GameTuning) -> Result<(), String> {
    if tuning.ship.speed <= 0.0 {
        return Err("Tuning validation failed: ship.speed must be > 0".to_string());
    }
    if tuning.laser.speed <= 0.0 {
        return Err("Tuning validation failed: laser.speed must be > 0".to_string());
    }
    if tuning.wave.speed <= 0.0 {
        return Err("Tuning validation failed: wave.speed must be > 0".to_string());
    }
    if tuning.wave.spacing < 0.0 {
        return Err("Tuning validation failed: wave.spacing must be >= 0".to_string());
    }
    if tuning.wave.min_count > tuning.wave.max_count {
        return Err(format!(
            "Tuning validation failed: wave.min_count {} exceeds wave.max_count {}",
            tuning.wave.min_count, tuning.wave.max_count
        ));
    }
    // The wave color table runs 3..=10; counts outside it would all render
    // in the fallback color and read as a bug.
    if tuning.wave.min_count < 3 || tuning.wave.max_count > 10 {
        return Err(format!(
            "Tuning validation failed: wave count range {}..={} outside the supported 3..=10",
            tuning.wave.min_count, tuning.wave.max_count
        ));
    }
    if tuning.wave.march_min_x >= tuning.wave.march_max_x {
        return Err("Tuning validation failed: wave.march_min_x must be < wave.march_max_x".to_string());
    }
    if !(0.0..=1.0).contains(&tuning.audio.master_volume) {
        return Err("Tuning validation failed: audio.master_volume must be within 0..=1".to_string());
    }
    Ok(())
}

pub struct TuningWatcher {
    path: PathBuf,
    last_seen_modified: Option<SystemTime>,
}

impl TuningWatcher {
    pub fn new(path: PathBuf) -> Self {
        let last_seen_modified = modified_time(&path);
        Self {
            path,
            last_seen_modified,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn should_reload(&mut self) -> bool {
        let current = modified_time(&self.path);
        match (self.last_seen_modified, current) {
            (Some(old), Some(now)) if now > old => {
                self.last_seen_modified = Some(now);
                true
            }
            (None, Some(now)) => {
                self.last_seen_modified = Some(now);
                true
            }
            _ => false,
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}

const fn default_ship_speed() -> f32 {
    300.0
}

const fn default_laser_speed() -> f32 {
    600.0
}

const fn default_wave_speed() -> f32 {
    60.0
}

const fn default_min_count() -> u32 {
    3
}

const fn default_max_count() -> u32 {
    10
}

const fn default_spacing() -> f32 {
    15.0
}

const fn default_origin_x() -> f32 {
    100.0
}

const fn default_origin_y() -> f32 {
    100.0
}

const fn default_march_min_x() -> f32 {
    100.0
}

const fn default_march_max_x() -> f32 {
    250.0
}

const fn default_master_volume() -> f32 {
    0.25
}
