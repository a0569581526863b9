//! Fixed-timestep clock.
//!
//! The simulation advances only in whole `fixed_dt` slices consumed from a
//! wall-clock accumulator. Rendering happens once per frame regardless of how
//! many slices (zero included) a frame produced.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

pub struct TimeState {
    pub fixed_dt: f64,
    /// Cap on how much wall-clock debt a single frame may accrue. Without it a
    /// long stall (window drag, debugger break) would replay as a burst of
    /// catch-up steps.
    pub max_accumulator: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_accumulator: 0.25,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        self.real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_clock_produces_no_steps() {
        let mut time = TimeState::new();
        assert!(!time.should_step());
        assert_eq!(time.fixed_step_count, 0);
    }

    #[test]
    fn one_fixed_dt_of_debt_yields_exactly_one_step() {
        let mut time = TimeState::new();
        time.accumulator = time.fixed_dt;
        assert!(time.should_step());
        assert!(!time.should_step());
        assert_eq!(time.steps_this_frame, 1);
    }

    #[test]
    fn accumulated_debt_drains_in_whole_slices() {
        let mut time = TimeState::new();
        time.accumulator = time.fixed_dt * 3.5;
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        assert_eq!(steps, 3);
        // The half-slice remainder stays in the accumulator.
        assert!(time.accumulator > 0.0 && time.accumulator < time.fixed_dt);
    }

    #[test]
    fn total_time_advances_by_fixed_dt_per_step() {
        let mut time = TimeState::new();
        time.accumulator = time.fixed_dt * 2.0;
        while time.should_step() {}
        assert!((time.total_time - time.fixed_dt * 2.0).abs() < 1e-9);
    }

    #[test]
    fn long_stall_is_capped_instead_of_replayed() {
        let mut time = TimeState::new();
        // Pretend the last frame was two seconds ago (debugger, window drag).
        time.last_instant = Instant::now() - std::time::Duration::from_secs(2);
        time.begin_frame();
        assert!(time.real_dt <= time.max_accumulator);

        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        // At most the capped debt's worth of catch-up steps.
        assert!(steps as f64 <= time.max_accumulator / time.fixed_dt + 1.0);
    }
}
