//! Sound effects over rodio.
//!
//! Both effects are synthesized (a two-tone laser chirp, a decaying noise
//! burst for explosions) so no audio files ship with the game. The output
//! stream is opened once at startup; machines without an audio device get
//! one warning and a silent `AudioBank` whose play calls are no-ops. Nothing
//! in here may fail loudly — a dropped sound is not worth a hitch in the
//! frame loop.

use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle, Sink};

pub struct AudioBank {
    // Dropping the stream kills playback; keep it alive for the whole run.
    _stream: Option<OutputStream>,
    handle: Option<OutputStreamHandle>,
    pub master_volume: f32,
}

impl AudioBank {
    pub fn new(master_volume: f32) -> Self {
        match OutputStream::try_default() {
            Ok((stream, handle)) => Self {
                _stream: Some(stream),
                handle: Some(handle),
                master_volume,
            },
            Err(e) => {
                log::warn!("No audio device, running silent: {e}");
                Self::disabled()
            }
        }
    }

    /// Silent bank for tests and headless runs.
    pub fn disabled() -> Self {
        Self {
            _stream: None,
            handle: None,
            master_volume: 0.0,
        }
    }

    pub fn play_laser(&self) {
        let chirp = SineWave::new(1320.0)
            .take_duration(Duration::from_millis(40))
            .amplify(0.5);
        let tail = SineWave::new(880.0)
            .take_duration(Duration::from_millis(60))
            .amplify(0.35);
        self.play(chirp, Some(tail));
    }

    pub fn play_explosion(&self) {
        self.play(NoiseBurst::new(Duration::from_millis(250)), Option::<NoiseBurst>::None);
    }

    fn play<S, T>(&self, first: S, second: Option<T>)
    where
        S: Source<Item = f32> + Send + 'static,
        T: Source<Item = f32> + Send + 'static,
    {
        let Some(handle) = &self.handle else {
            return;
        };
        match Sink::try_new(handle) {
            Ok(sink) => {
                sink.set_volume(self.master_volume);
                sink.append(first);
                if let Some(source) = second {
                    sink.append(source);
                }
                sink.detach();
            }
            Err(e) => log::warn!("Sound playback failed: {e}"),
        }
    }
}

const NOISE_SAMPLE_RATE: u32 = 44_100;

/// Mono white-noise burst with a linear decay envelope.
struct NoiseBurst {
    remaining: u32,
    total: u32,
    rng_state: u32,
}

impl NoiseBurst {
    fn new(duration: Duration) -> Self {
        let total = (duration.as_secs_f32() * NOISE_SAMPLE_RATE as f32) as u32;
        Self {
            remaining: total,
            total,
            rng_state: 0x2545_F491,
        }
    }

    fn next_noise(&mut self) -> f32 {
        // xorshift32; statistical quality is irrelevant for an explosion.
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}

impl Iterator for NoiseBurst {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.remaining == 0 {
            return None;
        }
        let envelope = self.remaining as f32 / self.total as f32;
        self.remaining -= 1;
        Some(self.next_noise() * envelope * 0.8)
    }
}

impl Source for NoiseBurst {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.remaining as usize)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        NOISE_SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(
            self.total as f32 / NOISE_SAMPLE_RATE as f32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_bank_swallows_play_calls() {
        let bank = AudioBank::disabled();
        bank.play_laser();
        bank.play_explosion();
    }

    #[test]
    fn noise_burst_length_matches_duration() {
        let burst = NoiseBurst::new(Duration::from_millis(100));
        let samples: Vec<f32> = burst.collect();
        let expected = (NOISE_SAMPLE_RATE / 10) as usize;
        assert_eq!(samples.len(), expected);
    }

    #[test]
    fn noise_burst_decays_to_silence() {
        let burst = NoiseBurst::new(Duration::from_millis(50));
        let samples: Vec<f32> = burst.collect();
        let head: f32 = samples[..100].iter().map(|s| s.abs()).sum();
        let tail: f32 = samples[samples.len() - 100..].iter().map(|s| s.abs()).sum();
        assert!(head > tail, "envelope should decay: head {head}, tail {tail}");
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
    }
}
