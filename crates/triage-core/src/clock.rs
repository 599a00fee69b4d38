//! Wall-clock timing for annotation steps

use std::time::{Duration, Instant};

/// Times one step from the first time its options are shown until it is
/// confirmed. Re-rendering the same step does not restart the clock.
#[derive(Debug, Clone, Default)]
pub struct StepClock {
    started: Option<Instant>,
}

impl StepClock {
    pub fn new() -> Self {
        Self { started: None }
    }

    /// Start timing unless a step is already being timed
    pub fn start(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.map(|s| s.elapsed()).unwrap_or_default()
    }

    /// Seconds since `start`, rounded to hundredths, without restarting
    pub fn elapsed_secs(&self) -> f64 {
        round_centis(self.elapsed().as_secs_f64())
    }

    /// Same reading as `elapsed_secs`; the clock restarts for the next step
    pub fn lap(&mut self) -> f64 {
        let secs = self.elapsed_secs();
        self.started = Some(Instant::now());
        secs
    }

    /// Stop timing; the next `start` begins a fresh measurement
    pub fn stop(&mut self) {
        self.started = None;
    }
}

fn round_centis(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}
