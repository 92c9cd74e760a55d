//! Fixed-rate frame clock for the client's update loop.
//!
//! Each frame the loop waits on [`FrameClock::wait_for_frame`], runs its
//! work, then calls [`FrameClock::record_frame_end`] so slow frames show
//! up in the logs.
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         info = clock.wait_for_frame() => {
//!             runtime.frame(info.delta);
//!             clock.record_frame_end();
//!         }
//!         _ = shutdown.recv() => break,
//!     }
//! }
//! ```
//!
//! A rate of 0 is manual mode: `wait_for_frame` never resolves and the
//! embedder drives frames itself.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Frames per second. 0 = manual.
    pub rate_hz: u32,
    /// Fraction of the frame budget (0.0–1.0) above which a frame is
    /// logged as slow.
    pub budget_warn_threshold: f64,
    /// How many missed frames to replay back to back before giving up and
    /// rescheduling from now.
    pub max_catchup: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            rate_hz: 60,
            budget_warn_threshold: 0.80,
            max_catchup: 2,
        }
    }
}

impl FrameConfig {
    pub const MAX_RATE_HZ: u32 = 240;

    pub fn with_rate(rate_hz: u32) -> Self {
        Self {
            rate_hz,
            ..Default::default()
        }
    }

    /// Clamps out-of-range values, logging each one.
    pub fn validated(mut self) -> Self {
        if self.rate_hz > Self::MAX_RATE_HZ {
            warn!(
                rate = self.rate_hz,
                max = Self::MAX_RATE_HZ,
                "rate_hz exceeds maximum, clamping"
            );
            self.rate_hz = Self::MAX_RATE_HZ;
        }
        if !(0.0..=1.0).contains(&self.budget_warn_threshold) {
            warn!(
                threshold = self.budget_warn_threshold,
                "budget_warn_threshold outside 0.0..=1.0, clamping"
            );
            self.budget_warn_threshold = self.budget_warn_threshold.clamp(0.0, 1.0);
        }
        self
    }

    /// Length of one frame, or `None` in manual mode.
    pub fn frame_duration(&self) -> Option<Duration> {
        (self.rate_hz > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(self.rate_hz)))
    }
}

// ---------------------------------------------------------------------------
// Frame info
// ---------------------------------------------------------------------------

/// Returned by [`FrameClock::wait_for_frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Time since the previous frame fired (or since the clock was
    /// created, for the first frame).
    pub delta: Duration,
    /// The frame fired more than 10% of a frame late.
    pub overrun: bool,
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

pub struct FrameClock {
    config: FrameConfig,
    frame_duration: Option<Duration>,
    frame_count: u64,
    next_frame: Option<TokioInstant>,
    last_frame: TokioInstant,
    /// Set by `wait_for_frame`, consumed by `record_frame_end`.
    frame_start: Option<Instant>,
    paused: bool,
    overruns: u64,
}

impl FrameClock {
    pub fn new(config: FrameConfig) -> Self {
        let config = config.validated();
        let frame_duration = config.frame_duration();
        let now = TokioInstant::now();

        match frame_duration {
            Some(d) => debug!(
                rate_hz = config.rate_hz,
                budget_ms = d.as_secs_f64() * 1000.0,
                "frame clock created"
            ),
            None => debug!("frame clock created in manual mode"),
        }

        Self {
            next_frame: frame_duration.map(|d| now + d),
            config,
            frame_duration,
            frame_count: 0,
            last_frame: now,
            frame_start: None,
            paused: false,
            overruns: 0,
        }
    }

    pub fn with_rate(rate_hz: u32) -> Self {
        Self::new(FrameConfig::with_rate(rate_hz))
    }

    /// Waits until the next frame is due.
    ///
    /// Pends forever in manual mode or while paused; inside a
    /// `tokio::select!` the other branches keep running.
    pub async fn wait_for_frame(&mut self) -> FrameInfo {
        let (next, frame_dur) = match (self.next_frame, self.frame_duration) {
            (Some(next), Some(dur)) if !self.paused => (next, dur),
            _ => std::future::pending().await,
        };

        time::sleep_until(next).await;

        let now = TokioInstant::now();
        self.frame_count += 1;
        self.frame_start = Some(Instant::now());

        let late_by = now.saturating_duration_since(next);
        let overrun = late_by > frame_dur / 10;
        self.next_frame = Some(if overrun {
            self.overruns += 1;
            let behind = (late_by.as_nanos() / frame_dur.as_nanos()) as u64;
            if behind <= u64::from(self.config.max_catchup) {
                next + frame_dur
            } else {
                warn!(
                    frame = self.frame_count,
                    behind,
                    late_ms = late_by.as_secs_f64() * 1000.0,
                    "frame clock fell behind, skipping ahead"
                );
                now + frame_dur
            }
        } else {
            next + frame_dur
        });

        let delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        trace!(frame = self.frame_count, overrun, "frame fired");

        FrameInfo {
            frame: self.frame_count,
            delta,
            overrun,
        }
    }

    /// Marks the end of the current frame's work and warns when it used
    /// more than the configured share of the budget.
    pub fn record_frame_end(&mut self) {
        let (Some(start), Some(budget)) = (self.frame_start.take(), self.frame_duration) else {
            return;
        };
        let elapsed = start.elapsed();
        let utilization = elapsed.as_secs_f64() / budget.as_secs_f64();
        if utilization >= self.config.budget_warn_threshold {
            warn!(
                frame = self.frame_count,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                budget_ms = budget.as_secs_f64() * 1000.0,
                "frame approaching budget limit"
            );
        }
    }

    /// Stops frames until [`resume`](Self::resume). Idempotent.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(frame = self.frame_count, "frame clock paused");
        }
    }

    /// Restarts frames one full frame from now, without a burst of
    /// catch-up frames for the paused time.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            let now = TokioInstant::now();
            self.next_frame = self.frame_duration.map(|d| now + d);
            self.last_frame = now;
            debug!(frame = self.frame_count, "frame clock resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_manual(&self) -> bool {
        self.frame_duration.is_none()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    pub fn frame_duration(&self) -> Option<Duration> {
        self.frame_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_clamps_rate_and_threshold() {
        let cfg = FrameConfig {
            rate_hz: 1_000,
            budget_warn_threshold: 3.0,
            max_catchup: 0,
        }
        .validated();
        assert_eq!(cfg.rate_hz, FrameConfig::MAX_RATE_HZ);
        assert_eq!(cfg.budget_warn_threshold, 1.0);
    }

    #[test]
    fn test_manual_mode_has_no_duration() {
        assert_eq!(FrameConfig::with_rate(0).frame_duration(), None);
        assert_eq!(
            FrameConfig::with_rate(20).frame_duration(),
            Some(Duration::from_millis(50))
        );
    }
}
