//! Tilt detection from raw accelerometer samples.
//!
//! The z axis (including gravity) reads near zero with the phone upright on a
//! forehead, climbs toward +9.8 as the screen tips up and toward -9.8 as it
//! tips down. A deliberate tilt shows up as a fast z change, so we watch the
//! delta across a short sliding window instead of classifying absolute
//! orientation. Edge detection, not classification: quick flicks can be
//! missed, small jitter never triggers.

use crate::error::{GameError, GameResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Z change (m/s²) that counts as a deliberate tilt (~25 degrees).
pub const Z_DELTA_THRESHOLD: f64 = 4.0;

/// The change must happen within this window.
pub const Z_WINDOW: Duration = Duration::from_millis(500);

/// One accelerometer reading, gravity included. Ephemeral: retained only
/// inside the detector's sliding window.
#[derive(Debug, Clone, Copy)]
pub struct MotionSample {
    pub timestamp: Instant,
    pub z: f64,
}

/// A discrete tilt decoded from the sample stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltDirection {
    /// Screen tipping down, z falling. Starts the round; marks a pass.
    Forward,
    /// Screen tipping up, z rising. Marks a fail.
    Backward,
}

/// Sliding-window edge detector over z samples.
#[derive(Debug)]
pub struct TiltDetector {
    samples: VecDeque<MotionSample>,
    threshold: f64,
    window: Duration,
}

impl Default for TiltDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl TiltDetector {
    pub fn new() -> Self {
        Self::with_tuning(Z_DELTA_THRESHOLD, Z_WINDOW)
    }

    pub fn with_tuning(threshold: f64, window: Duration) -> Self {
        Self {
            samples: VecDeque::new(),
            threshold,
            window,
        }
    }

    /// Feed one sample; returns a direction when a tilt edge is detected.
    ///
    /// The delta is taken between this sample and the oldest one still inside
    /// the window. On a hit the window is cleared, so one physical gesture
    /// emits exactly one event.
    pub fn feed(&mut self, sample: MotionSample) -> Option<TiltDirection> {
        self.samples.push_back(sample);
        while let Some(front) = self.samples.front() {
            if sample.timestamp.saturating_duration_since(front.timestamp) > self.window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
        if self.samples.len() < 2 {
            return None;
        }

        let delta = sample.z - self.samples.front()?.z;
        if delta.abs() >= self.threshold {
            self.samples.clear();
            Some(if delta < 0.0 {
                TiltDirection::Forward
            } else {
                TiltDirection::Backward
            })
        } else {
            None
        }
    }

    /// Drop buffered samples, e.g. on a phase change.
    pub fn reset(&mut self) {
        self.samples.clear();
    }
}

/// Capability interface over the platform motion API, so sessions can be
/// driven by a synthetic feed in tests.
#[async_trait]
pub trait MotionSensor: Send + Sync {
    /// Ask the platform for motion access. Some platforms only grant this
    /// from an explicit user gesture; implementations surface that however
    /// fits their UI.
    async fn request_access(&self) -> bool {
        true
    }

    /// Start delivering samples. The subscription ends when the receiver is
    /// dropped.
    fn subscribe(&self) -> GameResult<mpsc::UnboundedReceiver<MotionSample>>;
}

/// Sensor fed manually from application code or tests.
pub struct ChannelMotionSensor {
    tx: mpsc::UnboundedSender<MotionSample>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<MotionSample>>>,
}

impl ChannelMotionSensor {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Sender half for pushing samples into the subscription.
    pub fn handle(&self) -> mpsc::UnboundedSender<MotionSample> {
        self.tx.clone()
    }
}

impl Default for ChannelMotionSensor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MotionSensor for ChannelMotionSensor {
    fn subscribe(&self) -> GameResult<mpsc::UnboundedReceiver<MotionSample>> {
        self.rx
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| GameError::Sensor("sensor already subscribed".to_string()))
    }
}
