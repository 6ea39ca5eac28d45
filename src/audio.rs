//! Audio feedback as data: each game event maps to a short synthesized tone
//! sequence. Producing actual sound is the embedder's job via [`AudioSink`].

use std::time::Duration;

/// Oscillator shape for a synthesized tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// One synthesized tone. A set `end_hz` sweeps the frequency linearly over
/// the duration; `at` offsets the tone from the start of its cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub start_hz: f32,
    pub end_hz: Option<f32>,
    pub duration: Duration,
    pub at: Duration,
    pub waveform: Waveform,
}

const fn tone(start_hz: f32, end_hz: Option<f32>, ms: u64, at_ms: u64, waveform: Waveform) -> Tone {
    Tone {
        start_hz,
        end_hz,
        duration: Duration::from_millis(ms),
        at: Duration::from_millis(at_ms),
        waveform,
    }
}

/// Game events with an audible cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// One tick of the 3-2-1 countdown.
    CountdownTick,
    /// A fresh word was put on screen.
    NextWord,
    /// The current word was passed.
    Pass,
    /// The current word was missed.
    Fail,
    /// The round timer ran out.
    TimerEnd,
}

impl Cue {
    /// Tone sequence for this cue.
    pub fn tones(self) -> Vec<Tone> {
        match self {
            Cue::CountdownTick => vec![tone(600.0, None, 100, 0, Waveform::Sine)],
            Cue::NextWord => vec![tone(800.0, None, 150, 0, Waveform::Sine)],
            Cue::Pass => vec![tone(200.0, None, 300, 0, Waveform::Square)],
            Cue::Fail => vec![tone(400.0, Some(200.0), 400, 0, Waveform::Sawtooth)],
            Cue::TimerEnd => (0..3)
                .map(|i| tone(600.0, None, 150, i * 200, Waveform::Square))
                .collect(),
        }
    }
}

/// Output device for audio cues.
pub trait AudioSink: Send + Sync {
    fn play(&self, cue: Cue);
}

/// Sink that drops every cue, for headless sessions and tests.
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&self, _cue: Cue) {}
}
