//! The heads-up phase machine, kept synchronous and free of I/O: events in
//! (tilts, one-second ticks), effects out (cues, draws, refill requests).
//! The async session applies the effects, which keeps every transition
//! deterministically testable.

use crate::audio::Cue;
use crate::gesture::TiltDirection;
use std::time::{Duration, Instant};

/// Minimum spacing between two accepted tilt answers. Suppresses re-triggers
/// from jitter or an extended hold of the same physical gesture.
pub const TILT_COOLDOWN: Duration = Duration::from_millis(1500);

const COUNTDOWN_TICKS: u8 = 3;

/// Round phases. Transitions are one-directional except the explicit
/// play-again edge from `Results` back to `Waiting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Initial content batch being fetched.
    Loading,
    /// Phone on forehead, waiting for a forward tilt to start.
    Waiting,
    /// The 3-2-1 run-up.
    Countdown,
    /// Round timer running, words being answered.
    Playing,
    /// Tally on screen until the player decides what happens next.
    Results,
}

/// Outcome recorded for one displayed word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordOutcome {
    pub word: String,
    pub passed: bool,
}

/// Side effect requested by a transition, applied by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Fire an audio cue.
    Play(Cue),
    /// Draw the next word from the supply queue and report it back via
    /// [`HeadsUpMachine::word_drawn`].
    NextWord,
    /// Opportunity to top up the supply queue.
    Refill,
}

/// Phase state for one heads-up session.
#[derive(Debug)]
pub struct HeadsUpMachine {
    phase: Phase,
    countdown: u8,
    time_left: u32,
    timer_seconds: u32,
    current: Option<String>,
    results: Vec<WordOutcome>,
    last_accepted: Option<Instant>,
}

impl HeadsUpMachine {
    pub fn new(timer_seconds: u32) -> Self {
        Self {
            phase: Phase::Loading,
            countdown: COUNTDOWN_TICKS,
            time_left: timer_seconds,
            timer_seconds,
            current: None,
            results: Vec::new(),
            last_accepted: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn countdown(&self) -> u8 {
        self.countdown
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn current_word(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn results(&self) -> &[WordOutcome] {
        &self.results
    }

    /// (passed, failed) counts.
    pub fn tally(&self) -> (usize, usize) {
        let passed = self.results.iter().filter(|r| r.passed).count();
        (passed, self.results.len() - passed)
    }

    pub fn into_results(self) -> Vec<WordOutcome> {
        self.results
    }

    /// First successful batch arrived (even a partial one).
    pub fn content_ready(&mut self) {
        if self.phase == Phase::Loading {
            self.phase = Phase::Waiting;
        }
    }

    /// A decoded tilt event.
    pub fn on_tilt(&mut self, direction: TiltDirection, now: Instant) -> Vec<Effect> {
        match self.phase {
            Phase::Waiting => {
                // only a forward tilt arms the round
                if direction == TiltDirection::Forward {
                    self.phase = Phase::Countdown;
                    self.countdown = COUNTDOWN_TICKS;
                    vec![Effect::Play(Cue::CountdownTick)]
                } else {
                    Vec::new()
                }
            }
            Phase::Playing => {
                if let Some(last) = self.last_accepted {
                    if now.saturating_duration_since(last) < TILT_COOLDOWN {
                        return Vec::new();
                    }
                }
                self.last_accepted = Some(now);

                let passed = direction == TiltDirection::Forward;
                let mut effects = vec![Effect::Play(if passed { Cue::Pass } else { Cue::Fail })];
                if let Some(word) = self.current.clone() {
                    self.results.push(WordOutcome { word, passed });
                }
                effects.push(Effect::NextWord);
                effects.push(Effect::Refill);
                effects
            }
            _ => Vec::new(),
        }
    }

    /// One-second timer tick.
    pub fn on_tick(&mut self) -> Vec<Effect> {
        match self.phase {
            Phase::Countdown => {
                self.countdown -= 1;
                if self.countdown == 0 {
                    self.phase = Phase::Playing;
                    self.time_left = self.timer_seconds;
                    self.last_accepted = None;
                    vec![Effect::NextWord, Effect::Refill]
                } else {
                    vec![Effect::Play(Cue::CountdownTick)]
                }
            }
            Phase::Playing => {
                self.time_left = self.time_left.saturating_sub(1);
                if self.time_left == 0 {
                    // timer expiry wins over any pending gesture this tick
                    self.phase = Phase::Results;
                    vec![Effect::Play(Cue::TimerEnd)]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    /// Driver reports what a `NextWord` draw produced. An empty queue keeps
    /// the previous word on screen.
    pub fn word_drawn(&mut self, word: Option<String>) -> Vec<Effect> {
        match word {
            Some(word) => {
                self.current = Some(word);
                vec![Effect::Play(Cue::NextWord)]
            }
            None => Vec::new(),
        }
    }

    /// The play-again edge: `Results` back to `Waiting` with a clean slate.
    pub fn play_again(&mut self) {
        if self.phase == Phase::Results {
            self.phase = Phase::Waiting;
            self.countdown = COUNTDOWN_TICKS;
            self.time_left = self.timer_seconds;
            self.current = None;
            self.results.clear();
            self.last_accepted = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine_in_playing(timer_seconds: u32) -> HeadsUpMachine {
        let mut machine = HeadsUpMachine::new(timer_seconds);
        machine.content_ready();
        machine.on_tilt(TiltDirection::Forward, Instant::now());
        for _ in 0..3 {
            machine.on_tick();
        }
        assert_eq!(machine.phase(), Phase::Playing);
        machine.word_drawn(Some("zebra".to_string()));
        machine
    }

    #[test]
    fn test_loading_to_waiting_on_content() {
        let mut machine = HeadsUpMachine::new(60);
        assert_eq!(machine.phase(), Phase::Loading);
        machine.content_ready();
        assert_eq!(machine.phase(), Phase::Waiting);
        // idempotent
        machine.content_ready();
        assert_eq!(machine.phase(), Phase::Waiting);
    }

    #[test]
    fn test_waiting_ignores_backward_tilt() {
        let mut machine = HeadsUpMachine::new(60);
        machine.content_ready();

        let effects = machine.on_tilt(TiltDirection::Backward, Instant::now());
        assert!(effects.is_empty());
        assert_eq!(machine.phase(), Phase::Waiting);

        let effects = machine.on_tilt(TiltDirection::Forward, Instant::now());
        assert_eq!(machine.phase(), Phase::Countdown);
        assert_eq!(effects, vec![Effect::Play(Cue::CountdownTick)]);
    }

    #[test]
    fn test_countdown_sequence_enters_playing() {
        let mut machine = HeadsUpMachine::new(60);
        machine.content_ready();
        machine.on_tilt(TiltDirection::Forward, Instant::now());
        assert_eq!(machine.countdown(), 3);

        assert_eq!(machine.on_tick(), vec![Effect::Play(Cue::CountdownTick)]);
        assert_eq!(machine.countdown(), 2);
        assert_eq!(machine.on_tick(), vec![Effect::Play(Cue::CountdownTick)]);
        assert_eq!(machine.countdown(), 1);

        // final tick enters playing and draws the first word
        let effects = machine.on_tick();
        assert_eq!(machine.phase(), Phase::Playing);
        assert_eq!(machine.time_left(), 60);
        assert_eq!(effects, vec![Effect::NextWord, Effect::Refill]);
    }

    #[test]
    fn test_playing_tilt_records_outcome_and_advances() {
        let mut machine = machine_in_playing(60);

        let effects = machine.on_tilt(TiltDirection::Forward, Instant::now());
        assert_eq!(effects[0], Effect::Play(Cue::Pass));
        assert!(effects.contains(&Effect::NextWord));
        assert!(effects.contains(&Effect::Refill));
        assert_eq!(
            machine.results(),
            &[WordOutcome {
                word: "zebra".to_string(),
                passed: true,
            }]
        );
    }

    #[test]
    fn test_backward_tilt_records_fail() {
        let mut machine = machine_in_playing(60);
        let effects = machine.on_tilt(TiltDirection::Backward, Instant::now());
        assert_eq!(effects[0], Effect::Play(Cue::Fail));
        assert!(!machine.results()[0].passed);
    }

    #[test]
    fn test_cooldown_accepts_only_one_of_two_quick_tilts() {
        let mut machine = machine_in_playing(60);
        let now = Instant::now();

        machine.on_tilt(TiltDirection::Forward, now);
        // second qualifying gesture inside the cooldown window
        let effects = machine.on_tilt(TiltDirection::Backward, now + Duration::from_millis(800));
        assert!(effects.is_empty());
        assert_eq!(machine.results().len(), 1);

        // past the cooldown the next gesture counts
        machine.word_drawn(Some("lion".to_string()));
        let effects = machine.on_tilt(TiltDirection::Backward, now + TILT_COOLDOWN);
        assert!(!effects.is_empty());
        assert_eq!(machine.results().len(), 2);
    }

    #[test]
    fn test_timer_expiry_beats_pending_gesture() {
        let mut machine = machine_in_playing(1);
        assert_eq!(machine.time_left(), 1);

        let effects = machine.on_tick();
        assert_eq!(machine.phase(), Phase::Results);
        assert_eq!(effects, vec![Effect::Play(Cue::TimerEnd)]);

        // the gesture that was pending in the same tick no longer counts
        let effects = machine.on_tilt(TiltDirection::Forward, Instant::now());
        assert!(effects.is_empty());
        assert!(machine.results().is_empty());
    }

    #[test]
    fn test_empty_queue_keeps_previous_word() {
        let mut machine = machine_in_playing(60);
        assert!(machine.word_drawn(None).is_empty());
        assert_eq!(machine.current_word(), Some("zebra"));
    }

    #[test]
    fn test_play_again_resets_round_state() {
        let mut machine = machine_in_playing(1);
        machine.on_tilt(TiltDirection::Forward, Instant::now());
        machine.on_tick();
        assert_eq!(machine.phase(), Phase::Results);
        assert_eq!(machine.tally(), (1, 0));

        machine.play_again();
        assert_eq!(machine.phase(), Phase::Waiting);
        assert_eq!(machine.time_left(), 1);
        assert!(machine.results().is_empty());
        assert_eq!(machine.current_word(), None);
    }

    #[test]
    fn test_play_again_only_from_results() {
        let mut machine = machine_in_playing(60);
        machine.play_again();
        assert_eq!(machine.phase(), Phase::Playing);
    }

    #[test]
    fn test_tilts_ignored_while_loading_and_counting_down() {
        let mut machine = HeadsUpMachine::new(60);
        assert!(machine
            .on_tilt(TiltDirection::Forward, Instant::now())
            .is_empty());

        machine.content_ready();
        machine.on_tilt(TiltDirection::Forward, Instant::now());
        assert_eq!(machine.phase(), Phase::Countdown);
        assert!(machine
            .on_tilt(TiltDirection::Forward, Instant::now())
            .is_empty());
    }
}
