use super::machine::{Effect, HeadsUpMachine, Phase, WordOutcome};
use crate::audio::AudioSink;
use crate::error::{GameError, GameResult};
use crate::gesture::{MotionSensor, TiltDetector};
use crate::supply::{ContentSource, SupplyQueue};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};

/// Commands from the embedding UI while a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Results screen: start another round with the same settings.
    PlayAgain,
    /// Leave to the menu. The session resolves with the final tally.
    End,
}

/// Render snapshot published after every handled event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadsUpView {
    pub phase: Phase,
    pub countdown: u8,
    pub time_left: u32,
    pub current_word: Option<String>,
    pub passed: usize,
    pub failed: usize,
}

/// Drives one heads-up session: sensor samples and one-second ticks in,
/// audio cues and supply-queue draws out.
///
/// Dropping the returned future detaches the timer and the sensor
/// subscription. A refill still in flight at that point finishes in the
/// background and merges into the shared queue, but nothing can reach the
/// abandoned machine again.
pub struct HeadsUpSession<S>
where
    S: ContentSource<Item = String>,
{
    queue: SupplyQueue<S>,
    machine: HeadsUpMachine,
    sensor: Arc<dyn MotionSensor>,
    audio: Arc<dyn AudioSink>,
    view: watch::Sender<HeadsUpView>,
}

impl<S> HeadsUpSession<S>
where
    S: ContentSource<Item = String>,
{
    pub fn new(
        queue: SupplyQueue<S>,
        timer_seconds: u32,
        sensor: Arc<dyn MotionSensor>,
        audio: Arc<dyn AudioSink>,
    ) -> (Self, watch::Receiver<HeadsUpView>) {
        let machine = HeadsUpMachine::new(timer_seconds);
        let (view, view_rx) = watch::channel(snapshot(&machine));
        (
            Self {
                queue,
                machine,
                sensor,
                audio,
                view,
            },
            view_rx,
        )
    }

    /// Run until an [`SessionCommand::End`] arrives or the command channel
    /// closes. Returns the accumulated word outcomes.
    ///
    /// An initial fetch failure with nothing buffered is fatal; afterwards
    /// supply errors only degrade to a stale word on screen and are retried
    /// on the next draw.
    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    ) -> GameResult<Vec<WordOutcome>> {
        if let Err(e) = self.queue.ensure_supply().await {
            if self.queue.is_empty() {
                return Err(e);
            }
            tracing::warn!(error = %e, "initial fetch failed with leftover content, continuing");
        }
        self.machine.content_ready();
        self.publish();

        if !self.sensor.request_access().await {
            return Err(GameError::Sensor("motion permission denied".to_string()));
        }
        let mut samples = self.sensor.subscribe()?;
        let mut detector = TiltDetector::new();

        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let effects = self.machine.on_tick();
                    self.apply(effects);
                    self.publish();
                }
                sample = samples.recv() => {
                    let Some(sample) = sample else {
                        return Err(GameError::Sensor("motion stream ended".to_string()));
                    };
                    if let Some(direction) = detector.feed(sample) {
                        let was_waiting = self.machine.phase() == Phase::Waiting;
                        let effects = self.machine.on_tilt(direction, Instant::now());
                        self.apply(effects);
                        if was_waiting && self.machine.phase() == Phase::Countdown {
                            // full second before the first countdown tick
                            ticker.reset();
                        }
                        self.publish();
                    }
                }
                command = commands.recv() => {
                    match command {
                        Some(SessionCommand::PlayAgain) => {
                            self.machine.play_again();
                            detector.reset();
                            self.spawn_refill();
                            self.publish();
                        }
                        Some(SessionCommand::End) | None => break,
                    }
                }
            }
        }

        Ok(self.machine.into_results())
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Play(cue) => self.audio.play(cue),
                Effect::NextWord => {
                    let word = self.queue.draw();
                    let follow_up = self.machine.word_drawn(word);
                    self.apply(follow_up);
                }
                Effect::Refill => {
                    if self.queue.running_low() {
                        self.spawn_refill();
                    }
                }
            }
        }
    }

    /// Fire-and-forget refill. A failure with content still buffered is
    /// non-fatal; the next draw triggers another attempt.
    fn spawn_refill(&self) {
        let queue = self.queue.clone();
        tokio::spawn(async move {
            if let Err(e) = queue.ensure_supply().await {
                tracing::warn!(error = %e, "background refill failed");
            }
        });
    }

    fn publish(&self) {
        // send fails only when every receiver is gone, which is fine
        let _ = self.view.send(snapshot(&self.machine));
    }
}

fn snapshot(machine: &HeadsUpMachine) -> HeadsUpView {
    let (passed, failed) = machine.tally();
    HeadsUpView {
        phase: machine.phase(),
        countdown: machine.countdown(),
        time_left: machine.time_left(),
        current_word: machine.current_word().map(str::to_string),
        passed,
        failed,
    }
}
