//! End-to-end flow of a heads-up session driven by a synthetic sensor feed,
//! a scripted generator and a virtual clock.

use async_trait::async_trait;
use partywords::audio::{AudioSink, Cue};
use partywords::error::{GameError, GameResult};
use partywords::games::headsup::{
    HeadsUpSession, HeadsUpSettings, HeadsUpView, Phase, SessionCommand, WordSource,
};
use partywords::gesture::{ChannelMotionSensor, MotionSample, MotionSensor};
use partywords::history::{HistoryStore, KvStore, MemoryStore};
use partywords::llm::ContentGenerator;
use partywords::supply::SupplyQueue;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};

/// Generator that always returns the same scripted batch.
struct ScriptedGenerator {
    response: GameResult<String>,
}

impl ScriptedGenerator {
    fn words(count: usize) -> Self {
        let words: Vec<String> = (1..=count).map(|i| format!("w{i}")).collect();
        Self {
            response: Ok(serde_json::to_string(&words).unwrap()),
        }
    }

    fn failing() -> Self {
        Self {
            response: Err(GameError::Api {
                status: 500,
                body: "overloaded".to_string(),
            }),
        }
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn complete(&self, _system: &str, _user: &str) -> GameResult<String> {
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(GameError::Api { status, body }) => Err(GameError::Api {
                status: *status,
                body: body.clone(),
            }),
            Err(_) => unreachable!("scripted errors are Api errors"),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Sink that records every cue for later assertions.
#[derive(Default)]
struct CueRecorder {
    cues: Mutex<Vec<Cue>>,
}

impl CueRecorder {
    fn recorded(&self) -> Vec<Cue> {
        self.cues.lock().unwrap().clone()
    }
}

impl AudioSink for CueRecorder {
    fn play(&self, cue: Cue) {
        self.cues.lock().unwrap().push(cue);
    }
}

/// Sensor whose permission request is denied.
struct DeniedSensor;

#[async_trait]
impl MotionSensor for DeniedSensor {
    async fn request_access(&self) -> bool {
        false
    }

    fn subscribe(&self) -> GameResult<mpsc::UnboundedReceiver<MotionSample>> {
        Err(GameError::Sensor("no permission".to_string()))
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn build_queue(generator: Arc<dyn ContentGenerator>) -> SupplyQueue<WordSource> {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let settings = HeadsUpSettings {
        language: "English".to_string(),
        ..Default::default()
    };
    let history = HistoryStore::new(store, "headsup", &settings.language, "");
    SupplyQueue::new(WordSource::new(settings), generator, history)
}

/// Two samples close together whose z drop crosses the tilt threshold.
fn send_tilt(sensor: &ChannelMotionSensor, forward: bool) {
    let now = Instant::now();
    let handle = sensor.handle();
    let z = if forward { -5.0 } else { 5.0 };
    handle.send(MotionSample {
        timestamp: now,
        z: 0.0,
    })
    .unwrap();
    handle
        .send(MotionSample {
            timestamp: now + Duration::from_millis(50),
            z,
        })
        .unwrap();
}

async fn wait_until<F>(rx: &mut watch::Receiver<HeadsUpView>, what: &str, predicate: F) -> HeadsUpView
where
    F: Fn(&HeadsUpView) -> bool,
{
    tokio::time::timeout(Duration::from_secs(300), async {
        loop {
            {
                let view = rx.borrow();
                if predicate(&view) {
                    return view.clone();
                }
            }
            rx.changed().await.expect("session ended unexpectedly");
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {what}"))
}

#[tokio::test(start_paused = true)]
async fn test_full_round_flow() {
    init_tracing();
    let generator = Arc::new(ScriptedGenerator::words(20));
    let queue = build_queue(generator);
    let sensor = Arc::new(ChannelMotionSensor::new());
    let audio = Arc::new(CueRecorder::default());

    let (session, mut view) = HeadsUpSession::new(
        queue.clone(),
        60,
        Arc::clone(&sensor) as Arc<dyn MotionSensor>,
        Arc::clone(&audio) as Arc<dyn AudioSink>,
    );
    let (commands, commands_rx) = mpsc::unbounded_channel();
    let running = tokio::spawn(session.run(commands_rx));

    wait_until(&mut view, "waiting phase", |v| v.phase == Phase::Waiting).await;

    // a backward tilt must not start the round
    send_tilt(&sensor, false);
    tokio::task::yield_now().await;
    assert_eq!(view.borrow().phase, Phase::Waiting);

    send_tilt(&sensor, true);
    wait_until(&mut view, "countdown", |v| v.phase == Phase::Countdown).await;
    let playing = wait_until(&mut view, "playing", |v| v.phase == Phase::Playing).await;
    assert_eq!(playing.current_word.as_deref(), Some("w1"));
    assert_eq!(playing.time_left, 60);

    // miss the first word
    send_tilt(&sensor, false);
    let after_miss = wait_until(&mut view, "recorded miss", |v| v.failed == 1).await;
    assert_eq!(after_miss.current_word.as_deref(), Some("w2"));
    assert_eq!(after_miss.passed, 0);

    commands.send(SessionCommand::End).unwrap();
    let results = running.await.unwrap().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].word, "w1");
    assert!(!results[0].passed);

    // 3-2-1 run-up plus entry cue, then the miss and the next word
    let cues = audio.recorded();
    assert_eq!(
        cues.iter().filter(|c| **c == Cue::CountdownTick).count(),
        3
    );
    assert!(cues.contains(&Cue::Fail));
    assert!(cues.contains(&Cue::NextWord));
    assert!(!cues.contains(&Cue::TimerEnd));

    // only the words actually shown made it into history
    assert_eq!(queue.history().recent(), vec!["w1", "w2"]);
}

#[tokio::test(start_paused = true)]
async fn test_timer_expiry_and_play_again() {
    init_tracing();
    let generator = Arc::new(ScriptedGenerator::words(20));
    let queue = build_queue(generator);
    let sensor = Arc::new(ChannelMotionSensor::new());
    let audio = Arc::new(CueRecorder::default());

    let (session, mut view) = HeadsUpSession::new(
        queue,
        2,
        Arc::clone(&sensor) as Arc<dyn MotionSensor>,
        Arc::clone(&audio) as Arc<dyn AudioSink>,
    );
    let (commands, commands_rx) = mpsc::unbounded_channel();
    let running = tokio::spawn(session.run(commands_rx));

    wait_until(&mut view, "waiting phase", |v| v.phase == Phase::Waiting).await;
    send_tilt(&sensor, true);

    // no gestures during play: the round times out on its own
    let results_view = wait_until(&mut view, "results", |v| v.phase == Phase::Results).await;
    assert_eq!(results_view.passed, 0);
    assert_eq!(results_view.failed, 0);
    assert!(audio.recorded().contains(&Cue::TimerEnd));

    commands.send(SessionCommand::PlayAgain).unwrap();
    let waiting = wait_until(&mut view, "back to waiting", |v| v.phase == Phase::Waiting).await;
    assert_eq!(waiting.time_left, 2);
    assert_eq!(waiting.current_word, None);

    commands.send(SessionCommand::End).unwrap();
    let results = running.await.unwrap().unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_initial_fetch_failure_is_fatal() {
    init_tracing();
    let generator = Arc::new(ScriptedGenerator::failing());
    let queue = build_queue(generator);
    let sensor = Arc::new(ChannelMotionSensor::new());

    let (session, _view) = HeadsUpSession::new(
        queue,
        60,
        sensor as Arc<dyn MotionSensor>,
        Arc::new(CueRecorder::default()) as Arc<dyn AudioSink>,
    );
    let (_commands, commands_rx) = mpsc::unbounded_channel();

    let err = session.run(commands_rx).await.unwrap_err();
    assert!(matches!(err, GameError::Api { status: 500, .. }));
}

#[tokio::test]
async fn test_denied_sensor_fails_session_only() {
    init_tracing();
    let generator = Arc::new(ScriptedGenerator::words(20));
    let queue = build_queue(generator);

    let (session, _view) = HeadsUpSession::new(
        queue.clone(),
        60,
        Arc::new(DeniedSensor) as Arc<dyn MotionSensor>,
        Arc::new(CueRecorder::default()) as Arc<dyn AudioSink>,
    );
    let (_commands, commands_rx) = mpsc::unbounded_channel();

    let err = session.run(commands_rx).await.unwrap_err();
    assert!(matches!(err, GameError::Sensor(_)));

    // the fetched batch is intact for non-motion use
    assert_eq!(queue.len(), 20);
}
