//! The prefetch buffer behind every game: a FIFO of typed content items,
//! refilled from the generator before it runs dry.
//!
//! The same queue serves all four content domains; what differs per game is
//! captured by [`ContentSource`] (prompt construction, parsing, tuning).

use crate::error::GameResult;
use crate::history::HistoryStore;
use crate::llm::ContentGenerator;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Default cap on how many trailing history entries a refill prompt mentions.
pub const HISTORY_HINT_LIMIT: usize = 100;

/// Per-game description of one content domain.
pub trait ContentSource: Send + Sync + 'static {
    type Item: Clone + Send + 'static;

    fn game_id(&self) -> &'static str;

    /// Items requested per generator call.
    fn batch_size(&self) -> usize;

    /// Buffer length at or below which a refill is triggered.
    fn low_water_mark(&self) -> usize;

    /// How many trailing history entries the prompt mentions at most.
    fn history_hint_limit(&self) -> usize {
        HISTORY_HINT_LIMIT
    }

    /// System and user prompt for a batch of `count` items.
    fn prompts(&self, count: usize, history: &[String]) -> (String, String);

    /// Convert raw generator output into typed items.
    fn parse(&self, raw: &str) -> GameResult<Vec<Self::Item>>;

    /// Label recorded in history when an item is drawn.
    fn history_label(&self, item: &Self::Item) -> String;
}

struct QueueState<T> {
    buffer: VecDeque<T>,
    /// Single-flight guard: true while a generator call is outstanding.
    fetching: bool,
}

struct Inner<S: ContentSource> {
    source: S,
    generator: Arc<dyn ContentGenerator>,
    history: HistoryStore,
    state: Mutex<QueueState<S::Item>>,
}

/// Prefetch buffer of content items for one game session.
///
/// Cloning is cheap and shares the buffer, so a background refill task and
/// the consuming loop can hold the same queue.
pub struct SupplyQueue<S: ContentSource> {
    inner: Arc<Inner<S>>,
}

impl<S: ContentSource> Clone for SupplyQueue<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ContentSource> SupplyQueue<S> {
    pub fn new(source: S, generator: Arc<dyn ContentGenerator>, history: HistoryStore) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                generator,
                history,
                state: Mutex::new(QueueState {
                    buffer: VecDeque::new(),
                    fetching: false,
                }),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().unwrap().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_fetching(&self) -> bool {
        self.inner.state.lock().unwrap().fetching
    }

    /// Whether the buffer is at or below the refill threshold.
    pub fn running_low(&self) -> bool {
        self.len() <= self.inner.source.low_water_mark()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.inner.history
    }

    /// Refill the buffer when it is at or below the low water mark and no
    /// fetch is outstanding; a no-op otherwise. Callers invoke this
    /// opportunistically (session start, after every draw) rather than
    /// queueing requests; overlapping calls never issue a second fetch.
    ///
    /// On failure the error is returned and any buffered items stay
    /// consumable; there is no automatic retry.
    pub async fn ensure_supply(&self) -> GameResult<()> {
        {
            let mut state = self.inner.state.lock().unwrap();
            if state.fetching || state.buffer.len() > self.inner.source.low_water_mark() {
                return Ok(());
            }
            state.fetching = true;
        }

        let count = self.inner.source.batch_size();
        let recent = self.inner.history.recent();
        let limit = self.inner.source.history_hint_limit();
        let hint = if recent.len() > limit {
            &recent[recent.len() - limit..]
        } else {
            &recent[..]
        };
        let (system, user) = self.inner.source.prompts(count, hint);

        tracing::debug!(
            game = self.inner.source.game_id(),
            count,
            "requesting content batch"
        );

        let outcome = match self.inner.generator.complete(&system, &user).await {
            Ok(raw) => self.inner.source.parse(&raw),
            Err(e) => Err(e),
        };

        let mut state = self.inner.state.lock().unwrap();
        state.fetching = false;
        match outcome {
            Ok(items) => {
                tracing::debug!(
                    game = self.inner.source.game_id(),
                    received = items.len(),
                    buffered = state.buffer.len() + items.len(),
                    "content batch buffered"
                );
                state.buffer.extend(items);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    game = self.inner.source.game_id(),
                    error = %e,
                    "content fetch failed"
                );
                Err(e)
            }
        }
    }

    /// Remove and return the head item. `None` is the explicit empty signal;
    /// this never blocks. A drawn item is recorded in history at this point,
    /// so fetched-but-unshown items never are.
    pub fn draw(&self) -> Option<S::Item> {
        let item = self.inner.state.lock().unwrap().buffer.pop_front();
        if let Some(ref item) = item {
            self.inner
                .history
                .append(&[self.inner.source.history_label(item)]);
        }
        item
    }
}
