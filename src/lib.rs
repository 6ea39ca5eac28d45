//! Engine for an LLM-backed party-game suite.
//!
//! Two mechanisms carry every game in here: the content-supply pipeline
//! ([`supply::SupplyQueue`] over a per-game [`supply::ContentSource`], fed by
//! an [`llm::ContentGenerator`] and biased by [`history::HistoryStore`]), and
//! the tilt-driven round loop of the Heads Up game
//! ([`games::headsup::HeadsUpMachine`] plus its async session driver).
//! Rendering, storage, sensors and audio output stay behind traits.

pub mod audio;
pub mod content;
pub mod error;
pub mod games;
pub mod gesture;
pub mod history;
pub mod llm;
pub mod parse;
pub mod supply;

pub use error::{GameError, GameResult};
