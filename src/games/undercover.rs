//! Undercover: a word-pair deduction game for a group on one device.
//!
//! Every round one generated [`WordPair`] is dealt to N players: one random
//! player gets the undercover word, everyone else the civilian word. Players
//! take turns describing their word, then vote people out until either the
//! undercover is gone (civilians win) or only two players remain with the
//! undercover among them (undercover wins).

use crate::content::WordPair;
use crate::error::GameResult;
use crate::parse;
use crate::supply::ContentSource;
use rand::Rng;

const SYSTEM_PROMPT: &str = "You are a word pair generator for the party game \"Undercover\" (also known as \"Who is Undercover\").\n\n\
In this game, most players get the same word (civilian word) while one player gets a similar but different word (undercover word). Players describe their word without saying it, trying to figure out who has the different word.\n\n\
Rules:\n\
- Return ONLY a JSON array of objects with \"civilian\" and \"undercover\" fields\n\
- Words should be related but distinct enough to create interesting discussions\n\
- Both words should be describable in similar ways to create confusion\n\
- Scale difficulty: 1=obviously different pairs, 5=moderate, 10=very subtle differences\n\
- Examples: {civilian: \"coffee\", undercover: \"tea\"}, {civilian: \"guitar\", undercover: \"ukulele\"}";

#[derive(Debug, Clone)]
pub struct UndercoverSettings {
    pub language: String,
    pub difficulty: u8,
    pub preferences: String,
}

impl Default for UndercoverSettings {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            difficulty: 5,
            preferences: String::new(),
        }
    }
}

/// Content source for word pairs. Structured content, no fallback parsing.
pub struct PairSource {
    settings: UndercoverSettings,
}

impl PairSource {
    pub fn new(settings: UndercoverSettings) -> Self {
        Self { settings }
    }
}

impl ContentSource for PairSource {
    type Item = WordPair;

    fn game_id(&self) -> &'static str {
        "undercover"
    }

    fn batch_size(&self) -> usize {
        10
    }

    fn low_water_mark(&self) -> usize {
        3
    }

    fn history_hint_limit(&self) -> usize {
        50
    }

    fn prompts(&self, count: usize, history: &[String]) -> (String, String) {
        let mut user = format!(
            "Generate {count} word pairs for Undercover.\nLanguage: {}\nDifficulty: {}/10\n",
            self.settings.language, self.settings.difficulty,
        );
        if !self.settings.preferences.is_empty() {
            user.push_str(&format!("Theme/preferences: {}", self.settings.preferences));
        }
        if !history.is_empty() {
            user.push_str(&format!(
                "\nAvoid these previously used word pairs: {}",
                history.join(", ")
            ));
        }
        (SYSTEM_PROMPT.to_string(), user)
    }

    fn parse(&self, raw: &str) -> GameResult<Vec<WordPair>> {
        parse::parse_structured(raw)
    }

    fn history_label(&self, item: &WordPair) -> String {
        format!("{}/{}", item.civilian, item.undercover)
    }
}

/// One participant in an undercover round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    /// The secret word dealt to this player.
    pub word: String,
    pub is_undercover: bool,
    pub revealed: bool,
    pub eliminated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Civilians,
    Undercover,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub winner: Winner,
    pub undercover_name: String,
}

/// State of one round, from dealing words to a decided winner.
#[derive(Debug)]
pub struct UndercoverRound {
    players: Vec<Player>,
}

impl UndercoverRound {
    /// Deal the pair: one random player gets the undercover word. Returns
    /// `None` when `names` is empty.
    pub fn new(names: &[String], pair: &WordPair) -> Option<Self> {
        if names.is_empty() {
            return None;
        }
        let undercover_idx = rand::rng().random_range(0..names.len());
        Some(Self::with_undercover(names, pair, undercover_idx))
    }

    /// Deal with a fixed undercover index (deterministic tests, replays).
    pub fn with_undercover(names: &[String], pair: &WordPair, undercover_idx: usize) -> Self {
        let players = names
            .iter()
            .enumerate()
            .map(|(i, name)| Player {
                name: name.clone(),
                word: if i == undercover_idx {
                    pair.undercover.clone()
                } else {
                    pair.civilian.clone()
                },
                is_undercover: i == undercover_idx,
                revealed: false,
                eliminated: false,
            })
            .collect();
        Self { players }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn alive(&self) -> usize {
        self.players.iter().filter(|p| !p.eliminated).count()
    }

    /// Mark a player's secret word as seen.
    pub fn reveal(&mut self, idx: usize) {
        if let Some(player) = self.players.get_mut(idx) {
            player.revealed = true;
        }
    }

    pub fn all_revealed(&self) -> bool {
        self.players.iter().all(|p| p.revealed)
    }

    /// Eliminate a player and evaluate the win conditions. `Some` ends the
    /// round; out-of-range or repeated eliminations are ignored.
    pub fn eliminate(&mut self, idx: usize) -> Option<RoundResult> {
        let player = self.players.get_mut(idx)?;
        if player.eliminated {
            return None;
        }
        player.eliminated = true;

        let undercover_name = self
            .players
            .iter()
            .find(|p| p.is_undercover)
            .map(|p| p.name.clone())?;
        let undercover_alive = self
            .players
            .iter()
            .any(|p| p.is_undercover && !p.eliminated);

        if !undercover_alive {
            Some(RoundResult {
                winner: Winner::Civilians,
                undercover_name,
            })
        } else if self.alive() <= 2 {
            Some(RoundResult {
                winner: Winner::Undercover,
                undercover_name,
            })
        } else {
            None
        }
    }
}
