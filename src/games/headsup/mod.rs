//! Heads Up: the motion-controlled game. One player holds the phone on their
//! forehead; the others describe the displayed word. Tilting forward marks a
//! pass and backward a miss, both advancing to the next word until the round
//! timer runs out.

mod machine;
mod session;

pub use machine::{Effect, HeadsUpMachine, Phase, WordOutcome, TILT_COOLDOWN};
pub use session::{HeadsUpSession, HeadsUpView, SessionCommand};

use crate::error::GameResult;
use crate::parse;
use crate::supply::ContentSource;

const SYSTEM_PROMPT: &str = "You are a word/phrase generator for a \"Heads Up\" party game. Players hold a phone on their forehead and others describe the word without saying it.\n\n\
Rules:\n\
- Return ONLY a JSON array of strings, nothing else\n\
- Generate fun, describable words/phrases suitable for the game\n\
- Avoid duplicates within the batch\n\
- Scale difficulty: 1=common everyday words, 5=popular culture/moderate, 10=obscure/challenging\n\
- Words should be 1-3 words max (short enough to display large on a phone screen)";

#[derive(Debug, Clone)]
pub struct HeadsUpSettings {
    pub language: String,
    pub timer_seconds: u32,
    pub difficulty: u8,
    pub preferences: String,
}

impl Default for HeadsUpSettings {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            timer_seconds: 60,
            difficulty: 5,
            preferences: String::new(),
        }
    }
}

/// Content source for heads-up words.
pub struct WordSource {
    settings: HeadsUpSettings,
}

impl WordSource {
    pub fn new(settings: HeadsUpSettings) -> Self {
        Self { settings }
    }
}

impl ContentSource for WordSource {
    type Item = String;

    fn game_id(&self) -> &'static str {
        "headsup"
    }

    fn batch_size(&self) -> usize {
        20
    }

    fn low_water_mark(&self) -> usize {
        5
    }

    fn prompts(&self, count: usize, history: &[String]) -> (String, String) {
        let mut user = format!(
            "Generate {count} words/phrases for Heads Up.\nLanguage: {}\nDifficulty: {}/10\n",
            self.settings.language, self.settings.difficulty,
        );
        if self.settings.preferences.is_empty() {
            user.push_str("Mix of fun categories");
        } else {
            user.push_str(&format!("Theme/category: {}", self.settings.preferences));
        }
        if !history.is_empty() {
            user.push_str(&format!(
                "\nAvoid these previously used words: {}",
                history.join(", ")
            ));
        }
        (SYSTEM_PROMPT.to_string(), user)
    }

    fn parse(&self, raw: &str) -> GameResult<Vec<String>> {
        Ok(parse::parse_words(raw))
    }

    fn history_label(&self, item: &String) -> String {
        item.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_defaults_to_mixed_categories() {
        let source = WordSource::new(HeadsUpSettings::default());
        let (system, user) = source.prompts(20, &[]);
        assert!(system.contains("Heads Up"));
        assert!(user.contains("Mix of fun categories"));
    }

    #[test]
    fn test_prompt_with_theme_and_history() {
        let source = WordSource::new(HeadsUpSettings {
            preferences: "animals".to_string(),
            ..Default::default()
        });
        let (_, user) = source.prompts(20, &["giraffe".to_string()]);
        assert!(user.contains("Theme/category: animals"));
        assert!(user.contains("Avoid these previously used words: giraffe"));
    }
}
