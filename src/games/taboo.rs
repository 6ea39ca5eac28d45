use crate::content::TabooCard;
use crate::error::GameResult;
use crate::parse;
use crate::supply::ContentSource;

const SYSTEM_PROMPT: &str = "You are a card generator for the Taboo word game. Generate cards with a target word and 5 forbidden/taboo words that players cannot say while describing the target.\n\n\
Rules:\n\
- Return ONLY a JSON array of objects with \"word\" and \"forbidden\" fields\n\
- Each \"forbidden\" array must have exactly 5 words\n\
- Forbidden words should be the most obvious clues for the target word\n\
- Scale difficulty: 1=common words, 5=moderate, 10=obscure/challenging\n\
- Make cards fun and varied";

#[derive(Debug, Clone)]
pub struct TabooSettings {
    pub language: String,
    pub difficulty: u8,
    pub timer_seconds: u32,
    pub preferences: String,
}

impl Default for TabooSettings {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            difficulty: 5,
            timer_seconds: 60,
            preferences: String::new(),
        }
    }
}

/// Content source for taboo cards. Structured content: a parse failure is a
/// hard error, there is no line-based fallback.
pub struct TabooSource {
    settings: TabooSettings,
}

impl TabooSource {
    pub fn new(settings: TabooSettings) -> Self {
        Self { settings }
    }
}

impl ContentSource for TabooSource {
    type Item = TabooCard;

    fn game_id(&self) -> &'static str {
        "taboo"
    }

    fn batch_size(&self) -> usize {
        40
    }

    fn low_water_mark(&self) -> usize {
        20
    }

    fn prompts(&self, count: usize, history: &[String]) -> (String, String) {
        let mut user = format!(
            "Generate {count} Taboo cards.\nLanguage: {}\nDifficulty: {}/10\n",
            self.settings.language, self.settings.difficulty,
        );
        if !self.settings.preferences.is_empty() {
            user.push_str(&format!("Theme/preferences: {}", self.settings.preferences));
        }
        if !history.is_empty() {
            user.push_str(&format!(
                "\nAvoid these previously used target words: {}",
                history.join(", ")
            ));
        }
        (SYSTEM_PROMPT.to_string(), user)
    }

    fn parse(&self, raw: &str) -> GameResult<Vec<TabooCard>> {
        parse::parse_structured(raw)
    }

    fn history_label(&self, item: &TabooCard) -> String {
        item.word.clone()
    }
}
