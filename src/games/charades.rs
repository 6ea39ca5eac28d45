use crate::error::GameResult;
use crate::parse;
use crate::supply::ContentSource;

const SYSTEM_PROMPT: &str = "You are a word generator for a Charades party game. Generate fun, actable words/phrases appropriate for the given difficulty level (1=easy, 10=very hard).\n\n\
Rules:\n\
- Return ONLY a JSON array of strings, nothing else\n\
- Make them fun, varied, and suitable for acting out\n\
- Avoid duplicates within the batch\n\
- Scale difficulty: 1=common objects/animals, 5=actions/movies, 10=abstract concepts\n\
- When told \"single words only\", each item must be exactly one word\n\
- When told \"phrases only\", each item must be 2-4 words\n\
- When told \"mixed\", use a mix of single words and short phrases";

/// Word length mix requested from the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordType {
    Single,
    Phrases,
    #[default]
    Mixed,
}

impl WordType {
    fn instruction(self) -> &'static str {
        match self {
            WordType::Single => "single words only",
            WordType::Phrases => "phrases only",
            WordType::Mixed => "mixed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CharadesSettings {
    pub language: String,
    pub difficulty: u8,
    pub word_type: WordType,
    pub preferences: String,
}

impl Default for CharadesSettings {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            difficulty: 5,
            word_type: WordType::Mixed,
            preferences: String::new(),
        }
    }
}

/// Content source for charades words.
pub struct CharadesSource {
    settings: CharadesSettings,
}

impl CharadesSource {
    pub fn new(settings: CharadesSettings) -> Self {
        Self { settings }
    }
}

impl ContentSource for CharadesSource {
    type Item = String;

    fn game_id(&self) -> &'static str {
        "charades"
    }

    fn batch_size(&self) -> usize {
        40
    }

    fn low_water_mark(&self) -> usize {
        20
    }

    fn prompts(&self, count: usize, history: &[String]) -> (String, String) {
        let mut user = format!(
            "Generate {count} charades words/phrases.\nLanguage: {}\nDifficulty: {}/10\nWord type: {}\n",
            self.settings.language,
            self.settings.difficulty,
            self.settings.word_type.instruction(),
        );
        if !self.settings.preferences.is_empty() {
            user.push_str(&format!("Theme/preferences: {}", self.settings.preferences));
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
