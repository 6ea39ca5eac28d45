use serde::{Deserialize, Serialize};

/// A Taboo card: the target word plus the five clue words players must not say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabooCard {
    pub word: String,
    pub forbidden: Vec<String>,
}

/// A word pair for Undercover: most players get the civilian word, one player
/// gets the undercover word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub civilian: String,
    pub undercover: String,
}

/// One unit of game material served to players. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    Word(String),
    Card(TabooCard),
    Pair(WordPair),
}

impl ContentItem {
    /// Short label recorded in history once the item has been shown.
    pub fn history_label(&self) -> String {
        match self {
            ContentItem::Word(word) => word.clone(),
            ContentItem::Card(card) => card.word.clone(),
            ContentItem::Pair(pair) => format!("{}/{}", pair.civilian, pair.undercover),
        }
    }
}
