pub mod charades;
pub mod headsup;
pub mod taboo;
pub mod undercover;

/// Static catalogue entry for one game in the suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    pub min_players: &'static str,
}

const CATALOGUE: [GameInfo; 4] = [
    GameInfo {
        id: "charades",
        name: "Charades",
        description: "Act out words without speaking. Hold to peek, then perform!",
        emoji: "\u{1F3AD}",
        min_players: "2+ players",
    },
    GameInfo {
        id: "taboo",
        name: "Taboo",
        description: "Describe the word without using any of the forbidden words!",
        emoji: "\u{1F6AB}",
        min_players: "2+ players",
    },
    GameInfo {
        id: "undercover",
        name: "Undercover",
        description: "Find the spy with a different word! Discuss, deduce, eliminate.",
        emoji: "\u{1F575}\u{FE0F}",
        min_players: "4-12 players",
    },
    GameInfo {
        id: "headsup",
        name: "Heads Up",
        description: "Hold the phone on your forehead while friends describe the word. Tilt to answer!",
        emoji: "\u{1F4F1}",
        min_players: "2+ players",
    },
];

/// Every game in the suite, menu order.
pub fn catalogue() -> &'static [GameInfo] {
    &CATALOGUE
}
