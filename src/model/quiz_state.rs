use serde::{Deserialize, Serialize};

/// Which side of the card is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardPhase {
    #[default]
    Hidden,
    Revealed,
}

/// State of the current round. Replaced wholesale when a round commits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizState {
    pub current_id: Option<u32>,
    pub revealed: bool,
    pub sprite_url: Option<String>,
    pub primary_type: Option<String>,
    pub all_types: Vec<String>,
    pub strength_score: Option<u32>,
    pub localized_name: Option<String>,
}

impl QuizState {
    pub fn phase(&self) -> CardPhase {
        if self.revealed {
            CardPhase::Revealed
        } else {
            CardPhase::Hidden
        }
    }
}

/// Everything the card shows once flipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedAnswer {
    pub display_name: String,
    pub types: Vec<String>,
    pub strength_score: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub visits: u64,
    pub quizzes: u64,
}
