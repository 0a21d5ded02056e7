use std::path::PathBuf;

use crate::engine::controller::{RoundOutcome, RoundTicket};
use crate::engine::sprite::SpriteImage;
use crate::model::quiz_state::{CounterSnapshot, RevealedAnswer};

pub enum EngineCommand {
    /// Count the visit and load the first round.
    Start,
    /// Card activated by pointer, Enter or Space.
    RevealOrAdvance,
    ExportIcons(PathBuf),

    /// Sent by the engine to itself when a round's trials finish.
    RoundAcquired {
        ticket: RoundTicket,
        outcome: RoundOutcome,
        sprite: Option<SpriteImage>,
    },
}

#[derive(Debug)]
pub enum EngineResponse {
    AnswerCleared,
    SpriteShown { url: String, alt: String },
    SpriteLoaded(SpriteImage),
    PlaceholderLoaded(SpriteImage),
    LoadFailed(String),
    AnswerRevealed(RevealedAnswer),
    Counters(CounterSnapshot),
    IconsExported(Result<Vec<PathBuf>, String>),
}
