// Error types returned by the draft engine.

use thiserror::Error;

use crate::draft::step::{ActionKind, Team};
use crate::draft::validate::ValidationError;

/// Why the engine rejected an action. Every variant is recoverable: the
/// caller fixes its input and retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("cannot {action} now: {detail}")]
    IllegalStep { action: &'static str, detail: String },

    #[error("{team} pick slot {slot} needs a lane before a hero can be picked")]
    LaneRequired { team: Team, slot: usize },

    #[error("{team} pick slot {slot} is waiting for a player choice")]
    DecisionPending { team: Team, slot: usize },

    #[error("cannot start draft: {}", .0.join("; "))]
    PreconditionNotMet(Vec<String>),

    #[error("draft is not valid: {}", join_errors(.0))]
    ValidationFailed(Vec<ValidationError>),

    #[error("hero `{0}` is already banned or picked")]
    HeroUnavailable(String),

    #[error("hero `{0}` is not in the catalog")]
    UnknownHero(String),

    #[error("`{player}` is not a candidate for {team} pick slot {slot}")]
    UnknownCandidate { team: Team, slot: usize, player: String },

    #[error("{team} {kind} slot {slot} already holds `{hero}`")]
    SlotOccupied {
        team: Team,
        kind: ActionKind,
        slot: usize,
        hero: String,
    },

    #[error("no player choice is pending")]
    NoPendingDecision,

    #[error("slot index {0} is out of range (expected 0-4)")]
    SlotOutOfRange(usize),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
