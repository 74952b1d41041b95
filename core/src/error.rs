use thiserror::Error;

use crate::Color;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("Guess is incomplete, every slot needs a color")]
    IncompleteGuess,
    #[error("Slot {slot} is out of range for a code of {slots} slots")]
    InvalidSlot { slot: usize, slots: usize },
    #[error("Color {0} is not available in this round")]
    ColorUnavailable(Color),
    #[error("Solution must have between 1 and {max} slots, got {len}")]
    InvalidSolutionLength { len: usize, max: usize },
    #[error("Guess has {actual} slots but the solution has {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Unknown feedback mode {0:?}")]
    UnknownFeedbackMode(String),
    #[error("Invalid round configuration: {0}")]
    InvalidConfig(String),
    #[error("Round is still in progress")]
    RoundInProgress,
    #[error("Round already ended, no new moves are accepted")]
    RoundOver,
    #[error("Session time budget is exhausted")]
    BudgetExhausted,
}

pub type Result<T> = core::result::Result<T, RoundError>;
