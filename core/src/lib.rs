use core::ops::Index;
use serde::{Deserialize, Serialize};

pub use error::*;
pub use feedback::*;
pub use generator::*;
pub use round::*;
pub use scoring::*;
pub use session::*;
pub use types::*;

mod error;
mod feedback;
mod generator;
mod round;
mod scoring;
mod session;
mod types;

use types::clamp_setting;

/// Settings for a single round, as supplied by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoundConfig {
    pub slots: u32,
    pub colors: u32,
    /// Countdown length in seconds.
    #[serde(alias = "timelimit")]
    pub time_limit: u32,
    pub max_guesses: u32,
    pub feedback: FeedbackMode,
    pub keep_correct: bool,
    /// Show the clock counting up towards this value instead of counting down.
    pub count_up_to: Option<u32>,
}

impl RoundConfig {
    pub fn new(slots: u32, colors: u32, time_limit: u32, max_guesses: u32) -> Self {
        Self {
            slots,
            colors,
            time_limit,
            max_guesses,
            ..Default::default()
        }
        .normalized()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str::<Self>(json)
            .map(Self::normalized)
            .map_err(|err| RoundError::InvalidConfig(err.to_string()))
    }

    pub fn with_feedback(self, feedback: FeedbackMode) -> Self {
        Self { feedback, ..self }
    }

    pub fn with_keep_correct(self, keep_correct: bool) -> Self {
        Self {
            keep_correct,
            ..self
        }
    }

    pub fn with_count_up_to(self, count_up_to: Option<u32>) -> Self {
        Self {
            count_up_to,
            ..self
        }
    }

    /// Clamps slots and colors into `1..=12` and guesses to at least one.
    pub fn normalized(self) -> Self {
        Self {
            slots: clamp_setting("slots", self.slots, 1, SLOT_LIMIT as u32),
            colors: clamp_setting("colors", self.colors, 1, COLOR_LIMIT as u32),
            max_guesses: clamp_setting("max guesses", self.max_guesses, 1, u32::MAX),
            ..self
        }
    }

    pub fn color_space(&self) -> ColorSpace {
        ColorSpace::new(self.colors)
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            slots: 4,
            colors: 4,
            time_limit: 600,
            max_guesses: 10,
            feedback: FeedbackMode::default(),
            keep_correct: true,
            count_up_to: None,
        }
    }
}

/// The hidden code of a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    code: ColorCode,
}

impl Solution {
    pub(crate) fn new_unchecked(code: ColorCode) -> Self {
        Self { code }
    }

    /// Uses `colors` verbatim, rejecting codes that do not fit the color space.
    pub fn from_colors(colors: &[Color], space: &ColorSpace) -> Result<Self> {
        if colors.is_empty() || colors.len() > SLOT_LIMIT {
            return Err(RoundError::InvalidSolutionLength {
                len: colors.len(),
                max: SLOT_LIMIT,
            });
        }
        if let Some(&color) = colors.iter().find(|&&color| !space.contains(color)) {
            return Err(RoundError::ColorUnavailable(color));
        }
        Ok(Self::new_unchecked(colors.into()))
    }

    pub fn colors(&self) -> &[Color] {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

impl Index<usize> for Solution {
    type Output = Color;

    fn index(&self, slot: usize) -> &Self::Output {
        &self.code[slot]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    NoChange,
    Continue,
    Solved,
    OutOfGuesses,
}

impl SubmitOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn ends_round(self) -> bool {
        matches!(self, Self::Solved | Self::OutOfGuesses)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    NoChange,
    Ticked,
    /// The clock just reached the low-time mark, reported once per round.
    LowTime,
    TimedOut,
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}
