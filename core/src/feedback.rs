use core::{fmt, str::FromStr};

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// How much of a scored guess is disclosed to the player.
///
/// Listed by increasing disclosure. The host refers to the modes by their
/// labels `1`, `2`, `3`, `3a`, `4`, `4a`, `5` and `5a`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FeedbackLabel", into = "FeedbackLabel")]
pub enum FeedbackMode {
    /// `1`: solved or not.
    Binary,
    /// `2`: number of correct and not-correct slots.
    Tally,
    /// `3`: correct and incorrect counts plus distinct colors needed elsewhere.
    ColorHint,
    /// `3a`: correct and incorrect counts plus slots whose color is needed elsewhere.
    SlotHint,
    /// `4`: correct positions, incorrect count, distinct colors needed elsewhere.
    PositionalColorHint,
    /// `4a`: correct positions, incorrect count, slots whose color is needed elsewhere.
    PositionalSlotHint,
    /// `5`: a mark per slot, elsewhere-hints capped by how many of the color are still needed.
    CappedMarks,
    /// `5a`: a mark per slot, every elsewhere-hint shown.
    Marks,
}

impl FeedbackMode {
    pub const ALL: [FeedbackMode; 8] = [
        FeedbackMode::Binary,
        FeedbackMode::Tally,
        FeedbackMode::ColorHint,
        FeedbackMode::SlotHint,
        FeedbackMode::PositionalColorHint,
        FeedbackMode::PositionalSlotHint,
        FeedbackMode::CappedMarks,
        FeedbackMode::Marks,
    ];

    pub const fn label(self) -> &'static str {
        use FeedbackMode::*;
        match self {
            Binary => "1",
            Tally => "2",
            ColorHint => "3",
            SlotHint => "3a",
            PositionalColorHint => "4",
            PositionalSlotHint => "4a",
            CappedMarks => "5",
            Marks => "5a",
        }
    }

    /// Whether the player learns which slots are correct.
    pub const fn discloses_positions(self) -> bool {
        use FeedbackMode::*;
        match self {
            Binary | Tally | ColorHint | SlotHint => false,
            PositionalColorHint | PositionalSlotHint | CappedMarks | Marks => true,
        }
    }
}

impl Default for FeedbackMode {
    fn default() -> Self {
        Self::CappedMarks
    }
}

impl fmt::Display for FeedbackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FeedbackMode {
    type Err = RoundError;

    fn from_str(s: &str) -> Result<Self> {
        let label = s.trim();
        FeedbackMode::ALL
            .into_iter()
            .find(|mode| mode.label().eq_ignore_ascii_case(label))
            .ok_or_else(|| RoundError::UnknownFeedbackMode(label.into()))
    }
}

/// Wire form of a [`FeedbackMode`]: the plain modes travel as numbers, the
/// `a` variants as strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedbackLabel {
    Number(u32),
    Text(String),
}

impl TryFrom<FeedbackLabel> for FeedbackMode {
    type Error = RoundError;

    fn try_from(label: FeedbackLabel) -> Result<Self> {
        match label {
            FeedbackLabel::Number(number) => number.to_string().parse(),
            FeedbackLabel::Text(text) => text.parse(),
        }
    }
}

impl From<FeedbackMode> for FeedbackLabel {
    fn from(mode: FeedbackMode) -> Self {
        let label = mode.label();
        match label.parse() {
            Ok(number) => FeedbackLabel::Number(number),
            Err(_) => FeedbackLabel::Text(label.into()),
        }
    }
}

/// What the player is shown for one scored guess.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DisclosedFeedback {
    Binary {
        all_correct: bool,
    },
    Tally {
        correct: usize,
        not_correct: usize,
    },
    Hint {
        correct: usize,
        incorrect: usize,
        elsewhere: usize,
    },
    Positional {
        correct_slots: SmallVec<[bool; SLOT_LIMIT]>,
        incorrect: usize,
        elsewhere: usize,
    },
    Marked {
        marks: SmallVec<[Verdict; SLOT_LIMIT]>,
    },
}

/// Renders `results` under `mode`.
///
/// `solution` is only consulted by [`FeedbackMode::CappedMarks`], which needs
/// to know how many pegs of each color are still unmatched.
pub fn format_feedback(
    results: &[SlotResult],
    solution: &[Color],
    mode: FeedbackMode,
) -> DisclosedFeedback {
    use FeedbackMode::*;

    let correct = count_verdict(results, Verdict::Correct);
    let incorrect = count_verdict(results, Verdict::Incorrect);

    match mode {
        Binary => DisclosedFeedback::Binary {
            all_correct: is_solved(results),
        },
        Tally => DisclosedFeedback::Tally {
            correct,
            not_correct: results.len() - correct,
        },
        ColorHint => DisclosedFeedback::Hint {
            correct,
            incorrect,
            elsewhere: distinct_elsewhere_colors(results),
        },
        SlotHint => DisclosedFeedback::Hint {
            correct,
            incorrect,
            elsewhere: count_verdict(results, Verdict::WrongPosition),
        },
        PositionalColorHint => DisclosedFeedback::Positional {
            correct_slots: correct_slots(results),
            incorrect,
            elsewhere: distinct_elsewhere_colors(results),
        },
        PositionalSlotHint => DisclosedFeedback::Positional {
            correct_slots: correct_slots(results),
            incorrect,
            elsewhere: count_verdict(results, Verdict::WrongPosition),
        },
        CappedMarks => DisclosedFeedback::Marked {
            marks: capped_marks(results, solution),
        },
        Marks => DisclosedFeedback::Marked {
            marks: results.iter().map(|result| result.status).collect(),
        },
    }
}

fn distinct_elsewhere_colors(results: &[SlotResult]) -> usize {
    results
        .iter()
        .filter(|result| result.status == Verdict::WrongPosition)
        .map(|result| result.color)
        .collect::<HashSet<_>>()
        .len()
}

fn correct_slots(results: &[SlotResult]) -> SmallVec<[bool; SLOT_LIMIT]> {
    results
        .iter()
        .map(|result| result.status.is_correct())
        .collect()
}

/// Downgrades an elsewhere-hint to incorrect once the hints already given for
/// its color to the left reach the number of unmatched solution pegs of that
/// color.
fn capped_marks(results: &[SlotResult], solution: &[Color]) -> SmallVec<[Verdict; SLOT_LIMIT]> {
    results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            if result.status != Verdict::WrongPosition {
                return result.status;
            }

            let still_needed = solution
                .iter()
                .zip(results)
                .filter(|(color, slot)| **color == result.color && !slot.status.is_correct())
                .count();
            let hinted_before = results[..index]
                .iter()
                .filter(|earlier| {
                    earlier.status == Verdict::WrongPosition && earlier.color == result.color
                })
                .count();

            if hinted_before < still_needed {
                Verdict::WrongPosition
            } else {
                Verdict::Incorrect
            }
        })
        .collect()
}

impl fmt::Display for DisclosedFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DisclosedFeedback::*;
        match self {
            Binary { all_correct } => f.write_str(if *all_correct { "✓" } else { "✗" }),
            Tally {
                correct,
                not_correct,
            } => write!(f, "✓ {correct} ✗ {not_correct}"),
            Hint {
                correct,
                incorrect,
                elsewhere,
            } => write!(f, "✓ {correct} ✗ {incorrect} C {elsewhere}"),
            Positional {
                correct_slots,
                incorrect,
                elsewhere,
            } => {
                for &correct in correct_slots {
                    f.write_str(if correct { "✓" } else { "·" })?;
                }
                write!(f, " ✗ {incorrect} C {elsewhere}")
            }
            Marked { marks } => {
                for mark in marks {
                    write!(f, "{}", mark.glyph())?;
                }
                Ok(())
            }
        }
    }
}
