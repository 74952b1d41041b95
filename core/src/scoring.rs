use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Outcome of comparing one guessed color against the solution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Correct,
    WrongPosition,
    Incorrect,
}

impl Verdict {
    pub const fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }

    pub const fn as_str(self) -> &'static str {
        use Verdict::*;
        match self {
            Correct => "correct",
            WrongPosition => "wrong-position",
            Incorrect => "incorrect",
        }
    }

    /// Glyph shown next to a slot: `✓`, `C` or `✗`.
    pub const fn glyph(self) -> char {
        use Verdict::*;
        match self {
            Correct => '✓',
            WrongPosition => 'C',
            Incorrect => '✗',
        }
    }
}

/// A guessed color together with its verdict.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotResult {
    pub color: Color,
    pub status: Verdict,
}

impl SlotResult {
    pub const fn new(color: Color, status: Verdict) -> Self {
        Self { color, status }
    }
}

pub type Verdicts = SmallVec<[SlotResult; SLOT_LIMIT]>;

/// Scores `guess` against `solution` with classic peg counting.
///
/// Exact matches are taken first. The remaining slots are then visited left to
/// right and receive [`Verdict::WrongPosition`] while the solution still has an
/// unclaimed peg of that color, so surplus copies further right end up
/// [`Verdict::Incorrect`].
pub fn evaluate(solution: &[Color], guess: &[Color]) -> Result<Verdicts> {
    if solution.len() != guess.len() {
        return Err(RoundError::LengthMismatch {
            expected: solution.len(),
            actual: guess.len(),
        });
    }

    let mut remaining = [0usize; COLOR_LIMIT];
    for color in solution {
        remaining[color.index()] += 1;
    }

    let mut results: Verdicts = guess
        .iter()
        .zip(solution)
        .map(|(&guessed, &expected)| {
            if guessed == expected {
                remaining[guessed.index()] -= 1;
                SlotResult::new(guessed, Verdict::Correct)
            } else {
                SlotResult::new(guessed, Verdict::Incorrect)
            }
        })
        .collect();

    for result in results.iter_mut().filter(|result| !result.status.is_correct()) {
        let left = &mut remaining[result.color.index()];
        if *left > 0 {
            *left -= 1;
            result.status = Verdict::WrongPosition;
        }
    }

    log::trace!(
        "Scored guess {:?} against {} slots: {:?}",
        guess,
        solution.len(),
        results.iter().map(|result| result.status).collect::<SmallVec<[_; SLOT_LIMIT]>>()
    );
    Ok(results)
}

pub fn is_solved(results: &[SlotResult]) -> bool {
    results.iter().all(|result| result.status.is_correct())
}

pub fn count_verdict(results: &[SlotResult], verdict: Verdict) -> usize {
    results
        .iter()
        .filter(|result| result.status == verdict)
        .count()
}
