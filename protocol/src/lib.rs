//! Host-facing records for finished rounds.
//!
//! A [`RoundResult`] nests its guesses; data exports want one flat row per
//! guess with the round's fields repeated on each row. [`GuessRow::flatten`]
//! does that projection, leaving the choice of file format to the host.

use mastermindle_core::{Color, GuessRecord, RoundResult};
use serde::{Deserialize, Serialize};

/// Where a round sat in the host's timeline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialInfo {
    pub trial_index: usize,
    pub trial_number: usize,
    pub trial_name: String,
    pub trial_start: u64,
    pub trial_end: u64,
}

impl TrialInfo {
    pub fn trial_duration(&self) -> u64 {
        self.trial_end.saturating_sub(self.trial_start)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessRow {
    pub trial_index: usize,
    pub trial_number: usize,
    pub trial_name: String,
    pub trial_start: u64,
    pub trial_end: u64,
    pub trial_duration: u64,
    pub solution: String,
    pub solved: bool,
    pub slots: u32,
    pub colors: u32,
    pub skipped: bool,
    pub time_left: u32,
    pub guess_index: Option<usize>,
    pub guess_start: Option<u64>,
    pub guess_end: Option<u64>,
    pub guess_duration: Option<u64>,
    pub is_correct: Option<bool>,
    pub guess_colors: Option<String>,
    pub result_statuses: Option<String>,
}

impl GuessRow {
    /// One row per guess, or a single row with empty guess fields when the
    /// round ended without any guess.
    pub fn flatten(result: &RoundResult, trial: &TrialInfo) -> Vec<GuessRow> {
        let base = GuessRow {
            trial_index: trial.trial_index,
            trial_number: trial.trial_number,
            trial_name: trial.trial_name.clone(),
            trial_start: trial.trial_start,
            trial_end: trial.trial_end,
            trial_duration: trial.trial_duration(),
            solution: join_colors(&result.solution),
            solved: result.solved,
            slots: result.slots,
            colors: result.colors,
            skipped: result.skipped,
            time_left: result.time_left,
            guess_index: None,
            guess_start: None,
            guess_end: None,
            guess_duration: None,
            is_correct: None,
            guess_colors: None,
            result_statuses: None,
        };

        if result.guesses.is_empty() {
            return vec![base];
        }

        result
            .guesses
            .iter()
            .map(|guess| base.clone().with_guess(guess))
            .collect()
    }

    fn with_guess(self, guess: &GuessRecord) -> Self {
        let statuses: Vec<_> = guess
            .results
            .iter()
            .map(|result| result.status.as_str())
            .collect();
        Self {
            guess_index: Some(guess.index),
            guess_start: Some(guess.start.as_millis()),
            guess_end: Some(guess.end.as_millis()),
            guess_duration: Some(guess.duration),
            is_correct: Some(guess.is_correct),
            guess_colors: Some(join_colors(&guess.colors)),
            result_statuses: Some(statuses.join(",")),
            ..self
        }
    }
}

fn join_colors(colors: &[Color]) -> String {
    colors
        .iter()
        .map(|color| color.name())
        .collect::<Vec<_>>()
        .join(",")
}

/// Serializes rows as a JSON array.
pub fn rows_to_json(rows: &[GuessRow]) -> serde_json::Result<String> {
    serde_json::to_string(rows)
}
