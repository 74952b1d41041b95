use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Seconds shared by every round of the session.
    pub time_budget: u32,
    pub slots: u32,
    pub colors: u32,
    pub max_guesses: u32,
    pub feedback: FeedbackMode,
    pub keep_correct: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_budget: 600,
            slots: 3,
            colors: 3,
            max_guesses: 10,
            feedback: FeedbackMode::default(),
            keep_correct: true,
        }
    }
}

/// Back-to-back rounds drawing on one time budget.
///
/// Each round gets whatever time the previous one left over, and the player
/// may change the code size between rounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSession {
    config: SessionConfig,
    time_left: u32,
    slots: u32,
    colors: u32,
    rounds_played: u32,
}

impl RoundSession {
    pub fn new(config: SessionConfig) -> Self {
        let mut session = Self {
            config,
            time_left: config.time_budget,
            slots: config.slots,
            colors: config.colors,
            rounds_played: 0,
        };
        session.adjust(config.slots, config.colors);
        session
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_exhausted(&self) -> bool {
        self.time_left == 0
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn slots(&self) -> u32 {
        self.slots
    }

    pub fn colors(&self) -> u32 {
        self.colors
    }

    /// Changes the code size used from the next round on.
    pub fn adjust(&mut self, slots: u32, colors: u32) {
        let next = self.next_round_config();
        let next = RoundConfig {
            slots,
            colors,
            ..next
        }
        .normalized();
        self.slots = next.slots;
        self.colors = next.colors;
    }

    pub fn next_round_config(&self) -> RoundConfig {
        RoundConfig {
            slots: self.slots,
            colors: self.colors,
            time_limit: self.time_left,
            max_guesses: self.config.max_guesses,
            feedback: self.config.feedback,
            keep_correct: self.config.keep_correct,
            count_up_to: None,
        }
    }

    pub fn start_round(&self, generator: impl SolutionGenerator) -> Result<RoundController> {
        if self.is_exhausted() {
            return Err(RoundError::BudgetExhausted);
        }
        Ok(RoundController::new(self.next_round_config(), generator))
    }

    /// Books a finished round against the budget.
    pub fn complete_round(&mut self, result: &RoundResult) {
        self.time_left = self.time_left.min(result.time_left);
        self.rounds_played += 1;
        log::debug!(
            "Session round {} done ({}), {}s left",
            self.rounds_played,
            if result.solved { "solved" } else { "unsolved" },
            self.time_left
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(time_budget: u32) -> RoundSession {
        RoundSession::new(SessionConfig {
            time_budget,
            ..Default::default()
        })
    }

    #[test]
    fn rounds_inherit_remaining_time() {
        let mut session = session(100);
        let mut round = session.start_round(RandomSolutionGenerator::new(1)).unwrap();
        assert_eq!(round.time_left(), 100);

        for _ in 0..40 {
            round.tick();
        }
        round.skip();
        session.complete_round(&round.finalize().unwrap());

        assert_eq!(session.time_left(), 60);
        assert_eq!(session.rounds_played(), 1);

        let next = session.start_round(RandomSolutionGenerator::new(2)).unwrap();
        assert_eq!(next.time_left(), 60);
    }

    #[test]
    fn exhausted_budget_refuses_new_rounds() {
        let mut session = session(1);
        let mut round = session.start_round(RandomSolutionGenerator::new(1)).unwrap();
        round.tick();
        session.complete_round(&round.finalize().unwrap());

        assert!(session.is_exhausted());
        assert_eq!(
            session.start_round(RandomSolutionGenerator::new(2)).err(),
            Some(RoundError::BudgetExhausted)
        );
    }

    #[test]
    fn adjusted_sizes_apply_to_next_round() {
        let mut session = session(100);
        session.adjust(6, 40);

        assert_eq!(session.slots(), 6);
        assert_eq!(session.colors(), 12);

        let round = session.start_round(RandomSolutionGenerator::new(9)).unwrap();
        assert_eq!(round.slots(), 6);
        assert_eq!(round.color_space().count(), 12);
    }

    #[test]
    fn starting_sizes_are_clamped() {
        let session = RoundSession::new(SessionConfig {
            slots: 0,
            colors: 0,
            ..Default::default()
        });

        assert_eq!(session.slots(), 1);
        assert_eq!(session.colors(), 1);
    }
}
