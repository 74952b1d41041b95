use serde::{Deserialize, Serialize};

use crate::*;

/// Seconds left on the clock when the low-time signal fires.
pub const LOW_TIME_MARK: u32 = 30;

/// Valid transitions:
/// - Active -> Solved
/// - Active -> OutOfGuesses
/// - Active -> TimedOut
/// - Active -> Skipped
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Active,
    Solved,
    OutOfGuesses,
    TimedOut,
    Skipped,
}

impl RoundState {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_finished(self) -> bool {
        !self.is_active()
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::Active
    }
}

/// Snapshot of one submitted guess.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessRecord {
    pub index: usize,
    pub colors: ColorCode,
    pub results: Verdicts,
    pub is_correct: bool,
    pub start: Timestamp,
    pub end: Timestamp,
    /// Milliseconds spent on this guess.
    pub duration: u64,
}

/// Everything the host needs once a round is over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub solution: ColorCode,
    pub solved: bool,
    pub skipped: bool,
    pub colors: u32,
    pub slots: u32,
    pub time_left: u32,
    pub guesses: Vec<GuessRecord>,
}

/// Drives a single round from the first guess to one of its terminal states.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundController {
    config: RoundConfig,
    color_space: ColorSpace,
    solution: Solution,
    guess: GuessBuffer,
    time_left: u32,
    guesses_left: u32,
    state: RoundState,
    low_time_signalled: bool,
    guess_started_at: Timestamp,
    history: Vec<GuessRecord>,
}

impl RoundController {
    pub fn new(config: RoundConfig, generator: impl SolutionGenerator) -> Self {
        let config = config.normalized();
        let color_space = config.color_space();
        let solution = generator.generate(config.slots, &color_space);
        Self::from_parts(config, color_space, solution)
    }

    /// Starts a round with a known solution; its length overrides `config.slots`.
    pub fn with_solution(config: RoundConfig, solution: &[Color]) -> Result<Self> {
        let fixed = FixedSolution::new(solution.to_vec(), &config.normalized().color_space())?;
        Ok(Self::new(config, fixed))
    }

    fn from_parts(mut config: RoundConfig, color_space: ColorSpace, solution: Solution) -> Self {
        if solution.len() as u32 != config.slots {
            log::warn!(
                "Solution has {} slots but {} were configured, using the solution length",
                solution.len(),
                config.slots
            );
            config.slots = solution.len() as u32;
        }
        log::debug!(
            "Round started: {} slots, {} colors, {}s, {} guesses, feedback {}",
            config.slots,
            color_space.count(),
            config.time_limit,
            config.max_guesses,
            config.feedback
        );

        Self {
            guess: GuessBuffer::from_elem(None, solution.len()),
            time_left: config.time_limit,
            guesses_left: config.max_guesses,
            state: Default::default(),
            low_time_signalled: false,
            guess_started_at: Timestamp::now(),
            history: Vec::new(),
            config,
            color_space,
            solution,
        }
    }

    /// Overrides when the first guess is considered to have started.
    pub fn with_start_time(mut self, started_at: Timestamp) -> Self {
        self.guess_started_at = started_at;
        self
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn round_over(&self) -> bool {
        self.state.is_finished()
    }

    pub fn slots(&self) -> usize {
        self.solution.len()
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn guesses_left(&self) -> u32 {
        self.guesses_left
    }

    pub fn current_guess(&self) -> &[Option<Color>] {
        &self.guess
    }

    pub fn history(&self) -> &[GuessRecord] {
        &self.history
    }

    pub fn last_guess(&self) -> Option<&GuessRecord> {
        self.history.last()
    }

    /// The hidden code, revealed only once the round is over.
    pub fn solution(&self) -> Option<&[Color]> {
        self.state.is_finished().then(|| self.solution.colors())
    }

    /// Feedback for the guess at `index`, rendered under the round's mode.
    pub fn feedback(&self, index: usize) -> Option<DisclosedFeedback> {
        self.history.get(index).map(|record| {
            format_feedback(&record.results, self.solution.colors(), self.config.feedback)
        })
    }

    /// Seconds shown on the clock, counting up when the config asks for it.
    pub fn clock_seconds(&self) -> u32 {
        match self.config.count_up_to {
            Some(target) => target.saturating_sub(self.time_left),
            None => self.time_left,
        }
    }

    pub fn set_slot(&mut self, slot: usize, color: Color) -> Result<()> {
        self.check_active()?;
        let slot = self.validate_slot(slot)?;
        if !self.color_space.contains(color) {
            return Err(RoundError::ColorUnavailable(color));
        }
        self.guess[slot] = Some(color);
        Ok(())
    }

    /// Places `color` in `slot`, or empties the slot if it already holds it.
    pub fn toggle_slot(&mut self, slot: usize, color: Color) -> Result<()> {
        self.check_active()?;
        let slot = self.validate_slot(slot)?;
        if self.guess[slot] == Some(color) {
            self.guess[slot] = None;
            Ok(())
        } else {
            self.set_slot(slot, color)
        }
    }

    pub fn clear_slot(&mut self, slot: usize) -> Result<()> {
        self.check_active()?;
        let slot = self.validate_slot(slot)?;
        self.guess[slot] = None;
        Ok(())
    }

    pub fn clear_guess(&mut self) -> Result<()> {
        self.check_active()?;
        self.guess.fill(None);
        Ok(())
    }

    pub fn submit_guess(&mut self) -> Result<SubmitOutcome> {
        self.submit_guess_at(Timestamp::now())
    }

    /// Scores the current guess as if submitted at `now`.
    ///
    /// An incomplete guess is rejected without touching any state. Once the
    /// round is over this is a no-op.
    pub fn submit_guess_at(&mut self, now: Timestamp) -> Result<SubmitOutcome> {
        if self.state.is_finished() {
            return Ok(SubmitOutcome::NoChange);
        }

        let Some(colors) = self.guess.iter().copied().collect::<Option<ColorCode>>() else {
            log::debug!("Rejected incomplete guess {:?}", self.guess);
            return Err(RoundError::IncompleteGuess);
        };

        let results = evaluate(self.solution.colors(), &colors)?;
        let is_correct = is_solved(&results);
        let record = GuessRecord {
            index: self.history.len(),
            colors,
            results,
            is_correct,
            start: self.guess_started_at,
            end: now,
            duration: now.saturating_since(self.guess_started_at),
        };
        log::debug!(
            "Guess {} submitted: {:?} -> {}",
            record.index,
            record.colors,
            format_feedback(&record.results, self.solution.colors(), self.config.feedback)
        );
        self.history.push(record);
        self.guess_started_at = now;

        if is_correct {
            self.finish(RoundState::Solved);
            return Ok(SubmitOutcome::Solved);
        }

        self.guesses_left = self.guesses_left.saturating_sub(1);
        if self.guesses_left == 0 {
            self.finish(RoundState::OutOfGuesses);
            return Ok(SubmitOutcome::OutOfGuesses);
        }

        self.carry_forward();
        Ok(SubmitOutcome::Continue)
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.is_finished() {
            return TickOutcome::NoChange;
        }

        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.finish(RoundState::TimedOut);
            return TickOutcome::TimedOut;
        }

        if self.time_left == LOW_TIME_MARK && !self.low_time_signalled {
            self.low_time_signalled = true;
            log::debug!("{} seconds remaining", LOW_TIME_MARK);
            return TickOutcome::LowTime;
        }

        TickOutcome::Ticked
    }

    /// Gives up on the round. Returns whether this ended the round.
    pub fn skip(&mut self) -> bool {
        if self.state.is_finished() {
            return false;
        }
        self.finish(RoundState::Skipped);
        true
    }

    pub fn finalize(&self) -> Result<RoundResult> {
        if self.state.is_active() {
            return Err(RoundError::RoundInProgress);
        }

        Ok(RoundResult {
            solution: self.solution.colors().into(),
            solved: matches!(self.state, RoundState::Solved),
            skipped: matches!(self.state, RoundState::Skipped),
            colors: self.color_space.count() as u32,
            slots: self.solution.len() as u32,
            time_left: self.time_left,
            guesses: self.history.clone(),
        })
    }

    /// Prepares the buffer for the next guess, keeping correct slots only when
    /// the player was told which ones they are.
    fn carry_forward(&mut self) {
        let keep = self.config.keep_correct && self.config.feedback.discloses_positions();
        let Some(last) = self.history.last() else {
            return;
        };

        for (slot, result) in self.guess.iter_mut().zip(&last.results) {
            *slot = (keep && result.status.is_correct()).then_some(result.color);
        }
    }

    fn finish(&mut self, state: RoundState) {
        if self.state.is_finished() {
            return;
        }
        self.state = state;
        log::debug!(
            "Round ended: {:?} after {} guesses with {}s left",
            state,
            self.history.len(),
            self.time_left
        );
    }

    fn check_active(&self) -> Result<()> {
        if self.state.is_active() {
            Ok(())
        } else {
            Err(RoundError::RoundOver)
        }
    }

    fn validate_slot(&self, slot: usize) -> Result<usize> {
        if slot < self.guess.len() {
            Ok(slot)
        } else {
            Err(RoundError::InvalidSlot {
                slot,
                slots: self.guess.len(),
            })
        }
    }
}

/// Renders seconds as `M:SS`.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Color::*;

    fn config(feedback: FeedbackMode) -> RoundConfig {
        RoundConfig::new(3, 4, 120, 5).with_feedback(feedback)
    }

    fn round(config: RoundConfig, solution: &[Color]) -> RoundController {
        RoundController::with_solution(config, solution)
            .unwrap()
            .with_start_time(Timestamp::from_millis(0))
    }

    fn fill(round: &mut RoundController, colors: &[Color]) {
        for (slot, &color) in colors.iter().enumerate() {
            round.set_slot(slot, color).unwrap();
        }
    }

    fn guess(round: &mut RoundController, colors: &[Color], at: u64) -> SubmitOutcome {
        fill(round, colors);
        round.submit_guess_at(Timestamp::from_millis(at)).unwrap()
    }

    #[test]
    fn correct_guess_solves_round() {
        let mut round = round(config(FeedbackMode::CappedMarks), &[Red, Blue, Green]);

        assert_eq!(guess(&mut round, &[Red, Blue, Green], 1_500), SubmitOutcome::Solved);
        assert_eq!(round.state(), RoundState::Solved);
        assert_eq!(round.guesses_left(), 5);

        let result = round.finalize().unwrap();
        assert!(result.solved);
        assert!(!result.skipped);
        assert_eq!(result.slots, 3);
        assert_eq!(result.colors, 4);
        assert_eq!(result.time_left, 120);
        assert_eq!(result.guesses.len(), 1);
        assert!(result.guesses[0].is_correct);
        assert_eq!(result.guesses[0].duration, 1_500);
    }

    #[test]
    fn incomplete_guess_is_rejected_without_changes() {
        let mut round = round(config(FeedbackMode::CappedMarks), &[Red, Blue, Green]);
        round.set_slot(0, Red).unwrap();

        assert_eq!(
            round.submit_guess_at(Timestamp::from_millis(10)),
            Err(RoundError::IncompleteGuess)
        );
        assert!(round.history().is_empty());
        assert_eq!(round.guesses_left(), 5);
        assert_eq!(round.current_guess(), &[Some(Red), None, None]);
    }

    #[test]
    fn single_guess_limit_ends_round_on_first_miss() {
        let config = RoundConfig::new(2, 3, 60, 1);
        let mut round = round(config, &[Red, Blue]);

        assert_eq!(guess(&mut round, &[Blue, Red], 100), SubmitOutcome::OutOfGuesses);
        assert_eq!(round.state(), RoundState::OutOfGuesses);
        assert_eq!(round.guesses_left(), 0);

        let result = round.finalize().unwrap();
        assert!(!result.solved);
        assert!(!result.skipped);
    }

    #[test]
    fn guesses_run_out_after_max_guesses() {
        let config = RoundConfig::new(2, 3, 60, 3);
        let mut round = round(config, &[Red, Blue]);

        assert_eq!(guess(&mut round, &[Green, Green], 1), SubmitOutcome::Continue);
        assert_eq!(guess(&mut round, &[Green, Green], 2), SubmitOutcome::Continue);
        assert_eq!(round.guesses_left(), 1);
        assert_eq!(guess(&mut round, &[Green, Green], 3), SubmitOutcome::OutOfGuesses);
        assert_eq!(round.history().len(), 3);
    }

    #[test]
    fn last_guess_can_still_solve() {
        let config = RoundConfig::new(2, 3, 60, 2);
        let mut round = round(config, &[Red, Blue]);

        guess(&mut round, &[Green, Green], 1);
        assert_eq!(guess(&mut round, &[Red, Blue], 2), SubmitOutcome::Solved);
        assert_eq!(round.guesses_left(), 1);
    }

    #[test]
    fn keep_correct_prefills_correct_slots_under_positional_modes() {
        for mode in [
            FeedbackMode::PositionalColorHint,
            FeedbackMode::PositionalSlotHint,
            FeedbackMode::CappedMarks,
            FeedbackMode::Marks,
        ] {
            let mut round = round(config(mode), &[Red, Blue, Green]);

            guess(&mut round, &[Red, Green, Blue], 1);
            assert_eq!(round.current_guess(), &[Some(Red), None, None], "{mode}");

            // resubmitting keeps the carried slot intact
            guess(&mut round, &[Red, Green, Blue], 2);
            assert_eq!(round.current_guess(), &[Some(Red), None, None], "{mode}");
        }
    }

    #[test]
    fn keep_correct_has_no_effect_without_positional_feedback() {
        for mode in [
            FeedbackMode::Binary,
            FeedbackMode::Tally,
            FeedbackMode::ColorHint,
            FeedbackMode::SlotHint,
        ] {
            let mut round = round(config(mode), &[Red, Blue, Green]);

            guess(&mut round, &[Red, Green, Blue], 1);
            assert_eq!(round.current_guess(), &[None, None, None], "{mode}");
        }
    }

    #[test]
    fn disabled_keep_correct_clears_buffer() {
        let config = config(FeedbackMode::CappedMarks).with_keep_correct(false);
        let mut round = round(config, &[Red, Blue, Green]);

        guess(&mut round, &[Red, Green, Blue], 1);
        assert_eq!(round.current_guess(), &[None, None, None]);
    }

    #[test]
    fn guess_records_chain_timestamps() {
        let mut round = round(config(FeedbackMode::Tally), &[Red, Blue, Green]);

        guess(&mut round, &[Green, Green, Green], 2_000);
        guess(&mut round, &[Blue, Blue, Blue], 3_500);

        let history = round.history();
        assert_eq!(history[0].index, 0);
        assert_eq!(history[0].start, Timestamp::from_millis(0));
        assert_eq!(history[0].end, Timestamp::from_millis(2_000));
        assert_eq!(history[1].index, 1);
        assert_eq!(history[1].start, Timestamp::from_millis(2_000));
        assert_eq!(history[1].duration, 1_500);
        assert!(!history[1].is_correct);
    }

    #[test]
    fn countdown_signals_low_time_once_and_times_out() {
        let config = RoundConfig::new(2, 2, 32, 5);
        let mut round = round(config, &[Red, Blue]);

        assert_eq!(round.tick(), TickOutcome::Ticked);
        assert_eq!(round.tick(), TickOutcome::LowTime);
        assert_eq!(round.time_left(), 30);

        let outcomes: Vec<_> = (0..30).map(|_| round.tick()).collect();
        assert!(!outcomes.contains(&TickOutcome::LowTime));
        assert_eq!(outcomes.last(), Some(&TickOutcome::TimedOut));
        assert_eq!(round.state(), RoundState::TimedOut);
        assert_eq!(round.time_left(), 0);

        assert_eq!(round.tick(), TickOutcome::NoChange);
        assert_eq!(round.time_left(), 0);
    }

    #[test]
    fn zero_time_limit_times_out_on_first_tick() {
        let config = RoundConfig::new(1, 1, 0, 5);
        let mut round = round(config, &[Red]);

        assert_eq!(round.tick(), TickOutcome::TimedOut);
        assert_eq!(round.finalize().unwrap().time_left, 0);
    }

    #[test]
    fn skip_ends_round_unsolved() {
        let mut round = round(config(FeedbackMode::CappedMarks), &[Red, Blue, Green]);
        guess(&mut round, &[Red, Blue, Blue], 5);

        assert!(round.skip());
        assert!(!round.skip());
        assert_eq!(round.state(), RoundState::Skipped);

        let result = round.finalize().unwrap();
        assert!(result.skipped);
        assert!(!result.solved);
        assert_eq!(result.guesses.len(), 1);
    }

    #[test]
    fn finished_round_ignores_further_actions() {
        let mut round = round(config(FeedbackMode::CappedMarks), &[Red, Blue, Green]);
        guess(&mut round, &[Red, Blue, Green], 5);

        assert_eq!(
            round.submit_guess_at(Timestamp::from_millis(6)),
            Ok(SubmitOutcome::NoChange)
        );
        assert_eq!(round.tick(), TickOutcome::NoChange);
        assert!(!round.skip());
        assert_eq!(round.set_slot(0, Blue), Err(RoundError::RoundOver));
        assert_eq!(round.clear_guess(), Err(RoundError::RoundOver));
        assert_eq!(round.state(), RoundState::Solved);
        assert_eq!(round.time_left(), 120);
        assert_eq!(round.history().len(), 1);
    }

    #[test]
    fn finalize_requires_finished_round() {
        let round = round(config(FeedbackMode::CappedMarks), &[Red, Blue, Green]);

        assert_eq!(round.finalize(), Err(RoundError::RoundInProgress));
        assert_eq!(round.solution(), None);
    }

    #[test]
    fn solution_is_revealed_after_round() {
        let mut round = round(config(FeedbackMode::CappedMarks), &[Red, Blue, Green]);
        round.skip();

        assert_eq!(round.solution(), Some(&[Red, Blue, Green][..]));
    }

    #[test]
    fn buffer_edits_validate_slot_and_color() {
        let mut round = round(config(FeedbackMode::CappedMarks), &[Red, Blue, Green]);

        assert_eq!(
            round.set_slot(3, Red),
            Err(RoundError::InvalidSlot { slot: 3, slots: 3 })
        );
        assert_eq!(round.set_slot(0, Purple), Err(RoundError::ColorUnavailable(Purple)));

        round.toggle_slot(1, Yellow).unwrap();
        assert_eq!(round.current_guess(), &[None, Some(Yellow), None]);
        round.toggle_slot(1, Yellow).unwrap();
        assert_eq!(round.current_guess(), &[None, None, None]);

        fill(&mut round, &[Red, Red, Red]);
        round.clear_slot(2).unwrap();
        assert_eq!(round.current_guess(), &[Some(Red), Some(Red), None]);
        round.clear_guess().unwrap();
        assert_eq!(round.current_guess(), &[None, None, None]);
    }

    #[test]
    fn feedback_uses_round_mode() {
        let mut round = round(config(FeedbackMode::SlotHint), &[Red, Blue, Green]);
        guess(&mut round, &[Red, Green, Yellow], 1);

        assert_eq!(
            round.feedback(0),
            Some(DisclosedFeedback::Hint {
                correct: 1,
                incorrect: 1,
                elsewhere: 1
            })
        );
        assert_eq!(round.feedback(1), None);
    }

    #[test]
    fn generated_round_uses_configured_sizes() {
        let config = RoundConfig::new(6, 5, 60, 10);
        let round = RoundController::new(config, RandomSolutionGenerator::new(42));

        assert_eq!(round.slots(), 6);
        assert_eq!(round.current_guess().len(), 6);
        assert_eq!(round.color_space().count(), 5);
    }

    #[test]
    fn clock_counts_up_when_requested() {
        let config = RoundConfig::new(1, 1, 90, 5).with_count_up_to(Some(600));
        let mut round = round(config, &[Red]);
        round.tick();

        assert_eq!(round.clock_seconds(), 511);
        assert_eq!(format_clock(round.clock_seconds()), "8:31");
        assert_eq!(format_clock(round.time_left()), "1:29");
    }

    #[test]
    fn result_payload_serializes_with_host_keys() {
        let mut round = round(RoundConfig::new(2, 2, 60, 5), &[Red, Blue]);
        guess(&mut round, &[Blue, Red], 10);
        round.skip();

        let json = serde_json::to_value(round.finalize().unwrap()).unwrap();

        assert_eq!(json["solution"], serde_json::json!(["red", "blue"]));
        assert_eq!(json["timeLeft"], 60);
        assert_eq!(json["skipped"], true);
        assert_eq!(json["guesses"][0]["isCorrect"], false);
        assert_eq!(
            json["guesses"][0]["results"][0],
            serde_json::json!({"color": "blue", "status": "wrong-position"})
        );
    }
}
