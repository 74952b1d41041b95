use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::*;
use crate::types::clamp_setting;

/// Samples every slot independently and uniformly from the color space, with
/// replacement.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomSolutionGenerator {
    seed: u64,
}

impl RandomSolutionGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_os_rng().random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl SolutionGenerator for RandomSolutionGenerator {
    fn generate(self, slots: u32, colors: &ColorSpace) -> Solution {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        sample_solution(&mut rng, slots, colors)
    }
}

/// Draws a solution from a caller-provided random source.
pub fn sample_solution<R: Rng>(rng: &mut R, slots: u32, colors: &ColorSpace) -> Solution {
    let slots = clamp_setting("slots", slots, 1, SLOT_LIMIT as u32);
    let palette = colors.colors();
    let code: ColorCode = (0..slots)
        .map(|_| palette[rng.random_range(0..palette.len())])
        .collect();
    log::debug!(
        "Generated solution of {} slots over {} colors",
        code.len(),
        palette.len()
    );
    Solution::new_unchecked(code)
}
