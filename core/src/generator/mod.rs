use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Source of the hidden code for a round.
pub trait SolutionGenerator {
    fn generate(self, slots: u32, colors: &ColorSpace) -> Solution;
}
