use super::*;

/// Hands out a caller-chosen code verbatim.
///
/// The code is checked against the color space once, at construction. Its
/// length decides the round's slot count, whatever the config asked for.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedSolution(Solution);

impl FixedSolution {
    pub fn new(colors: Vec<Color>, space: &ColorSpace) -> Result<Self> {
        Solution::from_colors(&colors, space).map(Self)
    }

    pub fn colors(&self) -> &[Color] {
        self.0.colors()
    }
}

impl SolutionGenerator for FixedSolution {
    fn generate(self, slots: u32, colors: &ColorSpace) -> Solution {
        if self.0.len() as u32 != slots {
            log::debug!(
                "Fixed solution has {} slots, ignoring requested {}",
                self.0.len(),
                slots
            );
        }
        if let Some(color) = self.0.colors().iter().find(|&&color| !colors.contains(color)) {
            log::warn!("Fixed solution uses {} outside a {} color round", color, colors.count());
        }
        self.0
    }
}
