use core::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Upper bound for both the number of slots and the size of the color space.
pub const SLOT_LIMIT: usize = 12;

/// Number of named colors in the palette.
pub const COLOR_LIMIT: usize = 12;

/// Inline buffer for a code of at most [`SLOT_LIMIT`] colors.
pub type ColorCode = SmallVec<[Color; SLOT_LIMIT]>;

/// Working buffer for a guess under construction, `None` marks an unfilled slot.
pub type GuessBuffer = SmallVec<[Option<Color>; SLOT_LIMIT]>;

/// Palette of colors, in the order the color space hands them out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Pink,
    Brown,
    Cyan,
    Lime,
    Teal,
    Indigo,
}

impl Color {
    pub const ALL: [Color; COLOR_LIMIT] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Purple,
        Color::Orange,
        Color::Pink,
        Color::Brown,
        Color::Cyan,
        Color::Lime,
        Color::Teal,
        Color::Indigo,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        use Color::*;
        match self {
            Red => "red",
            Blue => "blue",
            Green => "green",
            Yellow => "yellow",
            Purple => "purple",
            Orange => "orange",
            Pink => "pink",
            Brown => "brown",
            Cyan => "cyan",
            Lime => "lime",
            Teal => "teal",
            Indigo => "indigo",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The first `count` colors of the palette.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct ColorSpace {
    count: u8,
}

impl ColorSpace {
    /// Builds a color space of `count` colors, clamped to `1..=12`.
    pub fn new(count: u32) -> Self {
        let count = clamp_setting("colors", count, 1, COLOR_LIMIT as u32);
        Self { count: count as u8 }
    }

    pub const fn count(self) -> usize {
        self.count as usize
    }

    pub fn colors(&self) -> &'static [Color] {
        &Color::ALL[..self.count()]
    }

    pub const fn contains(&self, color: Color) -> bool {
        color.index() < self.count()
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors().get(index).copied()
    }
}

impl From<u32> for ColorSpace {
    fn from(count: u32) -> Self {
        Self::new(count)
    }
}

impl From<ColorSpace> for u32 {
    fn from(space: ColorSpace) -> Self {
        space.count as u32
    }
}

impl Default for ColorSpace {
    fn default() -> Self {
        Self { count: 4 }
    }
}

/// Wall-clock instant in milliseconds since the Unix epoch.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn now() -> Self {
        use web_time::{SystemTime, UNIX_EPOCH};

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis().try_into().unwrap_or(u64::MAX))
            .unwrap_or_default();
        Self(millis)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Milliseconds between `earlier` and `self`, zero if the clock went backwards.
    pub const fn saturating_since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Clamps a host-supplied count into `min..=max`, warning when it had to.
pub(crate) fn clamp_setting(name: &str, value: u32, min: u32, max: u32) -> u32 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("{} out of range, requested {} but using {}", name, value, clamped);
    }
    clamped
}
