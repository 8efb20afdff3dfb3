//! Bounded resource meters shared by every stateful level.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{METER_MAX, METER_MIN};

/// Which plant condition a meter tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterKind {
    Water,
    Sun,
    Nutrients,
    Health,
    Harvest,
}

impl MeterKind {
    #[must_use]
    pub const fn i18n_key(self) -> &'static str {
        match self {
            Self::Water => "meter.water",
            Self::Sun => "meter.sun",
            Self::Nutrients => "meter.nutrients",
            Self::Health => "meter.health",
            Self::Harvest => "meter.harvest",
        }
    }
}

/// A value pinned to `0..=100`.
///
/// Every constructor and mutator clamps, so an out-of-range meter cannot be
/// observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "u8")]
pub struct Meter(u8);

impl Meter {
    pub const EMPTY: Self = Self(METER_MIN);
    pub const FULL: Self = Self(METER_MAX);

    #[must_use]
    pub fn new(value: i32) -> Self {
        Self(crate::numbers::clamp_i32_to_pct(value))
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Apply a signed delta, saturating at both bounds.
    pub fn adjust(&mut self, delta: i32) {
        *self = Self::new(i32::from(self.0) + delta);
    }

    /// Set the meter, clamping the input.
    pub fn set(&mut self, value: i32) {
        *self = Self::new(value);
    }

    /// Inclusive band check used for the "ideal range" rules.
    #[must_use]
    pub const fn within(self, band: (u8, u8)) -> bool {
        self.0 >= band.0 && self.0 <= band.1
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == METER_MIN
    }

    #[must_use]
    pub const fn is_full(self) -> bool {
        self.0 == METER_MAX
    }
}

impl From<i32> for Meter {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl From<u8> for Meter {
    fn from(value: u8) -> Self {
        Self::new(i32::from(value))
    }
}

impl From<Meter> for u8 {
    fn from(meter: Meter) -> Self {
        meter.0
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of a level's meters for display and assertions.
pub type MeterSnapshot = Vec<(MeterKind, Meter)>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_saturates_at_bounds() {
        let mut m = Meter::new(95);
        m.adjust(25);
        assert_eq!(m, Meter::FULL);
        assert!(m.is_full());
        m.adjust(-250);
        assert_eq!(m, Meter::EMPTY);
        assert!(m.is_empty());
    }

    #[test]
    fn band_is_inclusive() {
        assert!(Meter::new(30).within((30, 60)));
        assert!(Meter::new(60).within((30, 60)));
        assert!(!Meter::new(61).within((30, 60)));
    }

    #[test]
    fn deserialization_clamps() {
        let m: Meter = serde_json::from_str("140").unwrap();
        assert_eq!(m.value(), 100);
        let m: Meter = serde_json::from_str("-3").unwrap();
        assert_eq!(m.value(), 0);
        assert_eq!(serde_json::to_string(&Meter::new(42)).unwrap(), "42");
    }
}
