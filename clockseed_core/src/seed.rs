//! Seed Derivation - wall-clock time to composite integer.
//!
//! The seed packs the time of day into decimal digit groups:
//!
//! ```text
//!   H  H  M  M  M  S  S  S  S   (as a decimal number)
//!   hour*10^7 + minute*10^5 + second*10^3 + millisecond
//!
//!   14:30:45.123  ->  143_045_123
//! ```
//!
//! The groups overlap in digit position but each stride exceeds the full
//! range of the field below it (minute*10^5 < 10^7, second*10^3 < 10^5,
//! millisecond < 10^3), so the mapping is injective over valid times.

use clockseed_env::Timestamp;
use serde::{Deserialize, Serialize};

const HOUR_STRIDE: u32 = 10_000_000;
const MINUTE_STRIDE: u32 = 100_000;
const SECOND_STRIDE: u32 = 1_000;

/// Composite time-derived seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Seed(pub u32);

impl Seed {
    /// Largest seed any timestamp produces (23:59:59.999).
    pub const MAX: Seed = Seed(239_999_999);

    /// Seed of local midnight; collides with the "uninitialized" sentinel.
    pub const ZERO: Seed = Seed(0);

    /// Returns the raw integer.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns the value as stored in a host integer field.
    pub fn as_field(&self) -> i64 {
        i64::from(self.0)
    }

    /// Recovers the timestamp that produced this seed.
    ///
    /// Returns `None` for integers no valid timestamp maps to.
    pub fn decompose(&self) -> Option<Timestamp> {
        let hour = self.0 / HOUR_STRIDE;
        let minute = self.0 % HOUR_STRIDE / MINUTE_STRIDE;
        let second = self.0 % MINUTE_STRIDE / SECOND_STRIDE;
        let millisecond = self.0 % SECOND_STRIDE;

        Timestamp::new(
            u8::try_from(hour).ok()?,
            u8::try_from(minute).ok()?,
            u8::try_from(second).ok()?,
            u16::try_from(millisecond).ok()?,
        )
        .ok()
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Seed> for u32 {
    fn from(seed: Seed) -> u32 {
        seed.0
    }
}

/// Derives the composite seed for a timestamp.
///
/// Pure and total. Returns the input timestamp alongside the seed so callers
/// write both from the same clock sample.
pub fn derive_seed(now: Timestamp) -> (Seed, Timestamp) {
    let value = u32::from(now.hour) * HOUR_STRIDE
        + u32::from(now.minute) * MINUTE_STRIDE
        + u32::from(now.second) * SECOND_STRIDE
        + u32::from(now.millisecond);
    (Seed(value), now)
}

/// A seed together with the clock sample it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCapture {
    pub seed: Seed,
    pub time: Timestamp,
}

impl SeedCapture {
    /// Derives a capture from one clock sample.
    pub fn from_time(now: Timestamp) -> Self {
        let (seed, time) = derive_seed(now);
        Self { seed, time }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ts(h: u8, m: u8, s: u8, ms: u16) -> Timestamp {
        Timestamp::new(h, m, s, ms).unwrap()
    }

    #[test]
    fn test_known_value() {
        let (seed, time) = derive_seed(ts(14, 30, 45, 123));
        assert_eq!(seed, Seed(143_045_123));
        assert_eq!(time, ts(14, 30, 45, 123));
    }

    #[test]
    fn test_midnight_is_zero() {
        let (seed, _) = derive_seed(Timestamp::MIDNIGHT);
        assert_eq!(seed, Seed::ZERO);
    }

    #[test]
    fn test_end_of_day_is_max() {
        let (seed, _) = derive_seed(ts(23, 59, 59, 999));
        assert_eq!(seed, Seed::MAX);
    }

    #[test]
    fn test_lower_field_changes_seed() {
        let (a, _) = derive_seed(ts(10, 0, 0, 0));
        let (b, _) = derive_seed(ts(10, 0, 0, 1));
        let (c, _) = derive_seed(ts(10, 0, 1, 0));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn test_decompose_rejects_gaps() {
        // minute digit group of 60 is never produced
        assert_eq!(Seed(6_000_000).decompose(), None);
        assert_eq!(Seed(240_000_000).decompose(), None);
        assert_eq!(Seed(61_000).decompose(), None);
    }

    #[test]
    fn test_capture_matches_derive() {
        let capture = SeedCapture::from_time(ts(1, 2, 3, 4));
        assert_eq!(capture.seed, Seed(10_203_004));
        assert_eq!(capture.time, ts(1, 2, 3, 4));
    }

    fn any_timestamp() -> impl Strategy<Value = Timestamp> {
        (0u8..24, 0u8..60, 0u8..60, 0u16..1000).prop_map(|(h, m, s, ms)| ts(h, m, s, ms))
    }

    proptest! {
        #[test]
        fn prop_seed_in_range(now in any_timestamp()) {
            let (seed, _) = derive_seed(now);
            prop_assert!(seed <= Seed::MAX);
        }

        #[test]
        fn prop_decompose_inverts(now in any_timestamp()) {
            let (seed, _) = derive_seed(now);
            prop_assert_eq!(seed.decompose(), Some(now));
        }

        #[test]
        fn prop_injective(a in any_timestamp(), b in any_timestamp()) {
            let (sa, _) = derive_seed(a);
            let (sb, _) = derive_seed(b);
            prop_assert_eq!(sa == sb, a == b);
        }

        #[test]
        fn prop_order_preserving(a in any_timestamp(), b in any_timestamp()) {
            let (sa, _) = derive_seed(a);
            let (sb, _) = derive_seed(b);
            prop_assert_eq!(sa.cmp(&sb), a.cmp(&b));
        }
    }
}
