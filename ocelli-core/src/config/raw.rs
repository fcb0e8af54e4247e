//! Raw configuration document
//!
//! Mirrors the persisted configuration with every field optional. A config
//! provider fills a [`RawConfig`] (typically via serde) and calls
//! [`RawConfig::resolve`]; nothing missing or invalid is ever fatal.
//!
//! Deserialization is per entry: a value of the wrong type or range becomes
//! "missing" and takes its default, an over-long sprite path becomes an empty
//! slot, and lists longer than their capacity keep their first entries. One
//! bad entry never rejects the rest of the document.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::{
    ControlConfig, EyePatterns, FilterConfig, PatternTable, Sequence, SequenceItem,
    CHANNEL_COUNT, DEFAULT_IMU_SCALE_FACTOR, DEFAULT_IMU_THRESHOLD, DEFAULT_INTERVAL_MS,
    MAX_EYE_PATTERNS, MAX_PATH_LEN, MAX_SEQUENCE_ITEMS, PATTERN_COUNT,
};

/// Numeric types a [`Lenient`] entry can hold
pub trait FromScalar: Sized {
    fn from_i64(value: i64) -> Option<Self>;
    fn from_u64(value: u64) -> Option<Self>;
    fn from_f64(_value: f64) -> Option<Self> {
        None
    }
}

macro_rules! integer_scalar {
    ($($t:ty),*) => {$(
        impl FromScalar for $t {
            fn from_i64(value: i64) -> Option<Self> {
                <$t>::try_from(value).ok()
            }
            fn from_u64(value: u64) -> Option<Self> {
                <$t>::try_from(value).ok()
            }
        }
    )*};
}

integer_scalar!(u8, u32, i32, i64);

impl FromScalar for f32 {
    fn from_i64(value: i64) -> Option<Self> {
        Some(value as f32)
    }
    fn from_u64(value: u64) -> Option<Self> {
        Some(value as f32)
    }
    fn from_f64(value: f64) -> Option<Self> {
        Some(value as f32)
    }
}

/// Scalar entry that reads as `None` when absent, mistyped or out of range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct Lenient<T>(pub Option<T>);

impl<T> Lenient<T> {
    pub const fn some(value: T) -> Self {
        Self(Some(value))
    }

    pub const fn none() -> Self {
        Self(None)
    }
}

/// Sprite path entry; one that does not fit is kept as an empty slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct RawPath(pub String<MAX_PATH_LEN>);

impl RawPath {
    pub fn new(path: &str) -> Self {
        Self(String::try_from(path).unwrap_or_else(|_| {
            warn!(
                "Sprite path longer than {} bytes, slot left empty",
                MAX_PATH_LEN
            );
            String::new()
        }))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// `[offset_a, offset_b]` for one channel; missing or invalid offsets are 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct RawSetpoints(pub [Lenient<i32>; 2]);

impl RawSetpoints {
    pub const fn new(a: i32, b: i32) -> Self {
        Self([Lenient::some(a), Lenient::some(b)])
    }

    fn resolve(&self) -> [i32; 2] {
        [self.0[0].0.unwrap_or(0), self.0[1].0.unwrap_or(0)]
    }
}

/// Setpoints of one pattern, indexed by channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct RawPatternRow(pub Vec<RawSetpoints, CHANNEL_COUNT>);

/// `imu` section
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawImuConfig {
    pub threshold: Lenient<f32>,
    pub scale_factor: Lenient<f32>,
}

/// `servo` section
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawServoConfig {
    /// Update interval per channel; missing trailing entries use the default
    #[cfg_attr(feature = "serde", serde(deserialize_with = "lenient::bounded"))]
    pub intervals_ms: Vec<Lenient<u32>, CHANNEL_COUNT>,
    /// `[pattern][channel] = [offset_a, offset_b]`; missing cells are 0
    #[cfg_attr(feature = "serde", serde(deserialize_with = "lenient::bounded"))]
    pub patterns: Vec<RawPatternRow, PATTERN_COUNT>,
}

/// One entry of `display.eye_sequence`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawSequenceItem {
    pub pattern: Lenient<i64>,
    pub duration: Lenient<u32>,
}

impl RawSequenceItem {
    /// Pattern defaults to 0 and duration to 0
    ///
    /// A pattern index outside `0..=255` is kept as an out-of-range index,
    /// which renders a blank frame.
    fn resolve(&self) -> SequenceItem {
        let pattern = match self.pattern.0 {
            None => 0,
            Some(index) => u8::try_from(index).unwrap_or_else(|_| {
                warn!("Eye sequence pattern {} out of range", index);
                u8::MAX
            }),
        };
        SequenceItem::new(pattern, self.duration.0.unwrap_or(0))
    }
}

/// `display` section
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawDisplayConfig {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "lenient::bounded"))]
    pub eye_patterns: Vec<RawPath, MAX_EYE_PATTERNS>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "lenient::bounded"))]
    pub eye_sequence: Vec<RawSequenceItem, MAX_SEQUENCE_ITEMS>,
}

/// Whole configuration document
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawConfig {
    pub imu: RawImuConfig,
    pub servo: RawServoConfig,
    pub display: RawDisplayConfig,
}

impl RawConfig {
    /// Resolve into a complete configuration
    ///
    /// Defaults: interval 5000 ms, offset 0, threshold 0.01, scale 320.0,
    /// sequence pattern 0 / duration 0.
    pub fn resolve(&self) -> ControlConfig {
        let mut intervals_ms = [DEFAULT_INTERVAL_MS; CHANNEL_COUNT];
        for (slot, interval) in intervals_ms.iter_mut().zip(self.servo.intervals_ms.iter()) {
            *slot = interval.0.unwrap_or(DEFAULT_INTERVAL_MS);
        }

        let mut patterns = PatternTable::default();
        for (p, row) in self.servo.patterns.iter().enumerate() {
            for (ch, setpoints) in row.0.iter().enumerate() {
                patterns.set(p, ch, setpoints.resolve());
            }
        }

        let filter = FilterConfig::sanitized(
            self.imu.threshold.0.unwrap_or(DEFAULT_IMU_THRESHOLD),
            self.imu.scale_factor.0.unwrap_or(DEFAULT_IMU_SCALE_FACTOR),
        );

        let (eye_patterns, _) =
            EyePatterns::from_paths(self.display.eye_patterns.iter().map(RawPath::as_str));

        let mut items: Vec<SequenceItem, MAX_SEQUENCE_ITEMS> = Vec::new();
        for raw in &self.display.eye_sequence {
            // Capacities match, push cannot fail
            let _ = items.push(raw.resolve());
        }
        let (sequence, _) = Sequence::from_slice(&items);

        info!(
            "Config resolved: {} eye patterns, {} sequence items",
            eye_patterns.len(),
            sequence.len()
        );

        ControlConfig {
            intervals_ms,
            patterns,
            filter,
            eye_patterns,
            sequence,
        }
    }
}

#[cfg(feature = "serde")]
mod lenient {
    use core::fmt;
    use core::marker::PhantomData;

    use heapless::Vec;
    use serde::de::{Deserialize, Deserializer, Error, IgnoredAny, MapAccess, SeqAccess, Visitor};

    use super::{FromScalar, Lenient, RawPath, RawPatternRow, RawSetpoints};

    /// Keep the first `N` elements of a list and skip the rest
    pub(super) fn bounded<'de, D, T, const N: usize>(deserializer: D) -> Result<Vec<T, N>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        deserializer.deserialize_seq(BoundedVisitor(PhantomData))
    }

    struct BoundedVisitor<T, const N: usize>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>, const N: usize> Visitor<'de> for BoundedVisitor<T, N> {
        type Value = Vec<T, N>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a list")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut items: Vec<T, N> = Vec::new();
            while !items.is_full() {
                match seq.next_element()? {
                    Some(item) => {
                        let _ = items.push(item);
                    }
                    None => return Ok(items),
                }
            }

            let mut dropped = 0usize;
            while seq.next_element::<IgnoredAny>()?.is_some() {
                dropped += 1;
            }
            if dropped > 0 {
                warn!("Config list holds at most {}, dropped {} entries", N, dropped);
            }
            Ok(items)
        }
    }

    fn drain_seq<'de, A: SeqAccess<'de>>(mut seq: A) -> Result<(), A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(())
    }

    fn drain_map<'de, A: MapAccess<'de>>(mut map: A) -> Result<(), A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(())
    }

    struct LenientVisitor<T>(PhantomData<T>);

    impl<'de, T: FromScalar> Visitor<'de> for LenientVisitor<T> {
        type Value = Lenient<T>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number")
        }

        fn visit_bool<E: Error>(self, _: bool) -> Result<Self::Value, E> {
            Ok(Lenient::none())
        }

        fn visit_i64<E: Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Lenient(T::from_i64(value)))
        }

        fn visit_u64<E: Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Lenient(T::from_u64(value)))
        }

        fn visit_f64<E: Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Lenient(T::from_f64(value)))
        }

        fn visit_str<E: Error>(self, _: &str) -> Result<Self::Value, E> {
            Ok(Lenient::none())
        }

        fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
            Ok(Lenient::none())
        }

        fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
            Ok(Lenient::none())
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            Lenient::deserialize(deserializer)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
            drain_seq(seq)?;
            Ok(Lenient::none())
        }

        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
            drain_map(map)?;
            Ok(Lenient::none())
        }
    }

    impl<'de, T: FromScalar> Deserialize<'de> for Lenient<T> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(LenientVisitor(PhantomData))
        }
    }

    struct PathVisitor;

    impl<'de> Visitor<'de> for PathVisitor {
        type Value = RawPath;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a file path")
        }

        fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(RawPath::new(value))
        }

        fn visit_bool<E: Error>(self, _: bool) -> Result<Self::Value, E> {
            Ok(RawPath::default())
        }

        fn visit_i64<E: Error>(self, _: i64) -> Result<Self::Value, E> {
            Ok(RawPath::default())
        }

        fn visit_u64<E: Error>(self, _: u64) -> Result<Self::Value, E> {
            Ok(RawPath::default())
        }

        fn visit_f64<E: Error>(self, _: f64) -> Result<Self::Value, E> {
            Ok(RawPath::default())
        }

        fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
            drain_seq(seq)?;
            Ok(RawPath::default())
        }

        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
            drain_map(map)?;
            Ok(RawPath::default())
        }
    }

    impl<'de> Deserialize<'de> for RawPath {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(PathVisitor)
        }
    }

    struct SetpointsVisitor;

    impl<'de> Visitor<'de> for SetpointsVisitor {
        type Value = RawSetpoints;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a pair of offsets")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut pair = [Lenient::none(); 2];
            for slot in pair.iter_mut() {
                match seq.next_element()? {
                    Some(offset) => *slot = offset,
                    None => return Ok(RawSetpoints(pair)),
                }
            }
            drain_seq(seq)?;
            Ok(RawSetpoints(pair))
        }
    }

    impl<'de> Deserialize<'de> for RawSetpoints {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_seq(SetpointsVisitor)
        }
    }

    impl<'de> Deserialize<'de> for RawPatternRow {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            bounded(deserializer).map(RawPatternRow)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_resolves_to_defaults() {
        let config = RawConfig::default().resolve();
        assert_eq!(config, ControlConfig::default());
    }

    #[test]
    fn test_partial_intervals() {
        let mut raw = RawConfig::default();
        raw.servo.intervals_ms.push(Lenient::some(1000)).unwrap();
        raw.servo.intervals_ms.push(Lenient::some(0)).unwrap();
        raw.servo.intervals_ms.push(Lenient::none()).unwrap();
        let config = raw.resolve();
        assert_eq!(config.intervals_ms, [1000, 0, 5000, 5000, 5000, 5000]);
    }

    #[test]
    fn test_partial_patterns() {
        let mut raw = RawConfig::default();
        let mut first = RawPatternRow::default();
        first.0.push(RawSetpoints::new(10, -10)).unwrap();
        first
            .0
            .push(RawSetpoints([Lenient::some(7), Lenient::none()]))
            .unwrap();
        raw.servo.patterns.push(first).unwrap();
        let config = raw.resolve();
        assert_eq!(config.patterns.setpoints(0, 0), [10, -10]);
        assert_eq!(config.patterns.setpoints(0, 1), [7, 0]);
        assert_eq!(config.patterns.setpoints(0, 2), [0, 0]);
        assert_eq!(config.patterns.setpoints(2, 5), [0, 0]);
    }

    #[test]
    fn test_invalid_imu_values_fall_back() {
        let mut raw = RawConfig::default();
        raw.imu.threshold = Lenient::some(f32::NAN);
        raw.imu.scale_factor = Lenient::some(f32::INFINITY);
        let config = raw.resolve();
        assert_eq!(config.filter, FilterConfig::default());
    }

    #[test]
    fn test_sequence_item_defaults() {
        let mut raw = RawConfig::default();
        raw.display
            .eye_sequence
            .push(RawSequenceItem {
                pattern: Lenient::some(1),
                duration: Lenient::none(),
            })
            .unwrap();
        raw.display
            .eye_sequence
            .push(RawSequenceItem {
                pattern: Lenient::none(),
                duration: Lenient::some(250),
            })
            .unwrap();
        let config = raw.resolve();
        assert_eq!(config.sequence.len(), 2);
        assert_eq!(config.sequence.get(0), Some(&SequenceItem::new(1, 0)));
        assert_eq!(config.sequence.get(1), Some(&SequenceItem::new(0, 250)));
    }

    #[test]
    fn test_out_of_range_pattern_kept_out_of_range() {
        let mut raw = RawConfig::default();
        for pattern in [-1, 300, 255] {
            raw.display
                .eye_sequence
                .push(RawSequenceItem {
                    pattern: Lenient::some(pattern),
                    duration: Lenient::some(100),
                })
                .unwrap();
        }
        let config = raw.resolve();
        assert_eq!(config.sequence.get(0), Some(&SequenceItem::new(u8::MAX, 100)));
        assert_eq!(config.sequence.get(1), Some(&SequenceItem::new(u8::MAX, 100)));
        assert_eq!(config.sequence.get(2), Some(&SequenceItem::new(255, 100)));
    }

    #[test]
    fn test_over_long_path_becomes_empty_slot() {
        let path = RawPath::new("/sprites/a_really_long_eye_name.png");
        assert!(path.as_str().is_empty());
        assert_eq!(RawPath::new("/eye.png").as_str(), "/eye.png");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_toml_document_with_gaps() {
        let doc = r#"
            [imu]
            threshold = 0.05

            [servo]
            intervals_ms = [1000, 2000]
            patterns = [[[10, -10], [20, -20]]]

            [display]
            eye_patterns = ["/eye_open.png", "/eye_closed.png"]
            eye_sequence = [{ pattern = 0, duration = 500 }, { pattern = 1 }]
        "#;
        let raw: RawConfig = toml::from_str(doc).unwrap();
        let config = raw.resolve();

        assert_eq!(config.filter.threshold, 0.05);
        assert_eq!(config.filter.scale_factor, DEFAULT_IMU_SCALE_FACTOR);
        assert_eq!(config.intervals_ms[1], 2000);
        assert_eq!(config.intervals_ms[2], DEFAULT_INTERVAL_MS);
        assert_eq!(config.patterns.setpoints(0, 1), [20, -20]);
        assert_eq!(config.eye_patterns.len(), 2);
        assert_eq!(config.sequence.get(1), Some(&SequenceItem::new(1, 0)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_toml_over_long_path_keeps_rest_of_document() {
        let doc = format!(
            r#"
            [servo]
            intervals_ms = [1200]

            [display]
            eye_patterns = ["/eye_open.png", "{}", "/eye_closed.png"]
            eye_sequence = [{{ pattern = 2, duration = 300 }}]
            "#,
            "/x".repeat(20)
        );
        let raw: RawConfig = toml::from_str(&doc).unwrap();
        let config = raw.resolve();

        assert_eq!(config.intervals_ms[0], 1200);
        assert_eq!(config.eye_patterns.len(), 3);
        assert_eq!(config.eye_patterns.get(0).unwrap().path, "/eye_open.png");
        assert!(config.eye_patterns.get(1).unwrap().path.is_empty());
        assert_eq!(config.eye_patterns.get(2).unwrap().path, "/eye_closed.png");
        assert_eq!(config.sequence.get(0), Some(&SequenceItem::new(2, 300)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_toml_surplus_entries_truncated() {
        let eye_patterns: std::vec::Vec<_> = (0..12).map(|i| format!("\"/eye{}.png\"", i)).collect();
        let eye_sequence: std::vec::Vec<_> = (0..25)
            .map(|i| format!("{{ pattern = {}, duration = 100 }}", i % 3))
            .collect();
        let doc = format!(
            r#"
            [servo]
            intervals_ms = [1, 2, 3, 4, 5, 6, 7, 8]
            patterns = [
                [[1, 1], [2, 2, 99], [3], [4, 4], [5, 5], [6, 6], [7, 7], [8, 8]],
                [],
                [],
                [[9, 9]],
            ]

            [display]
            eye_patterns = [{}]
            eye_sequence = [{}]
            "#,
            eye_patterns.join(", "),
            eye_sequence.join(", ")
        );
        let raw: RawConfig = toml::from_str(&doc).unwrap();
        let config = raw.resolve();

        assert_eq!(config.intervals_ms, [1, 2, 3, 4, 5, 6]);
        assert_eq!(config.patterns.setpoints(0, 1), [2, 2]);
        assert_eq!(config.patterns.setpoints(0, 2), [3, 0]);
        assert_eq!(config.patterns.setpoints(0, 5), [6, 6]);
        assert_eq!(config.patterns.setpoints(2, 0), [0, 0]);
        assert_eq!(config.eye_patterns.len(), MAX_EYE_PATTERNS);
        assert_eq!(config.eye_patterns.get(9).unwrap().path, "/eye9.png");
        assert_eq!(config.sequence.len(), MAX_SEQUENCE_ITEMS);
        assert_eq!(config.sequence.get(19), Some(&SequenceItem::new(1, 100)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_toml_invalid_entries_fall_back_individually() {
        let doc = r#"
            [imu]
            threshold = "high"
            scale_factor = 100

            [servo]
            intervals_ms = [-5, "fast", 700]
            patterns = [[[-3, "x"], [true, 4]]]

            [display]
            eye_patterns = ["/eye_open.png", 7]
            eye_sequence = [
                { pattern = -1, duration = 100 },
                { pattern = 300 },
                { pattern = 1, duration = "slow" },
                { pattern = 0, duration = -20 },
            ]
        "#;
        let raw: RawConfig = toml::from_str(doc).unwrap();
        let config = raw.resolve();

        assert_eq!(config.filter.threshold, DEFAULT_IMU_THRESHOLD);
        assert_eq!(config.filter.scale_factor, 100.0);
        assert_eq!(config.intervals_ms, [5000, 5000, 700, 5000, 5000, 5000]);
        assert_eq!(config.patterns.setpoints(0, 0), [-3, 0]);
        assert_eq!(config.patterns.setpoints(0, 1), [0, 4]);
        assert_eq!(config.eye_patterns.len(), 2);
        assert!(config.eye_patterns.get(1).unwrap().path.is_empty());
        assert_eq!(config.sequence.get(0), Some(&SequenceItem::new(u8::MAX, 100)));
        assert_eq!(config.sequence.get(1), Some(&SequenceItem::new(u8::MAX, 0)));
        assert_eq!(config.sequence.get(2), Some(&SequenceItem::new(1, 0)));
        assert_eq!(config.sequence.get(3), Some(&SequenceItem::new(0, 0)));
    }
}
