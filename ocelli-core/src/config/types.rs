//! Configuration type definitions
//!
//! These types are loaded once at startup and are read-only afterwards.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of independently scheduled servo channels
pub const CHANNEL_COUNT: usize = 6;

/// Number of motion patterns selectable with the button
pub const PATTERN_COUNT: usize = 3;

/// Maximum eye sprites
pub const MAX_EYE_PATTERNS: usize = 10;

/// Maximum entries in the eye sequence
pub const MAX_SEQUENCE_ITEMS: usize = 20;

/// Maximum sprite path length
pub const MAX_PATH_LEN: usize = 32;

/// Servo update interval used when a channel has none configured
pub const DEFAULT_INTERVAL_MS: u32 = 5000;

/// Motion filter deadband used when none (or an invalid one) is configured
pub const DEFAULT_IMU_THRESHOLD: f32 = 0.01;

/// Motion filter gain used when none (or an invalid one) is configured
pub const DEFAULT_IMU_SCALE_FACTOR: f32 = 320.0;

/// Motion filter configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilterConfig {
    /// Deadband on the averaged delta (g)
    pub threshold: f32,
    /// Display units per g of averaged delta
    pub scale_factor: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_IMU_THRESHOLD,
            scale_factor: DEFAULT_IMU_SCALE_FACTOR,
        }
    }
}

impl FilterConfig {
    /// Build a filter config, replacing unusable values with defaults
    ///
    /// The threshold must be finite and non-negative, the scale finite.
    pub fn sanitized(threshold: f32, scale_factor: f32) -> Self {
        let threshold = if threshold.is_finite() && threshold >= 0.0 {
            threshold
        } else {
            warn!("Invalid IMU threshold, using default");
            DEFAULT_IMU_THRESHOLD
        };
        let scale_factor = if scale_factor.is_finite() {
            scale_factor
        } else {
            warn!("Invalid IMU scale factor, using default");
            DEFAULT_IMU_SCALE_FACTOR
        };
        Self {
            threshold,
            scale_factor,
        }
    }
}

/// Signed position offsets, indexed `[pattern][channel][phase]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PatternTable {
    offsets: [[[i32; 2]; CHANNEL_COUNT]; PATTERN_COUNT],
}

impl PatternTable {
    pub const fn new(offsets: [[[i32; 2]; CHANNEL_COUNT]; PATTERN_COUNT]) -> Self {
        Self { offsets }
    }

    /// Both setpoint offsets of a channel within a pattern
    ///
    /// Out-of-range indices yield `[0, 0]`.
    pub fn setpoints(&self, pattern: usize, channel: usize) -> [i32; 2] {
        self.offsets
            .get(pattern)
            .and_then(|p| p.get(channel))
            .copied()
            .unwrap_or([0, 0])
    }

    /// Overwrite one channel's setpoints (used while resolving raw config)
    pub fn set(&mut self, pattern: usize, channel: usize, setpoints: [i32; 2]) {
        if let Some(slot) = self
            .offsets
            .get_mut(pattern)
            .and_then(|p| p.get_mut(channel))
        {
            *slot = setpoints;
        }
    }
}

/// One step of the eye animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SequenceItem {
    /// Index into the eye pattern list
    pub pattern_index: u8,
    /// How long this step is shown
    pub duration_ms: u32,
}

impl SequenceItem {
    pub const fn new(pattern_index: u8, duration_ms: u32) -> Self {
        Self {
            pattern_index,
            duration_ms,
        }
    }
}

/// Ordered eye sequence, at most [`MAX_SEQUENCE_ITEMS`] long
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sequence {
    items: Vec<SequenceItem, MAX_SEQUENCE_ITEMS>,
}

impl Sequence {
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Load items, keeping the first [`MAX_SEQUENCE_ITEMS`]
    ///
    /// Returns the sequence and the number of entries dropped.
    pub fn from_slice(items: &[SequenceItem]) -> (Self, usize) {
        let mut seq = Self::new();
        let mut dropped = 0;
        for item in items {
            if seq.items.push(*item).is_err() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            warn!(
                "Eye sequence exceeds {} items, dropped {}",
                MAX_SEQUENCE_ITEMS, dropped
            );
        }
        (seq, dropped)
    }

    pub fn get(&self, index: usize) -> Option<&SequenceItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SequenceItem> {
        self.items.iter()
    }
}

/// Reference to a renderable eye sprite
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EyePattern {
    /// Image path in asset storage (empty if the configured path was unusable)
    pub path: String<MAX_PATH_LEN>,
}

impl EyePattern {
    /// Create from a path; a path longer than [`MAX_PATH_LEN`] becomes empty
    /// so the slot still exists and renders as a placeholder.
    pub fn new(path: &str) -> Self {
        let mut p = String::new();
        if p.push_str(path).is_err() {
            warn!("Eye pattern path too long: {}", path);
            p.clear();
        }
        Self { path: p }
    }
}

/// Eye sprite list, at most [`MAX_EYE_PATTERNS`] long
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EyePatterns {
    patterns: Vec<EyePattern, MAX_EYE_PATTERNS>,
}

impl EyePatterns {
    pub const fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Load sprite paths, keeping the first [`MAX_EYE_PATTERNS`]
    ///
    /// Returns the list and the number of entries dropped.
    pub fn from_paths<'a>(paths: impl IntoIterator<Item = &'a str>) -> (Self, usize) {
        let mut list = Self::new();
        let mut dropped = 0;
        for path in paths {
            if list.patterns.push(EyePattern::new(path)).is_err() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            warn!(
                "Eye patterns exceed {} entries, dropped {}",
                MAX_EYE_PATTERNS, dropped
            );
        }
        (list, dropped)
    }

    pub fn get(&self, index: usize) -> Option<&EyePattern> {
        self.patterns.get(index)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EyePattern> {
        self.patterns.iter()
    }
}

/// Complete control loop configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlConfig {
    /// Per-channel servo update interval
    pub intervals_ms: [u32; CHANNEL_COUNT],
    /// Servo offsets per pattern/channel/phase
    pub patterns: PatternTable,
    /// Motion filter tuning
    pub filter: FilterConfig,
    /// Eye sprite references
    pub eye_patterns: EyePatterns,
    /// Eye animation steps
    pub sequence: Sequence,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            intervals_ms: [DEFAULT_INTERVAL_MS; CHANNEL_COUNT],
            patterns: PatternTable::default(),
            filter: FilterConfig::default(),
            eye_patterns: EyePatterns::new(),
            sequence: Sequence::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ControlConfig::default();
        assert_eq!(config.intervals_ms, [5000; CHANNEL_COUNT]);
        assert_eq!(config.filter.threshold, 0.01);
        assert_eq!(config.filter.scale_factor, 320.0);
        assert!(config.sequence.is_empty());
        assert!(config.eye_patterns.is_empty());
    }

    #[test]
    fn test_sequence_capacity() {
        let items = [SequenceItem::new(0, 100); MAX_SEQUENCE_ITEMS + 3];
        let (seq, dropped) = Sequence::from_slice(&items);
        assert_eq!(seq.len(), MAX_SEQUENCE_ITEMS);
        assert_eq!(dropped, 3);
    }

    #[test]
    fn test_eye_pattern_capacity_keeps_first() {
        let paths = [
            "/e0.png", "/e1.png", "/e2.png", "/e3.png", "/e4.png", "/e5.png", "/e6.png",
            "/e7.png", "/e8.png", "/e9.png", "/e10.png",
        ];
        let (list, dropped) = EyePatterns::from_paths(paths);
        assert_eq!(list.len(), MAX_EYE_PATTERNS);
        assert_eq!(dropped, 1);
        assert_eq!(list.get(9).unwrap().path.as_str(), "/e9.png");
    }

    #[test]
    fn test_overlong_path_keeps_slot() {
        let long = "/this/path/is/definitely/longer/than/thirty/two/bytes.png";
        let (list, dropped) = EyePatterns::from_paths([long, "/ok.png"]);
        assert_eq!(dropped, 0);
        assert_eq!(list.len(), 2);
        assert!(list.get(0).unwrap().path.is_empty());
        assert_eq!(list.get(1).unwrap().path.as_str(), "/ok.png");
    }

    #[test]
    fn test_pattern_table_lookup() {
        let mut table = PatternTable::default();
        table.set(2, 5, [30, -30]);
        assert_eq!(table.setpoints(2, 5), [30, -30]);
        assert_eq!(table.setpoints(0, 0), [0, 0]);
        assert_eq!(table.setpoints(3, 0), [0, 0]);
        table.set(7, 0, [1, 1]);
        assert_eq!(table.setpoints(7, 0), [0, 0]);
    }

    #[test]
    fn test_filter_config_sanitized() {
        let cfg = FilterConfig::sanitized(-1.0, f32::NAN);
        assert_eq!(cfg, FilterConfig::default());

        let cfg = FilterConfig::sanitized(0.0, -100.0);
        assert_eq!(cfg.threshold, 0.0);
        assert_eq!(cfg.scale_factor, -100.0);
    }
}
