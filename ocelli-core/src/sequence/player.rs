//! Sequence player
//!
//! Time-driven state machine over the eye sequence. Each step is held for its
//! duration, then the player moves to the next step and wraps after the
//! last. The check runs once per tick and fires at most one transition, so a
//! slow tick rate stretches steps rather than skipping them.

use crate::config::{Sequence, SequenceItem};

/// Playback position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceState {
    /// Index of the step being shown
    pub current_index: usize,
    /// Time the current step started (ms)
    pub last_change_ms: u32,
}

/// Eye sequence player
///
/// An empty sequence is valid: the player stays inert and selects nothing.
#[derive(Debug, Clone)]
pub struct SequencePlayer {
    sequence: Sequence,
    state: SequenceState,
}

impl SequencePlayer {
    /// Create a player starting at step 0 at `start_ms`
    pub fn new(sequence: Sequence, start_ms: u32) -> Self {
        Self {
            sequence,
            state: SequenceState {
                current_index: 0,
                last_change_ms: start_ms,
            },
        }
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Step currently shown, or None for an empty sequence
    pub fn current(&self) -> Option<&SequenceItem> {
        self.sequence.get(self.state.current_index)
    }

    /// Eye pattern index currently selected, or None for an empty sequence
    pub fn selected_pattern(&self) -> Option<u8> {
        self.current().map(|item| item.pattern_index)
    }

    /// Advance if the current step's duration has elapsed
    ///
    /// Returns the new step index when a transition fired.
    pub fn tick(&mut self, now_ms: u32) -> Option<usize> {
        let duration = self.current()?.duration_ms;
        let elapsed = now_ms.wrapping_sub(self.state.last_change_ms);
        if elapsed < duration {
            return None;
        }

        self.state.current_index = (self.state.current_index + 1) % self.sequence.len();
        self.state.last_change_ms = now_ms;
        debug!(
            "Eye sequence step {} at {} ms",
            self.state.current_index, now_ms
        );
        Some(self.state.current_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player(items: &[SequenceItem], start_ms: u32) -> SequencePlayer {
        let (seq, _) = Sequence::from_slice(items);
        SequencePlayer::new(seq, start_ms)
    }

    #[test]
    fn test_two_step_scenario() {
        let mut p = player(&[SequenceItem::new(0, 500), SequenceItem::new(1, 300)], 0);

        p.tick(0);
        assert_eq!(p.selected_pattern(), Some(0));

        p.tick(499);
        assert_eq!(p.selected_pattern(), Some(0));

        assert_eq!(p.tick(500), Some(1));
        assert_eq!(p.selected_pattern(), Some(1));

        p.tick(799);
        assert_eq!(p.selected_pattern(), Some(1));

        assert_eq!(p.tick(800), Some(0));
        assert_eq!(p.selected_pattern(), Some(0));
    }

    #[test]
    fn test_empty_sequence_is_inert() {
        let mut p = player(&[], 0);
        assert_eq!(p.tick(10_000), None);
        assert_eq!(p.selected_pattern(), None);
        assert!(p.current().is_none());
    }

    #[test]
    fn test_single_item_never_changes_index() {
        let mut p = player(&[SequenceItem::new(4, 100)], 0);
        for t in (0..2000).step_by(50) {
            p.tick(t);
            assert_eq!(p.state().current_index, 0);
            assert_eq!(p.selected_pattern(), Some(4));
        }
    }

    #[test]
    fn test_at_most_one_transition_per_tick() {
        let mut p = player(
            &[
                SequenceItem::new(0, 100),
                SequenceItem::new(1, 100),
                SequenceItem::new(2, 100),
            ],
            0,
        );
        // Three durations elapsed, only one step taken
        assert_eq!(p.tick(300), Some(1));
        assert_eq!(p.state().last_change_ms, 300);
        assert_eq!(p.tick(301), None);
    }

    #[test]
    fn test_starts_at_loop_start_time() {
        let mut p = player(&[SequenceItem::new(0, 500), SequenceItem::new(1, 500)], 10_000);
        assert_eq!(p.tick(10_400), None);
        assert_eq!(p.tick(10_500), Some(1));
    }

    #[test]
    fn test_clock_wraparound() {
        let start = u32::MAX - 100;
        let mut p = player(&[SequenceItem::new(0, 200), SequenceItem::new(1, 200)], start);
        assert_eq!(p.tick(start.wrapping_add(150)), None);
        assert_eq!(p.tick(start.wrapping_add(200)), Some(1));
    }

    #[test]
    fn test_zero_duration_advances_every_tick() {
        let mut p = player(&[SequenceItem::new(0, 0), SequenceItem::new(1, 0)], 0);
        assert_eq!(p.tick(0), Some(1));
        assert_eq!(p.tick(0), Some(0));
    }

    proptest! {
        #[test]
        fn prop_equal_durations_index_is_k_mod_n(
            n in 1usize..8,
            duration in 1u32..1000,
            k in 0u32..50,
        ) {
            let items: heapless::Vec<SequenceItem, 8> =
                (0..n).map(|i| SequenceItem::new(i as u8, duration)).collect();
            let mut p = player(&items, 0);
            for step in 1..=k {
                p.tick(step * duration);
            }
            prop_assert_eq!(p.state().current_index, k as usize % n);
        }
    }
}
