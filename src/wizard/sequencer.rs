//! Step sequencing for the listing wizard.
//!
//! Pure index arithmetic over a fixed catalog: which step comes next or
//! before for the active classification, whether a direct jump is allowed
//! given the persisted form position, and how far along the wizard is.
//! Nothing here performs I/O or can fail.

use std::sync::Arc;

use tracing::debug;

use super::catalog::{Step, StepCatalog};
use super::classification::{compute_skip_set, Classification, SkipSet};

/// Tracks the current step of one wizard session
#[derive(Debug, Clone)]
pub struct StepSequencer {
    catalog: Arc<StepCatalog>,
    classification: Classification,
    skips: SkipSet,
    current: usize,
}

impl StepSequencer {
    /// Create a sequencer seeded from the persisted form position.
    ///
    /// The initial index is `form_position - 1`, clamped to the catalog. When
    /// that step is hidden for the classification, the next visible step is
    /// used instead.
    pub fn new(
        catalog: Arc<StepCatalog>,
        classification: Classification,
        form_position: usize,
    ) -> Self {
        let skips = compute_skip_set(&classification);
        let mut sequencer = Self {
            catalog,
            classification,
            skips,
            current: 0,
        };
        sequencer.current = sequencer.seed_index(form_position);
        sequencer
    }

    fn seed_index(&self, form_position: usize) -> usize {
        let index = self.clamp(form_position.saturating_sub(1));
        if self.is_visible(index) {
            return index;
        }
        let next = self.next_visible_index(index);
        if self.is_visible(next) {
            next
        } else {
            self.previous_visible_index(index)
        }
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(self.catalog.last_index())
    }

    pub fn catalog(&self) -> &StepCatalog {
        &self.catalog
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn skip_set(&self) -> &SkipSet {
        &self.skips
    }

    /// Recompute skip rules. The current index is left where it is.
    pub fn set_classification(&mut self, classification: Classification) {
        if classification == self.classification {
            return;
        }
        debug!(
            from = %self.classification,
            to = %classification,
            current = self.current,
            "reclassified wizard"
        );
        self.skips = compute_skip_set(&classification);
        self.classification = classification;
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.catalog.get(index)
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.catalog.get(self.current)
    }

    pub fn is_visible(&self, index: usize) -> bool {
        index < self.catalog.len() && !self.skips.contains(index)
    }

    /// Catalog indices shown for the active classification, in order
    pub fn visible_indices(&self) -> Vec<usize> {
        (0..self.catalog.len())
            .filter(|&i| !self.skips.contains(i))
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.catalog.len() - self.skips.count_below(self.catalog.len())
    }

    pub fn last_visible_index(&self) -> usize {
        (0..self.catalog.len())
            .rev()
            .find(|&i| !self.skips.contains(i))
            .unwrap_or(0)
    }

    /// Ordinal of a catalog index among visible steps
    pub fn visible_index_of(&self, index: usize) -> Option<usize> {
        if !self.is_visible(index) {
            return None;
        }
        Some(index - self.skips.count_below(index))
    }

    pub fn is_on_last_visible(&self) -> bool {
        self.current == self.last_visible_index()
    }

    /// First visible index after `current`, or `current` (clamped) if none
    pub fn next_visible_index(&self, current: usize) -> usize {
        let len = self.catalog.len();
        let mut candidate = current.saturating_add(1);
        while candidate < len && self.skips.contains(candidate) {
            candidate += 1;
        }
        if candidate < len {
            candidate
        } else {
            self.clamp(current)
        }
    }

    /// Last visible index before `current`, never below 0
    pub fn previous_visible_index(&self, current: usize) -> usize {
        let start = current.min(self.catalog.len());
        if start == 0 {
            return 0;
        }
        let mut candidate = start - 1;
        while candidate > 0 && self.skips.contains(candidate) {
            candidate -= 1;
        }
        candidate
    }

    /// Move to the next visible step. Callers validate the page beforehand.
    pub fn advance(&mut self) {
        let next = self.next_visible_index(self.current);
        debug!(from = self.current, to = next, "advance");
        self.current = next;
    }

    /// Move to the previous visible step; stays put on the first step.
    pub fn retreat(&mut self) {
        let previous = self.previous_visible_index(self.current);
        debug!(from = self.current, to = previous, "retreat");
        self.current = previous;
    }

    /// Jump straight to `target` if the navigation policy allows it.
    ///
    /// With `committed = form_position - 1`, the only forward target allowed
    /// is `committed + 1`; any step strictly before `committed` is allowed.
    /// Hidden or out-of-catalog targets are always rejected.
    pub fn jump_to(&mut self, target: usize, form_position: usize) -> bool {
        // committed + 1 == form_position, target < committed <=> target + 1 < form_position
        let allowed = target == form_position || target.saturating_add(1) < form_position;
        let accepted = allowed && self.is_visible(target);

        debug!(
            target_index = target,
            form_position,
            current = self.current,
            accepted,
            "jump"
        );

        if accepted {
            self.current = target;
        }
        accepted
    }

    /// Fraction of visible steps reached, in `[0, 1]`
    pub fn progress_fraction(&self) -> f64 {
        let current = self.clamp(self.current);
        let reached = current + 1 - self.skips.count_below(current + 1);
        reached as f64 / self.visible_count() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequencer(classification: Classification, form_position: usize) -> StepSequencer {
        StepSequencer::new(
            Arc::new(StepCatalog::listing()),
            classification,
            form_position,
        )
    }

    fn all_classifications() -> Vec<Classification> {
        vec![
            Classification::Standard,
            Classification::LandParcel,
            Classification::Parking,
            Classification::Other("office".to_string()),
        ]
    }

    #[test]
    fn test_seed_from_form_position() {
        assert_eq!(sequencer(Classification::Standard, 0).current_index(), 0);
        assert_eq!(sequencer(Classification::Standard, 1).current_index(), 0);
        assert_eq!(sequencer(Classification::Standard, 5).current_index(), 4);
        assert_eq!(sequencer(Classification::Standard, 99).current_index(), 10);
    }

    #[test]
    fn test_seed_on_hidden_step_moves_forward() {
        // index 4 is hidden for parking, next visible is 5
        assert_eq!(sequencer(Classification::Parking, 5).current_index(), 5);
        // 3..=5 hidden for land parcels
        assert_eq!(sequencer(Classification::LandParcel, 4).current_index(), 6);
    }

    #[test]
    fn test_land_parcel_advance_sequence() {
        let mut seq = sequencer(Classification::LandParcel, 1);
        assert_eq!(seq.current_index(), 0);

        let mut visited = Vec::new();
        for _ in 0..6 {
            seq.advance();
            visited.push(seq.current_index());
        }
        assert_eq!(visited, vec![1, 2, 6, 9, 10, 10]);
    }

    #[test]
    fn test_parking_advance_skips() {
        let seq = sequencer(Classification::Parking, 1);
        assert_eq!(seq.next_visible_index(3), 5);
        assert_eq!(seq.next_visible_index(5), 9);

        let mut seq = sequencer(Classification::Parking, 4);
        assert_eq!(seq.current_index(), 3);
        seq.advance();
        assert_eq!(seq.current_index(), 5);
        seq.advance();
        assert_eq!(seq.current_index(), 9);
    }

    #[test]
    fn test_next_and_previous_are_consistent() {
        for classification in all_classifications() {
            let seq = sequencer(classification.clone(), 1);
            let last = seq.last_visible_index();
            for i in seq.visible_indices() {
                if i == last {
                    continue;
                }
                let next = seq.next_visible_index(i);
                assert_eq!(
                    seq.previous_visible_index(next),
                    i,
                    "{classification}: prev(next({i})) should be {i}"
                );
            }
        }
    }

    #[test]
    fn test_boundaries_are_idempotent() {
        for classification in all_classifications() {
            let seq = sequencer(classification, 1);
            let last = seq.last_visible_index();
            assert_eq!(seq.next_visible_index(last), last);
            assert_eq!(seq.previous_visible_index(0), 0);
        }
    }

    #[test]
    fn test_out_of_range_indices_are_clamped() {
        let seq = sequencer(Classification::Standard, 1);
        assert_eq!(seq.next_visible_index(42), 10);
        assert_eq!(seq.previous_visible_index(42), 10);
        assert_eq!(seq.next_visible_index(usize::MAX), 10);
    }

    #[test]
    fn test_retreat_skips_hidden_steps() {
        let mut seq = sequencer(Classification::LandParcel, 10);
        assert_eq!(seq.current_index(), 9);
        seq.retreat();
        assert_eq!(seq.current_index(), 6);
        seq.retreat();
        assert_eq!(seq.current_index(), 2);
        seq.retreat();
        seq.retreat();
        assert_eq!(seq.current_index(), 0);
        seq.retreat();
        assert_eq!(seq.current_index(), 0);
    }

    #[test]
    fn test_jump_policy_without_skips() {
        let mut seq = sequencer(Classification::Standard, 5);
        assert_eq!(seq.current_index(), 4);

        assert!(seq.jump_to(5, 5));
        assert_eq!(seq.current_index(), 5);

        assert!(!seq.jump_to(6, 5));
        assert_eq!(seq.current_index(), 5);

        assert!(seq.jump_to(2, 5));
        assert_eq!(seq.current_index(), 2);
    }

    #[test]
    fn test_jump_accepts_exactly_backward_and_one_forward_target() {
        let form_position = 5;
        let committed = form_position - 1;
        let mut accepted = Vec::new();

        for target in 0..11 {
            let mut seq = sequencer(Classification::Standard, form_position);
            let before = seq.current_index();
            if seq.jump_to(target, form_position) {
                accepted.push(target);
                assert_eq!(seq.current_index(), target);
            } else {
                assert_eq!(seq.current_index(), before);
            }
        }

        let backward: Vec<usize> = accepted.iter().copied().filter(|&t| t < committed).collect();
        let forward: Vec<usize> = accepted.iter().copied().filter(|&t| t > committed).collect();
        assert_eq!(backward, vec![0, 1, 2, 3]);
        assert_eq!(forward, vec![committed + 1]);
        assert!(!accepted.contains(&committed));
    }

    #[test]
    fn test_jump_from_fresh_listing() {
        let mut seq = sequencer(Classification::Standard, 0);
        assert!(seq.jump_to(0, 0));
        assert!(!seq.jump_to(1, 0));
    }

    #[test]
    fn test_jump_rejects_hidden_and_out_of_catalog_targets() {
        let mut seq = sequencer(Classification::Parking, 11);
        assert!(!seq.jump_to(7, 11));
        assert!(!seq.jump_to(11, 11));
        assert!(!seq.jump_to(40, 11));
        assert!(seq.jump_to(5, 11));
    }

    #[test]
    fn test_progress_is_monotonic_and_reaches_one() {
        for classification in all_classifications() {
            let mut seq = sequencer(classification.clone(), 1);
            let mut last_progress = seq.progress_fraction();
            assert!(last_progress > 0.0);

            while !seq.is_on_last_visible() {
                seq.advance();
                let progress = seq.progress_fraction();
                assert!(progress >= last_progress, "{classification}: progress went down");
                last_progress = progress;
            }
            assert!((seq.progress_fraction() - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_progress_uses_visible_ordinal() {
        let mut seq = sequencer(Classification::LandParcel, 1);
        // 6 visible steps: 0, 1, 2, 6, 9, 10
        assert_eq!(seq.visible_count(), 6);
        assert!((seq.progress_fraction() - 1.0 / 6.0).abs() < 1e-9);

        seq.advance();
        seq.advance();
        seq.advance();
        assert_eq!(seq.current_index(), 6);
        assert_eq!(seq.visible_index_of(6), Some(3));
        assert!((seq.progress_fraction() - 4.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_reclassification_updates_progress_not_index() {
        let mut seq = sequencer(Classification::Standard, 10);
        assert_eq!(seq.current_index(), 9);
        let before = seq.progress_fraction();
        assert!((before - 10.0 / 11.0).abs() < 1e-9);

        seq.set_classification(Classification::Parking);
        assert_eq!(seq.current_index(), 9);
        assert!((seq.progress_fraction() - 6.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_visible_index_of_hidden_step() {
        let seq = sequencer(Classification::Parking, 1);
        assert_eq!(seq.visible_index_of(4), None);
        assert_eq!(seq.visible_index_of(5), Some(4));
        assert_eq!(seq.visible_index_of(11), None);
    }

    #[test]
    fn test_current_step_lookup() {
        let seq = sequencer(Classification::Standard, 10);
        assert_eq!(seq.current_step().unwrap().id, "pricing");
        assert_eq!(seq.step(1).unwrap().id, "location");
        assert!(seq.step(11).is_none());
    }
}
