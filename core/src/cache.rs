//! LRU recency policy bounding the entity store.
//!
//! The policy itself is pure: given the current entry count and the recency
//! candidates, it names the entries to evict. The store invokes it
//! synchronously inside every write, so the capacity invariant holds the
//! moment the write returns.

use crate::PropertyId;
use chrono::{DateTime, Utc};

/// Capacity used by the reference deployment.
pub const DEFAULT_CAPACITY: usize = 5;

/// The recency cap applied to top-level properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LruPolicy {
    capacity: usize,
}

impl Default for LruPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl LruPolicy {
    /// Create a policy with the given capacity. A capacity of zero is
    /// clamped to one - the store must always be able to hold the entry
    /// that was just written.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
        }
    }

    /// The maximum number of retained properties.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many entries must go for a store of `total` entries to fit.
    pub fn overflow(&self, total: usize) -> usize {
        total.saturating_sub(self.capacity)
    }

    /// Select eviction victims for a store currently holding `total`
    /// entries.
    ///
    /// `candidates` must not include the entry that triggered the pass -
    /// the just-written entry is never evicted by its own write. Victims
    /// are the oldest by `last_accessed_at`, ties broken by id ascending
    /// so selection is stable.
    pub fn select_victims(
        &self,
        total: usize,
        candidates: impl IntoIterator<Item = (PropertyId, DateTime<Utc>)>,
    ) -> Vec<PropertyId> {
        let overflow = self.overflow(total);
        if overflow == 0 {
            return Vec::new();
        }

        let mut by_age: Vec<(PropertyId, DateTime<Utc>)> = candidates.into_iter().collect();
        by_age.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        by_age.truncate(overflow);
        by_age.into_iter().map(|(id, _)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, minute, 0).unwrap()
    }

    #[test]
    fn zero_capacity_clamps_to_one() {
        assert_eq!(LruPolicy::new(0).capacity(), 1);
    }

    #[test]
    fn default_capacity() {
        assert_eq!(LruPolicy::default().capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn no_victims_at_or_under_capacity() {
        let policy = LruPolicy::new(3);
        let a = Uuid::new_v4();
        assert!(policy.select_victims(3, vec![(a, at(0))]).is_empty());
        assert!(policy.select_victims(2, vec![(a, at(0))]).is_empty());
    }

    #[test]
    fn evicts_oldest_first() {
        let policy = LruPolicy::new(2);
        let old = Uuid::new_v4();
        let newer = Uuid::new_v4();

        let victims = policy.select_victims(3, vec![(newer, at(5)), (old, at(1))]);
        assert_eq!(victims, vec![old]);
    }

    #[test]
    fn evicts_multiple_when_far_over() {
        let policy = LruPolicy::new(1);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        let victims = policy.select_victims(4, vec![(a, at(1)), (b, at(2)), (c, at(3))]);
        assert_eq!(victims.len(), 3);
        assert_eq!(victims[0], a);
        assert_eq!(victims[1], b);
    }

    #[test]
    fn equal_timestamps_tie_break_by_id() {
        let policy = LruPolicy::new(2);
        let mut ids = [Uuid::new_v4(), Uuid::new_v4()];
        ids.sort();

        let victims = policy.select_victims(3, vec![(ids[1], at(1)), (ids[0], at(1))]);
        assert_eq!(victims, vec![ids[0]]);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_victim_count_restores_capacity(
                capacity in 1usize..10,
                extra in 0usize..20,
            ) {
                let policy = LruPolicy::new(capacity);
                let total = capacity + extra;
                // One entry is the just-written one, excluded from candidates
                let candidates: Vec<_> = (0..total.saturating_sub(1))
                    .map(|i| (Uuid::new_v4(), at((i % 60) as u32)))
                    .collect();

                let victims = policy.select_victims(total, candidates);
                prop_assert_eq!(victims.len(), extra);
                prop_assert!(total - victims.len() <= capacity);
            }

            #[test]
            fn prop_victims_are_the_oldest(
                minutes in proptest::collection::vec(0u32..60, 3..12),
            ) {
                let policy = LruPolicy::new(2);
                let entries: Vec<_> = minutes
                    .iter()
                    .map(|&m| (Uuid::new_v4(), at(m)))
                    .collect();

                let victims = policy.select_victims(entries.len(), entries.clone());

                // Every survivor is at least as recent as every victim
                let victim_times: Vec<_> = entries
                    .iter()
                    .filter(|(id, _)| victims.contains(id))
                    .map(|&(_, t)| t)
                    .collect();
                let survivor_min = entries
                    .iter()
                    .filter(|(id, _)| !victims.contains(id))
                    .map(|&(_, t)| t)
                    .min();

                if let (Some(&vmax), Some(smin)) = (victim_times.iter().max(), survivor_min) {
                    prop_assert!(vmax <= smin);
                }
            }
        }
    }
}
