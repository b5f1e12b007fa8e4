//! Best results
//!
//! Both records only ever go up. Persisted as two flat keys.

use serde::{Deserialize, Serialize};

use crate::persistence::{Store, keys};

/// High score (classic) and deepest completed level (zen)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRecord {
    pub high_score: u64,
    pub best_zen_depth: u32,
}

impl BestRecord {
    /// Raise the high score; returns true if `score` beat it
    pub fn record_score(&mut self, score: u64) -> bool {
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }

    /// Raise the best zen depth; returns true if `depth` beat it
    pub fn record_zen_depth(&mut self, depth: u32) -> bool {
        if depth > self.best_zen_depth {
            self.best_zen_depth = depth;
            true
        } else {
            false
        }
    }

    /// Load records, treating missing or corrupt values as zero
    pub fn load<S: Store + ?Sized>(store: &S) -> Self {
        let high_score = read_count(store, keys::HIGH_SCORE).unwrap_or(0);
        let best_zen_depth = read_count(store, keys::BEST_ZEN)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0);
        log::info!(
            "Loaded records: high score {}, best zen depth {}",
            high_score,
            best_zen_depth
        );
        Self {
            high_score,
            best_zen_depth,
        }
    }

    pub fn save<S: Store + ?Sized>(&self, store: &mut S) {
        let entries = [
            (keys::HIGH_SCORE, self.high_score.to_string()),
            (keys::BEST_ZEN, self.best_zen_depth.to_string()),
        ];
        for (key, value) in entries {
            if let Err(e) = store.set(key, &value) {
                log::warn!("Failed to save record {}: {}", key, e);
            }
        }
        log::debug!(
            "Records saved (high score {}, zen depth {})",
            self.high_score,
            self.best_zen_depth
        );
    }
}

fn read_count<S: Store + ?Sized>(store: &S, key: &str) -> Option<u64> {
    let raw = store.get(key)?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Invalid stored value for {}: {:?}", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn test_record_score_only_rises() {
        let mut records = BestRecord::default();
        assert!(records.record_score(50));
        assert!(!records.record_score(50));
        assert!(!records.record_score(20));
        assert_eq!(records.high_score, 50);
    }

    #[test]
    fn test_record_zen_depth_only_rises() {
        let mut records = BestRecord::default();
        assert!(!records.record_zen_depth(0));
        assert!(records.record_zen_depth(3));
        assert!(!records.record_zen_depth(2));
        assert_eq!(records.best_zen_depth, 3);
    }

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();
        let records = BestRecord {
            high_score: 1230,
            best_zen_depth: 14,
        };
        records.save(&mut store);
        assert_eq!(BestRecord::load(&store), records);
    }

    #[test]
    fn test_corrupt_values_default_to_zero() {
        let mut store = MemoryStore::new();
        store.insert(keys::HIGH_SCORE, "-5");
        store.insert(keys::BEST_ZEN, "99999999999");
        assert_eq!(BestRecord::load(&store), BestRecord::default());
    }

    proptest! {
        #[test]
        fn prop_zen_depth_is_running_max(depths in proptest::collection::vec(0u32..50, 0..60)) {
            let mut records = BestRecord::default();
            let mut best = 0;
            for depth in depths {
                let before = records.best_zen_depth;
                let raised = records.record_zen_depth(depth);
                best = best.max(depth);
                prop_assert!(records.best_zen_depth >= before);
                prop_assert_eq!(raised, records.best_zen_depth > before);
                prop_assert_eq!(records.best_zen_depth, best);
            }
        }
    }
}
