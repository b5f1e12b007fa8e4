//! Scheduled continuations
//!
//! Every delayed step of the game is queued here with the epoch it was
//! scheduled under. Bumping the session epoch turns every older entry into
//! a no-op when it comes due.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::sequence::Cue;

/// A deferred state machine step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Leave the loading splash
    FinishLoading,
    /// Grow the sequence and play it
    AdvanceLevel,
    /// Replay the current sequence unchanged (zen retry)
    Replay,
    /// One playback step
    Playback(Cue),
}

/// A continuation that has come due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Due {
    pub at_ms: u64,
    pub epoch: u64,
    pub action: Continuation,
}

#[derive(Debug, Clone)]
struct Entry {
    at_ms: u64,
    /// Insertion order, breaks ties between equal due times
    seq: u64,
    epoch: u64,
    action: Continuation,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.at_ms, self.seq).cmp(&(other.at_ms, other.seq))
    }
}

/// Time-ordered queue of continuations
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at_ms: u64, epoch: u64, action: Continuation) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry {
            at_ms,
            seq,
            epoch,
            action,
        }));
    }

    /// Pop the earliest entry due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Due> {
        if self.queue.peek()?.0.at_ms > now_ms {
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        Some(Due {
            at_ms: entry.at_ms,
            epoch: entry.epoch,
            action: entry.action,
        })
    }

    /// Due time of the earliest pending entry
    pub fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|e| e.0.at_ms)
    }

    /// Drop entries that can no longer fire
    pub fn discard_before(&mut self, epoch: u64) {
        self.queue.retain(|e| e.0.epoch >= epoch);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_time_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(300, 0, Continuation::Replay);
        scheduler.schedule(100, 0, Continuation::AdvanceLevel);
        scheduler.schedule(200, 0, Continuation::FinishLoading);

        assert_eq!(scheduler.next_due(), Some(100));
        assert_eq!(scheduler.pop_due(50), None);

        let order: Vec<_> = std::iter::from_fn(|| scheduler.pop_due(1000))
            .map(|d| d.action)
            .collect();
        assert_eq!(
            order,
            vec![
                Continuation::AdvanceLevel,
                Continuation::FinishLoading,
                Continuation::Replay
            ]
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_equal_times_keep_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(100, 0, Continuation::Playback(Cue::TileOff { index: 0, tile: 1 }));
        scheduler.schedule(100, 0, Continuation::Playback(Cue::Finished));

        let first = scheduler.pop_due(100).map(|d| d.action);
        assert_eq!(
            first,
            Some(Continuation::Playback(Cue::TileOff { index: 0, tile: 1 }))
        );
        let second = scheduler.pop_due(100).map(|d| d.action);
        assert_eq!(second, Some(Continuation::Playback(Cue::Finished)));
    }

    #[test]
    fn test_discard_before_epoch() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(100, 1, Continuation::AdvanceLevel);
        scheduler.schedule(100, 2, Continuation::Replay);
        scheduler.discard_before(2);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.pop_due(100).map(|d| d.epoch), Some(2));
    }
}
