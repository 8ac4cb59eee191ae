#![forbid(unsafe_code)]

//! Fixed-capacity FIFO of [`LogEntry`] with time-range queries.
//!
//! # Invariants
//!
//! - `len() <= capacity()` at all times; capacity is at least 1.
//! - Entries are kept in insertion order. When full, the oldest entry is
//!   evicted before the new one is appended.
//!
//! # Queries and sortedness
//!
//! [`LogBuffer::range`] binary-searches the timestamp column, which is only
//! ascending while the buffer holds entries from a single detector session.
//! Entries recorded across a stop/start cycle restart from 0, so callers that
//! keep history across sessions should clear between them or use
//! [`LogBuffer::since_last`], which filters linearly.
//!
//! All queries return owned copies; the buffer is never reachable mutably
//! through a query result.

use std::collections::VecDeque;

use crate::log_entry::LogEntry;
use crate::search::{find_one, find_pair};

/// Default number of retained entries.
pub const DEFAULT_LOG_CAPACITY: usize = 20;

/// Bounded, insertion-ordered log history.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    evicted: u64,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl LogBuffer {
    /// Create an empty buffer. A capacity of 0 is raised to 1.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
        }
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Entries evicted to make room since construction.
    #[must_use]
    pub const fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Newest entry.
    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Borrowing iterator, oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &LogEntry> + '_ {
        self.entries.iter()
    }

    /// Append `entry`, evicting the oldest one first if full.
    ///
    /// Returns the evicted entry.
    pub fn push(&mut self, entry: LogEntry) -> Option<LogEntry> {
        let evicted = if self.is_full() {
            self.evicted = self.evicted.saturating_add(1);
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Timestamp column, oldest first.
    #[must_use]
    pub fn timestamps(&self) -> Vec<u64> {
        self.entries.iter().map(LogEntry::timestamp_ms).collect()
    }

    /// Copy of every entry, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Entries recorded within `window_ms` of the newest entry.
    ///
    /// With `None`, or when the newest timestamp is below `window_ms`, the
    /// whole buffer is returned. Otherwise every entry with
    /// `timestamp >= newest - window_ms` is kept (inclusive lower bound).
    #[must_use]
    pub fn since_last(&self, window_ms: Option<u64>) -> Vec<LogEntry> {
        let (Some(window), Some(last)) = (window_ms, self.last()) else {
            return self.to_vec();
        };
        let newest = last.timestamp_ms();
        if newest < window {
            return self.to_vec();
        }
        let floor = newest - window;
        self.entries
            .iter()
            .filter(|entry| entry.timestamp_ms() >= floor)
            .cloned()
            .collect()
    }

    /// Entries between two exact timestamps, located by binary search.
    ///
    /// - Both bounds with `start < end`: the closed slice from the entry
    ///   stamped `start` through the entry stamped `end`.
    /// - Only `start`: from the entry stamped `start` to the end.
    /// - Only `end`: from the beginning through the entry stamped `end`.
    /// - Neither, or `start >= end`: the whole buffer.
    ///
    /// Bounds must match a recorded timestamp exactly. A bound that matches
    /// nothing yields an empty result. Two independent searches over the
    /// same column cannot return `start` after `end`; the order check only
    /// guards the slice.
    #[must_use]
    pub fn range(&self, start_ms: Option<u64>, end_ms: Option<u64>) -> Vec<LogEntry> {
        let timestamps = self.timestamps();
        let bounds = match (start_ms, end_ms) {
            (Some(start), Some(end)) if start < end => match find_pair(&timestamps, start, end) {
                (Some(first), Some(last)) if first <= last => Some((first, last)),
                _ => None,
            },
            (Some(start), None) => {
                find_one(&timestamps, start).map(|first| (first, timestamps.len() - 1))
            }
            (None, Some(end)) => find_one(&timestamps, end).map(|last| (0, last)),
            _ => return self.to_vec(),
        };

        match bounds {
            Some((first, last)) => self.entries.range(first..=last).cloned().collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_entry::FocusEntry;

    fn focus(timestamp_ms: u64) -> LogEntry {
        LogEntry::Focus(FocusEntry {
            prev_kind: None,
            timestamp_ms,
        })
    }

    fn buffer_with(timestamps: &[u64], capacity: usize) -> LogBuffer {
        let mut buffer = LogBuffer::new(capacity);
        for &ts in timestamps {
            buffer.push(focus(ts));
        }
        buffer
    }

    fn stamps(entries: &[LogEntry]) -> Vec<u64> {
        entries.iter().map(LogEntry::timestamp_ms).collect()
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut buffer = buffer_with(&[1, 2, 3], 3);
        let evicted = buffer.push(focus(4));
        assert_eq!(evicted, Some(focus(1)));
        assert_eq!(buffer.timestamps(), vec![2, 3, 4]);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.evicted(), 1);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut buffer = LogBuffer::new(0);
        assert_eq!(buffer.capacity(), 1);
        buffer.push(focus(1));
        buffer.push(focus(2));
        assert_eq!(buffer.timestamps(), vec![2]);
    }

    #[test]
    fn clear_empties_every_query() {
        let mut buffer = buffer_with(&[10, 20, 30], 5);
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.to_vec().is_empty());
        assert!(buffer.since_last(Some(5)).is_empty());
        assert!(buffer.range(Some(10), Some(30)).is_empty());
        assert!(buffer.range(None, None).is_empty());
    }

    #[test]
    fn since_last_inclusive_lower_bound() {
        let buffer = buffer_with(&[100, 150, 180, 200], 20);
        assert_eq!(stamps(&buffer.since_last(Some(50))), vec![150, 180, 200]);
    }

    #[test]
    fn since_last_window_larger_than_newest_returns_all() {
        let buffer = buffer_with(&[100, 150, 180, 200], 20);
        assert_eq!(stamps(&buffer.since_last(Some(500))), vec![100, 150, 180, 200]);
        assert_eq!(stamps(&buffer.since_last(None)), vec![100, 150, 180, 200]);
    }

    #[test]
    fn since_last_zero_window_keeps_newest_ties() {
        let buffer = buffer_with(&[0, 5, 5], 20);
        assert_eq!(stamps(&buffer.since_last(Some(0))), vec![5, 5]);
    }

    #[test]
    fn range_closed_between_exact_bounds() {
        let buffer = buffer_with(&[1, 3, 5, 7, 9], 20);
        assert_eq!(stamps(&buffer.range(Some(3), Some(7))), vec![3, 5, 7]);
        assert_eq!(stamps(&buffer.range(Some(1), Some(9))), vec![1, 3, 5, 7, 9]);
    }

    #[test]
    fn range_open_ended() {
        let buffer = buffer_with(&[1, 3, 5, 7, 9], 20);
        assert_eq!(stamps(&buffer.range(Some(5), None)), vec![5, 7, 9]);
        assert_eq!(stamps(&buffer.range(None, Some(5))), vec![1, 3, 5]);
    }

    #[test]
    fn range_degenerate_bounds_return_everything() {
        let buffer = buffer_with(&[1, 3, 5], 20);
        assert_eq!(stamps(&buffer.range(None, None)), vec![1, 3, 5]);
        assert_eq!(stamps(&buffer.range(Some(5), Some(3))), vec![1, 3, 5]);
        assert_eq!(stamps(&buffer.range(Some(3), Some(3))), vec![1, 3, 5]);
    }

    #[test]
    fn range_missing_bound_is_empty() {
        let buffer = buffer_with(&[1, 3, 5, 7, 9], 20);
        assert!(buffer.range(Some(4), Some(7)).is_empty());
        assert!(buffer.range(Some(3), Some(8)).is_empty());
        assert!(buffer.range(Some(4), None).is_empty());
        assert!(buffer.range(None, Some(8)).is_empty());
    }

    #[test]
    fn range_on_unsorted_buffer_is_best_effort() {
        // Two sessions: the second restarted its clock.
        let buffer = buffer_with(&[500, 600, 700, 10, 20], 20);
        assert_eq!(stamps(&buffer.range(Some(600), Some(700))), vec![600, 700]);
        // The search for 10 probes 700, then 500, and gives up.
        assert!(buffer.range(Some(10), Some(600)).is_empty());
    }
}
