//! Per-process ordered sequences.

use crate::parser::Pid;
use std::collections::HashMap;

/// Mapping from process id to an ordered sequence of values
///
/// Insertion order is trace order. Nothing is ever re-sorted.
#[derive(Debug, Clone)]
pub struct ProcessBins<T> {
    bins: HashMap<Pid, Vec<T>>,
}

impl<T> ProcessBins<T> {
    pub fn new() -> Self {
        Self {
            bins: HashMap::new(),
        }
    }

    /// Append a value, creating the sequence for an unseen pid
    pub fn push(&mut self, pid: Pid, value: T) {
        self.bins.entry(pid).or_default().push(value);
    }

    /// Values recorded for `pid`, empty if none
    pub fn get(&self, pid: Pid) -> &[T] {
        self.bins.get(&pid).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Pids with at least one value, ascending
    pub fn pids(&self) -> Vec<Pid> {
        let mut pids: Vec<Pid> = self.bins.keys().copied().collect();
        pids.sort_unstable();
        pids
    }

    /// Total number of values across all pids
    pub fn total_len(&self) -> usize {
        self.bins.values().map(Vec::len).sum()
    }
}

impl<T> Default for ProcessBins<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_auto_vivifies() {
        let mut bins = ProcessBins::new();
        assert!(bins.pids().is_empty());

        bins.push(4, 30u64);
        bins.push(4, 10);
        bins.push(2, 5);

        assert_eq!(bins.get(4), &[30, 10]);
        assert_eq!(bins.get(2), &[5]);
        assert_eq!(bins.pids(), vec![2, 4]);
        assert_eq!(bins.total_len(), 3);
    }

    #[test]
    fn test_get_unknown_pid_is_empty() {
        let bins: ProcessBins<f64> = ProcessBins::default();
        assert!(bins.get(99).is_empty());
    }
}
