use std::collections::VecDeque;
use std::time::Duration;

use tracing::debug;

use crate::storage::Execution;

/// Default number of retained executions (~8 hours at a 30s interval).
pub const DEFAULT_MAX_HISTORY: usize = 1000;

/// The watched command and its bounded, change-coalesced history.
#[derive(Debug)]
pub struct Session {
    pub command: String,
    pub interval: Duration,
    history: VecDeque<Execution>,
    max_history: usize, // 0 means unbounded
}

impl Session {
    pub fn new(command: &str, interval: Duration, max_history: usize) -> Self {
        Self {
            command: command.to_string(),
            interval,
            history: VecDeque::new(),
            max_history,
        }
    }

    /// Stores `exec` unless its output matches the latest stored entry.
    ///
    /// Exit code and timestamp do not take part in the comparison. Returns
    /// whether the execution was kept; the oldest entries are dropped while
    /// the history exceeds its bound.
    pub fn record_if_changed(&mut self, exec: Execution) -> bool {
        if let Some(last) = self.history.back() {
            if last.output() == exec.output() {
                debug!(exit_code = exec.exit_code, "output unchanged, execution discarded");
                return false;
            }
        }

        self.history.push_back(exec);
        while self.max_history > 0 && self.history.len() > self.max_history {
            self.history.pop_front();
        }
        debug!(len = self.history.len(), "execution recorded");
        true
    }

    pub fn history(&self) -> &VecDeque<Execution> {
        &self.history
    }

    pub fn get(&self, index: usize) -> Option<&Execution> {
        self.history.get(index)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Index of the newest entry, `None` while nothing has been recorded.
    pub fn last_index(&self) -> Option<usize> {
        self.history.len().checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(max: usize) -> Session {
        Session::new("echo", Duration::from_secs(1), max)
    }

    fn outputs(s: &Session) -> Vec<String> {
        s.history().iter().map(|e| e.output()).collect()
    }

    #[test]
    fn first_execution_is_always_stored() {
        let mut s = session(10);
        assert!(s.record_if_changed(Execution::with_output("")));
        assert_eq!(s.len(), 1);
        assert_eq!(s.last_index(), Some(0));
    }

    #[test]
    fn identical_output_is_coalesced() {
        let mut s = session(10);
        assert!(s.record_if_changed(Execution::with_output("A")));
        assert!(!s.record_if_changed(Execution::with_output("A")));
        assert!(!s.record_if_changed(Execution::with_output("A")));
        assert_eq!(outputs(&s), vec!["A"]);
    }

    #[test]
    fn exit_code_change_alone_is_not_a_change() {
        let mut s = session(10);
        s.record_if_changed(Execution::with_output("A"));
        let mut failed = Execution::with_output("A");
        failed.exit_code = 3;
        assert!(!s.record_if_changed(failed));
        assert_eq!(s.len(), 1);
        assert_eq!(s.get(0).map(|e| e.exit_code), Some(0));
    }

    #[test]
    fn only_the_immediate_predecessor_is_compared() {
        let mut s = session(10);
        for out in ["A", "B", "B", "A"] {
            s.record_if_changed(Execution::with_output(out));
        }
        assert_eq!(outputs(&s), vec!["A", "B", "A"]);
    }

    #[test]
    fn oldest_entries_are_evicted_first() {
        let mut s = session(3);
        for out in ["1", "2", "3", "4", "5"] {
            assert!(s.record_if_changed(Execution::with_output(out)));
        }
        assert_eq!(outputs(&s), vec!["3", "4", "5"]);
    }

    #[test]
    fn zero_bound_keeps_everything() {
        let mut s = session(0);
        for i in 0..50 {
            s.record_if_changed(Execution::with_output(&i.to_string()));
        }
        assert_eq!(s.len(), 50);
    }

    #[test]
    fn history_invariants_hold_for_generated_sequences() {
        // Small LCG so the sequence is reproducible.
        let mut seed: u64 = 0x2545_f491;
        for bound in 1..6 {
            let mut s = session(bound);
            let mut prev_len = 0;
            let mut first: Option<String> = None;
            let mut evicted_first = false;
            for _ in 0..200 {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let out = ((seed >> 33) % 3).to_string();
                let before = s.history().back().map(|e| e.output());
                let stored = s.record_if_changed(Execution::with_output(&out));

                assert_eq!(stored, before.as_deref() != Some(out.as_str()));
                assert!(s.len() >= prev_len);
                assert!(s.len() <= bound);
                if first.is_none() {
                    first = Some(out.clone());
                }
                if stored && prev_len == bound {
                    evicted_first = true;
                }
                if !evicted_first {
                    assert_eq!(s.get(0).map(|e| e.output()), first);
                }
                prev_len = s.len();
            }
        }
    }
}
