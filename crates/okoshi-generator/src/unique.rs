//! Per-column uniqueness tracking with retry-on-collision.

use crate::error::GenerateError;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Receives a callback for every uniqueness retry.
///
/// The populator's progress reporter implements this to surface retries as
/// transient status.
pub trait RetryObserver {
    fn on_retry(&mut self, column: &str, attempt: u64);
}

/// Observer that ignores retries.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RetryObserver for NoopObserver {
    fn on_retry(&mut self, _column: &str, _attempt: u64) {}
}

/// Remembers every value emitted for each unique column.
///
/// Sets only grow; nothing is evicted for the lifetime of a run.
#[derive(Debug, Default)]
pub struct UniquenessTracker {
    seen: HashMap<String, HashSet<String>>,
    /// `None` retries until a new value turns up
    max_retries: Option<u64>,
}

impl UniquenessTracker {
    /// Create a tracker that retries without limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of retries per value.
    pub fn with_max_retries(mut self, max_retries: Option<u64>) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn max_retries(&self) -> Option<u64> {
        self.max_retries
    }

    /// Start tracking `column`, seeding it with already-rendered values
    /// (typically the rows already present in the table).
    pub fn seed<I>(&mut self, column: &str, existing: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.seen
            .entry(column.to_string())
            .or_default()
            .extend(existing);
    }

    pub fn is_tracked(&self, column: &str) -> bool {
        self.seen.contains_key(column)
    }

    pub fn contains(&self, column: &str, value: &str) -> bool {
        self.seen
            .get(column)
            .is_some_and(|values| values.contains(value))
    }

    /// Number of values recorded for `column`.
    pub fn len(&self, column: &str) -> usize {
        self.seen.get(column).map_or(0, HashSet::len)
    }

    /// Draw candidates until one is new for `column`, record it and return it.
    ///
    /// Every collision is reported to `observer`. Without a retry cap this
    /// loops until it succeeds, so the caller must make sure the column's
    /// value space is larger than the number of rows requested.
    pub fn generate_unique<F>(
        &mut self,
        column: &str,
        observer: &mut dyn RetryObserver,
        mut candidate: F,
    ) -> Result<String, GenerateError>
    where
        F: FnMut() -> String,
    {
        let max_retries = self.max_retries;
        let seen = self.seen.entry(column.to_string()).or_default();
        let mut retries = 0u64;

        loop {
            let value = candidate();
            if !seen.contains(&value) {
                seen.insert(value.clone());
                return Ok(value);
            }

            retries += 1;
            if max_retries.is_some_and(|max| retries > max) {
                return Err(GenerateError::UniquenessExhausted {
                    column: column.to_string(),
                    attempts: retries - 1,
                });
            }

            trace!("Duplicate value {} for column '{}', retry {}", value, column, retries);
            observer.on_retry(column, retries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingObserver {
        retries: Vec<(String, u64)>,
    }

    impl RetryObserver for RecordingObserver {
        fn on_retry(&mut self, column: &str, attempt: u64) {
            self.retries.push((column.to_string(), attempt));
        }
    }

    #[test]
    fn test_collision_is_retried() {
        let mut tracker = UniquenessTracker::new();
        let mut observer = RecordingObserver::default();
        let mut candidates = ["a", "a", "a", "b"].into_iter().map(String::from);

        let first = tracker
            .generate_unique("code", &mut observer, || candidates.next().unwrap())
            .unwrap();
        let second = tracker
            .generate_unique("code", &mut observer, || candidates.next().unwrap())
            .unwrap();

        assert_eq!(first, "a");
        assert_eq!(second, "b");
        assert_eq!(
            observer.retries,
            vec![("code".to_string(), 1), ("code".to_string(), 2)]
        );
        assert_eq!(tracker.len("code"), 2);
    }

    #[test]
    fn test_seeded_values_are_never_emitted() {
        let mut tracker = UniquenessTracker::new();
        tracker.seed("code", ["'x'".to_string()]);
        let mut candidates = ["'x'", "'y'"].into_iter().map(String::from);

        let value = tracker
            .generate_unique("code", &mut NoopObserver, || candidates.next().unwrap())
            .unwrap();

        assert_eq!(value, "'y'");
        assert!(tracker.contains("code", "'x'"));
        assert!(tracker.contains("code", "'y'"));
    }

    #[test]
    fn test_bounded_retries_exhaust() {
        let mut tracker = UniquenessTracker::new().with_max_retries(Some(3));
        tracker.seed("flag", ["1".to_string()]);
        let mut observer = RecordingObserver::default();

        let err = tracker
            .generate_unique("flag", &mut observer, || "1".to_string())
            .unwrap_err();

        assert!(matches!(
            err,
            GenerateError::UniquenessExhausted { ref column, attempts: 3 } if column == "flag"
        ));
        assert_eq!(observer.retries.len(), 3);
    }

    #[test]
    fn test_zero_retries_fails_on_first_collision() {
        let mut tracker = UniquenessTracker::new().with_max_retries(Some(0));
        tracker.seed("flag", ["1".to_string()]);

        let result = tracker.generate_unique("flag", &mut NoopObserver, || "1".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_columns_are_tracked_independently() {
        let mut tracker = UniquenessTracker::new();
        tracker
            .generate_unique("a", &mut NoopObserver, || "1".to_string())
            .unwrap();
        let value = tracker
            .generate_unique("b", &mut NoopObserver, || "1".to_string())
            .unwrap();

        assert_eq!(value, "1");
        assert!(tracker.is_tracked("a"));
        assert!(!tracker.is_tracked("c"));
    }
}
