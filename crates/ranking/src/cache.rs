//! Score memoization.
//!
//! Scores are memoized by `(id, status, difficulty)`. The map itself is an
//! immutable snapshot behind an `Arc`: readers clone the `Arc` and score
//! without holding a lock, writers publish a fresh map.
//!
//! Every invalidation bumps a generation counter. Scores computed under an
//! older generation are dropped at publish time, so a slow call that started
//! before a progress change cannot refill the cache with stale scores.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use studypath_core::{Difficulty, Task, TaskId, TaskScore, TaskStatus, UserProgress};
use tracing::debug;
use crate::config::CacheInvalidation;

/// Key of a memoized score.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Task id
    pub id: TaskId,
    /// Task status when scored
    pub status: TaskStatus,
    /// Task difficulty when scored
    pub difficulty: Difficulty,
}

impl CacheKey {
    /// Key for a task.
    pub fn for_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            status: task.status,
            difficulty: task.difficulty,
        }
    }
}

/// An immutable map of memoized scores.
pub type ScoreMap = HashMap<CacheKey, TaskScore>;

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently cached
    pub entries: usize,
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that had to score
    pub misses: u64,
    /// Times the cache was cleared
    pub invalidations: u64,
}

/// A snapshot and the generation it was read under.
#[derive(Debug, Clone, Default)]
pub struct CacheView {
    /// Generation the snapshot belongs to
    pub generation: u64,
    /// Memoized scores
    pub scores: Arc<ScoreMap>,
}

/// What the cache last saw.
#[derive(Debug, Default)]
struct CacheState {
    generation: u64,
    scores: Arc<ScoreMap>,
    last_size: Option<usize>,
    last_content: Option<u64>,
    last_progress: Option<u64>,
}

/// Score cache shared by a [`RankingEngine`](crate::RankingEngine).
#[derive(Debug)]
pub struct ScoreCache {
    policy: CacheInvalidation,
    state: RwLock<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl ScoreCache {
    /// Create an empty cache with an invalidation policy.
    pub fn new(policy: CacheInvalidation) -> Self {
        Self {
            policy,
            state: RwLock::new(CacheState::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<ScoreMap> {
        Arc::clone(&self.read().scores)
    }

    /// The current generation.
    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    /// Check the incoming collection and progress against what the cache
    /// last saw, clearing it when the policy says the data moved.
    ///
    /// Returns the snapshot to score against; pass its generation back to
    /// [`publish`](Self::publish).
    pub fn observe(&self, tasks: &[Task], progress: &UserProgress) -> CacheView {
        let progress_hash = progress_fingerprint(progress);
        let mut state = self.write();

        let mut reasons = Vec::new();

        if state.last_progress.is_some_and(|h| h != progress_hash) {
            reasons.push("progress changed");
        }
        state.last_progress = Some(progress_hash);

        match self.policy {
            CacheInvalidation::SizeDelta { threshold } => {
                let size = tasks.len();
                if state.last_size.is_some_and(|last| last.abs_diff(size) > threshold) {
                    reasons.push("collection size changed");
                }
                state.last_size = Some(size);
            }
            CacheInvalidation::ContentHash => {
                let content = content_fingerprint(tasks);
                if state.last_content.is_some_and(|h| h != content) {
                    reasons.push("collection content changed");
                }
                state.last_content = Some(content);
            }
        }

        if !reasons.is_empty() {
            state.generation += 1;
            if !state.scores.is_empty() {
                debug!(
                    "Invalidating {} cached scores: {}",
                    state.scores.len(),
                    reasons.join(", ")
                );
                state.scores = Arc::new(ScoreMap::new());
                self.invalidations.fetch_add(1, Ordering::Relaxed);
            }
        }

        CacheView {
            generation: state.generation,
            scores: Arc::clone(&state.scores),
        }
    }

    /// Publish freshly computed scores into a new snapshot.
    ///
    /// Scores from an older generation are discarded. Returns whether they
    /// were stored.
    pub fn publish(&self, generation: u64, fresh: Vec<(CacheKey, TaskScore)>) -> bool {
        if fresh.is_empty() {
            return false;
        }
        let mut state = self.write();
        if state.generation != generation {
            debug!(
                "Dropping {} scores from generation {} (current {})",
                fresh.len(),
                generation,
                state.generation
            );
            return false;
        }
        let mut scores = ScoreMap::clone(&state.scores);
        scores.extend(fresh);
        state.scores = Arc::new(scores);
        true
    }

    /// Record lookup outcomes.
    pub fn record(&self, hits: u64, misses: u64) {
        self.hits.fetch_add(hits, Ordering::Relaxed);
        self.misses.fetch_add(misses, Ordering::Relaxed);
    }

    /// Drop every entry and forget what was seen.
    pub fn clear(&self) {
        let mut state = self.write();
        *state = CacheState {
            generation: state.generation + 1,
            ..CacheState::default()
        };
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.read().scores.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }

    // Writes swap whole values, so a poisoned lock still holds a consistent state.
    fn read(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ScoreCache {
    fn default() -> Self {
        Self::new(CacheInvalidation::default())
    }
}

/// Hash of the sorted `(id, status, difficulty, category)` tuples.
pub fn content_fingerprint(tasks: &[Task]) -> u64 {
    let mut tuples: Vec<_> = tasks
        .iter()
        .map(|t| (&t.id, t.status, t.difficulty, t.category.as_str()))
        .collect();
    tuples.sort();

    let mut hasher = DefaultHasher::new();
    tuples.hash(&mut hasher);
    hasher.finish()
}

/// Hash of everything in a progress snapshot that feeds the scorer.
pub fn progress_fingerprint(progress: &UserProgress) -> u64 {
    let mut hasher = DefaultHasher::new();
    progress.completed_task_ids.hash(&mut hasher);
    progress.in_progress_task_ids.hash(&mut hasher);
    for (category, mastery) in progress.category_mastery.iter() {
        category.hash(&mut hasher);
        mastery.to_bits().hash(&mut hasher);
    }
    progress.average_session_time.to_bits().hash(&mut hasher);
    progress.preferred_difficulty.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::TaskScorer;

    fn tasks(n: usize) -> Vec<Task> {
        (0..n)
            .map(|i| Task::new(format!("t{i}"), "JS", Difficulty::Easy, 30))
            .collect()
    }

    fn fill(cache: &ScoreCache, tasks: &[Task]) {
        cache.publish(
            cache.generation(),
            tasks
                .iter()
                .map(|t| (CacheKey::for_task(t), TaskScore::zero(t.id.clone())))
                .collect(),
        );
    }

    #[test]
    fn test_publish_replaces_snapshot() {
        let cache = ScoreCache::default();
        let before = cache.snapshot();
        fill(&cache, &tasks(2));
        assert!(before.is_empty());
        assert_eq!(cache.snapshot().len(), 2);
    }

    #[test]
    fn test_size_delta_within_threshold_keeps_entries() {
        let cache = ScoreCache::new(CacheInvalidation::SizeDelta { threshold: 5 });
        let progress = UserProgress::default();

        cache.observe(&tasks(10), &progress);
        fill(&cache, &tasks(10));
        cache.observe(&tasks(15), &progress);
        assert_eq!(cache.stats().entries, 10);
        assert_eq!(cache.stats().invalidations, 0);
    }

    #[test]
    fn test_size_delta_beyond_threshold_clears() {
        let cache = ScoreCache::new(CacheInvalidation::SizeDelta { threshold: 5 });
        let progress = UserProgress::default();

        cache.observe(&tasks(10), &progress);
        fill(&cache, &tasks(10));
        cache.observe(&tasks(4), &progress);
        assert_eq!(cache.stats().entries, 0);
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn test_content_hash_detects_same_size_change() {
        let cache = ScoreCache::new(CacheInvalidation::ContentHash);
        let progress = UserProgress::default();
        let mut collection = tasks(3);

        cache.observe(&collection, &progress);
        fill(&cache, &collection);

        // reordering is not a change
        collection.reverse();
        cache.observe(&collection, &progress);
        assert_eq!(cache.stats().entries, 3);

        collection[0].category = "Rust".to_string();
        cache.observe(&collection, &progress);
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_progress_change_clears() {
        let cache = ScoreCache::default();
        let collection = tasks(3);

        cache.observe(&collection, &UserProgress::default());
        fill(&cache, &collection);
        cache.observe(&collection, &UserProgress::default());
        assert_eq!(cache.stats().entries, 3);

        cache.observe(&collection, &UserProgress::default().with_completed(["t0"]));
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_scores_from_before_progress_change_are_dropped() {
        let scorer = TaskScorer::default();
        let task = Task::new("b", "JS", Difficulty::Easy, 30).with_prerequisites(["a"]);
        let collection = vec![task.clone()];
        let before = UserProgress::default();
        let after = UserProgress::default().with_completed(["a"]);

        let cache = ScoreCache::default();
        // a slow call observes the old progress...
        let slow = cache.observe(&collection, &before);
        // ...a second call sees the new progress and moves the generation on
        let current = cache.observe(&collection, &after);
        assert!(current.generation > slow.generation);

        let stale = scorer.score(&task, &before);
        let stored = cache.publish(slow.generation, vec![(CacheKey::for_task(&task), stale)]);
        assert!(!stored);

        let view = cache.observe(&collection, &after);
        assert!(view.scores.get(&CacheKey::for_task(&task)).is_none());

        let fresh = scorer.score(&task, &after);
        assert!(cache.publish(view.generation, vec![(CacheKey::for_task(&task), fresh.clone())]));
        let cached = cache.snapshot();
        assert_eq!(cached.get(&CacheKey::for_task(&task)).map(|s| s.score), Some(fresh.score));
    }

    #[test]
    fn test_clear_moves_generation() {
        let cache = ScoreCache::default();
        let collection = tasks(2);
        let view = cache.observe(&collection, &UserProgress::default());
        cache.clear();
        assert!(!cache.publish(
            view.generation,
            vec![(CacheKey::for_task(&collection[0]), TaskScore::zero(collection[0].id.clone()))],
        ));
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_content_fingerprint_ignores_order() {
        let collection = tasks(4);
        let mut reversed = collection.clone();
        reversed.reverse();
        assert_eq!(content_fingerprint(&collection), content_fingerprint(&reversed));
    }
}
