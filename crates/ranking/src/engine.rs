//! The ranking engine - orders tasks and answers "what next?".
//!
//! ```text
//! tasks + progress → score (memoized) → stable sort → rank / recommend / horizons
//! ```

use serde::Serialize;
use studypath_core::{Task, TaskScore, TaskStatus, UserProgress};
use tracing::{debug, trace};
use crate::cache::{CacheKey, CacheStats, CacheView, ScoreCache};
use crate::config::{EngineConfig, ScoringConfig};
use crate::scorer::TaskScorer;

/// Ranked todo tasks split into fixed-size windows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HorizonGroups {
    /// Do these now
    pub immediate: Vec<Task>,
    /// Up after that
    pub next: Vec<Task>,
    /// Everything else
    pub later: Vec<Task>,
}

impl HorizonGroups {
    /// Total number of grouped tasks.
    pub fn len(&self) -> usize {
        self.immediate.len() + self.next.len() + self.later.len()
    }

    /// Whether all groups are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scores, sorts, and recommends tasks.
///
/// All queries take `&self`; the engine can be shared across threads.
#[derive(Debug)]
pub struct RankingEngine {
    scorer: TaskScorer,
    config: EngineConfig,
    cache: ScoreCache,
}

impl RankingEngine {
    /// Create an engine with default scoring and caching.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with an engine configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            scorer: TaskScorer::default(),
            cache: ScoreCache::new(config.invalidation),
            config,
        }
    }

    /// Set the scoring configuration.
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scorer = TaskScorer::with_config(scoring);
        self.cache = ScoreCache::new(self.config.invalidation);
        self
    }

    /// The active engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The scorer in use.
    pub fn scorer(&self) -> &TaskScorer {
        &self.scorer
    }

    /// Tasks ordered by descending score, done tasks last. Equal scores keep
    /// input order.
    pub fn rank(&self, tasks: &[Task], progress: &UserProgress) -> Vec<Task> {
        self.rank_with_scores(tasks, progress)
            .into_iter()
            .map(|(task, _)| task.clone())
            .collect()
    }

    /// Like [`rank`](Self::rank), but returns the scores with their breakdowns.
    pub fn rank_scored(&self, tasks: &[Task], progress: &UserProgress) -> Vec<TaskScore> {
        self.rank_with_scores(tasks, progress)
            .into_iter()
            .map(|(_, score)| score)
            .collect()
    }

    /// Ranked tasks paired with their scores.
    pub fn rank_with_scores<'a>(
        &self,
        tasks: &'a [Task],
        progress: &UserProgress,
    ) -> Vec<(&'a Task, TaskScore)> {
        let view = self.observe(tasks, progress);
        let candidates: Vec<&Task> = tasks.iter().collect();
        self.order(&candidates, progress, view.as_ref())
    }

    /// The best todo task whose raw prerequisite ratio exceeds the threshold.
    ///
    /// The filter uses the linear ratio while scoring squares it.
    pub fn recommend_next(&self, tasks: &[Task], progress: &UserProgress) -> Option<Task> {
        let view = self.observe(tasks, progress);
        let candidates: Vec<&Task> = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Todo)
            .filter(|t| progress.prerequisite_ratio(t) > self.config.recommend_threshold)
            .collect();

        let best = self
            .order(&candidates, progress, view.as_ref())
            .into_iter()
            .next()
            .map(|(task, _)| task.clone());

        match &best {
            Some(task) => debug!("Recommended {} from {} candidates", task.id, candidates.len()),
            None => debug!("No task ready to recommend"),
        }
        best
    }

    /// Rank the todo tasks and window them into immediate / next / later.
    pub fn group_by_horizon(&self, tasks: &[Task], progress: &UserProgress) -> HorizonGroups {
        let view = self.observe(tasks, progress);
        let todo: Vec<&Task> = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Todo)
            .collect();

        let mut ranked = self.order(&todo, progress, view.as_ref()).into_iter().map(|(t, _)| t.clone());

        let immediate: Vec<Task> = ranked.by_ref().take(self.config.immediate_window).collect();
        let next: Vec<Task> = ranked.by_ref().take(self.config.next_window).collect();
        let later: Vec<Task> = ranked.collect();

        HorizonGroups { immediate, next, later }
    }

    /// Cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop all memoized scores.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn observe(&self, tasks: &[Task], progress: &UserProgress) -> Option<CacheView> {
        self.config
            .cache_enabled
            .then(|| self.cache.observe(tasks, progress))
    }

    /// Score and stable-sort: open tasks by descending score, then done tasks.
    fn order<'a>(
        &self,
        tasks: &[&'a Task],
        progress: &UserProgress,
        view: Option<&CacheView>,
    ) -> Vec<(&'a Task, TaskScore)> {
        let scores = self.scores(tasks, progress, view);
        let mut scored: Vec<_> = tasks.iter().copied().zip(scores).collect();
        // Open scores can go negative, so done tasks sort on status first.
        // sort_by is stable, so ties keep input order.
        scored.sort_by(|a, b| {
            a.0.is_done()
                .cmp(&b.0.is_done())
                .then_with(|| b.1.score.total_cmp(&a.1.score))
        });
        scored
    }

    fn scores(&self, tasks: &[&Task], progress: &UserProgress, view: Option<&CacheView>) -> Vec<TaskScore> {
        let Some(view) = view else {
            return tasks.iter().map(|t| self.scorer.score(t, progress)).collect();
        };

        let snapshot = &view.scores;
        let mut fresh = Vec::new();
        let mut hits = 0u64;

        let scores: Vec<TaskScore> = tasks
            .iter()
            .map(|task| {
                let key = CacheKey::for_task(task);
                if let Some(cached) = snapshot.get(&key) {
                    hits += 1;
                    return cached.clone();
                }
                let score = self.scorer.score(task, progress);
                fresh.push((key, score.clone()));
                score
            })
            .collect();

        let misses = fresh.len() as u64;
        trace!("Scored {} tasks: {} cached, {} computed", tasks.len(), hits, misses);
        self.cache.record(hits, misses);
        self.cache.publish(view.generation, fresh);
        scores
    }
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Rank with a fresh default engine.
pub fn rank(tasks: &[Task], progress: &UserProgress) -> Vec<Task> {
    RankingEngine::new().rank(tasks, progress)
}

/// Recommend with a fresh default engine.
pub fn recommend_next(tasks: &[Task], progress: &UserProgress) -> Option<Task> {
    RankingEngine::new().recommend_next(tasks, progress)
}

/// Group with a fresh default engine.
pub fn group_by_horizon(tasks: &[Task], progress: &UserProgress) -> HorizonGroups {
    RankingEngine::new().group_by_horizon(tasks, progress)
}
