//! Scoring and engine configuration.
//!
//! Every weight and threshold used by the scorer lives here so the scheme
//! can be tuned without touching the algorithm.

use serde::Deserialize;
use studypath_core::Difficulty;

/// Weights of the six scoring factors. The defaults sum to `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringWeights {
    /// Prerequisite satisfaction
    pub prerequisites: f64,
    /// Difficulty fit
    pub difficulty: f64,
    /// Curriculum position
    pub learning_path: f64,
    /// Category balance
    pub category_balance: f64,
    /// Session-time fit
    pub time_efficiency: f64,
    /// Mastery gap
    pub mastery_gap: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            prerequisites: 0.35,
            difficulty: 0.25,
            learning_path: 0.20,
            category_balance: 0.10,
            time_efficiency: 0.05,
            mastery_gap: 0.05,
        }
    }
}

impl ScoringWeights {
    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.prerequisites
            + self.difficulty
            + self.learning_path
            + self.category_balance
            + self.time_efficiency
            + self.mastery_gap
    }
}

/// Base difficulty factor per tier.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DifficultyTiers {
    /// Easy tasks
    pub easy: f64,
    /// Medium tasks
    pub medium: f64,
    /// Hard tasks
    pub hard: f64,
}

impl Default for DifficultyTiers {
    fn default() -> Self {
        Self {
            easy: 1.0,
            medium: 0.7,
            hard: 0.4,
        }
    }
}

impl DifficultyTiers {
    /// Base value for a tier.
    pub fn base(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

/// Configuration for [`TaskScorer`](crate::TaskScorer).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringConfig {
    /// Factor weights
    pub weights: ScoringWeights,

    /// Base difficulty values
    pub tiers: DifficultyTiers,

    /// Bonus when the task matches the preferred difficulty
    pub preferred_bonus: f64,

    /// Penalty for hard tasks in weak categories
    pub weak_category_penalty: f64,

    /// Mastery below which a category counts as weak
    pub weak_category_threshold: f64,

    /// Learning order assumed when a task has none
    pub default_learning_order: f64,

    /// Divisor that maps learning order onto the factor
    pub learning_order_scale: f64,

    /// Multiple of the average session still considered a stretch fit
    pub stretch_session_multiplier: f64,

    /// Time factor when the task fits one session
    pub session_fit: f64,

    /// Time factor when the task fits a stretched session
    pub stretch_fit: f64,

    /// Time factor for anything longer
    pub overlong_fit: f64,

    /// Mastery below which hard tasks get a reduced mastery gap
    pub beginner_threshold: f64,

    /// Multiplier applied to the mastery gap for hard tasks in beginner categories
    pub beginner_hard_factor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            tiers: DifficultyTiers::default(),
            preferred_bonus: 0.2,
            weak_category_penalty: 0.3,
            weak_category_threshold: 30.0,
            default_learning_order: 50.0,
            learning_order_scale: 100.0,
            stretch_session_multiplier: 1.5,
            session_fit: 1.0,
            stretch_fit: 0.8,
            overlong_fit: 0.5,
            beginner_threshold: 20.0,
            beginner_hard_factor: 0.5,
        }
    }
}

impl ScoringConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the factor weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Replace the difficulty tiers.
    pub fn with_tiers(mut self, tiers: DifficultyTiers) -> Self {
        self.tiers = tiers;
        self
    }
}

/// When the score cache is thrown away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "policy", rename_all = "camelCase")]
pub enum CacheInvalidation {
    /// Clear when the collection size moves by more than `threshold` since the last call
    SizeDelta {
        /// Allowed size change
        threshold: usize,
    },
    /// Clear when the set of `(id, status, difficulty, category)` tuples changes
    ContentHash,
}

impl Default for CacheInvalidation {
    fn default() -> Self {
        CacheInvalidation::SizeDelta { threshold: 5 }
    }
}

/// Configuration for [`RankingEngine`](crate::RankingEngine).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Whether scores are memoized
    pub cache_enabled: bool,

    /// Cache invalidation policy
    pub invalidation: CacheInvalidation,

    /// Raw prerequisite ratio a task must exceed to be recommended
    pub recommend_threshold: f64,

    /// Size of the "immediate" horizon
    pub immediate_window: usize,

    /// Size of the "next" horizon
    pub next_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            invalidation: CacheInvalidation::default(),
            recommend_threshold: 0.8,
            immediate_window: 3,
            next_window: 5,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable memoization.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Set the invalidation policy.
    pub fn with_invalidation(mut self, invalidation: CacheInvalidation) -> Self {
        self.invalidation = invalidation;
        self
    }

    /// Set the horizon window sizes.
    pub fn with_windows(mut self, immediate: usize, next: usize) -> Self {
        self.immediate_window = immediate;
        self.next_window = next;
        self
    }
}
