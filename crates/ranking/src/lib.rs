//! Ranking layer - task scoring, ordering, and recommendation.

#![warn(missing_docs)]

pub mod config;
pub mod scorer;
pub mod cache;
pub mod engine;

pub use config::{ScoringConfig, ScoringWeights, DifficultyTiers, EngineConfig, CacheInvalidation};
pub use scorer::{TaskScorer, score};
pub use cache::{ScoreCache, CacheKey, CacheStats, CacheView};
pub use engine::{RankingEngine, HorizonGroups, rank, recommend_next, group_by_horizon};

pub use studypath_progress::build_progress;
