//! Training and evaluation pipelines
//!
//! This module provides:
//! - The episode loop for self-play and play against a random opponent
//! - Bootstrap pretraining on historical positions
//! - Greedy evaluation matches
//! - Observers recording progress during training

pub mod evaluation;
pub mod observers;
pub mod opponents;
pub mod pretrain;
pub mod training;

pub use evaluation::{EvaluationResult, Evaluator};
pub use observers::{LogObserver, MetricsObserver, MetricsSummary, ProgressObserver};
pub use opponents::RandomPolicy;
pub use pretrain::{PretrainReport, Pretrainer, label_reward, load_or_synthesize, synthetic_samples};
pub use training::{AgentRole, TrainingConfig, TrainingMode, TrainingPipeline, TrainingResult};

pub use crate::ports::{Observer, Policy};
