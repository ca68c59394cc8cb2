pub mod backend;
pub mod rules;

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::protocol::{Score, SectionData};

pub use backend::{BackendClient, BackendScorer};

/// Score plus the message shown to the user on success.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub score: Score,
    pub message: String,
}

impl ScoreOutcome {
    pub fn new(score: Score, message: impl Into<String>) -> Self {
        Self {
            score,
            message: message.into(),
        }
    }
}

/// Turns a submitted section into its API score.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, data: &SectionData) -> Result<ScoreOutcome>;
}

/// Local scorer over the fixed point tables.
#[derive(Debug, Default, Clone)]
pub struct MockScorer;

impl MockScorer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Scorer for MockScorer {
    async fn score(&self, data: &SectionData) -> Result<ScoreOutcome> {
        let score = rules::score_section(data);
        info!("Scored {} locally: {}", data.key().data_key(), score);
        Ok(ScoreOutcome::new(score, "Section submitted successfully"))
    }
}
