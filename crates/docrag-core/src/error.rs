use std::fmt;
use thiserror::Error;

/// Pipeline stage that talks to an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexical,
    Dense,
    Rerank,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Lexical => "lexical",
            Stage::Dense => "dense",
            Stage::Rerank => "rerank",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetrievalError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{stage} index unavailable ({collaborator}): {reason}")]
    IndexUnavailable {
        stage: Stage,
        collaborator: String,
        reason: String,
    },

    #[error("Embedding dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Reranker unavailable ({collaborator}): {reason}")]
    RerankUnavailable { collaborator: String, reason: String },

    #[error("Retrieval unavailable: lexical failed ({lexical}); dense failed ({dense})")]
    RetrievalUnavailable { lexical: String, dense: String },
}

impl RetrievalError {
    pub fn index_unavailable(stage: Stage, collaborator: &str, reason: impl fmt::Display) -> Self {
        Self::IndexUnavailable {
            stage,
            collaborator: collaborator.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn rerank_unavailable(collaborator: &str, reason: impl fmt::Display) -> Self {
        Self::RerankUnavailable {
            collaborator: collaborator.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Stage the error originated in, when it came from a collaborator.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::IndexUnavailable { stage, .. } => Some(*stage),
            Self::DimensionMismatch { .. } => Some(Stage::Dense),
            Self::RerankUnavailable { .. } => Some(Stage::Rerank),
            Self::InvalidArgument(_) | Self::RetrievalUnavailable { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RetrievalError>;
