// ⚠️ Pipeline Errors
// A failed fetch or a broken payload abandons the whole request.

use thiserror::Error;

/// Everything that can stop a fetch-aggregate-rank run.
///
/// Both variants are terminal for the request that hit them. The query
/// facade turns either one into an empty response.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Network failure or non-success status from one of the feeds
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Payload did not match the expected shape
    #[error("feed data contract violated: {0}")]
    DataContract(String),
}

impl PipelineError {
    pub fn fetch(url: &str, reason: impl std::fmt::Display) -> Self {
        PipelineError::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn contract(reason: impl Into<String>) -> Self {
        PipelineError::DataContract(reason.into())
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, PipelineError::Fetch { .. })
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
