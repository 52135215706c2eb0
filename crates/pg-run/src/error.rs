//! Pipeline errors.

use pg_engine::EngineError;
use thiserror::Error;

/// Result type for pipeline runs.
pub type RunResult<T> = Result<T, RunError>;

/// Errors that can occur while evaluating a design.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunError {
    /// A sample failed under the abort-on-first-failure policy.
    /// The source error carries the composition, inputs, and diagnostic.
    #[error("Sample {index} failed: {source}")]
    Sample {
        index: usize,
        #[source]
        source: EngineError,
    },

    /// Every sample failed under the collect policy; there is nothing to
    /// export.
    #[error("All {total} samples failed; first failure at {first_index}: {first_message}")]
    AllSamplesFailed {
        total: usize,
        first_index: usize,
        first_message: String,
    },
}
