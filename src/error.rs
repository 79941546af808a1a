#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the value list does not line up with the candidate list.
    #[error("shape mismatch: {candidates} candidates but {values} values")]
    ShapeMismatch {
        /// The number of candidates.
        candidates: usize,
        /// The number of values supplied alongside them.
        values: usize,
    },

    /// Returned when a prioritization name is not recognized.
    #[error("unknown prioritization '{0}'")]
    InvalidPolicy(String),

    /// Returned when a policy requires predicted values that were not supplied.
    #[error("'{0}' prioritization requires predicted values")]
    MissingValues(&'static str),

    /// Returned when the sampling distribution cannot be formed.
    #[error("degenerate sampling distribution: {reason}")]
    DegenerateDistribution {
        /// Why the distribution is unusable.
        reason: &'static str,
    },

    /// Returned when a draw without replacement exceeds the population.
    #[error("cannot draw {requested} candidates from a population of {available}")]
    InsufficientCandidates {
        /// The requested sample size.
        requested: usize,
        /// The number of drawable candidates.
        available: usize,
    },

    /// Returned when a candidate lacks a field the task-spec builder needs.
    #[error("candidate is missing required field '{field}'")]
    MissingField {
        /// The name of the missing metadata field.
        field: &'static str,
    },

    /// Returned when the candidate catalog fails to answer a query.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Returned when the surrogate model fails to produce predictions.
    #[error("surrogate model error: {0}")]
    Model(String),
}

pub type Result<T> = core::result::Result<T, Error>;
