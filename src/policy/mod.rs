//! Scoring policies that decide which candidates are worth simulating.
//!
//! A policy looks at a [`CandidateSet`] and produces either a full preference
//! ordering over its indices or a direct weighted draw. The
//! [`Selector`](crate::Selector) turns that into the final capped selection.
//!
//! Policies can be constructed directly, or by name via [`from_name`] when
//! the prioritization comes from configuration:
//!
//! ```
//! use screener::policy::{self, PolicyParams, ScoringPolicy};
//!
//! let params = PolicyParams { target: Some(-0.55), ..PolicyParams::default() };
//! let policy = policy::from_name("targeted", &params)?;
//! assert_eq!(policy.name(), "targeted");
//! # Ok::<(), screener::Error>(())
//! ```

pub mod gaussian;
pub mod passthrough;
pub mod random;
pub mod targeted;

pub use gaussian::GaussianWeightedPolicy;
pub use passthrough::PassThroughPolicy;
pub use random::RandomPolicy;
pub use targeted::TargetedPolicy;

use crate::candidate::CandidateSet;
use crate::error::{Error, Result};

/// The default ratio between the observed value range and the Gaussian
/// standard deviation. A higher divisor yields a narrower selection.
pub const DEFAULT_SPREAD_DIVISOR: f64 = 6.0;

/// The outcome of scoring a candidate set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scored {
    /// A full preference ordering of candidate indices; the selector
    /// truncates it to the cap.
    Ranked(Vec<usize>),
    /// A direct draw already limited to the requested sample size; the
    /// selector takes it as final.
    Sampled(Vec<usize>),
}

/// Trait for pluggable candidate prioritization strategies.
///
/// Implementations are `Send + Sync` so a policy value can be shared across
/// threads; stateful policies keep their RNG behind a mutex.
pub trait ScoringPolicy: Send + Sync {
    /// Scores the set, producing an ordering or a direct sample.
    ///
    /// `sample_size` is the number of candidates the caller will keep. Only
    /// direct-sampling policies use it; ordering policies rank every index
    /// and leave truncation to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingValues`] when the policy needs predictions the
    /// set does not carry, [`Error::DegenerateDistribution`] when a sampling
    /// distribution cannot be formed, and [`Error::InsufficientCandidates`]
    /// when a draw without replacement exceeds the population.
    fn score(&self, set: &CandidateSet, sample_size: usize) -> Result<Scored>;

    /// Returns the stable prioritization name used in configuration and logs.
    fn name(&self) -> &'static str;
}

/// Parameters for the named prioritizations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolicyParams {
    /// The value to bias the selection toward. Policies that need a target
    /// and do not get one fall back to half the observed value range.
    pub target: Option<f64>,
    /// Divisor mapping the value range to a Gaussian standard deviation.
    pub spread_divisor: f64,
    /// Seed for the policy RNG; unseeded policies draw OS entropy.
    pub seed: Option<u64>,
}

impl Default for PolicyParams {
    fn default() -> Self {
        Self {
            target: None,
            spread_divisor: DEFAULT_SPREAD_DIVISOR,
            seed: None,
        }
    }
}

/// Builds the policy registered under `name`.
///
/// Recognized names are `random`, `targeted`, `gaussian`, and `anything`.
///
/// # Errors
///
/// Returns [`Error::InvalidPolicy`] for any other name.
pub fn from_name(name: &str, params: &PolicyParams) -> Result<Box<dyn ScoringPolicy>> {
    match name {
        "random" => {
            let policy = params.seed.map_or_else(RandomPolicy::new, RandomPolicy::with_seed);
            Ok(Box::new(policy))
        }
        "targeted" => {
            let mut policy = TargetedPolicy::new();
            if let Some(target) = params.target {
                policy = policy.target(target);
            }
            Ok(Box::new(policy))
        }
        "gaussian" => {
            let mut policy = params
                .seed
                .map_or_else(GaussianWeightedPolicy::new, GaussianWeightedPolicy::with_seed)
                .spread_divisor(params.spread_divisor);
            if let Some(target) = params.target {
                policy = policy.target(target);
            }
            Ok(Box::new(policy))
        }
        "anything" => Ok(Box::new(PassThroughPolicy)),
        other => Err(Error::InvalidPolicy(other.to_owned())),
    }
}

/// Returns the predicted values, or the error a value-driven policy reports
/// when they are absent. An empty value list counts as absent.
pub(crate) fn required_values<'a>(
    set: &'a CandidateSet,
    policy: &'static str,
) -> Result<&'a [f64]> {
    match set.values() {
        Some(values) if !values.is_empty() => Ok(values),
        _ => Err(Error::MissingValues(policy)),
    }
}

/// Returns the (min, max) of a non-empty value slice.
pub(crate) fn value_range(values: &[f64]) -> (f64, f64) {
    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    for &value in values {
        low = low.min(value);
        high = high.max(value);
    }
    (low, high)
}

/// The target used when none was configured: half the observed value range.
///
/// This is the range divided by two, not the midpoint of the interval. The
/// formula is kept exactly as historical runs used it; see DESIGN.md.
pub(crate) fn fallback_target(values: &[f64]) -> f64 {
    let (low, high) = value_range(values);
    (high - low) / 2.0
}
