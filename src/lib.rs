#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]

//! Active-learning candidate screening for expensive simulations.
//!
//! Given a large catalog of untested candidate configurations (adsorption
//! sites on catalyst surfaces), this crate picks a bounded subset worth
//! submitting for simulation. Candidates are ranked or sampled by a
//! pluggable scoring policy — optionally driven by surrogate-model
//! predictions — then capped and converted into structured task-submission
//! records for the orchestration layer.
//!
//! # Getting Started
//!
//! Rank candidates by proximity to a target prediction, keep the best two,
//! and expand each into a top/bottom submission pair:
//!
//! ```
//! use screener::prelude::*;
//!
//! let candidates: Vec<Candidate> = (0..6)
//!     .map(|i| Candidate::new(format!("site-{i}")))
//!     .collect();
//! let predictions = vec![0.1, 0.4, 0.9, 1.3, 1.8, 2.2];
//! let set = CandidateSet::new(candidates, Some(predictions))?;
//!
//! let policy = TargetedPolicy::new().target(1.0);
//! let selection = Selector::new(4).select(&set, &policy)?;
//!
//! // Two sites survive the cap; each is expanded top + bottom.
//! assert_eq!(selection.len(), 4);
//! # Ok::<(), screener::Error>(())
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`CandidateSet`] | Ordered candidates, optionally paired with predicted values. |
//! | [`ScoringPolicy`](policy::ScoringPolicy) | Strategy producing an ordering or a weighted draw over candidates. |
//! | [`Selector`] | Applies a policy, short-circuits scarce sets, caps and side-expands the result. |
//! | [`TaskSpecBuilder`] | Converts each selected `(candidate, side)` entry into a [`TaskSpec`]. |
//! | [`FeedbackLoop`] | High-level entry points wiring catalog, model, policy, and builder together. |
//!
//! # Policy Guide
//!
//! | Policy | Name | Needs values | Output |
//! |--------|------|--------------|--------|
//! | [`RandomPolicy`](policy::RandomPolicy) | `random` | no | uniformly shuffled ordering |
//! | [`TargetedPolicy`](policy::TargetedPolicy) | `targeted` | yes | ascending distance-to-target ordering |
//! | [`GaussianWeightedPolicy`](policy::GaussianWeightedPolicy) | `gaussian` | yes | weighted draw without replacement |
//! | [`PassThroughPolicy`](policy::PassThroughPolicy) | `anything` | no | catalog order unchanged |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at key selection points | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

mod candidate;
mod error;
mod feedback;
pub mod policy;
mod selector;
mod taskspec;

pub use candidate::{Candidate, CandidateSet, Side};
pub use error::{Error, Result};
pub use feedback::{Catalog, FeedbackLoop, PredictionWindow, SurrogateModel};
pub use selector::{Selected, SelectionResult, Selector};
pub use taskspec::{AdslabSpecBuilder, CalcSettings, TaskSpec, TaskSpecBuilder};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use screener::prelude::*;
/// ```
pub mod prelude {
    pub use crate::candidate::{Candidate, CandidateSet, Side};
    pub use crate::error::{Error, Result};
    pub use crate::feedback::{Catalog, FeedbackLoop, PredictionWindow, SurrogateModel};
    pub use crate::policy::{
        GaussianWeightedPolicy, PassThroughPolicy, PolicyParams, RandomPolicy, Scored,
        ScoringPolicy, TargetedPolicy,
    };
    pub use crate::selector::{Selected, SelectionResult, Selector};
    pub use crate::taskspec::{AdslabSpecBuilder, CalcSettings, TaskSpec, TaskSpecBuilder};
}
