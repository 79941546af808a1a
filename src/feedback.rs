//! High-level feedback-loop entry points.
//!
//! A [`FeedbackLoop`] wires the catalog and surrogate-model boundaries into
//! the selection core: it pulls unsimulated candidates, optionally attaches
//! predictions, applies a prioritization, and returns ready-to-submit task
//! specs. Each entry point is one closed feedback round.

use std::collections::HashSet;

use serde_json::{json, Value};

use crate::candidate::{Candidate, CandidateSet};
use crate::error::Result;
use crate::policy::{self, PolicyParams, RandomPolicy, ScoringPolicy, DEFAULT_SPREAD_DIVISOR};
use crate::selector::Selector;
use crate::taskspec::{AdslabSpecBuilder, CalcSettings, TaskSpec, TaskSpecBuilder};

/// The candidate-retrieval boundary.
///
/// Implementations answer synchronous queries against the catalog of
/// possible configurations and the store of finished simulations.
pub trait Catalog: Send + Sync {
    /// Returns catalog entries not yet simulated with `adsorbate`.
    ///
    /// # Errors
    ///
    /// Implementations report [`Error::Catalog`](crate::Error::Catalog) when
    /// the query fails.
    fn unsimulated(
        &self,
        adsorbate: &str,
        settings: &CalcSettings,
        max_atoms: Option<usize>,
    ) -> Result<Vec<Candidate>>;

    /// Returns entries already simulated with `adsorbate`.
    ///
    /// # Errors
    ///
    /// Implementations report [`Error::Catalog`](crate::Error::Catalog) when
    /// the query fails.
    fn simulated(&self, adsorbate: &str, settings: &CalcSettings) -> Result<Vec<Candidate>>;
}

/// The surrogate-model prediction boundary.
pub trait SurrogateModel: Send + Sync {
    /// Predicts one value per candidate, in input order.
    ///
    /// # Errors
    ///
    /// Implementations report [`Error::Model`](crate::Error::Model) when
    /// inference fails.
    fn predict(&self, candidates: &[Candidate], adsorbate: &str, block: &str)
        -> Result<Vec<f64>>;
}

/// The prediction window a model-driven round aims at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictionWindow {
    /// Lower bound; candidates predicted at or below it are dropped.
    pub min: f64,
    /// The point in the window the prioritization biases toward.
    pub target: f64,
    /// Upper bound; candidates predicted at or above it are dropped.
    pub max: f64,
}

/// Runs closed feedback rounds: query, prioritize, cap, build task specs.
///
/// # Examples
///
/// ```no_run
/// use screener::prelude::*;
///
/// fn next_round(catalog: &dyn Catalog) -> Result<Vec<TaskSpec>> {
///     FeedbackLoop::new(catalog)
///         .settings(CalcSettings::default())
///         .randomly("CO", 20)
/// }
/// ```
pub struct FeedbackLoop<'a> {
    catalog: &'a dyn Catalog,
    builder: Box<dyn TaskSpecBuilder>,
    settings: CalcSettings,
    max_atoms: Option<usize>,
    spread_divisor: f64,
    seed: Option<u64>,
}

impl<'a> FeedbackLoop<'a> {
    /// Creates a loop over `catalog` with default settings and the default
    /// adslab spec builder.
    #[must_use]
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Self {
            catalog,
            builder: Box::new(AdslabSpecBuilder),
            settings: CalcSettings::default(),
            max_atoms: None,
            spread_divisor: DEFAULT_SPREAD_DIVISOR,
            seed: None,
        }
    }

    /// Sets the calculation settings threaded through queries and specs.
    #[must_use]
    pub fn settings(mut self, settings: CalcSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Bounds the system size requested from the catalog.
    #[must_use]
    pub fn max_atoms(mut self, max_atoms: usize) -> Self {
        self.max_atoms = Some(max_atoms);
        self
    }

    /// Sets the spread divisor used by Gaussian-weighted rounds.
    #[must_use]
    pub fn spread_divisor(mut self, spread_divisor: f64) -> Self {
        self.spread_divisor = spread_divisor;
        self
    }

    /// Seeds the policy RNG for reproducible rounds.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Swaps in a custom task-spec builder.
    #[must_use]
    pub fn task_spec_builder(mut self, builder: impl TaskSpecBuilder + 'static) -> Self {
        self.builder = Box::new(builder);
        self
    }

    /// Submits up to `max_selected` completely random candidates.
    ///
    /// # Errors
    ///
    /// Propagates catalog and builder failures.
    pub fn randomly(&self, adsorbate: &str, max_selected: usize) -> Result<Vec<TaskSpec>> {
        let candidates = self
            .catalog
            .unsimulated(adsorbate, &self.settings, self.max_atoms)?;
        let set = CandidateSet::from_candidates(candidates);
        let policy = self.random_policy();
        self.submit(&set, &policy, adsorbate, max_selected)
    }

    /// Submits random candidates restricted to sites already simulated with
    /// `matching_ads`. Useful for comparing a new adsorbate against an old
    /// one on identical sites.
    ///
    /// Matching is by site key, which ignores the adsorbate itself.
    ///
    /// # Errors
    ///
    /// Propagates catalog and builder failures.
    pub fn from_matching_ads(
        &self,
        adsorbate: &str,
        matching_ads: &str,
        max_selected: usize,
    ) -> Result<Vec<TaskSpec>> {
        let unsimulated = self
            .catalog
            .unsimulated(adsorbate, &self.settings, self.max_atoms)?;
        let matched = self.catalog.simulated(matching_ads, &self.settings)?;
        let keys: HashSet<String> = matched.iter().map(Candidate::site_key).collect();

        let set = CandidateSet::from_candidates(unsimulated)
            .filtered(|candidate, _| keys.contains(&candidate.site_key()));
        trace_debug!(matching = set.len(), "matched simulated sites");

        let policy = self.random_policy();
        self.submit(&set, &policy, adsorbate, max_selected)
    }

    /// Submits candidates chosen by surrogate-model predictions.
    ///
    /// Candidates are predicted with `model`, trimmed to the open interval
    /// `(window.min, window.max)`, then prioritized by `prioritization`
    /// (one of the names [`policy::from_name`] accepts) with the window's
    /// target.
    ///
    /// # Errors
    ///
    /// Propagates catalog, model, policy, and builder failures; returns
    /// [`Error::ShapeMismatch`](crate::Error::ShapeMismatch) when the model
    /// returns the wrong number of predictions.
    pub fn from_predictions(
        &self,
        adsorbate: &str,
        model: &dyn SurrogateModel,
        block: &str,
        window: PredictionWindow,
        prioritization: &str,
        max_selected: usize,
    ) -> Result<Vec<TaskSpec>> {
        let candidates = self
            .catalog
            .unsimulated(adsorbate, &self.settings, self.max_atoms)?;
        let values = model.predict(&candidates, adsorbate, block)?;
        let set = CandidateSet::new(candidates, Some(values))?;

        let set = set.filtered(|_, value| {
            value.is_some_and(|v| window.min < v && v < window.max)
        });
        trace_debug!(in_window = set.len(), "trimmed to prediction window");

        let params = PolicyParams {
            target: Some(window.target),
            spread_divisor: self.spread_divisor,
            seed: self.seed,
        };
        let policy = policy::from_name(prioritization, &params)?;
        self.submit(&set, policy.as_ref(), adsorbate, max_selected)
    }

    /// Submits random candidates restricted to the given bulk ids and
    /// Miller indices. Membership is checked independently for each list.
    ///
    /// # Errors
    ///
    /// Propagates catalog and builder failures.
    pub fn by_surface(
        &self,
        adsorbate: &str,
        mpids: &[&str],
        millers: &[[i64; 3]],
        max_selected: usize,
    ) -> Result<Vec<TaskSpec>> {
        let candidates = self
            .catalog
            .unsimulated(adsorbate, &self.settings, self.max_atoms)?;
        let millers: Vec<Value> = millers.iter().map(|miller| json!(miller)).collect();

        let set = CandidateSet::from_candidates(candidates).filtered(|candidate, _| {
            let mpid_ok = candidate
                .metadata
                .get("mpid")
                .and_then(Value::as_str)
                .is_some_and(|mpid| mpids.contains(&mpid));
            let miller_ok = candidate
                .metadata
                .get("miller")
                .is_some_and(|miller| millers.contains(miller));
            mpid_ok && miller_ok
        });

        let policy = self.random_policy();
        self.submit(&set, &policy, adsorbate, max_selected)
    }

    fn random_policy(&self) -> RandomPolicy {
        self.seed.map_or_else(RandomPolicy::new, RandomPolicy::with_seed)
    }

    fn submit(
        &self,
        set: &CandidateSet,
        policy: &dyn ScoringPolicy,
        adsorbate: &str,
        max_selected: usize,
    ) -> Result<Vec<TaskSpec>> {
        let selection = Selector::new(max_selected).select(set, policy)?;
        trace_info!(
            adsorbate,
            policy = policy.name(),
            selected = selection.len(),
            "selection complete"
        );
        selection.into_task_specs(self.builder.as_ref(), adsorbate, &self.settings)
    }
}
