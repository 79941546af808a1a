//! Gaussian-weighted draw without replacement.

use parking_lot::Mutex;

use crate::candidate::CandidateSet;
use crate::error::{Error, Result};
use crate::policy::{
    fallback_target, required_values, value_range, Scored, ScoringPolicy, DEFAULT_SPREAD_DIVISOR,
};

/// Draws candidates with probability weighted by a normal density centered
/// at a target value.
///
/// Unlike the ordering policies this one samples directly: the draw it
/// returns is final and already limited to the requested size. The standard
/// deviation of the density is the observed value range divided by the
/// spread divisor, so a higher divisor concentrates the draw around the
/// target while a lower one widens it.
///
/// # Examples
///
/// ```
/// use screener::policy::GaussianWeightedPolicy;
///
/// let policy = GaussianWeightedPolicy::with_seed(42)
///     .target(-0.55)
///     .spread_divisor(6.0);
/// ```
pub struct GaussianWeightedPolicy {
    target: Option<f64>,
    spread_divisor: f64,
    rng: Mutex<fastrand::Rng>,
}

impl GaussianWeightedPolicy {
    /// Creates a policy with a default random seed, no configured target,
    /// and the default spread divisor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: None,
            spread_divisor: DEFAULT_SPREAD_DIVISOR,
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Creates a policy with a fixed seed for reproducibility.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            target: None,
            spread_divisor: DEFAULT_SPREAD_DIVISOR,
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }

    /// Sets the center of the density.
    #[must_use]
    pub fn target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the divisor mapping the value range to a standard deviation.
    #[must_use]
    pub fn spread_divisor(mut self, spread_divisor: f64) -> Self {
        self.spread_divisor = spread_divisor;
        self
    }

    /// Normal probability weights for each value, normalized to sum to 1.
    fn weights(&self, values: &[f64]) -> Result<Vec<f64>> {
        if self.spread_divisor <= 0.0 {
            return Err(Error::DegenerateDistribution {
                reason: "spread divisor must be positive",
            });
        }

        let target = self.target.unwrap_or_else(|| fallback_target(values));
        let (low, high) = value_range(values);
        let spread = (high - low) / self.spread_divisor;
        if spread == 0.0 || !spread.is_finite() {
            return Err(Error::DegenerateDistribution {
                reason: "predicted values have zero spread",
            });
        }

        let normalization = 1.0 / (spread * (2.0 * core::f64::consts::PI).sqrt());
        let mut weights = Vec::with_capacity(values.len());
        for &value in values {
            let z = (value - target) / spread;
            let weight = normalization * (-0.5 * z * z).exp();
            if !weight.is_finite() {
                return Err(Error::DegenerateDistribution {
                    reason: "non-finite probability weight",
                });
            }
            weights.push(weight);
        }

        let total: f64 = weights.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(Error::DegenerateDistribution {
                reason: "probability weights sum to zero",
            });
        }
        for weight in &mut weights {
            *weight /= total;
        }
        Ok(weights)
    }
}

impl Default for GaussianWeightedPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringPolicy for GaussianWeightedPolicy {
    fn score(&self, set: &CandidateSet, sample_size: usize) -> Result<Scored> {
        let values = required_values(set, self.name())?;
        let weights = self.weights(values)?;

        // Candidates whose weight underflowed to zero can never be drawn,
        // so they do not count toward the drawable population.
        let available = weights.iter().filter(|&&weight| weight > 0.0).count();
        if sample_size > available {
            return Err(Error::InsufficientCandidates {
                requested: sample_size,
                available,
            });
        }

        // Weighted draw without replacement: walk the cumulative mass of the
        // remaining pool once per draw.
        let mut rng = self.rng.lock();
        let mut pool: Vec<usize> = (0..values.len()).collect();
        let mut remaining_weights = weights;
        let mut chosen = Vec::with_capacity(sample_size);
        for _ in 0..sample_size {
            let remaining: f64 = remaining_weights.iter().sum();
            if remaining <= 0.0 {
                return Err(Error::DegenerateDistribution {
                    reason: "probability mass exhausted",
                });
            }
            let mut threshold = rng.f64() * remaining;
            let mut pick = None;
            for (slot, &weight) in remaining_weights.iter().enumerate() {
                // Zero-weight candidates are undrawable.
                if weight <= 0.0 {
                    continue;
                }
                pick = Some(slot);
                threshold -= weight;
                if threshold <= 0.0 {
                    break;
                }
            }
            let Some(pick) = pick else {
                return Err(Error::DegenerateDistribution {
                    reason: "probability mass exhausted",
                });
            };
            chosen.push(pool.remove(pick));
            remaining_weights.remove(pick);
        }
        Ok(Scored::Sampled(chosen))
    }

    fn name(&self) -> &'static str {
        "gaussian"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;

    fn set(values: Vec<f64>) -> CandidateSet {
        let candidates = (0..values.len())
            .map(|i| Candidate::new(format!("c{i}")))
            .collect();
        CandidateSet::new(candidates, Some(values)).unwrap()
    }

    fn sampled(policy: &GaussianWeightedPolicy, set: &CandidateSet, size: usize) -> Vec<usize> {
        match policy.score(set, size).unwrap() {
            Scored::Sampled(indices) => indices,
            Scored::Ranked(_) => panic!("gaussian prioritization should sample, not rank"),
        }
    }

    #[test]
    fn test_sample_size_and_uniqueness() {
        let set = set(vec![0.1, 0.5, 0.9, 1.3, 1.7, 2.1, 2.5, 2.9]);
        let policy = GaussianWeightedPolicy::with_seed(42).target(1.5);

        let draw = sampled(&policy, &set, 5);
        assert_eq!(draw.len(), 5);
        let mut unique = draw.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 5, "draw must not repeat candidates");
    }

    #[test]
    fn test_full_draw_is_a_permutation() {
        let set = set(vec![1.0, 2.0, 3.0, 4.0]);
        let policy = GaussianWeightedPolicy::with_seed(0).target(2.5);
        let mut draw = sampled(&policy, &set, 4);
        draw.sort_unstable();
        assert_eq!(draw, [0, 1, 2, 3]);
    }

    #[test]
    fn test_request_beyond_population_rejected() {
        let set = set(vec![1.0, 2.0, 3.0]);
        let policy = GaussianWeightedPolicy::with_seed(1).target(2.0);
        let err = policy.score(&set, 4).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientCandidates {
                requested: 4,
                available: 3
            }
        ));
    }

    #[test]
    fn test_zero_spread_rejected() {
        let set = set(vec![1.0, 1.0, 1.0]);
        let policy = GaussianWeightedPolicy::with_seed(2).target(1.0).spread_divisor(6.0);
        let err = policy.score(&set, 1).unwrap_err();
        assert!(matches!(err, Error::DegenerateDistribution { .. }));
    }

    #[test]
    fn test_non_positive_spread_divisor_rejected() {
        let set = set(vec![1.0, 2.0, 3.0]);
        for divisor in [0.0, -6.0] {
            let policy = GaussianWeightedPolicy::with_seed(3).spread_divisor(divisor);
            let err = policy.score(&set, 1).unwrap_err();
            assert!(matches!(err, Error::DegenerateDistribution { .. }));
        }
    }

    #[test]
    fn test_missing_values_rejected() {
        let set = CandidateSet::from_candidates(vec![Candidate::new("a")]);
        let err = GaussianWeightedPolicy::with_seed(4).score(&set, 1).unwrap_err();
        assert!(matches!(err, Error::MissingValues("gaussian")));
    }

    #[test]
    fn test_same_seed_reproduces_draw() {
        let set = set(vec![0.1, 0.5, 0.9, 1.3, 1.7, 2.1]);
        let first = sampled(&GaussianWeightedPolicy::with_seed(9).target(1.0), &set, 3);
        let second = sampled(&GaussianWeightedPolicy::with_seed(9).target(1.0), &set, 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_draw_favors_values_near_target() {
        // A tight spread makes candidates far from the target nearly
        // undrawable, so single-candidate draws should overwhelmingly land
        // on the value at the target.
        let set = set(vec![-10.0, -0.1, 0.0, 0.1, 10.0]);
        let policy = GaussianWeightedPolicy::with_seed(11)
            .target(0.0)
            .spread_divisor(1000.0);

        let mut hits = 0;
        for _ in 0..200 {
            let draw = sampled(&policy, &set, 1);
            if draw[0] == 2 {
                hits += 1;
            }
        }
        assert!(hits > 190, "expected the target value to dominate, got {hits}/200");
    }
}
