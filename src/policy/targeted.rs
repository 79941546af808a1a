//! Distance-to-target prioritization.

use crate::candidate::CandidateSet;
use crate::error::Result;
use crate::policy::{fallback_target, required_values, Scored, ScoringPolicy};

/// Prioritizes candidates whose predicted value lies closest to a target.
///
/// Produces an ascending ordering by `|value - target|`; ties keep their
/// original catalog order. When no target is configured, the policy falls
/// back to half the observed value range.
///
/// # Examples
///
/// ```
/// use screener::prelude::*;
///
/// let candidates = vec![Candidate::new("a"), Candidate::new("b"), Candidate::new("c")];
/// let set = CandidateSet::new(candidates, Some(vec![0.2, 1.1, 2.0]))?;
///
/// let policy = TargetedPolicy::new().target(1.0);
/// let Scored::Ranked(order) = policy.score(&set, 0)? else { unreachable!() };
/// assert_eq!(order, [1, 0, 2]);
/// # Ok::<(), screener::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TargetedPolicy {
    target: Option<f64>,
}

impl TargetedPolicy {
    /// Creates a policy with no configured target.
    #[must_use]
    pub fn new() -> Self {
        Self { target: None }
    }

    /// Sets the value the selection should aim for.
    #[must_use]
    pub fn target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }
}

impl ScoringPolicy for TargetedPolicy {
    fn score(&self, set: &CandidateSet, _sample_size: usize) -> Result<Scored> {
        let values = required_values(set, self.name())?;
        let target = self.target.unwrap_or_else(|| fallback_target(values));

        let mut indices: Vec<usize> = (0..values.len()).collect();
        // Stable sort: equidistant candidates keep their catalog order.
        indices.sort_by(|&a, &b| {
            (values[a] - target)
                .abs()
                .total_cmp(&(values[b] - target).abs())
        });
        Ok(Scored::Ranked(indices))
    }

    fn name(&self) -> &'static str {
        "targeted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;
    use crate::error::Error;

    fn set(values: Vec<f64>) -> CandidateSet {
        let candidates = (0..values.len())
            .map(|i| Candidate::new(format!("c{i}")))
            .collect();
        CandidateSet::new(candidates, Some(values)).unwrap()
    }

    fn ranked(policy: &TargetedPolicy, set: &CandidateSet) -> Vec<usize> {
        match policy.score(set, 0).unwrap() {
            Scored::Ranked(indices) => indices,
            Scored::Sampled(_) => panic!("targeted prioritization should rank, not sample"),
        }
    }

    #[test]
    fn test_orders_by_distance_to_target() {
        let set = set(vec![10.0, 20.0, 30.0, 40.0, 50.0]);
        let policy = TargetedPolicy::new().target(30.0);
        // Distances: 20, 10, 0, 10, 20 — ties resolve to catalog order.
        assert_eq!(ranked(&policy, &set), [2, 1, 3, 0, 4]);
    }

    #[test]
    fn test_distances_are_non_decreasing() {
        let values = vec![4.2, -1.0, 0.3, 7.9, 2.2, -3.6, 0.3];
        let target = 0.5;
        let set = set(values.clone());
        let order = ranked(&TargetedPolicy::new().target(target), &set);

        let distances: Vec<f64> = order.iter().map(|&i| (values[i] - target).abs()).collect();
        assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        // All equidistant from the target.
        let set = set(vec![1.0, 3.0, 1.0, 3.0]);
        let order = ranked(&TargetedPolicy::new().target(2.0), &set);
        assert_eq!(order, [0, 1, 2, 3]);
    }

    #[test]
    fn test_default_target_is_half_the_range() {
        // Range [0, 8] falls back to a target of 4.
        let set = set(vec![0.0, 8.0, 4.0, 6.0]);
        let order = ranked(&TargetedPolicy::new(), &set);
        // Distances 4, 4, 0, 2 — the tie between c0 and c1 keeps catalog order.
        assert_eq!(order, [2, 3, 0, 1]);
    }

    #[test]
    fn test_missing_values_rejected() {
        let set = CandidateSet::from_candidates(vec![Candidate::new("a")]);
        let err = TargetedPolicy::new().target(1.0).score(&set, 0).unwrap_err();
        assert!(matches!(err, Error::MissingValues("targeted")));
    }
}
