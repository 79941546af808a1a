//! Uniformly random prioritization.

use parking_lot::Mutex;

use crate::candidate::CandidateSet;
use crate::error::Result;
use crate::policy::{Scored, ScoringPolicy};

/// Prioritizes candidates by uniform shuffle.
///
/// No predicted values are required. Every call produces a fresh
/// permutation; nothing is cached between calls.
///
/// # Examples
///
/// ```
/// use screener::policy::RandomPolicy;
///
/// // Default OS-seeded RNG
/// let policy = RandomPolicy::new();
///
/// // Fixed seed for reproducibility
/// let policy = RandomPolicy::with_seed(42);
/// ```
pub struct RandomPolicy {
    rng: Mutex<fastrand::Rng>,
}

impl RandomPolicy {
    /// Creates a policy with a default random seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Creates a policy with a fixed seed for reproducibility.
    ///
    /// The same seed produces the same sequence of permutations.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringPolicy for RandomPolicy {
    fn score(&self, set: &CandidateSet, _sample_size: usize) -> Result<Scored> {
        let mut indices: Vec<usize> = (0..set.len()).collect();
        self.rng.lock().shuffle(&mut indices);
        Ok(Scored::Ranked(indices))
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;

    fn set(n: usize) -> CandidateSet {
        CandidateSet::from_candidates((0..n).map(|i| Candidate::new(format!("c{i}"))).collect())
    }

    fn ranked(policy: &RandomPolicy, set: &CandidateSet) -> Vec<usize> {
        match policy.score(set, 0).unwrap() {
            Scored::Ranked(indices) => indices,
            Scored::Sampled(_) => panic!("random prioritization should rank, not sample"),
        }
    }

    #[test]
    fn test_output_is_a_permutation() {
        let policy = RandomPolicy::with_seed(42);
        let set = set(20);
        let mut indices = ranked(&policy, &set);
        indices.sort_unstable();
        assert_eq!(indices, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_reproduces_permutation() {
        let set = set(20);
        let first = ranked(&RandomPolicy::with_seed(7), &set);
        let second = ranked(&RandomPolicy::with_seed(7), &set);
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seeds_disagree() {
        let set = set(20);
        let first = ranked(&RandomPolicy::with_seed(1), &set);
        let second = ranked(&RandomPolicy::with_seed(2), &set);
        // 20! orderings make a collision vanishingly unlikely.
        assert_ne!(first, second);
    }

    #[test]
    fn test_calls_are_independently_randomized() {
        let policy = RandomPolicy::with_seed(3);
        let set = set(20);
        let first = ranked(&policy, &set);
        let second = ranked(&policy, &set);
        assert_ne!(first, second);
    }

    #[test]
    fn test_no_values_needed() {
        let policy = RandomPolicy::with_seed(0);
        assert!(policy.score(&set(3), 0).is_ok());
    }
}
