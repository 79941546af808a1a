//! Catalog-order prioritization.

use crate::candidate::CandidateSet;
use crate::error::Result;
use crate::policy::{Scored, ScoringPolicy};

/// Keeps candidates in their catalog order.
///
/// Used when no prioritization is meaningful — take anything, as it comes.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThroughPolicy;

impl ScoringPolicy for PassThroughPolicy {
    fn score(&self, set: &CandidateSet, _sample_size: usize) -> Result<Scored> {
        Ok(Scored::Ranked((0..set.len()).collect()))
    }

    fn name(&self) -> &'static str {
        "anything"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;

    #[test]
    fn test_identity_ordering() {
        let set = CandidateSet::from_candidates(
            (0..5).map(|i| Candidate::new(format!("c{i}"))).collect(),
        );
        let scored = PassThroughPolicy.score(&set, 0).unwrap();
        assert_eq!(scored, Scored::Ranked(vec![0, 1, 2, 3, 4]));
    }

    #[test]
    fn test_no_values_needed() {
        let set = CandidateSet::from_candidates(vec![Candidate::new("a")]);
        assert!(PassThroughPolicy.score(&set, 0).is_ok());
    }
}
