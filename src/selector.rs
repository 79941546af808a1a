//! Capping, short-circuiting, and side expansion of scored candidates.

use crate::candidate::{Candidate, CandidateSet, Side};
use crate::error::Result;
use crate::policy::{Scored, ScoringPolicy};
use crate::taskspec::{CalcSettings, TaskSpec, TaskSpecBuilder};

/// One selected candidate, tagged with the side it was expanded for.
///
/// Entries produced by side duplication carry `Some(side)`; entries from a
/// direct draw carry the candidate's own (possibly absent) side through.
#[derive(Clone, Debug, PartialEq)]
pub struct Selected {
    /// The selected candidate.
    pub candidate: Candidate,
    /// The slab face this entry will be submitted for.
    pub side: Option<Side>,
}

/// The ordered outcome of a selection call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionResult {
    entries: Vec<Selected>,
}

impl SelectionResult {
    /// Returns the number of selected entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the selected entries in selection order.
    #[must_use]
    pub fn entries(&self) -> &[Selected] {
        &self.entries
    }

    /// Iterates over the selected entries.
    pub fn iter(&self) -> core::slice::Iter<'_, Selected> {
        self.entries.iter()
    }

    /// Builds one task spec per entry, in selection order.
    ///
    /// Every entry appears exactly once in the output. The first builder
    /// failure aborts the whole batch — partial submission would leave
    /// duplicate work behind on retry.
    ///
    /// # Errors
    ///
    /// Propagates the first error the builder reports.
    pub fn into_task_specs(
        self,
        builder: &dyn TaskSpecBuilder,
        adsorbate: &str,
        settings: &CalcSettings,
    ) -> Result<Vec<TaskSpec>> {
        let mut specs = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            specs.push(builder.build(&entry.candidate, adsorbate, entry.side, settings)?);
        }
        Ok(specs)
    }
}

impl IntoIterator for SelectionResult {
    type Item = Selected;
    type IntoIter = std::vec::IntoIter<Selected>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a SelectionResult {
    type Item = &'a Selected;
    type IntoIter = core::slice::Iter<'a, Selected>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Applies a scoring policy and caps the result.
///
/// The selector owns the submission budget (`max_selected`, where 0 means
/// unbounded) and the side-duplication flag. With duplication on — the
/// default, since the catalog does not track which slab face a site sits
/// on — each surviving candidate is expanded into a top and a bottom entry,
/// and the cap is therefore half the budget. The halving and the expansion
/// are two ends of the same coupling; both live here and nowhere else.
///
/// # Examples
///
/// ```
/// use screener::prelude::*;
///
/// let candidates = vec![Candidate::new("a"), Candidate::new("b"), Candidate::new("c")];
/// let set = CandidateSet::from_candidates(candidates);
///
/// // Three candidates against a budget of ten: scarce, so everything is
/// // accepted without consulting the policy.
/// let selection = Selector::new(10).select(&set, &RandomPolicy::with_seed(0))?;
/// assert_eq!(selection.len(), 6); // three sites, top + bottom each
/// # Ok::<(), screener::Error>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Selector {
    max_selected: usize,
    duplicate_sides: bool,
}

impl Selector {
    /// Creates a selector with side duplication on.
    #[must_use]
    pub fn new(max_selected: usize) -> Self {
        Self {
            max_selected,
            duplicate_sides: true,
        }
    }

    /// Toggles expansion of each surviving candidate into top and bottom
    /// entries. Turning this off also removes the cap halving.
    #[must_use]
    pub fn duplicate_sides(mut self, duplicate: bool) -> Self {
        self.duplicate_sides = duplicate;
        self
    }

    /// Selects up to the configured budget of entries from `set`.
    ///
    /// When the set is already smaller than what the budget could accept,
    /// every candidate is taken as-is and the policy is not consulted, so
    /// scarce candidates are never discarded. Otherwise the policy produces
    /// an ordering (truncated to the cap) or a direct draw (taken as final,
    /// without side expansion — the draw already accounts for the budget).
    ///
    /// # Errors
    ///
    /// Propagates policy failures unchanged; the selector adds nothing.
    pub fn select(
        &self,
        set: &CandidateSet,
        policy: &dyn ScoringPolicy,
    ) -> Result<SelectionResult> {
        let count = set.len();
        let cap = if self.duplicate_sides {
            self.max_selected / 2
        } else {
            self.max_selected
        };

        if count <= cap {
            trace_debug!(count, "scarce candidates, accepting all without scoring");
            return Ok(self.expand(set, (0..count).collect()));
        }

        // An unbounded budget keeps every candidate; the policy still runs
        // so the ordering (or draw) is meaningful to downstream consumers.
        let cap = if self.max_selected == 0 { count } else { cap };

        match policy.score(set, cap)? {
            Scored::Ranked(mut order) => {
                order.truncate(cap);
                trace_info!(
                    policy = policy.name(),
                    kept = order.len(),
                    of = count,
                    "ranked selection"
                );
                Ok(self.expand(set, order))
            }
            Scored::Sampled(chosen) => {
                trace_info!(
                    policy = policy.name(),
                    kept = chosen.len(),
                    of = count,
                    "direct draw selection"
                );
                let entries = chosen
                    .into_iter()
                    .filter_map(|index| set.candidate(index).cloned())
                    .map(|candidate| Selected {
                        side: candidate.side,
                        candidate,
                    })
                    .collect();
                Ok(SelectionResult { entries })
            }
        }
    }

    fn expand(&self, set: &CandidateSet, indices: Vec<usize>) -> SelectionResult {
        let per_candidate = if self.duplicate_sides { 2 } else { 1 };
        let mut entries = Vec::with_capacity(indices.len() * per_candidate);
        for index in indices {
            let Some(candidate) = set.candidate(index) else {
                continue;
            };
            if self.duplicate_sides {
                for side in [Side::Top, Side::Bottom] {
                    entries.push(Selected {
                        candidate: candidate.clone(),
                        side: Some(side),
                    });
                }
            } else {
                entries.push(Selected {
                    side: candidate.side,
                    candidate: candidate.clone(),
                });
            }
        }
        SelectionResult { entries }
    }
}
