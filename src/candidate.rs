//! Candidate records and the ordered sets the policies score.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Which face of a slab an adsorption calculation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The top face of the slab.
    Top,
    /// The bottom face of the slab.
    Bottom,
}

impl Side {
    /// Returns the lowercase name used in task specs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single untested configuration pulled from the catalog.
///
/// The core treats a candidate as opaque: it carries an identifier, an
/// optional side flag, and a metadata object that is passed through to the
/// task-spec builder unmodified. Candidates are immutable once retrieved.
///
/// # Examples
///
/// ```
/// use screener::{Candidate, Side};
/// use serde_json::json;
///
/// let candidate = Candidate::new("site-42")
///     .with_side(Side::Top)
///     .with_field("mpid", json!("mp-30"))
///     .with_field("miller", json!([1, 1, 1]));
///
/// assert_eq!(candidate.id, "site-42");
/// assert_eq!(candidate.metadata["mpid"], json!("mp-30"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Catalog identifier for this site/surface combination.
    pub id: String,
    /// The slab face this candidate is pinned to, when the catalog knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    /// Opaque catalog document, passed through to the task-spec builder.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Candidate {
    /// Creates a candidate with no side flag and empty metadata.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            side: None,
            metadata: Map::new(),
        }
    }

    /// Pins the candidate to a slab face.
    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// Adds a metadata field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Returns a canonical key identifying the physical site.
    ///
    /// The key is built from the metadata in sorted-field order, skipping the
    /// `adsorbates` field, so the same site produces the same key whether it
    /// was retrieved from the catalog or from the simulated-results store.
    #[must_use]
    pub fn site_key(&self) -> String {
        use core::fmt::Write;

        let ordered: BTreeMap<&String, &Value> = self
            .metadata
            .iter()
            .filter(|(key, _)| key.as_str() != "adsorbates")
            .collect();
        let mut key = String::new();
        for (field, value) in ordered {
            let _ = write!(key, "{field}={value};");
        }
        key
    }
}

/// An ordered collection of candidates, optionally paired with one predicted
/// value per candidate.
///
/// When values are present they are index-aligned: `values[i]` is the
/// prediction for `candidates[i]`. Construction rejects mismatched lengths.
///
/// # Examples
///
/// ```
/// use screener::{Candidate, CandidateSet};
///
/// let candidates = vec![Candidate::new("a"), Candidate::new("b")];
/// let set = CandidateSet::new(candidates, Some(vec![0.5, 1.5]))?;
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.value(1), Some(1.5));
/// # Ok::<(), screener::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
    values: Option<Vec<f64>>,
}

impl CandidateSet {
    /// Creates a set from candidates and an optional parallel value list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] when a value list is supplied and its
    /// length differs from the candidate count.
    pub fn new(candidates: Vec<Candidate>, values: Option<Vec<f64>>) -> Result<Self> {
        if let Some(ref values) = values {
            if values.len() != candidates.len() {
                return Err(Error::ShapeMismatch {
                    candidates: candidates.len(),
                    values: values.len(),
                });
            }
        }
        Ok(Self { candidates, values })
    }

    /// Creates a set with no predicted values.
    #[must_use]
    pub fn from_candidates(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            values: None,
        }
    }

    /// Returns the number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns `true` when the set holds no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Returns the candidate at `index`, if any.
    #[must_use]
    pub fn candidate(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    /// Returns the predicted value at `index`, if values are present.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.as_ref().and_then(|values| values.get(index).copied())
    }

    /// Returns the candidates in catalog order.
    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Returns the predicted values, when present.
    #[must_use]
    pub fn values(&self) -> Option<&[f64]> {
        self.values.as_deref()
    }

    /// Returns a new set containing only the entries the predicate keeps,
    /// with candidates and values filtered together so index alignment is
    /// preserved.
    #[must_use]
    pub fn filtered<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Candidate, Option<f64>) -> bool,
    {
        let mut candidates = Vec::new();
        let mut values = self.values.as_ref().map(|_| Vec::new());
        for (index, candidate) in self.candidates.iter().enumerate() {
            let value = self.value(index);
            if predicate(candidate, value) {
                candidates.push(candidate.clone());
                if let (Some(kept), Some(value)) = (values.as_mut(), value) {
                    kept.push(value);
                }
            }
        }
        Self { candidates, values }
    }

    /// Consumes the set, returning its candidates and values.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Candidate>, Option<Vec<f64>>) {
        (self.candidates, self.values)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn set_with_values(n: usize) -> CandidateSet {
        let candidates = (0..n).map(|i| Candidate::new(format!("c{i}"))).collect();
        let values = (0..n).map(|i| i as f64).collect();
        CandidateSet::new(candidates, Some(values)).unwrap()
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let candidates = vec![Candidate::new("a"), Candidate::new("b")];
        let err = CandidateSet::new(candidates, Some(vec![1.0])).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                candidates: 2,
                values: 1
            }
        ));
    }

    #[test]
    fn test_indexed_access() {
        let set = set_with_values(3);
        assert_eq!(set.len(), 3);
        assert_eq!(set.candidate(1).unwrap().id, "c1");
        assert_eq!(set.value(2), Some(2.0));
        assert_eq!(set.candidate(3), None);
        assert_eq!(set.value(3), None);
    }

    #[test]
    fn test_value_absent_without_values() {
        let set = CandidateSet::from_candidates(vec![Candidate::new("a")]);
        assert_eq!(set.value(0), None);
        assert!(set.values().is_none());
    }

    #[test]
    fn test_filtered_preserves_alignment() {
        let set = set_with_values(5);
        let kept = set.filtered(|_, value| value.is_some_and(|v| v % 2.0 == 0.0));

        assert_eq!(kept.len(), 3);
        let ids: Vec<&str> = kept.candidates().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c0", "c2", "c4"]);
        assert_eq!(kept.values().unwrap(), [0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_filtered_without_values() {
        let set = CandidateSet::from_candidates(vec![
            Candidate::new("a"),
            Candidate::new("b"),
        ]);
        let kept = set.filtered(|candidate, _| candidate.id == "b");
        assert_eq!(kept.len(), 1);
        assert!(kept.values().is_none());
    }

    #[test]
    fn test_site_key_ignores_adsorbates_and_field_order() {
        let first = Candidate::new("x")
            .with_field("mpid", json!("mp-30"))
            .with_field("shift", json!(0.25))
            .with_field("adsorbates", json!(["CO"]));
        let second = Candidate::new("y")
            .with_field("shift", json!(0.25))
            .with_field("mpid", json!("mp-30"));

        assert_eq!(first.site_key(), second.site_key());
    }

    #[test]
    fn test_site_key_distinguishes_sites() {
        let first = Candidate::new("x").with_field("shift", json!(0.25));
        let second = Candidate::new("y").with_field("shift", json!(0.5));
        assert_ne!(first.site_key(), second.site_key());
    }
}
