//! Task-submission records handed to the orchestration layer.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::candidate::{Candidate, Side};
use crate::error::{Error, Result};

/// An opaque task-submission record.
///
/// Created fresh per selection call, never mutated afterwards, and handed
/// straight to the orchestration layer. The core does not interpret its
/// contents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec(Map<String, Value>);

impl TaskSpec {
    /// Wraps a set of named sections into a spec.
    #[must_use]
    pub fn new(sections: Map<String, Value>) -> Self {
        Self(sections)
    }

    /// Returns a section by name, if present.
    #[must_use]
    pub fn get(&self, section: &str) -> Option<&Value> {
        self.0.get(section)
    }

    /// Consumes the spec, returning its sections.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Calculation settings threaded through task-spec construction.
///
/// These were process-wide constants in earlier revisions of the pipeline;
/// they are explicit configuration now.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalcSettings {
    /// Exchange-correlation functional flag.
    pub xc: String,
    /// Energy cutoff for the corresponding bulk relaxation.
    pub encut: f64,
    /// Maximum number of atoms allowed in the bulk relaxation.
    pub max_bulk_atoms: usize,
}

impl Default for CalcSettings {
    fn default() -> Self {
        Self {
            xc: "rpbe".to_owned(),
            encut: 350.0,
            max_bulk_atoms: 80,
        }
    }
}

/// Converts one selected `(candidate, side)` entry into a task spec.
///
/// The core guarantees one call per entry, in selection order, and aborts
/// the whole batch on the first failure.
pub trait TaskSpecBuilder: Send + Sync {
    /// Builds the submission record for `candidate` on `side`.
    ///
    /// # Errors
    ///
    /// Implementations report [`Error::MissingField`] (or their own failure)
    /// when the candidate cannot be turned into a valid submission.
    fn build(
        &self,
        candidate: &Candidate,
        adsorbate: &str,
        side: Option<Side>,
        settings: &CalcSettings,
    ) -> Result<TaskSpec>;
}

/// The default builder: an adsorbate-on-slab relaxation spec with `bulk`,
/// `gas`, `slab`, and `adsorption` sections.
///
/// Required candidate metadata: `mpid`, `miller`, `shift`. The fingerprint
/// fields `coordination`, `neighborcoord`, and `nextnearestcoordination`
/// are copied into the adsorption section only when present. An entry with
/// no side tag renders as a top-side submission.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdslabSpecBuilder;

impl AdslabSpecBuilder {
    const FINGERPRINT_FIELDS: [&'static str; 3] =
        ["coordination", "neighborcoord", "nextnearestcoordination"];

    fn require<'a>(candidate: &'a Candidate, field: &'static str) -> Result<&'a Value> {
        candidate
            .metadata
            .get(field)
            .ok_or(Error::MissingField { field })
    }
}

impl TaskSpecBuilder for AdslabSpecBuilder {
    fn build(
        &self,
        candidate: &Candidate,
        adsorbate: &str,
        side: Option<Side>,
        settings: &CalcSettings,
    ) -> Result<TaskSpec> {
        let mpid = Self::require(candidate, "mpid")?;
        let miller = Self::require(candidate, "miller")?;
        let shift = Self::require(candidate, "shift")?;

        let mut fingerprint = Map::new();
        for field in Self::FINGERPRINT_FIELDS {
            if let Some(value) = candidate.metadata.get(field) {
                fingerprint.insert(field.to_owned(), value.clone());
            }
        }

        let top = !matches!(side, Some(Side::Bottom));

        let mut sections = Map::new();
        sections.insert(
            "bulk".to_owned(),
            json!({
                "mpid": mpid,
                "max_atoms": settings.max_bulk_atoms,
                "encut": settings.encut,
                "settings": settings.xc,
            }),
        );
        sections.insert(
            "gas".to_owned(),
            json!({
                "gasname": adsorbate,
                "settings": settings.xc,
            }),
        );
        sections.insert(
            "slab".to_owned(),
            json!({
                "miller": miller,
                "shift": shift,
                "top": top,
                "settings": settings.xc,
            }),
        );
        sections.insert(
            "adsorption".to_owned(),
            json!({
                "adsorbates": [{ "name": adsorbate, "fp": fingerprint }],
                "settings": settings.xc,
            }),
        );
        Ok(TaskSpec::new(sections))
    }
}
