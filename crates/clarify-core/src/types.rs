use serde::{Deserialize, Serialize};

/// A pull request pulled from the input JSONL stream.
///
/// The stream carries the description text under either `pr_text` or
/// `prompt`; the loader normalizes both into [`PrRecord::body`]. Titles are
/// not part of the stream — they live in the questions table.
///
/// # Examples
///
/// ```
/// use clarify_core::PrRecord;
///
/// let pr = PrRecord {
///     id: "7".into(),
///     body: "Fix null check in session handler".into(),
/// };
/// assert!(pr.is_eligible());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrRecord {
    /// Stable identifier, unique within a batch.
    pub id: String,
    /// The PR description text the review is written against.
    pub body: String,
}

impl PrRecord {
    /// A record is eligible for review only when both id and body are
    /// non-empty. Ineligible records are skipped, not errors.
    pub fn is_eligible(&self) -> bool {
        !self.id.is_empty() && !self.body.is_empty()
    }
}

/// One row of the questions table: the PR title and its parsed clarifying
/// questions, in original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionEntry {
    /// PR title from the `pr_title` column; may be empty.
    pub pr_title: String,
    /// Plain question strings with `Q<n>:` labels already stripped.
    pub questions: Vec<String>,
}

/// Output record for one clarified review. One JSON line per record;
/// immutable once written.
///
/// # Examples
///
/// ```
/// use clarify_core::ClarifiedRecord;
///
/// let rec = ClarifiedRecord {
///     id: "7".into(),
///     pr_title: "Fix NPE".into(),
///     pr_text: "Fix null check".into(),
///     questions: vec!["Q1: Which callers?".into()],
///     answers: vec!["A1: Only service A".into()],
///     clarified_review: "Looks good.".into(),
/// };
/// let json = serde_json::to_string(&rec).unwrap();
/// assert!(json.contains("\"clarified_review\""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarifiedRecord {
    /// PR identifier.
    pub id: String,
    /// Title from the questions table; empty when the PR had no row there.
    pub pr_title: String,
    /// Original PR description text.
    pub pr_text: String,
    /// Questions rendered with `Q<n>:` numbering.
    pub questions: Vec<String>,
    /// Answers rendered with `A<n>:` numbering.
    pub answers: Vec<String>,
    /// Generated review text.
    pub clarified_review: String,
}

/// Output record for one baseline review (PR text alone, no Q&A).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineRecord {
    /// PR identifier.
    pub id: String,
    /// Original PR description text.
    pub prompt: String,
    /// Generated review text.
    pub baseline_review: String,
}
