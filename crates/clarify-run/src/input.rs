use std::collections::HashMap;
use std::path::Path;

use clarify_core::{ClarifyError, PrRecord, QuestionEntry};
use clarify_qa::answers::parse_answers;
use clarify_qa::questions::parse_questions_counted;
use clarify_qa::table::Table;

/// Result of reading the PR JSONL stream: the parsed records plus how many
/// lines were skipped as malformed.
#[derive(Debug, Clone, Default)]
pub struct PrBatch {
    /// Records in input order. Eligibility (non-empty id and body) is the
    /// driver's concern, not the loader's.
    pub records: Vec<PrRecord>,
    /// Count of lines that were not valid JSON objects.
    pub malformed: usize,
}

/// Parsed questions table plus the parser's discard diagnostics.
#[derive(Debug, Clone, Default)]
pub struct QuestionTable {
    /// Per-identifier title and ordered question list.
    pub entries: HashMap<String, QuestionEntry>,
    /// Non-blank lines rejected by the question filter, summed over all rows.
    pub discarded_lines: usize,
}

/// Parse a JSONL PR stream.
///
/// One JSON object per line; blank lines are skipped. When `limit` is set,
/// only the first `limit` lines are read. A line that fails to parse is
/// skipped with a stderr warning naming its 1-based line number — counted,
/// never fatal. The id field is string-coercible (JSON string or number);
/// the body is taken from `pr_text`, falling back to `prompt`.
///
/// # Examples
///
/// ```
/// use clarify_run::input::parse_pr_stream;
///
/// let batch = parse_pr_stream("{\"id\":7,\"prompt\":\"Fix null check\"}\nnot json\n", None);
/// assert_eq!(batch.records.len(), 1);
/// assert_eq!(batch.records[0].id, "7");
/// assert_eq!(batch.records[0].body, "Fix null check");
/// assert_eq!(batch.malformed, 1);
/// ```
pub fn parse_pr_stream(text: &str, limit: Option<usize>) -> PrBatch {
    let mut batch = PrBatch::default();

    for (i, line) in text.lines().enumerate() {
        if let Some(limit) = limit {
            if i >= limit {
                break;
            }
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("warning: bad JSON on line {}: {e}", i + 1);
                batch.malformed += 1;
                continue;
            }
        };
        batch.records.push(PrRecord {
            id: coerce_id(value.get("id")),
            body: value
                .get("pr_text")
                .or_else(|| value.get("prompt"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
        });
    }

    batch
}

fn coerce_id(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Load the PR JSONL stream from a file.
///
/// # Errors
///
/// Returns [`ClarifyError::FileNotFound`] if `path` does not exist, or
/// [`ClarifyError::Io`] on read failure.
pub fn load_prs(path: &Path, limit: Option<usize>) -> Result<PrBatch, ClarifyError> {
    Ok(parse_pr_stream(&read_existing(path)?, limit))
}

/// Extract per-identifier question entries from a parsed questions table.
///
/// Requires columns `id`, `pr_title`, `clarify_questions` (case-insensitive);
/// a missing column is a fatal [`ClarifyError::Format`]. Duplicate ids keep
/// the last row.
///
/// # Examples
///
/// ```
/// use clarify_qa::table::Table;
/// use clarify_run::input::questions_from_table;
///
/// let tsv = "id\tpr_title\tclarify_questions\n7\tFix NPE\tQ1: Which callers?\n";
/// let table = Table::from_tsv(tsv).unwrap();
/// let questions = questions_from_table(&table).unwrap();
/// assert_eq!(questions.entries["7"].pr_title, "Fix NPE");
/// assert_eq!(questions.entries["7"].questions, vec!["Which callers?"]);
/// ```
pub fn questions_from_table(table: &Table) -> Result<QuestionTable, ClarifyError> {
    let required = ["id", "pr_title", "clarify_questions"];
    let (Some(id_col), Some(title_col), Some(questions_col)) = (
        table.col(required[0]),
        table.col(required[1]),
        table.col(required[2]),
    ) else {
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|name| table.col(name).is_none())
            .collect();
        return Err(ClarifyError::Format(format!(
            "questions table must have columns id, pr_title, clarify_questions (missing: {})",
            missing.join(", ")
        )));
    };

    let mut out = QuestionTable::default();
    for row in 0..table.rows().len() {
        let (questions, discarded) = parse_questions_counted(table.cell(row, questions_col));
        out.discarded_lines += discarded;
        out.entries.insert(
            table.cell(row, id_col).trim().to_string(),
            QuestionEntry {
                pr_title: table.cell(row, title_col).to_string(),
                questions,
            },
        );
    }
    Ok(out)
}

/// Load and parse the questions TSV from a file.
///
/// # Errors
///
/// File errors as in [`load_prs`]; [`ClarifyError::Format`] when required
/// columns are missing.
pub fn load_questions(path: &Path) -> Result<QuestionTable, ClarifyError> {
    let table = Table::from_tsv(&read_existing(path)?)?;
    questions_from_table(&table)
}

/// Load and parse the answers TSV from a file, in any accepted shape.
///
/// # Errors
///
/// File errors as in [`load_prs`]; [`ClarifyError::Format`] when the table
/// matches no accepted layout.
pub fn load_answers(path: &Path) -> Result<HashMap<String, Vec<String>>, ClarifyError> {
    let table = Table::from_tsv(&read_existing(path)?)?;
    parse_answers(&table)
}

/// Load the answers TSV as a raw table, for callers that need the original
/// cells (e.g. the eval sheet) rather than the parsed map.
pub fn load_table(path: &Path) -> Result<Table, ClarifyError> {
    Table::from_tsv(&read_existing(path)?)
}

fn read_existing(path: &Path) -> Result<String, ClarifyError> {
    if !path.exists() {
        return Err(ClarifyError::FileNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pr_stream_coerces_string_and_number_ids() {
        let batch = parse_pr_stream(
            "{\"id\":\"a1\",\"pr_text\":\"x\"}\n{\"id\":42,\"pr_text\":\"y\"}\n",
            None,
        );
        assert_eq!(batch.records[0].id, "a1");
        assert_eq!(batch.records[1].id, "42");
    }

    #[test]
    fn pr_text_preferred_over_prompt() {
        let batch = parse_pr_stream("{\"id\":1,\"pr_text\":\"a\",\"prompt\":\"b\"}\n", None);
        assert_eq!(batch.records[0].body, "a");
    }

    #[test]
    fn missing_fields_yield_empty_parts() {
        let batch = parse_pr_stream("{\"title\":\"no id or body\"}\n", None);
        assert_eq!(batch.records.len(), 1);
        assert!(!batch.records[0].is_eligible());
    }

    #[test]
    fn malformed_lines_counted_not_fatal() {
        let batch = parse_pr_stream("{\"id\":1,\"prompt\":\"ok\"}\n{broken\n", None);
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.malformed, 1);
    }

    #[test]
    fn limit_bounds_lines_read() {
        let text = "{\"id\":1,\"prompt\":\"a\"}\n{\"id\":2,\"prompt\":\"b\"}\n{\"id\":3,\"prompt\":\"c\"}\n";
        let batch = parse_pr_stream(text, Some(2));
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[1].id, "2");
    }

    #[test]
    fn blank_lines_skipped() {
        let batch = parse_pr_stream("\n{\"id\":1,\"prompt\":\"a\"}\n\n", None);
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.malformed, 0);
    }

    #[test]
    fn questions_table_parses_entries() {
        let tsv = "id\tpr_title\tclarify_questions\n\
                   7\tFix NPE\t\"Q1: Which callers?\nstray note\"\n";
        let table = Table::from_tsv(tsv).unwrap();
        let questions = questions_from_table(&table).unwrap();
        assert_eq!(questions.entries["7"].questions, vec!["Which callers?"]);
        assert_eq!(questions.discarded_lines, 1);
    }

    #[test]
    fn questions_missing_column_is_fatal() {
        let table = Table::from_tsv("id\tpr_title\n1\tt\n").unwrap();
        let err = questions_from_table(&table).unwrap_err();
        assert!(matches!(err, ClarifyError::Format(_)));
        assert!(err.to_string().contains("clarify_questions"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_prs(Path::new("/nonexistent/prs.jsonl"), None).unwrap_err();
        assert!(matches!(err, ClarifyError::FileNotFound(_)));
    }

    #[test]
    fn load_questions_roundtrip_via_tempfile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.tsv");
        std::fs::write(&path, "id\tpr_title\tclarify_questions\n1\tT\tWhy though?\n").unwrap();
        let questions = load_questions(&path).unwrap();
        assert_eq!(questions.entries["1"].questions, vec!["Why though?"]);
    }
}
