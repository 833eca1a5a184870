use std::collections::HashMap;
use std::io::Write;

use clarify_core::ClarifyError;
use clarify_qa::table::Table;

/// Columns of the human-scoring sheet, in output order.
const EVAL_COLUMNS: [&str; 5] = [
    "id",
    "clarify_questions",
    "answer",
    "clarified_suggestion",
    "baseline_suggestion",
];

/// Write the human-scoring TSV scaffold: one row per PR id found in either
/// input, questions flattened onto one line with ` | ` separators, answers
/// flattened with spaces, and two empty columns for the human scorer to
/// fill in.
///
/// Ids are sorted numerically when both sides parse as integers, falling
/// back to string order. Returns the number of data rows written.
///
/// # Errors
///
/// Returns [`ClarifyError::Format`] if the questions table lacks the `id` or
/// `clarify_questions` column, or [`ClarifyError::Io`] on write failure.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use clarify_qa::table::Table;
/// use clarify_run::eval::write_eval_sheet;
///
/// let questions = Table::from_tsv("id\tpr_title\tclarify_questions\n1\tT\tWhy?\n").unwrap();
/// let answers = HashMap::from([("1".to_string(), vec!["Staging only".to_string()])]);
/// let mut out = Vec::new();
/// let rows = write_eval_sheet(&questions, &answers, &mut out).unwrap();
/// assert_eq!(rows, 1);
/// ```
pub fn write_eval_sheet(
    questions: &Table,
    answers: &HashMap<String, Vec<String>>,
    out: &mut impl Write,
) -> Result<usize, ClarifyError> {
    let id_col = questions.col("id").ok_or_else(|| {
        ClarifyError::Format("questions table must have an id column".into())
    })?;
    let questions_col = questions.col("clarify_questions").ok_or_else(|| {
        ClarifyError::Format("questions table must have a clarify_questions column".into())
    })?;

    let mut question_cells: HashMap<String, String> = HashMap::new();
    for row in 0..questions.rows().len() {
        question_cells.insert(
            questions.cell(row, id_col).trim().to_string(),
            flatten_questions(questions.cell(row, questions_col)),
        );
    }

    let mut ids: Vec<String> = question_cells
        .keys()
        .chain(answers.keys())
        .cloned()
        .collect();
    // Numeric ids first in numeric order, everything else after in string
    // order; the key is a total order so mixed batches sort the same way
    // every run.
    ids.sort_by_key(|id| {
        let parsed = id.parse::<i64>();
        (parsed.is_err(), parsed.unwrap_or(0), id.clone())
    });
    ids.dedup();

    writeln!(out, "{}", EVAL_COLUMNS.join("\t"))?;
    let mut written = 0;
    for id in &ids {
        let qs = question_cells.get(id).cloned().unwrap_or_default();
        let ans = answers
            .get(id)
            .map(|list| flatten_answer(&list.join(" ")))
            .unwrap_or_default();
        let row = [id.as_str(), qs.as_str(), ans.as_str(), "", ""]
            .iter()
            .map(|cell| tsv_escape(cell))
            .collect::<Vec<_>>()
            .join("\t");
        writeln!(out, "{row}")?;
        written += 1;
    }
    Ok(written)
}

fn flatten_questions(cell: &str) -> String {
    cell.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

fn flatten_answer(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn tsv_escape(cell: &str) -> String {
    if cell.contains('\t') || cell.contains('\n') || cell.contains('"') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
