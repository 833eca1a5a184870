use std::collections::HashMap;

use clarify_core::ClarifyError;

use crate::questions::strip_label;
use crate::table::Table;

/// The three accepted layouts for the answers table.
///
/// Human-authored spreadsheets arrive in several shapes; classification
/// happens once, up front, and parsing dispatches on the result.
///
/// # Examples
///
/// ```
/// use clarify_qa::answers::AnswerShape;
/// use clarify_qa::table::Table;
///
/// let wide = Table::from_tsv("id\tanswers\n").unwrap();
/// assert!(matches!(AnswerShape::detect(&wide).unwrap(), AnswerShape::Wide { .. }));
///
/// let tall = Table::from_tsv("id\tanswer\n").unwrap();
/// assert!(matches!(AnswerShape::detect(&tall).unwrap(), AnswerShape::Tall { .. }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerShape {
    /// One row per PR; the `answers` cell holds newline-separated,
    /// optionally `A<n>:`-labelled lines.
    Wide {
        /// Index of the `id` column.
        id: usize,
        /// Index of the `answers` column.
        answers: usize,
    },
    /// One row per (PR, answer); rows accumulate in table order.
    Tall {
        /// Index of the `id` column.
        id: usize,
        /// Index of the `answer` column.
        answer: usize,
    },
    /// Exactly two generic (positionally named) columns, read as
    /// (id, answer) pairs.
    Positional,
}

impl AnswerShape {
    /// Classify the table layout by column-name inspection (case-insensitive).
    ///
    /// `id` + `answers` classifies Wide even though Tall also admits the
    /// `answers` spelling; Wide is checked first.
    ///
    /// # Errors
    ///
    /// Returns [`ClarifyError::Format`] naming the columns seen when no
    /// shape matches. This is a fatal configuration problem, not a per-row
    /// condition.
    pub fn detect(table: &Table) -> Result<Self, ClarifyError> {
        let id = table.col("id");
        let answers = table.col("answers");
        let answer = table.col("answer");

        if let (Some(id), Some(answers)) = (id, answers) {
            return Ok(Self::Wide { id, answers });
        }
        if let (Some(id), Some(answer)) = (id, answer.or(answers)) {
            return Ok(Self::Tall { id, answer });
        }
        // Only the generic 0/1 header counts as positional; anything else
        // two-column is more likely a misspelled named layout and must fail
        // fast rather than silently losing its first row to the header.
        if table.columns().len() == 2 && table.col("0") == Some(0) && table.col("1") == Some(1) {
            return Ok(Self::Positional);
        }

        Err(ClarifyError::Format(format!(
            "unrecognized answers layout (columns: {}); expected id + answers \
             (newline-separated A1/A2 per cell), id + answer (one row per \
             answer), or a generic two-column 0/1 id/answer table",
            table.columns().join(", ")
        )))
    }
}

/// Parse the answers table into an ordered per-identifier answer map.
///
/// Classifies the layout once via [`AnswerShape::detect`], then dispatches.
/// Within one identifier, answer order is exactly the order encountered:
/// line order for Wide, row order for Tall and Positional. That order is
/// load-bearing for positional alignment with the questions.
///
/// # Errors
///
/// Returns [`ClarifyError::Format`] when the table matches no known layout.
///
/// # Examples
///
/// ```
/// use clarify_qa::answers::parse_answers;
/// use clarify_qa::table::Table;
///
/// let tsv = "id\tanswer\n1\tStaging only\n1\tNo mobile impact\n";
/// let table = Table::from_tsv(tsv).unwrap();
/// let map = parse_answers(&table).unwrap();
/// assert_eq!(map["1"], vec!["Staging only", "No mobile impact"]);
/// ```
pub fn parse_answers(table: &Table) -> Result<HashMap<String, Vec<String>>, ClarifyError> {
    let shape = AnswerShape::detect(table)?;
    let mut map: HashMap<String, Vec<String>> = HashMap::new();

    match shape {
        AnswerShape::Wide { id, answers } => {
            for row in 0..table.rows().len() {
                let pid = table.cell(row, id).trim().to_string();
                map.insert(pid, parse_answer_cell(table.cell(row, answers)));
            }
        }
        AnswerShape::Tall { id, answer } => {
            for row in 0..table.rows().len() {
                accumulate(&mut map, table.cell(row, id), table.cell(row, answer));
            }
        }
        AnswerShape::Positional => {
            for row in 0..table.rows().len() {
                accumulate(&mut map, table.cell(row, 0), table.cell(row, 1));
            }
        }
    }

    Ok(map)
}

/// Parse a wide-format answers cell into plain answer strings.
///
/// Same label stripping as questions (`A<n>:`, colon within the first 5
/// characters), but no `?` filter: any non-blank trimmed line is an answer.
///
/// # Examples
///
/// ```
/// use clarify_qa::answers::parse_answer_cell;
///
/// let ans = parse_answer_cell("A1: Staging only\nA2: No mobile impact");
/// assert_eq!(ans, vec!["Staging only", "No mobile impact"]);
/// ```
pub fn parse_answer_cell(cell: &str) -> Vec<String> {
    let mut answers = Vec::new();
    for raw in cell.lines() {
        let line = strip_label(raw.trim(), 'a');
        if !line.is_empty() {
            answers.push(line.to_string());
        }
    }
    answers
}

fn accumulate(map: &mut HashMap<String, Vec<String>>, id: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    map.entry(id.trim().to_string())
        .or_default()
        .push(value.to_string());
}
