use clarify_core::ClarifyError;

/// A header-first tabular file parsed from TSV text.
///
/// Questions and answers arrive as spreadsheet exports, so fields may be
/// double-quoted and quoted fields may contain tabs, newlines, and doubled
/// `""` escapes. Rows shorter than the header are padded with empty cells.
///
/// # Examples
///
/// ```
/// use clarify_qa::table::Table;
///
/// let table = Table::from_tsv("id\tanswer\n1\tStaging only\n").unwrap();
/// assert_eq!(table.columns(), &["id", "answer"]);
/// assert_eq!(table.rows().len(), 1);
/// assert_eq!(table.cell(0, 1), "Staging only");
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse TSV text into a table. The first record is the header.
    ///
    /// Blank records are skipped; short rows are padded to the header width.
    ///
    /// # Errors
    ///
    /// Returns [`ClarifyError::Format`] if the input has no header row, or
    /// [`ClarifyError::Parse`] on malformed quoting.
    ///
    /// # Examples
    ///
    /// ```
    /// use clarify_qa::table::Table;
    ///
    /// // Quoted cell with an embedded newline stays one cell.
    /// let tsv = "id\tanswers\n1\t\"A1: yes\nA2: no\"\n";
    /// let table = Table::from_tsv(tsv).unwrap();
    /// assert_eq!(table.cell(0, 1), "A1: yes\nA2: no");
    /// ```
    pub fn from_tsv(input: &str) -> Result<Self, ClarifyError> {
        let mut records = parse_records(input)?;
        records.retain(|r| r.iter().any(|cell| !cell.is_empty()));

        if records.is_empty() {
            return Err(ClarifyError::Format("empty table: no header row".into()));
        }

        let columns: Vec<String> = records.remove(0).iter().map(|c| c.trim().to_string()).collect();
        let width = columns.len();
        for row in &mut records {
            while row.len() < width {
                row.push(String::new());
            }
        }

        Ok(Self {
            columns,
            rows: records,
        })
    }

    /// Header names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows, header excluded.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Index of the column named `name`, compared case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use clarify_qa::table::Table;
    ///
    /// let table = Table::from_tsv("ID\tAnswers\n1\tx\n").unwrap();
    /// assert_eq!(table.col("id"), Some(0));
    /// assert_eq!(table.col("answers"), Some(1));
    /// assert_eq!(table.col("missing"), None);
    /// ```
    pub fn col(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Cell content at (`row`, `col`); empty string when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

enum FieldState {
    Start,
    Unquoted,
    Quoted,
    QuoteClosed,
}

fn parse_records(input: &str) -> Result<Vec<Vec<String>>, ClarifyError> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = FieldState::Start;
    let mut line = 1usize;

    for c in input.chars() {
        match state {
            FieldState::Start => match c {
                '"' => state = FieldState::Quoted,
                '\t' => record.push(std::mem::take(&mut field)),
                '\n' => flush_record(&mut records, &mut record, &mut field),
                '\r' => {}
                _ => {
                    field.push(c);
                    state = FieldState::Unquoted;
                }
            },
            FieldState::Unquoted => match c {
                '\t' => {
                    record.push(std::mem::take(&mut field));
                    state = FieldState::Start;
                }
                '\n' => {
                    flush_record(&mut records, &mut record, &mut field);
                    state = FieldState::Start;
                }
                '\r' => {}
                _ => field.push(c),
            },
            FieldState::Quoted => match c {
                '"' => state = FieldState::QuoteClosed,
                _ => field.push(c),
            },
            FieldState::QuoteClosed => match c {
                // Doubled quote is an escaped quote inside the field.
                '"' => {
                    field.push('"');
                    state = FieldState::Quoted;
                }
                '\t' => {
                    record.push(std::mem::take(&mut field));
                    state = FieldState::Start;
                }
                '\n' => {
                    flush_record(&mut records, &mut record, &mut field);
                    state = FieldState::Start;
                }
                '\r' => {}
                _ => {
                    return Err(ClarifyError::Parse(format!(
                        "line {line}: unexpected {c:?} after closing quote"
                    )))
                }
            },
        }
        if c == '\n' {
            line += 1;
        }
    }

    match state {
        FieldState::Quoted => {
            return Err(ClarifyError::Parse(
                "unterminated quoted field at end of input".into(),
            ))
        }
        FieldState::Unquoted | FieldState::QuoteClosed => {
            flush_record(&mut records, &mut record, &mut field);
        }
        FieldState::Start => {
            if !record.is_empty() {
                flush_record(&mut records, &mut record, &mut field);
            }
        }
    }

    Ok(records)
}

fn flush_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, field: &mut String) {
    record.push(std::mem::take(field));
    records.push(std::mem::take(record));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_table_parses() {
        let table = Table::from_tsv("id\tanswer\n1\ta\n2\tb\n").unwrap();
        assert_eq!(table.columns(), &["id", "answer"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.cell(0, 0), "1");
        assert_eq!(table.cell(1, 1), "b");
    }

    #[test]
    fn no_trailing_newline_keeps_last_row() {
        let table = Table::from_tsv("id\tanswer\n1\ta").unwrap();
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.cell(0, 1), "a");
    }

    #[test]
    fn crlf_line_endings() {
        let table = Table::from_tsv("id\tanswer\r\n1\ta\r\n").unwrap();
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.cell(0, 1), "a");
    }

    #[test]
    fn quoted_cell_keeps_embedded_newline_and_tab() {
        let tsv = "id\tanswers\n1\t\"A1: yes\nA2: has\ta tab\"\n";
        let table = Table::from_tsv(tsv).unwrap();
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.cell(0, 1), "A1: yes\nA2: has\ta tab");
    }

    #[test]
    fn doubled_quotes_escape() {
        let table = Table::from_tsv("id\tanswer\n1\t\"say \"\"hi\"\"\"\n").unwrap();
        assert_eq!(table.cell(0, 1), "say \"hi\"");
    }

    #[test]
    fn short_rows_padded() {
        let table = Table::from_tsv("id\ttitle\tnotes\n1\tonly title\n").unwrap();
        assert_eq!(table.cell(0, 1), "only title");
        assert_eq!(table.cell(0, 2), "");
    }

    #[test]
    fn blank_lines_skipped() {
        let table = Table::from_tsv("id\tanswer\n\n1\ta\n\n").unwrap();
        assert_eq!(table.rows().len(), 1);
    }

    #[test]
    fn column_lookup_is_case_insensitive() {
        let table = Table::from_tsv("Id\tPR_Title\tClarify_Questions\n").unwrap();
        assert_eq!(table.col("id"), Some(0));
        assert_eq!(table.col("pr_title"), Some(1));
        assert_eq!(table.col("clarify_questions"), Some(2));
    }

    #[test]
    fn empty_input_is_format_error() {
        let err = Table::from_tsv("").unwrap_err();
        assert!(matches!(err, ClarifyError::Format(_)));
    }

    #[test]
    fn unterminated_quote_is_parse_error() {
        let err = Table::from_tsv("id\tanswer\n1\t\"open\n").unwrap_err();
        assert!(matches!(err, ClarifyError::Parse(_)));
    }

    #[test]
    fn garbage_after_closing_quote_is_parse_error() {
        let err = Table::from_tsv("id\tanswer\n1\t\"ok\"x\n").unwrap_err();
        assert!(matches!(err, ClarifyError::Parse(_)));
    }
}
