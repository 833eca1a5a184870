/// Parse a free-text questions cell into plain question strings.
///
/// Accepts text like:
///
/// ```text
/// Q1: Which envs does this touch?
/// Q2: Does this affect mobile?
/// ```
///
/// Each non-blank line may carry a `Q<n>:` label, which is stripped. A line
/// survives only if, after trimming, it ends with `?` and is longer than 3
/// characters; everything else is silently filtered. Order is preserved.
///
/// # Examples
///
/// ```
/// use clarify_qa::questions::parse_questions;
///
/// let qs = parse_questions("Q1: Why?\nQ2: Is this ok?");
/// assert_eq!(qs, vec!["Why?", "Is this ok?"]);
///
/// let qs = parse_questions("not a question\nReal one?");
/// assert_eq!(qs, vec!["Real one?"]);
/// ```
pub fn parse_questions(cell: &str) -> Vec<String> {
    parse_questions_counted(cell).0
}

/// Like [`parse_questions`], but also reports how many non-blank lines were
/// discarded by the filter, so callers can surface the drop count.
///
/// # Examples
///
/// ```
/// use clarify_qa::questions::parse_questions_counted;
///
/// let (qs, discarded) = parse_questions_counted("ok\nWhy?\n\nstray note");
/// assert_eq!(qs, vec!["Why?"]);
/// assert_eq!(discarded, 2);
/// ```
pub fn parse_questions_counted(cell: &str) -> (Vec<String>, usize) {
    let mut questions = Vec::new();
    let mut discarded = 0;

    for raw in cell.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let line = strip_label(trimmed, 'q');
        if is_question(line) {
            questions.push(line.to_string());
        } else {
            discarded += 1;
        }
    }

    (questions, discarded)
}

/// Strip a leading `<letter><n>:` label: the line must start with `letter`
/// (case-insensitive) and contain a `:` within its first 5 characters.
/// Everything through the colon is dropped and the rest trimmed.
pub(crate) fn strip_label(line: &str, letter: char) -> &str {
    let starts = line
        .chars()
        .next()
        .is_some_and(|c| c.to_ascii_lowercase() == letter);
    if !starts {
        return line;
    }
    let head_end = line
        .char_indices()
        .nth(5)
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    match line[..head_end].find(':') {
        Some(pos) => line[pos + 1..].trim(),
        None => line,
    }
}

fn is_question(line: &str) -> bool {
    line.ends_with('?') && line.chars().count() > 3
}
