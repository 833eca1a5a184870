//! Positional alignment of questions with answers.
//!
//! Alignment is driven by the questions: question `i` pairs with answer `i`,
//! answers past the question count are never emitted, and questions without
//! an answer get an explicit marker rather than being omitted.

/// Marker emitted for a question with no corresponding answer.
pub const NO_ANSWER_MARKER: &str = "[no answer provided]";

/// Build the `Qn`/`An` transcript block for one PR.
///
/// Emits one pair per question, 1-based labels, pairs separated by a blank
/// line. Empty `questions` yields an empty string.
///
/// # Examples
///
/// ```
/// use clarify_qa::transcript::build_transcript;
///
/// let block = build_transcript(
///     &["Which callers?".into()],
///     &["Only service A".into()],
/// );
/// assert_eq!(block, "Q1: Which callers?\nA1: Only service A");
///
/// // Missing answer gets the marker; surplus answers are never emitted.
/// assert_eq!(
///     build_transcript(&["Q?".into()], &[]),
///     "Q1: Q?\nA1: [no answer provided]"
/// );
/// assert_eq!(build_transcript(&[], &["unused".into()]), "");
/// ```
pub fn build_transcript(questions: &[String], answers: &[String]) -> String {
    let mut pairs = Vec::with_capacity(questions.len());
    for (i, q) in questions.iter().enumerate() {
        let a = answers
            .get(i)
            .map(String::as_str)
            .unwrap_or(NO_ANSWER_MARKER);
        pairs.push(format!("Q{n}: {q}\nA{n}: {a}", n = i + 1));
    }
    pairs.join("\n\n")
}

/// Render questions with their `Q<n>:` labels, as persisted in output records.
///
/// # Examples
///
/// ```
/// use clarify_qa::transcript::number_questions;
///
/// let qs = number_questions(&["Which callers?".into()]);
/// assert_eq!(qs, vec!["Q1: Which callers?"]);
/// ```
pub fn number_questions(questions: &[String]) -> Vec<String> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("Q{}: {q}", i + 1))
        .collect()
}

/// Render answers with their `A<n>:` labels, as persisted in output records.
pub fn number_answers(answers: &[String]) -> Vec<String> {
    answers
        .iter()
        .enumerate()
        .map(|(i, a)| format!("A{}: {a}", i + 1))
        .collect()
}
