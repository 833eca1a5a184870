//! End-to-end driver tests with a deterministic stub generator.

use std::collections::HashMap;

use clarify_core::{ClarifiedRecord, ClarifyError};
use clarify_qa::table::Table;
use clarify_run::driver::run_clarified;
use clarify_run::input::{parse_pr_stream, questions_from_table};
use clarify_run::llm::Generate;

/// Echoes the prompt back so tests can assert on what was sent.
struct EchoGen;

impl Generate for EchoGen {
    async fn generate(&self, prompt: &str) -> Result<String, ClarifyError> {
        Ok(format!("ECHO:{prompt}"))
    }
}

fn fixture() -> (
    Vec<clarify_core::PrRecord>,
    HashMap<String, clarify_core::QuestionEntry>,
    HashMap<String, Vec<String>>,
) {
    let batch = parse_pr_stream("{\"id\":\"7\",\"prompt\":\"Fix null check\"}\n", None);

    let questions_tsv = "id\tpr_title\tclarify_questions\n7\tFix NPE\tQ1: Which callers?\n";
    let questions = questions_from_table(&Table::from_tsv(questions_tsv).unwrap()).unwrap();

    let answers_tsv = "id\tanswer\n7\tOnly service A\n";
    let answers = clarify_qa::answers::parse_answers(&Table::from_tsv(answers_tsv).unwrap()).unwrap();

    (batch.records, questions.entries, answers)
}

#[tokio::test]
async fn end_to_end_record_and_prompt_contents() {
    let (prs, questions, answers) = fixture();
    let mut out = Vec::new();

    let stats = run_clarified(&EchoGen, "echo", &prs, &questions, &answers, &mut out, false)
        .await
        .unwrap();
    assert_eq!(stats.written, 1);
    assert_eq!(stats.skipped, 0);

    let line = String::from_utf8(out).unwrap();
    let record: ClarifiedRecord = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(record.id, "7");
    assert_eq!(record.pr_title, "Fix NPE");
    assert_eq!(record.pr_text, "Fix null check");
    assert_eq!(record.questions, vec!["Q1: Which callers?"]);
    assert_eq!(record.answers, vec!["A1: Only service A"]);

    // The generated prompt embedded the aligned transcript.
    assert!(record
        .clarified_review
        .contains("Q1: Which callers?\nA1: Only service A"));
    assert!(record.clarified_review.contains("PR title:\nFix NPE"));
}

#[tokio::test]
async fn rerun_on_unchanged_inputs_is_byte_identical() {
    let (prs, questions, answers) = fixture();

    let mut first = Vec::new();
    run_clarified(&EchoGen, "echo", &prs, &questions, &answers, &mut first, false)
        .await
        .unwrap();

    let mut second = Vec::new();
    run_clarified(&EchoGen, "echo", &prs, &questions, &answers, &mut second, false)
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn pr_absent_from_tables_gets_untitled_empty_transcript() {
    let prs = parse_pr_stream("{\"id\":\"99\",\"prompt\":\"Orphan PR\"}\n", None).records;
    let mut out = Vec::new();

    run_clarified(
        &EchoGen,
        "echo",
        &prs,
        &HashMap::new(),
        &HashMap::new(),
        &mut out,
        false,
    )
    .await
    .unwrap();

    let record: ClarifiedRecord =
        serde_json::from_str(String::from_utf8(out).unwrap().trim()).unwrap();
    assert_eq!(record.pr_title, "");
    assert!(record.questions.is_empty());
    assert!(record.answers.is_empty());
    assert!(record.clarified_review.contains("(untitled)"));
    assert!(record.clarified_review.contains("Clarifying Q&A:\n\n"));
}

#[tokio::test]
async fn output_order_matches_input_order() {
    let stream = "{\"id\":\"2\",\"prompt\":\"second\"}\n{\"id\":\"1\",\"prompt\":\"first\"}\n";
    let prs = parse_pr_stream(stream, None).records;
    let mut out = Vec::new();

    run_clarified(
        &EchoGen,
        "echo",
        &prs,
        &HashMap::new(),
        &HashMap::new(),
        &mut out,
        false,
    )
    .await
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    let ids: Vec<String> = text
        .lines()
        .map(|l| {
            serde_json::from_str::<ClarifiedRecord>(l)
                .unwrap()
                .id
        })
        .collect();
    assert_eq!(ids, vec!["2", "1"]);
}
