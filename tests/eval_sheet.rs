use std::process::Command;

fn run_eval_sheet(dir: &std::path::Path, questions: &str, answers: &str) -> std::process::Output {
    std::fs::write(dir.join("questions.tsv"), questions).unwrap();
    std::fs::write(dir.join("answers.tsv"), answers).unwrap();

    Command::new(env!("CARGO_BIN_EXE_clarify"))
        .args([
            "eval-sheet",
            "--questions",
            "questions.tsv",
            "--answers",
            "answers.tsv",
            "--output",
            "eval.tsv",
        ])
        .current_dir(dir)
        .output()
        .unwrap()
}

#[test]
fn eval_sheet_joins_questions_and_answers() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_eval_sheet(
        dir.path(),
        "id\tpr_title\tclarify_questions\n7\tFix NPE\t\"Q1: Which callers?\nQ2: Any tests?\"\n",
        "id\tanswer\n7\tOnly service A\n7\tNot yet\n",
    );
    assert!(
        output.status.success(),
        "eval-sheet failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let sheet = std::fs::read_to_string(dir.path().join("eval.tsv")).unwrap();
    let lines: Vec<&str> = sheet.lines().collect();
    assert_eq!(
        lines[0],
        "id\tclarify_questions\tanswer\tclarified_suggestion\tbaseline_suggestion"
    );
    assert!(lines[1].contains("Q1: Which callers? | Q2: Any tests?"));
    assert!(lines[1].contains("Only service A Not yet"));
}

#[test]
fn unrecognized_answers_shape_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_eval_sheet(
        dir.path(),
        "id\tpr_title\tclarify_questions\n1\tT\tWhy?\n",
        "foo\tbar\tbaz\n1\tx\ty\n",
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized answers layout"), "{stderr}");
}
