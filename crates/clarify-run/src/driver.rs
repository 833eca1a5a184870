use std::collections::HashMap;
use std::fmt;
use std::io::Write;

use clarify_core::{BaselineRecord, ClarifiedRecord, ClarifyError, PrRecord, QuestionEntry};
use clarify_qa::prompt;
use clarify_qa::transcript::{build_transcript, number_answers, number_questions};
use indicatif::{ProgressBar, ProgressStyle};

use crate::llm::Generate;

/// Statistics from one driver run. Every skipped record is counted here so
/// no drop is silent.
///
/// # Examples
///
/// ```
/// use clarify_run::driver::RunStats;
///
/// let stats = RunStats {
///     written: 10,
///     skipped: 2,
///     surplus_answers: 1,
///     model: "stub".into(),
/// };
/// assert!(stats.to_string().contains("wrote 10 records"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Records written to the output stream.
    pub written: usize,
    /// Records skipped for an empty id or body.
    pub skipped: usize,
    /// Answers beyond the question count, never emitted in transcripts.
    pub surplus_answers: usize,
    /// Model identifier used for generation.
    pub model: String,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wrote {} records (skipped {}) | model: {}",
            self.written, self.skipped, self.model
        )?;
        if self.surplus_answers > 0 {
            write!(f, " | surplus answers dropped: {}", self.surplus_answers)?;
        }
        Ok(())
    }
}

/// Generate one clarified review per eligible PR and write JSONL records.
///
/// Sequential and single-threaded: each record is aligned, prompted,
/// generated, and written before the next begins. A PR with an empty id or
/// body is skipped and counted. Absent question or answer lookups resolve to
/// empty lists. Exactly one generation call per eligible PR, no retries;
/// the first generation failure aborts the batch, leaving earlier records
/// already written. Output order matches input order.
///
/// # Errors
///
/// Returns [`ClarifyError::Llm`] if a generation call fails, or
/// [`ClarifyError::Io`] / [`ClarifyError::Serialization`] on write failure.
pub async fn run_clarified<G: Generate>(
    generator: &G,
    model: &str,
    prs: &[PrRecord],
    questions: &HashMap<String, QuestionEntry>,
    answers: &HashMap<String, Vec<String>>,
    out: &mut impl Write,
    show_progress: bool,
) -> Result<RunStats, ClarifyError> {
    let mut stats = RunStats {
        written: 0,
        skipped: 0,
        surplus_answers: 0,
        model: model.to_string(),
    };
    let pb = progress_bar(show_progress, prs.len());

    for pr in prs {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
        if !pr.is_eligible() {
            stats.skipped += 1;
            continue;
        }

        let entry = questions.get(&pr.id).cloned().unwrap_or_default();
        let pr_answers = answers.get(&pr.id).cloned().unwrap_or_default();
        stats.surplus_answers += pr_answers.len().saturating_sub(entry.questions.len());

        if let Some(pb) = &pb {
            pb.set_message(format!("pr {}", pr.id));
        }

        let qa_block = build_transcript(&entry.questions, &pr_answers);
        let prompt = prompt::build_clarified_prompt(&entry.pr_title, &pr.body, &qa_block);
        let review = generator.generate(&prompt).await?;

        let record = ClarifiedRecord {
            id: pr.id.clone(),
            pr_title: entry.pr_title,
            pr_text: pr.body.clone(),
            questions: number_questions(&entry.questions),
            answers: number_answers(&pr_answers),
            clarified_review: review,
        };
        write_record(out, &record)?;
        stats.written += 1;
    }

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    Ok(stats)
}

/// Generate one baseline review per PR with a non-empty body.
///
/// Same loop discipline as [`run_clarified`], minus the Q&A lookup: the
/// prompt carries the PR text alone.
///
/// # Errors
///
/// As for [`run_clarified`].
pub async fn run_baseline<G: Generate>(
    generator: &G,
    model: &str,
    prs: &[PrRecord],
    out: &mut impl Write,
    show_progress: bool,
) -> Result<RunStats, ClarifyError> {
    let mut stats = RunStats {
        written: 0,
        skipped: 0,
        surplus_answers: 0,
        model: model.to_string(),
    };
    let pb = progress_bar(show_progress, prs.len());

    for pr in prs {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
        if !pr.is_eligible() {
            stats.skipped += 1;
            continue;
        }
        if let Some(pb) = &pb {
            pb.set_message(format!("pr {}", pr.id));
        }

        let prompt = prompt::build_baseline_prompt(&pr.body);
        let review = generator.generate(&prompt).await?;

        let record = BaselineRecord {
            id: pr.id.clone(),
            prompt: pr.body.clone(),
            baseline_review: review,
        };
        write_record(out, &record)?;
        stats.written += 1;
    }

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    Ok(stats)
}

fn write_record<T: serde::Serialize>(out: &mut impl Write, record: &T) -> Result<(), ClarifyError> {
    let line = serde_json::to_string(record)?;
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    Ok(())
}

fn progress_bar(show: bool, len: usize) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}") {
        pb.set_style(style);
    }
    Some(pb)
}
