//! Review prompt templates and builders.
//!
//! The templates are immutable module constants; changing their wording is a
//! content decision, but both keep their substitution slots.

/// Placeholder title used when the questions table has no title for a PR.
pub const UNTITLED: &str = "(untitled)";

const CLARIFIED_PROMPT: &str = "\
You are a senior code reviewer.

PR title:
{pr_title}

PR description:
{pr_text}

Clarifying Q&A:
{qa_block}

Write specific, actionable review comments or code suggestions.
- Be concise (bullets are fine).
- Call out risks, tests to add, and concrete code changes.
";

const BASELINE_PROMPT: &str = "\
You are a senior code reviewer.
Write a concise review for the following PR:
{pr_text}
";

/// Build the clarified-review prompt from title, body, and transcript block.
///
/// An empty title substitutes [`UNTITLED`]; the transcript is embedded
/// verbatim and may be empty.
///
/// # Examples
///
/// ```
/// use clarify_qa::prompt::build_clarified_prompt;
///
/// let prompt = build_clarified_prompt("Fix NPE", "Fix null check", "Q1: Which callers?\nA1: Only service A");
/// assert!(prompt.contains("PR title:\nFix NPE"));
/// assert!(prompt.contains("Q1: Which callers?\nA1: Only service A"));
///
/// let prompt = build_clarified_prompt("", "body", "");
/// assert!(prompt.contains("(untitled)"));
/// ```
pub fn build_clarified_prompt(pr_title: &str, pr_text: &str, qa_block: &str) -> String {
    let title = if pr_title.is_empty() {
        UNTITLED
    } else {
        pr_title
    };
    CLARIFIED_PROMPT
        .replace("{pr_title}", title)
        .replace("{pr_text}", pr_text)
        .replace("{qa_block}", qa_block)
}

/// Build the baseline-review prompt from the PR text alone.
///
/// # Examples
///
/// ```
/// use clarify_qa::prompt::build_baseline_prompt;
///
/// let prompt = build_baseline_prompt("Fix null check");
/// assert!(prompt.contains("Fix null check"));
/// assert!(prompt.contains("concise review"));
/// ```
pub fn build_baseline_prompt(pr_text: &str) -> String {
    BASELINE_PROMPT.replace("{pr_text}", pr_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clarified_prompt_fills_all_slots() {
        let prompt = build_clarified_prompt("Title", "Body text", "Q1: q?\nA1: a");
        assert!(prompt.contains("PR title:\nTitle"));
        assert!(prompt.contains("PR description:\nBody text"));
        assert!(prompt.contains("Clarifying Q&A:\nQ1: q?\nA1: a"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn empty_title_becomes_untitled() {
        let prompt = build_clarified_prompt("", "body", "");
        assert!(prompt.contains("PR title:\n(untitled)"));
    }

    #[test]
    fn empty_transcript_leaves_section_empty() {
        let prompt = build_clarified_prompt("t", "b", "");
        assert!(prompt.contains("Clarifying Q&A:\n\n"));
    }

    #[test]
    fn baseline_prompt_has_no_qa_section() {
        let prompt = build_baseline_prompt("the PR text");
        assert!(prompt.contains("the PR text"));
        assert!(!prompt.contains("Clarifying"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn builders_are_deterministic() {
        let a = build_clarified_prompt("t", "b", "q");
        let b = build_clarified_prompt("t", "b", "q");
        assert_eq!(a, b);
    }
}
