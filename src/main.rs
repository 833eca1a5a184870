use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use miette::{Context, IntoDiagnostic, Result};

use clarify_run::driver;
use clarify_run::input;
use clarify_run::llm::{api_key_env_var, LlmClient};

#[derive(Parser)]
#[command(
    name = "clarify",
    version,
    about = "Evaluate whether clarifying questions improve AI code reviews",
    long_about = "Clarify pairs PR descriptions with clarifying question/answer \
                   transcripts and generates two reviews per PR — a baseline from \
                   the PR text alone and a clarified one from PR text plus Q&A — \
                   for downstream scoring.\n\n\
                   Examples:\n  \
                     clarify baseline --input prs.jsonl --output baseline.jsonl\n  \
                     clarify clarified --input prs.jsonl --questions q.tsv --answers a.tsv --output clarified.jsonl\n  \
                     clarify eval-sheet --questions q.tsv --answers a.tsv --output eval.tsv\n  \
                     clarify doctor                  Check setup and environment"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .clarify.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Generate baseline reviews from PR text alone
    #[command(long_about = "Generate baseline reviews from PR text alone.\n\n\
        Reads a JSONL stream of PRs ({id, pr_text|prompt}) and writes one JSON\n\
        line per PR with the generated review. No clarifying Q&A is used.\n\n\
        Examples:\n  clarify baseline --input prs.jsonl --output baseline.jsonl\n  \
        clarify baseline --input prs.jsonl --output out.jsonl --limit 20")]
    Baseline {
        /// PR JSONL with {id, pr_text|prompt}
        #[arg(long)]
        input: PathBuf,
        /// Output JSONL for baseline reviews
        #[arg(long)]
        output: PathBuf,
        /// Process only the first N input records
        #[arg(long)]
        limit: Option<usize>,
        /// Model identifier (overrides config)
        #[arg(long)]
        model: Option<String>,
    },
    /// Generate clarified reviews from PR text plus Q&A transcripts
    #[command(long_about = "Generate clarified reviews from PR text plus Q&A transcripts.\n\n\
        Joins the PR stream with a questions table (id, pr_title,\n\
        clarify_questions) and an answers table (wide: id + answers with\n\
        newline-separated A1/A2 lines; tall: id + answer per row; or a\n\
        headerless 0/1 id/answer export), aligns questions with answers by\n\
        position, and embeds the Qn/An transcript in the review prompt.\n\n\
        Examples:\n  clarify clarified --input prs.jsonl --questions q.tsv --answers a.tsv --output clarified.jsonl")]
    Clarified {
        /// PR JSONL with {id, pr_text|prompt}
        #[arg(long)]
        input: PathBuf,
        /// Questions TSV with columns: id, pr_title, clarify_questions
        #[arg(long)]
        questions: PathBuf,
        /// Answers TSV (wide, tall, or two-column positional)
        #[arg(long)]
        answers: PathBuf,
        /// Output JSONL for clarified reviews
        #[arg(long)]
        output: PathBuf,
        /// Process only the first N input records
        #[arg(long)]
        limit: Option<usize>,
        /// Model identifier (overrides config)
        #[arg(long)]
        model: Option<String>,
    },
    /// Scaffold the human-scoring TSV from questions and answers
    #[command(long_about = "Scaffold the human-scoring TSV from questions and answers.\n\n\
        Writes one row per PR id found in either table, with questions joined\n\
        onto one line, answers flattened, and empty clarified_suggestion /\n\
        baseline_suggestion columns for the scorer to fill in.\n\n\
        Example:\n  clarify eval-sheet --questions q.tsv --answers a.tsv --output eval.tsv")]
    EvalSheet {
        /// Questions TSV with columns: id, clarify_questions
        #[arg(long)]
        questions: PathBuf,
        /// Answers TSV (any accepted shape)
        #[arg(long)]
        answers: PathBuf,
        /// Output TSV path
        #[arg(long)]
        output: PathBuf,
    },
    /// Create a default .clarify.toml configuration file
    #[command(long_about = "Create a default .clarify.toml configuration file.\n\n\
        Generates a commented template with all available options.\n\
        Fails if .clarify.toml already exists.")]
    Init,
    /// Check your Clarify setup and environment
    #[command(long_about = "Check your Clarify setup and environment.\n\n\
        Runs diagnostics for the config file and LLM provider credentials.")]
    Doctor,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

const CONFIG_TEMPLATE: &str = "\
# Clarify configuration
#
# [llm]
# provider = \"openai\"          # openai | ollama | gemini | anthropic
# model = \"gpt-4o-mini\"
# base_url = \"http://localhost:11434\"   # any /v1/chat/completions endpoint
# api_key = \"...\"              # or set the provider's env var

[llm]
model = \"gpt-4o-mini\"

# [run]
# limit = 50                   # process only the first N PRs
# progress = true

[run]
progress = true
";

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!("clarify v{version} — does asking first make AI reviews better?\n");

    println!("Quick start:");
    println!("  clarify init                      Create a .clarify.toml config file");
    println!("  clarify baseline --input prs.jsonl --output baseline.jsonl");
    println!("  clarify clarified --input prs.jsonl --questions q.tsv --answers a.tsv --output clarified.jsonl\n");

    println!("All commands:");
    println!("  baseline    Review from PR text alone");
    println!("  clarified   Review from PR text plus Q&A transcript");
    println!("  eval-sheet  Scaffold the human-scoring TSV");
    println!("  doctor      Check your setup and environment");
    println!("  init        Create default configuration\n");

    println!("Run 'clarify <command> --help' for details.");
}

struct CheckResult {
    name: &'static str,
    status: &'static str,
    detail: String,
    hint: Option<String>,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "pass",
            detail: detail.into(),
            hint: None,
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: "fail",
            detail: detail.into(),
            hint: Some(hint.into()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self.status {
            "pass" => "\u{2713}",
            "fail" => "\u{2717}",
            _ => "~",
        }
    }
}

fn run_doctor(config: &clarify_core::ClarifyConfig) -> Result<()> {
    let mut checks: Vec<CheckResult> = Vec::new();

    let config_path = std::path::Path::new(".clarify.toml");
    if config_path.exists() {
        checks.push(CheckResult::pass("config_file", ".clarify.toml found"));
    } else {
        checks.push(CheckResult::fail(
            "config_file",
            ".clarify.toml not found",
            "run 'clarify init' to create a default config",
        ));
    }

    checks.push(CheckResult::pass(
        "llm_provider",
        format!("{} (model: {})", config.llm.provider, config.llm.model),
    ));

    let env_var = api_key_env_var(&config.llm.provider);
    if config.llm.api_key.is_some() || std::env::var(env_var).is_ok() {
        checks.push(CheckResult::pass("llm_api_key", format!("{env_var} set")));
    } else {
        checks.push(CheckResult::fail(
            "llm_api_key",
            format!("{env_var} not set"),
            format!("export {env_var}=... or set api_key in .clarify.toml"),
        ));
    }

    let mut failed = 0;
    for check in &checks {
        println!("{} {}: {}", check.symbol(), check.name, check.detail);
        if let Some(hint) = &check.hint {
            println!("    hint: {hint}");
        }
        if check.status == "fail" {
            failed += 1;
        }
    }
    if failed > 0 {
        println!("\n{failed} check(s) failed.");
        std::process::exit(1);
    }
    println!("\nAll checks passed.");
    Ok(())
}

fn cmd_init() -> Result<()> {
    let path = std::path::Path::new(".clarify.toml");
    if path.exists() {
        miette::bail!(".clarify.toml already exists; refusing to overwrite");
    }
    std::fs::write(path, CONFIG_TEMPLATE)
        .into_diagnostic()
        .wrap_err("writing .clarify.toml")?;
    println!("Created .clarify.toml");
    Ok(())
}

fn build_client(
    config: &clarify_core::ClarifyConfig,
    model_flag: Option<String>,
) -> Result<(LlmClient, String)> {
    let mut llm = config.llm.clone();
    if let Some(model) = model_flag {
        llm.model = model;
    }
    if llm.api_key.is_none() {
        llm.api_key = std::env::var(api_key_env_var(&llm.provider)).ok();
    }
    if llm.api_key.is_none() && llm.base_url.is_none() {
        let env_var = api_key_env_var(&llm.provider);
        miette::bail!(miette::miette!(
            help = format!("Set {env_var} or add api_key in your .clarify.toml under [llm]"),
            "No API key configured for LLM provider '{}'",
            llm.provider
        ));
    }
    let model = llm.model.clone();
    let client = LlmClient::new(&llm).into_diagnostic()?;
    Ok((client, model))
}

fn create_output(path: &PathBuf) -> Result<std::io::BufWriter<std::fs::File>> {
    let file = std::fs::File::create(path)
        .into_diagnostic()
        .wrap_err(format!("creating {}", path.display()))?;
    Ok(std::io::BufWriter::new(file))
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => clarify_core::ClarifyConfig::from_file(path).into_diagnostic()?,
        None => {
            let default_path = std::path::Path::new(".clarify.toml");
            if default_path.exists() {
                clarify_core::ClarifyConfig::from_file(default_path).into_diagnostic()?
            } else {
                clarify_core::ClarifyConfig::default()
            }
        }
    };

    let show_progress = config.run.progress && std::io::stderr().is_terminal();

    match cli.command {
        None => {
            print_welcome();
            return Ok(());
        }
        Some(Command::Baseline {
            ref input,
            ref output,
            limit,
            ref model,
        }) => {
            let (client, model) = build_client(&config, model.clone())?;
            let limit = limit.or(config.run.limit);
            let batch = input::load_prs(input, limit).into_diagnostic()?;
            if cli.verbose && batch.malformed > 0 {
                eprintln!("skipped {} malformed input line(s)", batch.malformed);
            }

            let mut out = create_output(output)?;
            let stats =
                driver::run_baseline(&client, &model, &batch.records, &mut out, show_progress)
                    .await
                    .into_diagnostic()?;
            out.flush().into_diagnostic()?;
            println!("[baseline] {stats} -> {}", output.display());
        }
        Some(Command::Clarified {
            ref input,
            ref questions,
            ref answers,
            ref output,
            limit,
            ref model,
        }) => {
            let (client, model) = build_client(&config, model.clone())?;
            let limit = limit.or(config.run.limit);
            let batch = input::load_prs(input, limit).into_diagnostic()?;
            let question_table = input::load_questions(questions).into_diagnostic()?;
            let answer_map = input::load_answers(answers).into_diagnostic()?;
            if cli.verbose {
                if batch.malformed > 0 {
                    eprintln!("skipped {} malformed input line(s)", batch.malformed);
                }
                if question_table.discarded_lines > 0 {
                    eprintln!(
                        "discarded {} non-question line(s) from the questions table",
                        question_table.discarded_lines
                    );
                }
            }

            let mut out = create_output(output)?;
            let stats = driver::run_clarified(
                &client,
                &model,
                &batch.records,
                &question_table.entries,
                &answer_map,
                &mut out,
                show_progress,
            )
            .await
            .into_diagnostic()?;
            out.flush().into_diagnostic()?;
            println!("[clarified] {stats} -> {}", output.display());
        }
        Some(Command::EvalSheet {
            ref questions,
            ref answers,
            ref output,
        }) => {
            let question_table = input::load_table(questions).into_diagnostic()?;
            let answer_map = input::load_answers(answers).into_diagnostic()?;
            let mut out = create_output(output)?;
            let rows = clarify_run::eval::write_eval_sheet(&question_table, &answer_map, &mut out)
                .into_diagnostic()?;
            out.flush().into_diagnostic()?;
            println!("[eval-sheet] wrote {rows} rows -> {}", output.display());
        }
        Some(Command::Init) => cmd_init()?,
        Some(Command::Doctor) => run_doctor(&config)?,
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }

    Ok(())
}
