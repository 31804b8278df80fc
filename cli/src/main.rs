use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use coach_analysis_core::{AnalysisField, FieldValue, Roster, classify_status};
use coach_analysis_normalizer::output::{
    OutputFormat, format_analysis, format_approved, format_roster, format_run,
};
use coach_analysis_normalizer::{ConfidencePolicy, NormalizeOptions, normalize_with_report};
use coach_analysis_session::{AnalysisClient, AnalysisSession, CoachConfig};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Parser)]
#[command(name = "coach-analysis")]
#[command(version, about = "Normalize, review and request client performance analyses")]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. debug, coach_analysis_session=trace).
    #[arg(long, global = true, default_value = "warn")]
    log: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize one raw analysis response from a file or stdin.
    Normalize(NormalizeArgs),
    /// Print the severity of a status label.
    Classify(ClassifyArgs),
    /// Load a response, apply field edits, then approve or discard them.
    Review(ReviewArgs),
    /// Request a fresh analysis for a client from the webhook.
    Analyze(AnalyzeArgs),
    /// Show a client roster with overview statistics.
    Roster(RosterArgs),
    /// Normalize every response file in a directory in parallel.
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
struct NormalizeArgs {
    /// File containing the raw response (reads stdin when omitted).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output both the analysis and the normalization report.
    #[arg(long)]
    with_report: bool,
    /// Clamp confidence scores into 0..=100.
    #[arg(long)]
    clamp_confidence: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct ClassifyArgs {
    /// Status label, e.g. "Needs Attention".
    status: String,
}

#[derive(Debug, Args)]
struct ReviewArgs {
    /// File containing the raw response (reads stdin when omitted).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Client the approved analysis belongs to.
    #[arg(long)]
    client_id: Option<String>,
    /// Field edit as FIELD=VALUE (repeatable), e.g. --set reasoning="Solid week".
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    edits: Vec<String>,
    /// Discard the edits instead of approving them.
    #[arg(long)]
    discard: bool,
    /// Clamp confidence scores into 0..=100 when loading.
    #[arg(long)]
    clamp_confidence: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Client to analyze.
    #[arg(long)]
    client_id: String,
    /// Path to a coach config YAML file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Webhook URL, overriding the config file.
    #[arg(long)]
    webhook_url: Option<String>,
    /// Request timeout in seconds, overriding the config file.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct RosterArgs {
    /// Roster file (JSON or YAML). Uses the demo roster when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// Directory of raw response files.
    #[arg(long)]
    input: PathBuf,
    /// Directory for normalized output files.
    #[arg(long)]
    output: PathBuf,
    /// Include the normalization report in every output file.
    #[arg(long)]
    with_report: bool,
    /// Clamp confidence scores into 0..=100.
    #[arg(long)]
    clamp_confidence: bool,
    /// Number of parallel jobs (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    let result = match cli.command {
        Command::Normalize(args) => run_normalize(args),
        Command::Classify(args) => run_classify(args),
        Command::Review(args) => run_review(args),
        Command::Analyze(args) => run_analyze(args),
        Command::Roster(args) => run_roster(args),
        Command::Batch(args) => run_batch(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn normalize_options(clamp_confidence: bool) -> NormalizeOptions {
    NormalizeOptions {
        confidence_policy: if clamp_confidence {
            ConfidencePolicy::Clamp
        } else {
            ConfidencePolicy::Passthrough
        },
    }
}

fn read_input(input: Option<&Path>) -> Result<String, String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            Ok(raw)
        }
    }
}

fn print_output(output: &str) {
    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }
}

fn run_normalize(args: NormalizeArgs) -> Result<(), String> {
    let raw = read_input(args.input.as_deref())?;
    let options = normalize_options(args.clamp_confidence);

    let run = normalize_with_report(Some(&raw), &options)
        .ok_or_else(|| "Input is empty; there is no analysis to normalize".to_string())?;
    for warning in &run.report.warnings {
        warn!(%warning, "normalized analysis failed validation");
    }

    let output = if args.with_report {
        format_run(&run, args.format)?
    } else {
        format_analysis(&run.analysis, args.format)?
    };
    print_output(&output);
    Ok(())
}

fn run_classify(args: ClassifyArgs) -> Result<(), String> {
    println!("{}", classify_status(&args.status));
    Ok(())
}

fn parse_edit(edit: &str) -> Result<(AnalysisField, FieldValue), String> {
    let (field, value) = edit
        .split_once('=')
        .ok_or_else(|| format!("Invalid edit '{edit}': expected FIELD=VALUE"))?;
    let field = field
        .parse::<AnalysisField>()
        .map_err(|err| format!("Invalid edit '{edit}': {err}"))?;
    Ok((field, FieldValue::from(value)))
}

fn run_review(args: ReviewArgs) -> Result<(), String> {
    let edits = args
        .edits
        .iter()
        .map(|edit| parse_edit(edit))
        .collect::<Result<Vec<_>, _>>()?;
    let raw = read_input(args.input.as_deref())?;

    let mut session = match args.client_id {
        Some(id) => AnalysisSession::for_client(id),
        None => AnalysisSession::new(),
    }
    .with_options(normalize_options(args.clamp_confidence));
    session.load(Some(raw));
    if session.display().is_none() {
        return Err("Input is empty; there is no analysis to review".to_string());
    }

    session.begin_edit();
    for (field, value) in edits {
        debug!(field = %field, "applying edit");
        session.update_field(field, value);
    }

    if args.discard {
        session.close();
        let analysis = session
            .display()
            .ok_or_else(|| "No analysis left after discarding edits".to_string())?;
        print_output(&format_analysis(analysis, args.format)?);
        return Ok(());
    }

    let approved = session
        .approve()
        .ok_or_else(|| "Nothing to approve".to_string())?;
    print_output(&format_approved(&approved, args.format)?);
    Ok(())
}

fn load_config(args: &AnalyzeArgs) -> Result<CoachConfig, String> {
    let mut config = match &args.config {
        Some(path) => CoachConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => CoachConfig::default(),
    };
    if let Some(url) = &args.webhook_url {
        config.webhook.url = url.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.webhook.timeout_secs = timeout_secs;
    }
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), String> {
    let config = load_config(&args)?;
    let client = AnalysisClient::new(&config.webhook).map_err(|err| err.to_string())?;
    let mut session =
        AnalysisSession::for_client(args.client_id.clone()).with_options(config.normalize);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to start async runtime: {err}"))?;

    info!(client = %args.client_id, url = %client.webhook_url(), "requesting analysis");
    runtime
        .block_on(client.refresh(&mut session, &args.client_id))
        .map_err(|err| format!("Failed to analyze client '{}': {err}", args.client_id))?;

    let analysis = session
        .display()
        .ok_or_else(|| "Analysis service returned an empty response".to_string())?;
    print_output(&format_analysis(analysis, args.format)?);
    Ok(())
}

fn run_roster(args: RosterArgs) -> Result<(), String> {
    let roster = match &args.input {
        Some(path) => Roster::load(path)
            .map_err(|err| format!("Failed to load roster '{}': {err}", path.display()))?,
        None => Roster::demo(),
    };
    print_output(&format_roster(&roster, args.format)?);
    Ok(())
}

fn format_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Json => "json",
        OutputFormat::Yaml => "yaml",
        OutputFormat::Markdown => "md",
        OutputFormat::Table => "txt",
    }
}

enum BatchOutcome {
    Written,
    Empty,
    Failed(String),
}

fn normalize_file(
    path: &Path,
    output_dir: &Path,
    options: &NormalizeOptions,
    with_report: bool,
    format: OutputFormat,
) -> BatchOutcome {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => return BatchOutcome::Failed(format!("{}: {err}", path.display())),
    };
    let Some(run) = normalize_with_report(Some(&raw), options) else {
        return BatchOutcome::Empty;
    };

    let formatted = if with_report {
        format_run(&run, format)
    } else {
        format_analysis(&run.analysis, format)
    };
    let formatted = match formatted {
        Ok(formatted) => formatted,
        Err(err) => return BatchOutcome::Failed(format!("{}: {err}", path.display())),
    };

    // Keep the input extension so `a.json` and `a.txt` never share a target.
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("analysis");
    let target = output_dir.join(format!("{name}.{}", format_extension(format)));
    match fs::write(&target, formatted) {
        Ok(()) => {
            debug!(input = %path.display(), strategy = %run.report.strategy, "normalized file");
            BatchOutcome::Written
        }
        Err(err) => BatchOutcome::Failed(format!("{}: {err}", target.display())),
    }
}

fn run_batch(args: BatchArgs) -> Result<(), String> {
    let mut inputs = fs::read_dir(&args.input)
        .map_err(|err| format!("Failed to read directory '{}': {err}", args.input.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file())
        .collect::<Vec<_>>();
    inputs.sort();

    fs::create_dir_all(&args.output).map_err(|err| {
        format!(
            "Failed to create output directory '{}': {err}",
            args.output.display()
        )
    })?;

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = args.jobs {
        pool = pool.num_threads(jobs);
    }
    let pool = pool
        .build()
        .map_err(|e| format!("Failed to create thread pool: {e}"))?;

    let options = normalize_options(args.clamp_confidence);
    let outcomes: Vec<BatchOutcome> = pool.install(|| {
        inputs
            .par_iter()
            .map(|path| {
                normalize_file(path, &args.output, &options, args.with_report, args.format)
            })
            .collect()
    });

    let mut written = 0usize;
    let mut empty = 0usize;
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            BatchOutcome::Written => written += 1,
            BatchOutcome::Empty => empty += 1,
            BatchOutcome::Failed(err) => failures.push(err),
        }
    }

    println!(
        "Normalized {written} file(s) into '{}' ({empty} empty, {} failed)",
        args.output.display(),
        failures.len()
    );
    if failures.is_empty() {
        return Ok(());
    }
    for failure in &failures {
        eprintln!("  failed: {failure}");
    }
    Err(format!("{} file(s) could not be normalized", failures.len()))
}
