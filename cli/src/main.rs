use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use aipk_core::{Language, ResultPackage, SourceRecord, Translator, validate_package};
use aipk_extract::analyze::analyze_dir;
use aipk_extract::config::AnalyzerConfig;
use aipk_extract::output::{OutputFormat, RenderOptions, format_package, format_record};
use aipk_extract::scores::QualityScores;
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "aipk")]
#[command(about = "Analyze and rank AI agent benchmark logs", version)]
struct Cli {
    /// Enable debug logging on stderr (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze every finish log under a benchmark directory and rank the results.
    Analyze(AnalyzeArgs),
    /// Analyze a single log file.
    ParseFile(ParseFileArgs),
    /// Analyze a single log read from stdin.
    ParseStdin(ParseStdinArgs),
    /// Translate canonical notes into the requested language.
    Translate(TranslateArgs),
    /// Write the default analyzer configuration as YAML.
    InitConfig(InitConfigArgs),
    /// Validate a JSON or YAML result package.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Benchmark root holding one directory per attempt.
    #[arg(long)]
    input: PathBuf,
    /// Analyzer configuration YAML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Quality scores file (YAML or JSON), overriding config and stats.json scores.
    #[arg(long)]
    scores: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: OutputFormat,
    /// Language for notes and headings in markdown/table output.
    #[arg(long, default_value = "en")]
    lang: Language,
    /// Write output to a file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Worker threads (default: config value, then available parallelism).
    #[arg(long)]
    jobs: Option<usize>,
    /// Entries shown in the table report.
    #[arg(long, default_value_t = 10)]
    top: usize,
    /// Run name shown in report titles.
    #[arg(long)]
    name: Option<String>,
}

#[derive(Debug, Args)]
struct RecordArgs {
    /// Source identifier for the log (e.g. kimi-k2+claude-code).
    #[arg(long)]
    id: String,
    /// Analyzer configuration YAML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Quality score to attach (clamped to 0-10).
    #[arg(long, default_value_t = 0)]
    score: i64,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Language for notes in markdown/table output.
    #[arg(long, default_value = "en")]
    lang: Language,
}

#[derive(Debug, Args)]
struct ParseFileArgs {
    /// Path to the log file.
    #[arg(long)]
    input: PathBuf,
    #[command(flatten)]
    record: RecordArgs,
}

#[derive(Debug, Args)]
struct ParseStdinArgs {
    #[command(flatten)]
    record: RecordArgs,
}

#[derive(Debug, Args)]
struct TranslateArgs {
    /// Text to translate; read from stdin when omitted.
    text: Vec<String>,
    /// Target language.
    #[arg(long, default_value = "en")]
    lang: Language,
    /// Analyzer configuration YAML providing the translation table.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct InitConfigArgs {
    /// Destination path for the configuration file.
    #[arg(long, default_value = "aipk.yml")]
    output: PathBuf,
    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Result package files (.json, .yaml or .yml).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { Level::DEBUG } else { Level::INFO });

    let result = match cli.command {
        Command::Analyze(args) => run_analyze(args),
        Command::ParseFile(args) => run_parse_file(args),
        Command::ParseStdin(args) => run_parse_stdin(args),
        Command::Translate(args) => run_translate(args),
        Command::InitConfig(args) => run_init_config(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so reports on stdout stay machine-readable.
fn init_tracing(level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<AnalyzerConfig, String> {
    match path {
        Some(path) => AnalyzerConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display())),
        None => Ok(AnalyzerConfig::default()),
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), String> {
    let mut config = load_config(args.config.as_deref())?;
    if args.jobs.is_some() {
        config.jobs = args.jobs;
    }

    let scores = match &args.scores {
        Some(path) => QualityScores::load(path)
            .map_err(|err| format!("Failed to load scores '{}': {err}", path.display()))?,
        None => QualityScores::new(),
    };

    let run = analyze_dir(&args.input, &config, &scores).map_err(|e| e.to_string())?;
    let generated_at = chrono::Utc::now().to_rfc3339();
    let mut package = ResultPackage::from_corpus(generated_at, &run.corpus);
    if let Some(name) = args.name {
        package = package.with_name(name);
    }

    let options = RenderOptions {
        language: args.lang,
        translator: config.translator(),
        top: args.top,
    };
    let rendered = format_package(&package, args.format, &options).map_err(|e| e.to_string())?;

    match &args.output {
        Some(path) => {
            write_output(path, &rendered)?;
            println!(
                "Analyzed {} log(s) into '{}' ({} unreadable).",
                package.record_count(),
                path.display(),
                run.failures.len()
            );
        }
        None => print!("{}", with_trailing_newline(rendered)),
    }

    Ok(())
}

fn run_parse_file(args: ParseFileArgs) -> Result<(), String> {
    let bytes = fs::read(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    run_parse_log(&args.record, &text)
}

fn run_parse_stdin(args: ParseStdinArgs) -> Result<(), String> {
    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .map_err(|err| format!("Failed to read stdin: {err}"))?;
    let text = String::from_utf8_lossy(&bytes);
    run_parse_log(&args.record, &text)
}

fn run_parse_log(args: &RecordArgs, text: &str) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let source = SourceRecord::new(args.id.clone(), text);
    let score = aipk_core::clamp_quality_score(args.score);
    let record = config.analyzer().analyze(&source, score);

    let options = RenderOptions {
        language: args.lang,
        translator: config.translator(),
        ..RenderOptions::default()
    };
    let rendered = format_record(&record, args.format, &options).map_err(|e| e.to_string())?;
    print!("{}", with_trailing_newline(rendered));
    Ok(())
}

fn run_translate(args: TranslateArgs) -> Result<(), String> {
    let translator = match &args.config {
        Some(_) => load_config(args.config.as_deref())?.translator(),
        None => Translator::default(),
    };

    if args.text.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .map_err(|err| format!("Failed to read stdin: {err}"))?;
        for line in input.lines() {
            println!("{}", translator.translate(line, args.lang));
        }
    } else {
        for text in &args.text {
            println!("{}", translator.translate(text, args.lang));
        }
    }
    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<(), String> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "'{}' already exists; pass --force to overwrite",
            args.output.display()
        ));
    }
    ensure_parent_dir(&args.output)?;
    AnalyzerConfig::default()
        .save(&args.output)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;
    println!("Wrote default configuration to '{}'.", args.output.display());
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut invalid = 0usize;
    for path in &args.inputs {
        let package = load_package(path)?;
        let errors = validate_package(&package);
        if errors.is_empty() {
            println!(
                "{}: ok ({} record(s))",
                path.display(),
                package.record_count()
            );
        } else {
            invalid += 1;
            for err in &errors {
                eprintln!("{}: {err}", path.display());
            }
        }
    }

    if invalid > 0 {
        return Err(format!("{invalid} result file(s) failed validation"));
    }
    println!("Validated {} result file(s).", args.inputs.len());
    Ok(())
}

fn load_package(path: &Path) -> Result<ResultPackage, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );
    if is_yaml {
        serde_yaml::from_str(&raw)
            .map_err(|err| format!("Failed to parse '{}': {err}", path.display()))
    } else {
        serde_json::from_str(&raw)
            .map_err(|err| format!("Failed to parse '{}': {err}", path.display()))
    }
}

fn write_output(path: &Path, contents: &str) -> Result<(), String> {
    ensure_parent_dir(path)?;
    fs::write(path, contents).map_err(|err| format!("Failed to write '{}': {err}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }
    Ok(())
}

fn with_trailing_newline(mut rendered: String) -> String {
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    rendered
}
