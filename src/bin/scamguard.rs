//! scamguard — scam risk checker CLI
//!
//! Analyzes a message (argument or stdin) with Gemini when a key is
//! available, and with the built-in rules otherwise.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scamguard::config::{Config, Secrets};
use scamguard::history::{HistoryEntry, HistoryLog};
use scamguard::{Analysis, Attachment, ClassificationInput, Detector, ScamGuard};

/// Scam risk checker
#[derive(Parser)]
#[command(name = "scamguard")]
#[command(version)]
#[command(about = "Check messages and attachments for scam risk")]
struct Args {
    /// Config file (default: ~/.scamguard/config.toml, then /etc/scamguard/config.toml)
    #[arg(short, long, env = "SCAMGUARD_CONFIG")]
    config: Option<PathBuf>,

    /// Print JSON instead of a readable report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a message
    Analyze {
        /// Message text (or omit to read from stdin)
        text: Option<String>,
        /// Attached file as NAME or NAME:MIME (repeatable)
        #[arg(short, long = "attach", value_name = "NAME[:MIME]", value_parser = parse_attachment)]
        attachments: Vec<Attachment>,
        /// Use the rule classifier only
        #[arg(long)]
        offline: bool,
        /// Do not record this analysis
        #[arg(long)]
        no_history: bool,
    },

    /// Show recent analyses
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        /// Delete all entries
        #[arg(long)]
        clear: bool,
    },

    /// Print the category catalog used for analysis
    Catalog,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so JSON output stays clean (default: warn; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Analyze {
            text,
            attachments,
            offline,
            no_history,
        } => {
            let text = resolve_text(text, !attachments.is_empty())?;
            let detector = build_detector(&config, offline)?;
            let input = ClassificationInput { text, attachments };
            let analysis = detector.analyze(&input).await;

            if config.history.enabled
                && !no_history
                && let Some(path) = config.history.resolved_path()
            {
                HistoryLog::open(path).append(&input.text, &analysis)?;
            }

            if args.json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_analysis(&analysis);
            }
        }

        Command::History { limit, clear } => {
            let path = config
                .history
                .resolved_path()
                .ok_or("history: cannot determine home directory")?;
            let log = HistoryLog::open(path);

            if clear {
                log.clear()?;
                println!("history cleared");
                return Ok(());
            }

            let entries = log.recent(limit)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("no history");
            } else {
                for entry in &entries {
                    print_entry(entry);
                }
            }
        }

        Command::Catalog => {
            let detector = build_detector(&config, true)?;
            println!("{}", detector.catalog().schema_description());
        }
    }

    Ok(())
}

fn build_detector(config: &Config, offline: bool) -> scamguard::Result<Detector> {
    let mut builder = ScamGuard::builder()
        .retry(config.retry.to_retry_config())
        .timeout(config.upstream.timeout_secs);

    if !offline && config.upstream.enabled {
        let secrets = Secrets::load()?;
        if let Some(key) = secrets.google_api_key() {
            builder = builder.google(key);
        }
        if let Some(model) = &config.upstream.model {
            builder = builder.google_model(model.clone());
        }
        if let Some(url) = &config.upstream.base_url {
            builder = builder.google_base_url(url.clone());
        }
    }
    if let Some(cache) = config.cache.to_cache_config() {
        builder = builder.response_cache(cache);
    }

    builder.build()
}

fn parse_attachment(value: &str) -> Result<Attachment, String> {
    let (name, mime) = value.split_once(':').unwrap_or((value, ""));
    if name.trim().is_empty() {
        return Err("attachment name must not be empty".to_string());
    }
    Ok(Attachment::new(name.trim(), mime.trim()))
}

/// Resolve text input from an optional CLI argument and/or stdin.
///
/// - arg only → arg
/// - stdin only → stdin
/// - both → `"{arg}\n\n{stdin}"`
/// - neither → empty text if attachments were given, else an error
fn resolve_text(
    arg: Option<String>,
    has_attachments: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let stdin_text = if io::stdin().is_terminal() {
        None
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    };

    match (arg, stdin_text) {
        (Some(a), Some(s)) => Ok(format!("{a}\n\n{s}")),
        (Some(a), None) => Ok(a),
        (None, Some(s)) => Ok(s),
        (None, None) if has_attachments => Ok(String::new()),
        (None, None) => {
            Err("analyze: no input provided (pass text as argument or via stdin)".into())
        }
    }
}

fn print_analysis(analysis: &Analysis) {
    let result = &analysis.result;
    println!("risk:        {} ({}/100)", result.risk_level, result.score);
    println!("scam type:   {}", result.scam_type);
    println!("similarity:  {}", result.similarity);
    println!("indicators:  {}", result.risk_indicators.join(", "));
    if !result.reasons.is_empty() {
        println!("reasons:");
        for reason in &result.reasons {
            println!("  - {reason}");
        }
    }
    println!("advice:      {}", result.advice);
    println!();
    println!("{}", result.simplified_explanation);
    println!();
    println!("source:      {} ({})", analysis.source.as_str(), analysis.provider);
}

fn print_entry(entry: &HistoryEntry) {
    let result = &entry.analysis.result;
    let preview: String = entry.text.chars().take(60).collect();
    let ellipsis = if entry.text.chars().count() > 60 { "…" } else { "" };
    println!(
        "{}  {:<11} {:>3}  {}{}",
        entry.timestamp,
        result.risk_level.as_str(),
        result.score,
        preview.replace('\n', " "),
        ellipsis
    );
}
