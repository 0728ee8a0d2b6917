//! auditq: CLI tool for querying Linux audit logs.

use auditq::{AuditLog, Query, QueryConfig, DEFAULT_LOG_PATH};
use clap::{Parser, ValueEnum};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "auditq")]
#[command(version = "0.1.0")]
#[command(about = "Search Linux audit logs by field, rule key and time", long_about = None)]
struct Cli {
    /// Audit log file [default: /var/log/audit/audit.log]
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Field constraint, repeatable
    #[arg(short = 'w', long = "where", value_name = "FIELD=PATTERN")]
    constraints: Vec<String>,

    /// Only return blocks generated by audit rules matching this pattern
    #[arg(short, long)]
    key: Option<String>,

    /// Drop events later than this timestamp (seconds since epoch)
    #[arg(long)]
    older: Option<String>,

    /// Drop events earlier than this timestamp (seconds since epoch)
    #[arg(long)]
    newer: Option<String>,

    /// Fields to return, comma separated
    #[arg(short, long, value_delimiter = ',')]
    returning: Vec<String>,

    /// YAML query file; command-line options take precedence
    #[arg(short, long)]
    query: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Print only the number of matching records
    #[arg(long)]
    count: bool,

    /// Print scan statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// One JSON object per line
    Json,
    /// `field=value` pairs, one record per line
    Text,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.query {
        Some(path) => QueryConfig::load(path)?,
        None => QueryConfig::default(),
    };

    let query = build_query(&cli, &config)?;
    let path = cli
        .file
        .clone()
        .or_else(|| config.file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH));
    let returning = if cli.returning.is_empty() {
        config.returning.clone()
    } else {
        cli.returning.clone()
    };

    log::debug!("Query has {} constraints", query.len());
    let log = AuditLog::open(&path, returning)?;
    let mut scan = log.scan(&query)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut matched = 0u64;

    for record in scan.by_ref() {
        let record = record?;
        matched += 1;
        if cli.count {
            continue;
        }
        match cli.format {
            Format::Json => {
                serde_json::to_writer(&mut out, &record)?;
                writeln!(out)?;
            }
            Format::Text => writeln!(out, "{}", record)?,
        }
    }

    if cli.count {
        writeln!(out, "{}", matched)?;
    }
    out.flush()?;

    if cli.stats {
        eprintln!("{}", scan.stats());
    }
    Ok(())
}

/// Merge the query file with command-line constraints.
fn build_query(cli: &Cli, config: &QueryConfig) -> Result<Query, Box<dyn std::error::Error>> {
    let mut query = config.to_query()?;

    for constraint in &cli.constraints {
        let (field, pattern) = constraint
            .split_once('=')
            .ok_or_else(|| format!("expected FIELD=PATTERN, got {:?}", constraint))?;
        query.insert(field, pattern)?;
    }
    if let Some(key) = &cli.key {
        query.insert("key", key)?;
    }
    if let Some(older) = &cli.older {
        query.insert("older", older)?;
    }
    if let Some(newer) = &cli.newer {
        query.insert("newer", newer)?;
    }

    Ok(query)
}
