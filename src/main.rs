mod analyze;
mod collector;
mod config;
mod constants;
mod error;
mod export;
mod model;
mod report;
mod resolver;
mod youtube;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use directories::ProjectDirs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use analyze::analyze;
use config::Config;
use constants::constants;
use model::{ClassificationFilter, ResultCap, RunOutcome};
use youtube::HttpApi;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Rank a YouTube channel's uploads by virality", long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Collect a channel's uploads, rank them and export the report
  Analyze(AnalyzeArgs),
  /// Print shell completions to stdout
  Completions {
    #[arg(value_enum)]
    shell: clap_complete::Shell,
  },
}

#[derive(clap::Args, Debug)]
struct AnalyzeArgs {
  /// Channel id (UC...), @handle, or channel URL
  channel: String,

  /// YouTube Data API v3 key (falls back to the saved key)
  #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
  api_key: Option<String>,

  /// Which videos to keep
  #[arg(short, long, value_enum, default_value_t = ClassificationFilter::All)]
  filter: ClassificationFilter,

  /// Analyse at most this many uploads (default: the whole channel)
  #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
  max: Option<u64>,

  /// Rows to show in the terminal table
  #[arg(long, default_value_t = constants().top_n)]
  top: usize,

  /// Where to write the full report
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Skip writing the report file
  #[arg(long, conflicts_with = "output")]
  no_export: bool,

  /// Save the API key to prefs.toml for later runs
  #[arg(long)]
  remember_key: bool,
}

// --- Logging ---

/// Logs go to a daily file so stdout stays clean for the report.
fn init_logging() -> Option<WorkerGuard> {
  let filter = EnvFilter::try_from_env("YTVIRAL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

  if let Some(proj_dirs) = ProjectDirs::from("", "", "ytviral") {
    let appender = tracing_appender::rolling::daily(proj_dirs.data_dir(), "ytviral.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
    return Some(guard);
  }

  tracing_subscriber::fmt().with_env_filter(EnvFilter::new("warn")).with_writer(std::io::stderr).init();
  None
}

// --- Commands ---

/// Caps beyond the address space are effectively unbounded.
fn result_cap(max: Option<u64>) -> ResultCap {
  ResultCap::from_option(max.map(|n| usize::try_from(n).unwrap_or(usize::MAX)))
}

async fn run_analyze(args: AnalyzeArgs) -> Result<ExitCode> {
  let mut config = Config::load();
  let api_key = args.api_key.clone().or_else(|| config.api_key.clone()).unwrap_or_default();

  if args.remember_key && !api_key.trim().is_empty() {
    config.api_key = Some(api_key.trim().to_string());
    match config.save() {
      Ok(path) => info!(path = %path.display(), "config: API key saved"),
      Err(e) => {
        warn!(err = %format!("{e:#}"), "config: could not save API key");
        eprintln!("Could not save the API key: {e:#}");
      }
    }
  }

  let scoring = config.scoring();
  let cap = result_cap(args.max);
  let api = HttpApi::new();

  eprintln!("Collecting videos, please wait…");
  let outcome = match analyze(&api, &api_key, &args.channel, args.filter, cap, &scoring).await {
    Ok(outcome) => outcome,
    Err(e) => {
      error!(err = %e, channel = %args.channel, "analyze: run failed");
      eprintln!("{}", report::failure_message(&e));
      return Ok(ExitCode::FAILURE);
    }
  };

  let records = match outcome {
    RunOutcome::Empty => {
      println!("{}", report::empty_message());
      return Ok(ExitCode::SUCCESS);
    }
    RunOutcome::Ranked(records) => records,
  };

  println!("{}", report::success_message(records.len()));
  println!();
  println!("Top {} by virality:", args.top.min(records.len()));
  println!("{}", report::render_table(&records, args.top));

  if !args.no_export {
    let path = args.output.unwrap_or_else(|| PathBuf::from(&constants().export_file_name));
    export::export_csv(&path, &records, constants().export_delimiter)?;
    info!(path = %path.display(), rows = records.len(), "export: report written");
    println!();
    println!("Full report saved to {}", path.display());
  }

  Ok(ExitCode::SUCCESS)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<ExitCode> {
  let cli = Cli::parse();

  match cli.command {
    Command::Completions { shell } => {
      clap_complete::generate(shell, &mut Cli::command(), "ytviral", &mut std::io::stdout());
      Ok(ExitCode::SUCCESS)
    }
    Command::Analyze(args) => {
      let _guard = init_logging();
      run_analyze(args).await
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cli_is_well_formed() {
    Cli::command().debug_assert();
  }

  #[test]
  fn analyze_defaults() {
    let cli = Cli::try_parse_from(["ytviral", "analyze", "@creator", "--api-key", "k"]).unwrap();
    let Command::Analyze(args) = cli.command else { panic!("expected analyze") };
    assert_eq!(args.channel, "@creator");
    assert_eq!(args.filter, ClassificationFilter::All);
    assert_eq!(args.max, None);
    assert_eq!(args.top, 5);
    assert!(!args.no_export);
  }

  #[test]
  fn analyze_rejects_zero_cap() {
    assert!(Cli::try_parse_from(["ytviral", "analyze", "UC1", "--max", "0"]).is_err());
  }

  #[test]
  fn analyze_parses_filter_and_cap() {
    let cli = Cli::try_parse_from(["ytviral", "analyze", "UC1", "-f", "shorts", "-m", "200"]).unwrap();
    let Command::Analyze(args) = cli.command else { panic!("expected analyze") };
    assert_eq!(args.filter, ClassificationFilter::Shorts);
    assert_eq!(args.max, Some(200));
  }

  #[test]
  fn no_export_conflicts_with_output() {
    assert!(Cli::try_parse_from(["ytviral", "analyze", "UC1", "--no-export", "-o", "x.csv"]).is_err());
  }

  #[test]
  fn result_cap_from_flag() {
    assert_eq!(result_cap(None), ResultCap::Unbounded);
    assert_eq!(result_cap(Some(200)), ResultCap::AtMost(200));
    assert_eq!(result_cap(Some(u64::MAX)), ResultCap::AtMost(usize::try_from(u64::MAX).unwrap_or(usize::MAX)));
  }
}
