use core::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
  EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

pub mod config;
pub mod http;
pub mod job;
pub mod ring;
pub mod runner;

#[derive(Debug, Parser)]
pub struct Cli {
  /// The socket address to bind the HTTP server to.
  #[arg(short, long, default_value = None)]
  pub address: Option<SocketAddr>,

  /// The seed to use for the random number generator.
  #[arg(short, long)]
  pub seed: Option<u64>,

  /// The path to the config file.
  #[arg(short, long, default_value = None)]
  pub config_path: Option<PathBuf>,

  /// A directory to also write daily log files to.
  #[arg(long, default_value = None)]
  pub log_dir: Option<PathBuf>,

  /// Milliseconds between simulation ticks.
  #[arg(long)]
  pub tick_ms: Option<u64>,

  /// How many flights to create at startup.
  #[arg(long)]
  pub flights: Option<usize>,
}

/// Installs the global subscriber. Filtering follows `RUST_LOG` and falls
/// back to `info`. The returned guard must be held for file logs to flush.
pub fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new("info"));

  match log_dir {
    Some(dir) => {
      let appender = tracing_appender::rolling::daily(dir, "skyward.log");
      let (writer, guard) = tracing_appender::non_blocking(appender);

      tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();

      Some(guard)
    }
    None => {
      tracing_subscriber::fmt().with_env_filter(filter).init();
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cli_flags() {
    let cli = Cli::parse_from([
      "skyward",
      "--address",
      "0.0.0.0:9000",
      "--seed",
      "42",
      "--tick-ms",
      "250",
    ]);

    assert_eq!(cli.address.map(|a| a.port()), Some(9000));
    assert_eq!(cli.seed, Some(42));
    assert_eq!(cli.tick_ms, Some(250));
    assert!(cli.config_path.is_none());
    assert!(cli.flights.is_none());
  }
}
