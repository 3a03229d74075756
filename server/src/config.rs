use std::{
  net::{IpAddr, Ipv4Addr, SocketAddr},
  path::{Path, PathBuf},
  time::Duration,
};

use directories::ProjectDirs;
use engine::{
  DEFAULT_TICK_PERIOD,
  engine::EngineConfig,
  entities::airport::{Airport, default_airports},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ADDRESS: SocketAddr =
  SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080);
pub const DEFAULT_INITIAL_FLIGHTS: usize = 5;
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config file {0}: {1}")]
  Read(PathBuf, #[source] std::io::Error),
  #[error("failed to parse config file {0}: {1}")]
  Parse(PathBuf, #[source] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
  pub world: Option<WorldConfig>,
  pub engine: Option<EngineConfig>,
  pub server: Option<ServerConfig>,
  pub airports: Option<Vec<AirportConfig>>,
}

impl Config {
  pub fn from_path<T>(path: T) -> Result<Self, ConfigError>
  where
    T: AsRef<Path>,
  {
    let path = path.as_ref();
    let config = std::fs::read_to_string(path)
      .map_err(|e| ConfigError::Read(path.to_owned(), e))?;

    toml::from_str(&config).map_err(|e| ConfigError::Parse(path.to_owned(), e))
  }

  /// Loads `path` if given, otherwise the per-user config file if one
  /// exists, otherwise the defaults.
  pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
    if let Some(path) = path {
      return Self::from_path(path);
    }

    match default_config_path() {
      Some(path) if path.exists() => {
        tracing::info!("Loading config from {}", path.display());
        Self::from_path(path)
      }
      _ => Ok(Self::default()),
    }
  }

  pub fn world(&self) -> WorldConfig {
    self.world.unwrap_or_default()
  }

  pub fn engine(&self) -> EngineConfig {
    self.engine.clone().unwrap_or_default()
  }

  pub fn server(&self) -> ServerConfig {
    self.server.unwrap_or_default()
  }

  pub fn airports(&self) -> Vec<Airport> {
    match &self.airports {
      Some(airports) => airports.iter().map(Airport::from).collect(),
      None => default_airports(),
    }
  }
}

pub fn default_config_path() -> Option<PathBuf> {
  ProjectDirs::from("", "", "skyward")
    .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldConfig {
  pub seed: Option<u64>,
  pub initial_flights: Option<usize>,
}

impl WorldConfig {
  pub fn initial_flights(&self) -> usize {
    self.initial_flights.unwrap_or(DEFAULT_INITIAL_FLIGHTS)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ServerConfig {
  pub address: Option<SocketAddr>,
  pub tick_ms: Option<u64>,
  pub notifications: Option<usize>,
}

impl ServerConfig {
  pub fn address(&self) -> SocketAddr {
    self.address.unwrap_or(DEFAULT_ADDRESS)
  }

  pub fn tick_period(&self) -> Duration {
    self
      .tick_ms
      .filter(|ms| *ms > 0)
      .map(Duration::from_millis)
      .unwrap_or(DEFAULT_TICK_PERIOD)
  }

  pub fn notifications(&self) -> usize {
    self.notifications.unwrap_or(DEFAULT_NOTIFICATION_CAPACITY)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportConfig {
  pub code: String,
  pub name: String,
  pub latitude: f32,
  pub longitude: f32,
  pub runways: usize,
}

impl From<&AirportConfig> for Airport {
  fn from(value: &AirportConfig) -> Self {
    Airport::new(
      &value.code,
      value.name.clone(),
      value.latitude,
      value.longitude,
      value.runways,
    )
  }
}
