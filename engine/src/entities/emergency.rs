use std::{fmt, time::Duration};

use internment::Intern;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyKind {
  Technical,
  Weather,
  Medical,
  Fuel,
}

impl EmergencyKind {
  pub const ALL: [EmergencyKind; 4] = [
    EmergencyKind::Technical,
    EmergencyKind::Weather,
    EmergencyKind::Medical,
    EmergencyKind::Fuel,
  ];
}

impl fmt::Display for EmergencyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Technical => write!(f, "technical"),
      Self::Weather => write!(f, "weather"),
      Self::Medical => write!(f, "medical"),
      Self::Fuel => write!(f, "fuel"),
    }
  }
}

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Low,
  Medium,
  #[default]
  High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emergency {
  pub id: Intern<String>,
  pub flight_id: Intern<String>,
  #[serde(rename = "type")]
  pub kind: EmergencyKind,
  pub severity: Severity,
  /// Time since the UNIX epoch at which the emergency was declared.
  pub timestamp: Duration,
}
