//! Measurement unit systems understood by the upstream provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GatewayError;

/// Unit system used for upstream temperature readings.
///
/// Parsed case-insensitively; always rendered lowercase, which is also the
/// form the upstream API expects in its `units` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Units {
    /// Celsius.
    #[default]
    Metric,
    /// Fahrenheit.
    Imperial,
    /// Kelvin.
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            other => Err(GatewayError::Configuration(format!(
                "unknown weather units '{other}' (expected metric, imperial or standard)"
            ))),
        }
    }
}

impl TryFrom<String> for Units {
    type Error = GatewayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("IMPERIAL".parse::<Units>().unwrap(), Units::Imperial);
        assert_eq!(" standard ".parse::<Units>().unwrap(), Units::Standard);
    }

    #[test]
    fn rejects_unknown_units() {
        let err = "kelvin".parse::<Units>().unwrap_err();
        assert!(err.to_string().contains("kelvin"));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Units::Metric).unwrap(), "\"metric\"");
    }
}
