//! Weather payloads: the upstream wire shape and the canonical report.

use serde::{Deserialize, Serialize};

use crate::{GatewayError, Result};

/// Canonical weather report returned to callers and stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// City name as reported by the upstream provider.
    pub city: String,
    /// Short condition label (e.g. "Clouds", "Rain").
    pub weather: String,
    /// Temperature in the configured unit system.
    pub temperature: f64,
}

/// Current-weather payload as returned by the upstream provider.
///
/// Only the fields the gateway normalizes are modelled; everything else in
/// the upstream document is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamWeather {
    pub name: String,
    #[serde(default)]
    pub weather: Vec<UpstreamCondition>,
    pub main: UpstreamReadings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamCondition {
    pub main: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamReadings {
    pub temp: f64,
}

impl TryFrom<UpstreamWeather> for WeatherReport {
    type Error = GatewayError;

    fn try_from(upstream: UpstreamWeather) -> Result<Self> {
        let weather = upstream
            .weather
            .into_iter()
            .next()
            .map(|condition| condition.main)
            .ok_or_else(|| {
                GatewayError::UnexpectedResponse("no weather conditions in payload".to_string())
            })?;

        Ok(WeatherReport {
            city: upstream.name,
            weather,
            temperature: upstream.main.temp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_first_condition() {
        let json = r#"{
            "name": "London",
            "weather": [{"id": 803, "main": "Clouds"}, {"id": 500, "main": "Rain"}],
            "main": {"temp": 12.5, "humidity": 80},
            "cod": 200
        }"#;
        let upstream: UpstreamWeather = serde_json::from_str(json).unwrap();
        let report = WeatherReport::try_from(upstream).unwrap();
        assert_eq!(report.city, "London");
        assert_eq!(report.weather, "Clouds");
        assert_eq!(report.temperature, 12.5);
    }

    #[test]
    fn empty_conditions_are_rejected() {
        let json = r#"{"name": "Nowhere", "weather": [], "main": {"temp": 0}}"#;
        let upstream: UpstreamWeather = serde_json::from_str(json).unwrap();
        let err = WeatherReport::try_from(upstream).unwrap_err();
        assert!(matches!(err, GatewayError::UnexpectedResponse(_)));
    }

    #[test]
    fn report_serializes_canonical_keys() {
        let report = WeatherReport {
            city: "Paris".into(),
            weather: "Clear".into(),
            temperature: 22.0,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"city": "Paris", "weather": "Clear", "temperature": 22.0})
        );
    }
}
