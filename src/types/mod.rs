//! Public types for the Weathergate API.

mod units;
mod weather;

pub use units::Units;
pub use weather::{UpstreamCondition, UpstreamReadings, UpstreamWeather, WeatherReport};
