//! Weather lookup orchestration

mod builder;
mod weather;

pub use builder::WeatherGatewayBuilder;
pub use weather::{Lookup, WeatherGateway};
