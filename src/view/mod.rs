//! Client side of the app: the state controller, its data source and the
//! terminal renderer.

pub mod controller;
pub mod render;
pub mod source;

pub use controller::{RefreshOutcome, ViewState, WeatherController};
pub use source::{FetchError, ProxySource, WeatherSource};
