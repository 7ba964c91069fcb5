//! Weather lookup: a thin proxy in front of OpenWeatherMap and a terminal
//! view that queries it.

pub mod clients;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod utils;
pub mod view;
