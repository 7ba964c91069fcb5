/// HTTP request handlers
use crate::clients::UpstreamResponse;
use crate::domain::{Health, WeatherParams};
use crate::errors::ApiError;
use crate::services::WeatherService;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub weather_service: Arc<WeatherService>,
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let mut resp = (self.status, self.body).into_response();
        match self.content_type {
            Some(content_type) => {
                resp.headers_mut().insert(CONTENT_TYPE, content_type);
            }
            None => {
                resp.headers_mut().remove(CONTENT_TYPE);
            }
        }
        resp
    }
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

/// Relay current conditions from the provider
pub async fn current_weather(
    params: Result<Query<WeatherParams>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<UpstreamResponse, ApiError> {
    let Query(params) = params?;
    state.weather_service.current(&params).await
}

/// Relay the 24-report forecast from the provider
pub async fn forecast_weather(
    params: Result<Query<WeatherParams>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<UpstreamResponse, ApiError> {
    let Query(params) = params?;
    state.weather_service.forecast(&params).await
}
