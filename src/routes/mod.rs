/// Application routes configuration
use crate::handlers::{current_weather, forecast_weather, health, AppState};
use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Provider proxy
        .route("/api/weather/current", get(current_weather))
        .route("/api/weather/forecast", get(forecast_weather))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::OpenWeatherClient;
    use crate::config::ProviderConfig;
    use crate::services::WeatherService;
    use axum::body::{to_bytes, Body, Bytes};
    use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn router_for(base_url: String) -> Router {
        let config = ProviderConfig {
            base_url,
            api_key: "test-key".to_string(),
            ca_bundle_path: None,
            timeout: Duration::from_secs(5),
        };
        let client = OpenWeatherClient::new(&config).unwrap();
        build_router(AppState {
            weather_service: Arc::new(WeatherService::new(client)),
        })
    }

    async fn get_raw(app: Router, uri: &str) -> (StatusCode, Option<String>, Bytes) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, content_type, bytes)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, _, bytes) = get_raw(app, uri).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(router_for("http://127.0.0.1:9".into()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_current_without_city_is_400() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let (status, body) =
            get_json(router_for(server.uri()), "/api/weather/current?units=metric").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "City is required"}));
    }

    #[tokio::test]
    async fn test_forecast_without_city_is_400() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let (status, body) = get_json(router_for(server.uri()), "/api/weather/forecast").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "City is required"}));
    }

    #[tokio::test]
    async fn test_unknown_units_is_400() {
        let (status, body) = get_json(
            router_for("http://127.0.0.1:9".into()),
            "/api/weather/current?city=Nairobi&units=kelvin",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Units must be one of: metric, imperial");
    }

    #[tokio::test]
    async fn test_current_relays_provider_body() {
        let server = MockServer::start().await;
        let provider_body = json!({
            "name": "Nairobi",
            "main": {"temp": 22.3, "humidity": 55, "temp_min": 20.0, "temp_max": 24.0},
            "weather": [{"description": "few clouds", "icon": "02d", "main": "Clouds"}],
            "wind": {"speed": 3.6, "deg": 90},
            "dt": 1705315800,
            "extra": {"kept": true}
        });
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Nairobi"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(provider_body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let (status, body) =
            get_json(router_for(server.uri()), "/api/weather/current?city=Nairobi").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, provider_body);
    }

    #[tokio::test]
    async fn test_forecast_forwards_cnt_24() {
        let server = MockServer::start().await;
        let list: Vec<Value> = (0..24)
            .map(|i| json!({"dt": 1_700_000_000 + i * 10_800, "main": {"temp_min": 10, "temp_max": 20}}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Nairobi"))
            .and(query_param("units", "metric"))
            .and(query_param("cnt", "24"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "list": list })))
            .expect(1)
            .mount(&server)
            .await;

        let (status, body) = get_json(
            router_for(server.uri()),
            "/api/weather/forecast?city=Nairobi&units=metric",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["list"].as_array().map(Vec::len), Some(24));
    }

    #[tokio::test]
    async fn test_upstream_status_is_relayed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"cod": "404", "message": "city not found"})),
            )
            .mount(&server)
            .await;

        let (status, body) =
            get_json(router_for(server.uri()), "/api/weather/current?city=Atlantis").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "city not found");
    }

    #[tokio::test]
    async fn test_non_json_upstream_reply_is_relayed_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&server)
            .await;

        let (status, content_type, body) =
            get_raw(router_for(server.uri()), "/api/weather/forecast?city=Nairobi").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(content_type.as_deref(), Some("text/plain"));
        assert_eq!(&body[..], b"Service Unavailable");
    }

    #[tokio::test]
    async fn test_relayed_json_keeps_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Lima"})))
            .mount(&server)
            .await;

        let (status, content_type, _) =
            get_raw(router_for(server.uri()), "/api/weather/current?city=Lima").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_unparseable_query_is_400_with_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        for uri in [
            "/api/weather/current?city=Paris&city=Rome",
            "/api/weather/forecast?city=Paris&city=Rome",
        ] {
            let (status, content_type, bytes) = get_raw(router_for(server.uri()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(content_type.as_deref(), Some("application/json"));
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            assert!(body["error"].as_str().is_some_and(|m| m.contains("city")));
        }
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_502() {
        // Port 9 (discard) is closed on test hosts, so the connect fails fast.
        let (status, body) = get_json(
            router_for("http://127.0.0.1:9".into()),
            "/api/weather/current?city=Nairobi",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Weather provider unavailable");
    }
}
