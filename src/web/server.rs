use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::sky::Site;

use super::api::imaging as imaging_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub site: Site,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let site = config.site();
        Self {
            config: Arc::new(config),
            site,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/imaging", post(imaging_handlers::generate_schedule))
        .route(
            "/api/imaging/validate",
            post(imaging_handlers::validate_request),
        )
        .route("/api/calibrators", get(imaging_handlers::list_calibrators))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let state = AppState::new(config);
    let bind_addr = state.config.web.bind.clone();
    log::info!(
        "Station at {:.6}, {:.6} ({} m)",
        state.site.latitude_deg,
        state.site.longitude_deg,
        state.site.altitude_m
    );

    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn openapi_document_lists_endpoints() {
        let response = router(AppState::new(Config::default()))
            .oneshot(
                Request::builder()
                    .uri("/api-doc/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/api/imaging"));
        assert!(paths.contains_key("/api/imaging/validate"));
        assert!(paths.contains_key("/api/calibrators"));
    }
}
