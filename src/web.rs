use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::Result;
use crate::api::{self, ApiState};
use crate::config::FareConfig;
use crate::workflow::FareQuoteService;

pub fn app(service: Arc<FareQuoteService>, config: &FareConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = ApiState {
        service,
        defaults: config.defaults.selection(),
    };

    Router::new()
        .nest("/api", api::router(state))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.request_timeout_seconds.into()),
        ))
        .layer(cors)
}

pub async fn run(service: Arc<FareQuoteService>, config: &FareConfig) -> Result<()> {
    let app = app(service, config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server running at http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
