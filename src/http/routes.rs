//! HTTP route definitions

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Serialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::app::AppState;
use crate::http::items::{create_item, delete_item, list_items, update_item};
use crate::http::products::{create_product, delete_product, list_products, update_product};
use crate::util::time::uptime_secs;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(state.config.client_origin.as_deref()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/:id", put(update_item).delete(delete_item))
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
}

/// CORS origins from a comma-separated list; unset or `*` allows any origin
fn allowed_origins(client_origin: Option<&str>) -> AllowOrigin {
    match client_origin.map(str::trim) {
        None | Some("") | Some("*") => AllowOrigin::any(),
        Some(list) => {
            let origins: Vec<HeaderValue> = list
                .split(',')
                .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
                .collect();
            AllowOrigin::list(origins)
        }
    }
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    items: Option<u64>,
    products: Option<u64>,
}

async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let items = state
        .items
        .count()
        .await
        .map_err(|e| error!(error = %e, "Item store health check failed"))
        .ok();
    let products = state
        .products
        .count()
        .await
        .map_err(|e| error!(error = %e, "Product store health check failed"))
        .ok();

    let healthy = items.is_some() && products.is_some();
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" },
            uptime_secs: uptime_secs(),
            items,
            products,
        }),
    )
}
