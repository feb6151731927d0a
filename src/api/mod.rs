//! API handlers for the Cycle Track REST endpoints

pub mod board;
pub mod customers;
pub mod dashboard;
pub mod health;
pub mod mechanics;
pub mod openapi;
pub mod products;
pub mod receipts;
pub mod settings;
pub mod tickets;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // Check for Bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let auth = &state.config.auth;
        let claims = UserClaims::from_token(token, &auth.jwt_secret, &auth.jwt_audience)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// JSON body whose rejections are reported as validation errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Service tickets
        .route("/service-tickets", get(tickets::list_tickets).post(tickets::create_ticket))
        .route("/service-tickets/:id", get(tickets::get_ticket))
        .route("/service-tickets/update-status", post(tickets::update_status))
        .route("/service-tickets/update", post(tickets::update_ticket))
        .route("/service-tickets/comment", post(tickets::add_comment))
        .route("/service-tickets/service-details", post(tickets::add_service_details))
        .route("/service-tickets/receipt/save", post(receipts::save_receipt))
        // Receipts
        .route("/receipt/custom", get(receipts::custom_receipt))
        .route("/receipt/generate", get(receipts::generate_receipt))
        // Workshop board
        .route("/workshop/board", get(board::get_board))
        .route("/workshop/board/move", post(board::move_card))
        // Dashboard
        .route("/dashboard", get(dashboard::get_dashboard))
        // Catalog
        .route("/mechanics", get(mechanics::list_mechanics))
        .route("/customers", get(customers::list_customers).post(customers::create_customer))
        .route(
            "/products",
            get(products::list_products)
                .post(products::create_product)
                .patch(products::update_product),
        )
        .route("/products/search", get(products::search_products))
        // Settings
        .route("/settings", get(settings::get_settings).post(settings::save_settings))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
