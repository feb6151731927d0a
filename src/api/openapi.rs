//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{board, customers, dashboard, health, mechanics, products, receipts, settings, tickets};

/// Registers the bearer scheme referenced by `security(("bearer_auth" = []))`
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cycle Track API",
        version = "0.3.0",
        description = "Bicycle service shop REST API: ticket intake, workshop board, receipts and dashboard"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Service tickets
        tickets::list_tickets,
        tickets::create_ticket,
        tickets::get_ticket,
        tickets::update_status,
        tickets::update_ticket,
        tickets::add_comment,
        tickets::add_service_details,
        // Receipts
        receipts::save_receipt,
        receipts::custom_receipt,
        receipts::generate_receipt,
        // Workshop
        board::get_board,
        board::move_card,
        // Dashboard
        dashboard::get_dashboard,
        // Catalog
        mechanics::list_mechanics,
        customers::list_customers,
        customers::create_customer,
        products::list_products,
        products::search_products,
        products::create_product,
        products::update_product,
        // Settings
        settings::get_settings,
        settings::save_settings,
    ),
    components(
        schemas(
            // Tickets
            crate::models::enums::ServiceStatus,
            crate::models::enums::ServiceType,
            crate::models::customer::Customer,
            crate::models::customer::CreateCustomer,
            crate::models::customer::CustomerListResponse,
            crate::models::customer::CustomerResponse,
            crate::models::ticket::ServiceRequest,
            crate::models::ticket::ServiceTicket,
            crate::models::ticket::PartUsed,
            crate::models::ticket::ServiceRequestIntake,
            crate::models::ticket::TicketIntake,
            crate::models::ticket::IntakeRecord,
            crate::models::ticket::StatusUpdates,
            crate::models::ticket::UpdateStatusRequest,
            crate::models::ticket::TicketPatch,
            crate::models::ticket::UpdateTicketRequest,
            crate::models::ticket::TicketUpdateResponse,
            crate::models::ticket::CommentRequest,
            crate::models::ticket::ServiceDetailsRequest,
            crate::models::ticket::CommentResponse,
            crate::models::ticket::TicketListResponse,
            crate::models::ticket::TicketResponse,
            // Comments
            crate::models::comment::CommentEntry,
            crate::models::comment::CommentKind,
            crate::models::comment::ServiceDetails,
            crate::models::comment::ServiceDetailLine,
            // Receipts
            crate::models::receipt::ReceiptItem,
            crate::models::receipt::Receipt,
            crate::models::receipt::ReceiptData,
            crate::models::receipt::SaveReceiptRequest,
            crate::models::receipt::SaveReceiptResponse,
            crate::receipt::ReceiptLayout,
            crate::receipt::DrawOp,
            crate::receipt::layout::Align,
            crate::receipt::layout::ImageFormat,
            crate::receipt::ReceiptTotals,
            // Workshop
            crate::board::BoardView,
            crate::board::BoardColumn,
            crate::board::BoardCard,
            crate::board::MoveCardRequest,
            crate::board::MoveCardResponse,
            // Dashboard
            crate::models::dashboard::DashboardStats,
            crate::models::dashboard::DashboardResponse,
            // Catalog
            crate::models::mechanic::Mechanic,
            crate::models::mechanic::MechanicListResponse,
            crate::models::product::Product,
            crate::models::product::CreateProduct,
            crate::models::product::UpdateProduct,
            crate::models::product::ProductListResponse,
            crate::models::product::ProductResponse,
            crate::models::product::ProductSearchResponse,
            // Settings
            crate::models::settings::ShopSettings,
            crate::models::settings::SaveShopSettings,
            crate::models::settings::ShopIdentity,
            settings::SettingsResponse,
            settings::SaveSettingsResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "service-tickets", description = "Ticket intake, status workflow and comment log"),
        (name = "receipts", description = "Receipt snapshots and print layouts"),
        (name = "workshop", description = "Kanban board"),
        (name = "dashboard", description = "Statistics"),
        (name = "catalog", description = "Customers, mechanics and products"),
        (name = "settings", description = "Shop settings")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
