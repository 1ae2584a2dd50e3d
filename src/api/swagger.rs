use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Trainer Marketplace API",
        version = "1.0.0",
        description = "Backend for the trainer marketplace. \n\n**Authentication:** account, trainer and listing submission endpoints require a JWT Bearer token; moderation endpoints require the admin role.\n\n**Features:**\n- Client and trainer signup\n- Listing submission\n- Admin approval workflow for trainers and listings\n- Search alerts emailed when a matching listing is approved\n- Health monitoring and metrics"
    ),
    paths(
        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Users
        crate::api::users::signup,
        crate::api::users::login,
        crate::api::users::get_me,

        // Trainers
        crate::api::trainers::get_trainers,
        crate::api::trainers::get_trainer,
        crate::api::trainers::signup,

        // Listings
        crate::api::listings::get_listings,
        crate::api::listings::get_listing,
        crate::api::listings::add_listing,

        // Search alerts
        crate::api::search_alerts::create_alert,
        crate::api::search_alerts::list_alerts,
        crate::api::search_alerts::delete_alert,

        // Admin
        crate::api::admin::get_pending_trainers,
        crate::api::admin::approve_trainer,
        crate::api::admin::discard_trainer,
        crate::api::admin::get_pending_listings,
        crate::api::admin::approve_listing,
        crate::api::admin::discard_listing,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
            crate::models::SignupRequest,
            crate::models::LoginRequest,
            crate::models::AuthResponse,
            crate::models::UserInfo,
            crate::models::TrainerSignupRequest,
            crate::models::TrainerResponse,
            crate::models::CreateListingRequest,
            crate::models::ListingResponse,
            crate::models::CreateSearchAlertRequest,
            crate::models::SearchAlertResponse,
            crate::services::moderation_service::NotificationSummary,
        )
    ),
    tags(
        (name = "Health", description = "Health check and metrics."),
        (name = "Users", description = "Client accounts: signup, login, profile."),
        (name = "Trainers", description = "Approved trainer directory and trainer signup."),
        (name = "Listings", description = "Approved listings and listing submission."),
        (name = "Search Alerts", description = "Saved searches emailed when a matching listing is approved."),
        (name = "Admin", description = "Moderation of pending trainers and listings. Admin role required."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build()
                ),
            );
        }
    }
}
