mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::middleware::AuthMiddleware;
use crate::services::notification_service::{self, Mailer};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| std::io::Error::other(e.to_string()))?;

    log::info!("🚀 Starting Trainer Marketplace...");

    if config.uses_default_jwt_secret() {
        log::warn!("⚠️  JWT_SECRET is not set; using the built-in default secret. Set JWT_SECRET before exposing this server");
    }

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&config.database_url)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to connect to MongoDB: {}", e)))?;
    log::info!("✅ MongoDB connected successfully");

    let mailer: Arc<dyn Mailer> =
        notification_service::mailer_from_config(config.smtp.as_ref(), &config.mail_from)
            .map_err(|e| std::io::Error::other(e.to_string()))?;

    let bind_address = (config.host.clone(), config.port);

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);

    let db_data = web::Data::new(db);
    let mailer_data: web::Data<dyn Mailer> = web::Data::from(mailer);
    let jwt_data = web::Data::new(config.jwt.clone());
    let cors_origins = config.cors_origins.clone();
    let config_data = web::Data::new(config);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(mailer_data.clone())
            .app_data(jwt_data.clone())
            .app_data(config_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))

            // ==================== ACCOUNTS ====================
            .service(
                web::scope("/api/v1/user")
                    .route("/signup", web::post().to(api::users::signup))
                    .route("/login", web::post().to(api::users::login))
                    .service(
                        web::resource("/me")
                            .wrap(AuthMiddleware::authenticated())
                            .route(web::get().to(api::users::get_me))
                    )
            )
            .service(
                web::scope("/api/v1/trainer")
                    .wrap(AuthMiddleware::authenticated())
                    .route("/signup", web::post().to(api::trainers::signup))
            )
            .service(
                web::scope("/api/v1/listing")
                    .wrap(AuthMiddleware::authenticated())
                    .route("/add-listing", web::post().to(api::listings::add_listing))
            )

            // ==================== PUBLIC BROWSING ====================
            .service(
                web::scope("/api/v1/trainers")
                    .route("", web::get().to(api::trainers::get_trainers))
                    .route("/{id}", web::get().to(api::trainers::get_trainer))
            )
            .service(
                web::scope("/api/v1/listings")
                    .route("", web::get().to(api::listings::get_listings))
                    .route("/{id}", web::get().to(api::listings::get_listing))
            )
            .service(
                web::scope("/api/v1/search-alerts")
                    .route("", web::post().to(api::search_alerts::create_alert))
                    .route("", web::get().to(api::search_alerts::list_alerts))
                    .route("/{id}", web::delete().to(api::search_alerts::delete_alert))
            )

            // ==================== MODERATION (admin) ====================
            .service(
                web::scope("/api/v1/admin")
                    .wrap(AuthMiddleware::admin())
                    .route("/trainers", web::get().to(api::trainers::get_trainers))
                    .route("/trainers/pending", web::get().to(api::admin::get_pending_trainers))
                    .route("/trainers/{id}/approve", web::patch().to(api::admin::approve_trainer))
                    .route("/trainers/{id}", web::delete().to(api::admin::discard_trainer))
                    .route("/listings", web::get().to(api::listings::get_listings))
                    .route("/listings/pending", web::get().to(api::admin::get_pending_listings))
                    .route("/listings/{id}/approve", web::patch().to(api::admin::approve_listing))
                    .route("/listings/{id}", web::delete().to(api::admin::discard_listing))
            )
    })
    .bind(bind_address)?
    .run()
    .await
}
