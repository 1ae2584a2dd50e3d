use actix_web::{web, HttpResponse};

use crate::config::AppConfig;
use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::{AuthResponse, LoginRequest, SignupRequest, UserInfo};
use crate::services::auth_service;
use crate::utils::error::AppError;

#[utoipa::path(
    post,
    path = "/api/v1/user/signup",
    tag = "Users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn signup(
    db: web::Data<MongoDB>,
    config: web::Data<AppConfig>,
    request: web::Json<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /user/signup - email: {}", request.email);

    let response = auth_service::signup(&db, &config, &request).await?;
    Ok(HttpResponse::Created().json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/user/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    config: web::Data<AppConfig>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔐 POST /user/login - email: {}", request.email);

    match auth_service::login(&db, &config.jwt, &request).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/user/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current account", body = UserInfo),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let info = auth_service::get_current_user(&db, &user.sub).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "user": info
    })))
}
