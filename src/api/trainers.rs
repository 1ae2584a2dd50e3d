use actix_web::{web, HttpResponse};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::{TrainerResponse, TrainerSignupRequest};
use crate::services::{moderation_service, trainer_service};
use crate::utils::error::AppError;

/// Approved trainers; also mounted as the admin "approved" list
#[utoipa::path(
    get,
    path = "/api/v1/trainers",
    tag = "Trainers",
    responses(
        (status = 200, description = "Approved trainers under `trainer`", body = [TrainerResponse])
    )
)]
pub async fn get_trainers(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    let trainers: Vec<TrainerResponse> = moderation_service::list_trainers(&db, true)
        .await?
        .into_iter()
        .map(TrainerResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "trainer": trainers
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/trainers/{id}",
    tag = "Trainers",
    params(("id" = String, Path, description = "Trainer ObjectId")),
    responses(
        (status = 200, description = "Approved trainer", body = TrainerResponse),
        (status = 404, description = "Unknown or pending trainer")
    )
)]
pub async fn get_trainer(
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let trainer = trainer_service::get_approved(&db, &path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "trainer": TrainerResponse::from(trainer)
    })))
}

/// POST /api/v1/trainer/signup - trainer profile for the calling account
#[utoipa::path(
    post,
    path = "/api/v1/trainer/signup",
    tag = "Trainers",
    request_body = TrainerSignupRequest,
    responses(
        (status = 201, description = "Profile created, pending approval", body = TrainerResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Profile already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn signup(
    user: web::ReqData<Claims>,
    body: web::Json<TrainerSignupRequest>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /trainer/signup - user: {}", user.sub);

    let trainer = trainer_service::signup(&db, &user.sub, &body).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "status": "success",
        "message": "Trainer profile submitted for approval",
        "trainer": TrainerResponse::from(trainer)
    })))
}
