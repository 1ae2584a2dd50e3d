use actix_web::{web, HttpResponse};

use crate::database::MongoDB;
use crate::models::{ListingResponse, TrainerResponse};
use crate::services::moderation_service::{self, ListingApproval};
use crate::services::notification_service::Mailer;
use crate::utils::error::AppError;

// ==================== TRAINERS ====================

#[utoipa::path(
    get,
    path = "/api/v1/admin/trainers/pending",
    tag = "Admin",
    responses(
        (status = 200, description = "Trainers awaiting approval under `pendingTrainers`", body = [TrainerResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_pending_trainers(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    let pending: Vec<TrainerResponse> = moderation_service::list_trainers(&db, false)
        .await?
        .into_iter()
        .map(TrainerResponse::from)
        .collect();

    log::info!("📋 {} pending trainer(s)", pending.len());

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "pendingTrainers": pending
    })))
}

#[utoipa::path(
    patch,
    path = "/api/v1/admin/trainers/{id}/approve",
    tag = "Admin",
    params(("id" = String, Path, description = "Trainer ObjectId")),
    responses(
        (status = 200, description = "Trainer approved", body = TrainerResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Trainer not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_trainer(
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let trainer = moderation_service::approve_trainer(&db, &path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Trainer approved successfully",
        "trainer": TrainerResponse::from(trainer)
    })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/trainers/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "Trainer ObjectId")),
    responses(
        (status = 200, description = "Trainer deleted, returned under `deleteTrainer`", body = TrainerResponse),
        (status = 404, description = "Trainer not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn discard_trainer(
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let trainer = moderation_service::discard_trainer(&db, &path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "deleteTrainer": TrainerResponse::from(trainer)
    })))
}

// ==================== LISTINGS ====================

#[utoipa::path(
    get,
    path = "/api/v1/admin/listings/pending",
    tag = "Admin",
    responses(
        (status = 200, description = "Listings awaiting approval under `pendingListings`", body = [ListingResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_pending_listings(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    let pending: Vec<ListingResponse> = moderation_service::list_listings(&db, false)
        .await?
        .into_iter()
        .map(ListingResponse::from)
        .collect();

    log::info!("📋 {} pending listing(s)", pending.len());

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "pendingListings": pending
    })))
}

/// PATCH /listings/{id}/approve - approve and notify matching search alerts
#[utoipa::path(
    patch,
    path = "/api/v1/admin/listings/{id}/approve",
    tag = "Admin",
    params(("id" = String, Path, description = "Listing ObjectId")),
    responses(
        (status = 200, description = "Listing approved; `notifications` summarises the alert emails", body = ListingResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Listing not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_listing(
    path: web::Path<String>,
    db: web::Data<MongoDB>,
    mailer: web::Data<dyn Mailer>,
) -> Result<HttpResponse, AppError> {
    let approval =
        moderation_service::approve_listing(&db, mailer.get_ref(), &path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(approval_body(approval)))
}

fn approval_body(approval: ListingApproval) -> serde_json::Value {
    serde_json::json!({
        "message": "Listing approved successfully",
        "listing": ListingResponse::from(approval.listing),
        "notifications": approval.notifications
    })
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/listings/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "Listing ObjectId")),
    responses(
        (status = 200, description = "Listing deleted, returned under `deleteListing`", body = ListingResponse),
        (status = 404, description = "Listing not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn discard_listing(
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let listing = moderation_service::discard_listing(&db, &path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "deleteListing": ListingResponse::from(listing)
    })))
}
