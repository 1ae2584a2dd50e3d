use actix_web::{web, HttpResponse};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::{CreateListingRequest, ListingResponse};
use crate::services::{listing_service, moderation_service};
use crate::utils::error::AppError;

/// Approved listings; also mounted as the admin "approved" list
#[utoipa::path(
    get,
    path = "/api/v1/listings",
    tag = "Listings",
    responses(
        (status = 200, description = "Approved listings under `listings`", body = [ListingResponse])
    )
)]
pub async fn get_listings(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    let listings: Vec<ListingResponse> = moderation_service::list_listings(&db, true)
        .await?
        .into_iter()
        .map(ListingResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "listings": listings
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/listings/{id}",
    tag = "Listings",
    params(("id" = String, Path, description = "Listing ObjectId")),
    responses(
        (status = 200, description = "Approved listing", body = ListingResponse),
        (status = 404, description = "Unknown or pending listing")
    )
)]
pub async fn get_listing(
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let listing = listing_service::get_approved(&db, &path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "listing": ListingResponse::from(listing)
    })))
}

/// POST /api/v1/listing/add-listing - submitted by an approved trainer
#[utoipa::path(
    post,
    path = "/api/v1/listing/add-listing",
    tag = "Listings",
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Listing created, pending approval", body = ListingResponse),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Caller is not an approved trainer")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_listing(
    user: web::ReqData<Claims>,
    body: web::Json<CreateListingRequest>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /listing/add-listing - user: {}", user.sub);

    let listing = listing_service::create_listing(&db, &user.sub, &body).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "status": "success",
        "listing": ListingResponse::from(listing)
    })))
}
