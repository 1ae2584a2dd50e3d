use crate::{
    database::MongoDB,
    models::{CreateListingRequest, Listing, LISTINGS_COLLECTION},
    services::{moderation_service::parse_object_id, trainer_service, validation},
    utils::error::AppError,
};
use mongodb::bson::{doc, oid::ObjectId};

/// Creates a pending listing for the caller's trainer profile.
///
/// Only approved trainers may post listings.
pub async fn create_listing(
    db: &MongoDB,
    user_id: &str,
    request: &CreateListingRequest,
) -> Result<Listing, AppError> {
    let parsed = validation::validate_listing(request)?;

    let trainer_id = match trainer_service::find_by_user(db, user_id).await? {
        Some(trainer) if trainer.is_approved => trainer
            .id
            .ok_or_else(|| AppError::Internal("Trainer profile without _id".to_string()))?,
        Some(_) => {
            return Err(AppError::Forbidden(
                "Trainer profile is pending approval".to_string(),
            ))
        }
        None => {
            return Err(AppError::Forbidden(
                "Only trainers can create listings".to_string(),
            ))
        }
    };

    let mut listing = build_listing(&trainer_id, request, parsed, chrono::Utc::now().timestamp());

    let result = db
        .collection::<Listing>(LISTINGS_COLLECTION)
        .insert_one(&listing)
        .await?;
    listing.id = result.inserted_id.as_object_id();

    log::info!("📝 Listing submitted for approval: {} by {}", listing.title, user_id);
    Ok(listing)
}

fn build_listing(
    trainer_id: &ObjectId,
    request: &CreateListingRequest,
    parsed: validation::ParsedListing,
    now: i64,
) -> Listing {
    Listing {
        id: None,
        trainer_id: trainer_id.to_hex(),
        category: request.category.trim().to_string(),
        title: request.title.trim().to_string(),
        price: Some(parsed.price),
        location: request.location.trim().to_string(),
        quantity: request.quantity.trim().to_string(),
        start_date: request.start_date.trim().to_string(),
        end_date: request.end_date.trim().to_string(),
        days: request.days.trim().to_string(),
        gender: request.gender.trim().to_string(),
        start_time: request.start_time.trim().to_string(),
        end_time: request.end_time.trim().to_string(),
        age_group: request.age_group.trim().to_string(),
        min_age: parsed.min_age,
        max_age: parsed.max_age,
        description: request.description.trim().to_string(),
        is_approved: false,
        created_at: now,
        updated_at: now,
    }
}

/// Approved listing by id; pending listings are not visible
pub async fn get_approved(db: &MongoDB, listing_id: &str) -> Result<Listing, AppError> {
    let id = parse_object_id(listing_id, "listing")?;

    db.collection::<Listing>(LISTINGS_COLLECTION)
        .find_one(doc! { "_id": id, "isApproved": true })
        .await?
        .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))
}
