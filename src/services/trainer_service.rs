use crate::{
    database::MongoDB,
    models::{Trainer, TrainerSignupRequest, TRAINERS_COLLECTION},
    services::moderation_service::parse_object_id,
    utils::error::AppError,
};
use mongodb::bson::doc;
use validator::Validate;

/// Creates a pending trainer profile owned by `user_id`
pub async fn signup(
    db: &MongoDB,
    user_id: &str,
    request: &TrainerSignupRequest,
) -> Result<Trainer, AppError> {
    request.validate()?;

    let collection = db.collection::<Trainer>(TRAINERS_COLLECTION);

    if collection.find_one(doc! { "userId": user_id }).await?.is_some() {
        return Err(AppError::Conflict("Trainer profile already exists".to_string()));
    }

    let now = chrono::Utc::now().timestamp();
    let mut trainer = Trainer {
        id: None,
        fname: request.fname.trim().to_string(),
        lname: request.lname.trim().to_string(),
        email: request.email.trim().to_lowercase(),
        phone: request.phone.trim().to_string(),
        user_id: Some(user_id.to_string()),
        is_approved: false,
        created_at: now,
        updated_at: now,
    };

    let result = collection.insert_one(&trainer).await?;
    trainer.id = result.inserted_id.as_object_id();

    log::info!("📝 Trainer signup pending approval: {} {}", trainer.fname, trainer.lname);
    Ok(trainer)
}

pub async fn find_by_user(db: &MongoDB, user_id: &str) -> Result<Option<Trainer>, AppError> {
    Ok(db
        .collection::<Trainer>(TRAINERS_COLLECTION)
        .find_one(doc! { "userId": user_id })
        .await?)
}

/// Approved trainer by id; pending profiles are not visible
pub async fn get_approved(db: &MongoDB, trainer_id: &str) -> Result<Trainer, AppError> {
    let id = parse_object_id(trainer_id, "trainer")?;

    db.collection::<Trainer>(TRAINERS_COLLECTION)
        .find_one(doc! { "_id": id, "isApproved": true })
        .await?
        .ok_or_else(|| AppError::NotFound("Trainer not found".to_string()))
}
