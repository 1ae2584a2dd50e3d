use crate::{
    database::MongoDB,
    models::{CreateSearchAlertRequest, SearchAlert, SEARCH_ALERTS_COLLECTION},
    services::moderation_service::parse_object_id,
    utils::error::AppError,
};
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use validator::Validate;

pub async fn create_alert(
    db: &MongoDB,
    request: &CreateSearchAlertRequest,
) -> Result<SearchAlert, AppError> {
    request.validate()?;

    let mut alert = build_alert(request, chrono::Utc::now().timestamp());

    let result = db
        .collection::<SearchAlert>(SEARCH_ALERTS_COLLECTION)
        .insert_one(&alert)
        .await?;
    alert.id = result.inserted_id.as_object_id();

    log::info!("🔔 Search alert saved for {}", alert.email);
    Ok(alert)
}

fn build_alert(request: &CreateSearchAlertRequest, now: i64) -> SearchAlert {
    let clean = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    SearchAlert {
        id: None,
        email: request.email.trim().to_lowercase(),
        category: clean(&request.category),
        gender: clean(&request.gender),
        min_price: request.min_price,
        max_price: request.max_price,
        min_age: request.min_age,
        max_age: request.max_age,
        created_at: now,
    }
}

pub async fn list_for_email(db: &MongoDB, email: &str) -> Result<Vec<SearchAlert>, AppError> {
    let cursor = db
        .collection::<SearchAlert>(SEARCH_ALERTS_COLLECTION)
        .find(doc! { "email": email.trim().to_lowercase() })
        .await?;
    Ok(cursor.try_collect().await?)
}

pub async fn delete_alert(db: &MongoDB, alert_id: &str) -> Result<(), AppError> {
    let id = parse_object_id(alert_id, "search alert")?;

    let result = db
        .collection::<SearchAlert>(SEARCH_ALERTS_COLLECTION)
        .delete_one(doc! { "_id": id })
        .await?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Search alert not found".to_string()));
    }

    log::info!("🔕 Search alert removed: {}", alert_id);
    Ok(())
}
