//! Admin moderation: list, approve and discard trainers and listings.
//!
//! Approving a listing also fans out "new listing" emails to every
//! SearchAlert matching it. Approval and notification are not atomic; a
//! failed alert query or delivery never undoes the approval.

use crate::{
    database::MongoDB,
    models::{
        Listing, SearchAlert, Trainer, LISTINGS_COLLECTION, SEARCH_ALERTS_COLLECTION,
        TRAINERS_COLLECTION,
    },
    services::{
        alert_matcher::AlertCriteria,
        notification_service::{self, DeliveryReport, Mailer},
    },
    utils::error::AppError,
};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use serde::Serialize;
use std::collections::BTreeSet;

/// Outcome of the alert fan-out that follows a listing approval
#[derive(Debug, Clone, Default, Serialize, utoipa::ToSchema)]
pub struct NotificationSummary {
    /// Distinct subscriber emails whose alert matched
    pub matched: usize,
    pub sent: usize,
    pub failed: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct ListingApproval {
    pub listing: Listing,
    pub notifications: NotificationSummary,
}

pub fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| AppError::InvalidRequest(format!("Invalid {} ID", what)))
}

// ==================== TRAINERS ====================

pub async fn list_trainers(db: &MongoDB, approved: bool) -> Result<Vec<Trainer>, AppError> {
    let cursor = db
        .collection::<Trainer>(TRAINERS_COLLECTION)
        .find(doc! { "isApproved": approved })
        .await?;
    Ok(cursor.try_collect().await?)
}

pub async fn approve_trainer(db: &MongoDB, trainer_id: &str) -> Result<Trainer, AppError> {
    let id = parse_object_id(trainer_id, "trainer")?;

    let trainer = db
        .collection::<Trainer>(TRAINERS_COLLECTION)
        .find_one_and_update(
            doc! { "_id": id },
            doc! { "$set": { "isApproved": true, "updatedAt": chrono::Utc::now().timestamp() } },
        )
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| AppError::NotFound("Trainer not found".to_string()))?;

    log::info!("✅ Trainer approved: {} ({} {})", trainer_id, trainer.fname, trainer.lname);
    Ok(trainer)
}

pub async fn discard_trainer(db: &MongoDB, trainer_id: &str) -> Result<Trainer, AppError> {
    let id = parse_object_id(trainer_id, "trainer")?;

    let trainer = db
        .collection::<Trainer>(TRAINERS_COLLECTION)
        .find_one_and_delete(doc! { "_id": id })
        .await?
        .ok_or_else(|| AppError::NotFound("trainer not found".to_string()))?;

    log::info!("🗑️  Trainer discarded: {}", trainer_id);
    Ok(trainer)
}

// ==================== LISTINGS ====================

pub async fn list_listings(db: &MongoDB, approved: bool) -> Result<Vec<Listing>, AppError> {
    let cursor = db
        .collection::<Listing>(LISTINGS_COLLECTION)
        .find(doc! { "isApproved": approved })
        .await?;
    Ok(cursor.try_collect().await?)
}

pub async fn approve_listing(
    db: &MongoDB,
    mailer: &dyn Mailer,
    listing_id: &str,
) -> Result<ListingApproval, AppError> {
    let id = parse_object_id(listing_id, "listing")?;

    let listing = db
        .collection::<Listing>(LISTINGS_COLLECTION)
        .find_one_and_update(
            doc! { "_id": id },
            doc! { "$set": { "isApproved": true, "updatedAt": chrono::Utc::now().timestamp() } },
        )
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

    log::info!("✅ Listing approved: {} ({})", listing_id, listing.title);

    let lookup = find_matching_subscribers(db, &listing).await;
    let notifications = notify_subscribers(mailer, &listing, lookup).await;

    Ok(ListingApproval {
        listing,
        notifications,
    })
}

/// Sends the new-listing email to every matched subscriber.
///
/// A failed lookup is reported in the summary instead of failing the approval.
pub async fn notify_subscribers(
    mailer: &dyn Mailer,
    listing: &Listing,
    lookup: Result<Vec<String>, AppError>,
) -> NotificationSummary {
    let listing_id = listing.id.map(|id| id.to_hex()).unwrap_or_default();

    match lookup {
        Ok(recipients) if recipients.is_empty() => {
            log::info!("📭 No search alerts match listing {}", listing_id);
            NotificationSummary::default()
        }
        Ok(recipients) => {
            log::info!("📬 {} subscriber(s) match listing {}", recipients.len(), listing_id);
            let email = notification_service::new_listing_alert(listing);
            let DeliveryReport { sent, failed } = notification_service::send_bulk(
                mailer,
                &recipients,
                &email.subject,
                &email.text_body,
                &email.html_body,
            )
            .await;
            NotificationSummary {
                matched: recipients.len(),
                sent,
                failed,
                error: None,
            }
        }
        Err(e) => {
            log::error!("❌ Search alert lookup failed for listing {}: {}", listing_id, e);
            NotificationSummary {
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
    }
}

/// Distinct emails of the search alerts matching `listing`, in sorted order
pub async fn find_matching_subscribers(
    db: &MongoDB,
    listing: &Listing,
) -> Result<Vec<String>, AppError> {
    let criteria = AlertCriteria::from_listing(listing);
    if criteria.is_unrestricted() {
        log::warn!("⚠️  Listing has no alert criteria, every search alert matches");
    }

    let alerts: Vec<SearchAlert> = db
        .collection::<SearchAlert>(SEARCH_ALERTS_COLLECTION)
        .find(criteria.to_filter())
        .await?
        .try_collect()
        .await?;

    Ok(distinct_emails(&alerts))
}

fn distinct_emails(alerts: &[SearchAlert]) -> Vec<String> {
    alerts
        .iter()
        .map(|alert| alert.email.trim().to_lowercase())
        .filter(|email| !email.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub async fn discard_listing(db: &MongoDB, listing_id: &str) -> Result<Listing, AppError> {
    let id = parse_object_id(listing_id, "listing")?;

    let listing = db
        .collection::<Listing>(LISTINGS_COLLECTION)
        .find_one_and_delete(doc! { "_id": id })
        .await?
        .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

    log::info!("🗑️  Listing discarded: {}", listing_id);
    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notification_service::testing::RecordingMailer;

    fn listing() -> Listing {
        Listing {
            id: Some(ObjectId::new()),
            trainer_id: ObjectId::new().to_hex(),
            category: "Yoga".into(),
            title: "Sunrise flow".into(),
            price: Some(40.0),
            location: "Riverside park".into(),
            quantity: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            days: "5".into(),
            gender: "Female".into(),
            start_time: String::new(),
            end_time: String::new(),
            age_group: "18-21".into(),
            min_age: Some(18),
            max_age: Some(21),
            description: "Gentle vinyasa".into(),
            is_approved: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn test_db_uri() -> String {
        dotenv::dotenv().ok();
        std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/trainer_marketplace_test".to_string())
    }

    fn alert(email: &str) -> SearchAlert {
        SearchAlert {
            id: None,
            email: email.to_string(),
            category: Some("Yoga".into()),
            gender: None,
            min_price: None,
            max_price: None,
            min_age: None,
            max_age: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_distinct_emails_dedupes_case_insensitively() {
        let alerts = vec![
            alert("b@example.com"),
            alert("A@example.com"),
            alert(" a@example.com "),
            alert(""),
        ];

        assert_eq!(distinct_emails(&alerts), vec!["a@example.com", "b@example.com"]);
    }

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex(), "listing").unwrap(), id);

        match parse_object_id("42", "trainer") {
            Err(AppError::InvalidRequest(message)) => assert_eq!(message, "Invalid trainer ID"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_summary_omits_missing_error() {
        let json = serde_json::to_value(NotificationSummary::default()).unwrap();
        assert_eq!(json["matched"], 0);
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn test_notify_sends_to_each_recipient() {
        let mailer = RecordingMailer {
            reject: vec!["bounce@example.com".into()],
            ..Default::default()
        };
        let recipients = vec!["a@example.com".to_string(), "bounce@example.com".to_string()];

        let summary = notify_subscribers(&mailer, &listing(), Ok(recipients)).await;

        assert_eq!(summary.matched, 2);
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failed, vec!["bounce@example.com".to_string()]);
        assert!(summary.error.is_none());
        assert_eq!(mailer.recipients().await, vec!["a@example.com"]);
    }

    #[tokio::test]
    async fn test_notify_reports_lookup_failure() {
        let mailer = RecordingMailer::default();
        let lookup = Err(AppError::Internal("alert query failed".into()));

        let summary = notify_subscribers(&mailer, &listing(), lookup).await;

        assert_eq!(summary.matched, 0);
        assert_eq!(summary.sent, 0);
        assert_eq!(summary.error.as_deref(), Some("Internal error: alert query failed"));
        assert!(mailer.recipients().await.is_empty());
    }

    #[tokio::test]
    async fn test_notify_without_matches_sends_nothing() {
        let mailer = RecordingMailer::default();
        let summary = notify_subscribers(&mailer, &listing(), Ok(Vec::new())).await;

        assert_eq!(summary.matched, 0);
        assert!(mailer.recipients().await.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_approve_unknown_listing_sends_nothing() {
        let db = MongoDB::new(&test_db_uri()).await.unwrap();
        let mailer = RecordingMailer::default();

        let result = approve_listing(&db, &mailer, &ObjectId::new().to_hex()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(mailer.recipients().await.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_approve_listing_notifies_matching_alerts() {
        let db = MongoDB::new(&test_db_uri()).await.unwrap();
        let mailer = RecordingMailer::default();

        // Unique category keeps alerts left by other runs out of the match
        let category = format!("Yoga-{}", uuid::Uuid::new_v4());
        let mut pending = listing();
        pending.id = None;
        pending.is_approved = false;
        pending.category = category.clone();

        let inserted = db
            .collection::<Listing>(LISTINGS_COLLECTION)
            .insert_one(&pending)
            .await
            .unwrap();
        let listing_id = inserted.inserted_id.as_object_id().unwrap();

        let saved = |email: &str, gender: &str, min_price: f64, max_price: f64| SearchAlert {
            id: None,
            email: email.to_string(),
            category: Some(category.clone()),
            gender: Some(gender.to_string()),
            min_price: Some(min_price),
            max_price: Some(max_price),
            min_age: Some(16),
            max_age: Some(30),
            created_at: 0,
        };
        let alerts = vec![
            saved("maya@example.com", "Female", 10.0, 50.0),
            saved("MAYA@example.com", "Female", 30.0, 45.0),
            saved("lena@example.com", "Female", 40.0, 40.0),
            saved("priced-out@example.com", "Female", 50.0, 90.0),
            saved("other-gender@example.com", "Male", 10.0, 50.0),
        ];
        let alert_collection = db.collection::<SearchAlert>(SEARCH_ALERTS_COLLECTION);
        alert_collection.insert_many(&alerts).await.unwrap();

        let approval = approve_listing(&db, &mailer, &listing_id.to_hex()).await.unwrap();

        assert!(approval.listing.is_approved);
        assert_eq!(approval.notifications.matched, 2);
        assert_eq!(approval.notifications.sent, 2);
        assert!(approval.notifications.failed.is_empty());
        assert_eq!(
            mailer.recipients().await,
            vec!["lena@example.com", "maya@example.com"]
        );

        alert_collection
            .delete_many(doc! { "category": category.as_str() })
            .await
            .unwrap();
        discard_listing(&db, &listing_id.to_hex()).await.unwrap();
    }
}
