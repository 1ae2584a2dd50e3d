use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::validation::{age_group_label, listing_price, not_blank};

pub const LISTINGS_COLLECTION: &str = "listings";

/// Listing offered by a trainer (stored in MongoDB)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Hex `_id` of the trainer profile that created it
    #[serde(default)]
    pub trainer_id: String,

    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub days: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,

    /// Raw age group as picked in the form ("8-12", "21+")
    #[serde(default)]
    pub age_group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i32>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub is_approved: bool,

    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Body posted by the listing form; every field arrives as a string
#[derive(Debug, Clone, Default, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateListingRequest {
    #[validate(custom(function = "not_blank", message = "Please select a category"))]
    pub category: String,
    #[validate(length(min = 3, message = "Enter at least 3 characters"))]
    pub title: String,
    #[validate(custom(function = "listing_price"))]
    pub price: String,
    #[validate(length(min = 3, message = "Please enter a valid location address."))]
    pub location: String,
    pub quantity: String,
    pub start_date: String,
    pub end_date: String,
    #[validate(custom(function = "not_blank", message = "Please enter number of days"))]
    pub days: String,
    pub gender: String,
    pub start_time: String,
    pub end_time: String,
    /// "5-8", "8-12", "13-18", "18-21", "21+" or empty for any age
    #[validate(custom(function = "age_group_label"))]
    pub age_group: String,
    #[validate(length(min = 5, message = "Please enter description"))]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub trainer_id: String,
    pub category: String,
    pub title: String,
    pub price: Option<f64>,
    pub location: String,
    pub quantity: String,
    pub start_date: String,
    pub end_date: String,
    pub days: String,
    pub gender: String,
    pub start_time: String,
    pub end_time: String,
    pub age_group: String,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub description: String,
    pub is_approved: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Listing> for ListingResponse {
    fn from(l: Listing) -> Self {
        ListingResponse {
            id: l.id.map(|id| id.to_hex()).unwrap_or_default(),
            trainer_id: l.trainer_id,
            category: l.category,
            title: l.title,
            price: l.price,
            location: l.location,
            quantity: l.quantity,
            start_date: l.start_date,
            end_date: l.end_date,
            days: l.days,
            gender: l.gender,
            start_time: l.start_time,
            end_time: l.end_time,
            age_group: l.age_group,
            min_age: l.min_age,
            max_age: l.max_age,
            description: l.description,
            is_approved: l.is_approved,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

/// Parses an age group label into `(min, max)`.
///
/// `"13-18"` gives `(13, Some(18))`, `"21+"` gives `(21, None)`.
pub fn parse_age_group(raw: &str) -> Result<(i32, Option<i32>), String> {
    let raw = raw.trim();

    if let Some(min) = raw.strip_suffix('+') {
        let min = min
            .trim()
            .parse::<i32>()
            .map_err(|_| format!("Invalid age group: {}", raw))?;
        return Ok((min, None));
    }

    let (min, max) = raw
        .split_once('-')
        .ok_or_else(|| format!("Invalid age group: {}", raw))?;
    let min = min
        .trim()
        .parse::<i32>()
        .map_err(|_| format!("Invalid age group: {}", raw))?;
    let max = max
        .trim()
        .parse::<i32>()
        .map_err(|_| format!("Invalid age group: {}", raw))?;

    if min < 0 || max < min {
        return Err(format!("Invalid age group: {}", raw));
    }

    Ok((min, Some(max)))
}
