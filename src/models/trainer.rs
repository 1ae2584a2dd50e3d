use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::validation::{not_blank, phone_number};

pub const TRAINERS_COLLECTION: &str = "trainers";

/// Trainer profile (stored in MongoDB)
///
/// Created pending on signup; only an admin flips `is_approved` or deletes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub fname: String,
    pub lname: String,
    pub email: String,
    pub phone: String,

    /// Owning account; absent on profiles created before accounts existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default)]
    pub is_approved: bool,

    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct TrainerSignupRequest {
    #[validate(custom(function = "not_blank", message = "First name is required"))]
    pub fname: String,
    #[validate(custom(function = "not_blank", message = "Last name is required"))]
    pub lname: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "phone_number", message = "Please enter a valid phone number"))]
    pub phone: String,
}

/// Wire shape of a trainer card
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrainerResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub fname: String,
    pub lname: String,
    pub email: String,
    pub phone: String,
    pub is_approved: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Trainer> for TrainerResponse {
    fn from(t: Trainer) -> Self {
        TrainerResponse {
            id: t.id.map(|id| id.to_hex()).unwrap_or_default(),
            fname: t.fname,
            lname: t.lname,
            email: t.email,
            phone: t.phone,
            is_approved: t.is_approved,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}
