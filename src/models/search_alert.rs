use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::services::validation::field_error;

pub const SEARCH_ALERTS_COLLECTION: &str = "searchalerts";

/// Saved search of a client; every criterion is optional
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAlert {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i32>,

    #[serde(default)]
    pub created_at: i64,
}

/// Price range is required; age bounds are both set or both left out
#[derive(Debug, Clone, Default, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "alert_bounds", skip_on_field_errors = false))]
pub struct CreateSearchAlertRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub category: Option<String>,
    pub gender: Option<String>,
    #[validate(range(min = 0.0, message = "Price must be a non-negative number"))]
    pub min_price: Option<f64>,
    #[validate(range(min = 0.0, message = "Price must be a non-negative number"))]
    pub max_price: Option<f64>,
    #[validate(range(min = 0, message = "Age must not be negative"))]
    pub min_age: Option<i32>,
    #[validate(range(min = 0, message = "Age must not be negative"))]
    pub max_age: Option<i32>,
}

fn alert_bounds(request: &CreateSearchAlertRequest) -> Result<(), ValidationError> {
    match (request.min_price, request.max_price) {
        (Some(min), Some(max)) if min > max => {
            return Err(field_error("maxPrice", "Maximum price must not be below minimum price"))
        }
        (Some(_), Some(_)) => {}
        (Some(_), None) => {
            return Err(field_error("maxPrice", "Set both a minimum and a maximum price"))
        }
        (None, _) => return Err(field_error("minPrice", "Set both a minimum and a maximum price")),
    }

    match (request.min_age, request.max_age) {
        (Some(min), Some(max)) if min > max => {
            Err(field_error("maxAge", "Maximum age must not be below minimum age"))
        }
        (Some(_), None) => Err(field_error("maxAge", "Set both a minimum and a maximum age")),
        (None, Some(_)) => Err(field_error("minAge", "Set both a minimum and a maximum age")),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchAlertQuery {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchAlertResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub category: Option<String>,
    pub gender: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub created_at: i64,
}

impl From<SearchAlert> for SearchAlertResponse {
    fn from(a: SearchAlert) -> Self {
        SearchAlertResponse {
            id: a.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: a.email,
            category: a.category,
            gender: a.gender,
            min_price: a.min_price,
            max_price: a.max_price,
            min_age: a.min_age,
            max_age: a.max_age,
            created_at: a.created_at,
        }
    }
}
