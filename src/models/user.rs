use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::services::validation::{field_error, not_blank, password_strength};

pub const USERS_COLLECTION: &str = "users";

pub const ROLE_CLIENT: &str = "client";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,  // PRIMARY IDENTIFIER - carried as JWT `sub`
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// bcrypt hash
    pub password: String,
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
    #[serde(default)]
    pub created_at: i64,
}

fn default_roles() -> Vec<String> {
    vec![ROLE_CLIENT.to_string()]
}

#[derive(Debug, Clone, Default, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "passwords_match", skip_on_field_errors = false))]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "not_blank", message = "First name is required"))]
    pub first_name: String,
    #[validate(custom(function = "not_blank", message = "Last name is required"))]
    pub last_name: String,
    #[validate(custom(function = "password_strength"))]
    pub password: String,
    /// Checked only when the client sends it
    pub confirm_password: Option<String>,
}

fn passwords_match(request: &SignupRequest) -> Result<(), ValidationError> {
    match &request.confirm_password {
        Some(confirm) if confirm.is_empty() => {
            Err(field_error("confirmPassword", "Please confirm your password"))
        }
        Some(confirm) if *confirm != request.password => {
            Err(field_error("confirmPassword", "Passwords must match"))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.user_id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            roles: user.roles.clone(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub status: String,
    pub token: String,
    pub user: UserInfo,
}
