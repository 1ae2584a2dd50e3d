use crate::{
    config::{AppConfig, JwtSettings},
    database::MongoDB,
    models::{
        AuthResponse, LoginRequest, SignupRequest, User, UserInfo, ROLE_ADMIN, ROLE_CLIENT,
        USERS_COLLECTION,
    },
    utils::error::AppError,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use validator::Validate;
use std::collections::HashSet;
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,           // user_id
    pub email: String,
    pub roles: Vec<String>,
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
    pub jti: String,           // JWT ID
    pub aud: String,           // audience
    pub iss: String,           // issuer
}

impl Claims {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

// Generate JWT token
pub fn generate_jwt(settings: &JwtSettings, user: &User) -> Result<String, AppError> {
    let now = Utc::now();

    let claims = Claims {
        sub: user.user_id.clone(),
        email: user.email.clone(),
        roles: user.roles.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(24)).timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
        aud: settings.audience.clone(),
        iss: settings.issuer.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_ref()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

// Verify JWT token
pub fn verify_token(settings: &JwtSettings, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[settings.audience.clone()]);

    let mut issuers = HashSet::new();
    issuers.insert(settings.issuer.clone());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

fn auth_response(settings: &JwtSettings, user: &User) -> Result<AuthResponse, AppError> {
    Ok(AuthResponse {
        status: "success".to_string(),
        token: generate_jwt(settings, user)?,
        user: UserInfo::from(user),
    })
}

// User signup
pub async fn signup(
    db: &MongoDB,
    config: &AppConfig,
    request: &SignupRequest,
) -> Result<AuthResponse, AppError> {
    request.validate()?;

    let collection = db.collection::<User>(USERS_COLLECTION);
    let email = request.email.trim().to_lowercase();

    if collection.find_one(doc! { "email": &email }).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let mut roles = vec![ROLE_CLIENT.to_string()];
    if config.is_admin_email(&email) {
        roles.push(ROLE_ADMIN.to_string());
    }

    let user = User {
        id: None,
        user_id: ObjectId::new().to_hex(),
        email: email.clone(),
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        password,
        roles,
        created_at: Utc::now().timestamp(),
    };

    collection.insert_one(&user).await?;

    log::info!("✅ User registered successfully: {} (roles: {:?})", email, user.roles);

    auth_response(&config.jwt, &user)
}

// User login
pub async fn login(
    db: &MongoDB,
    settings: &JwtSettings,
    request: &LoginRequest,
) -> Result<AuthResponse, AppError> {
    let collection = db.collection::<User>(USERS_COLLECTION);
    let email = request.email.trim().to_lowercase();

    let user = collection
        .find_one(doc! { "email": &email })
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = verify(&request.password, &user.password)
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    auth_response(settings, &user)
}

// Get current user
pub async fn get_current_user(db: &MongoDB, user_id: &str) -> Result<UserInfo, AppError> {
    let user = db
        .collection::<User>(USERS_COLLECTION)
        .find_one(doc! { "userId": user_id })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(UserInfo::from(&user))
}
