use crate::utils::error::AppError;

/// Fallback signing secret when JWT_SECRET is unset; startup warns about it
pub const DEFAULT_JWT_SECRET: &str = "default-secret-change-me";

/// SMTP relay settings for outgoing alert emails
#[derive(Debug, Clone, PartialEq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// JWT signing parameters shared by the auth service and middleware
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt: JwtSettings,
    /// Accounts created with one of these emails receive the admin role
    pub admin_emails: Vec<String>,
    pub cors_origins: Vec<String>,
    /// `None` selects the log-only mailer
    pub smtp: Option<SmtpConfig>,
    pub mail_from: String,
}

impl AppConfig {
    /// Reads configuration from the process environment (after `.env` is loaded)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL")
            .ok_or_else(|| AppError::Config("DATABASE_URL must be set".to_string()))?;

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::Config(format!("Invalid PORT: {}", raw)))?,
            None => 3005,
        };

        let smtp = match get("SMTP_HOST") {
            Some(host) => {
                let port = match get("SMTP_PORT") {
                    Some(raw) => raw
                        .parse::<u16>()
                        .map_err(|_| AppError::Config(format!("Invalid SMTP_PORT: {}", raw)))?,
                    None => 587,
                };
                Some(SmtpConfig {
                    host,
                    port,
                    username: get("SMTP_USERNAME"),
                    password: get("SMTP_PASSWORD"),
                })
            }
            None => None,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url,
            jwt: JwtSettings {
                secret: get("JWT_SECRET").unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string()),
                issuer: get("JWT_ISSUER").unwrap_or_else(|| "trainer-marketplace".to_string()),
                audience: get("JWT_AUDIENCE").unwrap_or_else(|| "trainer-marketplace-api".to_string()),
            },
            admin_emails: split_list(get("ADMIN_EMAILS"))
                .into_iter()
                .map(|email| email.to_lowercase())
                .collect(),
            cors_origins: match get("CORS_ORIGINS") {
                Some(raw) => split_list(Some(raw)),
                None => vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ],
            },
            smtp,
            mail_from: get("MAIL_FROM")
                .unwrap_or_else(|| "Trainer Marketplace <no-reply@trainer-marketplace.local>".to_string()),
        })
    }

    pub fn uses_default_jwt_secret(&self) -> bool {
        self.jwt.secret == DEFAULT_JWT_SECRET
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|admin| *admin == email)
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
