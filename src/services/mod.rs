pub mod alert_matcher;
pub mod auth_service;
pub mod listing_service;
pub mod moderation_service;
pub mod notification_service;
pub mod search_alert_service;
pub mod trainer_service;
pub mod validation;
