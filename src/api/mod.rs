pub mod admin;
pub mod health;
pub mod listings;
pub mod metrics;
pub mod search_alerts;
pub mod swagger;
pub mod trainers;
pub mod users;
