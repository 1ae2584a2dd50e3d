pub mod listing;
pub mod search_alert;
pub mod trainer;
pub mod user;

pub use listing::*;
pub use search_alert::*;
pub use trainer::*;
pub use user::*;
