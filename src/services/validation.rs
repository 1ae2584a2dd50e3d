//! Rules shared by the `#[derive(Validate)]` request types, plus the listing
//! form parser that turns validated strings into typed values.

use crate::models::{parse_age_group, CreateListingRequest};
use crate::utils::error::{AppError, FieldErrors};
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

lazy_static! {
    static ref PHONE_CHARS_RE: Regex = Regex::new(r"^\+?[0-9 ()\-]+$").expect("valid phone regex");
}

/// Values of a listing form that needed parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedListing {
    pub price: f64,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

/// Error whose code names the offending field; used by struct-level checks
pub fn field_error(field: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(field);
    error.message = Some(message.into());
    error
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// First failing password rule, in the order the signup form checks them
pub fn password_strength(password: &str) -> Result<(), ValidationError> {
    let problem = if password.chars().count() < 8 {
        "Password must be at least 8 characters long"
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        "Password must contain at least one uppercase letter"
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        "Password must contain at least one lowercase letter"
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        "Password must contain at least one number"
    } else if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        "Password must contain at least one special character"
    } else {
        return Ok(());
    };
    Err(field_error("password", problem))
}

/// 7 to 15 digits, optionally with a leading `+`, spaces, dashes and parentheses
pub fn phone_number(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if !PHONE_CHARS_RE.is_match(phone.trim()) || !(7..=15).contains(&digits) {
        return Err(ValidationError::new("phone"));
    }
    Ok(())
}

pub fn parse_price(raw: &str) -> Result<f64, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Please enter price");
    }
    match raw.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err("Price must be a non-negative number"),
    }
}

/// An empty age group means the listing is open to every age
pub fn parse_ages(raw: &str) -> Result<(Option<i32>, Option<i32>), String> {
    if raw.trim().is_empty() {
        return Ok((None, None));
    }
    let (min, max) = parse_age_group(raw)?;
    Ok((Some(min), max))
}

pub fn listing_price(raw: &str) -> Result<(), ValidationError> {
    parse_price(raw).map(|_| ()).map_err(|message| field_error("price", message))
}

pub fn age_group_label(raw: &str) -> Result<(), ValidationError> {
    parse_ages(raw).map(|_| ()).map_err(|message| field_error("ageGroup", message))
}

fn single_error(field: &str, message: impl Into<String>) -> AppError {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), message.into());
    AppError::Validation(errors)
}

pub fn validate_listing(request: &CreateListingRequest) -> Result<ParsedListing, AppError> {
    request.validate()?;

    let price = parse_price(&request.price).map_err(|message| single_error("price", message))?;
    let (min_age, max_age) =
        parse_ages(&request.age_group).map_err(|message| single_error("ageGroup", message))?;

    Ok(ParsedListing { price, min_age, max_age })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateSearchAlertRequest, SignupRequest, TrainerSignupRequest};

    fn field_errors<T: Validate>(request: &T) -> FieldErrors {
        match request.validate().map_err(AppError::from) {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn signup() -> SignupRequest {
        SignupRequest {
            email: "client@example.com".into(),
            first_name: "Maya".into(),
            last_name: "Lin".into(),
            password: "Str0ng!pass".into(),
            confirm_password: Some("Str0ng!pass".into()),
        }
    }

    fn listing_form() -> CreateListingRequest {
        CreateListingRequest {
            category: "Basketball".into(),
            title: "Junior hoops".into(),
            price: "25.5".into(),
            location: "Community centre".into(),
            days: "8".into(),
            gender: "Male".into(),
            age_group: "8-12".into(),
            description: "Dribbling and shooting basics".into(),
            ..Default::default()
        }
    }

    fn alert() -> CreateSearchAlertRequest {
        CreateSearchAlertRequest {
            email: "parent@example.com".into(),
            category: Some("Yoga".into()),
            min_price: Some(10.0),
            max_price: Some(50.0),
            min_age: Some(8),
            max_age: Some(12),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_signup() {
        assert!(signup().validate().is_ok());

        let mut without_confirmation = signup();
        without_confirmation.confirm_password = None;
        assert!(without_confirmation.validate().is_ok());
    }

    #[test]
    fn test_signup_password_rules() {
        let cases = [
            ("Sh0rt!", "Password must be at least 8 characters long"),
            ("lowercase1!", "Password must contain at least one uppercase letter"),
            ("UPPERCASE1!", "Password must contain at least one lowercase letter"),
            ("NoDigits!!", "Password must contain at least one number"),
            ("NoSpecial12", "Password must contain at least one special character"),
        ];

        for (password, message) in cases {
            let mut request = signup();
            request.password = password.into();
            request.confirm_password = None;
            let errors = field_errors(&request);
            assert_eq!(errors.get("password").map(String::as_str), Some(message), "{}", password);
        }
    }

    #[test]
    fn test_signup_field_errors() {
        let request = SignupRequest {
            email: "not-an-email".into(),
            first_name: " ".into(),
            last_name: String::new(),
            password: "Str0ng!pass".into(),
            confirm_password: Some("different".into()),
        };

        let errors = field_errors(&request);
        assert_eq!(errors["email"], "Invalid email address");
        assert_eq!(errors["firstName"], "First name is required");
        assert_eq!(errors["lastName"], "Last name is required");
        assert_eq!(errors["confirmPassword"], "Passwords must match");
    }

    #[test]
    fn test_trainer_phone() {
        let mut request = TrainerSignupRequest {
            fname: "Asha".into(),
            lname: "Rao".into(),
            email: "asha@example.com".into(),
            phone: "+1 (555) 010-2030".into(),
        };
        assert!(request.validate().is_ok());

        request.phone = "12345".into();
        assert_eq!(field_errors(&request)["phone"], "Please enter a valid phone number");

        request.phone = "555-CALL-NOW".into();
        assert!(field_errors(&request).contains_key("phone"));
    }

    #[test]
    fn test_listing_parses_price_and_ages() {
        let parsed = validate_listing(&listing_form()).unwrap();
        assert_eq!(parsed, ParsedListing { price: 25.5, min_age: Some(8), max_age: Some(12) });

        let mut adults = listing_form();
        adults.age_group = "21+".into();
        let parsed = validate_listing(&adults).unwrap();
        assert_eq!((parsed.min_age, parsed.max_age), (Some(21), None));

        let mut any_age = listing_form();
        any_age.age_group = String::new();
        let parsed = validate_listing(&any_age).unwrap();
        assert_eq!((parsed.min_age, parsed.max_age), (None, None));
    }

    #[test]
    fn test_listing_form_errors() {
        let request = CreateListingRequest {
            title: "ab".into(),
            price: "free".into(),
            location: "x".into(),
            age_group: "old".into(),
            description: "hey".into(),
            ..Default::default()
        };

        let errors = match validate_listing(&request) {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        };
        for field in ["category", "title", "price", "location", "days", "ageGroup", "description"] {
            assert!(errors.contains_key(field), "missing error for {}", field);
        }
        assert_eq!(errors["price"], "Price must be a non-negative number");
        assert_eq!(errors["ageGroup"], "Invalid age group: old");
    }

    #[test]
    fn test_listing_requires_price() {
        let mut request = listing_form();
        request.price = "  ".into();
        match validate_listing(&request) {
            Err(AppError::Validation(errors)) => assert_eq!(errors["price"], "Please enter price"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_search_alert_ranges() {
        let mut request = alert();
        assert!(request.validate().is_ok());

        request.min_price = Some(60.0);
        request.min_age = Some(-1);
        let errors = field_errors(&request);
        assert_eq!(errors["maxPrice"], "Maximum price must not be below minimum price");
        assert_eq!(errors["minAge"], "Age must not be negative");
    }

    #[test]
    fn test_search_alert_needs_a_price_range() {
        let mut request = alert();
        request.min_price = None;
        request.max_price = None;
        assert!(field_errors(&request).contains_key("minPrice"));

        let mut request = alert();
        request.max_price = None;
        assert!(field_errors(&request).contains_key("maxPrice"));
    }

    #[test]
    fn test_search_alert_age_bounds_come_in_pairs() {
        let mut request = alert();
        request.min_age = None;
        request.max_age = None;
        assert!(request.validate().is_ok());

        request.max_age = Some(12);
        assert_eq!(field_errors(&request)["minAge"], "Set both a minimum and a maximum age");
    }
}
