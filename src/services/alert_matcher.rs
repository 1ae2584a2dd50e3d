//! Builds the SearchAlert query for a freshly approved listing.
//!
//! Four independent predicates, each skipped when the listing does not carry
//! the attribute (empty string or zero counts as absent):
//!
//! - category: exact match
//! - gender: exact match
//! - price: the alert's `[minPrice, maxPrice]` contains the listing price
//! - ages: the alert's `[minAge, maxAge]` overlaps the listing's age range
//!
//! With no predicate at all the filter is empty and every alert matches.

use crate::models::Listing;
use mongodb::bson::{doc, Bson, Document};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertCriteria {
    pub category: Option<String>,
    pub gender: Option<String>,
    pub price: Option<f64>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

impl AlertCriteria {
    pub fn from_listing(listing: &Listing) -> Self {
        AlertCriteria {
            category: non_blank(&listing.category),
            gender: non_blank(&listing.gender),
            price: listing.price.filter(|p| p.is_finite() && *p != 0.0),
            min_age: listing.min_age.filter(|a| *a != 0),
            max_age: listing.max_age.filter(|a| *a != 0),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        *self == AlertCriteria::default()
    }

    pub fn to_filter(&self) -> Document {
        let mut filter = Document::new();

        if let Some(category) = &self.category {
            filter.insert("category", category.as_str());
        }
        if let Some(gender) = &self.gender {
            filter.insert("gender", gender.as_str());
        }

        let mut clauses: Vec<Bson> = Vec::new();

        if let Some(price) = self.price {
            clauses.push(Bson::Document(doc! { "minPrice": { "$lte": price } }));
            clauses.push(Bson::Document(doc! { "maxPrice": { "$gte": price } }));
        }
        if let Some(min_age) = self.min_age {
            clauses.push(Bson::Document(doc! { "maxAge": { "$gte": min_age } }));
        }
        if let Some(max_age) = self.max_age {
            clauses.push(Bson::Document(doc! { "minAge": { "$lte": max_age } }));
        }

        if !clauses.is_empty() {
            filter.insert("$and", clauses);
        }

        filter
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Listing {
        Listing {
            id: None,
            trainer_id: "trainer-1".into(),
            category: "Yoga".into(),
            title: "Sunrise yoga".into(),
            price: Some(40.0),
            location: "Riverside park".into(),
            quantity: "10".into(),
            start_date: "2024-09-01".into(),
            end_date: "2024-09-30".into(),
            days: "12".into(),
            gender: "Female".into(),
            start_time: "06:00".into(),
            end_time: "07:00".into(),
            age_group: "13-18".into(),
            min_age: Some(13),
            max_age: Some(18),
            description: "Gentle morning sessions".into(),
            is_approved: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_full_listing_builds_all_predicates() {
        let filter = AlertCriteria::from_listing(&listing()).to_filter();

        assert_eq!(
            filter,
            doc! {
                "category": "Yoga",
                "gender": "Female",
                "$and": [
                    { "minPrice": { "$lte": 40.0 } },
                    { "maxPrice": { "$gte": 40.0 } },
                    { "maxAge": { "$gte": 13 } },
                    { "minAge": { "$lte": 18 } }
                ],
            }
        );
    }

    #[test]
    fn test_open_ended_age_group_only_bounds_below() {
        let mut adults = listing();
        adults.age_group = "21+".into();
        adults.min_age = Some(21);
        adults.max_age = None;
        adults.price = None;

        let filter = AlertCriteria::from_listing(&adults).to_filter();
        assert_eq!(
            filter,
            doc! {
                "category": "Yoga",
                "gender": "Female",
                "$and": [ { "maxAge": { "$gte": 21 } } ],
            }
        );
    }

    #[test]
    fn test_price_without_ages() {
        let mut l = listing();
        l.min_age = None;
        l.max_age = None;
        l.gender = String::new();

        let filter = AlertCriteria::from_listing(&l).to_filter();
        assert_eq!(
            filter,
            doc! {
                "category": "Yoga",
                "$and": [
                    { "minPrice": { "$lte": 40.0 } },
                    { "maxPrice": { "$gte": 40.0 } }
                ],
            }
        );
    }

    #[test]
    fn test_zero_and_blank_values_are_ignored() {
        let mut l = listing();
        l.category = "   ".into();
        l.gender = String::new();
        l.price = Some(0.0);
        l.min_age = Some(0);
        l.max_age = None;

        let criteria = AlertCriteria::from_listing(&l);
        assert!(criteria.is_unrestricted());
        assert_eq!(criteria.to_filter(), Document::new());
    }

    #[test]
    fn test_category_is_trimmed() {
        let mut l = listing();
        l.category = " Table Tennis ".into();

        let criteria = AlertCriteria::from_listing(&l);
        assert_eq!(criteria.category.as_deref(), Some("Table Tennis"));
        assert!(!criteria.is_unrestricted());
    }
}
