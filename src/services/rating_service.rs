use std::collections::HashMap;

use serde_json::Value;

use crate::models::destination::ReviewEntry;

pub struct RatingService;

impl RatingService {
    /// Mean rating of a place's reviews.
    ///
    /// Reviews without a numeric `rating` add 0 to the sum but still count
    /// towards the denominator. Returns `None` for an empty list.
    pub fn average_rating(reviews: &[Value]) -> Option<f64> {
        if reviews.is_empty() {
            return None;
        }
        let total: f64 = reviews
            .iter()
            .filter_map(|review| review.as_object())
            .map(|review| review.get("rating").and_then(Value::as_f64).unwrap_or(0.0))
            .sum();
        Some(total / reviews.len() as f64)
    }

    /// Map of place name to average rating. Entries without a place or with an
    /// empty or malformed review list are ignored.
    pub fn rating_index(entries: &[ReviewEntry]) -> HashMap<String, f64> {
        entries
            .iter()
            .filter_map(|entry| {
                let place = entry.place.as_deref().filter(|p| !p.is_empty())?;
                let reviews = entry.reviews.as_ref()?.as_array()?;
                let average = Self::average_rating(reviews)?;
                Some((place.to_string(), average))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(place: Option<&str>, reviews: Value) -> ReviewEntry {
        ReviewEntry {
            place: place.map(str::to_string),
            reviews: Some(reviews),
        }
    }

    #[test]
    fn test_average_of_numeric_ratings() {
        let reviews = vec![json!({"rating": 4}), json!({"rating": 5.0}), json!({"rating": 3})];
        assert_eq!(RatingService::average_rating(&reviews), Some(4.0));
    }

    #[test]
    fn test_missing_ratings_count_as_zero() {
        let reviews = vec![
            json!({"rating": 5}),
            json!({"text": "no rating here"}),
            json!({"rating": "five"}),
            json!("not even an object"),
        ];
        assert_eq!(RatingService::average_rating(&reviews), Some(1.25));
    }

    #[test]
    fn test_empty_review_list_has_no_average() {
        assert_eq!(RatingService::average_rating(&[]), None);
    }

    #[test]
    fn test_index_skips_unusable_entries() {
        let entries = vec![
            entry(Some("Ubud Monkey Forest"), json!([{"rating": 4}, {"rating": 5}])),
            entry(None, json!([{"rating": 1}])),
            entry(Some("Tanah Lot"), json!([])),
            entry(Some("Kuta Beach"), json!({"rating": 3})),
            ReviewEntry {
                place: Some("Uluwatu".to_string()),
                reviews: None,
            },
        ];

        let index = RatingService::rating_index(&entries);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("Ubud Monkey Forest"), Some(&4.5));
    }
}
