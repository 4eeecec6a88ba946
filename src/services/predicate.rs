//! Predicate engine - does a venue satisfy the current filter state?
//!
//! Pure functions only. A venue with no packages fails any active day or
//! price facet: an empty selection means "no constraint", but a venue
//! missing the attribute a constraint inspects does not match it.

use crate::domain::filter::FilterState;
use crate::domain::types::{PriceBand, WeekdaySet};
use crate::domain::venue::Venue;

/// AND of every facet predicate
pub fn matches(venue: &Venue, state: &FilterState) -> bool {
    matches_search(venue, state.search())
        && matches_cuisine(venue, state)
        && matches_suburb(venue, state)
        && matches_days(venue, state.days())
        && matches_price(venue, state.price())
}

/// Name or suburb contains the (already lower-cased) search text
pub fn matches_search(venue: &Venue, search: &str) -> bool {
    search.is_empty() || venue.name_lower().contains(search) || venue.suburb_lower().contains(search)
}

/// Substring match, so "Italian/French" satisfies either cuisine
pub fn matches_cuisine(venue: &Venue, state: &FilterState) -> bool {
    let cuisines = state.cuisines();
    cuisines.is_empty() || cuisines.iter().any(|needle| venue.cuisine_lower().contains(needle.as_str()))
}

pub fn matches_suburb(venue: &Venue, state: &FilterState) -> bool {
    let suburbs = state.suburbs();
    suburbs.is_empty() || suburbs.contains(&venue.suburb)
}

pub fn matches_days(venue: &Venue, days: WeekdaySet) -> bool {
    days.is_empty() || venue.packages.iter().any(|pkg| pkg.days.intersects(days))
}

pub fn matches_price(venue: &Venue, band: Option<PriceBand>) -> bool {
    match band {
        None => true,
        Some(band) => venue.packages.iter().any(|pkg| pkg.band() == Some(band)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Weekday;
    use serde_json::json;

    fn cafe_a() -> Venue {
        Venue::from_json(json!({
            "name": "Cafe A",
            "suburb": "Bondi",
            "cuisine": "Italian",
            "packages": [{"price": 80, "days": ["Saturday"]}]
        }))
        .unwrap()
    }

    fn cafe_b() -> Venue {
        Venue::from_json(json!({
            "name": "Cafe B",
            "suburb": "Manly",
            "cuisine": "Japanese",
            "packages": [{"price": 50, "days": ["Sunday"]}]
        }))
        .unwrap()
    }

    fn bare() -> Venue {
        Venue::from_json(json!({
            "name": "Bare Bar", "suburb": "Newtown", "cuisine": "Modern Australian", "packages": []
        }))
        .unwrap()
    }

    #[test]
    fn test_combined_filter_scenario() {
        let state = FilterState::new().with_cuisine("Italian").with_day(Weekday::Sat);
        assert!(matches(&cafe_a(), &state));
        assert!(!matches(&cafe_b(), &state));
    }

    #[test]
    fn test_vacuous_facets_match_everything() {
        let state = FilterState::new();
        assert!(matches(&cafe_a(), &state));
        assert!(matches(&cafe_b(), &state));
        assert!(matches(&bare(), &state));
    }

    #[test]
    fn test_search_name_or_suburb() {
        assert!(matches(&cafe_a(), &FilterState::new().with_search("cafe")));
        assert!(matches(&cafe_a(), &FilterState::new().with_search("BOND")));
        assert!(!matches(&cafe_a(), &FilterState::new().with_search("manly")));
    }

    #[test]
    fn test_cuisine_substring() {
        let fusion = Venue::from_json(json!({
            "name": "Fusion", "suburb": "Bondi", "cuisine": "Italian/French"
        }))
        .unwrap();
        assert!(matches(&fusion, &FilterState::new().with_cuisine("french")));
        assert!(matches(&fusion, &FilterState::new().with_cuisine("Thai").with_cuisine("Italian")));
        assert!(!matches(&fusion, &FilterState::new().with_cuisine("Thai")));
    }

    #[test]
    fn test_suburb_exact() {
        assert!(matches(&cafe_a(), &FilterState::new().with_suburb("Bondi")));
        assert!(!matches(&cafe_a(), &FilterState::new().with_suburb("Bondi Junction")));
        assert!(!matches(&cafe_a(), &FilterState::new().with_suburb("bondi")));
    }

    #[test]
    fn test_day_absent_venue_never_matches() {
        let state = FilterState::new().with_day(Weekday::Mon);
        assert!(!matches(&bare(), &state));
    }

    #[test]
    fn test_price_requires_package_in_band() {
        assert!(matches(&cafe_a(), &FilterState::new().with_price(PriceBand::Moderate)));
        assert!(!matches(&cafe_a(), &FilterState::new().with_price(PriceBand::Budget)));
        assert!(!matches(&bare(), &FilterState::new().with_price(PriceBand::Budget)));
    }

    #[test]
    fn test_unbanded_price_never_matches_price_filter() {
        let cheap = Venue::from_json(json!({
            "name": "Cheap", "suburb": "Bondi", "cuisine": "Cafe", "packages": [{"price": 30}]
        }))
        .unwrap();
        for band in PriceBand::ALL {
            assert!(!matches(&cheap, &FilterState::new().with_price(band)));
        }
        assert!(matches(&cheap, &FilterState::new()));
    }

    #[test]
    fn test_idempotent() {
        let state = FilterState::new().with_cuisine("japanese").with_price(PriceBand::Budget);
        let venue = cafe_b();
        assert_eq!(matches(&venue, &state), matches(&venue, &state));
    }
}
