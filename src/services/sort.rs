//! Sort engine - total order over venues for a sort key
//!
//! Venues without a price (no packages) always go last in both price
//! directions. Ties on the primary key fall back to name ascending.

use crate::domain::types::SortKey;
use crate::domain::venue::Venue;
use std::cmp::Ordering;

pub fn compare(a: &Venue, b: &Venue, key: SortKey) -> Ordering {
    match key {
        SortKey::NameAsc => compare_names(a, b),
        SortKey::NameDesc => compare_names(b, a),
        SortKey::PriceAsc => compare_price(a, b, false).then_with(|| compare_names(a, b)),
        SortKey::PriceDesc => compare_price(a, b, true).then_with(|| compare_names(a, b)),
        SortKey::Suburb => compare_text(&a.suburb, a.suburb_lower(), &b.suburb, b.suburb_lower())
            .then_with(|| compare_names(a, b)),
    }
}

/// Case-insensitive first, exact text second
pub fn compare_names(a: &Venue, b: &Venue) -> Ordering {
    compare_text(&a.name, a.name_lower(), &b.name, b.name_lower())
}

fn compare_text(a: &str, a_lower: &str, b: &str, b_lower: &str) -> Ordering {
    a_lower.cmp(b_lower).then_with(|| a.cmp(b))
}

fn compare_price(a: &Venue, b: &Venue, descending: bool) -> Ordering {
    match (a.min_price(), b.min_price()) {
        (Some(pa), Some(pb)) => {
            let ord = pa.total_cmp(&pb);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Permutation of indices into `venues` in display order
pub fn sort_order(venues: &[Venue], key: SortKey) -> Vec<usize> {
    let mut order: Vec<usize> = (0..venues.len()).collect();
    order.sort_by(|&a, &b| compare(&venues[a], &venues[b], key));
    order
}
