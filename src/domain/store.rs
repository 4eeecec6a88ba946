//! Venue store - the loaded venue list plus suburb groups
//!
//! Built once at startup and read-only afterwards. Ingestion is fail-soft:
//! a malformed record is logged and skipped, the rest load. Venues sharing a
//! name and locator are all kept, the later ones under a disambiguated id.

use crate::domain::suburb_groups::SuburbGroups;
use crate::domain::types::VenueId;
use crate::domain::venue::Venue;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Outcome of ingesting a venue list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct VenueStore {
    venues: Vec<Venue>,
    by_id: FxHashMap<VenueId, usize>,
    /// Source groups plus the synthesised "Others" group
    groups: SuburbGroups,
}

impl VenueStore {
    /// Normalise raw JSON records, skipping any that fail validation
    pub fn from_records(records: Vec<serde_json::Value>, groups: SuburbGroups) -> (Self, LoadReport) {
        let mut venues = Vec::with_capacity(records.len());
        let mut skipped = 0;

        for (index, record) in records.into_iter().enumerate() {
            match Venue::from_json(record) {
                Ok(venue) => venues.push(venue),
                Err(e) => {
                    warn!(index = index, error = %e, "venue_record_skipped");
                    skipped += 1;
                }
            }
        }

        let store = Self::new(venues, groups);
        let report = LoadReport { loaded: store.len(), skipped };
        info!(loaded = report.loaded, skipped = report.skipped, groups = store.groups.len(), "venue_store_built");
        (store, report)
    }

    /// Build from already-validated venues. Colliding ids are re-derived
    /// from an occurrence counter so every venue stays addressable.
    pub fn new(mut venues: Vec<Venue>, groups: SuburbGroups) -> Self {
        let mut by_id = FxHashMap::default();

        for (index, venue) in venues.iter_mut().enumerate() {
            if by_id.contains_key(&venue.id) {
                let base = venue.id;
                let mut n = 2;
                while by_id.contains_key(&base.with_occurrence(n)) {
                    n += 1;
                }
                venue.id = base.with_occurrence(n);
                debug!(name = %venue.name, base = %base, id = %venue.id, occurrence = n, "venue_id_disambiguated");
            }
            by_id.insert(venue.id, index);
        }

        let groups = groups.with_others(venues.iter().map(|v| v.suburb.as_str()));
        Self { venues, by_id, groups }
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn get(&self, index: usize) -> Option<&Venue> {
        self.venues.get(index)
    }

    pub fn index_of(&self, id: VenueId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub fn by_id(&self, id: VenueId) -> Option<&Venue> {
        self.index_of(id).and_then(|i| self.venues.get(i))
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn groups(&self) -> &SuburbGroups {
        &self.groups
    }

    /// Distinct individual cuisines, alphabetical
    pub fn cuisine_options(&self) -> Vec<String> {
        let mut seen: FxHashMap<String, String> = FxHashMap::default();
        for cuisine in self.venues.iter().flat_map(|v| v.cuisines()) {
            seen.entry(cuisine.to_lowercase()).or_insert_with(|| cuisine.to_string());
        }
        let mut options: Vec<String> = seen.into_values().collect();
        options.sort_by_key(|c| c.to_lowercase());
        options
    }

    /// Distinct venue suburbs, alphabetical
    pub fn suburbs(&self) -> BTreeSet<&str> {
        self.venues.iter().map(|v| v.suburb.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::FilterState;
    use crate::domain::suburb_groups::OTHERS_GROUP;
    use crate::services::predicate::matches;
    use serde_json::json;

    fn records() -> Vec<serde_json::Value> {
        vec![
            json!({"name": "Cafe A", "suburb": "Bondi", "cuisine": "Italian/French"}),
            json!({"name": "Cafe B", "suburb": "Manly", "cuisine": "Japanese"}),
            json!({"suburb": "Newtown", "cuisine": "Thai"}),
            json!({"name": "Cafe C", "suburb": "Newtown", "cuisine": "italian"}),
            json!({"name": "Cafe A", "suburb": "Bondi", "cuisine": "Italian"}),
        ]
    }

    #[test]
    fn test_from_records_fail_soft() {
        let groups = SuburbGroups::from_pairs([("East", vec!["Bondi"])]);
        let (store, report) = VenueStore::from_records(records(), groups);

        assert_eq!(report, LoadReport { loaded: 4, skipped: 1 });
        assert_eq!(store.len(), 4);
        assert_eq!(store.venues()[2].name, "Cafe C");
        assert_eq!(store.venues()[3].name, "Cafe A");
        assert_ne!(store.venues()[0].id, store.venues()[3].id);
    }

    #[test]
    fn test_same_name_and_suburb_both_kept() {
        let records = vec![
            json!({"name": "The Grounds", "suburb": "Bondi", "cuisine": "Cafe",
                   "packages": [{"name": "Classic", "price": 60, "days": ["Sat"]}]}),
            json!({"name": "The Grounds", "suburb": "Bondi", "cuisine": "Cafe",
                   "packages": [{"name": "Deluxe", "price": 120, "days": ["Sun"]}]}),
            json!({"name": "the grounds", "suburb": "BONDI", "cuisine": "Cafe"}),
        ];
        let (store, report) = VenueStore::from_records(records, SuburbGroups::new());

        assert_eq!(report, LoadReport { loaded: 3, skipped: 0 });
        let ids: BTreeSet<VenueId> = store.venues().iter().map(|v| v.id).collect();
        assert_eq!(ids.len(), 3);
        for (index, venue) in store.venues().iter().enumerate() {
            assert_eq!(store.index_of(venue.id), Some(index));
        }
        assert_eq!(store.venues()[1].packages[0].name.as_deref(), Some("Deluxe"));

        let all = FilterState::new();
        assert!(store.venues().iter().all(|v| matches(v, &all)));
    }

    #[test]
    fn test_lookup_by_id() {
        let (store, _) = VenueStore::from_records(records(), SuburbGroups::new());
        let b = &store.venues()[1];
        assert_eq!(store.index_of(b.id), Some(1));
        assert_eq!(store.by_id(b.id).unwrap().name, "Cafe B");
    }

    #[test]
    fn test_others_group_synthesised() {
        let groups = SuburbGroups::from_pairs([("East", vec!["Bondi"])]);
        let (store, _) = VenueStore::from_records(records(), groups);
        let others = store.groups().get(OTHERS_GROUP).unwrap();
        assert_eq!(others.suburbs, vec!["Manly", "Newtown"]);
    }

    #[test]
    fn test_cuisine_options() {
        let (store, _) = VenueStore::from_records(records(), SuburbGroups::new());
        assert_eq!(store.cuisine_options(), vec!["French", "Italian", "Japanese"]);
    }
}
