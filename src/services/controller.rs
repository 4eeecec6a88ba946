//! Controller - single owner of filter state, sort key and view
//!
//! UI events become `Action`s. Each dispatch mutates the filter state and
//! then resyncs the card list, so the view never drifts from the state.

use crate::domain::filter::{Facet, FilterState};
use crate::domain::store::VenueStore;
use crate::domain::suburb_groups::GroupSelection;
use crate::domain::types::{PriceBand, SortKey, VenueId, Weekday};
use crate::domain::venue::Venue;
use crate::io::favourites::FavouritesStore;
use crate::services::view_sync::{ListStatus, SyncReport, ViewSync};
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetSearch(String),
    ToggleCuisine(String),
    ToggleSuburb(String),
    /// Select every suburb of the group, or deselect them all when the
    /// group is already fully selected
    ToggleSuburbGroup(String),
    ToggleDay(Weekday),
    TogglePrice(PriceBand),
    ClearFacet(Facet),
    Reset,
    SetSort(SortKey),
    ToggleFavourite(VenueId),
}

pub struct Controller {
    store: VenueStore,
    favourites: FavouritesStore,
    filter: FilterState,
    sort_key: SortKey,
    view: ViewSync,
    /// Set when the last favourites write failed
    favourites_error: Option<String>,
}

impl Controller {
    pub fn new(store: VenueStore, favourites: FavouritesStore, default_sort: SortKey) -> Self {
        let mut view = ViewSync::new(store.len());
        view.reorder(store.venues(), default_sort);
        info!(venues = store.len(), sort = %default_sort.as_str(), "controller_ready");
        Self {
            store,
            favourites,
            filter: FilterState::new(),
            sort_key: default_sort,
            view,
            favourites_error: None,
        }
    }

    pub fn dispatch(&mut self, action: Action) -> SyncReport {
        debug!(action = ?action, "action_dispatched");
        match action {
            Action::SetSearch(text) => self.filter.set_search(&text),
            Action::ToggleCuisine(cuisine) => {
                self.filter.toggle_cuisine(&cuisine);
            }
            Action::ToggleSuburb(suburb) => {
                self.filter.toggle_suburb(&suburb);
            }
            Action::ToggleSuburbGroup(label) => self.toggle_group(&label),
            Action::ToggleDay(day) => {
                self.filter.toggle_day(day);
            }
            Action::TogglePrice(band) => {
                self.filter.toggle_price(band);
            }
            Action::ClearFacet(facet) => self.filter.clear(facet),
            Action::Reset => self.filter.reset(),
            Action::SetSort(key) => {
                self.sort_key = key;
                self.view.reorder(self.store.venues(), key);
            }
            Action::ToggleFavourite(id) => self.toggle_favourite(id),
        }
        self.view.sync(self.store.venues(), &self.filter)
    }

    fn toggle_group(&mut self, label: &str) {
        let Some(group) = self.store.groups().get(label) else {
            debug!(group = %label, "suburb_group_unknown");
            return;
        };
        if group.selection(self.filter.suburbs()) == GroupSelection::All {
            self.filter.remove_suburbs(&group.suburbs);
        } else {
            self.filter.add_suburbs(&group.suburbs);
        }
    }

    fn toggle_favourite(&mut self, id: VenueId) {
        if self.store.by_id(id).is_none() {
            debug!(id = %id, "favourite_unknown_venue");
            return;
        }
        let now = self.favourites.toggle(id);
        match self.favourites.save() {
            Ok(()) => {
                info!(id = %id, favourite = now, "favourite_toggled");
                self.favourites_error = None;
            }
            Err(e) => {
                // Memory must not diverge from what is on disk
                self.favourites.toggle(id);
                error!(id = %id, error = %e, "favourites_save_failed");
                self.favourites_error = Some(format!("{e:#}"));
            }
        }
    }

    /// Error from the last favourite toggle, if its write failed and the
    /// toggle was rolled back
    pub fn favourites_error(&self) -> Option<&str> {
        self.favourites_error.as_deref()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn view(&self) -> &ViewSync {
        &self.view
    }

    pub fn store(&self) -> &VenueStore {
        &self.store
    }

    pub fn status(&self) -> ListStatus {
        self.view.status(&self.filter)
    }

    /// Visible venues in display order
    pub fn visible(&self) -> impl Iterator<Item = &Venue> {
        self.view.visible_cards().filter_map(|c| self.store.get(c.venue))
    }

    pub fn is_favourite(&self, id: VenueId) -> bool {
        self.favourites.contains(id)
    }

    /// Favourite venues in display order, whether or not they are visible
    pub fn favourite_venues(&self) -> Vec<&Venue> {
        self.view
            .cards()
            .iter()
            .filter_map(|c| self.store.get(c.venue))
            .filter(|v| self.favourites.contains(v.id))
            .collect()
    }

    pub fn active_group_count(&self) -> usize {
        self.store.groups().active_count(self.filter.suburbs())
    }

    pub fn group_selection(&self, label: &str) -> GroupSelection {
        self.store
            .groups()
            .get(label)
            .map_or(GroupSelection::None, |g| g.selection(self.filter.suburbs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::suburb_groups::{SuburbGroups, OTHERS_GROUP};
    use serde_json::json;

    fn controller() -> Controller {
        let records = vec![
            json!({"name": "Cafe B", "suburb": "Manly", "cuisine": "Japanese",
                   "packages": [{"price": 50, "days": ["Sunday"]}]}),
            json!({"name": "Cafe A", "suburb": "Bondi", "cuisine": "Italian",
                   "packages": [{"price": 80, "days": ["Saturday"]}]}),
            json!({"name": "Cafe C", "suburb": "Coogee", "cuisine": "Thai"}),
        ];
        let groups = SuburbGroups::from_pairs([("Eastern Suburbs", vec!["Bondi", "Coogee"])]);
        let (store, _) = VenueStore::from_records(records, groups);
        Controller::new(store, FavouritesStore::in_memory(), SortKey::NameAsc)
    }

    fn visible_names(c: &Controller) -> Vec<String> {
        c.visible().map(|v| v.name.clone()).collect()
    }

    #[test]
    fn test_initial_view_sorted_and_unfiltered() {
        let c = controller();
        assert_eq!(visible_names(&c), vec!["Cafe A", "Cafe B", "Cafe C"]);
        assert_eq!(c.status(), ListStatus::ShowingAll);
    }

    #[test]
    fn test_dispatch_filters_and_resyncs() {
        let mut c = controller();
        let report = c.dispatch(Action::ToggleCuisine("Italian".into()));
        assert_eq!(report.visible, 1);
        assert_eq!(visible_names(&c), vec!["Cafe A"]);
        assert_eq!(c.status(), ListStatus::Matched(1));

        c.dispatch(Action::ToggleDay(Weekday::Sun));
        assert_eq!(c.status(), ListStatus::NoMatches);

        c.dispatch(Action::Reset);
        assert_eq!(c.view().visible_count(), 3);
        assert!(!c.filter().is_active());
    }

    #[test]
    fn test_set_sort_reorders() {
        let mut c = controller();
        c.dispatch(Action::SetSort(SortKey::PriceDesc));
        assert_eq!(c.sort_key(), SortKey::PriceDesc);
        assert_eq!(visible_names(&c), vec!["Cafe A", "Cafe B", "Cafe C"]);
        c.dispatch(Action::SetSort(SortKey::PriceAsc));
        assert_eq!(visible_names(&c), vec!["Cafe B", "Cafe A", "Cafe C"]);
    }

    #[test]
    fn test_toggle_group_all_then_none() {
        let mut c = controller();
        c.dispatch(Action::ToggleSuburb("Bondi".into()));
        assert_eq!(c.group_selection("Eastern Suburbs"), GroupSelection::Partial);

        c.dispatch(Action::ToggleSuburbGroup("Eastern Suburbs".into()));
        assert_eq!(c.group_selection("Eastern Suburbs"), GroupSelection::All);
        assert_eq!(visible_names(&c), vec!["Cafe A", "Cafe C"]);

        c.dispatch(Action::ToggleSuburbGroup("Eastern Suburbs".into()));
        assert_eq!(c.group_selection("Eastern Suburbs"), GroupSelection::None);
        assert_eq!(c.active_group_count(), 0);
    }

    #[test]
    fn test_others_group_counts() {
        let mut c = controller();
        c.dispatch(Action::ToggleSuburbGroup(OTHERS_GROUP.into()));
        assert_eq!(visible_names(&c), vec!["Cafe B"]);
        c.dispatch(Action::ToggleSuburb("Bondi".into()));
        assert_eq!(c.active_group_count(), 2);
    }

    #[test]
    fn test_toggle_price_twice_clears() {
        let mut c = controller();
        c.dispatch(Action::TogglePrice(PriceBand::Budget));
        assert_eq!(visible_names(&c), vec!["Cafe B"]);
        c.dispatch(Action::TogglePrice(PriceBand::Budget));
        assert_eq!(c.filter().price(), None);
        assert_eq!(c.view().visible_count(), 3);
    }

    #[test]
    fn test_favourites() {
        let mut c = controller();
        let id = c.store().venues()[0].id;
        c.dispatch(Action::ToggleFavourite(id));
        assert!(c.is_favourite(id));
        assert_eq!(c.favourite_venues().len(), 1);

        c.dispatch(Action::ToggleFavourite(VenueId::derive("Nowhere", "Nowhere")));
        assert_eq!(c.favourite_venues().len(), 1);
    }

    #[test]
    fn test_favourite_rolled_back_when_save_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let records = vec![json!({"name": "Cafe A", "suburb": "Bondi", "cuisine": "Italian"})];
        let (store, _) = VenueStore::from_records(records, SuburbGroups::new());
        let favourites = FavouritesStore::load(blocker.join("favourites.json"));
        let mut c = Controller::new(store, favourites, SortKey::NameAsc);

        let id = c.store().venues()[0].id;
        c.dispatch(Action::ToggleFavourite(id));
        assert!(!c.is_favourite(id));
        assert!(c.favourite_venues().is_empty());
        assert!(c.favourites_error().is_some());
    }

    #[test]
    fn test_favourite_error_cleared_after_successful_save() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![json!({"name": "Cafe A", "suburb": "Bondi", "cuisine": "Italian"})];
        let (store, _) = VenueStore::from_records(records, SuburbGroups::new());
        let path = dir.path().join("favourites.json");
        let mut c = Controller::new(store, FavouritesStore::load(&path), SortKey::NameAsc);

        let id = c.store().venues()[0].id;
        c.dispatch(Action::ToggleFavourite(id));
        assert!(c.is_favourite(id));
        assert!(c.favourites_error().is_none());
        assert!(FavouritesStore::load(&path).contains(id));
    }

    #[test]
    fn test_clear_facet() {
        let mut c = controller();
        c.dispatch(Action::SetSearch("bondi".into()));
        c.dispatch(Action::ToggleDay(Weekday::Sat));
        c.dispatch(Action::ClearFacet(Facet::Search));
        assert_eq!(visible_names(&c), vec!["Cafe A"]);
        assert!(c.filter().is_facet_active(Facet::Day));
    }
}
