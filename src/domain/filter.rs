//! Filter state - the user's active facet selections
//!
//! Facets combine with AND; selections inside one facet combine with OR.
//! An empty facet imposes no constraint.

use crate::domain::types::{PriceBand, Weekday, WeekdaySet};
use std::collections::BTreeSet;

/// One independent filter dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Search,
    Cuisine,
    Suburb,
    Day,
    Price,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Trimmed, lower-cased search text
    search: String,
    /// Lower-cased cuisine needles
    cuisines: BTreeSet<String>,
    /// Exact suburb names
    suburbs: BTreeSet<String>,
    days: WeekdaySet,
    price: Option<PriceBand>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.trim().to_lowercase();
    }

    pub fn cuisines(&self) -> &BTreeSet<String> {
        &self.cuisines
    }

    pub fn has_cuisine(&self, cuisine: &str) -> bool {
        self.cuisines.contains(&cuisine.trim().to_lowercase())
    }

    /// Returns true if the cuisine is now selected
    pub fn toggle_cuisine(&mut self, cuisine: &str) -> bool {
        let needle = cuisine.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        if self.cuisines.remove(&needle) {
            false
        } else {
            self.cuisines.insert(needle);
            true
        }
    }

    pub fn suburbs(&self) -> &BTreeSet<String> {
        &self.suburbs
    }

    pub fn has_suburb(&self, suburb: &str) -> bool {
        self.suburbs.contains(suburb)
    }

    /// Returns true if the suburb is now selected
    pub fn toggle_suburb(&mut self, suburb: &str) -> bool {
        if self.suburbs.remove(suburb) {
            false
        } else {
            self.suburbs.insert(suburb.to_string());
            true
        }
    }

    pub fn add_suburbs<'a, I: IntoIterator<Item = &'a String>>(&mut self, suburbs: I) {
        self.suburbs.extend(suburbs.into_iter().cloned());
    }

    pub fn remove_suburbs<'a, I: IntoIterator<Item = &'a String>>(&mut self, suburbs: I) {
        for suburb in suburbs {
            self.suburbs.remove(suburb);
        }
    }

    pub fn days(&self) -> WeekdaySet {
        self.days
    }

    /// Returns true if the day is now selected
    pub fn toggle_day(&mut self, day: Weekday) -> bool {
        self.days.toggle(day)
    }

    pub fn price(&self) -> Option<PriceBand> {
        self.price
    }

    /// Select a band; selecting the active band again clears it
    pub fn toggle_price(&mut self, band: PriceBand) -> Option<PriceBand> {
        self.price = if self.price == Some(band) { None } else { Some(band) };
        self.price
    }

    pub fn clear(&mut self, facet: Facet) {
        match facet {
            Facet::Search => self.search.clear(),
            Facet::Cuisine => self.cuisines.clear(),
            Facet::Suburb => self.suburbs.clear(),
            Facet::Day => self.days.clear(),
            Facet::Price => self.price = None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_facet_active(&self, facet: Facet) -> bool {
        match facet {
            Facet::Search => !self.search.is_empty(),
            Facet::Cuisine => !self.cuisines.is_empty(),
            Facet::Suburb => !self.suburbs.is_empty(),
            Facet::Day => !self.days.is_empty(),
            Facet::Price => self.price.is_some(),
        }
    }

    /// True when any facet constrains the list
    pub fn is_active(&self) -> bool {
        [Facet::Search, Facet::Cuisine, Facet::Suburb, Facet::Day, Facet::Price]
            .into_iter()
            .any(|f| self.is_facet_active(f))
    }

    // Builder-style setters for one-shot queries (CLI, tests)

    pub fn with_search(mut self, text: &str) -> Self {
        self.set_search(text);
        self
    }

    pub fn with_cuisine(mut self, cuisine: &str) -> Self {
        let needle = cuisine.trim().to_lowercase();
        if !needle.is_empty() {
            self.cuisines.insert(needle);
        }
        self
    }

    pub fn with_suburb(mut self, suburb: &str) -> Self {
        self.suburbs.insert(suburb.to_string());
        self
    }

    pub fn with_day(mut self, day: Weekday) -> Self {
        self.days.insert(day);
        self
    }

    pub fn with_price(mut self, band: PriceBand) -> Self {
        self.price = Some(band);
        self
    }
}
