//! View sync - keeps a pre-rendered card list in step with the filter
//!
//! Cards are created once per venue. Filtering only flips their
//! visibility; sorting only permutes them. Nothing is rebuilt.

use crate::domain::filter::FilterState;
use crate::domain::types::SortKey;
use crate::domain::venue::Venue;
use crate::services::predicate::matches;
use crate::services::sort::compare;
use tracing::debug;

/// One rendered card, pointing at its venue by index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub venue: usize,
    pub visible: bool,
}

/// Result of a visibility pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub visible: usize,
    /// Cards whose visibility flipped in this pass
    pub changed: usize,
}

/// Status line above the card list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    /// No facet is active
    ShowingAll,
    Matched(usize),
    /// Facets are active and nothing matches
    NoMatches,
}

impl std::fmt::Display for ListStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListStatus::ShowingAll => f.write_str("Showing all venues"),
            ListStatus::Matched(1) => f.write_str("1 venue matched"),
            ListStatus::Matched(n) => write!(f, "{n} venues matched"),
            ListStatus::NoMatches => f.write_str("No venues match your filters"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewSync {
    cards: Vec<Card>,
}

impl ViewSync {
    /// One visible card per venue, in load order
    pub fn new(venue_count: usize) -> Self {
        Self { cards: (0..venue_count).map(|venue| Card { venue, visible: true }).collect() }
    }

    /// Re-evaluate every card against the filter and flip visibility
    pub fn sync(&mut self, venues: &[Venue], state: &FilterState) -> SyncReport {
        let mut report = SyncReport::default();
        for card in &mut self.cards {
            let visible = venues.get(card.venue).is_some_and(|v| matches(v, state));
            if visible != card.visible {
                card.visible = visible;
                report.changed += 1;
            }
            if visible {
                report.visible += 1;
            }
        }
        debug!(visible = report.visible, changed = report.changed, "view_synced");
        report
    }

    /// Reorder all cards, hidden ones included. Stable, so equal keys keep
    /// their previous relative order.
    pub fn reorder(&mut self, venues: &[Venue], key: SortKey) {
        self.cards.sort_by(|a, b| match (venues.get(a.venue), venues.get(b.venue)) {
            (Some(va), Some(vb)) => compare(va, vb, key),
            _ => a.venue.cmp(&b.venue),
        });
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn visible_cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|c| c.visible)
    }

    /// Venue indices of visible cards, in display order
    pub fn visible_venues(&self) -> Vec<usize> {
        self.visible_cards().map(|c| c.venue).collect()
    }

    pub fn visible_count(&self) -> usize {
        self.visible_cards().count()
    }

    pub fn is_visible(&self, venue: usize) -> bool {
        self.cards.iter().any(|c| c.venue == venue && c.visible)
    }

    pub fn status(&self, state: &FilterState) -> ListStatus {
        if !state.is_active() {
            return ListStatus::ShowingAll;
        }
        match self.visible_count() {
            0 => ListStatus::NoMatches,
            n => ListStatus::Matched(n),
        }
    }
}
