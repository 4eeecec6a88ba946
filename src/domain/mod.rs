//! Domain models - venues, filter state and the venue store
//!
//! This module contains the canonical data types used throughout the system:
//! - `types` - ids, weekdays, price bands and sort keys
//! - `venue` - normalised venue and package records
//! - `suburb_groups` - ordered suburb groupings with the "Others" catch-all
//! - `store` - the loaded, read-only venue list
//! - `filter` - the user's active facet selections

pub mod filter;
pub mod store;
pub mod suburb_groups;
pub mod types;
pub mod venue;

// Re-export commonly used types at module level
pub use filter::{Facet, FilterState};
pub use store::{LoadReport, VenueStore};
pub use suburb_groups::{GroupSelection, SuburbGroup, SuburbGroups};
pub use types::{PriceBand, SortKey, VenueId, Weekday, WeekdaySet};
pub use venue::{Package, RecordError, Venue};
