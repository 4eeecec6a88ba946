//! Services - filtering, sorting and view state
//!
//! - `predicate` - does a venue match the filter state
//! - `sort` - venue ordering per sort key
//! - `view_sync` - card visibility and order kept in step with the filter
//! - `controller` - dispatches UI actions and owns the state
//! - `panel` - slide-in panel state machine

pub mod controller;
pub mod panel;
pub mod predicate;
pub mod sort;
pub mod view_sync;

// Re-export commonly used types
pub use controller::{Action, Controller};
pub use panel::{Panel, PanelPhase, PanelState};
pub use view_sync::{ListStatus, SyncReport, ViewSync};
