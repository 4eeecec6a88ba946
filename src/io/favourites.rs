//! Favourites persistence
//!
//! A JSON array of venue id strings in a single file. A missing file is an
//! empty set; an unreadable or corrupt one is logged and treated as empty.

use crate::domain::types::VenueId;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct FavouritesStore {
    /// None for a store that is never written
    path: Option<PathBuf>,
    ids: BTreeSet<VenueId>,
}

impl FavouritesStore {
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let ids = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<String>>(&contents) {
                Ok(raw) => parse_ids(&raw),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "favourites_corrupt");
                    BTreeSet::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "favourites_missing");
                BTreeSet::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "favourites_unreadable");
                BTreeSet::new()
            }
        };
        info!(path = %path.display(), count = ids.len(), "favourites_loaded");
        Self { path: Some(path), ids }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn contains(&self, id: VenueId) -> bool {
        self.ids.contains(&id)
    }

    /// Returns true if the venue is now a favourite
    pub fn toggle(&mut self, id: VenueId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = VenueId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Write the set back to disk. No-op for in-memory stores.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }

        let ids: Vec<String> = self.ids.iter().map(VenueId::to_string).collect();
        let json = serde_json::to_string_pretty(&ids)?;
        std::fs::write(path, json).with_context(|| format!("writing favourites to {}", path.display()))?;
        debug!(path = %path.display(), count = ids.len(), "favourites_saved");
        Ok(())
    }
}

fn parse_ids(raw: &[String]) -> BTreeSet<VenueId> {
    raw.iter()
        .filter_map(|s| match s.parse::<VenueId>() {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(value = %s, error = %e, "favourite_id_invalid");
                None
            }
        })
        .collect()
}
