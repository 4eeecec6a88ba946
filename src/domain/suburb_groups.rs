//! Suburb grouping (e.g. "Inner West" -> [Newtown, Enmore, ...])
//!
//! Groups keep the order of the source JSON object. Venue suburbs that no
//! group mentions are collected into a synthesised "Others" group.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;

/// Label of the synthesised catch-all group
pub const OTHERS_GROUP: &str = "Others";

#[derive(Debug, Clone, PartialEq)]
pub struct SuburbGroup {
    pub label: String,
    pub suburbs: Vec<String>,
}

/// How much of a group is currently selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSelection {
    None,
    Partial,
    All,
}

impl SuburbGroup {
    pub fn contains(&self, suburb: &str) -> bool {
        self.suburbs.iter().any(|s| s == suburb)
    }

    pub fn selection(&self, selected: &BTreeSet<String>) -> GroupSelection {
        let hits = self.suburbs.iter().filter(|s| selected.contains(*s)).count();
        match hits {
            0 => GroupSelection::None,
            n if n == self.suburbs.len() => GroupSelection::All,
            _ => GroupSelection::Partial,
        }
    }
}

/// Ordered label -> suburbs mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuburbGroups {
    groups: Vec<SuburbGroup>,
}

impl SuburbGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (label, suburbs) pairs; a repeated label extends the
    /// earlier group
    pub fn from_pairs<L, S, I>(pairs: I) -> Self
    where
        L: Into<String>,
        S: Into<String>,
        I: IntoIterator<Item = (L, Vec<S>)>,
    {
        let mut groups = Self::new();
        for (label, suburbs) in pairs {
            groups.push(label.into(), suburbs.into_iter().map(Into::into).collect());
        }
        groups
    }

    fn push(&mut self, label: String, suburbs: Vec<String>) {
        let suburbs = suburbs.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        match self.groups.iter_mut().find(|g| g.label == label) {
            Some(existing) => {
                for suburb in suburbs {
                    if !existing.contains(&suburb) {
                        existing.suburbs.push(suburb);
                    }
                }
            }
            None => {
                let mut unique: Vec<String> = Vec::new();
                for suburb in suburbs {
                    if !unique.contains(&suburb) {
                        unique.push(suburb);
                    }
                }
                self.groups.push(SuburbGroup { label, suburbs: unique });
            }
        }
    }

    /// Copy of these groups with an "Others" group appended for every venue
    /// suburb not already grouped. No "Others" group is added when every
    /// suburb is covered.
    pub fn with_others<'a, I>(&self, venue_suburbs: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let others: BTreeSet<&str> =
            venue_suburbs.into_iter().filter(|s| self.group_of(s).is_none()).collect();

        let mut groups = self.clone();
        if !others.is_empty() {
            groups.push(OTHERS_GROUP.to_string(), others.into_iter().map(str::to_string).collect());
        }
        groups
    }

    pub fn get(&self, label: &str) -> Option<&SuburbGroup> {
        self.groups.iter().find(|g| g.label == label)
    }

    /// Case-insensitive lookup, used for command-line input
    pub fn find(&self, label: &str) -> Option<&SuburbGroup> {
        let wanted = label.trim().to_lowercase();
        self.groups.iter().find(|g| g.label.to_lowercase() == wanted)
    }

    /// Label of the first group containing the suburb
    pub fn group_of(&self, suburb: &str) -> Option<&str> {
        self.groups.iter().find(|g| g.contains(suburb)).map(|g| g.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SuburbGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups with at least one selected suburb
    pub fn active_count(&self, selected: &BTreeSet<String>) -> usize {
        self.groups
            .iter()
            .filter(|g| g.selection(selected) != GroupSelection::None)
            .count()
    }
}

impl<'de> Deserialize<'de> for SuburbGroups {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::{MapAccess, Visitor};

        struct GroupsVisitor;

        impl<'de> Visitor<'de> for GroupsVisitor {
            type Value = SuburbGroups;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("an object mapping group labels to suburb lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SuburbGroups, A::Error> {
                let mut groups = SuburbGroups::new();
                while let Some((label, suburbs)) = map.next_entry::<String, Vec<String>>()? {
                    groups.push(label, suburbs);
                }
                Ok(groups)
            }
        }

        deserializer.deserialize_map(GroupsVisitor)
    }
}
