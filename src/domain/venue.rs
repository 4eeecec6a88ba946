//! Venue and package records
//!
//! Raw JSON records are deserialized leniently into `VenueRecord`, then
//! validated and normalised into `Venue`. Everything downstream (filtering,
//! sorting, display) works on `Venue` only.

use crate::domain::types::{
    deserialize_days, deserialize_lenient_number, PriceBand, VenueId, Weekday, WeekdaySet,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::warn;

/// Validation failure for a single venue record
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("record is not a venue object: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("record is missing required field `{0}`")]
    MissingField(&'static str),
}

/// Venue as it appears in the source JSON
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub suburb: Option<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub lng: Option<f64>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub google_maps_url: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub packages: Option<Vec<PackageRecord>>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub rating: Option<f64>,
}

/// Package as it appears in the source JSON
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_days")]
    pub days: WeekdaySet,
    #[serde(default)]
    pub sessions: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One bookable brunch offer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Package {
    pub name: Option<String>,
    /// Per-person price
    pub price: f64,
    pub duration_mins: u32,
    pub days: WeekdaySet,
    pub sessions: SmallVec<[String; 4]>,
    pub description: Option<String>,
}

impl Package {
    #[inline]
    pub fn band(&self) -> Option<PriceBand> {
        PriceBand::classify(self.price)
    }
}

/// A listed venue, normalised and read-only after load
#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    pub id: VenueId,
    /// Slug of the name, e.g. "the_grounds_of_alexandria"
    pub key: String,
    pub name: String,
    pub suburb: String,
    pub cuisine: String,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub google_maps_url: Option<String>,
    pub images: Vec<String>,
    pub packages: Vec<Package>,
    pub rating: Option<f64>,
    name_lower: String,
    suburb_lower: String,
    cuisine_lower: String,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, RecordError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(RecordError::MissingField(field)),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Lower-case slug with runs of non-alphanumerics collapsed to `_`
pub fn venue_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            key.push(ch);
        } else if !key.ends_with('_') {
            key.push('_');
        }
    }
    key.trim_matches('_').to_string()
}

impl Venue {
    /// Validate and normalise a deserialized record
    pub fn from_record(record: VenueRecord) -> Result<Self, RecordError> {
        let name = required(record.name, "name")?;
        let suburb = required(record.suburb, "suburb")?;
        let cuisine = required(record.cuisine, "cuisine")?;
        let address = optional(record.address);

        let id = VenueId::derive(&name, address.as_deref().unwrap_or(&suburb));
        let key = venue_key(&name);

        let packages = record
            .packages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|pkg| {
                let Some(price) = pkg.price else {
                    warn!(venue = %name, package = ?pkg.name, "package_without_price_dropped");
                    return None;
                };
                Some(Package {
                    name: optional(pkg.name),
                    price,
                    duration_mins: pkg.duration.map(|d| d.max(0.0).round() as u32).unwrap_or(0),
                    days: pkg.days,
                    sessions: pkg.sessions.unwrap_or_default().into_iter().collect(),
                    description: optional(pkg.description),
                })
            })
            .collect();

        let images = record
            .images
            .unwrap_or_default()
            .into_iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();

        Ok(Self {
            id,
            key,
            name_lower: name.to_lowercase(),
            suburb_lower: suburb.to_lowercase(),
            cuisine_lower: cuisine.to_lowercase(),
            name,
            suburb,
            cuisine,
            address,
            lat: record.lat,
            lng: record.lng,
            website: optional(record.website),
            instagram: optional(record.instagram),
            google_maps_url: optional(record.google_maps_url),
            images,
            packages,
            rating: record.rating,
        })
    }

    /// Parse and normalise one JSON value
    pub fn from_json(value: serde_json::Value) -> Result<Self, RecordError> {
        let record: VenueRecord = serde_json::from_value(value)?;
        Self::from_record(record)
    }

    #[inline]
    pub(crate) fn name_lower(&self) -> &str {
        &self.name_lower
    }

    #[inline]
    pub(crate) fn suburb_lower(&self) -> &str {
        &self.suburb_lower
    }

    #[inline]
    pub(crate) fn cuisine_lower(&self) -> &str {
        &self.cuisine_lower
    }

    /// Cheapest package price, None when there are no packages
    pub fn min_price(&self) -> Option<f64> {
        self.packages.iter().map(|p| p.price).min_by(|a, b| a.total_cmp(b))
    }

    /// Individual cuisines of a "Italian/French" style label
    pub fn cuisines(&self) -> impl Iterator<Item = &str> {
        self.cuisine.split('/').map(str::trim).filter(|c| !c.is_empty())
    }

    /// Union of the days every package runs
    pub fn days(&self) -> WeekdaySet {
        self.packages.iter().flat_map(|p| p.days.iter()).collect()
    }

    pub fn main_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    /// Link for the "Maps" action in the detail view
    pub fn maps_url(&self) -> String {
        if let Some(url) = &self.google_maps_url {
            return url.clone();
        }
        if let Some((lat, lng)) = self.coordinates() {
            return format!("https://maps.google.com/?q={lat},{lng}");
        }
        let query = format!("{} {}, Australia", self.name, self.suburb);
        format!("https://www.google.com/maps/search/?api=1&query={}", encode_query(&query))
    }
}

fn encode_query(query: &str) -> String {
    let mut out = String::with_capacity(query.len() * 3);
    for byte in query.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
