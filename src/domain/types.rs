//! Shared value types for the brunch directory

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Namespace for deriving venue ids (UUIDv5)
const VENUE_NAMESPACE: Uuid = Uuid::from_u128(0x6b1f_3c2a_9d4e_5f60_8a7b_c1d2_e3f4_0516);

/// Error returned when a facet value from the command line or config
/// does not parse
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseValueError {
    kind: &'static str,
    value: String,
}

impl ParseValueError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}

/// Stable opaque venue identifier.
///
/// Derived from the venue's name and address (or suburb when there is no
/// address), so the same venue keeps its id across reloads and reorderings
/// of the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueId(Uuid);

impl VenueId {
    pub fn derive(name: &str, locator: &str) -> Self {
        let seed = format!("{}|{}", name.trim().to_lowercase(), locator.trim().to_lowercase());
        Self(Uuid::new_v5(&VENUE_NAMESPACE, seed.as_bytes()))
    }

    /// Id for the nth venue (n >= 2) sharing the same name and locator
    pub fn with_occurrence(self, n: usize) -> Self {
        let seed = format!("{}#{n}", self.0);
        Self(Uuid::new_v5(&VENUE_NAMESPACE, seed.as_bytes()))
    }
}

impl std::fmt::Display for VenueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VenueId {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self).map_err(|_| ParseValueError::new("venue id", s))
    }
}

/// Day of the week, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Map a 1-based index (1 = Monday) to a weekday
    pub fn from_index(index: u64) -> Option<Self> {
        match index {
            1..=7 => Some(Self::ALL[(index - 1) as usize]),
            _ => None,
        }
    }

    /// Zero-based position, Monday = 0
    #[inline]
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    pub fn short(&self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    pub fn long(&self) -> &'static str {
        match self {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short())
    }
}

impl FromStr for Weekday {
    type Err = ParseValueError;

    /// Accepts full names, three-letter abbreviations (any case) and 1-7
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<u64>() {
            return Self::from_index(index).ok_or_else(|| ParseValueError::new("weekday", s));
        }
        let lower = trimmed.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| lower == day.long().to_lowercase() || lower == day.short().to_lowercase())
            .ok_or_else(|| ParseValueError::new("weekday", s))
    }
}

impl Serialize for Weekday {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.short())
    }
}

/// Compact set of weekdays (bit per day)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.ordinal();
    }

    /// Flip membership; returns true if the day is now in the set
    pub fn toggle(&mut self, day: Weekday) -> bool {
        self.0 ^= 1 << day.ordinal();
        self.contains(day)
    }

    #[inline]
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.ordinal()) != 0
    }

    #[inline]
    pub fn intersects(&self, other: WeekdaySet) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        Weekday::ALL.into_iter().filter(|day| self.contains(*day))
    }

    /// Human summary used on cards and in the detail sheet.
    ///
    /// All seven days read "Daily", a contiguous run reads "Fri – Sun",
    /// two separate days read "Sat & Sun", anything else is comma-joined.
    pub fn describe(&self) -> String {
        let days: Vec<Weekday> = self.iter().collect();
        match days.as_slice() {
            [] => String::new(),
            _ if days.len() == 7 => "Daily".to_string(),
            [only] => only.short().to_string(),
            [first, .., last] if last.ordinal() - first.ordinal() + 1 == days.len() => {
                format!("{} – {}", first.short(), last.short())
            }
            [a, b] => format!("{} & {}", a.short(), b.short()),
            _ => days.iter().map(|d| d.short()).collect::<Vec<_>>().join(", "),
        }
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl Serialize for WeekdaySet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Deserialize a package's `days` list.
///
/// The source data mixes weekday names and 1-7 indices; both are accepted.
/// Unrecognised entries are dropped rather than failing the record.
pub(crate) fn deserialize_days<'de, D>(deserializer: D) -> Result<WeekdaySet, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};

    struct DayToken(Option<Weekday>);

    impl<'de> Deserialize<'de> for DayToken {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct TokenVisitor;

            impl<'de> Visitor<'de> for TokenVisitor {
                type Value = DayToken;

                fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                    formatter.write_str("a weekday name or a 1-7 index")
                }

                fn visit_str<E: de::Error>(self, value: &str) -> Result<DayToken, E> {
                    let day = value.parse::<Weekday>().ok();
                    if day.is_none() {
                        tracing::debug!(value = %value, "unknown_weekday_dropped");
                    }
                    Ok(DayToken(day))
                }

                fn visit_u64<E: de::Error>(self, value: u64) -> Result<DayToken, E> {
                    Ok(DayToken(Weekday::from_index(value)))
                }

                fn visit_i64<E: de::Error>(self, value: i64) -> Result<DayToken, E> {
                    Ok(DayToken(u64::try_from(value).ok().and_then(Weekday::from_index)))
                }

                fn visit_f64<E: de::Error>(self, value: f64) -> Result<DayToken, E> {
                    if value.fract() == 0.0 && value >= 1.0 {
                        return Ok(DayToken(Weekday::from_index(value as u64)));
                    }
                    Ok(DayToken(None))
                }

                fn visit_unit<E: de::Error>(self) -> Result<DayToken, E> {
                    Ok(DayToken(None))
                }
            }

            deserializer.deserialize_any(TokenVisitor)
        }
    }

    struct DaysVisitor;

    impl<'de> Visitor<'de> for DaysVisitor {
        type Value = WeekdaySet;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a list of weekdays")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<WeekdaySet, A::Error> {
            let mut set = WeekdaySet::empty();
            while let Some(DayToken(day)) = seq.next_element()? {
                if let Some(day) = day {
                    set.insert(day);
                }
            }
            Ok(set)
        }

        fn visit_unit<E: de::Error>(self) -> Result<WeekdaySet, E> {
            Ok(WeekdaySet::empty())
        }
    }

    deserializer.deserialize_any(DaysVisitor)
}

/// Deserialize a number that may arrive as a JSON number, a numeric
/// string ("85", "$85") or null
pub(crate) fn deserialize_lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = Option<f64>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a number or numeric string")
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Option<f64>, E> {
            Ok(value.is_finite().then_some(value))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Option<f64>, E> {
            Ok(Some(value as f64))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Option<f64>, E> {
            Ok(Some(value as f64))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Option<f64>, E> {
            let cleaned = value.trim().trim_start_matches('$').trim();
            Ok(cleaned.parse::<f64>().ok().filter(|v| v.is_finite()))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Option<f64>, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Option<f64>, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(NumberVisitor)
}

/// Coarse price band over a package's per-person price
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriceBand {
    /// $45 up to (not including) $75
    Budget,
    /// $75 up to $95
    Moderate,
    /// $95 up to $115
    Upscale,
    /// $115 and above
    Premium,
}

impl PriceBand {
    pub const ALL: [PriceBand; 4] =
        [PriceBand::Budget, PriceBand::Moderate, PriceBand::Upscale, PriceBand::Premium];

    /// Band for a price; anything under $45 (or NaN) has no band
    pub fn classify(price: f64) -> Option<Self> {
        if price >= 115.0 {
            Some(PriceBand::Premium)
        } else if price >= 95.0 {
            Some(PriceBand::Upscale)
        } else if price >= 75.0 {
            Some(PriceBand::Moderate)
        } else if price >= 45.0 {
            Some(PriceBand::Budget)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceBand::Budget => "$",
            PriceBand::Moderate => "$$",
            PriceBand::Upscale => "$$$",
            PriceBand::Premium => "$$$$",
        }
    }

    pub fn range_label(&self) -> &'static str {
        match self {
            PriceBand::Budget => "$45–74",
            PriceBand::Moderate => "$75–94",
            PriceBand::Upscale => "$95–114",
            PriceBand::Premium => "$115+",
        }
    }
}

impl std::fmt::Display for PriceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceBand {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Digits 1-4 stand in for the dollar signs on shells that expand `$`
        match s.trim() {
            "$" | "1" => Ok(PriceBand::Budget),
            "$$" | "2" => Ok(PriceBand::Moderate),
            "$$$" | "3" => Ok(PriceBand::Upscale),
            "$$$$" | "4" => Ok(PriceBand::Premium),
            _ => Err(ParseValueError::new("price band", s)),
        }
    }
}

/// Sort order for the venue list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    Suburb,
}

impl SortKey {
    pub const ALL: [SortKey; 5] =
        [SortKey::NameAsc, SortKey::NameDesc, SortKey::PriceAsc, SortKey::PriceDesc, SortKey::Suburb];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::NameAsc => "az",
            SortKey::NameDesc => "za",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::Suburb => "suburb",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::NameAsc => "Name A–Z",
            SortKey::NameDesc => "Name Z–A",
            SortKey::PriceAsc => "Price: low to high",
            SortKey::PriceDesc => "Price: high to low",
            SortKey::Suburb => "Suburb",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "az" | "a-z" | "name" => Ok(SortKey::NameAsc),
            "za" | "z-a" => Ok(SortKey::NameDesc),
            "price-asc" | "price-low" => Ok(SortKey::PriceAsc),
            "price-desc" | "price-high" => Ok(SortKey::PriceDesc),
            "suburb" => Ok(SortKey::Suburb),
            _ => Err(ParseValueError::new("sort key", s)),
        }
    }
}

impl TryFrom<String> for SortKey {
    type Error = ParseValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_band_boundaries() {
        assert_eq!(PriceBand::classify(44.0), None);
        assert_eq!(PriceBand::classify(44.99), None);
        assert_eq!(PriceBand::classify(45.0), Some(PriceBand::Budget));
        assert_eq!(PriceBand::classify(74.0), Some(PriceBand::Budget));
        assert_eq!(PriceBand::classify(74.5), Some(PriceBand::Budget));
        assert_eq!(PriceBand::classify(75.0), Some(PriceBand::Moderate));
        assert_eq!(PriceBand::classify(94.99), Some(PriceBand::Moderate));
        assert_eq!(PriceBand::classify(95.0), Some(PriceBand::Upscale));
        assert_eq!(PriceBand::classify(114.0), Some(PriceBand::Upscale));
        assert_eq!(PriceBand::classify(115.0), Some(PriceBand::Premium));
        assert_eq!(PriceBand::classify(400.0), Some(PriceBand::Premium));
        assert_eq!(PriceBand::classify(f64::NAN), None);
    }

    #[test]
    fn test_price_band_from_str() {
        assert_eq!("$$".parse::<PriceBand>().unwrap(), PriceBand::Moderate);
        assert_eq!(" $$$$ ".parse::<PriceBand>().unwrap(), PriceBand::Premium);
        assert!("$$$$$".parse::<PriceBand>().is_err());
        assert_eq!(PriceBand::Upscale.to_string(), "$$$");
    }

    #[test]
    fn test_price_band_digit_aliases() {
        assert_eq!("1".parse::<PriceBand>().unwrap(), PriceBand::Budget);
        assert_eq!("2".parse::<PriceBand>().unwrap(), PriceBand::Moderate);
        assert_eq!(" 3".parse::<PriceBand>().unwrap(), PriceBand::Upscale);
        assert_eq!("4".parse::<PriceBand>().unwrap(), PriceBand::Premium);
        assert!("0".parse::<PriceBand>().is_err());
        assert!("5".parse::<PriceBand>().is_err());
    }

    #[test]
    fn test_weekday_from_str() {
        assert_eq!("Saturday".parse::<Weekday>().unwrap(), Weekday::Sat);
        assert_eq!("sun".parse::<Weekday>().unwrap(), Weekday::Sun);
        assert_eq!("1".parse::<Weekday>().unwrap(), Weekday::Mon);
        assert_eq!("7".parse::<Weekday>().unwrap(), Weekday::Sun);
        assert!("0".parse::<Weekday>().is_err());
        assert!("Funday".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_weekday_set_toggle() {
        let mut set = WeekdaySet::empty();
        assert!(set.toggle(Weekday::Fri));
        assert!(set.contains(Weekday::Fri));
        assert!(!set.toggle(Weekday::Fri));
        assert!(set.is_empty());
    }

    #[test]
    fn test_weekday_set_intersects() {
        let weekend: WeekdaySet = [Weekday::Sat, Weekday::Sun].into_iter().collect();
        let friday: WeekdaySet = [Weekday::Fri].into_iter().collect();
        let sunday: WeekdaySet = [Weekday::Sun].into_iter().collect();
        assert!(!weekend.intersects(friday));
        assert!(weekend.intersects(sunday));
        assert_eq!(weekend.len(), 2);
    }

    #[test]
    fn test_describe_days() {
        let all: WeekdaySet = Weekday::ALL.into_iter().collect();
        assert_eq!(all.describe(), "Daily");

        let run: WeekdaySet = [Weekday::Fri, Weekday::Sat, Weekday::Sun].into_iter().collect();
        assert_eq!(run.describe(), "Fri – Sun");

        let pair: WeekdaySet = [Weekday::Sat, Weekday::Sun].into_iter().collect();
        assert_eq!(pair.describe(), "Sat – Sun");

        let split: WeekdaySet = [Weekday::Wed, Weekday::Sat].into_iter().collect();
        assert_eq!(split.describe(), "Wed & Sat");

        let scattered: WeekdaySet = [Weekday::Mon, Weekday::Wed, Weekday::Fri].into_iter().collect();
        assert_eq!(scattered.describe(), "Mon, Wed, Fri");

        assert_eq!(WeekdaySet::empty().describe(), "");
        assert_eq!([Weekday::Tue].into_iter().collect::<WeekdaySet>().describe(), "Tue");
    }

    #[test]
    fn test_deserialize_mixed_days() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(deserialize_with = "deserialize_days")]
            days: WeekdaySet,
        }

        let names: Holder = serde_json::from_str(r#"{"days": ["Saturday", "Sun"]}"#).unwrap();
        assert!(names.days.contains(Weekday::Sat));
        assert!(names.days.contains(Weekday::Sun));

        let indices: Holder = serde_json::from_str(r#"{"days": [1, 5, 9]}"#).unwrap();
        assert_eq!(indices.days.iter().collect::<Vec<_>>(), vec![Weekday::Mon, Weekday::Fri]);

        let junk: Holder = serde_json::from_str(r#"{"days": ["Someday", null]}"#).unwrap();
        assert!(junk.days.is_empty());
    }

    #[test]
    fn test_sort_key_aliases() {
        assert_eq!("price-low".parse::<SortKey>().unwrap(), SortKey::PriceAsc);
        assert_eq!("price-asc".parse::<SortKey>().unwrap(), SortKey::PriceAsc);
        assert_eq!("price-high".parse::<SortKey>().unwrap(), SortKey::PriceDesc);
        assert_eq!("ZA".parse::<SortKey>().unwrap(), SortKey::NameDesc);
        assert!("rating".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_venue_id_is_stable() {
        let a = VenueId::derive("Cafe A", "1 Beach Rd, Bondi");
        let b = VenueId::derive(" cafe a ", "1 BEACH RD, BONDI");
        let c = VenueId::derive("Cafe A", "Manly");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string().parse::<VenueId>().unwrap(), a);
    }

    #[test]
    fn test_venue_id_occurrence() {
        let base = VenueId::derive("The Grounds", "Bondi");
        assert_ne!(base.with_occurrence(2), base);
        assert_ne!(base.with_occurrence(2), base.with_occurrence(3));
        assert_eq!(base.with_occurrence(2), VenueId::derive("the grounds", "BONDI").with_occurrence(2));
    }
}
