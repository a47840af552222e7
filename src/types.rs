//! Data types shared by the loading, filtering and aggregation stages.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::Hash;

/// One row of the source table: aggregate rentals within a one-hour window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RentalRecord {
    pub datetime: NaiveDateTime,
    pub season: i64,
    pub weather: i64,
    pub holiday: u8,
    pub workingday: u8,
    pub temp: f64,
    pub atemp: f64,
    pub count: u64,
}

/// A category decoded from an integer code through a fixed lookup table.
///
/// Implementors list their codes in `TABLE`; the table order doubles as the
/// display order used by the charts.
pub trait CodedCategory: Copy + Eq + Hash + fmt::Debug + 'static {
    const TABLE: &'static [(i64, Self)];

    fn name(self) -> &'static str;

    fn from_code(code: i64) -> Category<Self> {
        Self::TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, value)| Category::Named(*value))
            .unwrap_or(Category::Unmapped(code))
    }

    /// Exact, case-sensitive match against the category names.
    fn from_name(name: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .map(|(_, value)| *value)
            .find(|value| value.name() == name)
    }

    fn display_order() -> Vec<Self> {
        Self::TABLE.iter().map(|(_, value)| *value).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl CodedCategory for Season {
    const TABLE: &'static [(i64, Self)] = &[
        (1, Season::Spring),
        (2, Season::Summer),
        (3, Season::Fall),
        (4, Season::Winter),
    ];

    fn name(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weather {
    Clear,
    Misty,
    LightSnowRain,
    HeavySnowRain,
}

impl CodedCategory for Weather {
    const TABLE: &'static [(i64, Self)] = &[
        (1, Weather::Clear),
        (2, Weather::Misty),
        (3, Weather::LightSnowRain),
        (4, Weather::HeavySnowRain),
    ];

    fn name(self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Misty => "Misty",
            Weather::LightSnowRain => "Light Snow/Rain",
            Weather::HeavySnowRain => "Heavy Snow/Rain",
        }
    }
}

macro_rules! display_by_name {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.name())
                }
            }

            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.name())
                }
            }
        )*
    };
}

display_by_name!(Season, Weather);

/// Result of a category lookup. `Unmapped` keeps the raw code of a value
/// outside the lookup table; it never equals any named category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category<T> {
    Named(T),
    Unmapped(i64),
}

impl<T: CodedCategory> Category<T> {
    pub fn named(self) -> Option<T> {
        match self {
            Category::Named(value) => Some(value),
            Category::Unmapped(_) => None,
        }
    }

    pub fn is_unmapped(self) -> bool {
        matches!(self, Category::Unmapped(_))
    }

    pub fn name(self) -> Option<&'static str> {
        self.named().map(T::name)
    }
}

// Unmapped categories serialize as null, like a missing label in a table.
impl<T: CodedCategory> Serialize for Category<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Category::Named(value) => serializer.serialize_str(value.name()),
            Category::Unmapped(_) => serializer.serialize_none(),
        }
    }
}

/// Calendar and label fields computed from a [`RentalRecord`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFields {
    pub hour: u32,
    /// Monday = 0 ... Sunday = 6.
    pub dayofweek: u32,
    pub month: u32,
    pub year: i32,
    pub season_name: Category<Season>,
    pub weather_name: Category<Weather>,
}

/// A rental record with its derived fields attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BikeRecord {
    pub raw: RentalRecord,
    pub derived: DerivedFields,
}

impl BikeRecord {
    pub fn count(&self) -> u64 {
        self.raw.count
    }
}
