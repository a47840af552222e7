//! Filter criteria and the predicates they expand into.

use crate::error::SelectionError;
use crate::types::{BikeRecord, Category, CodedCategory, Season, Weather};

/// Selector value meaning "no season constraint".
pub const ALL_SEASONS: &str = "All Seasons";
/// Selector value meaning "no weather constraint".
pub const ALL_WEATHER: &str = "All Weather";

/// User-selected constraints on the working dataset. `None` means "all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCriteria {
    pub season: Option<Season>,
    pub weather: Option<Weather>,
    pub include_holidays: bool,
    pub include_workingdays: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            season: None,
            weather: None,
            include_holidays: true,
            include_workingdays: true,
        }
    }
}

impl FilterCriteria {
    /// Builds criteria from selector strings. `"All Seasons"`, `"All Weather"`
    /// and `"all"` (any case) clear the constraint; anything else must be an
    /// exact category name.
    pub fn from_selectors(
        season: &str,
        weather: &str,
        include_holidays: bool,
        include_workingdays: bool,
    ) -> Result<Self, SelectionError> {
        let season = match season {
            s if is_all(s, ALL_SEASONS) => None,
            s => Some(
                Season::from_name(s).ok_or_else(|| SelectionError::UnknownSeason(s.to_string()))?,
            ),
        };

        let weather = match weather {
            w if is_all(w, ALL_WEATHER) => None,
            w => Some(
                Weather::from_name(w)
                    .ok_or_else(|| SelectionError::UnknownWeather(w.to_string()))?,
            ),
        };

        Ok(Self {
            season,
            weather,
            include_holidays,
            include_workingdays,
        })
    }

    /// The independent predicates these criteria stand for, in the order
    /// season, weather, holidays, working days.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::with_capacity(4);

        if let Some(season) = self.season {
            predicates.push(Predicate::Season(season));
        }
        if let Some(weather) = self.weather {
            predicates.push(Predicate::Weather(weather));
        }
        if !self.include_holidays {
            predicates.push(Predicate::ExcludeHolidays);
        }
        if !self.include_workingdays {
            predicates.push(Predicate::ExcludeWorkingDays);
        }

        predicates
    }
}

fn is_all(value: &str, label: &str) -> bool {
    value == label || value.eq_ignore_ascii_case("all")
}

/// A single row filter. The exclusion predicates keep only rows whose flag is
/// exactly 0. Predicates do not depend on each other, so any
/// application order gives the same result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Season(Season),
    Weather(Weather),
    ExcludeHolidays,
    ExcludeWorkingDays,
}

impl Predicate {
    pub fn matches(&self, record: &BikeRecord) -> bool {
        match self {
            Predicate::Season(season) => record.derived.season_name == Category::Named(*season),
            Predicate::Weather(weather) => {
                record.derived.weather_name == Category::Named(*weather)
            }
            Predicate::ExcludeHolidays => record.raw.holiday == 0,
            Predicate::ExcludeWorkingDays => record.raw.workingday == 0,
        }
    }
}

/// Returns the records satisfying every criterion, in their original order.
#[tracing::instrument(skip(records), fields(input = records.len()))]
pub fn apply(records: &[BikeRecord], criteria: &FilterCriteria) -> Vec<BikeRecord> {
    let filtered = apply_predicates(records, &criteria.predicates());
    tracing::debug!(output = filtered.len(), "Filters applied");
    filtered
}

/// Applies `predicates` one after another, each narrowing the previous result.
pub fn apply_predicates(records: &[BikeRecord], predicates: &[Predicate]) -> Vec<BikeRecord> {
    let mut current = records.to_vec();

    for predicate in predicates {
        current.retain(|r| predicate.matches(r));
    }

    current
}
