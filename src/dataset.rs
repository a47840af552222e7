//! The loaded dataset and the filtered views queried from it.

use crate::aggregate::{self, AggregationResult};
use crate::derive::derive_all;
use crate::error::LoadError;
use crate::filter::{self, FilterCriteria};
use crate::loader;
use crate::types::{BikeRecord, RentalRecord, Season, Weather};
use std::path::Path;
use tracing::debug;

/// Derived records, loaded once and read-only afterwards. Every query runs
/// the filter and aggregation stages afresh against it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<BikeRecord>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        Ok(Self::from_records(loader::load(path)?))
    }

    pub fn from_records(raw: Vec<RentalRecord>) -> Self {
        let records = derive_all(raw);

        let unmapped_seasons = records
            .iter()
            .filter(|r| r.derived.season_name.is_unmapped())
            .count();
        let unmapped_weather = records
            .iter()
            .filter(|r| r.derived.weather_name.is_unmapped())
            .count();
        if unmapped_seasons > 0 || unmapped_weather > 0 {
            debug!(
                unmapped_seasons,
                unmapped_weather, "Records with codes outside the lookup tables"
            );
        }

        Self { records }
    }

    pub fn records(&self) -> &[BikeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn query(&self, criteria: &FilterCriteria) -> FilteredView {
        FilteredView {
            criteria: *criteria,
            records: filter::apply(&self.records, criteria),
        }
    }
}

/// The records matching one set of criteria. An empty view is a valid result.
#[derive(Debug, Clone)]
pub struct FilteredView {
    criteria: FilterCriteria,
    records: Vec<BikeRecord>,
}

impl FilteredView {
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn records(&self) -> &[BikeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn average_by_hour(&self) -> AggregationResult<u32> {
        aggregate::average_by_hour(&self.records)
    }

    pub fn average_by_season(&self) -> AggregationResult<Season> {
        aggregate::average_by_season(&self.records)
    }

    pub fn average_by_weather(&self) -> AggregationResult<Weather> {
        aggregate::average_by_weather(&self.records)
    }

    pub fn overall_mean(&self) -> Option<f64> {
        aggregate::overall_mean(&self.records)
    }
}
