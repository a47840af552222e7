//! Grouped averages of the rental count.

use crate::types::{BikeRecord, CodedCategory, Season, Weather};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean rental count of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverage<K> {
    pub key: K,
    pub average: f64,
    pub size: usize,
}

/// Ordered group averages. Only groups with at least one member appear.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregationResult<K> {
    groups: Vec<GroupAverage<K>>,
}

impl<K: PartialEq> AggregationResult<K> {
    pub fn groups(&self) -> &[GroupAverage<K>] {
        &self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupAverage<K>> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.iter().map(|g| &g.key)
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.groups
            .iter()
            .find(|g| &g.key == key)
            .map(|g| g.average)
    }

    /// Group averages weighted by group size. Equal to the plain mean over
    /// every grouped record.
    pub fn weighted_mean(&self) -> Option<f64> {
        let total: usize = self.groups.iter().map(|g| g.size).sum();
        if total == 0 {
            return None;
        }
        let weighted: f64 = self
            .groups
            .iter()
            .map(|g| g.average * g.size as f64)
            .sum();
        Some(weighted / total as f64)
    }
}

#[derive(Default)]
struct Accumulator {
    sum: u64,
    size: usize,
}

/// Groups `records` by `key` and averages `count` per group.
///
/// Records whose key is `None` belong to no group. With `display_order`, groups
/// are emitted in that order and categories without members are skipped; any
/// key missing from `display_order` follows in ascending order. Without it,
/// groups come out in ascending key order.
pub fn average_by<K, F>(
    records: &[BikeRecord],
    key: F,
    display_order: Option<&[K]>,
) -> AggregationResult<K>
where
    K: Copy + Ord,
    F: Fn(&BikeRecord) -> Option<K>,
{
    let mut buckets: BTreeMap<K, Accumulator> = BTreeMap::new();

    for record in records {
        if let Some(k) = key(record) {
            let acc = buckets.entry(k).or_default();
            acc.sum += record.count();
            acc.size += 1;
        }
    }

    let mut groups = Vec::with_capacity(buckets.len());

    if let Some(order) = display_order {
        for k in order {
            if let Some(acc) = buckets.remove(k) {
                groups.push(to_group(*k, acc));
            }
        }
    }

    groups.extend(buckets.into_iter().map(|(k, acc)| to_group(k, acc)));

    AggregationResult { groups }
}

fn to_group<K>(key: K, acc: Accumulator) -> GroupAverage<K> {
    GroupAverage {
        key,
        average: acc.sum as f64 / acc.size as f64,
        size: acc.size,
    }
}

pub fn average_by_hour(records: &[BikeRecord]) -> AggregationResult<u32> {
    average_by(records, |r| Some(r.derived.hour), None)
}

/// Averages per season, Spring through Winter. Unmapped seasons are skipped.
pub fn average_by_season(records: &[BikeRecord]) -> AggregationResult<Season> {
    let order = Season::display_order();
    average_by(records, |r| r.derived.season_name.named(), Some(order.as_slice()))
}

/// Averages per weather condition, Clear through Heavy Snow/Rain. Unmapped
/// conditions are skipped.
pub fn average_by_weather(records: &[BikeRecord]) -> AggregationResult<Weather> {
    let order = Weather::display_order();
    average_by(records, |r| r.derived.weather_name.named(), Some(order.as_slice()))
}

/// Mean `count` over all records, `None` when there are none.
pub fn overall_mean(records: &[BikeRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let sum: u64 = records.iter().map(BikeRecord::count).sum();
    Some(sum as f64 / records.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;
    use crate::types::RentalRecord;
    use chrono::NaiveDate;

    fn record(hour: u32, season: i64, weather: i64, count: u64) -> BikeRecord {
        derive(RentalRecord {
            datetime: NaiveDate::from_ymd_opt(2012, 5, 14)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            season,
            weather,
            holiday: 0,
            workingday: 1,
            temp: 20.5,
            atemp: 24.2,
            count,
        })
    }

    fn sample() -> Vec<BikeRecord> {
        vec![
            record(8, 3, 1, 300),
            record(17, 1, 2, 120),
            record(8, 3, 2, 280),
            record(0, 4, 3, 15),
            record(17, 2, 1, 410),
            record(3, 1, 1, 7),
            record(17, 6, 8, 90),
        ]
    }

    #[test]
    fn test_same_hour_is_averaged() {
        let records = vec![record(5, 1, 1, 4), record(5, 1, 1, 6)];
        let result = average_by_hour(&records);

        assert_eq!(result.len(), 1);
        assert_eq!(result.groups()[0].key, 5);
        assert_eq!(result.groups()[0].average, 5.0);
        assert_eq!(result.groups()[0].size, 2);
    }

    #[test]
    fn test_hours_are_ascending() {
        let result = average_by_hour(&sample());
        let keys: Vec<u32> = result.keys().copied().collect();
        assert_eq!(keys, vec![0, 3, 8, 17]);
        assert_eq!(result.get(&17), Some((120.0 + 410.0 + 90.0) / 3.0));
    }

    #[test]
    fn test_season_follows_display_order_and_skips_unmapped() {
        let result = average_by_season(&sample());
        let keys: Vec<Season> = result.keys().copied().collect();

        assert_eq!(
            keys,
            vec![Season::Spring, Season::Summer, Season::Fall, Season::Winter]
        );
        assert_eq!(result.get(&Season::Fall), Some(290.0));
        assert_eq!(result.iter().map(|g| g.size).sum::<usize>(), 6);
    }

    #[test]
    fn test_absent_categories_are_omitted() {
        let records = vec![record(1, 4, 4, 2), record(2, 2, 4, 4)];

        let seasons: Vec<Season> = average_by_season(&records).keys().copied().collect();
        assert_eq!(seasons, vec![Season::Summer, Season::Winter]);

        let weather = average_by_weather(&records);
        assert_eq!(weather.len(), 1);
        assert_eq!(weather.get(&Weather::HeavySnowRain), Some(3.0));
        assert_eq!(weather.get(&Weather::Clear), None);
    }

    #[test]
    fn test_keys_outside_display_order_are_kept() {
        let records = sample();
        let result = average_by(&records, |r| Some(r.derived.hour), Some(&[17, 0][..]));
        let keys: Vec<u32> = result.keys().copied().collect();
        assert_eq!(keys, vec![17, 0, 3, 8]);
    }

    #[test]
    fn test_empty_input_gives_empty_result() {
        assert!(average_by_hour(&[]).is_empty());
        assert!(average_by_season(&[]).is_empty());
        assert!(average_by_weather(&[]).is_empty());
        assert_eq!(overall_mean(&[]), None);
        assert_eq!(average_by_hour(&[]).weighted_mean(), None);
    }

    #[test]
    fn test_weighted_mean_matches_overall_mean() {
        let records = sample();
        let overall = overall_mean(&records).unwrap();

        let by_hour = average_by_hour(&records).weighted_mean().unwrap();
        assert!((by_hour - overall).abs() < 1e-9);

        // The unmapped record is excluded from the season grouping.
        let mapped: Vec<BikeRecord> = records
            .iter()
            .copied()
            .filter(|r| !r.derived.season_name.is_unmapped())
            .collect();
        let by_season = average_by_season(&records).weighted_mean().unwrap();
        assert!((by_season - overall_mean(&mapped).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn test_every_present_group_appears_once() {
        let records = sample();
        let result = average_by_weather(&records);

        for r in &records {
            if let Some(w) = r.derived.weather_name.named() {
                assert_eq!(result.keys().filter(|k| **k == w).count(), 1);
            }
        }
        assert!(result.keys().all(|k| records
            .iter()
            .any(|r| r.derived.weather_name.named() == Some(*k))));
    }

    #[test]
    fn test_serializes_as_list_of_groups() {
        let records = vec![record(5, 1, 1, 4)];
        let json = serde_json::to_value(average_by_season(&records)).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "key": "Spring", "average": 4.0, "size": 1 }])
        );
    }
}
