//! Calendar fields and category labels computed from a raw record.

use crate::types::{BikeRecord, CodedCategory, DerivedFields, RentalRecord, Season, Weather};
use chrono::{Datelike, Timelike};

/// Attaches [`DerivedFields`] to `record`. Depends only on `datetime`,
/// `season` and `weather`.
pub fn derive(record: RentalRecord) -> BikeRecord {
    let dt = record.datetime;

    BikeRecord {
        raw: record,
        derived: DerivedFields {
            hour: dt.hour(),
            dayofweek: dt.weekday().num_days_from_monday(),
            month: dt.month(),
            year: dt.year(),
            season_name: Season::from_code(record.season),
            weather_name: Weather::from_code(record.weather),
        },
    }
}

pub fn derive_all(records: impl IntoIterator<Item = RentalRecord>) -> Vec<BikeRecord> {
    records.into_iter().map(derive).collect()
}

impl From<RentalRecord> for BikeRecord {
    fn from(record: RentalRecord) -> Self {
        derive(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use chrono::NaiveDate;

    fn record_at(y: i32, m: u32, d: u32, h: u32) -> RentalRecord {
        RentalRecord {
            datetime: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
            season: 1,
            weather: 1,
            holiday: 0,
            workingday: 1,
            temp: 10.0,
            atemp: 12.0,
            count: 10,
        }
    }

    #[test]
    fn test_calendar_fields() {
        // 2011-01-01 was a Saturday.
        let derived = derive(record_at(2011, 1, 1, 5)).derived;

        assert_eq!(derived.hour, 5);
        assert_eq!(derived.dayofweek, 5);
        assert_eq!(derived.month, 1);
        assert_eq!(derived.year, 2011);
    }

    #[test]
    fn test_monday_is_zero_and_sunday_is_six() {
        assert_eq!(derive(record_at(2011, 1, 3, 0)).derived.dayofweek, 0);
        assert_eq!(derive(record_at(2011, 1, 9, 23)).derived.dayofweek, 6);
    }

    #[test]
    fn test_every_valid_season_code_gets_one_name() {
        for code in 1..=4 {
            let mut record = record_at(2012, 6, 1, 12);
            record.season = code;
            let name = derive(record).derived.season_name.name();
            assert!(matches!(
                name,
                Some("Spring" | "Summer" | "Fall" | "Winter")
            ));
        }
    }

    #[test]
    fn test_unmapped_codes_keep_raw_value() {
        let mut record = record_at(2012, 6, 1, 12);
        record.season = 7;
        record.weather = 0;

        let derived = derive(record).derived;
        assert_eq!(derived.season_name, Category::Unmapped(7));
        assert_eq!(derived.weather_name, Category::Unmapped(0));
    }

    #[test]
    fn test_derive_is_idempotent() {
        let record = record_at(2012, 12, 19, 23);
        let once = derive(record);
        let twice = derive(once.raw);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_derive_all_preserves_order() {
        let records = vec![record_at(2012, 1, 1, 3), record_at(2011, 1, 1, 1)];
        let derived = derive_all(records);
        assert_eq!(derived[0].derived.hour, 3);
        assert_eq!(derived[1].derived.hour, 1);
    }
}
