//! Chart descriptions handed to a presentation adapter.
//!
//! A [`ChartSpec`] carries the table to plot together with the encoding of
//! each axis, the tooltip fields and the title. Adapters decide how to draw
//! it; nothing here depends on a rendering library.

use crate::aggregate::AggregationResult;
use crate::dataset::FilteredView;
use crate::filter::{ALL_SEASONS, ALL_WEATHER};
use crate::types::{BikeRecord, CodedCategory, Season, Weather};
use serde::Serialize;
use serde_json::{Value, json};

pub const DASHBOARD_TITLE: &str = "Bike Share Demand Analysis Dashboard";
pub const NO_DATA_MESSAGE: &str = "No data available for the selected filters.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Temporal,
    Quantitative,
    Ordinal,
    Nominal,
}

/// How one table column maps onto a visual channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Encoding {
    pub field: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'static str>,
}

impl Encoding {
    pub fn new(field: &'static str, field_type: FieldType) -> Self {
        Self {
            field,
            field_type,
            title: None,
        }
    }

    pub fn titled(mut self, title: &'static str) -> Self {
        self.title = Some(title);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: &'static str,
    pub x: Encoding,
    pub y: Encoding,
    pub tooltip: Vec<Encoding>,
    /// Explicit category order for the x axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<&'static str>>,
    pub interactive: bool,
    pub data: Vec<Value>,
}

/// What the presentation layer should show for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dashboard {
    NoData { message: &'static str },
    Charts(Vec<ChartSpec>),
}

impl Dashboard {
    /// The five dashboard charts for `view`, or the no-data state when the
    /// view is empty.
    #[tracing::instrument(skip_all, fields(rows = view.len()))]
    pub fn build(view: &FilteredView) -> Self {
        if view.is_empty() {
            tracing::warn!("No records match the selected filters");
            return Dashboard::NoData {
                message: NO_DATA_MESSAGE,
            };
        }

        Dashboard::Charts(vec![
            rentals_over_time(view.records()),
            hourly_average(&view.average_by_hour()),
            season_average(&view.average_by_season()),
            weather_average(&view.average_by_weather()),
            rentals_vs_temperature(view.records()),
        ])
    }

    pub fn charts(&self) -> &[ChartSpec] {
        match self {
            Dashboard::Charts(charts) => charts.as_slice(),
            Dashboard::NoData { .. } => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Dashboard::NoData { .. })
    }
}

fn count_axis(title: &'static str) -> Encoding {
    Encoding::new("count", FieldType::Quantitative).titled(title)
}

pub fn rentals_over_time(records: &[BikeRecord]) -> ChartSpec {
    let data = records
        .iter()
        .map(|r| {
            json!({
                "datetime": r.raw.datetime.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "count": r.raw.count,
            })
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Line,
        title: "Hourly Bike Rentals Over Time",
        x: Encoding::new("datetime", FieldType::Temporal).titled("Date and Time"),
        y: count_axis("Total Bike Rentals"),
        tooltip: vec![
            Encoding::new("datetime", FieldType::Temporal),
            Encoding::new("count", FieldType::Quantitative),
        ],
        sort: None,
        interactive: true,
        data,
    }
}

pub fn hourly_average(result: &AggregationResult<u32>) -> ChartSpec {
    let data = result
        .iter()
        .map(|g| json!({ "hour": g.key, "count": g.average }))
        .collect();

    ChartSpec {
        kind: ChartKind::Bar,
        title: "Average Bike Rentals by Hour of Day",
        x: Encoding::new("hour", FieldType::Ordinal).titled("Hour of Day"),
        y: count_axis("Average Bike Rentals"),
        tooltip: vec![
            Encoding::new("hour", FieldType::Ordinal),
            Encoding::new("count", FieldType::Quantitative),
        ],
        sort: None,
        interactive: false,
        data,
    }
}

pub fn season_average(result: &AggregationResult<Season>) -> ChartSpec {
    let data = result
        .iter()
        .map(|g| json!({ "season_name": g.key.name(), "count": g.average }))
        .collect();

    ChartSpec {
        kind: ChartKind::Bar,
        title: "Average Bike Rentals by Season",
        x: Encoding::new("season_name", FieldType::Nominal).titled("Season"),
        y: count_axis("Average Bike Rentals"),
        tooltip: vec![
            Encoding::new("season_name", FieldType::Nominal),
            Encoding::new("count", FieldType::Quantitative),
        ],
        sort: Some(category_names::<Season>()),
        interactive: false,
        data,
    }
}

pub fn weather_average(result: &AggregationResult<Weather>) -> ChartSpec {
    let data = result
        .iter()
        .map(|g| json!({ "weather_name": g.key.name(), "count": g.average }))
        .collect();

    ChartSpec {
        kind: ChartKind::Bar,
        title: "Average Bike Rentals by Weather Condition",
        x: Encoding::new("weather_name", FieldType::Nominal).titled("Weather Condition"),
        y: count_axis("Average Bike Rentals"),
        tooltip: vec![
            Encoding::new("weather_name", FieldType::Nominal),
            Encoding::new("count", FieldType::Quantitative),
        ],
        sort: Some(category_names::<Weather>()),
        interactive: false,
        data,
    }
}

pub fn rentals_vs_temperature(records: &[BikeRecord]) -> ChartSpec {
    let data = records
        .iter()
        .map(|r| {
            json!({
                "temp": r.raw.temp,
                "atemp": r.raw.atemp,
                "count": r.raw.count,
            })
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Point,
        title: "Bike Rentals vs Temperature",
        x: Encoding::new("temp", FieldType::Quantitative).titled("Temperature (Celsius)"),
        y: count_axis("Total Bike Rentals"),
        tooltip: vec![
            Encoding::new("temp", FieldType::Quantitative),
            Encoding::new("atemp", FieldType::Quantitative),
            Encoding::new("count", FieldType::Quantitative),
        ],
        sort: None,
        interactive: true,
        data,
    }
}

fn category_names<T: CodedCategory>() -> Vec<&'static str> {
    T::display_order().into_iter().map(T::name).collect()
}

/// Values offered by the season selector.
pub fn season_options() -> Vec<&'static str> {
    std::iter::once(ALL_SEASONS)
        .chain(category_names::<Season>())
        .collect()
}

/// Values offered by the weather selector.
pub fn weather_options() -> Vec<&'static str> {
    std::iter::once(ALL_WEATHER)
        .chain(category_names::<Weather>())
        .collect()
}
