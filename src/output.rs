//! Presentation adapters for the dashboard.
//!
//! Supports a JSON chart document, a plain-text summary, and CSV export of the
//! filtered records.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use serde_json::{Value, json};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::chart::{ChartKind, ChartSpec, DASHBOARD_TITLE, Dashboard};
use crate::types::BikeRecord;

/// A surface that draws charts handed to it one at a time.
pub trait Renderer {
    fn render_chart(&mut self, chart: &ChartSpec) -> Result<()>;

    /// Shown instead of any chart when the filters leave nothing to plot.
    fn render_no_data(&mut self, message: &str) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Feeds every part of `dashboard` to `renderer`, then finishes it.
pub fn render_dashboard<R: Renderer + ?Sized>(
    renderer: &mut R,
    dashboard: &Dashboard,
) -> Result<()> {
    match dashboard {
        Dashboard::NoData { message } => renderer.render_no_data(message)?,
        Dashboard::Charts(charts) => {
            for chart in charts {
                debug!(title = chart.title, rows = chart.data.len(), "Rendering chart");
                renderer.render_chart(chart)?;
            }
        }
    }
    renderer.finish()
}

/// Writes the dashboard as one pretty-printed JSON document.
pub struct JsonRenderer<W: Write> {
    writer: W,
    charts: Vec<Value>,
    no_data: Option<String>,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            charts: Vec::new(),
            no_data: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render_chart(&mut self, chart: &ChartSpec) -> Result<()> {
        self.charts.push(serde_json::to_value(chart)?);
        Ok(())
    }

    fn render_no_data(&mut self, message: &str) -> Result<()> {
        self.no_data = Some(message.to_string());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let document = match self.no_data.take() {
            Some(message) => json!({ "title": DASHBOARD_TITLE, "no_data": message }),
            None => json!({
                "title": DASHBOARD_TITLE,
                "charts": std::mem::take(&mut self.charts),
            }),
        };

        serde_json::to_writer_pretty(&mut self.writer, &document)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes a terminal-friendly summary: aggregated charts as tables, raw
/// series as a row count.
pub struct TextRenderer<W: Write> {
    writer: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render_chart(&mut self, chart: &ChartSpec) -> Result<()> {
        writeln!(self.writer, "== {} ==", chart.title)?;

        let x_title = chart.x.title.unwrap_or(chart.x.field);
        let y_title = chart.y.title.unwrap_or(chart.y.field);

        match chart.kind {
            ChartKind::Bar => {
                writeln!(self.writer, "{:<24}{}", x_title, y_title)?;
                for row in &chart.data {
                    let label = cell_text(row.get(chart.x.field));
                    let value = row
                        .get(chart.y.field)
                        .and_then(Value::as_f64)
                        .unwrap_or(f64::NAN);
                    writeln!(self.writer, "{:<24}{:.2}", label, value)?;
                }
            }
            ChartKind::Line | ChartKind::Point => {
                writeln!(
                    self.writer,
                    "{} rows ({} vs {})",
                    chart.data.len(),
                    x_title,
                    y_title
                )?;
            }
        }

        writeln!(self.writer)?;
        Ok(())
    }

    fn render_no_data(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{message}")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// One filtered record as written to CSV: raw columns, then derived ones.
#[derive(Debug, Serialize)]
struct ExportRow {
    datetime: String,
    season: i64,
    weather: i64,
    holiday: u8,
    workingday: u8,
    temp: f64,
    atemp: f64,
    count: u64,
    hour: u32,
    dayofweek: u32,
    month: u32,
    year: i32,
    season_name: Option<&'static str>,
    weather_name: Option<&'static str>,
}

impl From<&BikeRecord> for ExportRow {
    fn from(r: &BikeRecord) -> Self {
        Self {
            datetime: r.raw.datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            season: r.raw.season,
            weather: r.raw.weather,
            holiday: r.raw.holiday,
            workingday: r.raw.workingday,
            temp: r.raw.temp,
            atemp: r.raw.atemp,
            count: r.raw.count,
            hour: r.derived.hour,
            dayofweek: r.derived.dayofweek,
            month: r.derived.month,
            year: r.derived.year,
            season_name: r.derived.season_name.name(),
            weather_name: r.derived.weather_name.name(),
        }
    }
}

/// Writes `records` to a new CSV file at `path`, replacing any existing one.
pub fn write_filtered_csv(path: &Path, records: &[BikeRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;

    for record in records {
        writer.serialize(ExportRow::from(record))?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = records.len(), "Filtered records written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::NO_DATA_MESSAGE;
    use crate::dataset::Dataset;
    use crate::filter::FilterCriteria;
    use crate::types::{RentalRecord, Season};
    use chrono::NaiveDate;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    fn dataset() -> Dataset {
        let record = |hour, season, count| RentalRecord {
            datetime: NaiveDate::from_ymd_opt(2012, 2, 14)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            season,
            weather: 1,
            holiday: 0,
            workingday: 1,
            temp: 8.2,
            atemp: 9.85,
            count,
        };
        Dataset::from_records(vec![record(8, 1, 230), record(9, 1, 115), record(9, 0, 5)])
    }

    fn render_text(dashboard: &Dashboard) -> String {
        let mut renderer = TextRenderer::new(Vec::new());
        render_dashboard(&mut renderer, dashboard).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_text_renderer_prints_bar_rows() {
        let view = dataset().query(&FilterCriteria::default());
        let text = render_text(&Dashboard::build(&view));

        assert!(text.contains("== Average Bike Rentals by Hour of Day =="));
        assert!(text.contains("230.00"));
        assert!(text.contains("60.00"));
        assert!(text.contains("3 rows (Date and Time vs Total Bike Rentals)"));
        assert!(text.contains("Spring"));
        assert!(text.contains("172.50"));
    }

    #[test]
    fn test_text_renderer_no_data() {
        let view = dataset().query(&FilterCriteria {
            season: Some(Season::Summer),
            ..Default::default()
        });
        let text = render_text(&Dashboard::build(&view));
        assert_eq!(text.trim(), NO_DATA_MESSAGE);
    }

    #[test]
    fn test_json_renderer_writes_all_charts() {
        let view = dataset().query(&FilterCriteria::default());
        let mut renderer = JsonRenderer::new(Vec::new());
        render_dashboard(&mut renderer, &Dashboard::build(&view)).unwrap();

        let document: Value = serde_json::from_slice(&renderer.into_inner()).unwrap();
        assert_eq!(document["title"], DASHBOARD_TITLE);
        assert_eq!(document["charts"].as_array().unwrap().len(), 5);
        assert_eq!(document["charts"][1]["kind"], "bar");
        assert_eq!(document["charts"][1]["x"]["field"], "hour");
        assert_eq!(document["charts"][2]["sort"][0], "Spring");
    }

    #[test]
    fn test_json_renderer_no_data() {
        let mut renderer = JsonRenderer::new(Vec::new());
        let dashboard = Dashboard::NoData {
            message: NO_DATA_MESSAGE,
        };
        render_dashboard(&mut renderer, &dashboard).unwrap();

        let document: Value = serde_json::from_slice(&renderer.into_inner()).unwrap();
        assert_eq!(document["no_data"], NO_DATA_MESSAGE);
        assert!(document.get("charts").is_none());
    }

    #[test]
    fn test_write_filtered_csv() {
        let path = temp_path("bike_share_dashboard_test_filtered.csv");
        let _ = fs::remove_file(&path);

        let dataset = dataset();
        write_filtered_csv(&path, dataset.records()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("datetime,season,weather"));
        assert!(lines[0].ends_with("season_name,weather_name"));
        assert!(lines[1].starts_with("2012-02-14 08:00:00,1,1,0,1"));
        assert!(lines[1].ends_with("Spring,Clear"));
        // Unmapped season leaves the label empty.
        assert!(lines[3].ends_with(",,Clear"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_filtered_csv_overwrites() {
        let path = temp_path("bike_share_dashboard_test_overwrite.csv");
        let _ = fs::remove_file(&path);

        let dataset = dataset();
        write_filtered_csv(&path, dataset.records()).unwrap();
        write_filtered_csv(&path, &dataset.records()[..1]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);

        fs::remove_file(&path).unwrap();
    }
}
