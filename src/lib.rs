//! Filtering and aggregation pipeline behind the bike share demand dashboard.
//!
//! Records are loaded once into a [`Dataset`], derived fields are attached,
//! and each query filters the dataset and averages rentals by hour, season
//! and weather. The resulting [`Dashboard`] is a plain data description that
//! any renderer can draw.

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod derive;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod types;

pub use chart::{ChartSpec, Dashboard};
pub use dataset::{Dataset, FilteredView};
pub use error::{LoadError, SchemaError, SelectionError};
pub use filter::FilterCriteria;
pub use types::{BikeRecord, Category, RentalRecord, Season, Weather};
