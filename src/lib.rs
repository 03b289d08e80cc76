//! Aggregation core of the Black Friday customer dashboard.
//!
//! Loads the transaction file once into an immutable [`DataContext`],
//! derives the per-customer demographic table, and computes the chart data
//! for every (dimension, mode) pair the dashboard selector can ask for.

pub mod aggregation;
pub mod categories;
pub mod config;
pub mod context;
pub mod dataset;
pub mod demographics;
pub mod error;
pub mod schema;
pub mod visualization;

#[cfg(feature = "python")]
mod python;

#[cfg(test)]
mod testing;

pub use aggregation::{aggregate, aggregate_by_name, AggregationResult, ChartKind, Dimension, Mode};
pub use config::{DashboardConfig, VisualizationConfig};
pub use context::DataContext;
pub use dataset::{load, load_with, LoadOptions};
pub use demographics::{extract_demographics, extract_demographics_with, ConsistencyPolicy};
pub use error::{DashboardError, LoadError};
pub use visualization::{generate_dashboard_html, write_dashboard_html};
