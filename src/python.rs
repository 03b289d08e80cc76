//! Python bindings (feature `python`), so a Python UI can drive the charts
//! from the Rust core.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyModule;
use pyo3_polars::PyDataFrame;

use crate::aggregation::{AggregationResult, Mode};
use crate::config::{DashboardConfig, VisualizationConfig};
use crate::context::DataContext;
use crate::demographics::ConsistencyPolicy;
use crate::schema;
use crate::visualization;

#[pyclass(name = "AggregationResult")]
pub struct PyAggregationResult {
    #[pyo3(get)]
    dimension: String,
    #[pyo3(get)]
    mode: String,
    #[pyo3(get)]
    title: String,
    #[pyo3(get)]
    labels: Vec<String>,
    #[pyo3(get)]
    values: Vec<f64>,
}

impl From<AggregationResult> for PyAggregationResult {
    fn from(result: AggregationResult) -> Self {
        Self {
            dimension: result.dimension.display_name().to_string(),
            mode: result.mode.selector_value().to_string(),
            title: result.title,
            labels: result.labels,
            values: result.values,
        }
    }
}

#[pymethods]
impl PyAggregationResult {
    fn __len__(&self) -> usize {
        self.labels.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "AggregationResult(title={:?}, categories={})",
            self.title,
            self.labels.len()
        )
    }
}

#[pyclass(name = "Dashboard")]
pub struct PyDashboard {
    ctx: DataContext,
    visualization: VisualizationConfig,
}

#[pymethods]
impl PyDashboard {
    /// Load the transaction file and build the demographic table.
    ///
    /// Raises RuntimeError if the file is missing or malformed.
    #[new]
    #[pyo3(signature = (path=None, separator=",", strict=false, require_non_empty=false))]
    fn new(
        path: Option<&str>,
        separator: &str,
        strict: bool,
        require_non_empty: bool,
    ) -> PyResult<Self> {
        let separator = match separator.as_bytes() {
            [b] => *b,
            _ => {
                return Err(PyValueError::new_err(
                    "separator must be a single ASCII character",
                ))
            }
        };

        let mut config = DashboardConfig::default()
            .with_separator(separator)
            .with_require_non_empty(require_non_empty)
            .with_consistency(if strict {
                ConsistencyPolicy::Strict
            } else {
                ConsistencyPolicy::FirstWins
            });
        if let Some(path) = path {
            config = config.with_data_path(path);
        }

        let ctx = DataContext::load(&config)?;
        Ok(Self {
            ctx,
            visualization: config.visualization,
        })
    }

    /// Chart data for one dimension and selector value,
    /// e.g. `aggregate("Gender", "counter")`.
    fn aggregate(&self, dimension: &str, mode: &str) -> PyResult<PyAggregationResult> {
        Ok(self.ctx.aggregate_by_name(dimension, mode)?.into())
    }

    /// Chart data of all five panels for one selector value.
    fn panels(&self, mode: &str) -> PyResult<Vec<PyAggregationResult>> {
        let mode = Mode::from_name(mode)?;
        Ok(self
            .ctx
            .panels(mode)?
            .into_iter()
            .map(PyAggregationResult::from)
            .collect())
    }

    /// Self-contained dashboard HTML.
    /// Use with `IPython.display.HTML(dashboard.render_html())` in Jupyter.
    #[pyo3(signature = (default_mode="counter"))]
    fn render_html(&self, default_mode: &str) -> PyResult<String> {
        let config = VisualizationConfig {
            default_mode: Mode::from_name(default_mode)?,
            ..self.visualization.clone()
        };
        Ok(visualization::generate_dashboard_html(&self.ctx, &config)?)
    }

    #[getter]
    fn transactions_df(&self) -> PyDataFrame {
        PyDataFrame(self.ctx.transactions().clone())
    }

    #[getter]
    fn demographics_df(&self) -> PyDataFrame {
        PyDataFrame(self.ctx.demographics().clone())
    }

    #[getter]
    fn customer_count(&self) -> usize {
        self.ctx.customer_count()
    }

    #[getter]
    fn record_count(&self) -> usize {
        self.ctx.record_count()
    }
}

/// Export dimension column names and selector values as Python submodules.
fn add_name_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let dimensions = PyModule::new(m.py(), "dimensions")?;
    dimensions.add("GENDER", schema::transaction::GENDER)?;
    dimensions.add("MARITAL_STATUS", schema::transaction::MARITAL_STATUS)?;
    dimensions.add("AGE", schema::transaction::AGE)?;
    dimensions.add("CITY_CATEGORY", schema::transaction::CITY_CATEGORY)?;
    dimensions.add("OCCUPATION", schema::transaction::OCCUPATION)?;
    m.add_submodule(&dimensions)?;

    let modes = PyModule::new(m.py(), "modes")?;
    modes.add("COUNTER", schema::mode::COUNTER)?;
    modes.add("PURCHASE", schema::mode::PURCHASE)?;
    modes.add("PRODUCTS", schema::mode::PRODUCTS)?;
    m.add_submodule(&modes)?;

    Ok(())
}

#[pymodule]
fn shopper_insights(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDashboard>()?;
    m.add_class::<PyAggregationResult>()?;
    add_name_exports(m)?;
    Ok(())
}
