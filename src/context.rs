use log::info;
use polars::prelude::*;

use crate::aggregation::{self, AggregationResult, Dimension, Mode};
use crate::config::DashboardConfig;
use crate::dataset;
use crate::demographics::extract_demographics_with;
use crate::error::DashboardError;
use crate::schema::transaction::PURCHASE;

/// Immutable tables shared by every aggregation call.
///
/// Built once at startup and passed by reference; nothing mutates it
/// afterwards, so it can be shared across threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct DataContext {
    transactions: DataFrame,
    demographics: DataFrame,
    require_non_empty: bool,
}

impl DataContext {
    /// Load the transaction file named by `config` and derive the
    /// demographic table. Any load error is fatal.
    pub fn load(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let transactions = dataset::load_with(&config.data_path, &config.load_options())?;
        Self::from_transactions(transactions, config)
    }

    /// Build a context from an already normalized transaction table.
    pub fn from_transactions(
        transactions: DataFrame,
        config: &DashboardConfig,
    ) -> Result<Self, DashboardError> {
        let demographics = extract_demographics_with(&transactions, config.consistency)?;
        info!(
            "Data context ready: {} transactions, {} customers",
            transactions.height(),
            demographics.height()
        );
        Ok(Self {
            transactions,
            demographics,
            require_non_empty: config.require_non_empty,
        })
    }

    pub fn transactions(&self) -> &DataFrame {
        &self.transactions
    }

    pub fn demographics(&self) -> &DataFrame {
        &self.demographics
    }

    pub fn record_count(&self) -> usize {
        self.transactions.height()
    }

    pub fn customer_count(&self) -> usize {
        self.demographics.height()
    }

    pub fn total_purchase(&self) -> Result<f64, DashboardError> {
        let purchases = self.transactions.column(PURCHASE)?.as_materialized_series();
        Ok(purchases.f64()?.sum().unwrap_or(0.0))
    }

    /// Aggregate one (dimension, mode) pair. Fails with
    /// [`DashboardError::EmptyInput`] on an empty result when the context was
    /// configured with `require_non_empty`.
    pub fn aggregate(
        &self,
        dimension: Dimension,
        mode: Mode,
    ) -> Result<AggregationResult, DashboardError> {
        let result = aggregation::aggregate(self, dimension, mode)?;
        if self.require_non_empty {
            result.non_empty()
        } else {
            Ok(result)
        }
    }

    /// Aggregate from the names a UI sends, e.g. (`"Gender"`, `"counter"`).
    pub fn aggregate_by_name(
        &self,
        dimension: &str,
        mode: &str,
    ) -> Result<AggregationResult, DashboardError> {
        self.aggregate(Dimension::from_name(dimension)?, Mode::from_name(mode)?)
    }

    /// Every panel's chart data for one selector state, in panel order.
    pub fn panels(&self, mode: Mode) -> Result<Vec<AggregationResult>, DashboardError> {
        Dimension::ALL
            .iter()
            .map(|&dimension| self.aggregate(dimension, mode))
            .collect()
    }
}
