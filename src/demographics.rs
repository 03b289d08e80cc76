//! Per-customer demographic view.
//!
//! A customer appears once per purchased product in the transaction table, so
//! grouping cannot recover demographics; instead the first row seen for each
//! `User_ID` is kept.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use polars::prelude::*;

use crate::error::DashboardError;
use crate::schema::demographic;
use crate::schema::transaction::USER_ID;

/// What to do when a customer's rows disagree on a demographic field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsistencyPolicy {
    /// Keep the first row, log how many customers disagreed.
    #[default]
    FirstWins,
    /// Fail on the first disagreement.
    Strict,
}

/// Extract the demographic table, first row wins.
pub fn extract_demographics(transactions: &DataFrame) -> Result<DataFrame, DashboardError> {
    extract_demographics_with(transactions, ConsistencyPolicy::FirstWins)
}

/// Extract the demographic table.
///
/// Output rows are in first-seen order of `User_ID` and hold only the
/// columns of [`demographic::ALL`].
pub fn extract_demographics_with(
    transactions: &DataFrame,
    policy: ConsistencyPolicy,
) -> Result<DataFrame, DashboardError> {
    for &col_name in &demographic::ALL {
        if transactions.column(col_name).is_err() {
            return Err(DashboardError::ColumnNotFound(col_name.to_string()));
        }
    }

    let user_ids = transactions.column(USER_ID)?.str()?;
    let attributes = demographic::ATTRIBUTES
        .iter()
        .map(|&c| {
            transactions
                .column(c)
                .map(|col| (c, col.as_materialized_series()))
        })
        .collect::<PolarsResult<Vec<(&str, &Series)>>>()?;

    let mut first_row: HashMap<&str, usize> = HashMap::new();
    let mut conflicting: HashSet<&str> = HashSet::new();
    let mut keep = Vec::with_capacity(transactions.height());

    for (i, id) in user_ids.into_iter().enumerate() {
        let Some(id) = id else {
            keep.push(false);
            continue;
        };
        match first_row.entry(id) {
            Entry::Vacant(slot) => {
                slot.insert(i);
                keep.push(true);
            }
            Entry::Occupied(slot) => {
                keep.push(false);
                if let Some(column) = first_difference(&attributes, *slot.get(), i)? {
                    match policy {
                        ConsistencyPolicy::Strict => {
                            return Err(DashboardError::InconsistentDemographics {
                                user_id: id.to_string(),
                                column: column.to_string(),
                            })
                        }
                        ConsistencyPolicy::FirstWins => {
                            conflicting.insert(id);
                        }
                    }
                }
            }
        }
    }

    if !conflicting.is_empty() {
        warn!(
            "{} customers have conflicting demographic rows; keeping the first row of each",
            conflicting.len()
        );
    }

    let mask = BooleanChunked::from_slice("first_seen".into(), &keep);
    let demographics = transactions.filter(&mask)?.select(demographic::ALL)?;
    debug!(
        "Extracted {} customers from {} transactions",
        demographics.height(),
        transactions.height()
    );
    Ok(demographics)
}

/// Name of the first attribute whose values differ between rows `a` and `b`.
fn first_difference<'a>(
    attributes: &[(&'a str, &Series)],
    a: usize,
    b: usize,
) -> PolarsResult<Option<&'a str>> {
    for &(name, series) in attributes {
        if series.get(a)? != series.get(b)? {
            return Ok(Some(name));
        }
    }
    Ok(None)
}
