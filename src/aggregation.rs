use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use log::debug;
use polars::prelude::*;
use serde::Serialize;

use crate::context::DataContext;
use crate::error::DashboardError;
use crate::schema::{mode, transaction};

/// Categorical field used as the group-by key of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Dimension {
    Gender,
    MaritalStatus,
    Age,
    CityCategory,
    Occupation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
}

/// Static binding of a dimension to its column and its dashboard panel.
#[derive(Debug)]
pub struct DimensionBinding {
    pub dimension: Dimension,
    pub column: &'static str,
    pub display_name: &'static str,
    pub chart: ChartKind,
    pub component_id: &'static str,
}

/// Lookup table of the five supported dimensions, in [`Dimension`]
/// declaration order (which is also panel order).
pub static DIMENSIONS: [DimensionBinding; 5] = [
    DimensionBinding {
        dimension: Dimension::Gender,
        column: transaction::GENDER,
        display_name: "Gender",
        chart: ChartKind::Pie,
        component_id: "pie-chart-1",
    },
    DimensionBinding {
        dimension: Dimension::MaritalStatus,
        column: transaction::MARITAL_STATUS,
        display_name: "Marital Status",
        chart: ChartKind::Pie,
        component_id: "pie-chart-2",
    },
    DimensionBinding {
        dimension: Dimension::Age,
        column: transaction::AGE,
        display_name: "Age",
        chart: ChartKind::Bar,
        component_id: "bar-chart-1",
    },
    DimensionBinding {
        dimension: Dimension::CityCategory,
        column: transaction::CITY_CATEGORY,
        display_name: "City Category",
        chart: ChartKind::Bar,
        component_id: "bar-chart-2",
    },
    DimensionBinding {
        dimension: Dimension::Occupation,
        column: transaction::OCCUPATION,
        display_name: "Occupation",
        chart: ChartKind::Bar,
        component_id: "bar-chart-3",
    },
];

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Self::Gender,
        Self::MaritalStatus,
        Self::Age,
        Self::CityCategory,
        Self::Occupation,
    ];

    pub fn binding(self) -> &'static DimensionBinding {
        &DIMENSIONS[self as usize]
    }

    pub fn column(self) -> &'static str {
        self.binding().column
    }

    pub fn display_name(self) -> &'static str {
        self.binding().display_name
    }

    pub fn chart(self) -> ChartKind {
        self.binding().chart
    }

    /// Dimension bound to a dashboard component id (e.g. `pie-chart-1`).
    pub fn from_component(component_id: &str) -> Option<Self> {
        DIMENSIONS
            .iter()
            .find(|b| b.component_id == component_id)
            .map(|b| b.dimension)
    }

    /// Resolve a dimension by variant name (`MaritalStatus`), column name
    /// (`Marital_Status`) or display name (`Marital Status`), ignoring case.
    pub fn from_name(name: &str) -> Result<Self, DashboardError> {
        let wanted = fold_name(name);
        DIMENSIONS
            .iter()
            .find(|b| fold_name(b.column) == wanted || fold_name(b.display_name) == wanted)
            .map(|b| b.dimension)
            .ok_or_else(|| DashboardError::UnknownDimension(name.to_string()))
    }
}

impl FromStr for Dimension {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Aggregation applied within each group; one per selector value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Mode {
    /// Distinct customers per category, over the demographic table.
    CustomerCount,
    /// Sum of `Purchase` per category, over the transaction table.
    PurchaseSum,
    /// Transaction rows per category.
    RecordCount,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Self::CustomerCount, Self::PurchaseSum, Self::RecordCount];

    /// Value sent by the dashboard selector.
    pub fn selector_value(self) -> &'static str {
        match self {
            Self::CustomerCount => mode::COUNTER,
            Self::PurchaseSum => mode::PURCHASE,
            Self::RecordCount => mode::PRODUCTS,
        }
    }

    /// Label shown next to the selector option.
    pub fn label(self) -> &'static str {
        match self {
            Self::CustomerCount => "Count",
            Self::PurchaseSum => "Purchase",
            Self::RecordCount => "Product Counter",
        }
    }

    pub fn title(self, dimension: Dimension) -> String {
        let name = dimension.display_name();
        match self {
            Self::CustomerCount => format!("{name} Distribution"),
            Self::PurchaseSum => format!("{name} Purchase Distribution"),
            Self::RecordCount => format!("{name} Product counter Distribution"),
        }
    }

    /// Resolve a mode from its selector value or variant name, ignoring case.
    pub fn from_name(name: &str) -> Result<Self, DashboardError> {
        match fold_name(name).as_str() {
            "counter" | "count" | "customercount" => Ok(Self::CustomerCount),
            "purchase" | "purchasesum" => Ok(Self::PurchaseSum),
            "products" | "productcounter" | "recordcount" => Ok(Self::RecordCount),
            _ => Err(DashboardError::UnknownMode(name.to_string())),
        }
    }
}

impl FromStr for Mode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

fn fold_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | ' ' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

// ── Result ──────────────────────────────────────────────────────────────────

/// Ordered category → value mapping handed to the view layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub dimension: Dimension,
    pub mode: Mode,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl AggregationResult {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Turn an empty result into [`DashboardError::EmptyInput`].
    pub fn non_empty(self) -> Result<Self, DashboardError> {
        if self.is_empty() {
            Err(DashboardError::EmptyInput(self.title))
        } else {
            Ok(self)
        }
    }
}

// ── Grouping ────────────────────────────────────────────────────────────────

/// Group key in its natural order: numeric for integer columns, lexical for
/// strings. A single column only ever yields one variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Int(i64),
    Text(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Compute one chart's data for the given selector state.
pub fn aggregate(
    ctx: &DataContext,
    dimension: Dimension,
    mode: Mode,
) -> Result<AggregationResult, DashboardError> {
    let groups = match mode {
        Mode::CustomerCount => value_counts(ctx.demographics(), dimension)?,
        Mode::PurchaseSum => purchase_sums(ctx.transactions(), dimension)?,
        Mode::RecordCount => value_counts(ctx.transactions(), dimension)?,
    };
    debug!(
        "Aggregated {:?} by {:?}: {} categories",
        dimension,
        mode,
        groups.len()
    );

    let (labels, values): (Vec<String>, Vec<f64>) = groups
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .unzip();
    Ok(AggregationResult {
        dimension,
        mode,
        title: mode.title(dimension),
        labels,
        values,
    })
}

/// Like [`aggregate`], resolving the dimension by name first.
pub fn aggregate_by_name(
    ctx: &DataContext,
    dimension: &str,
    mode: Mode,
) -> Result<AggregationResult, DashboardError> {
    aggregate(ctx, Dimension::from_name(dimension)?, mode)
}

/// Rows per category, count descending. Ties keep first-seen order.
pub fn value_counts(
    table: &DataFrame,
    dimension: Dimension,
) -> Result<Vec<(GroupKey, f64)>, DashboardError> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut counts: Vec<(GroupKey, u64)> = Vec::new();

    for key in group_keys(table, dimension)?.into_iter().flatten() {
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(counts
        .into_iter()
        .map(|(key, count)| (key, count as f64))
        .collect())
}

/// Sum of `Purchase` per category, key ascending.
pub fn purchase_sums(
    table: &DataFrame,
    dimension: Dimension,
) -> Result<Vec<(GroupKey, f64)>, DashboardError> {
    let keys = group_keys(table, dimension)?;
    let purchases = table
        .column(transaction::PURCHASE)
        .map_err(|_| DashboardError::ColumnNotFound(transaction::PURCHASE.to_string()))?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let purchases = purchases.f64()?;

    let mut sums: BTreeMap<GroupKey, f64> = BTreeMap::new();
    for (key, amount) in keys.into_iter().zip(purchases.into_iter()) {
        if let Some(key) = key {
            *sums.entry(key).or_insert(0.0) += amount.unwrap_or(0.0);
        }
    }
    Ok(sums.into_iter().collect())
}

/// Per-row group keys of `dimension`; `None` for null cells.
fn group_keys(
    table: &DataFrame,
    dimension: Dimension,
) -> Result<Vec<Option<GroupKey>>, DashboardError> {
    let column = table
        .column(dimension.column())
        .map_err(|_| DashboardError::ColumnNotFound(dimension.column().to_string()))?;

    let keys: Vec<Option<GroupKey>> = match column.dtype() {
        DataType::String => column
            .str()?
            .into_iter()
            .map(|v| v.map(|s| GroupKey::Text(s.to_string())))
            .collect(),
        DataType::Int64 => column
            .as_materialized_series()
            .i64()?
            .into_iter()
            .map(|v| v.map(GroupKey::Int))
            .collect(),
        _ => {
            let cast = column.as_materialized_series().cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| GroupKey::Text(s.to_string())))
                .collect()
        }
    };
    Ok(keys)
}
