use std::path::{Path, PathBuf};

use crate::aggregation::Mode;
use crate::dataset::LoadOptions;
use crate::demographics::ConsistencyPolicy;

pub const DEFAULT_DATA_PATH: &str = "data/BlackFriday.csv";

/// Startup configuration for a [`DataContext`](crate::context::DataContext).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Path of the transaction file (default: `data/BlackFriday.csv`)
    pub data_path: PathBuf,
    /// Field delimiter of the transaction file (default: `,`)
    pub separator: u8,
    /// How conflicting demographic rows for one customer are handled
    pub consistency: ConsistencyPolicy,
    /// Fail aggregations that produce no categories instead of returning an
    /// empty result
    pub require_non_empty: bool,
    pub visualization: VisualizationConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            separator: b',',
            consistency: ConsistencyPolicy::FirstWins,
            require_non_empty: false,
            visualization: VisualizationConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn with_data_path(mut self, path: impl AsRef<Path>) -> Self {
        self.data_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_consistency(mut self, policy: ConsistencyPolicy) -> Self {
        self.consistency = policy;
        self
    }

    pub fn with_require_non_empty(mut self, require: bool) -> Self {
        self.require_non_empty = require;
        self
    }

    pub fn with_visualization(mut self, visualization: VisualizationConfig) -> Self {
        self.visualization = visualization;
        self
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            separator: self.separator,
        }
    }
}

/// Configuration for the HTML dashboard.
#[derive(Debug, Clone)]
pub struct VisualizationConfig {
    /// Heading shown above the selector
    pub title: String,
    /// Mode selected when the page opens
    pub default_mode: Mode,
    /// Fixed pixel height of each chart
    pub chart_height_px: u32,
    /// Fill colours, cycled per category
    pub palette: Vec<String>,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            title: "Black Friday Customer Overview".to_string(),
            default_mode: Mode::CustomerCount,
            chart_height_px: 320,
            palette: [
                "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2",
                "#7f7f7f", "#bcbd22", "#17becf",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }
}
