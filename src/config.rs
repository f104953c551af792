use std::path::PathBuf;

use crate::data::summary::DEFAULT_BINS;

pub const DEFAULT_DATA_PATH: &str = "retail_sales_dataset.csv";
pub const DEFAULT_PREVIEW_ROWS: usize = 1000;

const DATA_ENV: &str = "RETAIL_DASH_DATA";
const BINS_ENV: &str = "RETAIL_DASH_BINS";
const PREVIEW_ENV: &str = "RETAIL_DASH_PREVIEW_ROWS";

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Dataset to load at startup.
    pub data_path: PathBuf,
    /// Number of histogram bins in the distribution tab.
    pub histogram_bins: usize,
    /// Maximum rows shown in the dataset preview.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            histogram_bins: DEFAULT_BINS,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl DashboardConfig {
    /// Resolve from the process arguments and environment.
    pub fn from_env() -> Self {
        Self::resolve(std::env::args().nth(1), |key| std::env::var(key).ok())
    }

    /// The first positional argument wins over `RETAIL_DASH_DATA` for the
    /// data path. Unparseable counts fall back to their defaults.
    fn resolve(arg: Option<String>, var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let data_path = arg
            .or_else(|| var(DATA_ENV))
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);

        Self {
            data_path,
            histogram_bins: count_var(&var, BINS_ENV, defaults.histogram_bins),
            preview_rows: count_var(&var, PREVIEW_ENV, defaults.preview_rows),
        }
    }
}

fn count_var(var: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> usize {
    match var(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                log::warn!("Ignoring {key}={raw:?}: expected a positive integer, using {default}");
                default
            }
        },
    }
}
