use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use super::model::{Column, ColumnData, ColumnKind, Dataset};
use super::stats::{self, Histogram};

/// Histogram bin count used when nothing else is configured.
pub const DEFAULT_BINS: usize = 10;

// ---------------------------------------------------------------------------
// Errors and availability
// ---------------------------------------------------------------------------

/// Why a column name was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnProblem {
    Missing,
    WrongKind {
        expected: ColumnKind,
        found: ColumnKind,
    },
}

impl fmt::Display for ColumnProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnProblem::Missing => write!(f, "no such column"),
            ColumnProblem::WrongKind { expected, found } => {
                write!(f, "expected a {expected} column, found {found}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    #[error("invalid column '{column}': {problem}")]
    InvalidColumn {
        column: String,
        problem: ColumnProblem,
    },
}

/// A view that has nothing to show. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    NoCategoricalColumn,
    TooFewNumericColumns { found: usize },
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::NoCategoricalColumn => {
                write!(f, "No categorical column available for analysis.")
            }
            UnavailableReason::TooFewNumericColumns { .. } => {
                write!(f, "Not enough numeric columns for correlation analysis.")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Availability<T> {
    Ready(T),
    Unavailable(UnavailableReason),
}

impl<T> Availability<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Availability::Ready(v) => Some(v),
            Availability::Unavailable(_) => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Availability::Unavailable(_))
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalMetrics {
    pub row_count: usize,
    pub column_count: usize,
    /// Null cells across every column and row.
    pub missing_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalStats {
    pub count: usize,
    pub unique: usize,
    /// Most frequent value; ties go to the value seen first.
    pub top: Option<String>,
    pub freq: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnStats {
    Numeric(NumericStats),
    Categorical(CategoricalStats),
}

/// One row of the describe table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescription {
    pub name: String,
    pub missing: usize,
    pub stats: ColumnStats,
}

impl ColumnDescription {
    /// Non-missing cell count, whatever the column type.
    pub fn count(&self) -> usize {
        match &self.stats {
            ColumnStats::Numeric(s) => s.count,
            ColumnStats::Categorical(s) => s.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub category: String,
    pub sum: f64,
}

/// Square, symmetric Pearson correlation matrix with unit diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    values: Vec<f64>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.names.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size() + j]
    }
}

/// Pair of user-selected column names driving the per-column views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    pub numeric: String,
    pub category: Option<String>,
}

impl ColumnSelection {
    /// First numeric and first categorical column, `None` when the dataset
    /// has no numeric column.
    pub fn default_for(dataset: &Dataset) -> Option<Self> {
        let (numeric, categorical) = classify_columns(dataset);
        Some(ColumnSelection {
            numeric: numeric.into_iter().next()?,
            category: categorical.into_iter().next(),
        })
    }

    pub fn validate(&self, dataset: &Dataset) -> Result<(), SummaryError> {
        numeric_column(dataset, &self.numeric)?;
        if let Some(cat) = &self.category {
            categorical_column(dataset, cat)?;
        }
        Ok(())
    }
}

/// Everything one dashboard render needs, derived from a dataset and a
/// selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryResult {
    pub metrics: GlobalMetrics,
    pub selected_mean: f64,
    pub description: Vec<ColumnDescription>,
    pub distribution: Vec<f64>,
    pub histogram: Histogram,
    pub grouped: Availability<Vec<GroupTotal>>,
    pub correlation: Availability<CorrelationMatrix>,
}

// ---------------------------------------------------------------------------
// Column lookup
// ---------------------------------------------------------------------------

fn lookup<'a>(
    dataset: &'a Dataset,
    name: &str,
    expected: ColumnKind,
) -> Result<&'a Column, SummaryError> {
    let col = dataset
        .column(name)
        .ok_or_else(|| SummaryError::InvalidColumn {
            column: name.to_string(),
            problem: ColumnProblem::Missing,
        })?;

    if col.kind() != expected {
        return Err(SummaryError::InvalidColumn {
            column: name.to_string(),
            problem: ColumnProblem::WrongKind {
                expected,
                found: col.kind(),
            },
        });
    }
    Ok(col)
}

fn numeric_column<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a [Option<f64>], SummaryError> {
    let col = lookup(dataset, name, ColumnKind::Numeric)?;
    Ok(col.as_numeric().unwrap_or_default())
}

fn categorical_column<'a>(
    dataset: &'a Dataset,
    name: &str,
) -> Result<&'a [Option<String>], SummaryError> {
    let col = lookup(dataset, name, ColumnKind::Categorical)?;
    Ok(col.as_categorical().unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Split column names into `(numeric, categorical)`, each in column order.
pub fn classify_columns(dataset: &Dataset) -> (Vec<String>, Vec<String>) {
    let mut numeric = Vec::new();
    let mut categorical = Vec::new();
    for col in dataset.columns() {
        match col.kind() {
            ColumnKind::Numeric => numeric.push(col.name.clone()),
            ColumnKind::Categorical => categorical.push(col.name.clone()),
        }
    }
    (numeric, categorical)
}

pub fn global_metrics(dataset: &Dataset) -> GlobalMetrics {
    GlobalMetrics {
        row_count: dataset.len(),
        column_count: dataset.column_count(),
        missing_count: dataset.columns().iter().map(Column::null_count).sum(),
    }
}

/// Missing cells per column, in column order.
pub fn missing_by_column(dataset: &Dataset) -> Vec<(String, usize)> {
    dataset
        .columns()
        .iter()
        .map(|c| (c.name.clone(), c.null_count()))
        .collect()
}

/// Descriptive statistics for every column.
pub fn describe(dataset: &Dataset) -> Vec<ColumnDescription> {
    dataset
        .columns()
        .iter()
        .map(|col| {
            let stats = match &col.data {
                ColumnData::Numeric(values) => ColumnStats::Numeric(describe_numeric(values)),
                ColumnData::Categorical(values) => {
                    ColumnStats::Categorical(describe_categorical(values))
                }
            };
            ColumnDescription {
                name: col.name.clone(),
                missing: col.null_count(),
                stats,
            }
        })
        .collect()
}

fn describe_numeric(values: &[Option<f64>]) -> NumericStats {
    let valid: Vec<f64> = values.iter().flatten().copied().collect();

    NumericStats {
        count: valid.len(),
        mean: stats::mean(&valid),
        std: stats::std_dev(&valid),
        min: stats::min(&valid),
        q25: stats::quantile(&valid, 0.25),
        median: stats::quantile(&valid, 0.5),
        q75: stats::quantile(&valid, 0.75),
        max: stats::max(&valid),
    }
}

fn describe_categorical(values: &[Option<String>]) -> CategoricalStats {
    // (first-seen position, frequency) per distinct value
    let mut freq: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut count = 0;
    for value in values.iter().flatten() {
        let next = freq.len();
        freq.entry(value.as_str()).or_insert((next, 0)).1 += 1;
        count += 1;
    }

    let top = freq
        .iter()
        .max_by(|(_, (pos_a, n_a)), (_, (pos_b, n_b))| n_a.cmp(n_b).then(pos_b.cmp(pos_a)));

    CategoricalStats {
        count,
        unique: freq.len(),
        top: top.map(|(v, _)| v.to_string()),
        freq: top.map_or(0, |(_, (_, n))| *n),
    }
}

/// Mean of the non-missing values of a numeric column.
pub fn column_mean(dataset: &Dataset, numeric: &str) -> Result<f64, SummaryError> {
    Ok(stats::mean(&distribution(dataset, numeric)?))
}

/// Non-missing values of a numeric column in row order, for histogram binning.
pub fn distribution(dataset: &Dataset, numeric: &str) -> Result<Vec<f64>, SummaryError> {
    Ok(numeric_column(dataset, numeric)?.iter().flatten().copied().collect())
}

/// Sum of `numeric` per value of `category`, largest first.
///
/// Rows with a missing category are dropped; missing numeric cells add
/// nothing. Equal sums keep first-seen category order.
pub fn grouped_aggregate(
    dataset: &Dataset,
    numeric: &str,
    category: &str,
) -> Result<Vec<GroupTotal>, SummaryError> {
    let values = numeric_column(dataset, numeric)?;
    let categories = categorical_column(dataset, category)?;

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<GroupTotal> = Vec::new();

    for (cat, value) in categories.iter().zip(values) {
        let Some(cat) = cat else {
            continue;
        };
        let slot = *index.entry(cat.as_str()).or_insert_with(|| {
            groups.push(GroupTotal {
                category: cat.clone(),
                sum: 0.0,
            });
            groups.len() - 1
        });
        if let Some(v) = value {
            groups[slot].sum += v;
        }
    }

    // stable: ties stay in first-seen order
    groups.sort_by(|a, b| b.sum.total_cmp(&a.sum));
    Ok(groups)
}

/// Pairwise Pearson correlation across `numeric` columns.
pub fn correlation_matrix<S: AsRef<str>>(
    dataset: &Dataset,
    numeric: &[S],
) -> Result<Availability<CorrelationMatrix>, SummaryError> {
    let columns = numeric
        .iter()
        .map(|name| numeric_column(dataset, name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let n = columns.len();
    if n < 2 {
        return Ok(Availability::Unavailable(
            UnavailableReason::TooFewNumericColumns { found: n },
        ));
    }

    // columns without gaps go through u_analytics in one pass
    let complete = columns
        .iter()
        .map(|c| c.iter().copied().collect::<Option<Vec<f64>>>())
        .collect::<Option<Vec<_>>>()
        .and_then(|complete| {
            let refs: Vec<&[f64]> = complete.iter().map(Vec::as_slice).collect();
            stats::complete_correlation(&refs)
        });

    let mut values = vec![0.0; n * n];
    for i in 0..n {
        values[i * n + i] = 1.0;
        for j in (i + 1)..n {
            let r = match &complete {
                Some(m) => m[i * n + j],
                None => stats::pearson(columns[i], columns[j]),
            };
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }

    Ok(Availability::Ready(CorrelationMatrix {
        names: numeric.iter().map(|s| s.as_ref().to_string()).collect(),
        values,
    }))
}

/// Compute every view for one selection.
pub fn summarize(
    dataset: &Dataset,
    selection: &ColumnSelection,
    bins: usize,
) -> Result<SummaryResult, SummaryError> {
    selection.validate(dataset)?;

    let distribution = distribution(dataset, &selection.numeric)?;
    let histogram = stats::histogram(&distribution, bins);
    let selected_mean = column_mean(dataset, &selection.numeric)?;

    let grouped = match &selection.category {
        Some(cat) => Availability::Ready(grouped_aggregate(dataset, &selection.numeric, cat)?),
        None => Availability::Unavailable(UnavailableReason::NoCategoricalColumn),
    };

    let (numeric, _) = classify_columns(dataset);

    Ok(SummaryResult {
        metrics: global_metrics(dataset),
        selected_mean,
        description: describe(dataset),
        histogram,
        distribution,
        grouped,
        correlation: correlation_matrix(dataset, &numeric)?,
    })
}
