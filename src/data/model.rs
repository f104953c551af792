use std::collections::HashSet;
use std::fmt;

use anyhow::{bail, Result};

// ---------------------------------------------------------------------------
// CellValue – a single parsed cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as produced by the loaders, before the column
/// it belongs to has been typed.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell, `None` for anything that is not a number.
    /// A NaN float is a missing value, not a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_nan() => None,
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Column typing
// ---------------------------------------------------------------------------

/// Inferred type of a column, fixed once the dataset is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Typed column storage. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    /// Numeric column; NaN entries are stored as missing.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Column {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    /// Type a column from its raw cells.
    ///
    /// The column is numeric when every non-null cell is a number; an
    /// all-null column counts as numeric. Anything else (text, booleans,
    /// a mix of numbers and text) is categorical, keeping each cell's text.
    pub fn infer(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        let numeric = cells
            .iter()
            .all(|c| c.is_null() || c.as_f64().is_some());

        if numeric {
            Column::numeric(name, cells.iter().map(CellValue::as_f64).collect())
        } else {
            let values = cells
                .into_iter()
                .map(|c| match c {
                    c if c.is_null() => None,
                    CellValue::Text(s) => Some(s),
                    other => Some(other.to_string()),
                })
                .collect();
            Column::categorical(name, values)
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of missing cells.
    pub fn null_count(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Categorical(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Categorical(_) => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Categorical(v) => Some(v),
            ColumnData::Numeric(_) => None,
        }
    }

    /// Text shown for one cell in the data preview.
    pub fn display(&self, row: usize) -> String {
        match &self.data {
            ColumnData::Numeric(v) => match v.get(row).copied().flatten() {
                Some(x) => format!("{x}"),
                None => "<null>".to_string(),
            },
            ColumnData::Categorical(v) => match v.get(row) {
                Some(Some(s)) => s.clone(),
                _ => "<null>".to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Immutable column-major table. All columns share the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Assemble a dataset from already-typed columns. A dataset without
    /// columns has zero rows.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map_or(0, Column::len);

        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                bail!("Duplicate column name '{}'", col.name);
            }
            if col.len() != row_count {
                bail!(
                    "Column '{}' has {} rows but '{}' has {row_count}",
                    col.name,
                    col.len(),
                    columns[0].name
                );
            }
        }

        Ok(Dataset { columns, row_count })
    }

    /// Build a dataset from row-oriented raw cells, typing each column.
    ///
    /// Every row must have exactly `headers.len()` cells.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        let n_cols = headers.len();
        let mut cells: Vec<Vec<CellValue>> = (0..n_cols)
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();

        for (row_no, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                bail!("Row {row_no}: expected {n_cols} cells, found {}", row.len());
            }
            for (col_cells, cell) in cells.iter_mut().zip(row) {
                col_cells.push(cell);
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, col_cells)| Column::infer(name, col_cells))
            .collect();

        Self::from_columns(columns)
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// `(name, kind)` for every column, in column order.
    pub fn schema(&self) -> Vec<(&str, ColumnKind)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.kind()))
            .collect()
    }
}
