use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, Dataset};

/// Cell texts read as missing values in CSV input.
const NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A", "<NA>",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tabular dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row followed by records (the dashboard's native input)
/// * `.json`    – `[{ "col": value, ... }, ...]`
/// * `.parquet` – any flat Parquet file
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

/// Parse CSV from any reader: a header row, then one record per line.
pub fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Dataset> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Dataset::from_rows(headers, rows)
}

fn guess_cell_type(s: &str) -> CellValue {
    if NULL_MARKERS.contains(&s) {
        return CellValue::Null;
    }
    // numbers may be padded; text keeps its spaces
    let trimmed = s.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") {
        return CellValue::Bool(s.eq_ignore_ascii_case("true"));
    }
    CellValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Product Category": "Beauty", "Quantity": 3, "Total Amount": 150 },
///   ...
/// ]
/// ```
///
/// Columns appear in the order their keys are first seen; a record without a
/// key has a missing cell there.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    Dataset::from_rows(headers, rows)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file.
///
/// Integer and float columns become numeric cells, everything else is kept
/// as text. Works with files written by both **Pandas** (`df.to_parquet()`)
/// and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, col_cells) in cells.iter_mut().enumerate() {
            let col_array = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                let value = extract_cell(col_array, row)
                    .with_context(|| format!("column '{}', row {row}", headers[col_idx]))?;
                col_cells.push(value);
            }
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, col_cells)| Column::infer(name, col_cells))
        .collect();
    Dataset::from_columns(columns)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => CellValue::Float(col.as_primitive::<UInt64Type>().value(row) as f64),
        DataType::Float32 => {
            CellValue::Float(col.as_primitive::<Float32Type>().value(row).into())
        }
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        _ => CellValue::Text(
            array_value_to_string(col.as_ref(), row).context("formatting Arrow value")?,
        ),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::ColumnKind;

    fn csv_str(text: &str) -> Result<Dataset> {
        read_csv(csv::Reader::from_reader(text.as_bytes()))
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("retail-dash-{}-{name}", std::process::id()))
    }

    #[test]
    fn csv_types_columns() {
        let ds = csv_str(
            "Date,Gender,Age,Total Amount,Member\n\
             2023-11-24,Male,34,150,true\n\
             2023-02-27,Female,26,1000.5,False\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.schema(),
            vec![
                ("Date", ColumnKind::Categorical),
                ("Gender", ColumnKind::Categorical),
                ("Age", ColumnKind::Numeric),
                ("Total Amount", ColumnKind::Numeric),
                ("Member", ColumnKind::Categorical),
            ]
        );
        let amount = ds.column("Total Amount").unwrap();
        assert_eq!(amount.as_numeric().unwrap(), &[Some(150.0), Some(1000.5)]);
    }

    #[test]
    fn csv_padded_numbers_stay_numeric() {
        let ds = csv_str("Amount,Category\n 10,A\n20 , B\n 2.5 ,A\n").unwrap();
        let amount = ds.column("Amount").unwrap();
        assert_eq!(amount.kind(), ColumnKind::Numeric);
        assert_eq!(amount.as_numeric().unwrap(), &[Some(10.0), Some(20.0), Some(2.5)]);
        let category = ds.column("Category").unwrap();
        assert_eq!(category.as_categorical().unwrap()[1].as_deref(), Some(" B"));
    }

    #[test]
    fn csv_nan_text_is_missing() {
        let ds = csv_str("v\n1\nNAN\n3\n").unwrap();
        let v = ds.column("v").unwrap();
        assert_eq!(v.kind(), ColumnKind::Numeric);
        assert_eq!(v.null_count(), 1);
    }

    #[test]
    fn csv_null_markers_are_missing() {
        let ds = csv_str("Amount,Category\n10,A\n,B\nNA,\n40,N/A\n50,A\n").unwrap();
        let amount = ds.column("Amount").unwrap();
        assert_eq!(amount.kind(), ColumnKind::Numeric);
        assert_eq!(amount.null_count(), 2);
        assert_eq!(ds.column("Category").unwrap().null_count(), 2);
    }

    #[test]
    fn csv_header_only_is_empty() {
        let ds = csv_str("Amount,Category\n").unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.column_count(), 2);
    }

    #[test]
    fn csv_ragged_rows_fail() {
        let err = csv_str("a,b\n1,2\n3\n").unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 1"));
    }

    #[test]
    fn json_records_keep_key_order() {
        let ds = parse_json(
            r#"[{"Category": "A", "Amount": 10},
                {"Category": "B", "Amount": 2.5, "Note": "late"}]"#,
        )
        .unwrap();
        assert_eq!(ds.column_names(), vec!["Category", "Amount", "Note"]);
        assert_eq!(ds.column("Amount").unwrap().kind(), ColumnKind::Numeric);
        assert_eq!(ds.column("Note").unwrap().null_count(), 1);
    }

    #[test]
    fn json_must_be_array_of_objects() {
        assert!(parse_json(r#"{"a": 1}"#).is_err());
        assert!(parse_json("[1, 2]").is_err());
    }

    #[test]
    fn unsupported_extension() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn missing_file_fails() {
        assert!(load_file(&temp_path("does-not-exist.csv")).is_err());
    }

    #[test]
    fn csv_file_round_trip() {
        let path = temp_path("sales.csv");
        std::fs::write(&path, "Amount,Category\n10,A\n20,B\n30,A\n").unwrap();
        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column("Category").unwrap().kind(), ColumnKind::Categorical);
    }

    #[test]
    fn parquet_file_loads() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Amount", DataType::Float64, true),
            Field::new("Category", DataType::Utf8, true),
            Field::new("Quantity", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![Some(10.0), None, Some(30.0)])),
                Arc::new(StringArray::from(vec![Some("A"), Some("B"), None])),
                Arc::new(Int64Array::from(vec![1, 2, 3])),
            ],
        )
        .unwrap();

        let path = temp_path("sales.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.schema(),
            vec![
                ("Amount", ColumnKind::Numeric),
                ("Category", ColumnKind::Categorical),
                ("Quantity", ColumnKind::Numeric),
            ]
        );
        assert_eq!(ds.column("Amount").unwrap().null_count(), 1);
        assert_eq!(ds.column("Category").unwrap().null_count(), 1);
    }
}
