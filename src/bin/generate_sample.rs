//! Writes a deterministic synthetic retail sales dataset for the dashboard.
//!
//! ```text
//! generate_sample [--rows N] [--parquet]
//! ```

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const CATEGORIES: [&str; 3] = ["Beauty", "Clothing", "Electronics"];
const GENDERS: [&str; 2] = ["Male", "Female"];
const PRICES: [i64; 5] = [25, 30, 50, 300, 500];
const MONTH_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

#[derive(Debug, Serialize)]
struct Sale {
    #[serde(rename = "Transaction ID")]
    transaction_id: i64,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Customer ID")]
    customer_id: String,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Age")]
    age: i64,
    #[serde(rename = "Product Category")]
    product_category: String,
    #[serde(rename = "Quantity")]
    quantity: i64,
    #[serde(rename = "Price per Unit")]
    price_per_unit: i64,
    #[serde(rename = "Total Amount")]
    total_amount: i64,
}

/// `YYYY-MM-DD` for a zero-based day of 2023.
fn date_of(mut day: u32) -> String {
    for (month, &len) in MONTH_DAYS.iter().enumerate() {
        if day < len {
            return format!("2023-{:02}-{:02}", month + 1, day + 1);
        }
        day -= len;
    }
    "2023-12-31".to_string()
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<Sale> {
    (1..=rows as i64)
        .map(|id| {
            let quantity = rng.range(1, 4);
            let price = *rng.pick(&PRICES);
            Sale {
                transaction_id: id,
                date: date_of(rng.range(0, 364) as u32),
                customer_id: format!("CUST{id:03}"),
                gender: rng.pick(&GENDERS).to_string(),
                age: rng.range(18, 64),
                product_category: rng.pick(&CATEGORIES).to_string(),
                quantity,
                price_per_unit: price,
                total_amount: quantity * price,
            }
        })
        .collect()
}

fn write_csv(path: &str, sales: &[Sale]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for sale in sales {
        writer.serialize(sale).context("writing CSV record")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn int_column(sales: &[Sale], field: fn(&Sale) -> i64) -> ArrayRef {
    Arc::new(Int64Array::from(sales.iter().map(field).collect::<Vec<_>>()))
}

fn str_column(sales: &[Sale], field: fn(&Sale) -> &str) -> ArrayRef {
    Arc::new(StringArray::from(sales.iter().map(field).collect::<Vec<_>>()))
}

fn write_parquet(path: &str, sales: &[Sale]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Transaction ID", DataType::Int64, false),
        Field::new("Date", DataType::Utf8, false),
        Field::new("Customer ID", DataType::Utf8, false),
        Field::new("Gender", DataType::Utf8, false),
        Field::new("Age", DataType::Int64, false),
        Field::new("Product Category", DataType::Utf8, false),
        Field::new("Quantity", DataType::Int64, false),
        Field::new("Price per Unit", DataType::Int64, false),
        Field::new("Total Amount", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            int_column(sales, |s| s.transaction_id),
            str_column(sales, |s| s.date.as_str()),
            str_column(sales, |s| s.customer_id.as_str()),
            str_column(sales, |s| s.gender.as_str()),
            int_column(sales, |s| s.age),
            str_column(sales, |s| s.product_category.as_str()),
            int_column(sales, |s| s.quantity),
            int_column(sales, |s| s.price_per_unit),
            int_column(sales, |s| s.total_amount),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rows = 1000usize;
    let mut parquet = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--rows" => {
                let value = args.next().context("--rows needs a value")?;
                rows = value
                    .parse()
                    .with_context(|| format!("invalid row count '{value}'"))?;
            }
            "--parquet" => parquet = true,
            other => bail!("unknown argument '{other}'"),
        }
    }

    let mut rng = SimpleRng::new(42);
    let sales = generate(rows, &mut rng);

    let output_path = if parquet {
        let path = "retail_sales_dataset.parquet";
        write_parquet(path, &sales)?;
        path
    } else {
        let path = "retail_sales_dataset.csv";
        write_csv(path, &sales)?;
        path
    };

    println!("Wrote {} sales records to {output_path}", sales.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_cover_the_year() {
        assert_eq!(date_of(0), "2023-01-01");
        assert_eq!(date_of(31), "2023-02-01");
        assert_eq!(date_of(364), "2023-12-31");
    }

    #[test]
    fn generated_rows_are_consistent() {
        let sales = generate(50, &mut SimpleRng::new(7));
        assert_eq!(sales.len(), 50);
        for sale in &sales {
            assert_eq!(sale.total_amount, sale.quantity * sale.price_per_unit);
            assert!((18..=64).contains(&sale.age));
            assert!(CATEGORIES.contains(&sale.product_category.as_str()));
        }
    }
}
