use eframe::egui::{self, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Dataset;
use crate::data::summary::{ColumnDescription, ColumnStats};

// ---------------------------------------------------------------------------
// Dataset preview
// ---------------------------------------------------------------------------

/// Scrollable grid of the first `max_rows` dataset rows.
pub fn preview_table(ui: &mut Ui, dataset: &Dataset, max_rows: usize) {
    let columns = dataset.columns();
    let n_rows = dataset.len().min(max_rows);

    if n_rows < dataset.len() {
        ui.label(format!("Showing the first {n_rows} of {} rows.", dataset.len()));
    }

    ui.push_id("preview_table", |ui: &mut Ui| {
        egui::ScrollArea::horizontal()
            .id_salt("preview_scroll")
            .show(ui, |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .resizable(true)
                    .max_scroll_height(320.0)
                    .columns(TableColumn::auto().at_least(70.0), columns.len())
                    .header(20.0, |mut header| {
                        for name in dataset.column_names() {
                            header.col(|ui: &mut Ui| {
                                ui.strong(name);
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(18.0, n_rows, |mut row| {
                            let idx = row.index();
                            for col in columns {
                                row.col(|ui: &mut Ui| {
                                    ui.label(col.display(idx));
                                });
                            }
                        });
                    });
            });
    });
}

// ---------------------------------------------------------------------------
// Describe table
// ---------------------------------------------------------------------------

const STAT_ROWS: [&str; 12] = [
    "count", "missing", "mean", "std", "min", "25%", "50%", "75%", "max", "unique", "top", "freq",
];

fn fmt_num(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.2}")
    }
}

/// Text of one statistic for one column; empty where it does not apply.
fn stat_cell(desc: &ColumnDescription, stat: &str) -> String {
    match (stat, &desc.stats) {
        ("count", _) => desc.count().to_string(),
        ("missing", _) => desc.missing.to_string(),
        ("mean", ColumnStats::Numeric(s)) => fmt_num(s.mean),
        ("std", ColumnStats::Numeric(s)) => fmt_num(s.std),
        ("min", ColumnStats::Numeric(s)) => fmt_num(s.min),
        ("25%", ColumnStats::Numeric(s)) => fmt_num(s.q25),
        ("50%", ColumnStats::Numeric(s)) => fmt_num(s.median),
        ("75%", ColumnStats::Numeric(s)) => fmt_num(s.q75),
        ("max", ColumnStats::Numeric(s)) => fmt_num(s.max),
        ("unique", ColumnStats::Categorical(s)) => s.unique.to_string(),
        ("top", ColumnStats::Categorical(s)) => s.top.clone().unwrap_or_default(),
        ("freq", ColumnStats::Categorical(s)) => s.freq.to_string(),
        _ => String::new(),
    }
}

/// Statistics as rows, dataset columns as columns.
pub fn describe_table(ui: &mut Ui, description: &[ColumnDescription]) {
    if description.is_empty() {
        ui.label("The dataset has no columns.");
        return;
    }

    ui.push_id("describe_table", |ui: &mut Ui| {
        egui::ScrollArea::horizontal()
            .id_salt("describe_scroll")
            .show(ui, |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .column(TableColumn::exact(70.0))
                    .columns(TableColumn::auto().at_least(70.0), description.len())
                    .header(20.0, |mut header| {
                        header.col(|_ui: &mut Ui| {});
                        for desc in description {
                            header.col(|ui: &mut Ui| {
                                ui.strong(desc.name.as_str());
                            });
                        }
                    })
                    .body(|mut body| {
                        for stat in STAT_ROWS {
                            body.row(18.0, |mut row| {
                                row.col(|ui: &mut Ui| {
                                    ui.strong(stat);
                                });
                                for desc in description {
                                    row.col(|ui: &mut Ui| {
                                        ui.label(stat_cell(desc, stat));
                                    });
                                }
                            });
                        }
                    });
            });
    });
}
