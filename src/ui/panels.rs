use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::summary::{Availability, UnavailableReason};
use crate::state::{AppState, Tab};
use crate::ui::{plot, tables};

// ---------------------------------------------------------------------------
// Header – title and key metrics
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui, state: &AppState) {
    ui.add_space(4.0);
    ui.heading("🛒 Retail Sales Analysis Dashboard");
    ui.label("Interactive data analysis of retail sales dataset");
    ui.add_space(6.0);

    let metrics = state.metrics();
    let avg = state
        .summary
        .as_ref()
        .filter(|s| !s.selected_mean.is_nan())
        .map_or_else(|| "n/a".to_string(), |s| format!("{:.2}", s.selected_mean));

    ui.strong("📌 Key Metrics");
    ui.columns(4, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Total Records", metrics.row_count.to_string());
        metric(&mut cols[1], "Total Columns", metrics.column_count.to_string());
        let breakdown: Vec<String> = state
            .missing_by_column
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(name, n)| format!("{name}: {n}"))
            .collect();
        let missing = metric(&mut cols[2], "Missing Values", metrics.missing_count.to_string());
        if !breakdown.is_empty() {
            missing.on_hover_text(breakdown.join("\n"));
        }
        metric(&mut cols[3], "Avg Value", avg);
    });

    if let Some(msg) = &state.status_message {
        ui.label(RichText::new(msg).color(Color32::RED));
    }
    ui.add_space(4.0);
}

fn metric(ui: &mut Ui, label: &str, value: String) -> egui::Response {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(24.0).strong());
    })
    .response
}

// ---------------------------------------------------------------------------
// Left side panel – column selectors
// ---------------------------------------------------------------------------

pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔧 Filters");
    ui.separator();

    let Some(selection) = state.selection.clone() else {
        ui.label("No numeric column to select.");
        return;
    };

    ui.strong("Select numeric column");
    let mut numeric = selection.numeric.clone();
    egui::ComboBox::from_id_salt("numeric_column")
        .selected_text(&numeric)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for col in &state.numeric_columns {
                ui.selectable_value(&mut numeric, col.clone(), col.as_str());
            }
        });
    if numeric != selection.numeric {
        log::debug!("Numeric column -> {numeric}");
        state.set_numeric(numeric);
    }

    if let Some(current) = selection.category {
        ui.add_space(8.0);
        ui.strong("Select category column");
        let mut category = current.clone();
        egui::ComboBox::from_id_salt("category_column")
            .selected_text(&category)
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                for col in &state.categorical_columns {
                    ui.selectable_value(&mut category, col.clone(), col.as_str());
                }
            });
        if category != current {
            log::debug!("Category column -> {category}");
            state.set_category(category);
        }
    }
}

// ---------------------------------------------------------------------------
// Central panel – tab bar and tab contents
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.title());
        }
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.tab {
            Tab::Overview => overview_tab(ui, state),
            Tab::Distribution => distribution_tab(ui, state),
            Tab::Category => category_tab(ui, state),
            Tab::Correlation => correlation_tab(ui, state),
        });
}

fn overview_tab(ui: &mut Ui, state: &AppState) {
    ui.heading("Dataset Preview");
    tables::preview_table(ui, state.dataset, state.preview_rows);
    ui.add_space(12.0);
    ui.heading("Basic Statistics");
    tables::describe_table(ui, state.description());
}

fn distribution_tab(ui: &mut Ui, state: &AppState) {
    let (Some(selection), Some(summary)) = (&state.selection, &state.summary) else {
        plot::info_message(ui, "Select a numeric column to see its distribution.");
        return;
    };
    let column = selection.numeric.as_str();

    ui.heading(format!("Distribution of {column}"));
    plot::histogram_plot(ui, column, &summary.histogram);
    ui.label(format!("{} values plotted.", summary.distribution.len()));

    insights(
        ui,
        &[
            format!("Shows spread and skewness of `{column}` values.").as_str(),
            "Helps identify outliers and data concentration.",
        ],
    );
}

fn category_tab(ui: &mut Ui, state: &AppState) {
    let (Some(selection), Some(summary)) = (&state.selection, &state.summary) else {
        plot::info_message(ui, "Select a numeric column to compare categories.");
        return;
    };

    match (&summary.grouped, &selection.category) {
        (Availability::Ready(groups), Some(category)) => {
            ui.heading(format!("{} by {category}", selection.numeric));
            plot::category_plot(ui, &selection.numeric, groups, state.color_map.as_ref());
            insights(
                ui,
                &[
                    "Identifies top-performing categories.",
                    "Useful for business decision-making.",
                ],
            );
        }
        (Availability::Unavailable(reason), _) => plot::info_message(ui, reason.to_string()),
        (Availability::Ready(_), None) => {
            plot::info_message(ui, "No categorical column available for analysis.")
        }
    }
}

fn correlation_tab(ui: &mut Ui, state: &AppState) {
    let Some(summary) = &state.summary else {
        plot::info_message(ui, "Not enough numeric columns for correlation analysis.");
        return;
    };

    match &summary.correlation {
        Availability::Ready(matrix) => {
            ui.heading("Correlation Matrix");
            plot::correlation_heatmap(ui, matrix);
            insights(
                ui,
                &[
                    "Shows relationships between numeric variables.",
                    "Helps detect strongly related features.",
                ],
            );
        }
        Availability::Unavailable(reason) => {
            plot::info_message(ui, reason.to_string());
            if let UnavailableReason::TooFewNumericColumns { found } = reason {
                ui.label(RichText::new(format!("{found} numeric column(s) in the dataset.")).weak());
            }
        }
    }
}

fn insights(ui: &mut Ui, lines: &[&str]) {
    ui.add_space(8.0);
    ui.strong("Insights:");
    for line in lines {
        ui.label(format!("• {line}"));
    }
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

pub fn footer(ui: &mut Ui) {
    ui.add_space(2.0);
    ui.label(
        RichText::new(
            "📘 This dashboard is designed for data analysis, visualization, and academic project demonstration.",
        )
        .italics()
        .weak(),
    );
    ui.add_space(2.0);
}
