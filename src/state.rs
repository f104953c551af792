use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::model::Dataset;
use crate::data::summary::{
    self, classify_columns, ColumnDescription, ColumnSelection, GlobalMetrics, SummaryResult,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Distribution,
    Category,
    Correlation,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Distribution, Tab::Category, Tab::Correlation];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "📄 Dataset Overview",
            Tab::Distribution => "📊 Distribution Analysis",
            Tab::Category => "🏷 Category Analysis",
            Tab::Correlation => "🔗 Correlation",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Process-wide dataset, fixed after startup.
    pub dataset: &'static Dataset,

    /// Sidebar choices, in dataset column order.
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,

    /// Current sidebar selection (None when the dataset has no numeric column).
    pub selection: Option<ColumnSelection>,

    /// Views for the current selection, recomputed when it changes.
    pub summary: Option<SummaryResult>,

    /// Missing cells per column, shown next to the global count.
    pub missing_by_column: Vec<(String, usize)>,

    /// Describe table used when there is no summary to take it from.
    fallback_description: Vec<ColumnDescription>,

    /// One colour per value of the selected category.
    pub color_map: Option<ColorMap>,

    pub tab: Tab,
    pub histogram_bins: usize,
    pub preview_rows: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: &'static Dataset, config: &DashboardConfig) -> Self {
        let (numeric_columns, categorical_columns) = classify_columns(dataset);
        let selection = ColumnSelection::default_for(dataset);

        let mut state = Self {
            dataset,
            numeric_columns,
            categorical_columns,
            selection,
            summary: None,
            missing_by_column: summary::missing_by_column(dataset),
            fallback_description: Vec::new(),
            color_map: None,
            tab: Tab::Overview,
            histogram_bins: config.histogram_bins,
            preview_rows: config.preview_rows,
            status_message: None,
        };
        state.refresh();
        state
    }

    /// Recompute every view from the current selection.
    pub fn refresh(&mut self) {
        self.color_map = None;

        let Some(selection) = &self.selection else {
            self.summary = None;
            self.fallback_description = summary::describe(self.dataset);
            self.status_message = Some("Dataset has no numeric column to analyse.".to_string());
            return;
        };

        log::debug!("Recomputing summary for {selection:?}");
        match summary::summarize(self.dataset, selection, self.histogram_bins) {
            Ok(result) => {
                if result.grouped.is_unavailable() {
                    log::debug!("No category column, group view disabled");
                }
                if let Some(groups) = result.grouped.ready() {
                    let categories: Vec<String> =
                        groups.iter().map(|g| g.category.clone()).collect();
                    self.color_map = Some(ColorMap::new(&categories));
                }
                self.summary = Some(result);
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Invalid selection: {e}");
                self.summary = None;
                self.fallback_description = summary::describe(self.dataset);
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Switch the numeric column and recompute.
    pub fn set_numeric(&mut self, column: String) {
        if let Some(selection) = &mut self.selection {
            selection.numeric = column;
            self.refresh();
        }
    }

    /// Switch the category column and recompute.
    pub fn set_category(&mut self, column: String) {
        if let Some(selection) = &mut self.selection {
            selection.category = Some(column);
            self.refresh();
        }
    }

    pub fn metrics(&self) -> GlobalMetrics {
        match &self.summary {
            Some(s) => s.metrics,
            None => summary::global_metrics(self.dataset),
        }
    }

    pub fn description(&self) -> &[ColumnDescription] {
        match &self.summary {
            Some(s) => &s.description,
            None => &self.fallback_description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;
    use crate::data::summary::Availability;

    fn leak(ds: Dataset) -> &'static Dataset {
        Box::leak(Box::new(ds))
    }

    fn sales() -> &'static Dataset {
        let s = |v: &str| Some(v.to_string());
        leak(
            Dataset::from_columns(vec![
                Column::numeric("Amount", vec![Some(10.0), Some(20.0), Some(30.0)]),
                Column::categorical("Category", vec![s("A"), s("B"), s("A")]),
                Column::categorical("Gender", vec![s("F"), s("F"), s("M")]),
                Column::numeric("Quantity", vec![Some(3.0), Some(1.0), Some(2.0)]),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn starts_with_default_selection() {
        let state = AppState::new(sales(), &DashboardConfig::default());
        let sel = state.selection.as_ref().unwrap();
        assert_eq!(sel.numeric, "Amount");
        assert_eq!(sel.category.as_deref(), Some("Category"));
        assert!(state.summary.is_some());
        assert!(state.color_map.is_some());
        assert_eq!(state.metrics().row_count, 3);
        assert_eq!(state.description().len(), 4);
        assert_eq!(state.tab, Tab::Overview);
        assert_eq!(state.missing_by_column.len(), 4);
    }

    #[test]
    fn changing_selection_recomputes() {
        let mut state = AppState::new(sales(), &DashboardConfig::default());
        state.set_category("Gender".into());
        let grouped = state.summary.as_ref().unwrap().grouped.ready().unwrap();
        assert_eq!(grouped[0].category, "F");
        assert_eq!(grouped[0].sum, 30.0);

        state.set_numeric("Quantity".into());
        let summary = state.summary.as_ref().unwrap();
        assert!((summary.selected_mean - 2.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_selection_shows_status() {
        let mut state = AppState::new(sales(), &DashboardConfig::default());
        state.set_numeric("Category".into());
        assert!(state.summary.is_none());
        assert!(state.status_message.as_deref().unwrap().contains("Category"));
        assert_eq!(state.description().len(), 4);
    }

    #[test]
    fn text_only_dataset_has_no_selection() {
        let ds = leak(
            Dataset::from_columns(vec![Column::categorical("c", vec![Some("x".into())])]).unwrap(),
        );
        let state = AppState::new(ds, &DashboardConfig::default());
        assert!(state.selection.is_none());
        assert!(state.status_message.is_some());
        assert_eq!(state.metrics().column_count, 1);
        assert_eq!(state.description().len(), 1);
    }

    #[test]
    fn no_category_column_leaves_group_view_unavailable() {
        let ds = leak(
            Dataset::from_columns(vec![Column::numeric("n", vec![Some(1.0), Some(2.0)])]).unwrap(),
        );
        let state = AppState::new(ds, &DashboardConfig::default());
        let summary = state.summary.as_ref().unwrap();
        assert!(summary.grouped.is_unavailable());
        assert!(matches!(summary.correlation, Availability::Unavailable(_)));
        assert!(state.color_map.is_none());
    }
}
