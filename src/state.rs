use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use nfhs_dashboard::data::{
    long_format, pivot_by_indicator, spotlight, DataError, DataSource, FilterSelection,
    LongTable, Matrix, Spotlight, Table,
};

use crate::color::SeriesColors;
use crate::config::{DashboardConfig, DEFAULT_INDICATOR_COUNT};

// ---------------------------------------------------------------------------
// Derived views for the current selection
// ---------------------------------------------------------------------------

/// Everything the panels draw, recomputed from the table on every change.
#[derive(Default)]
pub struct Views {
    /// Records left after the area / region filter.
    pub filtered: Option<Table>,
    /// Region × survey for the primary indicator.
    pub comparison: Option<Matrix>,
    /// Selected indicators in long form.
    pub trends: LongTable,
    pub spotlight: Option<Spotlight>,
    pub survey_colors: SeriesColors,
    pub region_colors: SeriesColors,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub source: DataSource,

    /// Current table (None until a load succeeds).
    pub table: Option<Arc<Table>>,

    pub selection: FilterSelection,

    pub views: Views,

    /// Show the raw records table under the charts.
    pub show_raw: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            source: DataSource::new(&config.data_path),
            table: None,
            selection: FilterSelection::default(),
            views: Views::default(),
            show_raw: false,
            status_message: None,
        }
    }

    /// Fetch the table from the data source (loading it on first use) and
    /// rebuild the views.
    pub fn load(&mut self) {
        match self.source.table() {
            Ok(table) => {
                self.status_message = None;
                let changed = self
                    .table
                    .as_ref()
                    .map_or(true, |current| !Arc::ptr_eq(current, &table));
                if changed {
                    log::info!(
                        "Using {} records, {} indicators",
                        table.len(),
                        table.indicators().len()
                    );
                    if self.table.is_none() {
                        self.selection = FilterSelection::initial(&table, DEFAULT_INDICATOR_COUNT);
                    } else {
                        self.selection.retain_known(&table);
                    }
                    self.table = Some(table);
                    self.refresh();
                }
            }
            Err(e) => self.report_load_error(&e),
        }
    }

    /// Point the session at a different file.
    pub fn open(&mut self, path: PathBuf) {
        self.source = DataSource::new(path);
        self.table = None;
        self.views = Views::default();
        self.load();
    }

    /// Drop the cached table and read the file again.
    pub fn reload(&mut self) {
        self.source.invalidate();
        self.load();
    }

    fn report_load_error(&mut self, e: &DataError) {
        log::error!("Failed to load data: {e}");
        self.status_message = Some(format!(
            "Error: {e}. Pass a CSV path on the command line or set NFHS_DATA."
        ));
    }

    /// Recompute every view from the table and the current selection.
    pub fn refresh(&mut self) {
        let Some(table) = self.table.clone() else {
            self.views = Views::default();
            return;
        };
        match compute_views(&table, &self.selection) {
            Ok(views) => self.views = views,
            Err(e) => {
                // Selections are pruned against the schema, so this is a bug.
                log::error!("Failed to build views: {e}");
                self.status_message = Some(format!("Error: {e}"));
                let stale = std::mem::take(&mut self.views);
                self.views = Views {
                    survey_colors: stale.survey_colors,
                    region_colors: stale.region_colors,
                    ..Views::default()
                };
            }
        }
    }

    pub fn set_area(&mut self, area: String) {
        self.selection.area = Some(area);
        self.refresh();
    }

    pub fn toggle_region(&mut self, region: &str) {
        self.selection.toggle_region(region);
        self.refresh();
    }

    pub fn toggle_indicator(&mut self, indicator: &str) {
        self.selection.toggle_indicator(indicator);
        self.refresh();
    }

    /// Make `indicator` the primary (first) one.
    pub fn set_primary_indicator(&mut self, indicator: &str) {
        self.selection.indicators.retain(|i| i != indicator);
        self.selection.indicators.insert(0, indicator.to_string());
        self.refresh();
    }

    /// Clear the region restriction (show all regions).
    pub fn select_all_regions(&mut self) {
        self.selection.regions.clear();
        self.refresh();
    }

    pub fn set_spotlight_region(&mut self, region: String) {
        self.selection.spotlight_region = Some(region);
        self.refresh();
    }

    /// Write the comparison matrix as pretty JSON.
    pub fn export_comparison(&self, path: &Path) -> Result<()> {
        let matrix = self
            .views
            .comparison
            .as_ref()
            .context("no comparison view to export")?;
        let json = serde_json::to_string_pretty(matrix).context("serializing comparison view")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported '{}' to {}", matrix.indicator, path.display());
        Ok(())
    }
}

fn compute_views(table: &Table, selection: &FilterSelection) -> Result<Views, DataError> {
    let filtered = selection.apply(table);

    let comparison = selection
        .primary_indicator()
        .map(|ind| pivot_by_indicator(&filtered, ind))
        .transpose()?;

    let trends = long_format(&filtered, &selection.indicators)?;

    let focus = match (&selection.spotlight_region, &selection.area) {
        (Some(region), Some(area)) => Some(spotlight(table, region, area, &selection.indicators)?),
        _ => None,
    };

    let surveys = table.surveys();
    let regions = table.regions();

    Ok(Views {
        filtered: Some(filtered),
        comparison,
        trends,
        spotlight: focus,
        survey_colors: SeriesColors::new(&surveys),
        region_colors: SeriesColors::new(&regions),
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn fixture_state() -> AppState {
        let config = DashboardConfig {
            data_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/nfhs_sample.csv"),
        };
        let mut state = AppState::new(&config);
        state.load();
        state
    }

    #[test]
    fn load_builds_views_for_the_initial_selection() {
        let state = fixture_state();
        assert!(state.status_message.is_none());
        assert!(state.views.comparison.is_some());
        assert!(!state.views.trends.is_empty());
    }

    #[test]
    fn failed_refresh_clears_stale_views_but_keeps_colors() {
        let mut state = fixture_state();
        let kerala = state.views.region_colors.color_for("Kerala");

        state.selection.indicators = vec!["Height".to_string()];
        state.refresh();

        let msg = state.status_message.as_deref().unwrap_or_default();
        assert!(msg.contains("unknown indicator 'Height'"), "{msg}");
        assert!(state.views.filtered.is_none());
        assert!(state.views.comparison.is_none());
        assert!(state.views.trends.is_empty());
        assert!(state.views.spotlight.is_none());
        assert_eq!(state.views.region_colors.color_for("Kerala"), kerala);
    }
}
