use std::collections::BTreeSet;

use super::model::Table;

// ---------------------------------------------------------------------------
// Filter selection: what the user picked for the current interaction
// ---------------------------------------------------------------------------

/// User choices that drive every derived view.
///
/// An empty `regions` set means "all regions". `area == None` means no area
/// restriction, which only happens before a table is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub area: Option<String>,
    pub regions: BTreeSet<String>,
    pub indicators: Vec<String>,
    pub spotlight_region: Option<String>,
}

impl FilterSelection {
    /// Default selection for a freshly loaded table: first area, all regions,
    /// the first `n_indicators` indicators, and the first region in the spotlight.
    pub fn initial(table: &Table, n_indicators: usize) -> Self {
        Self {
            area: table.areas().into_iter().next(),
            regions: BTreeSet::new(),
            indicators: table.indicators().iter().take(n_indicators).cloned().collect(),
            spotlight_region: table.regions().into_iter().next(),
        }
    }

    /// The primary indicator: the first one selected.
    pub fn primary_indicator(&self) -> Option<&str> {
        self.indicators.first().map(String::as_str)
    }

    /// Toggle a region in the region restriction.
    pub fn toggle_region(&mut self, region: &str) {
        if !self.regions.remove(region) {
            self.regions.insert(region.to_string());
        }
    }

    /// Toggle an indicator, keeping selection order.
    pub fn toggle_indicator(&mut self, indicator: &str) {
        if let Some(pos) = self.indicators.iter().position(|i| i == indicator) {
            self.indicators.remove(pos);
        } else {
            self.indicators.push(indicator.to_string());
        }
    }

    /// Drop choices that no longer exist in `table` (e.g. after a reload).
    pub fn retain_known(&mut self, table: &Table) {
        let regions: BTreeSet<String> = table.regions().into_iter().collect();
        self.regions.retain(|r| regions.contains(r));
        self.indicators.retain(|i| table.schema().contains(i));
        if self.area.as_ref().is_some_and(|a| !table.areas().contains(a)) {
            self.area = table.areas().into_iter().next();
        }
        if self
            .spotlight_region
            .as_ref()
            .is_some_and(|r| !regions.contains(r))
        {
            self.spotlight_region = regions.into_iter().next();
        }
    }

    /// Apply the area and region parts of the selection.
    pub fn apply(&self, table: &Table) -> Table {
        match &self.area {
            Some(area) => filter_rows(table, area, &self.regions),
            None => table.derive(
                table
                    .records()
                    .iter()
                    .filter(|r| self.regions.is_empty() || self.regions.contains(&r.region))
                    .cloned()
                    .collect(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// filter_rows
// ---------------------------------------------------------------------------

/// Records of the given area type, restricted to `regions` when it is non-empty.
/// Record order is preserved and the input table is left untouched.
pub fn filter_rows(table: &Table, area: &str, regions: &BTreeSet<String>) -> Table {
    let records = table
        .records()
        .iter()
        .filter(|r| r.area == area)
        .filter(|r| regions.is_empty() || regions.contains(&r.region))
        .cloned()
        .collect();
    table.derive(records)
}
