use eframe::egui::{self, ScrollArea, Ui};

use nfhs_dashboard::data::model::DisplayValue;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Right side panel – single region spotlight
// ---------------------------------------------------------------------------

pub fn spotlight_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("State Spotlight");
    ui.separator();

    let Some(table) = state.table.clone() else {
        return;
    };

    let current = state.selection.spotlight_region.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("spotlight_region")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for region in table.regions() {
                if ui.selectable_label(current == region, &region).clicked() {
                    state.set_spotlight_region(region);
                }
            }
        });
    ui.add_space(6.0);

    let Some(spot) = &state.views.spotlight else {
        return;
    };
    if spot.is_empty() {
        ui.label("No data available for this state.");
        return;
    }
    if spot.indicators.is_empty() {
        ui.label("Select an indicator.");
        return;
    }

    ScrollArea::both().id_salt("spotlight_scroll").show(ui, |ui: &mut Ui| {
        egui::Grid::new("spotlight_grid")
            .striped(true)
            .show(ui, |ui: &mut Ui| {
                ui.strong("Indicator");
                for row in &spot.rows {
                    ui.strong(&row.survey);
                }
                ui.end_row();

                for (col, indicator) in spot.indicators.iter().enumerate() {
                    ui.label(indicator);
                    for row in &spot.rows {
                        ui.label(DisplayValue(row.values.get(col).copied().flatten()).to_string());
                    }
                    ui.end_row();
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Raw records for the primary indicator
// ---------------------------------------------------------------------------

pub fn raw_table(ui: &mut Ui, state: &AppState) {
    let (Some(filtered), Some(indicator)) = (
        &state.views.filtered,
        state.selection.primary_indicator(),
    ) else {
        return;
    };
    let Ok(idx) = filtered.schema().index_of(indicator) else {
        return;
    };
    let keys = filtered.schema().keys();

    ScrollArea::vertical()
        .id_salt("raw_scroll")
        .max_height(300.0)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("raw_grid")
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    ui.strong(&keys.region);
                    ui.strong(&keys.survey);
                    ui.strong(indicator);
                    ui.end_row();

                    for record in filtered.records() {
                        ui.label(&record.region);
                        ui.label(&record.survey);
                        ui.label(DisplayValue(record.value_at(idx)).to_string());
                        ui.end_row();
                    }
                });
        });
}
