use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Navigation");
    ui.separator();

    let Some(table) = state.table.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    let areas = table.areas();
    let indicators = table.indicators().to_vec();
    let regions = table.regions();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Area type ----
            ui.strong("Area type");
            let current_area = state.selection.area.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("area_type")
                .selected_text(&current_area)
                .show_ui(ui, |ui: &mut Ui| {
                    for area in &areas {
                        if ui.selectable_label(current_area == *area, area).clicked() {
                            state.set_area(area.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Primary indicator ----
            ui.strong("Indicator");
            let primary = state
                .selection
                .primary_indicator()
                .unwrap_or_default()
                .to_string();
            egui::ComboBox::from_id_salt("primary_indicator")
                .selected_text(&primary)
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for ind in &indicators {
                        if ui.selectable_label(primary == *ind, ind).clicked() {
                            state.set_primary_indicator(ind);
                        }
                    }
                });
            ui.separator();

            // ---- Indicators for the trend comparison ----
            let header = format!(
                "Compare indicators  ({}/{})",
                state.selection.indicators.len(),
                indicators.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("compare_indicators")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    for ind in &indicators {
                        let mut checked = state.selection.indicators.contains(ind);
                        if ui.checkbox(&mut checked, ind).changed() {
                            state.toggle_indicator(ind);
                        }
                    }
                });

            // ---- Regions ----
            let n_selected = if state.selection.regions.is_empty() {
                regions.len()
            } else {
                state.selection.regions.len()
            };
            let header = format!("Regions  ({n_selected}/{})", regions.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("regions")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    if ui.small_button("All").clicked() {
                        state.select_all_regions();
                    }
                    for region in &regions {
                        let mut checked = state.selection.regions.contains(region);
                        if ui.checkbox(&mut checked, region).changed() {
                            state.toggle_region(region);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
            let can_export = state.views.comparison.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export comparison…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            let visible = state.views.filtered.as_ref().map_or(0, |t| t.len());
            ui.label(format!(
                "{}: {} records loaded, {} visible",
                state.source.path().display(),
                table.len(),
                visible
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open NFHS data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.open(path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export comparison")
        .add_filter("JSON", &["json"])
        .set_file_name("comparison.json")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_comparison(&path) {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
