use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    /// Build the app and load the configured data file straight away.
    pub fn new(config: &DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        state.load();
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Right side panel: region spotlight ----
        egui::SidePanel::right("spotlight_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                table::spotlight_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts + raw data ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.table.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("No data loaded  (File → Open…)");
                });
                return;
            }
            egui::ScrollArea::vertical().show(ui, |ui| {
                plot::comparison_chart(ui, &self.state);
                ui.separator();
                plot::trend_charts(ui, &self.state);
                ui.separator();
                ui.checkbox(&mut self.state.show_raw, "Show raw data for selected regions");
                if self.state.show_raw {
                    table::raw_table(ui, &self.state);
                }
            });
        });
    }
}
