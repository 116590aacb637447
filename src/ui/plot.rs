use std::collections::BTreeMap;

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use nfhs_dashboard::data::LongTable;

use crate::state::AppState;

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Region comparison: grouped bars, one group per region, one bar per survey
// ---------------------------------------------------------------------------

/// Render the primary indicator for every visible region, grouped by survey.
pub fn comparison_chart(ui: &mut Ui, state: &AppState) {
    let Some(matrix) = &state.views.comparison else {
        ui.label("Select an indicator to compare regions.");
        return;
    };
    ui.heading(format!("Comparison: {}", matrix.indicator));

    if matrix.cells.iter().flatten().all(Option::is_none) {
        ui.label("No data available for the selected combination.");
        return;
    }

    let n_surveys = matrix.surveys.len().max(1) as f64;
    let bar_width = 0.8 / n_surveys;

    let charts: Vec<BarChart> = matrix
        .surveys
        .iter()
        .enumerate()
        .map(|(col, survey)| {
            let offset = (col as f64 - (n_surveys - 1.0) / 2.0) * bar_width;
            let bars = matrix
                .regions
                .iter()
                .enumerate()
                .filter_map(|(row, region)| {
                    let value = matrix.cells[row][col]?;
                    Some(
                        Bar::new(row as f64 + offset, value)
                            .width(bar_width)
                            .name(format!("{region} ({survey})")),
                    )
                })
                .collect();
            BarChart::new(bars)
                .name(survey)
                .color(state.views.survey_colors.color_for(survey))
        })
        .collect();

    let labels = matrix.regions.clone();
    Plot::new("comparison_plot")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .y_axis_label(matrix.indicator.clone())
        .x_axis_formatter(move |mark, _range| axis_label(&labels, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Multi-indicator trends: one plot per survey, one line per region
// ---------------------------------------------------------------------------

/// Render the selected indicators side by side, faceted by survey wave.
pub fn trend_charts(ui: &mut Ui, state: &AppState) {
    ui.heading("Trends across selected indicators");

    let indicators = &state.selection.indicators;
    if indicators.is_empty() {
        ui.label("Select one or more indicators to compare.");
        return;
    }

    let trends = state.views.trends.drop_missing();
    if trends.is_empty() {
        ui.label("No data available for the selected combination.");
        return;
    }

    let facets = facet_by_survey(&trends, indicators);
    ui.columns(facets.len(), |columns| {
        for (ui, (survey, lines)) in columns.iter_mut().zip(&facets) {
            ui.strong(survey.as_str());
            let labels = indicators.clone();
            Plot::new(format!("trend_plot_{survey}"))
                .legend(Legend::default())
                .height(CHART_HEIGHT)
                .x_axis_formatter(move |mark, _range| axis_label(&labels, mark.value))
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    for (region, points) in lines {
                        let color = state.views.region_colors.color_for(region);
                        plot_ui.line(
                            Line::new(PlotPoints::from(points.clone()))
                                .name(region)
                                .color(color)
                                .width(1.5),
                        );
                        plot_ui.points(
                            Points::new(PlotPoints::from(points.clone()))
                                .name(region)
                                .color(color)
                                .radius(3.0),
                        );
                    }
                });
        }
    });
}

/// survey → region → points `[indicator position, value]`.
type Facets = BTreeMap<String, BTreeMap<String, Vec<[f64; 2]>>>;

fn facet_by_survey(trends: &LongTable, indicators: &[String]) -> Facets {
    let mut facets = Facets::new();
    for row in &trends.rows {
        let (Some(x), Some(y)) = (indicators.iter().position(|i| *i == row.indicator), row.value)
        else {
            continue;
        };
        facets
            .entry(row.survey.clone())
            .or_default()
            .entry(row.region.clone())
            .or_default()
            .push([x as f64, y]);
    }
    for regions in facets.values_mut() {
        for points in regions.values_mut() {
            points.sort_by(|a, b| a[0].total_cmp(&b[0]));
        }
    }
    facets
}

/// Category label for an integer axis position; blank between categories.
fn axis_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}
