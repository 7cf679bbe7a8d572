use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Credits by subject area (bottom panel)
// ---------------------------------------------------------------------------

/// Bar chart of chosen credits per subject area for the chart scope.
pub fn credit_chart(ui: &mut Ui, state: &AppState) {
    let Some(engine) = &state.engine else {
        return;
    };

    let scope = state.chart_scope();
    let summary = engine.summarize(&scope);

    // One chart per area so each gets its own legend entry and colour.
    let charts: Vec<BarChart> = summary
        .by_subject_area
        .iter()
        .enumerate()
        .map(|(i, (area, credits))| {
            let color = state
                .color_map
                .as_ref()
                .map(|cm| cm.color_for(area))
                .unwrap_or(Color32::LIGHT_BLUE);
            let bar = Bar::new(i as f64, *credits as f64).name(area).width(0.7);
            BarChart::new(vec![bar]).name(area).color(color)
        })
        .collect();

    Plot::new("credit_chart")
        .legend(Legend::default())
        .x_axis_label(format!("{scope} – 총 {}학점", summary.total_credits))
        .y_axis_label("Credits")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}
