use eframe::egui;

use crate::state::AppState;
use crate::ui::{courses, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ElectivePlannerApp {
    pub state: AppState,
}

impl ElectivePlannerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ElectivePlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.refresh_summary();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: semesters and summary ----
        egui::SidePanel::left("semester_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: credits chart ----
        if self.state.engine.is_some() {
            egui::TopBottomPanel::bottom("chart_panel")
                .default_height(220.0)
                .resizable(true)
                .show(ctx, |ui| {
                    plot::credit_chart(ui, &self.state);
                });
        }

        // ---- Central panel: course list ----
        egui::CentralPanel::default().show(ctx, |ui| {
            courses::course_list(ui, &mut self.state);
        });
    }
}
