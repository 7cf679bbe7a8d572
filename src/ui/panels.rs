use eframe::egui::{self, Align, Color32, Layout, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – semesters and running summary
// ---------------------------------------------------------------------------

/// Render the semester tabs and the list of chosen courses.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Semesters");
    ui.separator();

    let Some(engine) = &state.engine else {
        ui.label("No catalog loaded.");
        return;
    };

    let semesters = engine.semesters().to_vec();
    let mut picked: Option<String> = None;

    for semester in &semesters {
        let credits = engine.semester_credits(semester);
        let active = state.active_semester.as_deref() == Some(semester.as_str());
        if ui
            .selectable_label(active, format!("{semester}  ({credits}학점)"))
            .clicked()
        {
            picked = Some(semester.clone());
        }
    }

    ui.add_space(8.0);
    ui.heading("Selected courses");
    if let Some(summary) = &state.summary {
        ui.label(RichText::new(format!("총 학점: {}학점", summary.total_credits)).strong());
    }
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for semester in &semesters {
                let chosen = engine.chosen_in(semester);
                if chosen.is_empty() {
                    continue;
                }
                ui.strong(semester.as_str());
                for id in chosen {
                    let course = engine.course(id);
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label(course.name.as_str());
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
                            ui.label(format!("{}학점", course.credits));
                        });
                    });
                }
                ui.separator();
            }
        });

    if let Some(semester) = picked {
        state.active_semester = Some(semester);
    }
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
            if ui
                .add_enabled(state.engine.is_some(), egui::Button::new("Export catalog…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        let title = ui.strong(state.title());
        if let Some(path) = &state.source_path {
            title.on_hover_text(path.display().to_string());
        }

        if let Some(summary) = &state.summary {
            ui.separator();
            ui.label(format!(
                "{} courses chosen, {} credits",
                summary.course_count, summary.total_credits
            ));
        }

        ui.separator();

        if ui
            .selectable_label(state.chart_all_semesters, "Chart all semesters")
            .clicked()
        {
            state.chart_all_semesters = !state.chart_all_semesters;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg.as_str()).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open course catalog")
        .add_filter("Supported files", &["xlsx", "xls", "csv", "json"])
        .add_filter("Excel", &["xlsx", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("Exported catalog", &["json"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.open_catalog(&path) {
            log::error!("Failed to load catalog: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let default_name = match &state.engine {
        Some(engine) => format!("{}_과목선택.json", engine.catalog().title),
        None => return,
    };

    let file = rfd::FileDialog::new()
        .set_title("Export course catalog")
        .add_filter("JSON", &["json"])
        .set_file_name(default_name)
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_catalog(&path) {
            log::error!("Failed to export catalog: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
