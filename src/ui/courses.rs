use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::ColorMap;
use crate::engine::{CourseId, SelectionEngine};
use crate::state::AppState;

const REQUIRED_GREEN: Color32 = Color32::from_rgb(40, 167, 69);
const FULL_ORANGE: Color32 = Color32::from_rgb(230, 126, 34);

// ---------------------------------------------------------------------------
// Course list (central panel)
// ---------------------------------------------------------------------------

/// Render the active semester's courses with their toggles.
pub fn course_list(ui: &mut Ui, state: &mut AppState) {
    let (Some(engine), Some(semester)) = (&state.engine, &state.active_semester) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a course catalog to start planning  (File → Open…)");
        });
        return;
    };

    let view = engine.semester_view(semester);
    let colors = state.color_map.as_ref();
    let elective_count =
        view.general.len() + view.grouped.iter().map(|s| s.courses.len()).sum::<usize>();

    // Toggles are applied after rendering so the engine is not borrowed twice.
    let mut clicked: Option<CourseId> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(semester.as_str());
            ui.label(format!(
                "지정과목: {}개, 선택과목: {}개",
                view.required.len(),
                elective_count
            ));
            ui.separator();

            if !view.required.is_empty() {
                ui.strong("지정과목");
                for &id in &view.required {
                    course_row(ui, engine, colors, id, &mut clicked);
                }
                ui.add_space(8.0);
            }

            for section in &view.grouped {
                let count = engine.group(&section.key).map(|g| engine.group_count(g));
                let selected = count.as_ref().map_or(0, |c| c.selected);
                let full = count.as_ref().is_some_and(|c| c.is_full());

                let mut header = RichText::new(format!(
                    "{} 선택과목  ({} / {}개 선택)",
                    section.key.group_name, selected, section.limit
                ))
                .strong();
                if full {
                    header = header.color(FULL_ORANGE);
                }

                egui::CollapsingHeader::new(header)
                    .id_salt(&section.key)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        for &id in &section.courses {
                            course_row(ui, engine, colors, id, &mut clicked);
                        }
                    });
            }

            if !view.general.is_empty() {
                egui::CollapsingHeader::new(RichText::new("일반 선택과목").strong())
                    .id_salt(("general", semester))
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        for &id in &view.general {
                            course_row(ui, engine, colors, id, &mut clicked);
                        }
                    });
            }
        });

    if let Some(id) = clicked {
        let course = engine.course(id);
        let (semester, name) = (course.semester.clone(), course.name.clone());
        state.toggle_course(&semester, &name);
    }
}

/// One course: checkbox (or required mark), credits, subject area, track.
fn course_row(
    ui: &mut Ui,
    engine: &SelectionEngine,
    colors: Option<&ColorMap>,
    id: CourseId,
    clicked: &mut Option<CourseId>,
) {
    let course = engine.course(id);
    let area_color = colors
        .map(|c| c.color_for(&course.subject_area))
        .unwrap_or_else(|| ui.visuals().text_color());

    ui.horizontal(|ui: &mut Ui| {
        if course.is_required() {
            ui.label(RichText::new("✓").color(REQUIRED_GREEN).strong());
            ui.label(course.name.as_str());
        } else {
            let mut checked = engine.is_chosen(id);
            let response = ui
                .add_enabled(
                    engine.is_selectable(id),
                    egui::Checkbox::new(&mut checked, course.name.as_str()),
                )
                .on_disabled_hover_text("This group has reached its limit");
            if response.changed() {
                *clicked = Some(id);
            }
        }

        ui.label(RichText::new(format!("{}학점", course.credits)).weak());
        ui.label(RichText::new(course.subject_area.as_str()).color(area_color));
        if !course.track.is_empty() {
            ui.label(RichText::new(course.track.as_str()).small());
        }
        if !course.owner.is_empty() {
            ui.label(RichText::new(course.owner.as_str()).small().weak());
        }
    });
}
