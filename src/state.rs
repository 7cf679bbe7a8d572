use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::data::loader::load_file;
use crate::data::model::Catalog;
use crate::data::payload::CatalogPayload;
use crate::engine::{Scope, SelectionEngine, Summary};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded plan (None until user loads a catalog).
    pub engine: Option<SelectionEngine>,

    /// Semester whose courses are shown.
    pub active_semester: Option<String>,

    /// Whole-plan summary, refreshed after every accepted toggle.
    pub summary: Option<Summary>,

    /// Engine revision `summary` was computed at.
    summary_revision: Option<u64>,

    /// Colour per subject area.
    pub color_map: Option<ColorMap>,

    /// Chart the whole plan instead of the active semester.
    pub chart_all_semesters: bool,

    /// Where the catalog came from, for the title bar.
    pub source_path: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load a catalog file and start a fresh plan from it.
    pub fn open_catalog(&mut self, path: &Path) -> Result<()> {
        let catalog = load_file(path).with_context(|| format!("loading {}", path.display()))?;
        log::info!(
            "Loaded '{}' with {} courses over {:?}",
            catalog.title,
            catalog.len(),
            catalog.semesters()
        );
        self.source_path = Some(path.to_path_buf());
        self.set_catalog(catalog);
        Ok(())
    }

    /// Ingest a newly loaded catalog: new engine, first semester, colours.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.color_map = Some(ColorMap::new(&catalog.subject_areas()));
        let engine = SelectionEngine::new(catalog);
        self.active_semester = engine.semesters().first().cloned();
        self.engine = Some(engine);
        self.summary_revision = None;
        self.refresh_summary();
        self.status_message = None;
    }

    /// Recompute the cached whole-plan summary if the plan changed since.
    pub fn refresh_summary(&mut self) {
        let Some(engine) = &self.engine else {
            self.summary = None;
            self.summary_revision = None;
            return;
        };
        if self.summary.is_some() && self.summary_revision == Some(engine.revision()) {
            return;
        }
        self.summary = Some(engine.summarize(&Scope::All));
        self.summary_revision = Some(engine.revision());
    }

    /// Scope the chart currently shows.
    pub fn chart_scope(&self) -> Scope {
        match (&self.active_semester, self.chart_all_semesters) {
            (Some(semester), false) => Scope::Semester(semester.clone()),
            _ => Scope::All,
        }
    }

    /// Toggle a course by `(semester, name)`; a rejection becomes the status message.
    pub fn toggle_course(&mut self, semester: &str, name: &str) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        match engine.toggle_by_name(semester, name) {
            Ok(outcome) => {
                if let Some(group) = &outcome.group {
                    log::debug!("{}: {} / {}", group.key, group.selected, group.limit);
                }
                self.status_message = None;
                self.refresh_summary();
            }
            Err(e) => {
                log::warn!("Toggle rejected: {e}");
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// Write the catalog and limit table as JSON.
    pub fn export_catalog(&self, path: &Path) -> Result<()> {
        let engine = self.engine.as_ref().context("no catalog loaded")?;
        let json = CatalogPayload::from_catalog(engine.catalog())
            .to_json()
            .context("encoding catalog")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported catalog to {}", path.display());
        Ok(())
    }

    /// Window heading: catalog title, or a placeholder.
    pub fn title(&self) -> String {
        match &self.engine {
            Some(engine) => format!("{} – Elective Planner", engine.catalog().title),
            None => "Elective Planner".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Course, GroupKey, GroupLimit, Requirement};

    fn catalog() -> Catalog {
        let course = |name: &str, requirement| Course {
            semester: "1학년 1학기".into(),
            track: String::new(),
            name: name.into(),
            credits: 2,
            requirement,
            subject_area: "과학".into(),
            owner: String::new(),
            selection_group_name: Some("과학탐구".into()),
            selection_group_limit: Some(1),
        };
        Catalog::new(
            "한빛고",
            vec![course("물리학", Requirement::Elective), course("화학", Requirement::Elective)],
            vec![GroupLimit { key: GroupKey::new("1학년 1학기", "과학탐구"), limit: 1 }],
        )
    }

    #[test]
    fn rejected_toggle_sets_status_and_keeps_summary() {
        let mut state = AppState::default();
        state.set_catalog(catalog());
        assert_eq!(state.active_semester.as_deref(), Some("1학년 1학기"));
        assert_eq!(state.title(), "한빛고 – Elective Planner");

        state.toggle_course("1학년 1학기", "물리학");
        assert_eq!(state.summary.as_ref().unwrap().total_credits, 2);
        assert!(state.status_message.is_none());

        state.toggle_course("1학년 1학기", "화학");
        assert!(state.status_message.as_deref().unwrap().contains("과학탐구"));
        assert_eq!(state.summary.as_ref().unwrap().total_credits, 2);
    }

    #[test]
    fn unknown_course_name_is_reported() {
        let mut state = AppState::default();
        state.set_catalog(catalog());
        state.toggle_course("1학년 1학기", "지구과학");
        assert!(state.status_message.is_some());
        assert_eq!(state.summary.as_ref().unwrap().course_count, 0);
    }

    #[test]
    fn summary_tracks_engine_revision() {
        let mut state = AppState::default();
        state.set_catalog(catalog());
        assert_eq!(state.summary_revision, Some(0));

        // Toggle behind the state's back; the next refresh must pick it up.
        let engine = state.engine.as_mut().unwrap();
        engine.toggle_by_name("1학년 1학기", "물리학").unwrap();
        assert_eq!(engine.revision(), 1);
        assert_eq!(state.summary.as_ref().unwrap().course_count, 0);

        state.refresh_summary();
        assert_eq!(state.summary_revision, Some(1));
        assert_eq!(state.summary.as_ref().unwrap().course_count, 1);

        // Reloading starts over at revision 0 with a fresh summary.
        state.set_catalog(catalog());
        assert_eq!(state.summary_revision, Some(0));
        assert_eq!(state.summary.as_ref().unwrap().course_count, 0);
    }

    #[test]
    fn chart_scope_follows_toggle() {
        let mut state = AppState::default();
        assert_eq!(state.chart_scope(), Scope::All);
        state.set_catalog(catalog());
        assert_eq!(state.chart_scope(), Scope::Semester("1학년 1학기".into()));
        state.chart_all_semesters = true;
        assert_eq!(state.chart_scope(), Scope::All);
    }

    #[test]
    fn export_requires_a_catalog() {
        let state = AppState::default();
        let dir = tempfile::tempdir().unwrap();
        assert!(state.export_catalog(&dir.path().join("out.json")).is_err());
    }

    #[test]
    fn exported_catalog_reopens() {
        let mut state = AppState::default();
        state.set_catalog(catalog());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        state.export_catalog(&path).unwrap();

        let mut reopened = AppState::default();
        reopened.open_catalog(&path).unwrap();
        assert_eq!(
            reopened.engine.as_ref().unwrap().catalog(),
            state.engine.as_ref().unwrap().catalog()
        );
        assert_eq!(reopened.source_path.as_deref(), Some(path.as_path()));
    }
}
