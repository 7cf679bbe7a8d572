use std::collections::{BTreeMap, BTreeSet};

use crate::data::model::{Catalog, Course, GroupKey};

use super::error::SelectionError;
use super::summary::GroupCount;

// ---------------------------------------------------------------------------
// Identifiers and group definitions
// ---------------------------------------------------------------------------

/// Position of a course in the engine's catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CourseId(usize);

/// A "pick N" quota over the courses of one semester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionGroup {
    pub key: GroupKey,
    pub limit: u32,
    /// Every course whose group reference resolves here, in catalog order.
    members: Vec<CourseId>,
}

// ---------------------------------------------------------------------------
// Views handed to the UI
// ---------------------------------------------------------------------------

/// Elective courses sharing one quota, as shown under a single heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSection {
    pub key: GroupKey,
    pub limit: u32,
    pub courses: Vec<CourseId>,
}

/// A semester's courses split the way the course list displays them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SemesterView {
    pub required: Vec<CourseId>,
    /// Constrained electives, sections in order of first appearance.
    pub grouped: Vec<GroupSection>,
    /// Electives without a (resolvable) quota.
    pub general: Vec<CourseId>,
}

/// What a successful toggle changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub course: CourseId,
    /// Whether the course is chosen after the toggle.
    pub selected: bool,
    pub group: Option<GroupCount>,
    pub semester_credits: u32,
}

// ---------------------------------------------------------------------------
// SelectionEngine
// ---------------------------------------------------------------------------

/// Owns the catalog and the per-semester set of chosen courses.
///
/// The chosen set is the only mutable state. A group's selection is always
/// derived from it ([`SelectionEngine::selected`]), so group counts cannot
/// drift from what is actually chosen.
#[derive(Debug, Clone)]
pub struct SelectionEngine {
    catalog: Catalog,
    semesters: Vec<String>,
    groups: Vec<SelectionGroup>,
    group_index: BTreeMap<GroupKey, usize>,
    chosen: BTreeMap<String, BTreeSet<CourseId>>,
    revision: u64,
}

impl SelectionEngine {
    /// Build groups from the limit table and pre-select every required course.
    pub fn new(catalog: Catalog) -> Self {
        let semesters = catalog.semesters();

        let mut groups: Vec<SelectionGroup> = Vec::new();
        let mut group_index = BTreeMap::new();
        for gl in &catalog.group_limits {
            if gl.limit == 0 || group_index.contains_key(&gl.key) {
                continue;
            }
            let members = catalog
                .courses
                .iter()
                .enumerate()
                .filter(|(_, c)| declares_group(c, &gl.key))
                .map(|(i, _)| CourseId(i))
                .collect();
            group_index.insert(gl.key.clone(), groups.len());
            groups.push(SelectionGroup {
                key: gl.key.clone(),
                limit: gl.limit,
                members,
            });
        }

        let mut chosen: BTreeMap<String, BTreeSet<CourseId>> = semesters
            .iter()
            .map(|s| (s.clone(), BTreeSet::new()))
            .collect();
        for (i, course) in catalog.courses.iter().enumerate() {
            if course.is_required() {
                chosen
                    .entry(course.semester.clone())
                    .or_default()
                    .insert(CourseId(i));
            }
        }

        log::info!(
            "Selection engine ready: {} courses, {} semesters, {} groups",
            catalog.len(),
            semesters.len(),
            groups.len()
        );

        Self {
            catalog,
            semesters,
            groups,
            group_index,
            chosen,
            revision: 0,
        }
    }

    // -- Queries --

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Semesters in display order.
    pub fn semesters(&self) -> &[String] {
        &self.semesters
    }

    /// Bumped on every successful toggle.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Look up a course.
    ///
    /// # Panics
    ///
    /// If `id` was not handed out by this engine.
    pub fn course(&self, id: CourseId) -> &Course {
        &self.catalog.courses[id.0]
    }

    pub fn courses(&self) -> impl Iterator<Item = (CourseId, &Course)> {
        self.catalog
            .courses
            .iter()
            .enumerate()
            .map(|(i, c)| (CourseId(i), c))
    }

    pub fn courses_in<'a>(&'a self, semester: &'a str) -> impl Iterator<Item = (CourseId, &'a Course)> {
        self.courses().filter(move |(_, c)| c.semester == semester)
    }

    pub fn find(&self, semester: &str, name: &str) -> Option<CourseId> {
        self.courses_in(semester)
            .find(|(_, c)| c.name == name)
            .map(|(id, _)| id)
    }

    pub fn is_chosen(&self, id: CourseId) -> bool {
        self.catalog
            .courses
            .get(id.0)
            .and_then(|c| self.chosen.get(&c.semester))
            .is_some_and(|set| set.contains(&id))
    }

    /// Chosen courses of a semester in catalog order.
    pub fn chosen_in(&self, semester: &str) -> Vec<CourseId> {
        self.chosen
            .get(semester)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Groups in limit-table order.
    pub fn groups(&self) -> &[SelectionGroup] {
        &self.groups
    }

    pub fn group(&self, key: &GroupKey) -> Option<&SelectionGroup> {
        self.group_index.get(key).map(|&i| &self.groups[i])
    }

    /// The quota a course is subject to. `None` when the course declares no
    /// group or its group has no parsed limit.
    pub fn group_of(&self, id: CourseId) -> Option<&SelectionGroup> {
        let course = self.catalog.courses.get(id.0)?;
        let name = course.selection_group_name.as_ref()?;
        self.group(&GroupKey::new(course.semester.clone(), name.clone()))
    }

    /// Members of `group` that are currently chosen, in catalog order.
    pub fn selected(&self, group: &SelectionGroup) -> Vec<CourseId> {
        group
            .members
            .iter()
            .copied()
            .filter(|&id| self.is_chosen(id))
            .collect()
    }

    pub fn group_count(&self, group: &SelectionGroup) -> GroupCount {
        GroupCount {
            key: group.key.clone(),
            selected: self.selected(group).len(),
            limit: group.limit,
        }
    }

    /// Whether the course's toggle control should be enabled.
    ///
    /// Deselecting is always allowed; selecting is allowed while the course's
    /// group is below its limit. Required courses are never toggleable.
    pub fn is_selectable(&self, id: CourseId) -> bool {
        let Some(course) = self.catalog.courses.get(id.0) else {
            return false;
        };
        if course.is_required() {
            return false;
        }
        if self.is_chosen(id) {
            return true;
        }
        match self.group_of(id) {
            Some(group) => self.selected(group).len() < group.limit as usize,
            None => true,
        }
    }

    /// Split a semester's courses into required, grouped and general electives.
    pub fn semester_view(&self, semester: &str) -> SemesterView {
        let mut view = SemesterView::default();
        for (id, course) in self.courses_in(semester) {
            if course.is_required() {
                view.required.push(id);
                continue;
            }
            match self.group_of(id) {
                Some(group) => {
                    match view.grouped.iter_mut().find(|s| s.key == group.key) {
                        Some(section) => section.courses.push(id),
                        None => view.grouped.push(GroupSection {
                            key: group.key.clone(),
                            limit: group.limit,
                            courses: vec![id],
                        }),
                    }
                }
                None => view.general.push(id),
            }
        }
        view
    }

    // -- Mutation --

    /// Select or deselect an elective course.
    ///
    /// Fails without changing anything if the course is unknown or required,
    /// or if selecting it would exceed its group's limit.
    pub fn toggle(&mut self, id: CourseId) -> Result<ToggleOutcome, SelectionError> {
        let Some(course) = self.catalog.courses.get(id.0) else {
            return Err(SelectionError::UnknownCourse {
                semester: String::new(),
                name: format!("#{}", id.0),
            });
        };
        if course.is_required() {
            return Err(SelectionError::RequiredCourse {
                semester: course.semester.clone(),
                name: course.name.clone(),
            });
        }
        let semester = course.semester.clone();
        let name = course.name.clone();

        let selected = if self.is_chosen(id) {
            if let Some(set) = self.chosen.get_mut(&semester) {
                set.remove(&id);
            }
            false
        } else {
            if let Some(group) = self.group_of(id) {
                if self.selected(group).len() >= group.limit as usize {
                    log::debug!("Rejected '{name}': group {} is full", group.key);
                    return Err(SelectionError::QuotaExceeded {
                        group: group.key.group_name.clone(),
                        limit: group.limit,
                    });
                }
            }
            self.chosen.entry(semester.clone()).or_default().insert(id);
            true
        };

        self.revision += 1;
        log::debug!(
            "{} '{name}' in {semester} (revision {})",
            if selected { "Selected" } else { "Deselected" },
            self.revision
        );

        Ok(ToggleOutcome {
            course: id,
            selected,
            group: self.group_of(id).map(|g| self.group_count(g)),
            semester_credits: self.semester_credits(&semester),
        })
    }

    /// Toggle by display name, as the UI and exported documents refer to courses.
    pub fn toggle_by_name(&mut self, semester: &str, name: &str) -> Result<ToggleOutcome, SelectionError> {
        let id = self
            .find(semester, name)
            .ok_or_else(|| SelectionError::UnknownCourse {
                semester: semester.to_string(),
                name: name.to_string(),
            })?;
        self.toggle(id)
    }
}

fn declares_group(course: &Course, key: &GroupKey) -> bool {
    course.semester == key.semester
        && course.selection_group_name.as_deref() == Some(key.group_name.as_str())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::model::{GroupLimit, Requirement};
    use crate::engine::summary::Scope;

    const S1: &str = "1학년 1학기";
    const S2: &str = "1학년 2학기";

    fn course(semester: &str, name: &str, credits: u32, requirement: Requirement, area: &str, group: Option<&str>) -> Course {
        Course {
            semester: semester.into(),
            track: "일반선택".into(),
            name: name.into(),
            credits,
            requirement,
            subject_area: area.into(),
            owner: String::new(),
            selection_group_name: group.map(String::from),
            selection_group_limit: group.map(|_| 2),
        }
    }

    /// Two required courses, a pick-2 science group, a general elective,
    /// a course naming an unknown group, and a second semester.
    fn sample_catalog() -> Catalog {
        use Requirement::*;
        Catalog::new(
            "test",
            vec![
                course(S1, "국어", 3, Required, "국어", None),
                course(S1, "수학", 2, Required, "수학", None),
                course(S1, "물리학", 2, Elective, "과학", Some("과학탐구")),
                course(S1, "화학", 2, Elective, "과학", Some("과학탐구")),
                course(S1, "생명과학", 2, Elective, "과학", Some("과학탐구")),
                course(S1, "음악", 1, Elective, "예술", None),
                course(S1, "미술", 1, Elective, "예술", Some("예술 미정")),
                course(S2, "물리학", 3, Elective, "과학", Some("과학탐구")),
                course(S2, "영어", 4, Required, "영어", None),
            ],
            vec![
                GroupLimit { key: GroupKey::new(S1, "과학탐구"), limit: 2 },
                GroupLimit { key: GroupKey::new(S2, "과학탐구"), limit: 1 },
            ],
        )
    }

    fn engine() -> SelectionEngine {
        SelectionEngine::new(sample_catalog())
    }

    fn id(engine: &SelectionEngine, semester: &str, name: &str) -> CourseId {
        engine.find(semester, name).unwrap()
    }

    fn science(engine: &SelectionEngine) -> GroupCount {
        let group = engine.group(&GroupKey::new(S1, "과학탐구")).unwrap();
        engine.group_count(group)
    }

    fn credits(engine: &SelectionEngine, semester: &str) -> u32 {
        engine.summarize(&Scope::Semester(semester.into())).total_credits
    }

    #[test]
    fn initialize_selects_required_courses() {
        let engine = engine();
        assert_eq!(engine.chosen_in(S1), vec![id(&engine, S1, "국어"), id(&engine, S1, "수학")]);
        assert_eq!(credits(&engine, S1), 5);
        let count = science(&engine);
        assert_eq!((count.selected, count.limit), (0, 2));
        assert_eq!(engine.revision(), 0);
    }

    #[test]
    fn quota_scenario() {
        let mut engine = engine();

        let a = engine.toggle_by_name(S1, "물리학").unwrap();
        assert!(a.selected);
        assert_eq!(a.group.as_ref().map(|g| g.selected), Some(1));
        assert_eq!(a.semester_credits, 7);

        engine.toggle_by_name(S1, "화학").unwrap();
        assert_eq!(science(&engine).selected, 2);
        assert!(science(&engine).is_full());

        let err = engine.toggle_by_name(S1, "생명과학").unwrap_err();
        assert_eq!(
            err,
            SelectionError::QuotaExceeded { group: "과학탐구".into(), limit: 2 }
        );
        assert!(!err.is_invalid_operation());
        assert_eq!(credits(&engine, S1), 7);
        assert!(!engine.is_selectable(id(&engine, S1, "생명과학")));
        assert!(engine.is_selectable(id(&engine, S1, "물리학")));

        let off = engine.toggle_by_name(S1, "물리학").unwrap();
        assert!(!off.selected);
        assert_eq!(science(&engine).selected, 1);

        engine.toggle_by_name(S1, "생명과학").unwrap();
        assert_eq!(
            engine.selected(engine.group(&GroupKey::new(S1, "과학탐구")).unwrap()),
            vec![id(&engine, S1, "화학"), id(&engine, S1, "생명과학")]
        );
    }

    #[test]
    fn general_elective_ignores_full_groups() {
        let mut engine = engine();
        engine.toggle_by_name(S1, "물리학").unwrap();
        engine.toggle_by_name(S1, "화학").unwrap();

        let music = id(&engine, S1, "음악");
        assert!(engine.is_selectable(music));
        assert!(engine.toggle(music).unwrap().group.is_none());
        assert!(engine.is_chosen(music));
    }

    #[test]
    fn rejection_is_repeatable_and_changes_nothing() {
        let mut engine = engine();
        engine.toggle_by_name(S1, "물리학").unwrap();
        engine.toggle_by_name(S1, "화학").unwrap();
        let before = engine.summarize(&Scope::All);
        let revision = engine.revision();

        let first = engine.toggle_by_name(S1, "생명과학").unwrap_err();
        for _ in 0..3 {
            assert_eq!(engine.toggle_by_name(S1, "생명과학").unwrap_err(), first);
        }
        assert_eq!(engine.summarize(&Scope::All), before);
        assert_eq!(engine.revision(), revision);
    }

    #[test]
    fn required_courses_cannot_be_toggled() {
        let mut engine = engine();
        let korean = id(&engine, S1, "국어");
        assert!(!engine.is_selectable(korean));

        let err = engine.toggle(korean).unwrap_err();
        assert!(err.is_invalid_operation());
        assert!(matches!(err, SelectionError::RequiredCourse { .. }));
        assert!(engine.is_chosen(korean));
    }

    #[test]
    fn unknown_course_is_an_invalid_operation() {
        let mut engine = engine();
        let err = engine.toggle_by_name(S1, "천문학").unwrap_err();
        assert_eq!(
            err,
            SelectionError::UnknownCourse { semester: S1.into(), name: "천문학".into() }
        );
        assert!(err.is_invalid_operation());
        assert!(engine.toggle(CourseId(999)).unwrap_err().is_invalid_operation());
    }

    #[test]
    fn foreign_ids_are_rejected_by_checked_queries() {
        let mut engine = engine();
        let foreign = CourseId(engine.catalog().len());
        assert!(!engine.is_chosen(foreign));
        assert!(!engine.is_selectable(foreign));
        assert!(engine.group_of(foreign).is_none());
        assert!(engine.toggle(foreign).is_err());
        assert_eq!(engine.revision(), 0);
    }

    #[test]
    #[should_panic]
    fn course_lookup_panics_on_foreign_id() {
        let engine = engine();
        engine.course(CourseId(engine.catalog().len()));
    }

    #[test]
    fn same_name_in_other_semester_is_distinct() {
        let mut engine = engine();
        let physics_1 = id(&engine, S1, "물리학");
        let physics_2 = id(&engine, S2, "물리학");
        assert_ne!(physics_1, physics_2);

        engine.toggle(physics_2).unwrap();
        assert!(engine.is_chosen(physics_2));
        assert!(!engine.is_chosen(physics_1));
        assert_eq!(science(&engine).selected, 0);
        assert_eq!(credits(&engine, S2), 7);
    }

    #[test]
    fn unresolved_group_is_unconstrained_and_uncounted() {
        let mut engine = engine();
        let art = id(&engine, S1, "미술");
        assert!(engine.group_of(art).is_none());
        assert!(engine.is_selectable(art));
        engine.toggle(art).unwrap();

        let summary = engine.summarize(&Scope::Semester(S1.into()));
        assert!(summary.per_group.iter().all(|g| g.key.group_name != "예술 미정"));
        assert_eq!(engine.semester_view(S1).general, vec![id(&engine, S1, "음악"), art]);
    }

    #[test]
    fn required_members_count_toward_the_quota() {
        let catalog = Catalog::new(
            "t",
            vec![
                course(S1, "통합과학", 3, Requirement::Required, "과학", Some("과학")),
                course(S1, "물리학", 2, Requirement::Elective, "과학", Some("과학")),
            ],
            vec![GroupLimit { key: GroupKey::new(S1, "과학"), limit: 1 }],
        );
        let mut engine = SelectionEngine::new(catalog);
        let group = engine.group(&GroupKey::new(S1, "과학")).unwrap();
        assert_eq!(engine.group_count(group).selected, 1);

        let physics = id(&engine, S1, "물리학");
        assert!(!engine.is_selectable(physics));
        assert!(matches!(
            engine.toggle(physics),
            Err(SelectionError::QuotaExceeded { limit: 1, .. })
        ));
    }

    #[test]
    fn semester_view_partitions_courses() {
        let engine = engine();
        let view = engine.semester_view(S1);
        assert_eq!(view.required, vec![id(&engine, S1, "국어"), id(&engine, S1, "수학")]);
        assert_eq!(view.grouped.len(), 1);
        assert_eq!(view.grouped[0].key, GroupKey::new(S1, "과학탐구"));
        assert_eq!(view.grouped[0].courses.len(), 3);
        assert_eq!(view.general.len(), 2);

        assert_eq!(engine.semester_view("3학년 1학기"), SemesterView::default());
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut engine = engine();
        engine.toggle_by_name(S1, "음악").unwrap();
        let before = engine.summarize(&Scope::All);
        let chosen_before = engine.chosen_in(S1);

        engine.toggle_by_name(S1, "물리학").unwrap();
        engine.toggle_by_name(S1, "물리학").unwrap();

        assert_eq!(engine.summarize(&Scope::All), before);
        assert_eq!(engine.chosen_in(S1), chosen_before);
    }

    fn assert_invariants(engine: &SelectionEngine, required_counts: &BTreeMap<GroupKey, usize>) {
        for (id, course) in engine.courses() {
            // Required courses are always chosen.
            if course.is_required() {
                assert!(engine.is_chosen(id), "{} dropped", course.name);
            }
            // A course can only be chosen under its own semester.
            for semester in engine.semesters() {
                if *semester != course.semester {
                    assert!(!engine.chosen_in(semester).contains(&id));
                }
            }
        }
        for group in engine.groups() {
            let selected = engine.selected(group);
            let expected: Vec<CourseId> = group
                .members
                .iter()
                .copied()
                .filter(|&m| engine.chosen_in(&group.key.semester).contains(&m))
                .collect();
            assert_eq!(selected, expected);

            let floor = required_counts.get(&group.key).copied().unwrap_or(0);
            assert!(selected.len() <= (group.limit as usize).max(floor));
        }
        for semester in engine.semesters() {
            let sum: u32 = engine
                .chosen_in(semester)
                .iter()
                .map(|&id| engine.course(id).credits)
                .sum();
            assert_eq!(credits(engine, semester), sum);
        }
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_toggle_sequence(picks in prop::collection::vec(0usize..9, 0..60)) {
            let mut engine = engine();
            let required_counts: BTreeMap<GroupKey, usize> = engine
                .groups()
                .iter()
                .map(|g| {
                    let n = g.members.iter().filter(|&&m| engine.course(m).is_required()).count();
                    (g.key.clone(), n)
                })
                .collect();

            for pick in picks {
                let id = CourseId(pick);
                let before = engine.summarize(&Scope::All);
                let was_chosen = engine.is_chosen(id);
                let selectable = engine.is_selectable(id);

                match engine.toggle(id) {
                    Ok(outcome) => {
                        prop_assert!(selectable);
                        prop_assert_eq!(outcome.selected, !was_chosen);
                    }
                    Err(_) => {
                        prop_assert!(!selectable);
                        prop_assert_eq!(engine.summarize(&Scope::All), before);
                        prop_assert_eq!(engine.is_chosen(id), was_chosen);
                    }
                }
                assert_invariants(&engine, &required_counts);
            }
        }
    }
}
