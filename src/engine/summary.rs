use std::collections::BTreeMap;
use std::fmt;

use crate::data::model::GroupKey;

use super::selection::SelectionEngine;

/// Label accepted by [`Scope::from`] for the whole plan.
pub const ALL_SCOPE: &str = "ALL";

/// Which semesters a summary covers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    All,
    Semester(String),
}

impl Scope {
    pub fn includes(&self, semester: &str) -> bool {
        match self {
            Scope::All => true,
            Scope::Semester(s) => s == semester,
        }
    }
}

impl From<&str> for Scope {
    fn from(s: &str) -> Self {
        if s == ALL_SCOPE {
            Scope::All
        } else {
            Scope::Semester(s.to_string())
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => write!(f, "All semesters"),
            Scope::Semester(s) => write!(f, "{s}"),
        }
    }
}

/// Current fill of one selection group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: GroupKey,
    pub selected: usize,
    pub limit: u32,
}

impl GroupCount {
    /// No further member may be selected.
    pub fn is_full(&self) -> bool {
        self.selected >= self.limit as usize
    }
}

/// Credit totals and group fill for a scope. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub scope: Scope,
    pub total_credits: u32,
    pub course_count: usize,
    /// Credits per subject area, ordered by area name.
    pub by_subject_area: BTreeMap<String, u32>,
    pub per_group: Vec<GroupCount>,
}

impl SelectionEngine {
    /// Aggregate the chosen courses in `scope`. Pure: no state is touched.
    pub fn summarize(&self, scope: &Scope) -> Summary {
        let mut total_credits = 0;
        let mut course_count = 0;
        let mut by_subject_area: BTreeMap<String, u32> = BTreeMap::new();

        for semester in self.semesters().iter().filter(|s| scope.includes(s)) {
            for id in self.chosen_in(semester) {
                let course = self.course(id);
                total_credits += course.credits;
                course_count += 1;
                *by_subject_area
                    .entry(course.subject_area.clone())
                    .or_default() += course.credits;
            }
        }

        let per_group = self
            .groups()
            .iter()
            .filter(|g| scope.includes(&g.key.semester))
            .map(|g| self.group_count(g))
            .collect();

        Summary {
            scope: scope.clone(),
            total_credits,
            course_count,
            by_subject_area,
            per_group,
        }
    }

    /// Credits chosen in one semester.
    pub fn semester_credits(&self, semester: &str) -> u32 {
        self.chosen_in(semester)
            .iter()
            .map(|&id| self.course(id).credits)
            .sum()
    }
}
