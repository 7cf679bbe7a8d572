use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Status text that marks a course as automatically selected.
pub const REQUIRED_MARKER: &str = "지정";

// ---------------------------------------------------------------------------
// Requirement – required vs elective
// ---------------------------------------------------------------------------

/// Whether a course is chosen for the student or picked by them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Required,
    Elective,
}

impl Requirement {
    /// Interpret the raw status cell. Only the exact marker means required.
    pub fn from_status(raw: &str) -> Self {
        if raw == REQUIRED_MARKER {
            Requirement::Required
        } else {
            Requirement::Elective
        }
    }

    pub fn is_required(self) -> bool {
        self == Requirement::Required
    }
}

// ---------------------------------------------------------------------------
// GroupKey / GroupLimit – "pick N" quotas
// ---------------------------------------------------------------------------

/// Identifies a selection group: group names are only unique within a semester.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupKey {
    pub semester: String,
    pub group_name: String,
}

impl GroupKey {
    pub fn new(semester: impl Into<String>, group_name: impl Into<String>) -> Self {
        Self {
            semester: semester.into(),
            group_name: group_name.into(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.semester, self.group_name)
    }
}

/// One row of the limit table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupLimit {
    #[serde(flatten)]
    pub key: GroupKey,
    pub limit: u32,
}

// ---------------------------------------------------------------------------
// Course – one row of the catalog
// ---------------------------------------------------------------------------

/// A single course offering. Identified by `(semester, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub semester: String,
    /// Elective category shown to the user (유형).
    pub track: String,
    pub name: String,
    pub credits: u32,
    pub requirement: Requirement,
    /// Curriculum group (교과(군)), used for credit aggregation only.
    pub subject_area: String,
    /// Teacher or subject in charge; display only.
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_group_limit: Option<u32>,
}

impl Course {
    pub fn is_required(&self) -> bool {
        self.requirement.is_required()
    }
}

// ---------------------------------------------------------------------------
// Catalog – the complete loaded course list
// ---------------------------------------------------------------------------

/// Normalised output of ingestion: courses in source order plus the limit table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// Display title, usually the school name.
    pub title: String,
    pub courses: Vec<Course>,
    /// Limit table in first-appearance order.
    pub group_limits: Vec<GroupLimit>,
}

impl Catalog {
    pub fn new(title: impl Into<String>, courses: Vec<Course>, group_limits: Vec<GroupLimit>) -> Self {
        Self {
            title: title.into(),
            courses,
            group_limits,
        }
    }

    /// Distinct semesters, sorted lexicographically.
    pub fn semesters(&self) -> Vec<String> {
        self.courses
            .iter()
            .map(|c| c.semester.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct subject areas, sorted.
    pub fn subject_areas(&self) -> BTreeSet<String> {
        self.courses.iter().map(|c| c.subject_area.clone()).collect()
    }

    /// Number of courses.
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
