use serde::{Deserialize, Serialize};

use super::model::{Catalog, Course, GroupLimit};

/// Exported form of a catalog: courses and the limit table, order preserved.
///
/// ```json
/// {
///   "title": "한빛고",
///   "courses": [
///     { "semester": "1학년 1학기", "track": "일반선택", "name": "물리학",
///       "credits": 2, "requirement": "elective", "subjectArea": "과학",
///       "owner": "과학과", "selectionGroupName": "과학탐구", "selectionGroupLimit": 2 }
///   ],
///   "groupLimits": [
///     { "semester": "1학년 1학기", "groupName": "과학탐구", "limit": 2 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPayload {
    #[serde(default)]
    pub title: String,
    pub courses: Vec<Course>,
    #[serde(default)]
    pub group_limits: Vec<GroupLimit>,
}

impl CatalogPayload {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            title: catalog.title.clone(),
            courses: catalog.courses.clone(),
            group_limits: catalog.group_limits.clone(),
        }
    }

    pub fn into_catalog(self) -> Catalog {
        Catalog::new(self.title, self.courses, self.group_limits)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
