use std::collections::BTreeMap;

use unicode_normalization::UnicodeNormalization;

// ---------------------------------------------------------------------------
// Logical column roles
// ---------------------------------------------------------------------------

/// The part a spreadsheet column plays, independent of how it is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnRole {
    Semester,
    Track,
    Name,
    Credits,
    Requirement,
    Owner,
    SubjectArea,
    PickLimit,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 8] = [
        ColumnRole::Semester,
        ColumnRole::Track,
        ColumnRole::Name,
        ColumnRole::Credits,
        ColumnRole::Requirement,
        ColumnRole::Owner,
        ColumnRole::SubjectArea,
        ColumnRole::PickLimit,
    ];

    /// Canonical header text for this role.
    pub fn header(self) -> &'static str {
        match self {
            ColumnRole::Semester => "학기",
            ColumnRole::Track => "유형",
            ColumnRole::Name => "과목명",
            ColumnRole::Credits => "학점",
            ColumnRole::Requirement => "지정여부",
            ColumnRole::Owner => "담당과목",
            ColumnRole::SubjectArea => "교과(군)",
            ColumnRole::PickLimit => "그룹 내 선택수",
        }
    }

    /// Roles without which no catalog can be built.
    pub fn is_required(self) -> bool {
        matches!(
            self,
            ColumnRole::Semester
                | ColumnRole::Name
                | ColumnRole::Credits
                | ColumnRole::Requirement
                | ColumnRole::SubjectArea
        )
    }
}

// ---------------------------------------------------------------------------
// Text normalisation
// ---------------------------------------------------------------------------

/// Trim and compose a cell value (NFC), so decomposed Hangul compares equal.
pub fn normalize_cell(s: &str) -> String {
    s.trim().nfc().collect()
}

/// Fold a header for matching: compatibility-compose, drop BOM and whitespace.
///
/// `"그룹 내 선택수"`, `"그룹내선택수"` and an NFD-encoded variant all fold to
/// the same key; full-width parentheses fold to ASCII ones.
pub fn normalize_header(s: &str) -> String {
    s.nfkc()
        .filter(|c| !c.is_whitespace() && *c != '\u{feff}')
        .collect()
}

// ---------------------------------------------------------------------------
// ColumnMap – header positions per role
// ---------------------------------------------------------------------------

/// Resolved column index for every role found in a header row.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    indices: BTreeMap<ColumnRole, usize>,
}

impl ColumnMap {
    /// Match a header row against the known roles.
    ///
    /// On failure returns the required roles that could not be matched.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, Vec<ColumnRole>> {
        let folded: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();

        let mut indices = BTreeMap::new();
        for role in ColumnRole::ALL {
            let wanted = normalize_header(role.header());
            if let Some(idx) = folded.iter().position(|h| *h == wanted) {
                indices.insert(role, idx);
            }
        }

        let missing: Vec<ColumnRole> = ColumnRole::ALL
            .into_iter()
            .filter(|role| role.is_required() && !indices.contains_key(role))
            .collect();

        if missing.is_empty() {
            Ok(Self { indices })
        } else {
            Err(missing)
        }
    }

    pub fn index_of(&self, role: ColumnRole) -> Option<usize> {
        self.indices.get(&role).copied()
    }

    /// Cell for `role` in `row`; empty when the column or cell is absent.
    pub fn cell<'a>(&self, role: ColumnRole, row: &'a [String]) -> &'a str {
        self.index_of(role)
            .and_then(|idx| row.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Roles that were matched, for logging.
    pub fn recognised(&self) -> Vec<(&'static str, usize)> {
        self.indices
            .iter()
            .map(|(role, idx)| (role.header(), *idx))
            .collect()
    }
}
