use std::collections::BTreeSet;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;

use super::columns::{normalize_cell, ColumnMap, ColumnRole};
use super::limits::parse_pick_limit;
use super::model::{Catalog, Course, GroupKey, GroupLimit, Requirement};
use super::payload::CatalogPayload;

/// Title used when the file name does not look like a school name.
pub const DEFAULT_TITLE: &str = "고등학교";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a catalog could not be built. No partial catalog is ever returned.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("reading file: {0}")]
    Io(#[from] std::io::Error),

    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("reading spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("parsing catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("spreadsheet contains no worksheet")]
    NoWorksheet,

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),

    #[error("no course rows with both a name and a semester")]
    EmptyCatalog,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a course catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xls` – first worksheet, first row is the header
/// * `.csv`           – header row, UTF-8
/// * `.json`          – a previously exported [`CatalogPayload`]
pub fn load_file(path: &Path) -> Result<Catalog, IngestionError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let title = title_from_path(path);

    match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => {
            let (headers, rows) = read_spreadsheet(path)?;
            catalog_from_rows(&title, &headers, &rows)
        }
        "csv" => {
            let (headers, rows) = read_csv(path)?;
            catalog_from_rows(&title, &headers, &rows)
        }
        "json" => {
            let text = std::fs::read_to_string(path)?;
            let catalog = CatalogPayload::from_json(&text)?.into_catalog();
            retain_valid_entries(catalog)
        }
        other => Err(IngestionError::UnsupportedExtension(other.to_string())),
    }
}

/// Derive the display title from the file stem, e.g. `한빛고_2025.xlsx` → `한빛고`.
pub fn title_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(normalize_cell)
        .unwrap_or_default();

    if stem.contains('고') {
        stem.split('_').next().unwrap_or(&stem).to_string()
    } else {
        DEFAULT_TITLE.to_string()
    }
}

// ---------------------------------------------------------------------------
// Row normalisation
// ---------------------------------------------------------------------------

/// Build a catalog from a header row and raw text rows.
///
/// Rows missing a name or a semester are dropped. The limit table is built
/// from the kept rows' pick-limit cells; the first limit seen for a key wins.
pub fn catalog_from_rows(
    title: &str,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<Catalog, IngestionError> {
    let columns = ColumnMap::resolve(headers).map_err(|missing| {
        let names: Vec<&'static str> = missing.iter().map(|r| r.header()).collect();
        log::error!("Catalog is missing required columns: {names:?}");
        IngestionError::MissingColumns(names)
    })?;
    log::info!("Recognised columns: {:?}", columns.recognised());

    let mut courses = Vec::with_capacity(rows.len());
    let mut group_limits: Vec<GroupLimit> = Vec::new();
    let mut seen_keys: BTreeSet<GroupKey> = BTreeSet::new();
    let mut dropped = 0usize;

    for row in rows {
        let row: Vec<String> = row.iter().map(|c| normalize_cell(c)).collect();
        let Some(course) = course_from_row(&columns, &row) else {
            dropped += 1;
            continue;
        };

        if let Some(pick) = parse_pick_limit(columns.cell(ColumnRole::PickLimit, &row)) {
            let key = GroupKey::new(course.semester.clone(), pick.group_name);
            if seen_keys.insert(key.clone()) {
                group_limits.push(GroupLimit {
                    key,
                    limit: pick.limit,
                });
            }
        }

        courses.push(course);
    }

    if dropped > 0 {
        log::debug!("Dropped {dropped} rows without a course name or semester");
    }
    if courses.is_empty() {
        return Err(IngestionError::EmptyCatalog);
    }

    log::info!(
        "Built catalog with {} courses and {} group limits",
        courses.len(),
        group_limits.len()
    );
    for gl in &group_limits {
        log::debug!("  {}: pick at most {}", gl.key, gl.limit);
    }

    Ok(Catalog::new(title, courses, group_limits))
}

fn course_from_row(columns: &ColumnMap, row: &[String]) -> Option<Course> {
    let name = columns.cell(ColumnRole::Name, row);
    let semester = columns.cell(ColumnRole::Semester, row);
    if name.is_empty() || semester.is_empty() {
        return None;
    }

    let pick = parse_pick_limit(columns.cell(ColumnRole::PickLimit, row));

    Some(Course {
        semester: semester.to_string(),
        track: columns.cell(ColumnRole::Track, row).to_string(),
        name: name.to_string(),
        credits: parse_credits(columns.cell(ColumnRole::Credits, row)),
        requirement: Requirement::from_status(columns.cell(ColumnRole::Requirement, row)),
        subject_area: columns.cell(ColumnRole::SubjectArea, row).to_string(),
        owner: columns.cell(ColumnRole::Owner, row).to_string(),
        selection_group_name: pick.as_ref().map(|p| p.group_name.clone()),
        selection_group_limit: pick.map(|p| p.limit),
    })
}

/// Credits as a non-negative integer. Decimals truncate; anything else is 0.
fn parse_credits(s: &str) -> u32 {
    if let Ok(i) = s.parse::<i64>() {
        return u32::try_from(i).unwrap_or(0);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f <= u32::MAX as f64 => f.trunc() as u32,
        _ => 0,
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), IngestionError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|v| v.to_string()).collect());
    }

    Ok((headers, rows))
}

/// Apply the row rules to an imported catalog: courses need a name and a
/// semester, limits need both key parts and a positive value. First limit per
/// key wins.
fn retain_valid_entries(mut catalog: Catalog) -> Result<Catalog, IngestionError> {
    let before = catalog.len();
    catalog
        .courses
        .retain(|c| !c.name.trim().is_empty() && !c.semester.trim().is_empty());
    if catalog.len() < before {
        log::warn!("Dropped {} imported courses without name or semester", before - catalog.len());
    }
    if catalog.is_empty() {
        return Err(IngestionError::EmptyCatalog);
    }

    let mut seen: BTreeSet<GroupKey> = BTreeSet::new();
    catalog.group_limits.retain(|gl| {
        gl.limit >= 1
            && !gl.key.semester.trim().is_empty()
            && !gl.key.group_name.trim().is_empty()
            && seen.insert(gl.key.clone())
    });
    Ok(catalog)
}

// ---------------------------------------------------------------------------
// Spreadsheet reader
// ---------------------------------------------------------------------------

fn read_spreadsheet(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), IngestionError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestionError::NoWorksheet)??;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(header_row) => header_row.iter().map(cell_to_string).collect(),
        None => Vec::new(),
    };
    let rows: Vec<Vec<String>> = rows_iter
        .map(|r| r.iter().map(cell_to_string).collect())
        .collect();

    Ok((headers, rows))
}

/// Render a spreadsheet cell as text. Whole floats lose their `.0`.
fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                format!("{f}")
            }
        }
        Data::Int(i) => format!("{i}"),
        Data::Bool(b) => format!("{b}"),
        Data::Empty => String::new(),
        Data::Error(_) => String::new(),
        Data::DateTime(s) => s.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}
