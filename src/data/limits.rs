use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Group name used when a "pick N" cell has nothing before the marker.
pub const DEFAULT_GROUP_NAME: &str = "선택";

/// A parsed `<name>택<N>` cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickLimit {
    pub group_name: String,
    pub limit: u32,
}

fn pick_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"택([0-9]+)").expect("pick pattern is valid"))
}

/// Parse a free-text "pick N" cell such as `과학탐구 택2`.
///
/// The cell is NFKC-folded first, so full-width digits count; the digits must
/// follow `택` directly. Returns `None` when the marker is absent or the limit
/// is not a positive integer; such courses are unconstrained. Both course construction and the
/// limit table go through this function so their values agree.
pub fn parse_pick_limit(text: &str) -> Option<PickLimit> {
    let folded: String = text.nfkc().collect();
    let text = folded.trim();
    if text.is_empty() {
        return None;
    }
    let caps = pick_pattern().captures(text)?;
    let marker = caps.get(0)?;
    let limit: u32 = caps.get(1)?.as_str().parse().ok()?;
    if limit == 0 {
        return None;
    }

    let name = text[..marker.start()].trim();
    let group_name = if name.is_empty() {
        DEFAULT_GROUP_NAME.to_string()
    } else {
        name.to_string()
    };

    Some(PickLimit { group_name, limit })
}
