//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use unicode_normalization::UnicodeNormalization;
use unicode_properties::{GeneralCategory, GeneralCategoryGroup, UnicodeGeneralCategory};

use crate::{EngineError, ResultEngine};

/// Derive a URL-safe slug from a title.
///
/// The title is NFC-normalized and lowercased. Whitespace and underscores
/// become hyphens. Only letters and decimal digits are kept, so marks and
/// other numerics (fractions, superscripts, roman numerals) are dropped. Runs
/// of hyphens collapse into one and edge hyphens are trimmed.
pub(crate) fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for ch in title.nfc().flat_map(char::to_lowercase) {
        if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_hyphen = true;
        } else if is_slug_char(ch) {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        }
    }

    slug
}

fn is_slug_char(ch: char) -> bool {
    ch.general_category_group() == GeneralCategoryGroup::Letter
        || ch.general_category() == GeneralCategory::DecimalNumber
}

/// Trim a required text field, failing when nothing is left.
pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!("{label} is required")));
    }
    Ok(trimmed.to_string())
}

/// Keep only supplied, non-blank values.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Parse a client supplied comma-separated tag id list.
///
/// Blank segments are skipped and duplicates removed, keeping first-seen order.
pub(crate) fn parse_tag_ids(raw: &str) -> ResultEngine<Vec<i32>> {
    let mut ids = Vec::new();
    for segment in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let id = segment
            .parse::<i32>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| EngineError::InvalidInput(format!("invalid tag id: {segment}")))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Decode the stored tag list. Unparsable fragments are ignored.
pub(crate) fn decode_tag_ids(stored: &str) -> Vec<i32> {
    stored
        .split(',')
        .filter_map(|segment| segment.trim().parse().ok())
        .collect()
}

/// Encode tags the way they are stored: `"1,2,3"`.
pub(crate) fn encode_tag_ids(ids: &[i32]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
