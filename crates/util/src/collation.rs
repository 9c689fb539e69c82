//! Title ordering for sibling lists.
//!
//! Titles compare case- and accent-insensitively first (so `école` sorts beside
//! `Ecole` rather than after `Zebra`), then by their raw form so the order stays
//! total and deterministic.

use std::cmp::Ordering;

use unicode_casefold::UnicodeCaseFold;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Primary collation key: case-folded, decomposed, combining marks dropped.
pub fn collation_key(title: &str) -> String {
    let mut key = String::with_capacity(title.len());
    for ch in title.trim().case_fold().nfd().filter(|ch| !is_combining_mark(*ch)) {
        match base_letter(ch) {
            Some(base) => key.push_str(base),
            None => key.push(ch),
        }
    }
    key
}

/// Compares two titles using [`collation_key`], falling back to the raw strings.
pub fn compare_titles(left: &str, right: &str) -> Ordering {
    collation_key(left).cmp(&collation_key(right)).then_with(|| left.cmp(right))
}

/// Latin letters with no canonical decomposition.
fn base_letter(ch: char) -> Option<&'static str> {
    let base = match ch {
        'đ' | 'ð' => "d",
        'ø' => "o",
        'ł' => "l",
        'ħ' => "h",
        'ı' => "i",
        'æ' => "ae",
        'œ' => "oe",
        'þ' => "th",
        _ => return None,
    };
    Some(base)
}
