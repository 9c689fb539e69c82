//! Path canonicalization shared by the index builder, the resolver and the loaders.
//!
//! Menu paths are compared as plain strings after normalization; nothing here
//! touches the filesystem except [`expand_home`], which only builds a `PathBuf`.

use std::path::PathBuf;

use dirs_next::home_dir;
use heck::ToSnakeCase;
use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix of synthesized paths for folders that have no href.
pub const FOLDER_PLACEHOLDER_PREFIX: &str = "_internal_folder_";

/// Prefix of synthesized paths for action-only leaves that have no href.
pub const ACTION_PLACEHOLDER_PREFIX: &str = "_internal_action_";

static REPEATED_SLASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"/{2,}").expect("slash regex should compile"));

/// Canonicalizes a configured path.
///
/// Surrounding whitespace is trimmed, runs of `/` collapse to one (the `//` after
/// a `scheme:` is preserved) and trailing slashes are stripped except for the root.
/// Returns `None` for empty input.
pub fn normalize_menu_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let collapsed = match trimmed.split_once("://") {
        Some((scheme, rest)) => format!("{scheme}://{}", REPEATED_SLASHES.replace_all(rest, "/")),
        None => REPEATED_SLASHES.replace_all(trimmed, "/").into_owned(),
    };

    let stripped = collapsed.trim_end_matches('/');
    if stripped.is_empty() {
        return Some("/".to_string());
    }
    if stripped.ends_with(':') {
        // `https://` alone; keep as authored
        return Some(collapsed);
    }
    Some(stripped.to_string())
}

/// Canonicalizes the current page path reported by the router.
///
/// Same as [`normalize_menu_path`] after dropping any `?query` or `#fragment`.
pub fn normalize_page_path(raw: &str) -> Option<String> {
    let without_fragment = raw.split('#').next().unwrap_or_default();
    let without_query = without_fragment.split('?').next().unwrap_or_default();
    normalize_menu_path(without_query)
}

/// True when `href` starts with one of `schemes` (case-insensitive).
pub fn is_external_href(href: &str, schemes: &[String]) -> bool {
    let lowered = href.trim().to_ascii_lowercase();
    schemes.iter().any(|scheme| !scheme.is_empty() && lowered.starts_with(&scheme.to_ascii_lowercase()))
}

/// Kind of node a placeholder path is synthesized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Folder,
    Action,
}

/// Builds `_internal_folder_<depth>_<slug>` / `_internal_action_<depth>_<slug>`.
///
/// The slug is the snake_case form of `id`, falling back to `title`. Returns `None`
/// when neither produces a usable slug.
pub fn synthesize_placeholder(kind: PlaceholderKind, depth: u8, id: &str, title: &str) -> Option<String> {
    let slug = [id, title]
        .into_iter()
        .map(|candidate| candidate.trim().to_snake_case())
        .find(|slug| !slug.is_empty())?;

    let prefix = match kind {
        PlaceholderKind::Folder => FOLDER_PLACEHOLDER_PREFIX,
        PlaceholderKind::Action => ACTION_PLACEHOLDER_PREFIX,
    };
    Some(format!("{prefix}{depth}_{slug}"))
}

/// True for paths produced by [`synthesize_placeholder`].
pub fn is_placeholder_path(path: &str) -> bool {
    path.starts_with(FOLDER_PLACEHOLDER_PREFIX) || path.starts_with(ACTION_PLACEHOLDER_PREFIX)
}

/// Proper prefixes of a normalized path, deepest first, excluding the root.
///
/// `/boards/42/edit` yields `/boards/42` then `/boards`.
pub fn path_prefixes(path: &str) -> Vec<String> {
    let mut prefixes = Vec::new();
    let mut current = path;
    while let Some(index) = current.rfind('/') {
        current = &current[..index];
        if current.is_empty() {
            break;
        }
        prefixes.push(current.to_string());
    }
    prefixes
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    let path = raw.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    match path {
        "~" => home(),
        _ => match path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
            Some(rest) => home().join(rest),
            None => PathBuf::from(path),
        },
    }
}
