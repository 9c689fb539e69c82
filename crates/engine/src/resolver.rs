//! Maps the current page path onto the flat index.

use std::cmp::Ordering;

use navdeck_types::{MAX_MENU_DEPTH, MenuNode};
use navdeck_util::{compare_titles, normalize_page_path, path_prefixes};
use tracing::debug;

use crate::index::FlatIndex;

/// Where a page sits in the menu: its section, the folders leading to it and itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePath<'a> {
    /// Depth-1 owner of the target.
    pub top_level: &'a MenuNode,
    /// Folders strictly between `top_level` and `target`, shallowest first.
    pub folder_chain: Vec<&'a MenuNode>,
    pub target: &'a MenuNode,
    pub is_folder: bool,
    /// True when the page itself is not indexed and a path prefix matched instead.
    pub matched_by_prefix: bool,
}

impl<'a> ActivePath<'a> {
    pub fn folder_chain_paths(&self) -> Vec<&'a str> {
        self.folder_chain.iter().map(|folder| folder.path.as_str()).collect()
    }

    /// Drawers that must be open to reveal the target, as `(depth, key)` pairs.
    ///
    /// Every folder from the top level down to the target (the target included
    /// when it is a folder) opens the drawer one level below itself.
    pub fn drawer_plan(&self) -> Vec<(u8, &'a str)> {
        let top = std::iter::once(self.top_level).filter(|node| node.is_folder() && node.path != self.target.path);
        let target = std::iter::once(self.target).filter(|node| node.is_folder());
        top.chain(self.folder_chain.iter().copied())
            .chain(target)
            .filter(|folder| folder.depth < MAX_MENU_DEPTH)
            .map(|folder| (folder.depth + 1, folder.path.as_str()))
            .collect()
    }
}

/// Resolves page paths into [`ActivePath`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivePathResolver {
    prefix_match: bool,
}

impl ActivePathResolver {
    pub fn new(prefix_match: bool) -> Self {
        Self { prefix_match }
    }

    /// Normalizes `current_path` and looks it up; `None` means the page is outside the menu.
    ///
    /// With prefix matching enabled, an unindexed page resolves to its deepest
    /// indexed ancestor path (`/boards/42/edit` to `/boards`).
    pub fn resolve<'a>(&self, current_path: &str, index: &'a FlatIndex) -> Option<ActivePath<'a>> {
        let Some(path) = normalize_page_path(current_path) else {
            debug!(current_path, "empty page path; nothing to resolve");
            return None;
        };

        if let Some(node) = index.get(&path) {
            return Some(self.resolve_node(node, index));
        }

        if self.prefix_match
            && let Some(node) = path_prefixes(&path).iter().find_map(|prefix| index.get(prefix))
        {
            let mut active = self.resolve_node(node, index);
            active.matched_by_prefix = true;
            return Some(active);
        }

        debug!(path = %path, "page path not in menu index");
        None
    }

    /// Builds the [`ActivePath`] of a node already taken from `index`.
    pub fn resolve_node<'a>(&self, node: &'a MenuNode, index: &'a FlatIndex) -> ActivePath<'a> {
        let top_level = index.get(node.top_level_path()).unwrap_or(node);
        let chain = node.parent_chain();
        let folder_chain = chain
            .iter()
            .skip(1)
            .filter_map(|path| index.get(path))
            .filter(|ancestor| ancestor.is_folder())
            .collect();

        ActivePath {
            top_level,
            folder_chain,
            target: node,
            is_folder: node.is_folder(),
            matched_by_prefix: false,
        }
    }
}

/// Display order for siblings: folders before leaves, then by collated title.
pub fn sort_siblings(nodes: &mut [&MenuNode]) {
    nodes.sort_by(|left, right| compare_siblings(left, right));
}

fn compare_siblings(left: &MenuNode, right: &MenuNode) -> Ordering {
    right.is_folder().cmp(&left.is_folder()).then_with(|| compare_titles(&left.title, &right.title))
}
