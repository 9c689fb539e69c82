//! The flat, read-only menu index.
//!
//! Built once by [`MenuIndexBuilder`] and shared (usually behind an `Arc`) by the
//! resolver, the drawer state machine and the controller.

mod builder;

use std::collections::HashMap;

use indexmap::IndexMap;
use navdeck_types::MenuNode;

pub use builder::{MenuIndexBuilder, build_index};

use crate::{
    error::{ConfigDefect, IndexError},
    resolver::sort_siblings,
};

/// Map from canonical path to node descriptor, plus parent/child adjacency.
#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    nodes: IndexMap<String, MenuNode>,
    top_level: Vec<String>,
    children: HashMap<String, Vec<String>>,
    diagnostics: Vec<ConfigDefect>,
}

impl FlatIndex {
    pub fn get(&self, path: &str) -> Option<&MenuNode> {
        self.nodes.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion (depth-first) order.
    pub fn iter(&self) -> impl Iterator<Item = &MenuNode> {
        self.nodes.values()
    }

    /// Depth-1 nodes in authored order.
    pub fn top_level_nodes(&self) -> Vec<&MenuNode> {
        self.top_level.iter().filter_map(|path| self.nodes.get(path)).collect()
    }

    pub fn top_level_by_id(&self, id: &str) -> Option<&MenuNode> {
        self.top_level_nodes().into_iter().find(|node| node.id == id)
    }

    /// Children of `path` in authored order.
    pub fn children_of(&self, path: &str) -> Vec<&MenuNode> {
        self.children
            .get(path)
            .map(|paths| paths.iter().filter_map(|child| self.nodes.get(child)).collect())
            .unwrap_or_default()
    }

    /// Children of `path` in display order (folders first, then by title).
    pub fn sorted_children(&self, path: &str) -> Vec<&MenuNode> {
        let mut children = self.children_of(path);
        sort_siblings(&mut children);
        children
    }

    pub fn has_children(&self, path: &str) -> bool {
        self.children.get(path).is_some_and(|paths| !paths.is_empty())
    }

    pub fn parent_of(&self, node: &MenuNode) -> Option<&MenuNode> {
        node.parent_path.as_deref().and_then(|parent| self.nodes.get(parent))
    }

    /// Configuration defects found while building.
    pub fn diagnostics(&self) -> &[ConfigDefect] {
        &self.diagnostics
    }

    /// Strict check: fails when any defect was recorded.
    pub fn ensure_clean(&self) -> Result<(), IndexError> {
        if self.diagnostics.is_empty() {
            Ok(())
        } else {
            Err(IndexError::Defects(self.diagnostics.clone()))
        }
    }

    fn insert(&mut self, node: MenuNode) {
        match node.parent_path.clone() {
            Some(parent) => self.children.entry(parent).or_default().push(node.path.clone()),
            None => self.top_level.push(node.path.clone()),
        }
        self.nodes.insert(node.path.clone(), node);
    }

    /// Removes the node at `path` together with every descendant.
    fn remove_subtree(&mut self, path: &str) {
        let Some(root) = self.nodes.get(path) else {
            return;
        };
        let position = usize::from(root.depth) - 1;
        let parent = root.parent_path.clone();

        let doomed: Vec<String> = self
            .nodes
            .values()
            .filter(|node| node.ancestor_paths.get(position).is_some_and(|ancestor| ancestor == path))
            .map(|node| node.path.clone())
            .collect();

        for removed in &doomed {
            self.nodes.shift_remove(removed);
            self.children.remove(removed);
        }

        match parent {
            Some(parent) => {
                if let Some(siblings) = self.children.get_mut(&parent) {
                    siblings.retain(|sibling| sibling != path);
                }
            }
            None => self.top_level.retain(|top| top != path),
        }
    }

    fn record(&mut self, defect: ConfigDefect) {
        self.diagnostics.push(defect);
    }
}
