//! Depth-first construction of the flat index from nested configuration.

use std::collections::HashMap;

use navdeck_types::{MAX_MENU_DEPTH, MenuConfig, MenuEntryConfig, MenuNode, NodeKind, TOP_LEVEL_DEPTH};
use navdeck_util::{PlaceholderKind, normalize_menu_path, synthesize_placeholder};
use tracing::{debug, warn};

use super::FlatIndex;
use crate::error::ConfigDefect;

/// Shortcut for `MenuIndexBuilder::new(config).build()`.
pub fn build_index(config: &MenuConfig) -> FlatIndex {
    MenuIndexBuilder::new(config).build()
}

/// Ancestry handed from a folder to the entries of its child group.
struct ParentContext {
    path: String,
    ancestor_paths: Vec<String>,
    top_level_id: String,
    top_level_group_key: Option<String>,
}

/// Walks a [`MenuConfig`] and produces a [`FlatIndex`].
///
/// Group map keys are normalized up front so `"/reports/"` and `"/reports"` address
/// the same group. Defects are logged through `tracing` and kept on the index.
pub struct MenuIndexBuilder<'a> {
    config: &'a MenuConfig,
    groups: HashMap<u8, HashMap<String, &'a [MenuEntryConfig]>>,
    index: FlatIndex,
}

impl<'a> MenuIndexBuilder<'a> {
    pub fn new(config: &'a MenuConfig) -> Self {
        let mut groups = HashMap::new();
        for depth in TOP_LEVEL_DEPTH + 1..=MAX_MENU_DEPTH {
            let Some(authored) = config.groups.at_depth(depth) else {
                continue;
            };
            let normalized: HashMap<String, &'a [MenuEntryConfig]> = authored
                .iter()
                .filter_map(|(key, entries)| normalize_menu_path(key).map(|key| (key, entries.as_slice())))
                .collect();
            groups.insert(depth, normalized);
        }

        Self {
            config,
            groups,
            index: FlatIndex::default(),
        }
    }

    pub fn build(mut self) -> FlatIndex {
        let config = self.config;
        for entry in &config.top_level {
            self.visit(entry, TOP_LEVEL_DEPTH, None);
        }

        debug!(
            nodes = self.index.len(),
            top_level = self.index.top_level.len(),
            defects = self.index.diagnostics.len(),
            "menu index built"
        );
        self.index
    }

    fn group(&self, depth: u8, key: &str) -> Option<&'a [MenuEntryConfig]> {
        self.groups.get(&depth).and_then(|groups| groups.get(key)).copied()
    }

    fn visit(&mut self, entry: &'a MenuEntryConfig, depth: u8, parent: Option<&ParentContext>) {
        let declared_folder = entry.is_marked_folder() || (depth == TOP_LEVEL_DEPTH && entry.group_key.is_some());

        let Some(path) = self.canonical_path(entry, depth, declared_folder) else {
            self.report(ConfigDefect::MissingPath {
                title: entry.title.clone(),
                depth,
            });
            return;
        };

        if parent.is_some_and(|parent| parent.ancestor_paths.contains(&path)) {
            self.report(ConfigDefect::CyclicPath { path });
            return;
        }

        let children_key = if depth == TOP_LEVEL_DEPTH {
            entry
                .group_key
                .as_deref()
                .and_then(normalize_menu_path)
                .or_else(|| normalize_menu_path(&entry.id))
                .unwrap_or_else(|| path.clone())
        } else {
            path.clone()
        };

        let is_folder = if depth >= MAX_MENU_DEPTH {
            if declared_folder {
                self.report(ConfigDefect::FolderBeyondMaxDepth { path: path.clone() });
            }
            false
        } else {
            declared_folder || self.group(depth + 1, &children_key).is_some()
        };

        if let Some(previous) = self.index.get(&path) {
            let previous_depth = previous.depth;
            self.report(ConfigDefect::DuplicatePath {
                path: path.clone(),
                depth,
                previous_depth,
            });
            self.index.remove_subtree(&path);
        }

        let (ancestor_paths, top_level_id, top_level_group_key) = match parent {
            Some(parent) => {
                let mut ancestors = parent.ancestor_paths.clone();
                ancestors.push(path.clone());
                (ancestors, parent.top_level_id.clone(), parent.top_level_group_key.clone())
            }
            None => (vec![path.clone()], entry.id.clone(), is_folder.then(|| children_key.clone())),
        };

        let kind = if is_folder {
            NodeKind::Folder {
                children_key: children_key.clone(),
            }
        } else {
            NodeKind::Leaf {
                href: entry.href.clone().filter(|href| !href.trim().is_empty()),
                action: entry.action.clone(),
            }
        };

        let node = MenuNode {
            path: path.clone(),
            id: entry.id.clone(),
            title: entry.title.clone(),
            icon_kind: entry.icon_kind.clone(),
            depth,
            parent_path: parent.map(|parent| parent.path.clone()),
            top_level_id: top_level_id.clone(),
            top_level_group_key: top_level_group_key.clone(),
            ancestor_paths: ancestor_paths.clone(),
            kind,
        };
        self.index.insert(node);

        if !is_folder {
            return;
        }

        let Some(children) = self.group(depth + 1, &children_key) else {
            self.report(ConfigDefect::UnresolvedChildGroup {
                path,
                depth,
                group_key: children_key,
            });
            return;
        };

        let context = ParentContext {
            path,
            ancestor_paths,
            top_level_id,
            top_level_group_key,
        };
        for child in children {
            self.visit(child, depth + 1, Some(&context));
        }
    }

    /// Normalized href, or a synthesized placeholder when the entry has none.
    fn canonical_path(&self, entry: &MenuEntryConfig, depth: u8, declared_folder: bool) -> Option<String> {
        if let Some(path) = entry.href.as_deref().and_then(normalize_menu_path) {
            return Some(path);
        }
        let kind = if declared_folder {
            PlaceholderKind::Folder
        } else {
            PlaceholderKind::Action
        };
        synthesize_placeholder(kind, depth, &entry.id, &entry.title)
    }

    fn report(&mut self, defect: ConfigDefect) {
        match &defect {
            ConfigDefect::DuplicatePath {
                path,
                depth,
                previous_depth,
            } => warn!(path = %path, depth, previous_depth, "duplicate menu path; last entry wins"),
            ConfigDefect::UnresolvedChildGroup { path, depth, group_key } => {
                warn!(path = %path, depth, group_key = %group_key, "folder has no child group")
            }
            ConfigDefect::MissingPath { title, depth } => warn!(title = %title, depth, "menu entry skipped: no path"),
            ConfigDefect::FolderBeyondMaxDepth { path } => warn!(path = %path, "folder at maximum depth indexed as leaf"),
            ConfigDefect::CyclicPath { path } => warn!(path = %path, "menu path nested inside itself; entry skipped"),
        }
        self.index.record(defect);
    }
}

#[cfg(test)]
mod tests {
    use navdeck_types::{FOLDER_ICON_KIND, GroupsByDepth};

    use super::*;

    fn reports_config() -> MenuConfig {
        let mut groups = GroupsByDepth::default();
        groups.insert(2, "reports", vec![MenuEntryConfig::folder("archive", "Archive").with_href("archive")]);
        groups.insert(3, "archive", vec![MenuEntryConfig::leaf("q1", "2023 Q1", "archive/2023-q1")]);
        MenuConfig {
            top_level: vec![MenuEntryConfig::folder("reports", "Reports").with_group_key("reports")],
            groups,
        }
    }

    #[test]
    fn ancestry_is_root_to_self() {
        let index = build_index(&reports_config());
        let leaf = index.get("archive/2023-q1").expect("leaf indexed");

        assert_eq!(leaf.depth, 3);
        assert_eq!(
            leaf.ancestor_paths,
            vec!["_internal_folder_1_reports".to_string(), "archive".to_string(), "archive/2023-q1".to_string()]
        );
        assert_eq!(leaf.parent_path.as_deref(), Some("archive"));
        assert_eq!(leaf.top_level_id, "reports");
        assert_eq!(leaf.top_level_group_key.as_deref(), Some("reports"));
        assert!(index.diagnostics().is_empty());
    }

    #[test]
    fn folder_without_href_gets_placeholder() {
        let index = build_index(&reports_config());
        let top = index.top_level_by_id("reports").expect("top level");
        assert_eq!(top.path, "_internal_folder_1_reports");
        assert_eq!(top.children_key(), Some("reports"));
        assert!(top.parent_path.is_none());
    }

    #[test]
    fn duplicate_path_is_reported_and_last_write_wins() {
        let mut config = reports_config();
        config.top_level.push(MenuEntryConfig::leaf("legacy", "Legacy Archive", "archive/"));

        let index = build_index(&config);
        let node = index.get("archive").expect("archive present");
        assert_eq!(node.title, "Legacy Archive");
        assert_eq!(node.depth, 1);
        assert!(!index.contains("archive/2023-q1"), "earlier subtree replaced");
        assert!(index.children_of("_internal_folder_1_reports").is_empty());
        assert_eq!(
            index.diagnostics(),
            &[ConfigDefect::DuplicatePath {
                path: "archive".into(),
                depth: 1,
                previous_depth: 2,
            }]
        );
        assert_eq!(index.iter().filter(|node| node.path == "archive").count(), 1);
    }

    #[test]
    fn unresolved_group_keeps_folder_without_children() {
        let config = MenuConfig {
            top_level: vec![MenuEntryConfig::folder("empty", "Empty").with_group_key("nothing-here")],
            ..MenuConfig::default()
        };
        let index = build_index(&config);
        let node = index.top_level_by_id("empty").expect("indexed");
        assert!(node.is_folder());
        assert!(!index.has_children(&node.path));
        assert!(matches!(index.diagnostics(), [ConfigDefect::UnresolvedChildGroup { group_key, .. }] if group_key == "nothing-here"));
    }

    #[test]
    fn nested_folder_detected_by_group_presence() {
        let mut config = reports_config();
        config.groups.depth2.get_mut("reports").unwrap().push(MenuEntryConfig::leaf("ops", "Ops", "/ops"));
        config.groups.insert(3, "/ops/", vec![MenuEntryConfig::leaf("runbooks", "Runbooks", "/ops/runbooks")]);

        let index = build_index(&config);
        let ops = index.get("/ops").expect("ops");
        assert!(ops.is_folder(), "group keyed by its path makes it a folder");
        assert_eq!(index.children_of("/ops").len(), 1);
    }

    #[test]
    fn folder_at_max_depth_becomes_leaf() {
        let mut groups = GroupsByDepth::default();
        groups.insert(2, "a", vec![MenuEntryConfig::folder("b", "B").with_href("/a/b")]);
        groups.insert(3, "/a/b", vec![MenuEntryConfig::folder("c", "C").with_href("/a/b/c")]);
        groups.insert(4, "/a/b/c", vec![MenuEntryConfig::folder("d", "D").with_href("/a/b/c/d")]);
        groups.insert(5, "/a/b/c/d", vec![MenuEntryConfig::folder("e", "E").with_href("/a/b/c/d/e")]);
        let config = MenuConfig {
            top_level: vec![MenuEntryConfig::folder("a", "A").with_group_key("a")],
            groups,
        };

        let index = build_index(&config);
        let deepest = index.get("/a/b/c/d/e").expect("depth 5 node");
        assert_eq!(deepest.depth, 5);
        assert!(!deepest.is_folder());
        assert_eq!(deepest.icon_kind, FOLDER_ICON_KIND);
        assert_eq!(index.diagnostics(), &[ConfigDefect::FolderBeyondMaxDepth { path: "/a/b/c/d/e".into() }]);
    }

    #[test]
    fn entry_without_any_identity_is_skipped() {
        let config = MenuConfig {
            top_level: vec![MenuEntryConfig::default()],
            ..MenuConfig::default()
        };
        let index = build_index(&config);
        assert!(index.is_empty());
        assert!(matches!(index.diagnostics(), [ConfigDefect::MissingPath { depth: 1, .. }]));
    }

    #[test]
    fn self_nesting_path_is_rejected() {
        let mut groups = GroupsByDepth::default();
        groups.insert(2, "loop", vec![MenuEntryConfig::folder("inner", "Inner").with_href("/loop")]);
        let config = MenuConfig {
            top_level: vec![MenuEntryConfig::folder("loop", "Loop").with_href("/loop").with_group_key("loop")],
            groups,
        };
        let index = build_index(&config);
        assert_eq!(index.len(), 1);
        assert_eq!(index.diagnostics(), &[ConfigDefect::CyclicPath { path: "/loop".into() }]);
    }

    #[test]
    fn action_leaf_without_href_gets_action_placeholder() {
        let config = MenuConfig {
            top_level: vec![MenuEntryConfig {
                id: "logout".into(),
                title: "Log out".into(),
                action: Some("logout".into()),
                ..MenuEntryConfig::default()
            }],
            ..MenuConfig::default()
        };
        let index = build_index(&config);
        let node = index.top_level_by_id("logout").expect("indexed");
        assert_eq!(node.path, "_internal_action_1_logout");
        assert_eq!(node.action(), Some("logout"));
        assert!(node.href().is_none());
    }
}
