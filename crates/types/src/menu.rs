//! Menu configuration input and the flat-index node descriptor.
//!
//! The configuration side (`MenuConfig`, `MenuEntryConfig`, `GroupsByDepth`) mirrors
//! the authoring shape: one ordered top-level list plus one group map per nested
//! depth, keyed by the path (or group key) of the owning folder. Group maps use
//! `IndexMap` so authoring order survives deserialization.
//!
//! The indexed side (`MenuNode`, `NodeKind`) is produced once by the index builder
//! and never mutated afterwards.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reserved `iconKind` value that marks an entry as a folder.
pub const FOLDER_ICON_KIND: &str = "folder";

/// Depth of the top-level list.
pub const TOP_LEVEL_DEPTH: u8 = 1;

/// Shallowest depth that is displayed inside a drawer.
pub const FIRST_DRAWER_DEPTH: u8 = 2;

/// Deepest supported menu depth.
pub const MAX_MENU_DEPTH: u8 = 5;

/// A single authored menu entry, at any depth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntryConfig {
    /// Stable identifier; used for top-level lookups and placeholder synthesis.
    #[serde(default)]
    pub id: String,
    /// Display label.
    pub title: String,
    /// Icon identifier; [`FOLDER_ICON_KIND`] marks a folder.
    #[serde(default)]
    pub icon_kind: String,
    /// Navigation target. Folders usually omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Key of the depth-2 group holding this entry's children (top-level entries only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
    /// Name of a registered custom action invoked instead of navigating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl MenuEntryConfig {
    /// Creates a leaf entry pointing at `href`.
    pub fn leaf(id: impl Into<String>, title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            href: Some(href.into()),
            ..Self::default()
        }
    }

    /// Creates a folder entry without an href of its own.
    pub fn folder(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon_kind: FOLDER_ICON_KIND.to_string(),
            ..Self::default()
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_group_key(mut self, group_key: impl Into<String>) -> Self {
        self.group_key = Some(group_key.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_icon(mut self, icon_kind: impl Into<String>) -> Self {
        self.icon_kind = icon_kind.into();
        self
    }

    /// True when the entry carries the reserved folder icon.
    pub fn is_marked_folder(&self) -> bool {
        self.icon_kind == FOLDER_ICON_KIND
    }
}

/// Child groups for depths 2 through 5, each keyed by the owning folder's key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupsByDepth {
    #[serde(rename = "2")]
    pub depth2: IndexMap<String, Vec<MenuEntryConfig>>,
    #[serde(rename = "3")]
    pub depth3: IndexMap<String, Vec<MenuEntryConfig>>,
    #[serde(rename = "4")]
    pub depth4: IndexMap<String, Vec<MenuEntryConfig>>,
    #[serde(rename = "5")]
    pub depth5: IndexMap<String, Vec<MenuEntryConfig>>,
}

impl GroupsByDepth {
    /// Returns the group map for `depth`, or `None` outside 2..=5.
    pub fn at_depth(&self, depth: u8) -> Option<&IndexMap<String, Vec<MenuEntryConfig>>> {
        match depth {
            2 => Some(&self.depth2),
            3 => Some(&self.depth3),
            4 => Some(&self.depth4),
            5 => Some(&self.depth5),
            _ => None,
        }
    }

    pub fn at_depth_mut(&mut self, depth: u8) -> Option<&mut IndexMap<String, Vec<MenuEntryConfig>>> {
        match depth {
            2 => Some(&mut self.depth2),
            3 => Some(&mut self.depth3),
            4 => Some(&mut self.depth4),
            5 => Some(&mut self.depth5),
            _ => None,
        }
    }

    /// Inserts (or replaces) the group stored under `key` at `depth`.
    ///
    /// Returns `false` when `depth` is outside 2..=5 and nothing was stored.
    pub fn insert(&mut self, depth: u8, key: impl Into<String>, entries: Vec<MenuEntryConfig>) -> bool {
        match self.at_depth_mut(depth) {
            Some(groups) => {
                groups.insert(key.into(), entries);
                true
            }
            None => false,
        }
    }
}

/// Complete, fully materialized menu configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuConfig {
    #[serde(default)]
    pub top_level: Vec<MenuEntryConfig>,
    #[serde(default)]
    pub groups: GroupsByDepth,
}

/// Folder or leaf specific data of an indexed node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NodeKind {
    /// Owns a child group looked up under `children_key` in the next depth.
    Folder { children_key: String },
    /// Navigates to `href` or invokes `action`.
    Leaf { href: Option<String>, action: Option<String> },
}

/// One entry of the flat index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuNode {
    /// Canonical, unique key (real href or synthesized placeholder).
    pub path: String,
    /// Authored identifier (may be empty below the top level).
    pub id: String,
    pub title: String,
    pub icon_kind: String,
    /// 1 for the top level, up to [`MAX_MENU_DEPTH`].
    pub depth: u8,
    /// `None` only at depth 1.
    pub parent_path: Option<String>,
    /// Identifier of the depth-1 ancestor.
    pub top_level_id: String,
    /// Group key used to look up the depth-1 ancestor's children.
    pub top_level_group_key: Option<String>,
    /// Root-to-self inclusive; `ancestor_paths.len() == depth`.
    pub ancestor_paths: Vec<String>,
    pub kind: NodeKind,
}

impl MenuNode {
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    pub fn is_top_level(&self) -> bool {
        self.depth == TOP_LEVEL_DEPTH
    }

    /// Path of the depth-1 ancestor (the node itself at depth 1).
    pub fn top_level_path(&self) -> &str {
        self.ancestor_paths.first().map(String::as_str).unwrap_or(self.path.as_str())
    }

    /// Ancestor paths excluding the node itself.
    pub fn parent_chain(&self) -> &[String] {
        let len = self.ancestor_paths.len();
        &self.ancestor_paths[..len.saturating_sub(1)]
    }

    pub fn children_key(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Folder { children_key } => Some(children_key.as_str()),
            NodeKind::Leaf { .. } => None,
        }
    }

    pub fn href(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Leaf { href, .. } => href.as_deref(),
            NodeKind::Folder { .. } => None,
        }
    }

    pub fn action(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Leaf { action, .. } => action.as_deref(),
            NodeKind::Folder { .. } => None,
        }
    }

    /// Depth of the drawer that displays this folder's children.
    pub fn drawer_depth(&self) -> Option<u8> {
        if self.is_folder() && self.depth < MAX_MENU_DEPTH {
            Some(self.depth + 1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_config_deserializes_camel_case_and_depth_keys() {
        let json = r#"{
            "topLevel": [
                { "id": "reports", "title": "Reports", "iconKind": "folder", "groupKey": "reports" }
            ],
            "groups": {
                "2": { "reports": [ { "id": "summary", "title": "Summary", "href": "/reports/summary" } ] }
            }
        }"#;

        let config: MenuConfig = serde_json::from_str(json).expect("deserialize MenuConfig");
        assert_eq!(config.top_level.len(), 1);
        assert!(config.top_level[0].is_marked_folder());
        assert_eq!(config.top_level[0].group_key.as_deref(), Some("reports"));
        let group = config.groups.at_depth(2).and_then(|groups| groups.get("reports")).expect("depth 2 group");
        assert_eq!(group[0].href.as_deref(), Some("/reports/summary"));
        assert!(config.groups.depth3.is_empty());
    }

    #[test]
    fn groups_reject_depths_outside_nested_range() {
        let mut groups = GroupsByDepth::default();
        assert!(!groups.insert(1, "x", Vec::new()));
        assert!(!groups.insert(6, "x", Vec::new()));
        assert!(groups.insert(5, "x", Vec::new()));
        assert!(groups.at_depth(5).is_some_and(|map| map.contains_key("x")));
    }

    #[test]
    fn yaml_entries_default_optional_fields() {
        let yaml = "title: Logout\naction: logout\n";
        let entry: MenuEntryConfig = serde_yaml::from_str(yaml).expect("deserialize entry");
        assert_eq!(entry.id, "");
        assert_eq!(entry.icon_kind, "");
        assert!(entry.href.is_none());
        assert_eq!(entry.action.as_deref(), Some("logout"));
    }

    #[test]
    fn node_accessors_follow_kind() {
        let node = MenuNode {
            path: "archive".into(),
            id: "archive".into(),
            title: "Archive".into(),
            icon_kind: FOLDER_ICON_KIND.into(),
            depth: 2,
            parent_path: Some("reports".into()),
            top_level_id: "reports".into(),
            top_level_group_key: Some("reports".into()),
            ancestor_paths: vec!["reports".into(), "archive".into()],
            kind: NodeKind::Folder {
                children_key: "archive".into(),
            },
        };
        assert!(node.is_folder());
        assert_eq!(node.parent_chain(), ["reports".to_string()]);
        assert_eq!(node.top_level_path(), "reports");
        assert_eq!(node.drawer_depth(), Some(3));
        assert!(node.href().is_none());
    }
}
