//! Event-bus topics and payloads exchanged with the router and breadcrumb collaborators.
//!
//! Topic names and payload field names are wire contracts; they serialize exactly as
//! `navigate-request`, `latch-updated` and `folder-focus-request` with camelCase fields.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// One folder along a latched target's chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatchFolder {
    pub path: String,
    pub title: String,
}

/// Last visited target inside a top-level section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatchRecord {
    pub top_level_id: String,
    pub top_level_title: String,
    pub target_path: String,
    pub target_title: String,
    /// Folders strictly between the top-level node and the target, root first.
    pub folder_chain: Vec<LatchFolder>,
}

/// Named bus topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    NavigateRequest,
    LatchUpdated,
    FolderFocusRequest,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::NavigateRequest, Topic::LatchUpdated, Topic::FolderFocusRequest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::NavigateRequest => "navigate-request",
            Topic::LatchUpdated => "latch-updated",
            Topic::FolderFocusRequest => "folder-focus-request",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseTopicError;

impl fmt::Display for ParseTopicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown topic; expected navigate-request, latch-updated or folder-focus-request")
    }
}

impl std::error::Error for ParseTopicError {}

impl FromStr for Topic {
    type Err = ParseTopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL.into_iter().find(|topic| topic.as_str() == s).ok_or(ParseTopicError)
    }
}

/// What triggered a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationSource {
    /// A top-level item was clicked.
    TopLevel,
    /// A leaf inside a drawer was clicked.
    Drawer,
    /// A top-level item was re-entered and its latch restored.
    Latch,
    /// The chosen href leaves the console.
    External,
}

/// Payload of `navigate-request`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigateRequest {
    pub path: String,
    pub title: String,
    pub source: NavigationSource,
}

/// Payload of `folder-focus-request`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFocusRequest {
    pub folder_path: String,
    pub top_level_id: String,
    /// Free-form origin marker (for example `breadcrumb`).
    #[serde(default)]
    pub context: Option<String>,
}

/// A published bus event: topic plus typed payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload")]
pub enum BusEvent {
    #[serde(rename = "navigate-request")]
    NavigateRequest(NavigateRequest),
    /// `None` when the latch was cleared.
    #[serde(rename = "latch-updated")]
    LatchUpdated(Option<LatchRecord>),
    #[serde(rename = "folder-focus-request")]
    FolderFocusRequest(FolderFocusRequest),
}

impl BusEvent {
    pub fn topic(&self) -> Topic {
        match self {
            BusEvent::NavigateRequest(_) => Topic::NavigateRequest,
            BusEvent::LatchUpdated(_) => Topic::LatchUpdated,
            BusEvent::FolderFocusRequest(_) => Topic::FolderFocusRequest,
        }
    }
}

/// Direct user interaction delivered by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum UiEvent {
    /// A depth-1 item was clicked.
    TopLevelClicked { id: String },
    /// A drawer item (folder or leaf) was clicked.
    ItemClicked { path: String },
    /// The router reports that the current page changed.
    PageChanged { path: String },
    /// A pointer gesture landed outside the navigation region.
    OutsideInteraction { gesture_id: u64 },
}
