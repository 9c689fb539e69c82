//! Error and diagnostic types for the navigation core.

use thiserror::Error;

/// Non-fatal configuration problem found while building the flat index.
///
/// Defects are logged and collected; the builder always falls back to a
/// deterministic result instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigDefect {
    #[error("duplicate menu path '{path}' at depth {depth} replaces the entry from depth {previous_depth}")]
    DuplicatePath { path: String, depth: u8, previous_depth: u8 },

    #[error("folder '{path}' at depth {depth} has no child group under key '{group_key}'")]
    UnresolvedChildGroup { path: String, depth: u8, group_key: String },

    #[error("entry '{title}' at depth {depth} has no href and no id or title to synthesize one")]
    MissingPath { title: String, depth: u8 },

    #[error("folder '{path}' sits at the maximum depth and is indexed as a leaf")]
    FolderBeyondMaxDepth { path: String },

    #[error("menu path '{path}' appears among its own ancestors and was skipped")]
    CyclicPath { path: String },
}

impl ConfigDefect {
    /// Path the defect refers to, when one is known.
    pub fn path(&self) -> Option<&str> {
        match self {
            ConfigDefect::DuplicatePath { path, .. }
            | ConfigDefect::UnresolvedChildGroup { path, .. }
            | ConfigDefect::FolderBeyondMaxDepth { path }
            | ConfigDefect::CyclicPath { path } => Some(path),
            ConfigDefect::MissingPath { .. } => None,
        }
    }
}

/// Raised by the opt-in strict check over a built index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("menu configuration has {} defect(s)", .0.len())]
    Defects(Vec<ConfigDefect>),
}

/// Rejected or degraded drawer transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawerError {
    #[error("drawer depth {depth} is outside 2..=5")]
    DepthOutOfRange { depth: u8 },

    #[error("no menu node at '{key}'")]
    UnknownFolder { key: String },

    #[error("'{key}' is not a folder")]
    NotAFolder { key: String },

    #[error("folder '{key}' has no children to show at depth {depth}")]
    MissingChildren { depth: u8, key: String },

    /// The key does not belong at `depth` or its ancestors are not the open chain.
    #[error("drawer key '{key}' cannot be open at depth {depth}: {reason}")]
    Orphan { depth: u8, key: String, reason: String },
}

impl DrawerError {
    pub fn orphan(depth: u8, key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Orphan {
            depth,
            key: key.into(),
            reason: reason.into(),
        }
    }
}
