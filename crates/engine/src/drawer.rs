//! Open/closed state of the nested drawers (depths 2 through 5).
//!
//! Each depth holds at most one open key: the path of the folder whose children
//! the drawer shows, which is always a folder one level shallower than the drawer.
//! Opening a drawer aligns every shallower drawer with the key's ancestry and
//! closes everything deeper, so an open drawer is never orphaned.

use navdeck_types::{FIRST_DRAWER_DEPTH, MAX_MENU_DEPTH};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{error::DrawerError, index::FlatIndex, resolver::ActivePath};

const SLOT_COUNT: usize = (MAX_MENU_DEPTH - FIRST_DRAWER_DEPTH + 1) as usize;

/// State of a single drawer depth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "key", rename_all = "camelCase")]
pub enum DrawerSlot {
    #[default]
    Closed,
    Open(String),
}

impl DrawerSlot {
    pub fn key(&self) -> Option<&str> {
        match self {
            DrawerSlot::Open(key) => Some(key.as_str()),
            DrawerSlot::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, DrawerSlot::Open(_))
    }
}

/// Serializable view of one drawer depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerState {
    pub depth: u8,
    pub open_key: Option<String>,
}

/// Depths whose state changed during one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawerTransition {
    /// Depths that went from open to closed, shallowest first.
    pub closed: Vec<u8>,
    /// Depths that were opened or switched to a new key, shallowest first.
    pub opened: Vec<(u8, String)>,
}

impl DrawerTransition {
    pub fn is_empty(&self) -> bool {
        self.closed.is_empty() && self.opened.is_empty()
    }

    /// Difference between two slot arrays.
    fn between(before: &[DrawerSlot; SLOT_COUNT], after: &[DrawerSlot; SLOT_COUNT]) -> Self {
        let mut transition = DrawerTransition::default();
        for (offset, (old, new)) in before.iter().zip(after.iter()).enumerate() {
            let depth = FIRST_DRAWER_DEPTH + offset as u8;
            match (old, new) {
                (old, new) if old == new => {}
                (_, DrawerSlot::Open(key)) => transition.opened.push((depth, key.clone())),
                (DrawerSlot::Open(_), DrawerSlot::Closed) => transition.closed.push(depth),
                (DrawerSlot::Closed, DrawerSlot::Closed) => {}
            }
        }
        transition
    }
}

/// Owns the open/closed state of drawers 2..=5.
#[derive(Debug, Clone, Default)]
pub struct DrawerStateMachine {
    slots: [DrawerSlot; SLOT_COUNT],
    strict: bool,
}

impl DrawerStateMachine {
    /// `strict` refuses invariant-violating requests; otherwise they self-heal.
    pub fn new(strict: bool) -> Self {
        Self {
            slots: Default::default(),
            strict,
        }
    }

    pub fn slot(&self, depth: u8) -> Option<&DrawerSlot> {
        slot_index(depth).map(|index| &self.slots[index])
    }

    pub fn open_key(&self, depth: u8) -> Option<&str> {
        self.slot(depth).and_then(DrawerSlot::key)
    }

    pub fn is_open(&self, depth: u8, key: &str) -> bool {
        self.open_key(depth) == Some(key)
    }

    /// Open drawers as `(depth, key)`, shallowest first.
    pub fn open_drawers(&self) -> Vec<(u8, &str)> {
        depths().filter_map(|depth| self.open_key(depth).map(|key| (depth, key))).collect()
    }

    pub fn states(&self) -> Vec<DrawerState> {
        depths()
            .map(|depth| DrawerState {
                depth,
                open_key: self.open_key(depth).map(str::to_string),
            })
            .collect()
    }

    pub fn all_closed(&self) -> bool {
        self.slots.iter().all(|slot| !slot.is_open())
    }

    /// Opens `key` at `depth`.
    ///
    /// Shallower drawers are aligned with the key's ancestry and deeper drawers
    /// are closed. Requesting the key that is already open only closes deeper drawers; use
    /// [`toggle_at_depth`](Self::toggle_at_depth) for click semantics.
    pub fn open_at_depth(&mut self, depth: u8, key: &str, index: &FlatIndex) -> Result<DrawerTransition, DrawerError> {
        if slot_index(depth).is_none() {
            return Err(DrawerError::DepthOutOfRange { depth });
        }
        let node = index.get(key).ok_or_else(|| DrawerError::UnknownFolder { key: key.to_string() })?;
        if !node.is_folder() {
            return Err(DrawerError::NotAFolder { key: key.to_string() });
        }
        if node.depth + 1 != depth {
            let error = DrawerError::orphan(depth, key, format!("folder depth {} feeds drawer {}", node.depth, node.depth + 1));
            return Err(self.reject(depth, error));
        }
        if !index.has_children(key) {
            self.force_close_from(depth);
            warn!(depth, key, "folder has no children; drawer kept closed");
            return Err(DrawerError::MissingChildren {
                depth,
                key: key.to_string(),
            });
        }

        let required: Vec<(u8, &str)> = (FIRST_DRAWER_DEPTH..=depth)
            .map(|level| {
                let key = if level == depth {
                    key
                } else {
                    node.ancestor_paths[usize::from(level - FIRST_DRAWER_DEPTH)].as_str()
                };
                (level, key)
            })
            .collect();

        let Some(first_mismatch) = required.iter().find(|(level, key)| !self.is_open(*level, key)).map(|(level, _)| *level) else {
            if depth < MAX_MENU_DEPTH && self.open_key(depth + 1).is_some() {
                return Ok(self.close_from_depth(depth + 1));
            }
            return Ok(DrawerTransition::default());
        };

        let before = self.slots.clone();
        self.force_close_from(first_mismatch);
        for (level, key) in required.into_iter().filter(|(level, _)| *level >= first_mismatch) {
            if let Some(index) = slot_index(level) {
                self.slots[index] = DrawerSlot::Open(key.to_string());
            }
        }
        let transition = DrawerTransition::between(&before, &self.slots);
        debug!(depth, key, ?transition, "drawer opened");
        Ok(transition)
    }

    /// Closes `key` when it is open at `depth` (cascading), otherwise opens it.
    pub fn toggle_at_depth(&mut self, depth: u8, key: &str, index: &FlatIndex) -> Result<DrawerTransition, DrawerError> {
        if self.is_open(depth, key) {
            return Ok(self.close_from_depth(depth));
        }
        self.open_at_depth(depth, key, index)
    }

    /// Closes `depth` and every deeper drawer. Depths below 2 close everything.
    pub fn close_from_depth(&mut self, depth: u8) -> DrawerTransition {
        let before = self.slots.clone();
        self.force_close_from(depth.max(FIRST_DRAWER_DEPTH));
        let transition = DrawerTransition::between(&before, &self.slots);
        if !transition.is_empty() {
            debug!(depth, closed = ?transition.closed, "drawers closed");
        }
        transition
    }

    pub fn close_all(&mut self) -> DrawerTransition {
        self.close_from_depth(FIRST_DRAWER_DEPTH)
    }

    /// Opens exactly the drawers needed to reveal `active` and closes the rest.
    ///
    /// Stops at the first drawer that cannot open (for example a folder without
    /// children); everything deeper than the last opened drawer is closed.
    pub fn open_to(&mut self, active: &ActivePath<'_>, index: &FlatIndex) -> Result<DrawerTransition, DrawerError> {
        let before = self.slots.clone();
        let mut deepest_open = None;
        let mut failure = None;

        for (depth, key) in active.drawer_plan() {
            match self.open_at_depth(depth, key, index) {
                Ok(_) => deepest_open = Some(depth),
                Err(error) => {
                    failure = Some(error);
                    break;
                }
            }
        }

        match deepest_open {
            Some(depth) if depth < MAX_MENU_DEPTH => self.force_close_from(depth + 1),
            Some(_) => {}
            None => self.force_close_from(FIRST_DRAWER_DEPTH),
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(DrawerTransition::between(&before, &self.slots)),
        }
    }

    /// Checks that every open drawer shows a folder one level up whose parent is
    /// the key open one drawer shallower.
    pub fn check_invariants(&self, index: &FlatIndex) -> Result<(), DrawerError> {
        for depth in depths() {
            let Some(key) = self.open_key(depth) else {
                continue;
            };
            let Some(node) = index.get(key) else {
                return Err(DrawerError::orphan(depth, key, "key is not indexed"));
            };
            if !node.is_folder() || node.depth + 1 != depth {
                return Err(DrawerError::orphan(depth, key, "key is not a folder one level up"));
            }
            if depth > FIRST_DRAWER_DEPTH && self.open_key(depth - 1) != node.parent_path.as_deref() {
                return Err(DrawerError::orphan(depth, key, "parent drawer shows a different folder"));
            }
        }
        Ok(())
    }

    /// Verifies the invariants; in lenient mode violations are force-closed.
    pub fn enforce_invariants(&mut self, index: &FlatIndex) -> Result<DrawerTransition, DrawerError> {
        match self.check_invariants(index) {
            Ok(()) => Ok(DrawerTransition::default()),
            Err(error) if self.strict => Err(error),
            Err(error) => {
                let depth = match &error {
                    DrawerError::Orphan { depth, .. } => *depth,
                    _ => FIRST_DRAWER_DEPTH,
                };
                warn!(%error, depth, "drawer invariant violated; force-closing");
                Ok(self.close_from_depth(depth))
            }
        }
    }

    fn reject(&mut self, depth: u8, error: DrawerError) -> DrawerError {
        if self.strict {
            warn!(%error, "drawer transition refused");
        } else {
            warn!(%error, "drawer transition self-healed by closing");
            self.force_close_from(depth);
        }
        error
    }

    fn force_close_from(&mut self, depth: u8) {
        for level in depth.max(FIRST_DRAWER_DEPTH)..=MAX_MENU_DEPTH {
            if let Some(index) = slot_index(level) {
                self.slots[index] = DrawerSlot::Closed;
            }
        }
    }
}

fn depths() -> impl Iterator<Item = u8> {
    FIRST_DRAWER_DEPTH..=MAX_MENU_DEPTH
}

fn slot_index(depth: u8) -> Option<usize> {
    (FIRST_DRAWER_DEPTH..=MAX_MENU_DEPTH)
        .contains(&depth)
        .then(|| usize::from(depth - FIRST_DRAWER_DEPTH))
}
