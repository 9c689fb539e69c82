//! Callback surface through which the controller tells the UI layer what to show.
//!
//! The engine never touches visual elements; it only decides which containers
//! are visible, which items they list and which entries are highlighted.

use std::sync::{Arc, Mutex};

use navdeck_types::MenuNode;

pub trait RenderSurface {
    fn show_container(&mut self, depth: u8);
    fn hide_container(&mut self, depth: u8);
    /// Replaces the items of the drawer at `depth`, already in display order.
    fn render_items(&mut self, depth: u8, nodes: &[&MenuNode]);
    /// Highlights the active target; `None` removes the highlight.
    fn mark_current(&mut self, path: Option<&str>);
    fn mark_ancestor_folder(&mut self, path: &str);
    /// Highlights the active top-level item by id; `None` deactivates all of them.
    fn mark_top_level(&mut self, id: Option<&str>);
    /// Drops every current/ancestor highlight before a new set is applied.
    fn clear_marks(&mut self);
}

/// One call received by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Show(u8),
    Hide(u8),
    Render { depth: u8, paths: Vec<String> },
    Current(Option<String>),
    Ancestor(String),
    TopLevel(Option<String>),
    ClearMarks,
}

/// Surface that records calls; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    calls: Arc<Mutex<Vec<SurfaceCall>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().expect("surface calls lock poisoned").clone()
    }

    pub fn take(&self) -> Vec<SurfaceCall> {
        std::mem::take(&mut *self.calls.lock().expect("surface calls lock poisoned"))
    }

    /// Paths most recently rendered at `depth`.
    pub fn rendered_at(&self, depth: u8) -> Option<Vec<String>> {
        self.calls().into_iter().rev().find_map(|call| match call {
            SurfaceCall::Render { depth: rendered, paths } if rendered == depth => Some(paths),
            _ => None,
        })
    }

    fn push(&self, call: SurfaceCall) {
        self.calls.lock().expect("surface calls lock poisoned").push(call);
    }
}

impl RenderSurface for RecordingSurface {
    fn show_container(&mut self, depth: u8) {
        self.push(SurfaceCall::Show(depth));
    }

    fn hide_container(&mut self, depth: u8) {
        self.push(SurfaceCall::Hide(depth));
    }

    fn render_items(&mut self, depth: u8, nodes: &[&MenuNode]) {
        self.push(SurfaceCall::Render {
            depth,
            paths: nodes.iter().map(|node| node.path.clone()).collect(),
        });
    }

    fn mark_current(&mut self, path: Option<&str>) {
        self.push(SurfaceCall::Current(path.map(str::to_string)));
    }

    fn mark_ancestor_folder(&mut self, path: &str) {
        self.push(SurfaceCall::Ancestor(path.to_string()));
    }

    fn mark_top_level(&mut self, id: Option<&str>) {
        self.push(SurfaceCall::TopLevel(id.map(str::to_string)));
    }

    fn clear_marks(&mut self) {
        self.push(SurfaceCall::ClearMarks);
    }
}
