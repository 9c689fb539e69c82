//! Turns UI interaction and bus traffic into resolver, drawer and latch calls.
//!
//! One [`NavigationController`] exists per console session. It exclusively owns
//! the drawer state and the latch; collaborators read them through
//! [`NavigationController::snapshot`] and request changes through the bus.

use std::{
    collections::VecDeque,
    fmt,
    sync::{Arc, Mutex},
};

use navdeck_types::{
    BusEvent, FIRST_DRAWER_DEPTH, FolderFocusRequest, LatchRecord, MenuNode, NavigateRequest, NavigationSource, NavigatorSettings, Topic,
    UiEvent,
};
use navdeck_util::{is_external_href, normalize_menu_path};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::{
    actions::ActionRegistry,
    bus::{EventBus, SubscriptionId},
    drawer::{DrawerState, DrawerStateMachine, DrawerTransition},
    error::DrawerError,
    index::FlatIndex,
    latch::LatchStore,
    resolver::{ActivePath, ActivePathResolver},
    surface::RenderSurface,
};

/// Read-only view of the navigation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSnapshot {
    pub active_top_level: Option<String>,
    pub current: Option<String>,
    pub drawers: Vec<DrawerState>,
    pub latch: Option<LatchRecord>,
}

pub struct NavigationController {
    index: Arc<FlatIndex>,
    drawers: DrawerStateMachine,
    latch: LatchStore,
    bus: Arc<dyn EventBus>,
    surface: Box<dyn RenderSurface>,
    actions: ActionRegistry,
    resolver: ActivePathResolver,
    settings: NavigatorSettings,
    active_top_level: Option<String>,
    current: Option<String>,
    inbox: Arc<Mutex<VecDeque<BusEvent>>>,
    subscription: SubscriptionId,
    last_gesture: Option<u64>,
}

impl NavigationController {
    /// Wires a controller to `bus` and subscribes it to `folder-focus-request`.
    pub fn new(index: Arc<FlatIndex>, bus: Arc<dyn EventBus>, surface: Box<dyn RenderSurface>, settings: NavigatorSettings) -> Self {
        let inbox = Arc::new(Mutex::new(VecDeque::new()));
        let queue = Arc::clone(&inbox);
        let subscription = bus.subscribe(
            Topic::FolderFocusRequest,
            Arc::new(move |event: &BusEvent| {
                queue.lock().expect("controller inbox lock poisoned").push_back(event.clone());
            }),
        );

        Self {
            drawers: DrawerStateMachine::new(settings.strict_invariants),
            latch: LatchStore::new(Arc::clone(&bus)),
            resolver: ActivePathResolver::new(settings.prefix_match),
            actions: ActionRegistry::new(),
            active_top_level: None,
            current: None,
            last_gesture: None,
            index,
            bus,
            surface,
            settings,
            inbox,
            subscription,
        }
    }

    pub fn with_actions(mut self, actions: ActionRegistry) -> Self {
        self.actions = actions;
        self
    }

    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    pub fn drawers(&self) -> &DrawerStateMachine {
        &self.drawers
    }

    pub fn latch(&self) -> Option<&LatchRecord> {
        self.latch.current()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn active_top_level(&self) -> Option<&str> {
        self.active_top_level.as_deref()
    }

    pub fn settings(&self) -> &NavigatorSettings {
        &self.settings
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        NavigationSnapshot {
            active_top_level: self.active_top_level.clone(),
            current: self.current.clone(),
            drawers: self.drawers.states(),
            latch: self.latch.current().cloned(),
        }
    }

    /// Handles one direct user interaction to completion.
    ///
    /// Errors are only returned for invariant violations under strict settings;
    /// everything else degrades to a logged diagnostic.
    pub fn dispatch(&mut self, event: UiEvent) -> Result<(), DrawerError> {
        trace!(?event, "ui event");
        let before = self.drawers.states();
        let result = match &event {
            UiEvent::TopLevelClicked { id } => self.top_level_clicked(id),
            UiEvent::ItemClicked { path } => self.item_clicked(path),
            UiEvent::PageChanged { path } => self.page_changed(path),
            UiEvent::OutsideInteraction { gesture_id } => {
                self.outside_interaction(*gesture_id);
                Ok(())
            }
        };
        self.settle(&before, result)
    }

    /// Processes queued bus events; call after direct UI events were dispatched.
    ///
    /// Returns how many events were handled.
    pub fn drain_external(&mut self) -> Result<usize, DrawerError> {
        let mut handled = 0;
        loop {
            let next = self.inbox.lock().expect("controller inbox lock poisoned").pop_front();
            let Some(event) = next else {
                break;
            };
            handled += 1;
            let before = self.drawers.states();
            let result = match event {
                BusEvent::FolderFocusRequest(request) => self.focus_folder(&request),
                other => {
                    trace!(topic = %other.topic(), "ignoring external event");
                    Ok(())
                }
            };
            self.settle(&before, result)?;
        }
        Ok(handled)
    }

    /// Discards drawer state, latch and highlights, as after a full reload.
    pub fn reset(&mut self) {
        let before = self.drawers.states();
        self.drawers.close_all();
        self.active_top_level = None;
        self.current = None;
        self.last_gesture = None;
        self.clear_highlights();
        self.sync_drawers(&before);
        self.latch.clear();
    }

    fn top_level_clicked(&mut self, id: &str) -> Result<(), DrawerError> {
        let index = Arc::clone(&self.index);
        let Some(top) = index.top_level_by_id(id) else {
            warn!(id, "click on unknown top-level item");
            return Ok(());
        };

        if top.is_folder() && self.drawers.is_open(FIRST_DRAWER_DEPTH, &top.path) {
            return self.toggle_folder(top, &index);
        }

        if let Some(target) = self.latch.restore_target(&top.id)
            && target != top.path
            && let Some(node) = index.get(target)
        {
            debug!(id, target = %node.path, "restoring latched target");
            return self.reveal(node, &index, NavigationSource::Latch);
        }

        if top.is_folder() {
            return self.toggle_folder(top, &index);
        }
        self.choose_leaf(top, &index, NavigationSource::TopLevel)
    }

    fn item_clicked(&mut self, path: &str) -> Result<(), DrawerError> {
        let index = Arc::clone(&self.index);
        let Some(node) = normalize_menu_path(path).and_then(|key| index.get(&key)) else {
            warn!(path, "click on unknown menu item");
            return Ok(());
        };

        if node.is_folder() {
            self.toggle_folder(node, &index)
        } else {
            self.choose_leaf(node, &index, NavigationSource::Drawer)
        }
    }

    fn page_changed(&mut self, path: &str) -> Result<(), DrawerError> {
        let index = Arc::clone(&self.index);
        match self.resolver.resolve(path, &index) {
            Some(active) => self.activate(&active, &index),
            None => {
                debug!(path, "page outside the menu; resetting navigation");
                self.active_top_level = None;
                self.current = None;
                self.drawers.close_all();
                self.clear_highlights();
                self.latch.clear();
                Ok(())
            }
        }
    }

    fn outside_interaction(&mut self, gesture_id: u64) {
        if self.last_gesture == Some(gesture_id) {
            trace!(gesture_id, "gesture already handled");
            return;
        }
        self.last_gesture = Some(gesture_id);
        if self.drawers.all_closed() {
            return;
        }
        debug!(gesture_id, "outside interaction; closing drawers");
        self.drawers.close_all();
    }

    fn focus_folder(&mut self, request: &FolderFocusRequest) -> Result<(), DrawerError> {
        let index = Arc::clone(&self.index);
        let Some(folder) = normalize_menu_path(&request.folder_path)
            .and_then(|key| index.get(&key))
            .filter(|node| node.is_folder())
        else {
            warn!(folder = %request.folder_path, "folder focus request for unknown folder");
            return Ok(());
        };
        if folder.top_level_id != request.top_level_id {
            warn!(
                folder = %folder.path,
                requested = %request.top_level_id,
                actual = %folder.top_level_id,
                "folder focus request names a different section"
            );
        }

        debug!(folder = %folder.path, context = ?request.context, "focusing folder");
        let active = self.resolver.resolve_node(folder, &index);
        let result = self.drawers.open_to(&active, &index);
        self.absorb(result)
    }

    /// Opens or closes the drawer showing `folder`'s children.
    fn toggle_folder(&mut self, folder: &MenuNode, index: &FlatIndex) -> Result<(), DrawerError> {
        let Some(depth) = folder.drawer_depth() else {
            return Ok(());
        };
        let opening = !self.drawers.is_open(depth, &folder.path);
        let result = self.drawers.toggle_at_depth(depth, &folder.path, index);
        if opening && result.is_ok() && !folder.is_top_level() {
            self.latch_node(folder, index);
        }
        self.absorb(result)
    }

    /// Re-enters a latched target: leaves navigate, folders only reveal their drawers.
    fn reveal(&mut self, node: &MenuNode, index: &FlatIndex, source: NavigationSource) -> Result<(), DrawerError> {
        if !node.is_folder() {
            return self.choose_leaf(node, index, source);
        }
        let active = self.resolver.resolve_node(node, index);
        let result = self.drawers.open_to(&active, index);
        self.absorb(result)
    }

    fn choose_leaf(&mut self, node: &MenuNode, index: &FlatIndex, source: NavigationSource) -> Result<(), DrawerError> {
        if let Some(action) = node.action() {
            if self.actions.invoke(action, node) {
                return Ok(());
            }
            if node.href().is_none() {
                warn!(action, path = %node.path, "no handler registered for menu action");
                return Ok(());
            }
            warn!(action, path = %node.path, "no handler registered for menu action; navigating instead");
        }

        if is_external_href(&node.path, &self.settings.external_schemes) {
            self.publish_navigation(node, NavigationSource::External);
            return Ok(());
        }

        self.publish_navigation(node, source);
        let active = self.resolver.resolve_node(node, index);
        self.activate(&active, index)
    }

    /// Makes `active` the current target: latch, drawers and highlights.
    fn activate(&mut self, active: &ActivePath<'_>, index: &FlatIndex) -> Result<(), DrawerError> {
        self.active_top_level = Some(active.top_level.id.clone());
        self.current = Some(active.target.path.clone());
        let result = self.drawers.open_to(active, index);
        self.apply_highlights(active);
        self.latch_node(active.target, index);
        self.absorb(result)
    }

    fn latch_node(&mut self, node: &MenuNode, index: &FlatIndex) {
        if !self.latch.covers(&node.top_level_id) {
            self.latch.clear();
        }
        self.latch.update(node, index);
    }

    fn publish_navigation(&self, node: &MenuNode, source: NavigationSource) {
        debug!(path = %node.path, ?source, "navigate request");
        self.bus.publish(BusEvent::NavigateRequest(NavigateRequest {
            path: node.path.clone(),
            title: node.title.clone(),
            source,
        }));
    }

    fn apply_highlights(&mut self, active: &ActivePath<'_>) {
        self.surface.clear_marks();
        self.surface.mark_top_level(Some(&active.top_level.id));
        for folder in &active.folder_chain {
            self.surface.mark_ancestor_folder(&folder.path);
        }
        self.surface.mark_current(Some(&active.target.path));
    }

    fn clear_highlights(&mut self) {
        self.surface.clear_marks();
        self.surface.mark_top_level(None);
        self.surface.mark_current(None);
    }

    /// Missing children are a data problem already logged by the state machine;
    /// invariant violations only surface under strict settings.
    fn absorb(&self, result: Result<DrawerTransition, DrawerError>) -> Result<(), DrawerError> {
        match result {
            Ok(_) | Err(DrawerError::MissingChildren { .. }) => Ok(()),
            Err(error) if self.settings.strict_invariants => Err(error),
            Err(error) => {
                warn!(%error, "drawer request degraded");
                Ok(())
            }
        }
    }

    fn settle(&mut self, before: &[DrawerState], result: Result<(), DrawerError>) -> Result<(), DrawerError> {
        let checked = self.drawers.enforce_invariants(&self.index).map(|_| ());
        self.sync_drawers(before);
        result.and(checked)
    }

    /// Pushes drawer changes since `before` to the surface.
    fn sync_drawers(&mut self, before: &[DrawerState]) {
        for (old, new) in before.iter().zip(self.drawers.states()) {
            match (&old.open_key, &new.open_key) {
                (old, new) if old == new => {}
                (_, Some(key)) => {
                    let items = self.index.sorted_children(key);
                    self.surface.render_items(new.depth, &items);
                    self.surface.show_container(new.depth);
                }
                (Some(_), None) => self.surface.hide_container(new.depth),
                (None, None) => {}
            }
        }
    }
}

impl Drop for NavigationController {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscription);
    }
}

impl fmt::Debug for NavigationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationController")
            .field("drawers", &self.drawers)
            .field("latch", &self.latch)
            .field("active_top_level", &self.active_top_level)
            .field("current", &self.current)
            .field("actions", &self.actions)
            .finish_non_exhaustive()
    }
}
