//! Named callbacks for menu entries that run an action instead of navigating.

use std::{collections::HashMap, fmt, sync::Arc};

use navdeck_types::MenuNode;
use tracing::debug;

pub type ActionHandler = Arc<dyn Fn(&MenuNode) + Send + Sync>;

#[derive(Clone, Default)]
pub struct ActionRegistry {
    handlers: HashMap<String, ActionHandler>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, replacing any previous handler.
    pub fn register(&mut self, name: impl Into<String>, handler: impl Fn(&MenuNode) + Send + Sync + 'static) {
        self.handlers.insert(name.into(), Arc::new(handler));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Runs the handler for `name`; returns `false` when none is registered.
    pub fn invoke(&self, name: &str, node: &MenuNode) -> bool {
        let Some(handler) = self.handlers.get(name) else {
            return false;
        };
        debug!(action = name, path = %node.path, "invoking menu action");
        handler(node);
        true
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("ActionRegistry").field("actions", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use navdeck_types::{MenuConfig, MenuEntryConfig};

    use super::*;
    use crate::index::build_index;

    #[test]
    fn invokes_registered_handler_with_node() {
        let index = build_index(&MenuConfig {
            top_level: vec![MenuEntryConfig {
                id: "help".into(),
                title: "Help".into(),
                action: Some("open-help".into()),
                ..MenuEntryConfig::default()
            }],
            ..MenuConfig::default()
        });
        let node = index.top_level_by_id("help").expect("help entry");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut actions = ActionRegistry::new();
        actions.register("open-help", move |node: &MenuNode| sink.lock().unwrap().push(node.path.clone()));

        assert!(actions.contains("open-help"));
        assert!(actions.invoke("open-help", node));
        assert!(!actions.invoke("missing", node));
        assert_eq!(*seen.lock().unwrap(), vec![node.path.clone()]);
    }
}
