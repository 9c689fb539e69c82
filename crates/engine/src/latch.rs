//! Remembers the last visited target of the active top-level section.

use std::{fmt, sync::Arc};

use navdeck_types::{BusEvent, LatchFolder, LatchRecord, MenuNode};
use tracing::debug;

use crate::{bus::EventBus, index::FlatIndex};

/// Holds at most one [`LatchRecord`] and announces every change on `latch-updated`.
///
/// The notification is always the last step of `update`/`clear`, so subscribers
/// read a record that is already stored.
pub struct LatchStore {
    record: Option<LatchRecord>,
    bus: Arc<dyn EventBus>,
}

impl LatchStore {
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self { record: None, bus }
    }

    pub fn current(&self) -> Option<&LatchRecord> {
        self.record.as_ref()
    }

    /// Latches `node` as the target of its top-level section.
    ///
    /// Nothing is published when the stored record is already identical.
    pub fn update(&mut self, node: &MenuNode, index: &FlatIndex) -> &LatchRecord {
        let top_level = index.get(node.top_level_path()).unwrap_or(node);
        let folder_chain = node
            .parent_chain()
            .iter()
            .skip(1)
            .filter_map(|path| index.get(path))
            .filter(|ancestor| ancestor.is_folder())
            .map(|folder| LatchFolder {
                path: folder.path.clone(),
                title: folder.title.clone(),
            })
            .collect();

        let record = LatchRecord {
            top_level_id: top_level.id.clone(),
            top_level_title: top_level.title.clone(),
            target_path: node.path.clone(),
            target_title: node.title.clone(),
            folder_chain,
        };

        let changed = self.record.as_ref() != Some(&record);
        let stored = self.record.insert(record);
        if changed {
            debug!(top_level = %stored.top_level_id, target = %stored.target_path, "latch updated");
            self.bus.publish(BusEvent::LatchUpdated(Some(stored.clone())));
        }
        stored
    }

    /// Forgets the latch; returns `false` (and publishes nothing) when it was already empty.
    pub fn clear(&mut self) -> bool {
        let Some(previous) = self.record.take() else {
            return false;
        };
        debug!(top_level = %previous.top_level_id, "latch cleared");
        self.bus.publish(BusEvent::LatchUpdated(None));
        true
    }

    /// True when the latch belongs to the section `top_level_id`.
    pub fn covers(&self, top_level_id: &str) -> bool {
        self.record.as_ref().is_some_and(|record| record.top_level_id == top_level_id)
    }

    /// Path to restore when the section `top_level_id` is re-entered.
    pub fn restore_target(&self, top_level_id: &str) -> Option<&str> {
        self.record
            .as_ref()
            .filter(|record| record.top_level_id == top_level_id)
            .map(|record| record.target_path.as_str())
    }
}

impl fmt::Debug for LatchStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LatchStore").field("record", &self.record).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use navdeck_types::{GroupsByDepth, MenuConfig, MenuEntryConfig, Topic};

    use super::*;
    use crate::{bus::RecordingEventBus, index::build_index};

    fn index() -> FlatIndex {
        let mut groups = GroupsByDepth::default();
        groups.insert(2, "reports", vec![MenuEntryConfig::folder("archive", "Archive").with_href("archive")]);
        groups.insert(3, "archive", vec![MenuEntryConfig::folder("y2023", "2023").with_href("archive/2023")]);
        groups.insert(4, "archive/2023", vec![MenuEntryConfig::leaf("q1", "Q1", "archive/2023/q1")]);
        build_index(&MenuConfig {
            top_level: vec![
                MenuEntryConfig::folder("reports", "Reports").with_group_key("reports"),
                MenuEntryConfig::leaf("boards", "Boards", "/boards"),
            ],
            groups,
        })
    }

    #[test]
    fn update_records_folder_chain_and_publishes() {
        let index = index();
        let bus = Arc::new(RecordingEventBus::new());
        let mut latch = LatchStore::new(bus.clone());

        let record = latch.update(index.get("archive/2023/q1").unwrap(), &index).clone();
        assert_eq!(record.top_level_id, "reports");
        assert_eq!(record.top_level_title, "Reports");
        assert_eq!(record.target_title, "Q1");
        let chain: Vec<_> = record.folder_chain.iter().map(|folder| folder.path.as_str()).collect();
        assert_eq!(chain, vec!["archive", "archive/2023"]);

        assert_eq!(bus.last_on(Topic::LatchUpdated), Some(BusEvent::LatchUpdated(Some(record))));
    }

    #[test]
    fn identical_update_is_silent() {
        let index = index();
        let bus = Arc::new(RecordingEventBus::new());
        let mut latch = LatchStore::new(bus.clone());
        let node = index.get("archive/2023").unwrap();

        latch.update(node, &index);
        latch.update(node, &index);
        assert_eq!(bus.events_on(Topic::LatchUpdated).len(), 1);
    }

    #[test]
    fn clear_publishes_only_when_something_was_latched() {
        let index = index();
        let bus = Arc::new(RecordingEventBus::new());
        let mut latch = LatchStore::new(bus.clone());

        assert!(!latch.clear());
        latch.update(index.get("/boards").unwrap(), &index);
        assert!(latch.clear());
        assert!(latch.current().is_none());
        assert_eq!(bus.last_on(Topic::LatchUpdated), Some(BusEvent::LatchUpdated(None)));
        assert_eq!(bus.events_on(Topic::LatchUpdated).len(), 2);
    }

    #[test]
    fn restore_target_matches_section_only() {
        let index = index();
        let mut latch = LatchStore::new(Arc::new(RecordingEventBus::new()));
        latch.update(index.get("archive/2023/q1").unwrap(), &index);

        assert_eq!(latch.restore_target("reports"), Some("archive/2023/q1"));
        assert_eq!(latch.restore_target("boards"), None);
        assert!(latch.covers("reports"));
    }
}
