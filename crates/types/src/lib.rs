//! Shared type definitions for the Navdeck navigation core.
//!
//! Everything here is plain data: the authored menu configuration, the indexed
//! node descriptor, latch records, bus payloads and UI input events. Behavior
//! lives in `navdeck-engine`.

pub mod events;
pub mod menu;
pub mod settings;

pub use events::{BusEvent, FolderFocusRequest, LatchFolder, LatchRecord, NavigateRequest, NavigationSource, ParseTopicError, Topic, UiEvent};
pub use menu::{
    FIRST_DRAWER_DEPTH, FOLDER_ICON_KIND, GroupsByDepth, MAX_MENU_DEPTH, MenuConfig, MenuEntryConfig, MenuNode, NodeKind, TOP_LEVEL_DEPTH,
};
pub use settings::NavigatorSettings;
