//! # Navdeck Engine
//!
//! Navigation core for a console-style side menu with up to five levels: a
//! top-level list plus four nested drawers.
//!
//! ## Key Features
//!
//! - **Flat index**: the nested menu configuration is flattened once into a map
//!   from canonical path to node, with full ancestry per node
//! - **Active-path resolution**: maps the current page onto its section, folder
//!   chain and target
//! - **Drawer state machine**: at most one open drawer per depth, cascading closes
//!   and no orphaned drawers
//! - **Latch**: remembers the last target per section and restores it on re-entry
//! - **Event bus**: `navigate-request`, `latch-updated` and `folder-focus-request`
//!   through an injected [`EventBus`]
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use navdeck_engine::{LocalEventBus, NavigationController, RecordingSurface, build_index};
//! use navdeck_types::{MenuConfig, MenuEntryConfig, NavigatorSettings, UiEvent};
//!
//! let mut config = MenuConfig {
//!     top_level: vec![MenuEntryConfig::folder("reports", "Reports").with_group_key("reports")],
//!     ..MenuConfig::default()
//! };
//! config.groups.insert(2, "reports", vec![MenuEntryConfig::leaf("summary", "Summary", "/reports/summary")]);
//!
//! let index = Arc::new(build_index(&config));
//! let bus = Arc::new(LocalEventBus::new());
//! let mut controller = NavigationController::new(index, bus, Box::new(RecordingSurface::new()), NavigatorSettings::default());
//!
//! controller.dispatch(UiEvent::PageChanged { path: "/reports/summary".into() })?;
//! assert_eq!(controller.current(), Some("/reports/summary"));
//! assert_eq!(controller.drawers().open_key(2), Some("_internal_folder_1_reports"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`index`**: `MenuIndexBuilder` and the read-only `FlatIndex`
//! - **`resolver`**: `ActivePathResolver` and sibling display order
//! - **`drawer`**: `DrawerStateMachine`
//! - **`latch`**: `LatchStore`
//! - **`bus`** / **`surface`**: the collaborator seams
//! - **`controller`**: `NavigationController`, which routes UI and bus events
//!
//! The engine performs no I/O; configuration is loaded beforehand (see `navdeck-util`).

pub mod actions;
pub mod bus;
pub mod controller;
pub mod drawer;
pub mod error;
pub mod index;
pub mod latch;
pub mod resolver;
pub mod surface;

pub use actions::{ActionHandler, ActionRegistry};
pub use bus::{EventBus, LocalEventBus, RecordingEventBus, Subscriber, SubscriptionId};
pub use controller::{NavigationController, NavigationSnapshot};
pub use drawer::{DrawerSlot, DrawerState, DrawerStateMachine, DrawerTransition};
pub use error::{ConfigDefect, DrawerError, IndexError};
pub use index::{FlatIndex, MenuIndexBuilder, build_index};
pub use latch::LatchStore;
pub use resolver::{ActivePath, ActivePathResolver, sort_siblings};
pub use surface::{RecordingSurface, RenderSurface, SurfaceCall};
