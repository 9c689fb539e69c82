//! Helpers shared by the Navdeck engine and CLI: path canonicalization, title
//! collation and the loaders that materialize configuration before the engine runs.

pub mod collation;
pub mod menu_source;
pub mod paths;
pub mod settings_store;

pub use collation::{collation_key, compare_titles};
pub use menu_source::{MenuFormat, MenuSourceError, load_menu_config, parse_menu_config, read_menu_config};
pub use paths::{
    ACTION_PLACEHOLDER_PREFIX, FOLDER_PLACEHOLDER_PREFIX, PlaceholderKind, expand_home, is_external_href, is_placeholder_path,
    normalize_menu_path, normalize_page_path, path_prefixes, synthesize_placeholder,
};
pub use settings_store::{SETTINGS_FILE_NAME, SETTINGS_PATH_ENV, SettingsError, default_settings_path, load_settings};
