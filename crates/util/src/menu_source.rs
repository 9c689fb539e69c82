//! Loading menu configuration documents from disk.
//!
//! All I/O happens here, before the engine ever sees the configuration. The
//! format is picked from the file extension: `.json` is parsed as JSON and
//! everything else (including `.yaml`, `.yml` and no extension) as YAML.

use std::path::{Path, PathBuf};

use navdeck_types::MenuConfig;
use thiserror::Error;
use tracing::debug;

/// Failure to read or decode a menu configuration document.
#[derive(Debug, Error)]
pub enum MenuSourceError {
    #[error("failed to read menu config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON menu config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML menu config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Serialization format of a menu document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuFormat {
    Json,
    Yaml,
}

impl MenuFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some(extension) if extension.eq_ignore_ascii_case("json") => MenuFormat::Json,
            _ => MenuFormat::Yaml,
        }
    }
}

/// Decodes a menu document held in memory.
pub fn parse_menu_config(content: &str, format: MenuFormat) -> Result<MenuConfig, MenuSourceError> {
    let config = match format {
        MenuFormat::Json => serde_json::from_str(content)?,
        MenuFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(config)
}

/// Reads and decodes a menu document synchronously.
pub fn load_menu_config(path: impl AsRef<Path>) -> Result<MenuConfig, MenuSourceError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| MenuSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(path, &content)
}

/// Reads and decodes a menu document on the tokio runtime.
pub async fn read_menu_config(path: impl AsRef<Path>) -> Result<MenuConfig, MenuSourceError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await.map_err(|source| MenuSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(path, &content)
}

fn decode(path: &Path, content: &str) -> Result<MenuConfig, MenuSourceError> {
    let format = MenuFormat::from_path(path);
    let config = parse_menu_config(content, format)?;
    debug!(
        path = %path.display(),
        ?format,
        top_level = config.top_level.len(),
        "menu config loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const YAML_MENU: &str = r#"
topLevel:
  - id: dashboard
    title: Dashboard
    href: /
  - id: reports
    title: Reports
    iconKind: folder
    groupKey: reports
groups:
  "2":
    reports:
      - id: archive
        title: Archive
        iconKind: folder
        href: archive
  "3":
    archive:
      - id: q1
        title: 2023 Q1
        href: archive/2023-q1
"#;

    #[test]
    fn format_follows_extension() {
        assert_eq!(MenuFormat::from_path(Path::new("menu.JSON")), MenuFormat::Json);
        assert_eq!(MenuFormat::from_path(Path::new("menu.yml")), MenuFormat::Yaml);
        assert_eq!(MenuFormat::from_path(Path::new("menu")), MenuFormat::Yaml);
    }

    #[test]
    fn yaml_document_loads_all_depths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menu.yaml");
        std::fs::write(&path, YAML_MENU).unwrap();

        let config = load_menu_config(&path).unwrap();
        assert_eq!(config.top_level.len(), 2);
        assert_eq!(config.groups.depth2["reports"][0].id, "archive");
        assert_eq!(config.groups.depth3["archive"][0].href.as_deref(), Some("archive/2023-q1"));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let error = load_menu_config(&path).unwrap_err();
        assert!(matches!(error, MenuSourceError::Io { .. }));
        assert!(error.to_string().contains("absent.json"));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let error = parse_menu_config("{ not json", MenuFormat::Json).unwrap_err();
        assert!(matches!(error, MenuSourceError::Json(_)));
    }

    #[tokio::test]
    async fn async_reader_matches_sync_loader() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menu.yaml");
        std::fs::write(&path, YAML_MENU).unwrap();

        let from_async = read_menu_config(&path).await.unwrap();
        let from_sync = load_menu_config(&path).unwrap();
        assert_eq!(from_async, from_sync);
    }
}
