use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use signage_core::{Msg, WidgetId, WidgetSpec};
use signage_logging::signage_info;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read board config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid board config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<ron::error::SpannedError>,
    },
    #[error("widget id {0} is declared more than once")]
    DuplicateWidget(WidgetId),
    #[error("failed to serialize board config: {0}")]
    Serialize(#[from] ron::Error),
}

/// One mounted widget in a board file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetEntry {
    pub id: WidgetId,
    pub spec: WidgetSpec,
}

/// A screen layout as stored on disk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub reduced_motion: bool,
    pub widgets: Vec<WidgetEntry>,
}

impl BoardConfig {
    /// Rejects boards that reuse a widget id.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for entry in &self.widgets {
            if !seen.insert(entry.id) {
                return Err(ConfigError::DuplicateWidget(entry.id));
            }
        }
        Ok(())
    }

    /// Mount messages in declaration order.
    pub fn mount_messages(&self) -> Vec<Msg> {
        self.widgets
            .iter()
            .map(|entry| Msg::Mount {
                widget: entry.id,
                spec: entry.spec.clone(),
            })
            .collect()
    }
}

pub fn load_board(path: &Path) -> Result<BoardConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let board: BoardConfig = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;
    board.validate()?;
    signage_info!("loaded {} widgets from {:?}", board.widgets.len(), path);
    Ok(board)
}

/// Writes `board` next to `path` in a temp file, then renames it into place.
pub fn save_board(path: &Path, board: &BoardConfig) -> Result<(), ConfigError> {
    let content = ron::ser::to_string_pretty(board, ron::ser::PrettyConfig::new())?;
    let io_error = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error)?;
    tmp.write_all(content.as_bytes()).map_err(io_error)?;
    tmp.flush().map_err(io_error)?;
    tmp.as_file_mut().sync_all().map_err(io_error)?;
    tmp.persist(path).map_err(|err| io_error(err.error))?;
    Ok(())
}
