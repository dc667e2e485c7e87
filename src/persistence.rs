// ============================================================================
// STATE FILE
// ============================================================================

// Flat JSON state file: `{"<appliance name>": <bool>, ...}`.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::appliance::{Appliance, Registry};

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} does not contain a JSON object")]
    NotAnObject { path: PathBuf },

    #[error("failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistenceError {
    pub fn is_read(&self) -> bool {
        matches!(
            self,
            PersistenceError::Read { .. }
                | PersistenceError::Parse { .. }
                | PersistenceError::NotAnObject { .. }
        )
    }

    pub fn is_write(&self) -> bool {
        !self.is_read()
    }
}

/// Reads and writes the appliance state file.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies the stored states on top of `registry`. Returns `Ok(false)`
    /// when no file exists; keys that are unknown or not booleans are skipped.
    pub fn load_into(&self, registry: &mut Registry) -> Result<bool, PersistenceError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let value: Value =
            serde_json::from_str(&contents).map_err(|source| PersistenceError::Parse {
                path: self.path.clone(),
                source,
            })?;
        let Value::Object(entries) = value else {
            return Err(PersistenceError::NotAnObject {
                path: self.path.clone(),
            });
        };

        for (name, value) in &entries {
            let Ok(appliance) = Appliance::from_name(name) else {
                tracing::debug!(key = %name, "ignoring unknown key in state file");
                continue;
            };
            match value.as_bool() {
                Some(on) => registry.set(appliance, on),
                None => tracing::warn!(%appliance, %value, "ignoring non-boolean state"),
            }
        }
        Ok(true)
    }

    pub fn save(&self, registry: &Registry) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(registry).map_err(PersistenceError::Encode)?;
        std::fs::write(&self.path, json).map_err(|source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
