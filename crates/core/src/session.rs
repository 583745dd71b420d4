//! Session (cookie) state persistence.
//!
//! The file mirrors the browser storage-state layout:
//! ```json
//! { "cookies": [ { "name": "...", "value": "...", "domain": "...", ... } ], "origins": [] }
//! ```
//! A missing or unreadable file is never fatal; the run just starts without
//! restored cookies.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A browser cookie in storage-state form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    /// Expiry as seconds since the epoch; `-1` for session cookies.
    #[serde(default = "default_expires")]
    pub expires: f64,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

fn default_path() -> String {
    "/".into()
}

fn default_expires() -> f64 {
    -1.0
}

/// Snapshot of the authenticated browser state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub cookies: Vec<StoredCookie>,
    /// Per-origin storage, carried through untouched.
    #[serde(default)]
    pub origins: Vec<serde_json::Value>,
}

impl SessionState {
    /// Load a saved session, tolerating absence and corruption.
    ///
    /// Returns `None` when the file does not exist or cannot be parsed; the
    /// latter is logged at warn level.
    pub fn load(path: &Path) -> Option<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no saved session");
            return None;
        }

        match Self::read(path) {
            Ok(state) => {
                tracing::info!(path = %path.display(), cookies = state.cookies.len(), "restored saved session");
                Some(state)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring unreadable session file: {e}");
                None
            }
        }
    }

    fn read(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&raw).map_err(|e| Error::Session(e.to_string()))
    }

    /// Overwrite the session file, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| Error::io(path, e))?;
        tracing::info!(path = %path.display(), cookies = self.cookies.len(), "session saved");
        Ok(())
    }
}
