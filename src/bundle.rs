//! The persisted credential bundle read by the sync process.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::Path;

use crate::credentials::ClientCredentials;
use crate::error::BootstrapError;

/// Client id and secret, waiting for a refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBundle {
    client_id: String,
    client_secret: String,
}

impl From<&ClientCredentials> for PendingBundle {
    fn from(credentials: &ClientCredentials) -> Self {
        Self {
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
        }
    }
}

impl PendingBundle {
    pub fn complete(self, refresh_token: String) -> AuthorizationBundle {
        AuthorizationBundle {
            client_id: self.client_id,
            client_secret: self.client_secret,
            refresh_token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationBundle {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl AuthorizationBundle {
    /// Pretty JSON, 2-space indent, trailing newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Write the bundle to `path`, replacing any existing file.
    ///
    /// The content goes to a sibling temp file first and is renamed into
    /// place, so readers never observe a partial bundle.
    pub fn save(&self, path: &Path) -> Result<(), BootstrapError> {
        self.write_atomic(path)
            .map_err(|source| BootstrapError::Persist {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "stored credential bundle");
        Ok(())
    }

    fn write_atomic(&self, path: &Path) -> io::Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let json = self.to_json()?;
        std::fs::create_dir_all(parent)?;
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}
