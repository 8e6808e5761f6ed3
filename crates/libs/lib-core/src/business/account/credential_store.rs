//! One named slot holding the MCP token.

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use std::path::{Path, PathBuf};

use lib_rpc::Credential;

/// Slot key of the token
pub const TOKEN_SLOT: &str = "mcp_token";

/// get / set / clear of the stored token
pub trait CredentialStore {
    /// Stored credential, `None` when absent or no longer valid
    fn get(&self) -> Result<Option<Credential>>;
    fn set(&self, credential: &Credential) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Token kept in a small JSON key-value file.
///
/// Other keys in the file are left untouched.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/mcd-coupon/storage.json`, falls back to the working dir
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mcd-coupon")
            .join("storage.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Read [{}] failed", self.path.display()))
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            _ => {
                tracing::warn!("Storage file [{}] is corrupted, reset", self.path.display());
                Ok(Map::new())
            }
        }
    }

    fn save(&self, map: Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Create dir [{}] failed", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(&Value::Object(map))?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Write [{}] failed", self.path.display()))
    }
}

impl CredentialStore for FileCredentialStore {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn get(&self) -> Result<Option<Credential>> {
        let map = self.load()?;
        let Some(raw) = map.get(TOKEN_SLOT).and_then(Value::as_str) else {
            return Ok(None);
        };
        match Credential::new(raw) {
            Ok(credential) => Ok(Some(credential)),
            Err(e) => {
                tracing::warn!("Stored token ignored: {}", e);
                Ok(None)
            }
        }
    }

    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn set(&self, credential: &Credential) -> Result<()> {
        let mut map = self.load()?;
        map.insert(
            TOKEN_SLOT.to_owned(),
            Value::String(credential.expose().to_owned()),
        );
        self.save(map)
    }

    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn clear(&self) -> Result<()> {
        let mut map = self.load()?;
        if map.remove(TOKEN_SLOT).is_some() {
            self.save(map)?;
        }
        Ok(())
    }
}
