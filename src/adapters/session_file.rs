use crate::core::Session;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Remembers the signed-in user between command-line invocations.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let data = fs::read(&self.path)?;
        Ok(Some(serde_json::from_slice(&data)?))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
        tracing::debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    /// Returns whether a session existed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }

        fs::remove_file(&self.path)?;
        Ok(true)
    }
}
