//! The active user, remembered between sessions in a small JSON file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::models::User;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity file error: {0}")]
    Io(#[from] io::Error),

    #[error("identity encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize)]
struct IdentityDocument {
    user: User,
}

#[derive(Debug, Clone)]
pub struct IdentityFile {
    path: PathBuf,
}

impl IdentityFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored user, or `None` when nothing usable is on disk.
    pub fn load(&self) -> Option<User> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read identity file");
                return None;
            }
        };

        match serde_json::from_str::<IdentityDocument>(&raw) {
            Ok(doc) => Some(doc.user),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt identity file");
                None
            }
        }
    }

    pub fn save(&self, user: User) -> Result<(), IdentityError> {
        let body = serde_json::to_string(&IdentityDocument { user })?;
        fs::write(&self.path, body)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), IdentityError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_file(name: &str) -> IdentityFile {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        IdentityFile::new(std::env::temp_dir().join(format!("identity_{}_{}.json", name, nanos)))
    }

    #[test]
    fn test_save_load_clear() {
        let file = scratch_file("roundtrip");
        assert_eq!(file.load(), None);

        file.save(User::Melissa).unwrap();
        assert_eq!(file.load(), Some(User::Melissa));
        assert_eq!(fs::read_to_string(file.path()).unwrap(), r#"{"user":"melissa"}"#);

        file.clear().unwrap();
        assert_eq!(file.load(), None);
        file.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_means_no_user() {
        let file = scratch_file("corrupt");
        fs::write(file.path(), "{\"user\":\"bob\"}").unwrap();
        assert_eq!(file.load(), None);
        file.clear().unwrap();
    }
}
