//! File-backed session repository.

use super::SessionRepository;
use crate::error::{Result, SessionError};
use crate::user::User;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key the user record is stored under.
pub const USER_DATA_KEY: &str = "userData";

/// On-disk layout: a single-key document, `{"userData": {...}}`.
#[derive(Serialize, Deserialize)]
struct SessionDocument {
    #[serde(rename = "userData")]
    user_data: User,
}

/// Session repository storing one JSON document on disk.
///
/// Writes go through a sibling temporary file and a rename, so a crash
/// mid-write leaves either the old record or the new one.
#[derive(Debug, Clone)]
pub struct FileSessionRepository {
    path: PathBuf,
}

impl FileSessionRepository {
    /// Store the session at `path`. Parent directories are created on save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn storage_error(action: &str, path: &Path, error: &std::io::Error) -> SessionError {
    SessionError::Storage(format!("{action} {}: {error}", path.display()))
}

impl SessionRepository for FileSessionRepository {
    fn load(&self) -> impl Future<Output = Result<Option<User>>> + Send {
        let path = self.path.clone();

        async move {
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(storage_error("reading", &path, &e)),
            };

            match serde_json::from_slice::<SessionDocument>(&bytes) {
                Ok(document) => Ok(Some(document.user_data)),
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "Ignoring corrupt session file");
                    Ok(None)
                },
            }
        }
    }

    fn save(&self, user: &User) -> impl Future<Output = Result<()>> + Send {
        let path = self.path.clone();
        let temp = self.temp_path();
        let document = serde_json::to_vec_pretty(&SessionDocument {
            user_data: user.clone(),
        });

        async move {
            let document =
                document.map_err(|e| SessionError::Storage(format!("encoding session: {e}")))?;

            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| storage_error("creating", parent, &e))?;
            }
            tokio::fs::write(&temp, &document)
                .await
                .map_err(|e| storage_error("writing", &temp, &e))?;
            tokio::fs::rename(&temp, &path)
                .await
                .map_err(|e| storage_error("replacing", &path, &e))?;

            tracing::debug!(path = %path.display(), "Session persisted");
            Ok(())
        }
    }

    fn clear(&self) -> impl Future<Output = Result<()>> + Send {
        let path = self.path.clone();

        async move {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "Session file removed");
                    Ok(())
                },
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(storage_error("removing", &path, &e)),
            }
        }
    }
}
