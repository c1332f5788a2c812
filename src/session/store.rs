use super::types::Session;
use crate::error::SessionError;
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;

pub type StoreResult<T> = std::result::Result<T, SessionError>;

/// Async per-user session persistence contract.
///
/// One logical record per user id, last write wins. Implementations must
/// treat a missing record as an empty result rather than an error.
pub trait SessionStore: Send + Sync {
    fn name(&self) -> &str;

    fn load_all<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = StoreResult<HashMap<String, Session>>> + Send + 'a>>;

    fn save<'a>(
        &'a self,
        session: &'a Session,
    ) -> Pin<Box<dyn Future<Output = StoreResult<()>> + Send + 'a>>;

    fn delete<'a>(
        &'a self,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = StoreResult<()>> + Send + 'a>>;
}

const RECORD_EXTENSION: &str = "json";

/// Directory of JSON records, one file per user.
pub struct JsonDirSessionStore {
    dir: PathBuf,
}

impl JsonDirSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, user_id: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{RECORD_EXTENSION}", encode_user_id(user_id)))
    }

    async fn read_record(path: &Path) -> StoreResult<Session> {
        let raw = fs::read_to_string(path).await?;
        serde_json::from_str(&raw).map_err(|error| SessionError::Corrupt {
            path: path.display().to_string(),
            message: error.to_string(),
        })
    }
}

/// Filesystem-safe, injective encoding of a user id.
///
/// Bytes outside `[A-Za-z0-9_-]` become `%XX`.
pub fn encode_user_id(user_id: &str) -> String {
    let mut encoded = String::with_capacity(user_id.len());
    for byte in user_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

impl SessionStore for JsonDirSessionStore {
    fn name(&self) -> &str {
        "json"
    }

    fn load_all<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = StoreResult<HashMap<String, Session>>> + Send + 'a>> {
        Box::pin(async move {
            let mut sessions = HashMap::new();
            let mut entries = match fs::read_dir(&self.dir).await {
                Ok(entries) => entries,
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                    return Ok(sessions);
                }
                Err(error) => return Err(error.into()),
            };

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                    continue;
                }
                match Self::read_record(&path).await {
                    Ok(session) => {
                        sessions.insert(session.user_id.clone(), session);
                    }
                    Err(error) => {
                        tracing::warn!(path = %path.display(), "skipping unreadable session record: {error}");
                    }
                }
            }

            Ok(sessions)
        })
    }

    fn save<'a>(
        &'a self,
        session: &'a Session,
    ) -> Pin<Box<dyn Future<Output = StoreResult<()>> + Send + 'a>> {
        Box::pin(async move {
            fs::create_dir_all(&self.dir).await?;
            let path = self.record_path(&session.user_id);
            let tmp = path.with_extension(format!("{RECORD_EXTENSION}.tmp"));
            let payload = serde_json::to_vec_pretty(session)?;
            fs::write(&tmp, payload).await?;
            fs::rename(&tmp, &path).await?;
            Ok(())
        })
    }

    fn delete<'a>(
        &'a self,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = StoreResult<()>> + Send + 'a>> {
        Box::pin(async move {
            match fs::remove_file(self.record_path(user_id)).await {
                Ok(()) => Ok(()),
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(error) => Err(error.into()),
            }
        })
    }
}
