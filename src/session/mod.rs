pub mod manager;
pub mod sqlite_store;
pub mod store;
pub mod types;

pub use manager::{SessionManager, render_context};
pub use sqlite_store::SqliteSessionStore;
pub use store::{JsonDirSessionStore, SessionStore, StoreResult, encode_user_id};
pub use types::{
    Message, MessageRole, Session, SessionBackend, SessionConfig, SessionStats,
};

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Open the configured backend.
///
/// `default_dir` is used for whichever path the config leaves unset.
pub async fn open_store(
    config: &SessionConfig,
    default_dir: &Path,
) -> StoreResult<Arc<dyn SessionStore>> {
    match config.backend {
        SessionBackend::Json => {
            let dir = config
                .sessions_dir
                .as_deref()
                .map(expand_home)
                .unwrap_or_else(|| default_dir.join("sessions"));
            Ok(Arc::new(JsonDirSessionStore::new(dir)))
        }
        SessionBackend::Sqlite => {
            let path = config
                .database_path
                .as_deref()
                .map(expand_home)
                .unwrap_or_else(|| default_dir.join("sessions.db"));
            Ok(Arc::new(SqliteSessionStore::open(&path).await?))
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
