//! Directory-backed SessionRepository.
//!
//! One JSON file per conversation under `base_dir/sessions/`. Writes
//! go through a temp file and rename so a crash mid-write never leaves
//! a truncated session on disk.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use gapscan_core::session::{Session, SessionRepository};

use crate::paths::GapscanPaths;

pub struct JsonDirSessionRepository {
    sessions_dir: PathBuf,
}

impl JsonDirSessionRepository {
    /// Creates a repository at the default location
    /// (`~/.config/gapscan/sessions/`).
    pub async fn default_location() -> Result<Self> {
        let sessions_dir = GapscanPaths::sessions_dir()
            .map_err(|e| anyhow::anyhow!("Failed to get sessions directory: {}", e))?;
        Self::new(sessions_dir).await
    }

    /// Creates a repository rooted at an explicit directory.
    pub async fn new(sessions_dir: impl AsRef<Path>) -> Result<Self> {
        let sessions_dir = sessions_dir.as_ref().to_path_buf();
        fs::create_dir_all(&sessions_dir)
            .await
            .context("Failed to create sessions directory")?;
        Ok(Self { sessions_dir })
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    fn file_path(&self, session_id: &str) -> PathBuf {
        self.sessions_dir
            .join(format!("{}.json", sanitize_key(session_id)))
    }
}

/// Conversation ids come from an external platform and may contain
/// path separators or other characters unsafe in filenames.
fn sanitize_key(session_id: &str) -> String {
    session_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl SessionRepository for JsonDirSessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        let path = self.file_path(session_id);
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).context(format!("Failed to read session file {}", path.display()));
            }
        };

        let session: Session = serde_json::from_str(&contents)
            .context(format!("Failed to parse session file {}", path.display()))?;
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let path = self.file_path(&session.id);
        let contents =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)
            .await
            .context(format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path)
            .await
            .context(format!("Failed to move session into {}", path.display()))?;

        debug!(session_id = %session.id, step = session.step.as_str(), "saved session");
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        let path = self.file_path(session_id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).context(format!("Failed to delete session file {}", path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapscan_core::session::Step;

    #[tokio::test]
    async fn save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonDirSessionRepository::new(dir.path()).await.unwrap();

        let mut session = Session::new("19:meeting@thread.v2");
        session.step = Step::WaitingObjective;
        session.doc_a.push_file("Source document text", "source.pdf");
        repo.save(&session).await.unwrap();

        let found = repo
            .find_by_id("19:meeting@thread.v2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, "19:meeting@thread.v2");
        assert_eq!(found.step, Step::WaitingObjective);
        assert_eq!(found.doc_a.display_name(), "source.pdf");
    }

    #[tokio::test]
    async fn missing_session_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonDirSessionRepository::new(dir.path()).await.unwrap();
        assert!(repo.find_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonDirSessionRepository::new(dir.path()).await.unwrap();
        repo.save(&Session::new("conv")).await.unwrap();
        repo.delete("conv").await.unwrap();
        assert!(repo.find_by_id("conv").await.unwrap().is_none());
        repo.delete("conv").await.unwrap();
    }

    #[test]
    fn keys_are_made_filesystem_safe() {
        assert_eq!(sanitize_key("19:room@thread.v2"), "19_room_thread_v2");
        assert_eq!(sanitize_key("../../etc/passwd"), "______etc_passwd");
        assert_eq!(sanitize_key("plain-id_1"), "plain-id_1");
    }
}
