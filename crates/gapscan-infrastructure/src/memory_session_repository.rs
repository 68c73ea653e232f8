//! In-memory SessionRepository for tests and single-process deployments.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use gapscan_core::session::{Session, SessionRepository};

/// Keeps sessions in a process-local map. State is lost on restart,
/// which simply restarts affected conversations from Idle.
#[derive(Default)]
pub struct MemorySessionRepository {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently held.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapscan_core::session::Step;

    #[tokio::test]
    async fn save_and_find_round_trip() {
        let repo = MemorySessionRepository::new();
        let mut session = Session::new("conv-1");
        session.step = Step::WaitingDocB;
        repo.save(&session).await.unwrap();

        let found = repo.find_by_id("conv-1").await.unwrap().unwrap();
        assert_eq!(found.step, Step::WaitingDocB);
    }

    #[tokio::test]
    async fn missing_session_is_none() {
        let repo = MemorySessionRepository::new();
        assert!(repo.find_by_id("unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_overwrites_previous_state() {
        let repo = MemorySessionRepository::new();
        let mut session = Session::new("conv-1");
        repo.save(&session).await.unwrap();

        session.step = Step::WaitingObjective;
        repo.save(&session).await.unwrap();

        let found = repo.find_by_id("conv-1").await.unwrap().unwrap();
        assert_eq!(found.step, Step::WaitingObjective);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn delete_removes_session() {
        let repo = MemorySessionRepository::new();
        repo.save(&Session::new("conv-1")).await.unwrap();
        repo.delete("conv-1").await.unwrap();
        assert!(repo.find_by_id("conv-1").await.unwrap().is_none());
        // Deleting again is a no-op.
        repo.delete("conv-1").await.unwrap();
    }
}
