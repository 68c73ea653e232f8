//! Session repository trait.
//!
//! Defines the interface for session persistence operations.

use anyhow::Result;
use async_trait::async_trait;

use super::model::Session;

/// An abstract repository for per-conversation session state.
///
/// Decouples the turn processor from the storage mechanism (in-memory
/// map, JSON files, a remote key-value store). Sessions are ephemeral;
/// implementations may evict at will and the core recreates them lazily.
///
/// The core serializes turns per session key, so implementations do not
/// need locking beyond their own internal consistency.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds a session by its conversation key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: session found
    /// - `Ok(None)`: no session stored for this key
    /// - `Err(_)`: storage failure
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>>;

    /// Saves a session, replacing any previous state for its key.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Deletes a session; deleting an unknown key is not an error.
    async fn delete(&self, session_id: &str) -> Result<()>;
}
