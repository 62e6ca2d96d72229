//! In-memory session store with per-session mutual exclusion.
//!
//! Every session lives behind its own `tokio::sync::Mutex`, so two
//! concurrent transitions on the same session id can never interleave,
//! while operations on different sessions require no coordination.
//! Generation results may therefore be recorded out of request order;
//! the session's asset list reflects arrival order.
//!
//! The store owns no persistence: it is the in-memory backing referenced
//! from application state, and a persistent implementation would expose
//! the same surface.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::error::CoreError;
use crate::session::GenerationSession;
use crate::types::{EntityId, UserId};

/// Shared handle to one locked session.
type SessionSlot = Arc<Mutex<GenerationSession>>;

/// In-memory map of sessions keyed by session id.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<EntityId, SessionSlot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created session and return its id.
    pub async fn insert(&self, session: GenerationSession) -> EntityId {
        let id = session.id;
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    /// Fetch the slot for a session id, if present.
    async fn slot(&self, id: EntityId) -> Result<SessionSlot, CoreError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "GenerationSession",
                id,
            })
    }

    /// Return a point-in-time copy of a session.
    ///
    /// Sessions are owned exclusively by their creator; access by any other
    /// user is forbidden.
    pub async fn snapshot(
        &self,
        id: EntityId,
        user_id: UserId,
    ) -> Result<GenerationSession, CoreError> {
        let slot = self.slot(id).await?;
        let session = slot.lock().await;
        check_owner(&session, user_id)?;
        Ok(session.clone())
    }

    /// Run a mutation against a session while holding its lock.
    ///
    /// All mutations for a given session id are serialized here; the
    /// closure observes and produces a consistent state even when callers
    /// race.
    pub async fn with_session<T, F>(
        &self,
        id: EntityId,
        user_id: UserId,
        f: F,
    ) -> Result<T, CoreError>
    where
        F: FnOnce(&mut GenerationSession) -> Result<T, CoreError>,
    {
        let slot = self.slot(id).await?;
        let mut session = slot.lock().await;
        check_owner(&session, user_id)?;
        f(&mut session)
    }

    /// Drop every session owned by `user_id`, returning how many were
    /// removed. This is the explicit replacement for ambient per-user
    /// storage cleanup on sign-out.
    pub async fn clear_user(&self, user_id: UserId) -> usize {
        let mut sessions = self.sessions.write().await;
        let mut removed = Vec::new();
        for (id, slot) in sessions.iter() {
            if slot.lock().await.user_id == user_id {
                removed.push(*id);
            }
        }
        for id in &removed {
            sessions.remove(id);
        }
        if !removed.is_empty() {
            tracing::debug!(%user_id, count = removed.len(), "Cleared user sessions");
        }
        removed.len()
    }
}

fn check_owner(session: &GenerationSession, user_id: UserId) -> Result<(), CoreError> {
    if session.user_id != user_id {
        return Err(CoreError::Forbidden(
            "Session is owned by another user".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::AssetKind;
    use crate::session::{AssetMetadata, GeneratedAsset, SessionStatus};

    fn new_session(user_id: UserId) -> GenerationSession {
        GenerationSession::new(
            EntityId::new_v4(),
            user_id,
            "minimal".to_string(),
            vec![],
        )
    }

    fn asset() -> GeneratedAsset {
        GeneratedAsset {
            id: EntityId::new_v4(),
            kind: AssetKind::Background,
            url: "/static/generated/a.png".to_string(),
            prompt: "p".to_string(),
            style: "minimal".to_string(),
            created_at: chrono::Utc::now(),
            metadata: AssetMetadata {
                width: 512,
                height: 512,
                format: "png".to_string(),
                size: None,
            },
        }
    }

    #[tokio::test]
    async fn insert_and_snapshot_roundtrip() {
        let store = SessionStore::new();
        let user = UserId::new_v4();
        let id = store.insert(new_session(user)).await;

        let snapshot = store.snapshot(id, user).await.unwrap();
        assert_eq!(snapshot.id, id);
        assert_eq!(snapshot.status, SessionStatus::InProgress);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = SessionStore::new();
        let result = store.snapshot(EntityId::new_v4(), UserId::new_v4()).await;
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn foreign_user_access_forbidden() {
        let store = SessionStore::new();
        let owner = UserId::new_v4();
        let intruder = UserId::new_v4();
        let id = store.insert(new_session(owner)).await;

        let result = store.snapshot(id, intruder).await;
        assert!(matches!(result, Err(CoreError::Forbidden(_))));

        let result = store
            .with_session(id, intruder, |s| s.record_generated_asset(asset()))
            .await;
        assert!(matches!(result, Err(CoreError::Forbidden(_))));
    }

    #[tokio::test]
    async fn concurrent_records_are_all_applied() {
        let store = Arc::new(SessionStore::new());
        let user = UserId::new_v4();
        let id = store.insert(new_session(user)).await;

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .with_session(id, user, |s| s.record_generated_asset(asset()))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let snapshot = store.snapshot(id, user).await.unwrap();
        assert_eq!(snapshot.generated_assets.len(), 16);
    }

    #[tokio::test]
    async fn terminal_rejection_is_serialized_too() {
        let store = SessionStore::new();
        let user = UserId::new_v4();
        let id = store.insert(new_session(user)).await;

        store
            .with_session(id, user, |s| s.fail("capability unavailable"))
            .await
            .unwrap();

        let result = store
            .with_session(id, user, |s| s.record_generated_asset(asset()))
            .await;
        assert!(matches!(result, Err(CoreError::SessionClosed { .. })));

        let snapshot = store.snapshot(id, user).await.unwrap();
        assert_eq!(snapshot.status, SessionStatus::Failed);
        assert!(snapshot.generated_assets.is_empty());
    }

    #[tokio::test]
    async fn clear_user_removes_only_that_users_sessions() {
        let store = SessionStore::new();
        let alice = UserId::new_v4();
        let bob = UserId::new_v4();

        store.insert(new_session(alice)).await;
        store.insert(new_session(alice)).await;
        let bob_id = store.insert(new_session(bob)).await;

        assert_eq!(store.clear_user(alice).await, 2);
        assert!(store.snapshot(bob_id, bob).await.is_ok());
        assert_eq!(store.clear_user(alice).await, 0);
    }
}
