//! Registry of active labeling sessions.
//!
//! Each session pairs the [`LabelingSession`] state with the image being
//! described. Sessions live until they are submitted or discarded.

use std::collections::HashMap;

use describer_core::session::LabelingSession;
use describer_storage::ProfileImage;
use tokio::sync::RwLock;
use uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A session in progress.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub session: LabelingSession,
    pub image: ProfileImage,
    pub started_at: Timestamp,
}

impl ActiveSession {
    pub fn new(session: LabelingSession, image: ProfileImage) -> Self {
        Self {
            session,
            image,
            started_at: chrono::Utc::now(),
        }
    }
}

/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc`.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, ActiveSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session under a fresh id.
    pub async fn insert(&self, active: ActiveSession) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, active);
        id
    }

    /// Put a previously removed session back under its old id.
    pub async fn restore(&self, id: Uuid, active: ActiveSession) {
        self.sessions.write().await.insert(id, active);
    }

    /// Run `f` against a session without modifying it.
    pub async fn read<R>(&self, id: Uuid, f: impl FnOnce(&ActiveSession) -> R) -> Option<R> {
        self.sessions.read().await.get(&id).map(f)
    }

    /// Run `f` against a session with write access.
    pub async fn update<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ActiveSession) -> R,
    ) -> Option<R> {
        self.sessions.write().await.get_mut(&id).map(f)
    }

    pub async fn remove(&self, id: Uuid) -> Option<ActiveSession> {
        self.sessions.write().await.remove(&id)
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
