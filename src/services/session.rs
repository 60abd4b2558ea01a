// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session store: the logged-in user, persisted across runs.
//!
//! Every mutation is broadcast to subscribers so views that depend on the
//! session (navigation, route gating) can re-evaluate without polling.

use crate::error::Result;
use crate::models::Session;
use crate::storage::{keys, LocalStorage};
use std::sync::Arc;
use tokio::sync::watch;

/// Observable store for the current session.
#[derive(Clone)]
pub struct SessionStore {
    storage: LocalStorage,
    notifier: Arc<watch::Sender<Option<Session>>>,
}

impl SessionStore {
    pub fn new(storage: LocalStorage) -> Self {
        let current = read_session(&storage);
        let (notifier, _) = watch::channel(current);
        Self {
            storage,
            notifier: Arc::new(notifier),
        }
    }

    /// Current session, or `None` when logged out.
    ///
    /// A malformed stored value is treated as logged out.
    pub fn get(&self) -> Option<Session> {
        read_session(&self.storage)
    }

    pub fn is_present(&self) -> bool {
        self.get().is_some()
    }

    /// Persist `session` and notify subscribers.
    pub fn set(&self, session: Session) -> Result<()> {
        self.storage.set_json(keys::SESSION, &session)?;
        tracing::info!(user_id = session.id, username = %session.username, "Session started");
        self.notifier.send_replace(Some(session));
        Ok(())
    }

    /// Remove the stored session and notify subscribers.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(keys::SESSION)?;
        tracing::info!("Session cleared");
        self.notifier.send_replace(None);
        Ok(())
    }

    /// Subscribe to session changes. Dropping the subscription unsubscribes.
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            receiver: self.notifier.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.notifier.receiver_count()
    }
}

fn read_session(storage: &LocalStorage) -> Option<Session> {
    match storage.get_json::<Session>(keys::SESSION) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "Stored session is malformed, treating as logged out");
            None
        }
    }
}

/// Handle receiving session change notifications.
pub struct SessionSubscription {
    receiver: watch::Receiver<Option<Session>>,
}

impl SessionSubscription {
    /// Wait for the next session change and return the new value.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Option<Session>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Latest broadcast value, without waiting.
    pub fn current(&self) -> Option<Session> {
        self.receiver.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn alice() -> Session {
        Session {
            id: 1,
            username: "alice".to_string(),
            email: None,
        }
    }

    #[test]
    fn test_set_get_clear() {
        let store = SessionStore::new(LocalStorage::in_memory());
        assert!(store.get().is_none());

        store.set(alice()).unwrap();
        assert_eq!(store.get(), Some(alice()));

        store.clear().unwrap();
        assert!(!store.is_present());
    }

    #[test]
    fn test_failed_persist_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let state_dir = dir.path().join("state");
        let store = SessionStore::new(LocalStorage::open(state_dir.join("storage.json")).unwrap());
        let sub = store.subscribe();

        std::fs::remove_dir_all(&state_dir).unwrap();

        assert!(store.set(alice()).is_err());
        assert!(store.get().is_none());
        assert!(sub.current().is_none());
    }

    #[test]
    fn test_malformed_value_is_logged_out() {
        let storage = LocalStorage::in_memory();
        storage.set(keys::SESSION, "{\"username\":".to_string()).unwrap();

        let store = SessionStore::new(storage);
        assert!(store.get().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = SessionStore::new(LocalStorage::in_memory());
        let mut sub = store.subscribe();

        store.set(alice()).unwrap();
        let seen = tokio::time::timeout(Duration::from_secs(1), sub.changed())
            .await
            .unwrap();
        assert_eq!(seen, Some(Some(alice())));

        store.clear().unwrap();
        let seen = tokio::time::timeout(Duration::from_secs(1), sub.changed())
            .await
            .unwrap();
        assert_eq!(seen, Some(None));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let store = SessionStore::new(LocalStorage::in_memory());
        let sub = store.subscribe();
        assert_eq!(store.subscriber_count(), 1);
        drop(sub);
        assert_eq!(store.subscriber_count(), 0);
    }
}
