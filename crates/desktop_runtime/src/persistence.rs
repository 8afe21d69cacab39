//! Session record encoding plus load/persist/clear helpers over a [`SessionStore`].
//!
//! The record is a JSON array of [`SessionEntry`] values under one storage key. An empty desktop is
//! represented by the absence of the key, never by an empty array.

use platform_host::SessionStore;

use crate::error::SessionError;
use crate::model::{DesktopState, SessionEntry};

/// What boot found under the session key.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredSession {
    /// No record is stored.
    Missing,
    /// A record decoded successfully.
    Restorable(Vec<SessionEntry>),
    /// A record exists but could not be decoded.
    Corrupt(SessionError),
}

/// Serializes entries into the on-disk record format.
pub fn encode_session(entries: &[SessionEntry]) -> Result<String, SessionError> {
    serde_json::to_string(entries).map_err(|err| SessionError::Storage(err.to_string()))
}

/// Parses a stored record.
///
/// # Errors
///
/// Returns [`SessionError::CorruptSession`] when `raw` is not an array of session entries.
pub fn decode_session(raw: &str) -> Result<Vec<SessionEntry>, SessionError> {
    serde_json::from_str(raw).map_err(|err| SessionError::CorruptSession(err.to_string()))
}

/// Reads the session record once.
///
/// A storage read failure is treated like a missing record so the desktop still boots.
pub async fn load_stored_session(store: &dyn SessionStore, key: &str) -> StoredSession {
    match store.load_record(key).await {
        Ok(None) => StoredSession::Missing,
        Ok(Some(raw)) => match decode_session(&raw) {
            Ok(entries) => StoredSession::Restorable(entries),
            Err(err) => StoredSession::Corrupt(err),
        },
        Err(err) => {
            log::warn!("session record load failed: {err}");
            StoredSession::Missing
        }
    }
}

/// Writes the durable subset of every window, or clears the record when there are none.
///
/// # Errors
///
/// Returns [`SessionError::Storage`] when encoding or the store write fails.
pub async fn persist_session(
    store: &dyn SessionStore,
    key: &str,
    state: &DesktopState,
) -> Result<(), SessionError> {
    let entries = state.snapshot();
    if entries.is_empty() {
        return clear_persisted_session(store, key).await;
    }
    let raw = encode_session(&entries)?;
    store
        .save_record(key, &raw)
        .await
        .map_err(SessionError::Storage)
}

/// Removes the session record.
///
/// # Errors
///
/// Returns [`SessionError::Storage`] when the store delete fails.
pub async fn clear_persisted_session(
    store: &dyn SessionStore,
    key: &str,
) -> Result<(), SessionError> {
    store.delete_record(key).await.map_err(SessionError::Storage)
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{MemorySessionStore, SessionStoreFuture};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::apps::BuiltinCatalog;
    use crate::config::DesktopConfig;
    use crate::model::{OpenWindowRequest, WindowId};
    use crate::reducer::{reduce_desktop, DesktopAction, ReducerContext};

    const KEY: &str = "desktop.session.v1";

    struct FailingStore;

    impl SessionStore for FailingStore {
        fn load_record<'a>(
            &'a self,
            _key: &'a str,
        ) -> SessionStoreFuture<'a, Result<Option<String>, String>> {
            Box::pin(async { Err("disk on fire".to_string()) })
        }

        fn save_record<'a>(
            &'a self,
            _key: &'a str,
            _raw_json: &'a str,
        ) -> SessionStoreFuture<'a, Result<(), String>> {
            Box::pin(async { Err("read-only".to_string()) })
        }

        fn delete_record<'a>(&'a self, _key: &'a str) -> SessionStoreFuture<'a, Result<(), String>> {
            Box::pin(async { Err("read-only".to_string()) })
        }
    }

    fn state_with(apps: &[&str]) -> DesktopState {
        let catalog = BuiltinCatalog::new();
        let config = DesktopConfig::default();
        let mut state = DesktopState::default();
        for app in apps {
            reduce_desktop(
                &mut state,
                ReducerContext {
                    catalog: &catalog,
                    config: &config,
                },
                DesktopAction::OpenWindow(
                    OpenWindowRequest::new(*app).with_props(json!({"seed": app})),
                ),
            )
            .expect("open");
        }
        state
    }

    #[test]
    fn scenario_record_decodes_to_one_entry() {
        let raw = r#"[{"id":1,"appId":"cloud","zIndex":10,"isMinimized":false,"props":{},"x":10,"y":10,"width":800,"height":600}]"#;
        let entries = decode_session(raw).expect("decode");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, WindowId(1));
        assert_eq!(entries[0].app_id, "cloud");
    }

    #[test]
    fn decode_rejects_non_array_records() {
        for raw in ["{", "{}", "\"cloud\"", "[{\"id\":\"one\"}]"] {
            assert!(matches!(
                decode_session(raw),
                Err(SessionError::CorruptSession(_))
            ));
        }
    }

    #[test]
    fn persist_writes_full_collection_and_load_reads_it_back() {
        let store = MemorySessionStore::default();
        let state = state_with(&["editor", "cloud"]);

        block_on(persist_session(&store, KEY, &state)).expect("persist");
        let StoredSession::Restorable(entries) = block_on(load_stored_session(&store, KEY)) else {
            panic!("expected restorable session");
        };
        assert_eq!(entries, state.snapshot());
        assert_eq!(entries[1].props, json!({"seed": "cloud"}));
    }

    #[test]
    fn persisting_an_empty_desktop_removes_the_record() {
        let store = MemorySessionStore::default();
        store.insert_raw(KEY, "[]");

        block_on(persist_session(&store, KEY, &DesktopState::default())).expect("persist");
        assert!(!store.contains(KEY));
        assert_eq!(block_on(load_stored_session(&store, KEY)), StoredSession::Missing);
    }

    #[test]
    fn corrupt_records_are_reported() {
        let store = MemorySessionStore::default();
        store.insert_raw(KEY, "not json at all");
        assert!(matches!(
            block_on(load_stored_session(&store, KEY)),
            StoredSession::Corrupt(SessionError::CorruptSession(_))
        ));
    }

    #[test]
    fn storage_failures_are_recoverable() {
        let state = state_with(&["editor"]);
        assert_eq!(
            block_on(load_stored_session(&FailingStore, KEY)),
            StoredSession::Missing
        );
        assert_eq!(
            block_on(persist_session(&FailingStore, KEY, &state)),
            Err(SessionError::Storage("read-only".to_string()))
        );
    }
}
