//! Desktop session record storage contracts and in-memory adapters.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

/// Default key under which the desktop session record is stored.
pub const DESKTOP_SESSION_KEY: &str = "desktop.session.v1";

/// Object-safe boxed future used by [`SessionStore`] async methods.
pub type SessionStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for durable session records (JSON stored as text per key).
pub trait SessionStore {
    /// Loads the raw JSON record stored under `key`.
    fn load_record<'a>(
        &'a self,
        key: &'a str,
    ) -> SessionStoreFuture<'a, Result<Option<String>, String>>;

    /// Replaces the record stored under `key`.
    fn save_record<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> SessionStoreFuture<'a, Result<(), String>>;

    /// Deletes the record stored under `key`. Deleting an absent key succeeds.
    fn delete_record<'a>(&'a self, key: &'a str) -> SessionStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op session store for hosts without durable storage.
pub struct NoopSessionStore;

impl SessionStore for NoopSessionStore {
    fn load_record<'a>(
        &'a self,
        _key: &'a str,
    ) -> SessionStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_record<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> SessionStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_record<'a>(&'a self, _key: &'a str) -> SessionStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory session store keyed by string. Clones share the same backing map.
pub struct MemorySessionStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemorySessionStore {
    /// Returns the raw record under `key` without going through the async contract.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    /// Seeds a raw record, replacing any previous value.
    pub fn insert_raw(&self, key: impl Into<String>, raw_json: impl Into<String>) {
        self.inner.borrow_mut().insert(key.into(), raw_json.into());
    }

    /// Returns `true` when a record exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.borrow().contains_key(key)
    }
}

impl SessionStore for MemorySessionStore {
    fn load_record<'a>(
        &'a self,
        key: &'a str,
    ) -> SessionStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.raw(key)) })
    }

    fn save_record<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> SessionStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.insert_raw(key, raw_json);
            Ok(())
        })
    }

    fn delete_record<'a>(&'a self, key: &'a str) -> SessionStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}
