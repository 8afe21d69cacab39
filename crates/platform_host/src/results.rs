//! One-shot retrieval of results produced by external generation flows.
//!
//! A result is parked under an opaque key by the producing flow and picked up exactly once by the
//! desktop launcher. Callers must not rely on a second read of the same key succeeding.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Object-safe boxed future used by [`ResultStore`].
pub type ResultStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A parked generation result plus the prompt that produced it.
pub struct StoredResult {
    /// Result payload; its shape is owned by the producing flow.
    pub result: Value,
    /// Prompt text used to produce the result, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Host service handing out parked results by key.
pub trait ResultStore {
    /// Takes the result stored under `key`. The record may be deleted by this read.
    fn take_result<'a>(
        &'a self,
        key: &'a str,
    ) -> ResultStoreFuture<'a, Result<Option<StoredResult>, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Result store that never has anything parked.
pub struct NoopResultStore;

impl ResultStore for NoopResultStore {
    fn take_result<'a>(
        &'a self,
        _key: &'a str,
    ) -> ResultStoreFuture<'a, Result<Option<StoredResult>, String>> {
        Box::pin(async { Ok(None) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory result store whose reads remove the record.
pub struct MemoryResultStore {
    inner: Rc<RefCell<HashMap<String, StoredResult>>>,
}

impl MemoryResultStore {
    /// Parks `result` under `key`, replacing any previous record.
    pub fn put(&self, key: impl Into<String>, result: StoredResult) {
        self.inner.borrow_mut().insert(key.into(), result);
    }

    /// Number of records still parked.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns `true` when nothing is parked.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl ResultStore for MemoryResultStore {
    fn take_result<'a>(
        &'a self,
        key: &'a str,
    ) -> ResultStoreFuture<'a, Result<Option<StoredResult>, String>> {
        Box::pin(async move { Ok(self.inner.borrow_mut().remove(key)) })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn memory_result_store_hands_out_each_result_once() {
        let store = MemoryResultStore::default();
        let parked = StoredResult {
            result: json!({"title": "Launch plan"}),
            prompt: Some("plan a launch".to_string()),
        };
        store.put("res-1", parked.clone());

        assert_eq!(block_on(store.take_result("res-1")).expect("take"), Some(parked));
        assert_eq!(block_on(store.take_result("res-1")).expect("take again"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn stored_result_prompt_is_optional_on_the_wire() {
        let decoded: StoredResult =
            serde_json::from_value(json!({"result": [1, 2]})).expect("decode");
        assert_eq!(decoded.prompt, None);

        let encoded = serde_json::to_value(&decoded).expect("encode");
        assert_eq!(encoded, json!({"result": [1, 2]}));
    }
}
