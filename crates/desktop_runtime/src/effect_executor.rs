//! Runs reducer-emitted runtime effects in order.

use crate::{persistence, reducer::RuntimeEffect, runtime_context::DesktopRuntime};

/// Executes `effects` one after another against the latest runtime state.
///
/// Until boot completes, session writes are dropped so a half-restored desktop never overwrites
/// the stored record.
pub(crate) async fn run_effects(runtime: &DesktopRuntime, effects: Vec<RuntimeEffect>) {
    for effect in effects {
        run_effect(runtime, effect).await;
    }
}

async fn run_effect(runtime: &DesktopRuntime, effect: RuntimeEffect) {
    if !runtime.is_booted() {
        log::debug!("boot in progress; skipping {effect:?}");
        return;
    }

    let store = runtime.host().session_store();
    let key = runtime.config().storage_key.as_str();
    let result = match effect {
        RuntimeEffect::PersistSession => {
            let state = runtime.state();
            persistence::persist_session(store.as_ref(), key, &state).await
        }
        RuntimeEffect::ClearPersistedSession => {
            persistence::clear_persisted_session(store.as_ref(), key).await
        }
    };
    if let Err(err) = result {
        log::warn!("{effect:?} failed: {err}");
    }
}
