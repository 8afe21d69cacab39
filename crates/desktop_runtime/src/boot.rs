//! Boot-time session hydration.

use crate::{
    persistence::{self, StoredSession},
    reducer::DesktopAction,
    runtime_context::DesktopRuntime,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where the booted window set came from.
pub enum BootSource {
    /// Windows were rebuilt from the stored record.
    Restored,
    /// No record was stored.
    NoStoredSession,
    /// The record was unreadable and has been removed.
    CorruptSession,
    /// The record decoded but none of its entries could be rebuilt.
    NothingRestorable,
    /// Boot had already run.
    AlreadyBooted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Summary of one boot pass.
pub struct BootReport {
    pub source: BootSource,
    /// Windows rebuilt from the record.
    pub restored: usize,
    /// Record entries dropped for unknown apps or duplicate ids.
    pub skipped: usize,
    /// Default windows opened because nothing was restored.
    pub opened_defaults: usize,
}

impl BootReport {
    pub(crate) fn already_booted(window_count: usize) -> Self {
        Self {
            source: BootSource::AlreadyBooted,
            restored: window_count,
            skipped: 0,
            opened_defaults: 0,
        }
    }

    /// Whether the registry now differs from what the record held.
    pub fn changed_registry(&self) -> bool {
        self.opened_defaults > 0 || self.skipped > 0
    }
}

/// Loads the record once and rebuilds windows from it, or opens the default launch set.
pub(crate) async fn hydrate(runtime: &DesktopRuntime) -> BootReport {
    let store = runtime.host().session_store();
    let key = runtime.config().storage_key.clone();

    let (source, restored, skipped) =
        match persistence::load_stored_session(store.as_ref(), &key).await {
            StoredSession::Missing => (BootSource::NoStoredSession, 0, 0),
            StoredSession::Corrupt(err) => {
                log::warn!("discarding session record `{key}`: {err}");
                if let Err(err) = persistence::clear_persisted_session(store.as_ref(), &key).await
                {
                    log::warn!("could not remove corrupt session record: {err}");
                }
                (BootSource::CorruptSession, 0, 0)
            }
            StoredSession::Restorable(entries) => {
                let total = entries.len();
                if let Err(err) = runtime.apply(DesktopAction::HydrateSession { entries }) {
                    log::warn!("session hydration rejected: {err}");
                }
                let restored = runtime.window_count();
                let source = if restored > 0 {
                    BootSource::Restored
                } else {
                    BootSource::NothingRestorable
                };
                (source, restored, total.saturating_sub(restored))
            }
        };

    let mut opened_defaults = 0;
    if restored == 0 {
        for app_id in &runtime.config().default_launch_apps {
            if runtime.open(app_id, None).await.is_some() {
                opened_defaults += 1;
            }
        }
    }

    BootReport {
        source,
        restored,
        skipped,
        opened_defaults,
    }
}
