//! Typed host-service contracts and adapters used by the desktop session runtime.
//!
//! This crate is the boundary between the window manager and everything it does not own:
//! durable session storage, one-shot result retrieval, user notifications, and launch pacing.
//! Each service is an object-safe trait returning boxed local futures, with in-memory adapters for
//! tests and native adapters for real hosts.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod notifications;
pub mod results;
pub mod storage;
pub mod timer;

pub use notifications::service::{
    LogNotificationService, MemoryNotificationService, NoopNotificationService,
    NotificationFuture, NotificationService, RecordedNotification,
};
pub use results::{MemoryResultStore, NoopResultStore, ResultStore, ResultStoreFuture, StoredResult};
pub use storage::file_session::FileSessionStore;
pub use storage::session_record::{
    MemorySessionStore, NoopSessionStore, SessionStore, SessionStoreFuture, DESKTOP_SESSION_KEY,
};
pub use timer::{ImmediateLaunchTimer, LaunchTimer, LaunchTimerFuture, TokioLaunchTimer};
