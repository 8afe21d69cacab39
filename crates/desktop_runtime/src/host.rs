//! Host service bundle used by the runtime to reach storage, results, notifications, and timers.
//!
//! Every service is injected, so tests and alternative hosts can swap backends without touching
//! reducer or launcher code.

use std::rc::Rc;

use platform_host::{
    LaunchTimer, LogNotificationService, NoopResultStore, NoopSessionStore, NotificationService,
    ResultStore, SessionStore, TokioLaunchTimer,
};

#[derive(Clone)]
/// Host service bundle for desktop runtime side effects.
pub struct DesktopHostContext {
    session_store: Rc<dyn SessionStore>,
    results: Rc<dyn ResultStore>,
    notifications: Rc<dyn NotificationService>,
    launch_timer: Rc<dyn LaunchTimer>,
}

impl Default for DesktopHostContext {
    fn default() -> Self {
        Self {
            session_store: Rc::new(NoopSessionStore),
            results: Rc::new(NoopResultStore),
            notifications: Rc::new(LogNotificationService),
            launch_timer: Rc::new(TokioLaunchTimer),
        }
    }
}

impl DesktopHostContext {
    /// Replaces the session storage backend.
    pub fn with_session_store(mut self, store: impl SessionStore + 'static) -> Self {
        self.session_store = Rc::new(store);
        self
    }

    /// Replaces the one-shot result store.
    pub fn with_result_store(mut self, results: impl ResultStore + 'static) -> Self {
        self.results = Rc::new(results);
        self
    }

    /// Replaces the notification channel.
    pub fn with_notifications(mut self, notifications: impl NotificationService + 'static) -> Self {
        self.notifications = Rc::new(notifications);
        self
    }

    /// Replaces the timer used to pace compound launches.
    pub fn with_launch_timer(mut self, timer: impl LaunchTimer + 'static) -> Self {
        self.launch_timer = Rc::new(timer);
        self
    }

    /// Returns the configured session storage service.
    pub fn session_store(&self) -> Rc<dyn SessionStore> {
        self.session_store.clone()
    }

    /// Returns the configured result store.
    pub fn result_store(&self) -> Rc<dyn ResultStore> {
        self.results.clone()
    }

    /// Returns the configured launch timer.
    pub fn launch_timer(&self) -> Rc<dyn LaunchTimer> {
        self.launch_timer.clone()
    }

    /// Sends a notification; delivery failures are logged and otherwise ignored.
    pub async fn notify(&self, title: &str, body: &str) {
        if let Err(err) = self.notifications.notify(title, body).await {
            log::warn!("notification `{title}` failed: {err}");
        }
    }
}
