//! Notification service contracts and adapters.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`NotificationService`].
pub type NotificationFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for user-visible, non-blocking notifications.
pub trait NotificationService {
    /// Dispatches a notification message.
    fn notify<'a>(
        &'a self,
        title: &'a str,
        body: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op notification service for hosts without a notification surface.
pub struct NoopNotificationService;

impl NotificationService for NoopNotificationService {
    fn notify<'a>(
        &'a self,
        _title: &'a str,
        _body: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Notification service that forwards every message to the `log` facade.
pub struct LogNotificationService;

impl NotificationService for LogNotificationService {
    fn notify<'a>(
        &'a self,
        title: &'a str,
        body: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move {
            log::info!("notification: {title}: {body}");
            Ok(())
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A notification captured by [`MemoryNotificationService`].
pub struct RecordedNotification {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
}

#[derive(Debug, Clone, Default)]
/// Notification service that records messages in memory. Clones share the same log.
pub struct MemoryNotificationService {
    sent: Rc<RefCell<Vec<RecordedNotification>>>,
}

impl MemoryNotificationService {
    /// Returns every notification dispatched so far, oldest first.
    pub fn sent(&self) -> Vec<RecordedNotification> {
        self.sent.borrow().clone()
    }
}

impl NotificationService for MemoryNotificationService {
    fn notify<'a>(
        &'a self,
        title: &'a str,
        body: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.sent.borrow_mut().push(RecordedNotification {
                title: title.to_string(),
                body: body.to_string(),
            });
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn memory_notifications_record_in_order() {
        let service = MemoryNotificationService::default();
        let shared = service.clone();
        block_on(service.notify("One", "first")).expect("notify");
        block_on(service.notify("Two", "second")).expect("notify");

        let sent = shared.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].title, "One");
        assert_eq!(sent[1].body, "second");
    }
}
