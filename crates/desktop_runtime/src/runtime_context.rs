//! Long-lived desktop runtime: owns the reducer state and runs effects against the host.
//!
//! Every public operation reduces synchronously, releases the state borrow, and only then awaits
//! effect execution. Failures are logged and never returned to callers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use desktop_app_contract::{AppCatalog, WindowPosition, WindowSize};
use futures::channel::oneshot;
use serde_json::Value;

use crate::{
    apps::BuiltinCatalog,
    boot::{self, BootReport},
    config::DesktopConfig,
    effect_executor,
    host::DesktopHostContext,
    model::{DesktopState, OpenWindowRequest, WindowId, WindowInstance, WindowLoading},
    reducer::{reduce_desktop, DesktopAction, ReducerContext, ReducerError, RuntimeEffect},
};

#[derive(Clone)]
/// Shared handle to the desktop window registry and its host services.
pub struct DesktopRuntime {
    state: Rc<RefCell<DesktopState>>,
    host: DesktopHostContext,
    catalog: Rc<dyn AppCatalog>,
    config: Rc<DesktopConfig>,
    booted: Rc<Cell<bool>>,
    booting: Rc<Cell<bool>>,
    boot_waiters: Rc<RefCell<Vec<oneshot::Sender<()>>>>,
}

impl DesktopRuntime {
    /// Creates an unbooted runtime over `catalog`.
    pub fn new(
        host: DesktopHostContext,
        catalog: impl AppCatalog + 'static,
        config: DesktopConfig,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(DesktopState::default())),
            host,
            catalog: Rc::new(catalog),
            config: Rc::new(config),
            booted: Rc::new(Cell::new(false)),
            booting: Rc::new(Cell::new(false)),
            boot_waiters: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Creates an unbooted runtime over the built-in app catalog.
    pub fn with_builtin_apps(host: DesktopHostContext, config: DesktopConfig) -> Self {
        Self::new(host, BuiltinCatalog::new(), config)
    }

    /// Host services the runtime runs effects against.
    pub fn host(&self) -> &DesktopHostContext {
        &self.host
    }

    /// Active configuration.
    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    /// Catalog used to resolve app ids.
    pub fn catalog(&self) -> &dyn AppCatalog {
        self.catalog.as_ref()
    }

    /// Whether boot hydration has finished and session writes are enabled.
    pub fn is_booted(&self) -> bool {
        self.booted.get()
    }

    /// Clones the current registry state.
    pub fn state(&self) -> DesktopState {
        self.state.borrow().clone()
    }

    /// Windows in creation order.
    pub fn windows(&self) -> Vec<WindowInstance> {
        self.state.borrow().windows.clone()
    }

    /// Clones the window with `window_id`, if open.
    pub fn window(&self, window_id: WindowId) -> Option<WindowInstance> {
        self.state.borrow().window(window_id).cloned()
    }

    /// Number of open windows, minimized ones included.
    pub fn window_count(&self) -> usize {
        self.state.borrow().windows.len()
    }

    /// The non-minimized window with the highest stacking value.
    pub fn frontmost_window_id(&self) -> Option<WindowId> {
        self.state.borrow().frontmost_window_id()
    }

    /// Windows from back to front.
    pub fn windows_in_stack_order(&self) -> Vec<WindowInstance> {
        let state = self.state.borrow();
        let ordered = state
            .stack_order()
            .into_iter()
            .filter_map(|window_id| state.window(window_id).cloned())
            .collect();
        ordered
    }

    /// Restores the stored session, falling back to the default launch set.
    ///
    /// Session writes stay disabled until this completes. Calling it again is a no-op; a call made
    /// while another boot is still running waits for that boot to finish.
    pub async fn boot(&self) -> BootReport {
        if self.is_booted() {
            log::debug!("desktop runtime already booted");
            return BootReport::already_booted(self.window_count());
        }
        if self.booting.get() {
            let (done, finished) = oneshot::channel();
            self.boot_waiters.borrow_mut().push(done);
            let _ = finished.await;
            return BootReport::already_booted(self.window_count());
        }

        self.booting.set(true);
        let report = boot::hydrate(self).await;
        self.booted.set(true);
        self.booting.set(false);
        let waiters = std::mem::take(&mut *self.boot_waiters.borrow_mut());
        for waiter in waiters {
            let _ = waiter.send(());
        }
        if report.changed_registry() {
            // Windows opened or dropped during boot are not in the record yet.
            effect_executor::run_effects(self, vec![RuntimeEffect::PersistSession]).await;
        }
        log::info!(
            "desktop booted from {:?}: {} restored, {} skipped, {} defaults",
            report.source,
            report.restored,
            report.skipped,
            report.opened_defaults
        );
        report
    }

    /// Opens a window for `app_id` and returns its id, or `None` when the app is unknown.
    pub async fn open(&self, app_id: &str, props: Option<Value>) -> Option<WindowId> {
        let mut request = OpenWindowRequest::new(app_id);
        if let Some(props) = props {
            request = request.with_props(props);
        }
        let effects = match self.apply(DesktopAction::OpenWindow(request)) {
            Ok(effects) => effects,
            Err(err) => {
                log::warn!("open rejected: {err}");
                return None;
            }
        };
        let window_id = self.state.borrow().windows.last().map(|window| window.id);
        effect_executor::run_effects(self, effects).await;
        window_id
    }

    /// Closes a window. Unknown ids are ignored.
    pub async fn close(&self, window_id: WindowId) {
        self.dispatch(DesktopAction::CloseWindow { window_id }).await;
    }

    /// Raises a window to the front.
    pub async fn focus(&self, window_id: WindowId) {
        self.dispatch(DesktopAction::FocusWindow { window_id }).await;
    }

    /// Minimizes an active window or restores a minimized one to the front.
    pub async fn toggle_minimize(&self, window_id: WindowId) {
        self.dispatch(DesktopAction::ToggleMinimize { window_id })
            .await;
    }

    /// Moves a window's top-left corner.
    pub async fn move_window(&self, window_id: WindowId, position: WindowPosition) {
        self.dispatch(DesktopAction::MoveWindow {
            window_id,
            position,
        })
        .await;
    }

    /// Resizes a window; edges on the top or left also move its origin.
    pub async fn resize_window(
        &self,
        window_id: WindowId,
        size: WindowSize,
        position: WindowPosition,
    ) {
        self.dispatch(DesktopAction::ResizeWindow {
            window_id,
            size,
            position,
        })
        .await;
    }

    /// Replaces the opaque props payload of a window.
    pub async fn set_props(&self, window_id: WindowId, props: Value) {
        self.dispatch(DesktopAction::SetProps { window_id, props })
            .await;
    }

    /// Updates the transient loading indicator; never persisted.
    pub async fn set_loading(&self, window_id: WindowId, loading: WindowLoading) {
        self.dispatch(DesktopAction::SetLoading { window_id, loading })
            .await;
    }

    /// Closes every window and removes the stored session.
    pub async fn clear_session(&self) {
        self.dispatch(DesktopAction::ClearSession).await;
    }

    /// Reduces `action` and runs its effects. Returns whether the action was accepted.
    pub async fn dispatch(&self, action: DesktopAction) -> bool {
        match self.apply(action) {
            Ok(effects) => {
                effect_executor::run_effects(self, effects).await;
                true
            }
            Err(err) => {
                log::warn!("desktop action rejected: {err}");
                false
            }
        }
    }

    pub(crate) fn apply(&self, action: DesktopAction) -> Result<Vec<RuntimeEffect>, ReducerError> {
        let mut state = self.state.borrow_mut();
        reduce_desktop(
            &mut state,
            ReducerContext {
                catalog: self.catalog.as_ref(),
                config: &self.config,
            },
            action,
        )
    }
}
