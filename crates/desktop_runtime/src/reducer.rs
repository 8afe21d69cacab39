//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use desktop_app_contract::{AppCatalog, WindowPosition, WindowSize};
use serde_json::Value;
use thiserror::Error;

use crate::config::DesktopConfig;
use crate::model::{
    DesktopState, OpenWindowRequest, SessionEntry, WindowId, WindowInstance, WindowLoading,
};
use crate::window_manager::{cascade_position, next_raise_z_index, next_window_id, raise_window};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a new window for a catalog app.
    OpenWindow(OpenWindowRequest),
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Raise a window to the front of the stack.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize an active window, or restore a minimized one to the front.
    ToggleMinimize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Move a window.
    MoveWindow {
        /// Window to move.
        window_id: WindowId,
        /// New top-left corner.
        position: WindowPosition,
    },
    /// Resize a window; resizing from the top or left edge also moves it.
    ResizeWindow {
        /// Window to resize.
        window_id: WindowId,
        /// New size.
        size: WindowSize,
        /// New top-left corner.
        position: WindowPosition,
    },
    /// Replace the opaque props payload of a window.
    SetProps {
        /// Window whose props are replaced.
        window_id: WindowId,
        /// New props payload.
        props: Value,
    },
    /// Update the transient loading indicator of a window.
    SetLoading {
        /// Window whose loading state changes.
        window_id: WindowId,
        /// New loading state.
        loading: WindowLoading,
    },
    /// Close every window.
    ClearSession,
    /// Replace the registry with windows rebuilt from persisted entries.
    HydrateSession {
        /// Entries read from the session record.
        entries: Vec<SessionEntry>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the effect executor to run.
pub enum RuntimeEffect {
    /// Write the durable subset of every window under the session key.
    PersistSession,
    /// Remove the session record entirely (the registry is empty).
    ClearPersistedSession,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions that reference something that does not exist.
pub enum ReducerError {
    /// The app id does not resolve in the catalog.
    #[error("unknown app `{0}`")]
    UnknownApp(String),
    /// The target window id was not found in the current state.
    #[error("window {0} not found")]
    WindowNotFound(WindowId),
}

/// Read-only collaborators the reducer consults.
#[derive(Clone, Copy)]
pub struct ReducerContext<'a> {
    pub catalog: &'a dyn AppCatalog,
    pub config: &'a DesktopConfig,
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting side effects.
///
/// This is the only place window instances are created, mutated, or destroyed. A rejected action
/// leaves `state` untouched.
///
/// # Errors
///
/// Returns [`ReducerError::UnknownApp`] when an open references an app missing from the catalog,
/// and [`ReducerError::WindowNotFound`] when an action references a window that is not present.
pub fn reduce_desktop(
    state: &mut DesktopState,
    ctx: ReducerContext<'_>,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let floor = ctx.config.z_index_floor;
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            let descriptor = ctx
                .catalog
                .lookup(&req.app_id)
                .ok_or_else(|| ReducerError::UnknownApp(req.app_id.clone()))?;
            let position = cascade_position(
                descriptor.default_position,
                state.windows.len(),
                ctx.config.cascade_step,
                ctx.config.cascade_wrap,
            );
            let window_id = next_window_id(state);
            let z_index = next_raise_z_index(state, floor);
            let component = descriptor.instantiate(&req.props);
            state.windows.push(WindowInstance {
                id: window_id,
                app_id: descriptor.id.clone(),
                title: descriptor.display_name.clone(),
                z_index,
                is_minimized: false,
                position,
                size: descriptor.default_size.clone(),
                props: req.props,
                loading: WindowLoading::default(),
                component,
            });
            effects.push(RuntimeEffect::PersistSession);
        }
        DesktopAction::CloseWindow { window_id } => {
            let before_len = state.windows.len();
            state.windows.retain(|w| w.id != window_id);
            if state.windows.len() == before_len {
                return Err(ReducerError::WindowNotFound(window_id));
            }
            effects.push(persist_or_clear(state));
        }
        DesktopAction::FocusWindow { window_id } => {
            find_window_mut(state, window_id)?;
            if raise_window(state, window_id, floor) {
                effects.push(RuntimeEffect::PersistSession);
            }
        }
        DesktopAction::ToggleMinimize { window_id } => {
            let minimized = find_window_mut(state, window_id)?.is_minimized;
            if minimized {
                let z_index = next_raise_z_index(state, floor);
                let window = find_window_mut(state, window_id)?;
                window.is_minimized = false;
                window.z_index = z_index;
            } else {
                find_window_mut(state, window_id)?.is_minimized = true;
            }
            effects.push(RuntimeEffect::PersistSession);
        }
        DesktopAction::MoveWindow {
            window_id,
            position,
        } => {
            find_window_mut(state, window_id)?.position = position;
            effects.push(RuntimeEffect::PersistSession);
        }
        DesktopAction::ResizeWindow {
            window_id,
            size,
            position,
        } => {
            let window = find_window_mut(state, window_id)?;
            window.size = size;
            window.position = position;
            effects.push(RuntimeEffect::PersistSession);
        }
        DesktopAction::SetProps { window_id, props } => {
            let window = find_window_mut(state, window_id)?;
            if let Some(descriptor) = ctx.catalog.lookup(window.app_id.as_str()) {
                window.component = descriptor.instantiate(&props);
            }
            window.props = props;
            effects.push(RuntimeEffect::PersistSession);
        }
        DesktopAction::SetLoading { window_id, loading } => {
            find_window_mut(state, window_id)?.loading = WindowLoading {
                is_loading: loading.is_loading,
                progress: loading.progress.min(100),
            };
        }
        DesktopAction::ClearSession => {
            state.windows.clear();
            effects.push(RuntimeEffect::ClearPersistedSession);
        }
        DesktopAction::HydrateSession { entries } => {
            let mut restored: Vec<WindowInstance> = Vec::with_capacity(entries.len());
            for entry in entries {
                let Some(descriptor) = ctx.catalog.lookup(&entry.app_id) else {
                    log::warn!(
                        "skipping stored window {} for unknown app `{}`",
                        entry.id,
                        entry.app_id
                    );
                    continue;
                };
                if restored.iter().any(|w| w.id == entry.id) {
                    log::warn!("skipping duplicate stored window {}", entry.id);
                    continue;
                }
                restored.push(WindowInstance {
                    id: entry.id,
                    app_id: descriptor.id.clone(),
                    title: descriptor.display_name.clone(),
                    z_index: entry.z_index,
                    is_minimized: entry.is_minimized,
                    position: WindowPosition {
                        x: entry.x,
                        y: entry.y,
                    },
                    size: WindowSize {
                        width: entry.width,
                        height: entry.height,
                    },
                    component: descriptor.instantiate(&entry.props),
                    props: entry.props,
                    loading: WindowLoading::default(),
                });
            }

            let max_id = restored.iter().map(|w| w.id.0).max().unwrap_or(0);
            let max_z = restored.iter().map(|w| w.z_index).max().unwrap_or(0);
            state.windows = restored;
            state.next_window_id = state.next_window_id.max(max_id.saturating_add(1));
            state.top_z_index = state.top_z_index.max(max_z);
        }
    }

    Ok(effects)
}

fn persist_or_clear(state: &DesktopState) -> RuntimeEffect {
    if state.windows.is_empty() {
        RuntimeEffect::ClearPersistedSession
    } else {
        RuntimeEffect::PersistSession
    }
}

fn find_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut WindowInstance, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound(window_id))
}
