//! Window registry state and the durable session record shape.

use desktop_app_contract::{ApplicationId, Extent, MountedApp, WindowPosition, WindowSize};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity of an open window, unique for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Transient loading indicator shown in a window's chrome. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowLoading {
    pub is_loading: bool,
    /// Percentage in `0..=100`.
    pub progress: u8,
}

impl WindowLoading {
    /// Loading state at `progress`, capped at 100.
    pub fn started(progress: u8) -> Self {
        Self {
            is_loading: true,
            progress: progress.min(100),
        }
    }
}

/// Stored lifecycle state of an open window. Being frontmost is derived, not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowLifecycle {
    Active,
    Minimized,
}

/// One open application surface.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowInstance {
    pub id: WindowId,
    pub app_id: ApplicationId,
    pub title: String,
    pub z_index: u32,
    pub is_minimized: bool,
    pub position: WindowPosition,
    pub size: WindowSize,
    pub props: Value,
    pub loading: WindowLoading,
    pub component: MountedApp,
}

impl WindowInstance {
    /// Whether the window is shown or parked in the taskbar.
    pub fn lifecycle(&self) -> WindowLifecycle {
        if self.is_minimized {
            WindowLifecycle::Minimized
        } else {
            WindowLifecycle::Active
        }
    }

    /// Durable subset written to the session record.
    pub fn session_entry(&self) -> SessionEntry {
        SessionEntry {
            id: self.id,
            app_id: self.app_id.as_str().to_string(),
            z_index: self.z_index,
            is_minimized: self.is_minimized,
            props: self.props.clone(),
            x: self.position.x,
            y: self.position.y,
            width: self.size.width.clone(),
            height: self.size.height.clone(),
        }
    }
}

/// Durable subset of a [`WindowInstance`], in the on-disk session record shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEntry {
    pub id: WindowId,
    /// Kept as a raw string so entries for apps removed from the catalog still decode.
    pub app_id: String,
    pub z_index: u32,
    pub is_minimized: bool,
    #[serde(default)]
    pub props: Value,
    pub x: i32,
    pub y: i32,
    pub width: Extent,
    pub height: Extent,
}

/// Window registry owned by the reducer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DesktopState {
    pub next_window_id: u64,
    /// Highest z-index handed out so far; raises always go above it.
    pub top_z_index: u32,
    pub windows: Vec<WindowInstance>,
}

impl DesktopState {
    /// Looks up an open window.
    pub fn window(&self, window_id: WindowId) -> Option<&WindowInstance> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    /// The non-minimized window with the highest z-index.
    pub fn frontmost_window_id(&self) -> Option<WindowId> {
        self.windows
            .iter()
            .filter(|w| w.lifecycle() == WindowLifecycle::Active)
            .max_by_key(|w| w.z_index)
            .map(|w| w.id)
    }

    /// Window ids ordered back to front.
    pub fn stack_order(&self) -> Vec<WindowId> {
        let mut ordered = self.windows.iter().collect::<Vec<_>>();
        ordered.sort_by_key(|w| (w.z_index, w.id));
        ordered.into_iter().map(|w| w.id).collect()
    }

    /// Session entries for every window, in creation order.
    pub fn snapshot(&self) -> Vec<SessionEntry> {
        self.windows.iter().map(WindowInstance::session_entry).collect()
    }
}

/// Request to open a catalog app with launch props.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub app_id: String,
    pub props: Value,
}

impl OpenWindowRequest {
    /// Request with null props.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            props: Value::Null,
        }
    }

    /// Replaces the launch props.
    pub fn with_props(mut self, props: Value) -> Self {
        self.props = props;
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn session_entry_uses_camel_case_wire_names() {
        let entry = SessionEntry {
            id: WindowId(1),
            app_id: "cloud".to_string(),
            z_index: 10,
            is_minimized: false,
            props: json!({}),
            x: 10,
            y: 10,
            width: Extent::Pixels(800),
            height: Extent::Css("auto".to_string()),
        };

        let value = serde_json::to_value(&entry).expect("serialize entry");
        assert_eq!(
            value,
            json!({
                "id": 1,
                "appId": "cloud",
                "zIndex": 10,
                "isMinimized": false,
                "props": {},
                "x": 10,
                "y": 10,
                "width": 800,
                "height": "auto"
            })
        );
    }

    #[test]
    fn session_entry_tolerates_missing_props() {
        let entry: SessionEntry = serde_json::from_value(json!({
            "id": 3, "appId": "editor", "zIndex": 12, "isMinimized": true,
            "x": 0, "y": 0, "width": 640, "height": 480
        }))
        .expect("decode entry");
        assert_eq!(entry.props, Value::Null);
        assert!(entry.is_minimized);
    }

    #[test]
    fn lifecycle_follows_the_minimized_flag() {
        let mut state = DesktopState::default();
        let catalog = crate::apps::BuiltinCatalog::new();
        let config = crate::config::DesktopConfig::default();
        crate::reducer::reduce_desktop(
            &mut state,
            crate::reducer::ReducerContext {
                catalog: &catalog,
                config: &config,
            },
            crate::reducer::DesktopAction::OpenWindow(OpenWindowRequest::new("editor")),
        )
        .expect("open editor");

        let window = &mut state.windows[0];
        assert_eq!(window.lifecycle(), WindowLifecycle::Active);
        window.is_minimized = true;
        assert_eq!(window.lifecycle(), WindowLifecycle::Minimized);
        assert_eq!(state.frontmost_window_id(), None);
    }

    #[test]
    fn loading_progress_is_capped() {
        assert_eq!(WindowLoading::started(250).progress, 100);
        assert!(!WindowLoading::default().is_loading);
    }
}
