//! Shared contract types between the desktop window manager and the apps it launches.
//!
//! The window manager only knows apps through an [`AppCatalog`]: a read-only lookup from a
//! string [`ApplicationId`] to an [`AppDescriptor`] carrying display metadata, default geometry,
//! and an [`AppModule`] factory that turns launch props into a [`MountedApp`] handle.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable identifier for a runtime-managed window.
pub type WindowRuntimeId = u64;

/// Stable string identifier for a launchable application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Returns an app identifier when `raw` conforms to the id policy.
    ///
    /// Ids are one or more dot-separated segments of lowercase ASCII letters, digits, and `-`,
    /// each starting with a letter and not ending with `-`.
    pub fn new(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        if is_valid_application_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(format!(
                "invalid application id `{raw}`; expected lowercase kebab-case segments"
            ))
        }
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creates an id without validation for trusted constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ApplicationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_valid_application_id(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > 120 {
        return false;
    }

    raw.split('.').all(|part| {
        let bytes = part.as_bytes();
        !part.is_empty()
            && part.len() <= 32
            && bytes[0].is_ascii_lowercase()
            && bytes
                .iter()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
            && !part.ends_with('-')
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Top-left corner of a window in desktop coordinates.
pub struct WindowPosition {
    /// Horizontal offset.
    pub x: i32,
    /// Vertical offset.
    pub y: i32,
}

impl WindowPosition {
    /// Returns the position shifted by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// One window dimension: a pixel count or a CSS-style length such as `"auto"` or `"80%"`.
pub enum Extent {
    /// Absolute size in pixels.
    Pixels(i32),
    /// Relative or keyword size interpreted by the rendering layer.
    Css(String),
}

impl From<i32> for Extent {
    fn from(value: i32) -> Self {
        Self::Pixels(value)
    }
}

impl From<&str> for Extent {
    fn from(value: &str) -> Self {
        Self::Css(value.to_string())
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{px}px"),
            Self::Css(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Width and height of a window.
pub struct WindowSize {
    /// Window width.
    pub width: Extent,
    /// Window height.
    pub height: Extent,
}

impl WindowSize {
    /// Creates a pixel-sized window extent.
    pub fn pixels(width: i32, height: i32) -> Self {
        Self {
            width: Extent::Pixels(width),
            height: Extent::Pixels(height),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Context handed to an app factory for one window instance.
pub struct AppMountContext {
    /// App id from the catalog.
    pub app_id: ApplicationId,
    /// Launch props supplied at open time or restored from the session record.
    pub props: Value,
}

#[derive(Debug, Clone, PartialEq)]
/// Resolved component reference produced by an app factory.
///
/// The rendering layer owns what a component looks like; the window manager only keeps this handle
/// next to the window so it never has to resolve the app id again.
pub struct MountedApp {
    /// App the component belongs to.
    pub app_id: ApplicationId,
    /// Component name the rendering layer dispatches on.
    pub component: &'static str,
    /// Props the component was built from.
    pub launch_params: Value,
}

/// Static app factory used by catalog entries.
pub type AppFactoryFn = fn(AppMountContext) -> MountedApp;

#[derive(Debug, Clone, Copy)]
/// App module wrapping the factory for a catalog entry.
pub struct AppModule {
    factory: AppFactoryFn,
}

impl AppModule {
    /// Creates a module from a factory function.
    pub const fn new(factory: AppFactoryFn) -> Self {
        Self { factory }
    }

    /// Builds the component for one window.
    pub fn mount(self, context: AppMountContext) -> MountedApp {
        (self.factory)(context)
    }
}

#[derive(Debug, Clone)]
/// Immutable catalog metadata and factory for a launchable application.
pub struct AppDescriptor {
    /// Canonical app id.
    pub id: ApplicationId,
    /// Human-readable name used as the default window title.
    pub display_name: String,
    /// Icon reference understood by the rendering layer.
    pub icon_ref: String,
    /// Factory producing the app component.
    pub module: AppModule,
    /// Position of the first window opened for this app.
    pub default_position: WindowPosition,
    /// Size of newly opened windows.
    pub default_size: WindowSize,
}

impl AppDescriptor {
    /// Runs the factory with `props`.
    pub fn instantiate(&self, props: &Value) -> MountedApp {
        self.module.mount(AppMountContext {
            app_id: self.id.clone(),
            props: props.clone(),
        })
    }
}

/// Read-only lookup from app id to [`AppDescriptor`].
pub trait AppCatalog {
    /// Returns the descriptor for `app_id`, or `None` when the app is unknown.
    fn lookup(&self, app_id: &str) -> Option<&AppDescriptor>;

    /// Returns every descriptor in catalog order.
    fn descriptors(&self) -> Vec<&AppDescriptor>;
}

#[derive(Debug, Clone, Default)]
/// Catalog assembled from an explicit descriptor list.
pub struct StaticCatalog {
    entries: Vec<AppDescriptor>,
}

impl StaticCatalog {
    /// Builds a catalog, rejecting duplicate ids.
    pub fn new(entries: Vec<AppDescriptor>) -> Result<Self, String> {
        for (idx, entry) in entries.iter().enumerate() {
            if entries[..idx].iter().any(|other| other.id == entry.id) {
                return Err(format!("duplicate application id `{}`", entry.id));
            }
        }
        Ok(Self { entries })
    }
}

impl AppCatalog for StaticCatalog {
    fn lookup(&self, app_id: &str) -> Option<&AppDescriptor> {
        self.entries.iter().find(|entry| entry.id.as_str() == app_id)
    }

    fn descriptors(&self) -> Vec<&AppDescriptor> {
        self.entries.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn echo_factory(context: AppMountContext) -> MountedApp {
        MountedApp {
            app_id: context.app_id,
            component: "Echo",
            launch_params: context.props,
        }
    }

    fn descriptor(id: &str) -> AppDescriptor {
        AppDescriptor {
            id: ApplicationId::trusted(id),
            display_name: id.to_uppercase(),
            icon_ref: id.to_string(),
            module: AppModule::new(echo_factory),
            default_position: WindowPosition { x: 40, y: 40 },
            default_size: WindowSize::pixels(640, 480),
        }
    }

    #[test]
    fn application_id_accepts_kebab_and_dotted_ids() {
        assert!(ApplicationId::new("editor").is_ok());
        assert!(ApplicationId::new("image-studio").is_ok());
        assert!(ApplicationId::new("system.settings").is_ok());
        assert!(ApplicationId::new("").is_err());
        assert!(ApplicationId::new("Editor").is_err());
        assert!(ApplicationId::new("trailing-").is_err());
        assert!(ApplicationId::new("system..calc").is_err());
        assert!(ApplicationId::new("9lives").is_err());
    }

    #[test]
    fn extent_serializes_as_number_or_string() {
        assert_eq!(serde_json::to_value(Extent::Pixels(800)).unwrap(), json!(800));
        assert_eq!(serde_json::to_value(Extent::from("auto")).unwrap(), json!("auto"));

        let decoded: Extent = serde_json::from_value(json!("80%")).unwrap();
        assert_eq!(decoded, Extent::Css("80%".to_string()));
        let decoded: Extent = serde_json::from_value(json!(600)).unwrap();
        assert_eq!(decoded, Extent::Pixels(600));
    }

    #[test]
    fn static_catalog_looks_up_by_string_id() {
        let catalog = StaticCatalog::new(vec![descriptor("editor"), descriptor("cloud")])
            .expect("catalog");

        let entry = catalog.lookup("cloud").expect("cloud descriptor");
        assert_eq!(entry.display_name, "CLOUD");
        assert!(catalog.lookup("missing").is_none());
        assert_eq!(catalog.descriptors().len(), 2);
    }

    #[test]
    fn static_catalog_rejects_duplicate_ids() {
        let err = StaticCatalog::new(vec![descriptor("editor"), descriptor("editor")])
            .expect_err("duplicate ids");
        assert!(err.contains("editor"));
    }

    #[test]
    fn descriptor_instantiate_passes_props_to_factory() {
        let entry = descriptor("editor");
        let mounted = entry.instantiate(&json!({"initialResult": "draft"}));
        assert_eq!(mounted.app_id.as_str(), "editor");
        assert_eq!(mounted.component, "Echo");
        assert_eq!(mounted.launch_params, json!({"initialResult": "draft"}));
    }
}
