//! Window registry, session persistence, and launch orchestration for the virtual desktop.
//!
//! [`DesktopRuntime`] owns the window state and applies [`DesktopAction`] values through the pure
//! [`reduce_desktop`] transition function. Reducer-emitted [`RuntimeEffect`] values are executed
//! against the injected [`DesktopHostContext`]. [`AppLauncher`] turns deep links and compound
//! results into window opens.

pub mod apps;
mod boot;
pub mod config;
mod effect_executor;
pub mod error;
pub mod host;
pub mod launcher;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod runtime_context;
pub mod window_manager;

pub use apps::BuiltinCatalog;
pub use boot::{BootReport, BootSource};
pub use config::{ConfigError, DesktopConfig};
pub use error::SessionError;
pub use host::DesktopHostContext;
pub use launcher::{plan_compound_launch, AppLauncher, LaunchReport, LaunchStep, OpenedWindow};
pub use model::*;
pub use persistence::{decode_session, encode_session, StoredSession};
pub use reducer::{reduce_desktop, DesktopAction, ReducerContext, ReducerError, RuntimeEffect};
pub use runtime_context::DesktopRuntime;
