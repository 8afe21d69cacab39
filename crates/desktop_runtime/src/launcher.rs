//! Deep-link and compound-result launch orchestration.
//!
//! A compound project result is a bundle of named sections. Each populated section opens the app
//! that edits it, one window at a time with a short pause between opens.

use std::time::Duration;

use futures::future::{self, Either};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::{error::SessionError, model::WindowId, runtime_context::DesktopRuntime};

/// App that receives the merged brand sections of a compound result.
pub const BRAND_IDENTITY_APP_ID: &str = "brand-identity";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionTarget {
    App(&'static str),
    BrandIdentity,
}

// Launch order. Brand sections share one window placed where the first of them appears.
const COMPOUND_SECTIONS: [(&str, SectionTarget); 7] = [
    ("projectPlan", SectionTarget::App("planner")),
    ("ideas", SectionTarget::App("ideas")),
    ("copy", SectionTarget::App("editor")),
    ("images", SectionTarget::App("image-studio")),
    ("palette", SectionTarget::BrandIdentity),
    ("toneOfVoice", SectionTarget::BrandIdentity),
    ("storage", SectionTarget::App("cloud")),
];

#[derive(Debug, Clone, PartialEq)]
/// One window the compound launcher will open.
pub struct LaunchStep {
    pub app_id: String,
    pub props: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A window opened by a launch.
pub struct OpenedWindow {
    pub app_id: String,
    pub window_id: WindowId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Outcome of a deep-link or compound launch.
pub struct LaunchReport {
    /// Windows opened, in open order.
    pub opened: Vec<OpenedWindow>,
    /// App ids whose open was rejected.
    pub failed: Vec<String>,
    /// Whether a cancellation stopped the launch early.
    pub cancelled: bool,
}

/// Whether a bundle section carries anything worth opening.
pub fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Builds the launch props handed to a target app.
pub fn launch_props(result: Value, prompt: Option<&str>) -> Value {
    let mut props = Map::new();
    props.insert("initialResult".to_string(), result);
    if let Some(prompt) = prompt {
        props.insert("prompt".to_string(), Value::String(prompt.to_string()));
    }
    Value::Object(props)
}

/// Maps a compound result bundle to the ordered list of windows to open.
///
/// Non-object bundles and bundles without populated sections produce an empty plan.
pub fn plan_compound_launch(bundle: &Value, prompt: Option<&str>) -> Vec<LaunchStep> {
    let mut steps = Vec::new();
    let mut brand: Option<(usize, Map<String, Value>)> = None;

    for (section, target) in COMPOUND_SECTIONS {
        let Some(data) = bundle.get(section).filter(|value| is_populated(value)) else {
            continue;
        };
        match target {
            SectionTarget::App(app_id) => steps.push(LaunchStep {
                app_id: app_id.to_string(),
                props: launch_props(data.clone(), prompt),
            }),
            SectionTarget::BrandIdentity => {
                let (_, merged) = brand.get_or_insert_with(|| (steps.len(), Map::new()));
                merged.insert(section.to_string(), data.clone());
            }
        }
    }

    if let Some((index, merged)) = brand {
        steps.insert(
            index,
            LaunchStep {
                app_id: BRAND_IDENTITY_APP_ID.to_string(),
                props: launch_props(Value::Object(merged), prompt),
            },
        );
    }
    steps
}

#[derive(Clone)]
/// Opens windows for deep links and compound results through a [`DesktopRuntime`].
///
/// Launches wait for [`DesktopRuntime::boot`] so restored windows never replace them.
pub struct AppLauncher {
    runtime: DesktopRuntime,
}

impl AppLauncher {
    pub fn new(runtime: DesktopRuntime) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> &DesktopRuntime {
        &self.runtime
    }

    /// Opens `app_id`, preloading the parked result under `result_key` when one is given.
    ///
    /// A missing or unreadable result is reported to the user and the app opens without it. The
    /// compound app id routes to [`Self::launch_compound_project`].
    pub async fn launch_from_deep_link(
        &self,
        app_id: &str,
        result_key: Option<&str>,
    ) -> LaunchReport {
        self.wait_for_boot().await;

        let preload = match result_key {
            Some(key) => match self.fetch_result(key).await {
                Ok(stored) => Some(stored),
                Err(err) => {
                    log::warn!("{err}");
                    self.runtime
                        .host()
                        .notify(
                            "Result unavailable",
                            "The generated result could not be loaded. Opening without it.",
                        )
                        .await;
                    None
                }
            },
            None => None,
        };

        if app_id == self.runtime.config().compound_app_id {
            let (bundle, prompt) = preload
                .map(|stored| (stored.result, stored.prompt))
                .unwrap_or((Value::Null, None));
            return self
                .launch_compound_project(&bundle, prompt.as_deref())
                .await;
        }

        let props = preload.map(|stored| launch_props(stored.result, stored.prompt.as_deref()));
        let mut report = LaunchReport::default();
        match self.runtime.open(app_id, props).await {
            Some(window_id) => report.opened.push(OpenedWindow {
                app_id: app_id.to_string(),
                window_id,
            }),
            None => report.failed.push(app_id.to_string()),
        }
        report
    }

    /// Opens one window per populated section of `bundle`, pausing between opens.
    pub async fn launch_compound_project(
        &self,
        bundle: &Value,
        prompt: Option<&str>,
    ) -> LaunchReport {
        self.launch_compound_project_with_cancel(bundle, prompt, &CancellationToken::new())
            .await
    }

    /// Like [`Self::launch_compound_project`], stopping before the next open once `cancel` fires.
    pub async fn launch_compound_project_with_cancel(
        &self,
        bundle: &Value,
        prompt: Option<&str>,
        cancel: &CancellationToken,
    ) -> LaunchReport {
        self.wait_for_boot().await;
        let mut report = LaunchReport::default();
        let steps = plan_compound_launch(bundle, prompt);
        if steps.is_empty() {
            log::info!("{}", SessionError::EmptyCompoundResult);
            self.runtime
                .host()
                .notify(
                    "Nothing to open",
                    "The project result did not contain any content.",
                )
                .await;
            return report;
        }

        let delay = self.runtime.config().launch_delay();
        for (index, step) in steps.into_iter().enumerate() {
            if index > 0 && !self.pause(delay, cancel).await {
                report.cancelled = true;
                break;
            }
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            match self.runtime.open(&step.app_id, Some(step.props)).await {
                Some(window_id) => report.opened.push(OpenedWindow {
                    app_id: step.app_id,
                    window_id,
                }),
                None => report.failed.push(step.app_id),
            }
        }

        if report.cancelled {
            log::info!(
                "compound launch cancelled after {} windows",
                report.opened.len()
            );
        }
        if !report.failed.is_empty() {
            self.runtime
                .host()
                .notify(
                    "Some windows could not be opened",
                    &format!("Unavailable apps: {}", report.failed.join(", ")),
                )
                .await;
        }
        report
    }

    async fn fetch_result(
        &self,
        key: &str,
    ) -> Result<platform_host::StoredResult, SessionError> {
        let store = self.runtime.host().result_store();
        match store.take_result(key).await {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => Err(SessionError::ResultRetrieval {
                key: key.to_string(),
                reason: "no result stored".to_string(),
            }),
            Err(reason) => Err(SessionError::ResultRetrieval {
                key: key.to_string(),
                reason,
            }),
        }
    }

    // Resolves to false when cancelled during the pause.
    #[allow(clippy::let_and_return)]
    async fn pause(&self, delay: Duration, cancel: &CancellationToken) -> bool {
        let timer = self.runtime.host().launch_timer();
        let sleep = timer.sleep(delay);
        let cancelled = cancel.cancelled();
        futures::pin_mut!(cancelled);
        let elapsed = matches!(future::select(sleep, cancelled).await, Either::Left(_));
        elapsed
    }

    async fn wait_for_boot(&self) {
        if !self.runtime.is_booted() {
            log::debug!("launch requested before boot; waiting for session restore");
            self.runtime.boot().await;
        }
    }
}
