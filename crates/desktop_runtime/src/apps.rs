//! Built-in application catalog.

use desktop_app_contract::{
    AppCatalog, AppDescriptor, AppModule, AppMountContext, ApplicationId, MountedApp, WindowPosition,
    WindowSize,
};
use serde_json::{Map, Value};

struct BuiltinEntry {
    app_id: &'static str,
    display_name: &'static str,
    icon_ref: &'static str,
    module: AppModule,
    position: (i32, i32),
    size: (i32, i32),
}

const BUILTIN_APPS: [BuiltinEntry; 7] = [
    BuiltinEntry {
        app_id: "welcome",
        display_name: "Welcome",
        icon_ref: "sparkles",
        module: AppModule::new(mount_welcome),
        position: (120, 80),
        size: (520, 380),
    },
    BuiltinEntry {
        app_id: "editor",
        display_name: "Text Editor",
        icon_ref: "document",
        module: AppModule::new(mount_editor),
        position: (80, 60),
        size: (760, 540),
    },
    BuiltinEntry {
        app_id: "cloud",
        display_name: "Cloud Drive",
        icon_ref: "cloud",
        module: AppModule::new(mount_cloud),
        position: (140, 90),
        size: (800, 600),
    },
    BuiltinEntry {
        app_id: "planner",
        display_name: "Project Planner",
        icon_ref: "checklist",
        module: AppModule::new(mount_planner),
        position: (60, 50),
        size: (820, 600),
    },
    BuiltinEntry {
        app_id: "ideas",
        display_name: "Idea Board",
        icon_ref: "lightbulb",
        module: AppModule::new(mount_ideas),
        position: (100, 70),
        size: (700, 520),
    },
    BuiltinEntry {
        app_id: "image-studio",
        display_name: "Image Studio",
        icon_ref: "image",
        module: AppModule::new(mount_image_studio),
        position: (160, 100),
        size: (860, 640),
    },
    BuiltinEntry {
        app_id: "brand-identity",
        display_name: "Brand Identity",
        icon_ref: "palette",
        module: AppModule::new(mount_brand_identity),
        position: (180, 110),
        size: (720, 560),
    },
];

/// Catalog of the apps shipped with the desktop.
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    entries: Vec<AppDescriptor>,
}

impl Default for BuiltinCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinCatalog {
    pub fn new() -> Self {
        let entries = BUILTIN_APPS
            .iter()
            .map(|entry| AppDescriptor {
                id: ApplicationId::trusted(entry.app_id),
                display_name: entry.display_name.to_string(),
                icon_ref: entry.icon_ref.to_string(),
                module: entry.module,
                default_position: WindowPosition {
                    x: entry.position.0,
                    y: entry.position.1,
                },
                default_size: WindowSize::pixels(entry.size.0, entry.size.1),
            })
            .collect();
        Self { entries }
    }
}

impl AppCatalog for BuiltinCatalog {
    fn lookup(&self, app_id: &str) -> Option<&AppDescriptor> {
        self.entries.iter().find(|entry| entry.id.as_str() == app_id)
    }

    fn descriptors(&self) -> Vec<&AppDescriptor> {
        self.entries.iter().collect()
    }
}

fn mounted(context: AppMountContext, component: &'static str) -> MountedApp {
    MountedApp {
        app_id: context.app_id,
        component,
        launch_params: context.props,
    }
}

fn mount_welcome(context: AppMountContext) -> MountedApp {
    mounted(context, "WelcomeApp")
}

fn mount_editor(context: AppMountContext) -> MountedApp {
    // A bare string result is the document body.
    let mut context = context;
    if let Some(Value::String(text)) = context.props.get("initialResult").cloned() {
        let mut params = context.props.as_object().cloned().unwrap_or_default();
        params.insert("document".to_string(), Value::String(text));
        context.props = Value::Object(params);
    }
    mounted(context, "TextEditorApp")
}

fn mount_cloud(context: AppMountContext) -> MountedApp {
    mounted(context, "CloudDriveApp")
}

fn mount_planner(context: AppMountContext) -> MountedApp {
    mounted(context, "ProjectPlannerApp")
}

fn mount_ideas(context: AppMountContext) -> MountedApp {
    mounted(context, "IdeaBoardApp")
}

fn mount_image_studio(context: AppMountContext) -> MountedApp {
    mounted(context, "ImageStudioApp")
}

fn mount_brand_identity(context: AppMountContext) -> MountedApp {
    // Sections the brand view renders, in display order.
    let mut context = context;
    let sections = ["palette", "toneOfVoice"]
        .into_iter()
        .filter(|section| {
            context
                .props
                .get("initialResult")
                .and_then(|result| result.get(section))
                .is_some()
        })
        .map(|section| Value::String(section.to_string()))
        .collect::<Vec<_>>();
    if !sections.is_empty() {
        let mut params: Map<String, Value> =
            context.props.as_object().cloned().unwrap_or_default();
        params.insert("sections".to_string(), Value::Array(sections));
        context.props = Value::Object(params);
    }
    mounted(context, "BrandIdentityApp")
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::Extent;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn builtin_catalog_ids_are_valid_and_unique() {
        let catalog = BuiltinCatalog::new();
        let ids = catalog
            .descriptors()
            .iter()
            .map(|d| d.id.as_str().to_string())
            .collect::<Vec<_>>();
        for id in &ids {
            assert!(ApplicationId::new(id.as_str()).is_ok(), "invalid id {id}");
        }
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn lookup_resolves_known_ids_only() {
        let catalog = BuiltinCatalog::new();
        let cloud = catalog.lookup("cloud").expect("cloud");
        assert_eq!(cloud.display_name, "Cloud Drive");
        assert_eq!(cloud.default_size.width, Extent::Pixels(800));
        assert!(catalog.lookup("project").is_none());
        assert!(catalog.lookup("Cloud").is_none());
    }

    #[test]
    fn editor_factory_lifts_text_results_into_the_document() {
        let catalog = BuiltinCatalog::new();
        let mounted = catalog
            .lookup("editor")
            .expect("editor")
            .instantiate(&json!({"initialResult": "Hello", "prompt": "greet"}));
        assert_eq!(mounted.component, "TextEditorApp");
        assert_eq!(mounted.launch_params["document"], json!("Hello"));
        assert_eq!(mounted.launch_params["prompt"], json!("greet"));
    }

    #[test]
    fn brand_identity_factory_lists_present_sections() {
        let catalog = BuiltinCatalog::new();
        let mounted = catalog
            .lookup("brand-identity")
            .expect("brand identity")
            .instantiate(&json!({"initialResult": {"toneOfVoice": "warm"}}));
        assert_eq!(mounted.launch_params["sections"], json!(["toneOfVoice"]));
    }

    #[test]
    fn factories_keep_null_props_untouched() {
        let catalog = BuiltinCatalog::new();
        let mounted = catalog.lookup("welcome").expect("welcome").instantiate(&Value::Null);
        assert_eq!(mounted.launch_params, Value::Null);
    }
}
