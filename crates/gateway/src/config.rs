use std::path::{Path, PathBuf};

use serde::{de, Deserialize, Deserializer, Serialize};
use ssr_gateway_core::RenderResult;

use crate::error::{Result, SetupError};

/// Gateway configuration, usually loaded from a JSON file.
///
/// Every field has a default, so `{}` is a valid (route-less) config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    /// Default `<title>` for every page (default: "App")
    pub page_title: String,
    /// Serve bundles from the dev server instead of the build output (default: false)
    pub dev_mode: bool,
    /// Emit the client bundle script (default: true)
    pub render_js: bool,
    /// Run content producers on the server (default: true)
    pub ssr: bool,
    /// Dev server host (default: "localhost")
    pub dev_server_host: String,
    /// Dev server port, string or number (default: "8080")
    #[serde(deserialize_with = "string_or_number")]
    pub dev_server_port: String,
    /// Build manifest path (default: "build/stats.json")
    pub assets_manifest: PathBuf,
    /// Icon manifest path (default: "build/icons-stats.json")
    pub icons_manifest: PathBuf,
    /// Directory served under `/js` (default: "build")
    pub static_dir: PathBuf,
    /// HTML shell file; the embedded shell is used when unset
    pub shell_template: Option<PathBuf>,
    pub routes: Vec<RouteConfig>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            page_title: "App".to_string(),
            dev_mode: false,
            render_js: true,
            ssr: true,
            dev_server_host: "localhost".to_string(),
            dev_server_port: "8080".to_string(),
            assets_manifest: PathBuf::from("build/stats.json"),
            icons_manifest: PathBuf::from("build/icons-stats.json"),
            static_dir: PathBuf::from("build"),
            shell_template: None,
            routes: Vec::new(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SetupError::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&text).map_err(|e| SetupError::ConfigParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// One page route and what it renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
    pub path: String,
    /// Overrides `pageTitle` for this route.
    #[serde(default)]
    pub title: Option<String>,
    /// Inline markup or a fixed render result.
    #[serde(default)]
    pub content: Option<ContentDescriptor>,
    /// Name of a producer registered with the gateway.
    #[serde(default)]
    pub producer: Option<String>,
}

impl RouteConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: None,
            content: None,
            producer: None,
        }
    }

    pub fn with_markup(mut self, html: impl Into<String>) -> Self {
        self.content = Some(ContentDescriptor::Markup(html.into()));
        self
    }

    pub fn with_result(mut self, result: RenderResult) -> Self {
        self.content = Some(ContentDescriptor::Result(result));
        self
    }

    pub fn with_producer(mut self, name: impl Into<String>) -> Self {
        self.producer = Some(name.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Inline route content: a markup string or a result object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentDescriptor {
    Markup(String),
    Result(RenderResult),
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) => Ok(value),
        serde_json::Value::Number(value) => Ok(value.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}
