//! Startup render options and per-request render mode.

use crate::assets::AssetSet;

/// Query parameter that overrides rendering for a single request.
pub const MODE_QUERY_PARAM: &str = "__mode";

/// `__mode` value that drops the client bundle script.
pub const MODE_NO_JS: &str = "nojs";

/// `__mode` value that skips server-side rendering.
pub const MODE_NO_SSR: &str = "noss";

/// Immutable options for one page route, built once at startup.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub page_title: String,
    pub dev_mode: bool,
    pub render_js_enabled: bool,
    pub ssr_enabled: bool,
    pub dev_server_host: String,
    pub dev_server_port: String,
    pub assets: AssetSet,
    pub dev_js_bundle_url: String,
    pub dev_css_bundle_url: String,
    pub icon_meta_markup: Option<String>,
}

impl RenderOptions {
    /// Point the dev bundle URLs at the given dev server.
    pub fn with_dev_server(mut self, host: impl Into<String>, port: impl Into<String>) -> Self {
        self.dev_server_host = host.into();
        self.dev_server_port = port.into();
        let (js, css) = dev_bundle_urls(&self.dev_server_host, &self.dev_server_port);
        self.dev_js_bundle_url = js;
        self.dev_css_bundle_url = css;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        let (dev_js_bundle_url, dev_css_bundle_url) = dev_bundle_urls("localhost", "8080");
        Self {
            page_title: "App".to_string(),
            dev_mode: false,
            render_js_enabled: true,
            ssr_enabled: true,
            dev_server_host: "localhost".to_string(),
            dev_server_port: "8080".to_string(),
            assets: AssetSet::default(),
            dev_js_bundle_url,
            dev_css_bundle_url,
            icon_meta_markup: None,
        }
    }
}

/// Fixed bundle URLs served by the dev server: `(js, css)`.
pub fn dev_bundle_urls(host: &str, port: &str) -> (String, String) {
    (
        format!("http://{host}:{port}/js/main.js"),
        format!("http://{host}:{port}/js/main.css"),
    )
}

/// What a single request is allowed to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderMode {
    pub render_js: bool,
    pub render_ss: bool,
}

impl RenderMode {
    /// Combine the route options with the request's `__mode` value.
    pub fn resolve(options: &RenderOptions, mode: Option<&str>) -> Self {
        Self {
            render_js: options.render_js_enabled && mode != Some(MODE_NO_JS),
            render_ss: options.ssr_enabled && mode != Some(MODE_NO_SSR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert!(options.render_js_enabled);
        assert!(options.ssr_enabled);
        assert!(!options.dev_mode);
        assert_eq!(options.dev_js_bundle_url, "http://localhost:8080/js/main.js");
        assert_eq!(options.dev_css_bundle_url, "http://localhost:8080/js/main.css");
    }

    #[test]
    fn test_with_dev_server_updates_urls() {
        let options = RenderOptions::default().with_dev_server("10.0.0.2", "9000");
        assert_eq!(options.dev_js_bundle_url, "http://10.0.0.2:9000/js/main.js");
        assert_eq!(options.dev_css_bundle_url, "http://10.0.0.2:9000/js/main.css");
    }

    #[test]
    fn test_mode_absent_keeps_options() {
        let mode = RenderMode::resolve(&RenderOptions::default(), None);
        assert_eq!(
            mode,
            RenderMode {
                render_js: true,
                render_ss: true
            }
        );
    }

    #[test]
    fn test_mode_nojs() {
        let mode = RenderMode::resolve(&RenderOptions::default(), Some("nojs"));
        assert!(!mode.render_js);
        assert!(mode.render_ss);
    }

    #[test]
    fn test_mode_noss() {
        let mode = RenderMode::resolve(&RenderOptions::default(), Some("noss"));
        assert!(mode.render_js);
        assert!(!mode.render_ss);
    }

    #[test]
    fn test_mode_unknown_value_ignored() {
        let mode = RenderMode::resolve(&RenderOptions::default(), Some("NOJS"));
        assert!(mode.render_js);
        assert!(mode.render_ss);
    }

    #[test]
    fn test_mode_cannot_enable_disabled_features() {
        let options = RenderOptions {
            render_js_enabled: false,
            ssr_enabled: false,
            ..RenderOptions::default()
        };
        let mode = RenderMode::resolve(&options, Some("anything"));
        assert!(!mode.render_js);
        assert!(!mode.render_ss);
    }
}
