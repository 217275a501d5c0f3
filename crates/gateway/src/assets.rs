//! Startup-time reads of the build manifests and page shell.
//!
//! Manifests are read once, synchronously, while routes are registered. A
//! missing or broken manifest degrades to "no assets" instead of failing.

use std::path::Path;

use ssr_gateway_core::{parse_asset_manifest, parse_icon_manifest, AssetSet, Template, STATIC_MOUNT};

use crate::error::{Result, SetupError};

/// Read the build manifest, falling back to an empty [`AssetSet`].
pub fn load_assets(path: &Path) -> AssetSet {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Build manifest not readable, rendering without bundles");
            return AssetSet::default();
        }
    };

    match parse_asset_manifest(&text) {
        Ok(assets) => {
            tracing::debug!(path = %path.display(), ?assets, "Loaded build manifest");
            assets
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Build manifest malformed, rendering without bundles");
            AssetSet::default()
        }
    }
}

/// Read the icon manifest into meta markup, or `None` on any failure.
pub fn load_icon_meta(path: &Path) -> Option<String> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Icon manifest not readable");
            return None;
        }
    };

    match parse_icon_manifest(&text, STATIC_MOUNT) {
        Ok(markup) => markup,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Icon manifest malformed, skipping meta tags");
            None
        }
    }
}

/// Compile the configured shell, or the embedded one when none is set.
pub fn load_template(path: Option<&Path>) -> Result<Template> {
    let template = match path {
        Some(path) => {
            let shell = std::fs::read_to_string(path).map_err(|e| SetupError::ShellTemplate {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            Template::compile(&shell)
        }
        None => Template::default(),
    };

    for name in template.unknown_markers() {
        tracing::warn!(marker = name, "Shell contains an unknown marker");
    }

    Ok(template)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use ssr_gateway_core::MarkerValues;

    use super::*;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_assets() {
        let file = write_temp(
            r#"{"assetsByChunkName": {"main": ["main.js", "main.css"]}, "assets": [{"name": "manifest.json"}]}"#,
        );
        let assets = load_assets(file.path());
        assert_eq!(assets.js.as_deref(), Some("main.js"));
        assert_eq!(assets.css.as_deref(), Some("main.css"));
        assert_eq!(assets.manifest.as_deref(), Some("manifest.json"));
    }

    #[test]
    fn test_load_assets_twice_is_identical() {
        let file = write_temp(r#"{"assetsByChunkName": {"main": ["a.js", "b.js"]}}"#);
        assert_eq!(load_assets(file.path()), load_assets(file.path()));
    }

    #[test]
    fn test_load_assets_missing_file() {
        let assets = load_assets(Path::new("/nonexistent/stats.json"));
        assert_eq!(assets, AssetSet::default());
    }

    #[test]
    fn test_load_assets_without_chunks() {
        let file = write_temp(r#"{"assets": [{"name": "manifest.json"}]}"#);
        assert!(load_assets(file.path()).is_empty());
    }

    #[test]
    fn test_load_icon_meta() {
        let file = write_temp(
            r#"{"outputFilePrefix": "icons/", "html": ["<link href=\"icons/a.png\">", "<meta content=\"icons/b.png\">"]}"#,
        );
        assert_eq!(
            load_icon_meta(file.path()).as_deref(),
            Some("<link href=\"/js/icons/a.png\"><meta content=\"/js/icons/b.png\">")
        );
    }

    #[test]
    fn test_load_icon_meta_failures() {
        assert_eq!(load_icon_meta(Path::new("/nonexistent/icons.json")), None);
        let file = write_temp("[1, 2");
        assert_eq!(load_icon_meta(file.path()), None);
    }

    #[test]
    fn test_load_template_from_file() {
        let file = write_temp("<title>{{title}}</title>");
        let template = load_template(Some(file.path())).unwrap();
        let values = MarkerValues {
            title: "T".to_string(),
            ..MarkerValues::default()
        };
        assert_eq!(template.render(&values), "<title>T</title>");
    }

    #[test]
    fn test_load_template_missing_file() {
        let result = load_template(Some(Path::new("/nonexistent/shell.html")));
        assert!(matches!(result, Err(SetupError::ShellTemplate { .. })));
    }

    #[test]
    fn test_load_template_default() {
        let template = load_template(None).unwrap();
        assert!(template.unknown_markers().is_empty());
    }
}
