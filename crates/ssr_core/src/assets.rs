//! Build and icon manifest parsing.
//!
//! Both functions take the manifest text and return plain values; reading the
//! files (and degrading when they are missing) is left to the caller.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{ManifestError, Result};

/// URL segment under which the build output directory is served.
pub const STATIC_MOUNT: &str = "/js/";

/// The only chunk whose files end up in the page shell.
pub const MAIN_CHUNK: &str = "main";

/// File names of the production bundle outputs.
///
/// All fields are `None` when the manifest was missing or malformed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetSet {
    pub js: Option<String>,
    pub css: Option<String>,
    pub manifest: Option<String>,
}

impl AssetSet {
    pub fn is_empty(&self) -> bool {
        self.js.is_none() && self.css.is_none() && self.manifest.is_none()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildManifest {
    assets_by_chunk_name: Option<HashMap<String, ChunkFiles>>,
    #[serde(default)]
    assets: Vec<AssetEntry>,
}

/// A chunk maps to one file name or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum ChunkFiles {
    One(String),
    Many(Vec<String>),
}

impl ChunkFiles {
    fn names(&self) -> &[String] {
        match self {
            ChunkFiles::One(name) => std::slice::from_ref(name),
            ChunkFiles::Many(names) => names,
        }
    }
}

#[derive(Deserialize)]
struct AssetEntry {
    name: String,
}

/// Parse a build manifest into an [`AssetSet`].
///
/// Scans the `main` chunk for `.js` and `.css` names (later entries win) and
/// takes the first top-level `assets` entry ending in `manifest.json`.
pub fn parse_asset_manifest(text: &str) -> Result<AssetSet> {
    let manifest: BuildManifest = serde_json::from_str(text)?;

    let chunks = manifest
        .assets_by_chunk_name
        .ok_or(ManifestError::MissingField("assetsByChunkName"))?;
    let main = chunks
        .get(MAIN_CHUNK)
        .ok_or(ManifestError::MissingField("assetsByChunkName.main"))?;

    let mut assets = AssetSet::default();

    for name in main.names() {
        if name.ends_with(".js") {
            assets.js = Some(name.clone());
        } else if name.ends_with(".css") {
            assets.css = Some(name.clone());
        }
    }

    assets.manifest = manifest
        .assets
        .iter()
        .find(|entry| entry.name.ends_with("manifest.json"))
        .map(|entry| entry.name.clone());

    Ok(assets)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IconManifest {
    output_file_prefix: Option<String>,
    html: Option<Vec<String>>,
}

/// Parse an icon-stats manifest into one block of meta markup.
///
/// Each snippet gets its first occurrence of `outputFilePrefix` rewritten to
/// `{mount}{prefix}` so icon URLs resolve under the static mount. Returns
/// `Ok(None)` when either field is absent.
pub fn parse_icon_manifest(text: &str, mount: &str) -> Result<Option<String>> {
    let manifest: IconManifest = serde_json::from_str(text)?;

    let (Some(prefix), Some(snippets)) = (manifest.output_file_prefix, manifest.html) else {
        return Ok(None);
    };

    let qualified = format!("{mount}{prefix}");
    let markup = snippets
        .iter()
        .map(|snippet| {
            if prefix.is_empty() {
                snippet.clone()
            } else {
                snippet.replacen(&prefix, &qualified, 1)
            }
        })
        .collect::<String>();

    Ok(Some(markup))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATS: &str = r#"{
        "assetsByChunkName": {
            "main": ["main.1a2b.js", "main.1a2b.css", "main.1a2b.js.map"],
            "vendor": ["vendor.js"]
        },
        "assets": [
            {"name": "main.1a2b.js"},
            {"name": "manifest.json"},
            {"name": "main.1a2b.css"}
        ]
    }"#;

    #[test]
    fn test_parse_asset_manifest_main_chunk() {
        let assets = parse_asset_manifest(STATS).unwrap();
        assert_eq!(assets.js.as_deref(), Some("main.1a2b.js"));
        assert_eq!(assets.css.as_deref(), Some("main.1a2b.css"));
        assert_eq!(assets.manifest.as_deref(), Some("manifest.json"));
    }

    #[test]
    fn test_parse_asset_manifest_chunk_last_wins_manifest_first_wins() {
        let text = r#"{
            "assetsByChunkName": {"main": ["a.js", "a.css", "b.js", "b.css"]},
            "assets": [{"name": "manifest.json"}, {"name": "icons/old-manifest.json"}]
        }"#;
        let assets = parse_asset_manifest(text).unwrap();
        assert_eq!(assets.js.as_deref(), Some("b.js"));
        assert_eq!(assets.css.as_deref(), Some("b.css"));
        assert_eq!(assets.manifest.as_deref(), Some("manifest.json"));
    }

    #[test]
    fn test_parse_asset_manifest_single_string_chunk() {
        let text = r#"{"assetsByChunkName": {"main": "bundle.js"}}"#;
        let assets = parse_asset_manifest(text).unwrap();
        assert_eq!(assets.js.as_deref(), Some("bundle.js"));
        assert_eq!(assets.css, None);
        assert_eq!(assets.manifest, None);
    }

    #[test]
    fn test_parse_asset_manifest_is_idempotent() {
        assert_eq!(
            parse_asset_manifest(STATS).unwrap(),
            parse_asset_manifest(STATS).unwrap()
        );
    }

    #[test]
    fn test_parse_asset_manifest_missing_chunks() {
        let result = parse_asset_manifest(r#"{"assets": [{"name": "manifest.json"}]}"#);
        assert_eq!(
            result,
            Err(ManifestError::MissingField("assetsByChunkName"))
        );
    }

    #[test]
    fn test_parse_asset_manifest_missing_main() {
        let result = parse_asset_manifest(r#"{"assetsByChunkName": {"vendor": []}}"#);
        assert_eq!(
            result,
            Err(ManifestError::MissingField("assetsByChunkName.main"))
        );
    }

    #[test]
    fn test_parse_asset_manifest_invalid_json() {
        let result = parse_asset_manifest("not json");
        assert!(matches!(result, Err(ManifestError::Parse(_))));
    }

    #[test]
    fn test_parse_icon_manifest_rewrites_prefix() {
        let text = r#"{
            "outputFilePrefix": "icons-9f/",
            "html": [
                "<link rel=\"icon\" href=\"icons-9f/favicon.ico\">",
                "<meta name=\"msapplication-TileImage\" content=\"icons-9f/mstile.png\">"
            ]
        }"#;
        let markup = parse_icon_manifest(text, STATIC_MOUNT).unwrap().unwrap();
        assert_eq!(
            markup,
            "<link rel=\"icon\" href=\"/js/icons-9f/favicon.ico\">\
             <meta name=\"msapplication-TileImage\" content=\"/js/icons-9f/mstile.png\">"
        );
    }

    #[test]
    fn test_parse_icon_manifest_without_html() {
        let text = r#"{"outputFilePrefix": "icons/"}"#;
        assert_eq!(parse_icon_manifest(text, STATIC_MOUNT).unwrap(), None);
    }

    #[test]
    fn test_parse_icon_manifest_without_prefix() {
        let text = r#"{"html": ["<link>"]}"#;
        assert_eq!(parse_icon_manifest(text, STATIC_MOUNT).unwrap(), None);
    }

    #[test]
    fn test_parse_icon_manifest_invalid_json() {
        assert!(parse_icon_manifest("{", STATIC_MOUNT).is_err());
    }
}
