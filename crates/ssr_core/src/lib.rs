//! Pure SSR gateway logic - no file or network I/O.
//!
//! This crate provides:
//! - Build and icon manifest parsing
//! - Render options and per-request render modes
//! - Page shell compilation and marker substitution
//! - Content producers and the invoker that normalizes their results
//!
//! # Example
//!
//! ```
//! use ssr_gateway_core::{
//!     parse_asset_manifest, render_page, RenderMode, RenderOptions, Template,
//! };
//!
//! let assets = parse_asset_manifest(
//!     r#"{"assetsByChunkName": {"main": ["main.js", "main.css"]}}"#,
//! )
//! .unwrap();
//!
//! let options = RenderOptions {
//!     page_title: "Home".to_string(),
//!     assets,
//!     ..RenderOptions::default()
//! };
//!
//! let template = Template::compile("<title>{{title}}</title>{{bundles}}{{content}}");
//! let mode = RenderMode::resolve(&options, Some("nojs"));
//! let html = render_page(&template, &options, mode, "<p>hello</p>", None);
//!
//! assert!(html.contains("/js/main.css"));
//! assert!(!html.contains("<script"));
//! ```

mod assets;
mod config;
mod content;
mod error;
mod template;

pub use assets::{parse_asset_manifest, parse_icon_manifest, AssetSet, MAIN_CHUNK, STATIC_MOUNT};
pub use config::{
    dev_bundle_urls, RenderMode, RenderOptions, MODE_NO_JS, MODE_NO_SSR, MODE_QUERY_PARAM,
};
pub use content::{invoke, Content, ContentProducer, PageRequest, RenderResult, REDIRECT_STATUS};
pub use error::{ContentError, ManifestError, Result};
pub use template::{
    bundle_links, prefetch_script, render_page, service_worker_snippet, Marker, MarkerValues,
    Template, DEFAULT_SHELL, SERVICE_WORKER_SNIPPET,
};
