//! HTML shell compilation and marker substitution.
//!
//! The shell is split into literal and marker segments once at startup, so a
//! render is a single pass that concatenates segments with their values.

use std::{fmt::Write, sync::LazyLock};

use regex::Regex;

use crate::{
    assets::{AssetSet, STATIC_MOUNT},
    config::{RenderMode, RenderOptions},
};

/// Shell used when no template file is configured.
pub const DEFAULT_SHELL: &str = include_str!("../assets/shell.html");

/// Registration snippet emitted when the build produced a web app manifest.
pub const SERVICE_WORKER_SNIPPET: &str = include_str!("../assets/sw-register.html");

static MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("marker pattern is valid")
});

/// Substitution points recognized in the shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    Content,
    Title,
    Bundles,
    Prefetch,
    ServiceWorker,
    Meta,
}

impl Marker {
    pub const ALL: [Marker; 6] = [
        Marker::Content,
        Marker::Title,
        Marker::Bundles,
        Marker::Prefetch,
        Marker::ServiceWorker,
        Marker::Meta,
    ];

    /// Token name as written inside `{{ }}`.
    pub fn token(self) -> &'static str {
        match self {
            Marker::Content => "content",
            Marker::Title => "title",
            Marker::Bundles => "bundles",
            Marker::Prefetch => "prefetch",
            Marker::ServiceWorker => "serviceWorker",
            Marker::Meta => "meta",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|marker| marker.token() == token)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Marker(Marker),
    Unknown(String),
}

/// A compiled page shell.
#[derive(Clone, Debug)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn compile(shell: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        for captures in MARKER_PATTERN.captures_iter(shell) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Literal(shell[last..whole.start()].to_string()));
            }
            segments.push(match Marker::from_token(name.as_str()) {
                Some(marker) => Segment::Marker(marker),
                None => Segment::Unknown(name.as_str().to_string()),
            });
            last = whole.end();
        }

        if last < shell.len() {
            segments.push(Segment::Literal(shell[last..].to_string()));
        }

        Self { segments }
    }

    /// Marker tokens in the shell that have no resolver.
    pub fn unknown_markers(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Unknown(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn render(&self, values: &MarkerValues<'_>) -> String {
        let mut html = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => html.push_str(text),
                Segment::Marker(marker) => html.push_str(values.resolve(*marker)),
                Segment::Unknown(name) => {
                    let _ = write!(html, "[unknown marker: {name}]");
                }
            }
        }
        html
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::compile(DEFAULT_SHELL)
    }
}

/// Resolved value for every marker of one render.
#[derive(Clone, Debug, Default)]
pub struct MarkerValues<'a> {
    pub content: &'a str,
    pub title: String,
    pub bundles: String,
    pub prefetch: String,
    pub service_worker: &'static str,
    pub meta: &'a str,
}

impl MarkerValues<'_> {
    fn resolve(&self, marker: Marker) -> &str {
        match marker {
            Marker::Content => self.content,
            Marker::Title => &self.title,
            Marker::Bundles => &self.bundles,
            Marker::Prefetch => &self.prefetch,
            Marker::ServiceWorker => self.service_worker,
            Marker::Meta => self.meta,
        }
    }
}

/// Manifest link, stylesheet and script tags, in that order.
///
/// Dev mode points css/js at the dev server; otherwise they come from the
/// asset set under [`STATIC_MOUNT`]. The script is dropped when `render_js`
/// is false.
pub fn bundle_links(options: &RenderOptions, render_js: bool) -> String {
    let mut links = String::new();

    if let Some(manifest) = &options.assets.manifest {
        let _ = write!(
            links,
            r#"<link rel="manifest" href="{STATIC_MOUNT}{manifest}">"#
        );
    }

    let (css, js) = if options.dev_mode {
        (
            Some(options.dev_css_bundle_url.clone()),
            Some(options.dev_js_bundle_url.clone()),
        )
    } else {
        (
            options.assets.css.as_ref().map(|name| format!("{STATIC_MOUNT}{name}")),
            options.assets.js.as_ref().map(|name| format!("{STATIC_MOUNT}{name}")),
        )
    };

    if let Some(href) = css {
        let _ = write!(links, r#"<link rel="stylesheet" href="{href}">"#);
    }

    if let Some(src) = js.filter(|_| render_js) {
        let _ = write!(links, r#"<script defer src="{src}"></script>"#);
    }

    links
}

/// Inline script block around the producer's prefetch script body.
///
/// `</` is escaped so the body cannot close the tag early.
pub fn prefetch_script(prefetch: Option<&str>) -> String {
    match prefetch {
        Some(body) if !body.is_empty() => {
            format!("<script>{}</script>", body.replace("</", "<\\/"))
        }
        _ => String::new(),
    }
}

pub fn service_worker_snippet(assets: &AssetSet) -> &'static str {
    if assets.manifest.is_some() {
        SERVICE_WORKER_SNIPPET
    } else {
        ""
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Compose the full page for one request.
pub fn render_page(
    template: &Template,
    options: &RenderOptions,
    mode: RenderMode,
    content: &str,
    prefetch: Option<&str>,
) -> String {
    let values = MarkerValues {
        content,
        title: escape_html(&options.page_title),
        bundles: bundle_links(options, mode.render_js),
        prefetch: prefetch_script(prefetch),
        service_worker: service_worker_snippet(&options.assets),
        meta: options.icon_meta_markup.as_deref().unwrap_or_default(),
    };
    template.render(&values)
}
