//! Content producers and the invoker that normalizes their output.
//!
//! A route's content is one of three shapes (raw markup, a fixed result, or an
//! async producer). [`invoke`] maps each of them to a single [`RenderResult`]
//! and is the only place where producer failures turn into error results.

use std::{
    collections::BTreeMap,
    fmt,
    future::Future,
    panic::AssertUnwindSafe,
    sync::Arc,
};

use async_trait::async_trait;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Status that turns a control result into a redirect.
pub const REDIRECT_STATUS: u16 = 302;

/// Request snapshot handed to content producers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub path: String,
    pub query: BTreeMap<String, String>,
    /// Header names are lower-case.
    pub headers: BTreeMap<String, String>,
}

impl PageRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Normalized outcome of running a route's content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RenderResult {
    /// Markup to place in the shell.
    Page {
        html: String,
        /// Script body placed verbatim inside the page's prefetch `<script>`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefetch: Option<String>,
    },
    /// Redirect (302 + path) or error reply.
    Control {
        status: u16,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
}

impl RenderResult {
    pub fn page(html: impl Into<String>) -> Self {
        Self::Page {
            html: html.into(),
            prefetch: None,
        }
    }

    pub fn page_with_prefetch(html: impl Into<String>, prefetch: impl Into<String>) -> Self {
        Self::Page {
            html: html.into(),
            prefetch: Some(prefetch.into()),
        }
    }

    pub fn redirect(path: impl Into<String>) -> Self {
        Self::Control {
            status: REDIRECT_STATUS,
            path: Some(path.into()),
            body: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self::Control {
            status,
            path: None,
            body: None,
        }
    }

    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page { .. })
    }
}

impl From<ContentError> for RenderResult {
    fn from(err: ContentError) -> Self {
        Self::Control {
            status: err.status_or_default(),
            path: None,
            body: Some(err.to_string()),
        }
    }
}

/// Application code that produces a page for a request.
#[async_trait]
pub trait ContentProducer: Send + Sync {
    async fn produce(&self, request: &PageRequest) -> Result<RenderResult, ContentError>;
}

#[async_trait]
impl<F, Fut> ContentProducer for F
where
    F: Fn(PageRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<RenderResult, ContentError>> + Send + 'static,
{
    async fn produce(&self, request: &PageRequest) -> Result<RenderResult, ContentError> {
        (self)(request.clone()).await
    }
}

/// What a route renders.
#[derive(Clone)]
pub enum Content {
    /// Raw markup, wrapped as a page.
    Markup(String),
    /// A fixed result returned as-is.
    Result(RenderResult),
    /// Async producer invoked per request.
    Producer(Arc<dyn ContentProducer>),
}

impl Content {
    pub fn producer(producer: impl ContentProducer + 'static) -> Self {
        Self::Producer(Arc::new(producer))
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Markup(html) => f.debug_tuple("Markup").field(html).finish(),
            Content::Result(result) => f.debug_tuple("Result").field(result).finish(),
            Content::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

impl From<String> for Content {
    fn from(html: String) -> Self {
        Self::Markup(html)
    }
}

impl From<&str> for Content {
    fn from(html: &str) -> Self {
        Self::Markup(html.to_string())
    }
}

impl From<RenderResult> for Content {
    fn from(result: RenderResult) -> Self {
        Self::Result(result)
    }
}

/// Run a route's content for one request.
///
/// Producer errors and panics come back as `Control` results carrying the
/// declared status (or 500) and the error text; this never fails outward.
pub async fn invoke(content: &Content, request: &PageRequest) -> RenderResult {
    match content {
        Content::Markup(html) => RenderResult::page(html.clone()),
        Content::Result(result) => result.clone(),
        Content::Producer(producer) => {
            match AssertUnwindSafe(producer.produce(request))
                .catch_unwind()
                .await
            {
                Ok(Ok(result)) => result,
                Ok(Err(err)) => err.into(),
                Err(panic) => ContentError::new(panic_message(panic.as_ref())).into(),
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "content producer panicked".to_string()
    }
}
