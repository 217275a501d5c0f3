//! Page route handlers.
//!
//! [`page_handler`] builds one GET handler per configured path. Each request
//! resolves its render mode, runs the route's content (unless SSR is off for
//! the request) and turns the result into a page, a redirect or an error reply.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::Query,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::{get, MethodRouter},
};
use ssr_gateway_core::{
    invoke, render_page, Content, PageRequest, RenderMode, RenderOptions, RenderResult, Template,
    MODE_QUERY_PARAM, REDIRECT_STATUS,
};

use crate::error::PageError;

/// Everything a page route needs, built once at startup.
#[derive(Clone, Debug)]
pub struct PageRoute {
    pub options: Arc<RenderOptions>,
    pub template: Arc<Template>,
    pub content: Content,
}

/// HTTP action decided for a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageResponse {
    Html(String),
    Redirect(String),
    Status { status: StatusCode, body: String },
}

impl IntoResponse for PageResponse {
    fn into_response(self) -> Response {
        match self {
            PageResponse::Html(html) => Html(html).into_response(),
            PageResponse::Redirect(location) => {
                (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
            }
            PageResponse::Status { status, body } => (status, body).into_response(),
        }
    }
}

/// Render one request against a page route.
pub async fn render_route(
    route: &PageRoute,
    request: &PageRequest,
) -> Result<PageResponse, PageError> {
    let mode = RenderMode::resolve(&route.options, request.query_param(MODE_QUERY_PARAM));

    tracing::debug!(
        path = %request.path,
        render_js = mode.render_js,
        render_ss = mode.render_ss,
        "Rendering page"
    );

    let result = if mode.render_ss {
        invoke(&route.content, request).await
    } else {
        RenderResult::page("")
    };

    match result {
        RenderResult::Page { html, prefetch } => Ok(PageResponse::Html(render_page(
            &route.template,
            &route.options,
            mode,
            &html,
            prefetch.as_deref(),
        ))),
        RenderResult::Control {
            status: REDIRECT_STATUS,
            path,
            ..
        } => {
            let location = path.ok_or(PageError::MissingRedirectPath)?;
            tracing::debug!(path = %request.path, location = %location, "Redirecting");
            Ok(PageResponse::Redirect(location))
        }
        RenderResult::Control { status, body, .. } => {
            let status =
                StatusCode::from_u16(status).map_err(|_| PageError::InvalidStatus(status))?;
            let body = body.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Something went wrong")
                    .to_string()
            });
            tracing::warn!(path = %request.path, status = %status, "Content returned an error result");
            Ok(PageResponse::Status { status, body })
        }
    }
}

/// Build the GET handler for a page route.
pub fn page_handler<S>(route: PageRoute) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let route = Arc::new(route);

    get(
        move |uri: Uri, headers: HeaderMap, Query(query): Query<BTreeMap<String, String>>| {
            let route = Arc::clone(&route);
            async move {
                let request = page_request(&uri, &headers, query);
                render_route(&route, &request).await
            }
        },
    )
}

fn page_request(uri: &Uri, headers: &HeaderMap, query: BTreeMap<String, String>) -> PageRequest {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();

    PageRequest {
        path: uri.path().to_string(),
        query,
        headers,
    }
}
