use std::{
    any::Any,
    collections::HashSet,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use ssr_gateway_core::{RenderOptions, STATIC_MOUNT};
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    assets::{load_assets, load_icon_meta, load_template},
    config::GatewayConfig,
    error::{Result, SetupError},
    handlers::{health::livez, page_handler, PageRoute},
    registry::ProducerRegistry,
};

const LIVEZ_PATH: &str = "/livez";

/// Build the render options shared by every route.
///
/// Reads both manifests from disk; this is the only place they are read.
pub fn render_options(config: &GatewayConfig) -> RenderOptions {
    RenderOptions {
        page_title: config.page_title.clone(),
        dev_mode: config.dev_mode,
        render_js_enabled: config.render_js,
        ssr_enabled: config.ssr,
        assets: load_assets(&config.assets_manifest),
        icon_meta_markup: load_icon_meta(&config.icons_manifest),
        ..RenderOptions::default()
    }
    .with_dev_server(&config.dev_server_host, &config.dev_server_port)
}

/// Create the application router with all page routes and middleware.
///
/// Fails when a route is misconfigured; nothing is served in that case.
pub fn create_app(config: &GatewayConfig, registry: &ProducerRegistry) -> Result<Router> {
    let options = render_options(config);
    let template = Arc::new(load_template(config.shell_template.as_deref())?);
    let mount = STATIC_MOUNT.trim_end_matches('/');

    let mut router = Router::new().route(LIVEZ_PATH, get(livez));
    let mut seen = HashSet::new();

    if config.routes.is_empty() {
        tracing::warn!("No page routes configured");
    }

    for route in &config.routes {
        validate_path(&route.path, mount)?;
        if !seen.insert(route.path.as_str()) {
            return Err(SetupError::DuplicateRoute(route.path.clone()));
        }

        let content = registry.resolve(route)?;
        let options = RenderOptions {
            page_title: route
                .title
                .clone()
                .unwrap_or_else(|| options.page_title.clone()),
            ..options.clone()
        };

        tracing::info!(path = %route.path, content = ?content, "Registering page route");

        let handler = page_handler(PageRoute {
            options: Arc::new(options),
            template: Arc::clone(&template),
            content,
        });

        // axum rejects overlapping routes by panicking on insertion
        let candidate = router.clone();
        router = catch_unwind(AssertUnwindSafe(move || candidate.route(&route.path, handler)))
            .map_err(|panic| SetupError::ConflictingRoute {
                path: route.path.clone(),
                reason: panic_message(panic.as_ref()),
            })?;
    }

    Ok(with_middleware(
        router.nest_service(mount, ServeDir::new(&config.static_dir)),
    ))
}

/// Outermost layers shared by every route.
fn with_middleware(router: Router) -> Router {
    router
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}

fn validate_path(path: &str, mount: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(SetupError::InvalidPath(path.to_string()));
    }
    let legacy_capture = path
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'));
    if legacy_capture {
        return Err(SetupError::InvalidPath(path.to_string()));
    }
    let reserved = path == LIVEZ_PATH
        || path == mount
        || path.starts_with(&format!("{mount}/"));
    if reserved {
        return Err(SetupError::ReservedPath(path.to_string()));
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "Something went wrong".to_string()
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(err.as_ref());

    tracing::error!(error = %message, "Request handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}
