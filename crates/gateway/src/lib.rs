//! SSR gateway - imperative shell.
//!
//! Reads the build manifests and page shell at startup, registers one GET
//! route per configured page, and serves the composed pages with axum. The
//! pure rendering pipeline lives in `ssr_gateway_core`.
//!
//! # Example
//!
//! ```no_run
//! use ssr_gateway::{create_app, ContentError, GatewayConfig, PageRequest, ProducerRegistry, RenderResult, RouteConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let registry = ProducerRegistry::new().with_producer("home", |request: PageRequest| async move {
//!     Ok::<_, ContentError>(RenderResult::page(format!("<h1>{}</h1>", request.path)))
//! });
//!
//! let config = GatewayConfig {
//!     routes: vec![RouteConfig::new("/").with_producer("home")],
//!     ..GatewayConfig::default()
//! };
//!
//! let app = create_app(&config, &registry)?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod assets;
pub mod config;
pub mod error;
pub mod handlers;
pub mod registry;

pub use app::{create_app, render_options};
pub use config::{ContentDescriptor, GatewayConfig, RouteConfig};
pub use error::{PageError, Result, SetupError};
pub use registry::ProducerRegistry;

// Re-export core types producers are written against
pub use ssr_gateway_core::{
    Content, ContentError, ContentProducer, PageRequest, RenderOptions, RenderResult,
};
