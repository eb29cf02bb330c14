//! Fragment Gateway Library
//!
//! Resolves a request path to a layout and an ordered list of fragments,
//! fetches them concurrently from an upstream content service, and stitches
//! them into a single page.

pub mod assembly;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod multiplexer;
pub mod observability;
pub mod routing;
pub mod security;

pub use assembly::{AssemblyOptions, ResponseBuilder};
pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use multiplexer::{FetchError, FetchResult, FetchSpec, Transport};
pub use routing::Router;
