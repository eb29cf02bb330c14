//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → routing (match path, capture params)
//!     → upstream.rs (layout and fragment URLs)
//!     → multiplexer (concurrent fetch)
//!     → assembly (merge headers, fill layout)  |  response.rs (error status)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod upstream;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
pub use upstream::UpstreamTarget;
