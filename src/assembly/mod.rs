//! Response assembly.
//!
//! # Data Flow
//! ```text
//! Vec<FetchResult> (slot 0 = layout when the route has one)
//!     → builder.rs (layout headers minus ignore set, status)
//!     → builder.rs (concatenate fragment bodies, resolve title)
//!     → template.rs (fill content and title placeholders once each)
//!     → axum Response
//! ```

pub mod builder;
pub mod template;

pub use builder::{resolve_title, AssemblyOptions, IgnoreHeaders, ResponseBuilder, X_VIEW_PROXY_TITLE};
pub use template::{CONTENT_PLACEHOLDER, TITLE_PLACEHOLDER};
