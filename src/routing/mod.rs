//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (route lookup, registration order)
//!     → matcher.rs (segment-by-segment comparison, parameter capture)
//!     → Return: matched Route + Params, or NoMatch
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Compile path patterns into segments
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment equality only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by registration)

pub mod fragment;
pub mod matcher;
pub mod router;

pub use fragment::Fragment;
pub use matcher::{Params, PathPattern, Segment};
pub use router::{Route, RouteMatch, Router};
