//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request headers:
//!     → headers.rs (strip hop-by-hop, add X-Forwarded-*)
//!     → sent with every upstream fetch
//!
//! Upstream fetch:
//!     → multiplexer::signing (HMAC Authorization, when a secret is set)
//! ```
//!
//! # Design Decisions
//! - No trust in client input: connection-scoped headers never reach upstream
//! - Signing keeps the upstream stateless; it checks the timestamp itself

pub mod headers;
