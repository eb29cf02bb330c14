//! Concurrent fragment fetching.
//!
//! # Data Flow
//! ```text
//! FetchSpec (ordered targets, deadline, headers, secret, strictness)
//!     → request.rs (spawn one task per target, supervise)
//!         → signing.rs (HMAC headers, when a secret is set)
//!         → transport.rs (send, buffer body, no redirects)
//!         → decode.rs (gunzip)
//!     → Vec<FetchResult> in target order, or the first FetchError
//! ```
//!
//! # Task States
//! ```text
//! per task:   Pending → InFlight → Completed | Failed | Cancelled
//! supervisor: Running → AllCompleted | ErrorObserved | TimedOut → Done
//! ```
//!
//! # Design Decisions
//! - All fragments or none; a failed or slow fragment fails the page
//! - Non-2xx is a failure in strict mode (the default)
//! - The transport is injected so tests can observe and delay fetches

pub mod cancel;
pub mod decode;
pub mod error;
pub mod request;
pub mod result;
pub mod signing;
pub mod transport;

pub use cancel::CancelSignal;
pub use error::{FetchError, ResultError};
pub use request::{FetchSpec, FetchTarget};
pub use result::FetchResult;
pub use transport::{HyperTransport, Transport, TransportError};
