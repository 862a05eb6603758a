//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, limits)
//!     → rewrite.rs (host + path → rewritten path via routing)
//!     → request.rs (build origin request, strip hop-by-hop headers)
//!     → storage origin
//!     → response.rs (strip hop-by-hop headers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod rewrite;
pub mod server;

pub use request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, EdgeServer};
