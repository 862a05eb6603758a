//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, uri)
//!     → host.rs (tenant from first label, or none)
//!     → router.rs (base directory: /<tenant> or /production)
//!     → path.rs (file or route, by final path segment)
//!     → router.rs (prefix file once, or collapse route onto index document)
//!     → Rewrite { uri, base_dir, kind, tenant }
//! ```
//!
//! # Design Decisions
//! - Pure and synchronous: no I/O, no shared mutable state
//! - Deterministic: same input always yields the same rewrite
//! - Router built from config, swapped whole on reload

pub mod host;
pub mod path;
pub mod router;

pub use host::Tenant;
pub use path::RequestKind;
pub use router::{rewrite_uri, BaseDirectory, EdgeRouter, Rewrite};
