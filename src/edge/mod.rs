//! Edge platform adapters.
//!
//! The router only understands `(host, uri)`. This module unwraps the
//! platform's event envelope, routes, and hands back the request with nothing
//! but its `uri` changed.

pub mod event;

pub use event::{handle_event, EdgeEvent, EdgeRequest};
