//! Provider error types.
//!
//! Defined in `coniuga-core` so callers can classify failures without
//! depending on this crate; re-exported here for the backends.

pub use coniuga_core::error::ProviderError;
