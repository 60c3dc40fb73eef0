//! Output generation for serving the cached snapshot.
//!
//! The application itself never speaks HTTP to clients; it serializes the
//! snapshot where an external server can reach it.
//!
//! # Submodules
//!
//! - [`json`]: Writes the current [`CacheSnapshot`](crate::models::CacheSnapshot)
//!   to `headlines.json` in a target directory after each completed refresh

pub mod json;
