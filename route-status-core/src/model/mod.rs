//! Data model for route/restriction matching
//!
//! Contains the route geometry, resolved address metadata and the typed
//! restriction table built from the traffic feed.

pub mod address;
pub mod restriction;
pub mod route;

pub use address::Address;
pub use restriction::{RestrictionRecord, RestrictionTable};
pub use route::Route;
