//! Core traits for the Akamai provider
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`Subprovider`]: A resource family contributing schema, resources and data sources
//! - [`Resource`]: Create/Read/Update/Delete over one managed resource type
//! - [`DataSource`]: Read-only lookup of remote state
//! - [`ResponseCache`]: Optional memoization of remote responses

pub mod resource;
pub mod response_cache;
pub mod subprovider;

pub use resource::{DataSource, Resource};
pub use response_cache::ResponseCache;
pub use subprovider::Subprovider;
