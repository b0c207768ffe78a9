// # akamai-core
//
// Core library for the Akamai provider plugin.
//
// ## Architecture Overview
//
// The host orchestrator owns planning, diffing and retries. This library
// provides the seams the provider plugs into it:
// - **Subprovider**: A resource family contributing schema, resources and data sources
// - **Resource**: Create/Read/Update/Delete for one managed resource type
// - **ProviderRegistry**: Explicitly built aggregate of all sub-providers
// - **ResponseCache**: Optional fixed-TTL memoization of API responses
// - **OperationMeta**: Operation id threaded through each call for log correlation
//
// ## Design Principles
//
// 1. **No hidden globals**: The registry is built once and passed down
// 2. **Static plugin list**: Sub-providers are handed to the builder, never discovered
// 3. **Errors over panics**: Duplicate keys and bad configuration are returned as errors
// 4. **Host-owned retries**: Remote failures propagate unmodified

pub mod cache;
pub mod config;
pub mod error;
pub mod meta;
pub mod registry;
pub mod schema;
pub mod traits;

// Re-export core types for convenience
pub use cache::MemoryResponseCache;
pub use config::{EdgeGridCredentials, ProviderConfig};
pub use error::{Error, Result};
pub use meta::OperationMeta;
pub use registry::{ProviderRegistry, ProviderRegistryBuilder};
pub use schema::{SchemaField, SchemaMap, ValueType};
pub use traits::{DataSource, Resource, ResponseCache, Subprovider};
