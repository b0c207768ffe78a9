//! Sub-provider trait
//!
//! Each resource family (DNS, property, security, ...) implements
//! [`Subprovider`] and is handed to the registry builder, which merges the
//! contributed schemas, resources and data sources into one provider.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::meta::OperationMeta;
use crate::schema::SchemaMap;
use crate::traits::{DataSource, Resource};

/// Capability set of a resource family
pub trait Subprovider: Send + Sync {
    /// Name of the sub-provider (e.g. "dns")
    fn name(&self) -> &'static str;

    /// Version of the sub-provider
    fn version(&self) -> &'static str;

    /// Provider-level schema keys contributed by this sub-provider
    fn schema(&self) -> SchemaMap;

    /// Resources keyed by resource-type identifier
    fn resources(&self) -> HashMap<String, Arc<dyn Resource>>;

    /// Data sources keyed by data-source identifier
    fn data_sources(&self) -> HashMap<String, Arc<dyn DataSource>>;

    /// Prepare the sub-provider's API client from provider configuration
    ///
    /// Called once per provider configuration, before any resource operation.
    fn configure(&self, meta: &OperationMeta, config: &ProviderConfig) -> Result<(), crate::Error>;
}
