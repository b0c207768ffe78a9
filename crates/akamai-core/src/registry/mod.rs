//! Provider registry
//!
//! The registry aggregates the schemas, resources and data sources of a
//! statically known list of sub-providers into one provider. It is built
//! once at startup and passed to whoever dispatches orchestrator calls;
//! there is no process-wide instance.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use akamai_core::registry::ProviderRegistry;
//!
//! let registry = ProviderRegistry::builder()
//!     .with_subprovider(Arc::new(DnsSubprovider::new()))
//!     .build()?;
//!
//! registry.configure(&OperationMeta::new(), &ProviderConfig::default())?;
//! let resource = registry.resource("akamai_dns_record")?;
//! ```
//!
//! ## Duplicate keys
//!
//! Two sub-providers contributing the same provider schema key, resource
//! type or data source name is a programming error. `build()` reports it as
//! [`Error::DuplicateSchemaKey`] and no registry is produced.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{DEFAULT_CONFIG_SECTION, ProviderConfig};
use crate::error::{Error, Result};
use crate::meta::OperationMeta;
use crate::schema::{SchemaField, SchemaMap, ValueType};
use crate::traits::{DataSource, Resource, Subprovider};

/// Path of the provider in the orchestrator's registry
pub const PROVIDER_REGISTRY_PATH: &str = "registry.terraform.io/akamai/akamai";

/// Legacy provider name, used in the user agent
pub const PROVIDER_NAME: &str = "terraform-provider-akamai";

/// Provider-level schema shared by every sub-provider
pub fn base_schema() -> SchemaMap {
    let mut schema = SchemaMap::new();
    schema.insert(
        "edgerc".to_string(),
        SchemaField::optional(ValueType::String)
            .with_env_default("EDGERC")
            .with_description("Path to the edgerc file holding API credentials"),
    );
    schema.insert(
        "config_section".to_string(),
        SchemaField::optional(ValueType::String)
            .with_default(serde_json::json!(DEFAULT_CONFIG_SECTION))
            .with_description("The section of the edgerc file to use for configuration"),
    );
    schema
}

/// Builder collecting sub-providers before they are merged
#[derive(Default)]
pub struct ProviderRegistryBuilder {
    subproviders: Vec<Arc<dyn Subprovider>>,
}

impl ProviderRegistryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sub-provider
    pub fn with_subprovider(mut self, subprovider: Arc<dyn Subprovider>) -> Self {
        self.subproviders.push(subprovider);
        self
    }

    /// Merge all sub-providers into a registry
    ///
    /// # Returns
    ///
    /// - `Ok(ProviderRegistry)`: The merged provider
    /// - `Err(Error::DuplicateSchemaKey)`: Two sub-providers share a key or name
    pub fn build(self) -> Result<ProviderRegistry> {
        let mut registry = ProviderRegistry {
            schema: base_schema(),
            resources: HashMap::new(),
            data_sources: HashMap::new(),
            subproviders: BTreeMap::new(),
        };

        for sub in self.subproviders {
            let name = sub.name();
            debug!("Merging sub-provider {} v{}", name, sub.version());

            merge(sub.schema(), &mut registry.schema)?;
            merge(sub.resources(), &mut registry.resources)?;
            merge(sub.data_sources(), &mut registry.data_sources)?;

            if registry.subproviders.contains_key(name) {
                return Err(Error::duplicate_key(format!("subprovider {}", name)));
            }
            registry.subproviders.insert(name, sub);
        }

        info!(
            "Provider registry built: {} sub-provider(s), {} resource(s), {} data source(s)",
            registry.subproviders.len(),
            registry.resources.len(),
            registry.data_sources.len()
        );

        Ok(registry)
    }
}

/// Copy every entry of `from` into `to`, failing on the first key already present
fn merge<K, V, I, M>(from: I, to: &mut M) -> Result<()>
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, V)>,
    M: MapInsert<V>,
{
    for (key, value) in from {
        let key = key.as_ref();
        if to.contains(key) {
            return Err(Error::duplicate_key(key));
        }
        to.insert(key.to_string(), value);
    }
    Ok(())
}

/// The two map shapes the registry merges into
trait MapInsert<V> {
    fn contains(&self, key: &str) -> bool;
    fn insert(&mut self, key: String, value: V);
}

impl<V> MapInsert<V> for HashMap<String, V> {
    fn contains(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn insert(&mut self, key: String, value: V) {
        HashMap::insert(self, key, value);
    }
}

impl<V> MapInsert<V> for BTreeMap<String, V> {
    fn contains(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn insert(&mut self, key: String, value: V) {
        BTreeMap::insert(self, key, value);
    }
}

/// Aggregated provider: schema, resources and data sources of all sub-providers
pub struct ProviderRegistry {
    schema: SchemaMap,
    resources: HashMap<String, Arc<dyn Resource>>,
    data_sources: HashMap<String, Arc<dyn DataSource>>,
    subproviders: BTreeMap<&'static str, Arc<dyn Subprovider>>,
}

impl ProviderRegistry {
    /// Start building a registry
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::new()
    }

    /// Merged provider-level schema
    pub fn schema(&self) -> &SchemaMap {
        &self.schema
    }

    /// Look up a resource by its type identifier
    pub fn resource(&self, name: &str) -> Result<Arc<dyn Resource>> {
        self.resources
            .get(name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown resource type: {}", name)))
    }

    /// Look up a data source by name
    pub fn data_source(&self, name: &str) -> Result<Arc<dyn DataSource>> {
        self.data_sources
            .get(name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown data source: {}", name)))
    }

    /// Check if a resource type is registered
    pub fn has_resource(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    /// List all registered resource types, sorted
    pub fn list_resources(&self) -> Vec<String> {
        let mut names: Vec<String> = self.resources.keys().cloned().collect();
        names.sort();
        names
    }

    /// List all registered data sources, sorted
    pub fn list_data_sources(&self) -> Vec<String> {
        let mut names: Vec<String> = self.data_sources.keys().cloned().collect();
        names.sort();
        names
    }

    /// List sub-providers as `(name, version)` pairs
    pub fn list_subproviders(&self) -> Vec<(&'static str, &'static str)> {
        self.subproviders
            .values()
            .map(|sub| (sub.name(), sub.version()))
            .collect()
    }

    /// Configure every sub-provider
    ///
    /// Stops at the first sub-provider that fails.
    pub fn configure(&self, meta: &OperationMeta, config: &ProviderConfig) -> Result<()> {
        let _span = meta.span("provider").entered();
        config.validate()?;

        for (name, sub) in &self.subproviders {
            debug!("Configuring sub-provider {}", name);
            sub.configure(meta, config)?;
        }

        Ok(())
    }

    /// User agent sent with API requests
    pub fn user_agent(host_version: &str) -> String {
        format!(
            "{}/{} ({}) {}",
            PROVIDER_NAME,
            env!("CARGO_PKG_VERSION"),
            PROVIDER_REGISTRY_PATH,
            host_version
        )
        .trim_end()
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullResource;

    #[async_trait]
    impl Resource for NullResource {
        fn schema(&self) -> SchemaMap {
            SchemaMap::new()
        }

        async fn create(&self, _meta: &OperationMeta, config: &Value) -> Result<Value> {
            Ok(config.clone())
        }

        async fn read(&self, _meta: &OperationMeta, state: &Value) -> Result<Option<Value>> {
            Ok(Some(state.clone()))
        }

        async fn update(&self, _meta: &OperationMeta, config: &Value) -> Result<Value> {
            Ok(config.clone())
        }

        async fn delete(&self, _meta: &OperationMeta, _state: &Value) -> Result<()> {
            Ok(())
        }
    }

    struct MockSubprovider {
        name: &'static str,
        schema_key: &'static str,
        resource: &'static str,
        configure_calls: Arc<AtomicUsize>,
    }

    impl MockSubprovider {
        fn new(name: &'static str, schema_key: &'static str, resource: &'static str) -> Self {
            Self {
                name,
                schema_key,
                resource,
                configure_calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl Subprovider for MockSubprovider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn version(&self) -> &'static str {
            "1.0.0"
        }

        fn schema(&self) -> SchemaMap {
            let mut schema = SchemaMap::new();
            schema.insert(
                self.schema_key.to_string(),
                SchemaField::optional(ValueType::String),
            );
            schema
        }

        fn resources(&self) -> HashMap<String, Arc<dyn Resource>> {
            let mut resources: HashMap<String, Arc<dyn Resource>> = HashMap::new();
            resources.insert(self.resource.to_string(), Arc::new(NullResource));
            resources
        }

        fn data_sources(&self) -> HashMap<String, Arc<dyn DataSource>> {
            HashMap::new()
        }

        fn configure(&self, _meta: &OperationMeta, _config: &ProviderConfig) -> Result<()> {
            self.configure_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_registry_merges_subproviders() {
        let registry = ProviderRegistry::builder()
            .with_subprovider(Arc::new(MockSubprovider::new("dns", "dns_section", "akamai_dns_record")))
            .with_subprovider(Arc::new(MockSubprovider::new("gtm", "gtm_section", "akamai_gtm_domain")))
            .build()
            .unwrap();

        assert!(registry.has_resource("akamai_dns_record"));
        assert_eq!(
            registry.list_resources(),
            vec!["akamai_dns_record".to_string(), "akamai_gtm_domain".to_string()]
        );
        assert!(registry.schema().contains_key("edgerc"));
        assert!(registry.schema().contains_key("dns_section"));
        assert_eq!(registry.list_subproviders().len(), 2);
    }

    #[test]
    fn test_duplicate_resource_is_an_error() {
        let result = ProviderRegistry::builder()
            .with_subprovider(Arc::new(MockSubprovider::new("dns", "a", "akamai_dns_record")))
            .with_subprovider(Arc::new(MockSubprovider::new("dns2", "b", "akamai_dns_record")))
            .build();

        match result {
            Err(Error::DuplicateSchemaKey(key)) => assert_eq!(key, "akamai_dns_record"),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("duplicate resource must be rejected"),
        }
    }

    #[test]
    fn test_subprovider_cannot_shadow_base_schema() {
        let result = ProviderRegistry::builder()
            .with_subprovider(Arc::new(MockSubprovider::new("dns", "edgerc", "akamai_dns_record")))
            .build();

        assert!(matches!(result, Err(Error::DuplicateSchemaKey(_))));
    }

    #[test]
    fn test_unknown_resource() {
        let registry = ProviderRegistry::builder().build().unwrap();
        assert!(registry.resource("akamai_dns_record").is_err());
        assert!(registry.data_source("akamai_dns_record_set").is_err());
    }

    #[test]
    fn test_configure_reaches_every_subprovider() {
        let dns = Arc::new(MockSubprovider::new("dns", "a", "akamai_dns_record"));
        let calls = Arc::clone(&dns.configure_calls);

        let registry = ProviderRegistry::builder()
            .with_subprovider(dns)
            .build()
            .unwrap();

        registry
            .configure(&OperationMeta::new(), &ProviderConfig::default())
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_user_agent() {
        let ua = ProviderRegistry::user_agent("terraform/1.5.0");
        assert!(ua.starts_with("terraform-provider-akamai/"));
        assert!(ua.contains(PROVIDER_REGISTRY_PATH));
        assert!(ua.ends_with("terraform/1.5.0"));
    }
}
