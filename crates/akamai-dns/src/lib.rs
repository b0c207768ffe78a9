// # Edge DNS Sub-provider
//
// DNS record management for the Akamai provider: the `akamai_dns_record`
// resource, the `akamai_dns_record_set` data source, the reconciler behind
// them and the Edge DNS API client.
//
// ## Layout
//
// - `model`: declared record, API payload and tracked state
// - `rdata`: record data normalization and field parsing
// - `client`: the `DnsClient` trait the reconciler consumes
// - `edgegrid` / `edgedns`: signed HTTPS implementation of `DnsClient`
// - `reconciler`: create/read/update/delete decision logic
// - `resource`: JSON adapters registered with the provider registry
//
// ## Behavior
//
// - No retry, no backoff; failures are returned to the host unmodified
// - A record that already exists is adopted on create, never a conflict
// - The response cache is optional; results are identical without it
//
// ## Usage
//
// ```rust,ignore
// use akamai_core::{OperationMeta, ProviderConfig, ProviderRegistry};
// use akamai_dns::DnsSubprovider;
//
// let registry = ProviderRegistry::builder()
//     .with_subprovider(Arc::new(DnsSubprovider::new()))
//     .build()?;
// registry.configure(&OperationMeta::new(), &ProviderConfig::default())?;
// ```

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use akamai_core::{
    DataSource, OperationMeta, ProviderConfig, Resource, ResponseCache, Result, SchemaMap,
    Subprovider,
};

pub mod client;
pub mod edgedns;
pub mod edgegrid;
pub mod model;
pub mod rdata;
pub mod reconciler;
pub mod resource;

pub use client::DnsClient;
pub use edgedns::EdgeDnsClient;
pub use edgegrid::EdgeGridSigner;
pub use model::{ParsedData, RecordBody, RecordSpec, RecordState, RecordTriple, RecordType};
pub use reconciler::{DnsRecordReconciler, Reconciled, WriteAction};
pub use resource::{
    DNS_RECORD_RESOURCE, DNS_RECORD_SET_DATA_SOURCE, DnsRecordResource, DnsRecordSetDataSource,
};

use resource::ClientSlot;

/// The DNS sub-provider
///
/// Resources share one client slot, filled by [`Subprovider::configure`]
/// (or up front with [`DnsSubprovider::with_client`]).
pub struct DnsSubprovider {
    client: ClientSlot,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl std::fmt::Debug for DnsSubprovider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsSubprovider")
            .field("client", &self.client.get().map(|c| c.client_name()))
            .field("cache", &self.cache.is_some())
            .finish()
    }
}

impl DnsSubprovider {
    /// Sub-provider that builds an [`EdgeDnsClient`] when configured
    pub fn new() -> Self {
        Self {
            client: Arc::new(OnceLock::new()),
            cache: None,
        }
    }

    /// Sub-provider using an already built client
    ///
    /// `configure` keeps this client instead of reading credentials.
    pub fn with_client(client: Arc<dyn DnsClient>) -> Self {
        let slot: ClientSlot = Arc::new(OnceLock::new());
        let _ = slot.set(client);
        Self { client: slot, cache: None }
    }

    /// Memoize API reads in `cache`
    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }
}

impl Default for DnsSubprovider {
    fn default() -> Self {
        Self::new()
    }
}

impl Subprovider for DnsSubprovider {
    fn name(&self) -> &'static str {
        "dns"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn schema(&self) -> SchemaMap {
        SchemaMap::new()
    }

    fn resources(&self) -> HashMap<String, Arc<dyn Resource>> {
        let mut resources: HashMap<String, Arc<dyn Resource>> = HashMap::new();
        resources.insert(
            DNS_RECORD_RESOURCE.to_string(),
            Arc::new(DnsRecordResource::new(self.client.clone())),
        );
        resources
    }

    fn data_sources(&self) -> HashMap<String, Arc<dyn DataSource>> {
        let mut data_sources: HashMap<String, Arc<dyn DataSource>> = HashMap::new();
        data_sources.insert(
            DNS_RECORD_SET_DATA_SOURCE.to_string(),
            Arc::new(DnsRecordSetDataSource::new(self.client.clone())),
        );
        data_sources
    }

    fn configure(&self, meta: &OperationMeta, config: &ProviderConfig) -> Result<()> {
        let _span = meta.span("dns").entered();

        if let Some(existing) = self.client.get() {
            tracing::debug!("DNS client already configured ({})", existing.client_name());
            return Ok(());
        }

        let credentials = config.load_credentials()?;
        tracing::info!(
            "Configuring Edge DNS client for host {} (section {})",
            credentials.host,
            config.config_section
        );
        let client = EdgeDnsClient::new(credentials, self.cache.clone())?;

        // A concurrent configure may have won; either client is equivalent
        let _ = self.client.set(Arc::new(client));
        Ok(())
    }
}
