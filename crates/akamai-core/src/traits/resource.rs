// # Resource Trait
//
// Defines the orchestrator-facing contract of a managed resource type.
//
// ## Contract
//
// The host invokes one operation at a time per resource instance and
// serializes operations targeting the same remote entity. Operations for
// different entities may run concurrently, so implementations keep no
// per-instance mutable state between calls.
//
// Declared configuration and resulting state are exchanged as
// `serde_json::Value` objects whose keys follow the resource's schema.
//
// ## Usage
//
// ```rust,ignore
// use akamai_core::{OperationMeta, Resource};
//
// let meta = OperationMeta::new();
// let resource = registry.resource("akamai_dns_record")?;
// let state = resource.create(&meta, &config).await?;
// ```

use async_trait::async_trait;
use serde_json::Value;

use crate::meta::OperationMeta;
use crate::schema::SchemaMap;

/// A managed resource type
///
/// # Error Propagation
///
/// Implementations never retry. Remote failures are returned unmodified so
/// the host applies its own retry policy. `Error::NotFound` is only
/// returned where the caller cannot recover from a missing entity; `read`
/// reports a missing entity as `Ok(None)`.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Attribute schema of this resource type
    fn schema(&self) -> SchemaMap;

    /// Create the remote entity described by `config`
    ///
    /// # Returns
    ///
    /// - `Ok(Value)`: The new tracked state (including its `id`)
    /// - `Err(Error)`: Validation or remote failure
    async fn create(&self, meta: &OperationMeta, config: &Value) -> Result<Value, crate::Error>;

    /// Refresh tracked state from the remote API
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Value))`: Current remote state
    /// - `Ok(None)`: The entity no longer exists
    /// - `Err(Error)`: Remote failure
    async fn read(&self, meta: &OperationMeta, state: &Value)
    -> Result<Option<Value>, crate::Error>;

    /// Push the declared `config` to an already tracked entity
    async fn update(&self, meta: &OperationMeta, config: &Value) -> Result<Value, crate::Error>;

    /// Whether tracked `state` already matches the declared `config`
    ///
    /// Hosts skip `update` when this returns `true`. The default always
    /// reports drift.
    fn in_sync(&self, _config: &Value, _state: &Value) -> Result<bool, crate::Error> {
        Ok(false)
    }

    /// Remove the tracked entity
    ///
    /// Deleting an entity that is already gone succeeds.
    async fn delete(&self, meta: &OperationMeta, state: &Value) -> Result<(), crate::Error>;

    /// Adopt an existing entity by its identifier
    ///
    /// Resource types that cannot be imported keep the default.
    async fn import(&self, _meta: &OperationMeta, id: &str) -> Result<Value, crate::Error> {
        Err(crate::Error::validation(format!(
            "import is not supported for this resource (id: {})",
            id
        )))
    }
}

/// A read-only data source
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Attribute schema of this data source
    fn schema(&self) -> SchemaMap;

    /// Look up remote state matching `config`
    ///
    /// Unlike [`Resource::read`], a missing entity is an error here.
    async fn read(&self, meta: &OperationMeta, config: &Value) -> Result<Value, crate::Error>;
}
