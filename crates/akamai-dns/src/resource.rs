//! Orchestrator adapters for DNS records
//!
//! [`DnsRecordResource`] (`akamai_dns_record`) and [`DnsRecordSetDataSource`]
//! (`akamai_dns_record_set`) convert JSON configuration and state into the
//! typed model and run the reconciler inside an operation span.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::{Arc, OnceLock};
use tracing::Instrument;

use akamai_core::{
    DataSource, Error, OperationMeta, Resource, Result, SchemaField, SchemaMap, ValueType,
};

use crate::client::DnsClient;
use crate::model::{RecordSpec, RecordState, RecordTriple, RecordType};
use crate::reconciler::{DnsRecordReconciler, Reconciled};

/// Resource-type identifier of the DNS record resource
pub const DNS_RECORD_RESOURCE: &str = "akamai_dns_record";

/// Identifier of the record set data source
pub const DNS_RECORD_SET_DATA_SOURCE: &str = "akamai_dns_record_set";

/// Client slot filled when the sub-provider is configured
pub(crate) type ClientSlot = Arc<OnceLock<Arc<dyn DnsClient>>>;

fn reconciler(slot: &ClientSlot) -> Result<DnsRecordReconciler> {
    slot.get()
        .cloned()
        .map(DnsRecordReconciler::new)
        .ok_or_else(|| Error::config("DNS sub-provider used before it was configured"))
}

fn from_json<T: for<'de> Deserialize<'de>>(value: &Value, what: &str) -> Result<T> {
    serde_json::from_value(value.clone())
        .map_err(|e| Error::validation(format!("invalid {}: {}", what, e)))
}

fn to_json(state: &RecordState) -> Result<Value> {
    Ok(serde_json::to_value(state)?)
}

/// Triple of a tracked record, from its state fields or its `id`
fn triple_from_state(state: &Value) -> Result<RecordTriple> {
    if let Ok(triple) = serde_json::from_value::<RecordTriple>(state.clone()) {
        return Ok(triple);
    }
    match state.get("id").and_then(Value::as_str) {
        Some(id) => RecordTriple::from_id(id),
        None => Err(Error::validation(
            "record state carries neither zone/name/recordtype nor id",
        )),
    }
}

/// The `akamai_dns_record` resource
pub struct DnsRecordResource {
    client: ClientSlot,
}

impl DnsRecordResource {
    pub(crate) fn new(client: ClientSlot) -> Self {
        Self { client }
    }

    fn log_write(outcome: &Reconciled) {
        tracing::debug!(
            "{} {} with {} value(s)",
            outcome.action.as_str(),
            outcome.state.id,
            outcome.body.target.len()
        );
    }
}

#[async_trait]
impl Resource for DnsRecordResource {
    fn schema(&self) -> SchemaMap {
        let mut schema = SchemaMap::new();
        schema.insert(
            "zone".to_string(),
            SchemaField::required(ValueType::String)
                .with_force_new()
                .with_description("Zone the record belongs to"),
        );
        schema.insert(
            "name".to_string(),
            SchemaField::required(ValueType::String)
                .with_force_new()
                .with_description("Owner name of the record"),
        );
        schema.insert(
            "recordtype".to_string(),
            SchemaField::required(ValueType::String)
                .with_force_new()
                .with_description("Record type (A, AAAA, CAA, CNAME, MX, NS, PTR, SOA, SRV, TXT)"),
        );
        schema.insert(
            "ttl".to_string(),
            SchemaField::required(ValueType::Int).with_description("Time-to-live in seconds"),
        );
        schema.insert(
            "active".to_string(),
            SchemaField::optional(ValueType::Bool)
                .with_default(json!(true))
                .with_description("Whether the record is served"),
        );
        schema.insert(
            "target".to_string(),
            SchemaField::required(ValueType::List).with_description("Record data values"),
        );
        schema
    }

    async fn create(&self, meta: &OperationMeta, config: &Value) -> Result<Value> {
        let reconciler = reconciler(&self.client)?;
        create_record(&reconciler, config)
            .instrument(meta.span(DNS_RECORD_RESOURCE))
            .await
    }

    async fn read(&self, meta: &OperationMeta, state: &Value) -> Result<Option<Value>> {
        let reconciler = reconciler(&self.client)?;
        read_record(&reconciler, state)
            .instrument(meta.span(DNS_RECORD_RESOURCE))
            .await
    }

    async fn update(&self, meta: &OperationMeta, config: &Value) -> Result<Value> {
        let reconciler = reconciler(&self.client)?;
        update_record(&reconciler, config)
            .instrument(meta.span(DNS_RECORD_RESOURCE))
            .await
    }

    fn in_sync(&self, config: &Value, state: &Value) -> Result<bool> {
        let reconciler = reconciler(&self.client)?;
        let spec: RecordSpec = from_json(config, "record configuration")?;
        let state: RecordState = from_json(state, "record state")?;
        Ok(reconciler.in_sync(&spec, &state))
    }

    async fn delete(&self, meta: &OperationMeta, state: &Value) -> Result<()> {
        let reconciler = reconciler(&self.client)?;
        delete_record(&reconciler, state)
            .instrument(meta.span(DNS_RECORD_RESOURCE))
            .await
    }

    async fn import(&self, meta: &OperationMeta, id: &str) -> Result<Value> {
        let reconciler = reconciler(&self.client)?;
        import_record(&reconciler, id)
            .instrument(meta.span(DNS_RECORD_RESOURCE))
            .await
    }
}

async fn create_record(reconciler: &DnsRecordReconciler, config: &Value) -> Result<Value> {
    let spec: RecordSpec = from_json(config, "record configuration")?;
    let outcome = reconciler.create(&spec).await?;
    DnsRecordResource::log_write(&outcome);
    to_json(&outcome.state)
}

async fn read_record(reconciler: &DnsRecordReconciler, state: &Value) -> Result<Option<Value>> {
    let triple = triple_from_state(state)?;
    reconciler.read(&triple).await?.as_ref().map(to_json).transpose()
}

async fn update_record(reconciler: &DnsRecordReconciler, config: &Value) -> Result<Value> {
    let spec: RecordSpec = from_json(config, "record configuration")?;
    let outcome = reconciler.update(&spec).await?;
    DnsRecordResource::log_write(&outcome);
    to_json(&outcome.state)
}

async fn delete_record(reconciler: &DnsRecordReconciler, state: &Value) -> Result<()> {
    let triple = triple_from_state(state)?;
    reconciler.delete(&triple).await
}

async fn import_record(reconciler: &DnsRecordReconciler, id: &str) -> Result<Value> {
    let state = reconciler.import(id).await?;
    to_json(&state)
}

#[derive(Debug, Deserialize)]
struct RecordSetQuery {
    zone: String,
    host: String,
    record_type: RecordType,
}

/// The `akamai_dns_record_set` data source
pub struct DnsRecordSetDataSource {
    client: ClientSlot,
}

impl DnsRecordSetDataSource {
    pub(crate) fn new(client: ClientSlot) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for DnsRecordSetDataSource {
    fn schema(&self) -> SchemaMap {
        let mut schema = SchemaMap::new();
        schema.insert("zone".to_string(), SchemaField::required(ValueType::String));
        schema.insert("host".to_string(), SchemaField::required(ValueType::String));
        schema.insert(
            "record_type".to_string(),
            SchemaField::required(ValueType::String),
        );
        schema.insert(
            "rdata".to_string(),
            SchemaField::optional(ValueType::List)
                .with_description("Record data of the matching record set (computed)"),
        );
        schema
    }

    async fn read(&self, meta: &OperationMeta, config: &Value) -> Result<Value> {
        let reconciler = reconciler(&self.client)?;
        lookup_record_set(&reconciler, config)
            .instrument(meta.span(DNS_RECORD_SET_DATA_SOURCE))
            .await
    }
}

async fn lookup_record_set(reconciler: &DnsRecordReconciler, config: &Value) -> Result<Value> {
    let query: RecordSetQuery = from_json(config, "record set query")?;
    let triple = RecordTriple::new(query.zone, query.host, query.record_type);

    let state = reconciler
        .read(&triple)
        .await?
        .ok_or_else(|| Error::not_found(format!("record set {} does not exist", triple)))?;

    Ok(json!({
        "id": state.id,
        "zone": state.zone,
        "host": state.name,
        "record_type": state.record_type,
        "rdata": state.target,
    }))
}
