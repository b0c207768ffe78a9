// # DNS Record Reconciler
//
// Translates create/read/update/delete of a declared DNS record into Edge
// DNS API calls.
//
// ## Create
//
// ```text
// get_record(triple)
//   NotFound        -> create_record(spec, process(spec.target))             Created
//   Found(existing) -> process(existing.target)
//                        non-empty -> update_record(spec, processed)          Adopted
//                        empty     -> create_record(spec, process(spec.target)) Saved
//   other error     -> propagate
// ```
//
// A record that already exists out-of-band is merged into management,
// never reported as a conflict.
//
// ## Error Propagation
//
// - `NotFound` from `get_record` is a signal, never surfaced from `create`
//   or `read`
// - `NotFound` from `delete_record` counts as a successful delete
// - Everything else is returned unmodified; no retry happens here

use std::sync::Arc;
use tracing::{debug, info, warn};

use akamai_core::{Error, Result};

use crate::client::DnsClient;
use crate::model::{RecordBody, RecordSpec, RecordState, RecordTriple};

/// Which write `create` or `update` issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    /// No remote record existed; `create_record` with the processed declared data
    Created,
    /// A remote record existed; `update_record` with its processed data
    Adopted,
    /// A remote record existed but processed to nothing; `create_record`
    /// re-asserting the processed declared data
    Saved,
    /// `update_record` with the processed declared data
    Updated,
}

impl WriteAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteAction::Created => "created",
            WriteAction::Adopted => "adopted",
            WriteAction::Saved => "saved",
            WriteAction::Updated => "updated",
        }
    }
}

/// Outcome of a write operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Write that was issued
    pub action: WriteAction,
    /// Payload sent to the API
    pub body: RecordBody,
    /// Tracked state after the write
    pub state: RecordState,
}

/// Reconciles declared DNS records against the Edge DNS API
///
/// Holds no per-record state; the host serializes operations on one triple.
#[derive(Clone)]
pub struct DnsRecordReconciler {
    client: Arc<dyn DnsClient>,
}

impl std::fmt::Debug for DnsRecordReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsRecordReconciler")
            .field("client", &self.client.client_name())
            .finish()
    }
}

impl DnsRecordReconciler {
    pub fn new(client: Arc<dyn DnsClient>) -> Self {
        Self { client }
    }

    /// Bring a record that is not yet tracked under management
    pub async fn create(&self, spec: &RecordSpec) -> Result<Reconciled> {
        spec.validate()?;
        let triple = spec.triple();

        let (action, body) = match self
            .client
            .get_record(&spec.zone, &spec.name, spec.record_type)
            .await
        {
            Err(e) if e.is_not_found() => {
                debug!("Record {} not found, creating", triple);
                let target = self.processed_targets(spec)?;
                let body = spec.body(target);
                self.client.create_record(&body, &spec.zone).await?;
                (WriteAction::Created, body)
            }
            Err(e) => return Err(e),
            Ok(existing) => {
                let processed = self
                    .client
                    .process_rdata(&existing.target, spec.record_type)?;

                if processed.is_empty() {
                    debug!("Record {} exists with no usable data, saving declared data", triple);
                    let body = spec.body(self.processed_targets(spec)?);
                    self.client.create_record(&body, &spec.zone).await?;
                    (WriteAction::Saved, body)
                } else {
                    info!("Record {} already exists, adopting it", triple);
                    let body = spec.body(processed);
                    self.client.update_record(&body, &spec.zone).await?;
                    (WriteAction::Adopted, body)
                }
            }
        };

        info!("Record {} {}", triple, action.as_str());
        let state = self.state_after_write(&triple, &body).await?;

        Ok(Reconciled { action, body, state })
    }

    /// Fetch the tracked record
    ///
    /// # Returns
    ///
    /// - `Ok(Some(RecordState))`: The record exists
    /// - `Ok(None)`: The record is gone
    /// - `Err(Error)`: Any other failure, unmodified
    pub async fn read(&self, triple: &RecordTriple) -> Result<Option<RecordState>> {
        let existing = match self
            .client
            .get_record(&triple.zone, &triple.name, triple.record_type)
            .await
        {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                debug!("Record {} not found", triple);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let target = match self
            .client
            .process_rdata(&existing.target, triple.record_type)
        {
            Ok(processed) if !processed.is_empty() => processed,
            Ok(_) => existing.target.clone(),
            Err(e) => {
                warn!("Record {} has unprocessable data, keeping it verbatim: {}", triple, e);
                existing.target.clone()
            }
        };

        Ok(Some(self.state(triple, existing.ttl, existing.active, target)))
    }

    /// Push the declared data to a tracked record
    ///
    /// Always writes; skipping unchanged records is the host's decision.
    pub async fn update(&self, spec: &RecordSpec) -> Result<Reconciled> {
        spec.validate()?;
        let triple = spec.triple();

        let body = spec.body(self.processed_targets(spec)?);
        self.client.update_record(&body, &spec.zone).await?;
        info!("Record {} updated", triple);

        let state = self.state_after_write(&triple, &body).await?;

        Ok(Reconciled {
            action: WriteAction::Updated,
            body,
            state,
        })
    }

    /// Remove a tracked record
    ///
    /// A record that is already gone is deleted successfully.
    pub async fn delete(&self, triple: &RecordTriple) -> Result<()> {
        match self
            .client
            .delete_record(&RecordBody::identity(triple), &triple.zone)
            .await
        {
            Ok(()) => {
                info!("Record {} deleted", triple);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!("Record {} already absent", triple);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Adopt a record by its `zone#name#type` identity
    pub async fn import(&self, id: &str) -> Result<RecordState> {
        let triple = RecordTriple::from_id(id)?;
        self.read(&triple)
            .await?
            .ok_or_else(|| Error::not_found(format!("record {} does not exist", triple)))
    }

    /// Whether the tracked state already matches the declaration
    ///
    /// Record data is compared in parsed form, so ordering and spelling
    /// differences do not count as drift.
    pub fn in_sync(&self, spec: &RecordSpec, state: &RecordState) -> bool {
        spec.triple() == state.triple()
            && spec.ttl == state.ttl
            && spec.active == state.active
            && self.client.parse_rdata(spec.record_type, &spec.target) == state.parsed
    }

    fn processed_targets(&self, spec: &RecordSpec) -> Result<Vec<String>> {
        let processed = self.client.process_rdata(&spec.target, spec.record_type)?;
        if processed.is_empty() {
            return Err(Error::validation(format!(
                "{} record {} has no usable target data",
                spec.record_type, spec.name
            )));
        }
        Ok(processed)
    }

    /// Read back after a write, falling back to the written payload
    async fn state_after_write(&self, triple: &RecordTriple, body: &RecordBody) -> Result<RecordState> {
        match self.read(triple).await? {
            Some(state) => Ok(state),
            None => {
                warn!("Record {} not visible after write, using written data", triple);
                Ok(self.state(triple, body.ttl, body.active, body.target.clone()))
            }
        }
    }

    fn state(&self, triple: &RecordTriple, ttl: u32, active: bool, target: Vec<String>) -> RecordState {
        let parsed = self.client.parse_rdata(triple.record_type, &target);
        RecordState {
            id: triple.id(),
            zone: triple.zone.clone(),
            name: triple.name.clone(),
            record_type: triple.record_type,
            ttl,
            active,
            target,
            parsed,
        }
    }
}
