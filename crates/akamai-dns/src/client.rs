// # DNS Client Trait
//
// Defines the slice of the Edge DNS management API the record reconciler
// consumes.
//
// ## Implementations
//
// - `EdgeDnsClient`: signed HTTPS calls against `/config-dns/v2`
// - Test doubles in `tests/common`
//
// ## Usage
//
// ```rust,ignore
// use akamai_dns::{DnsClient, RecordType};
//
// let record = client.get_record("example.com", "www.example.com", RecordType::A).await?;
// let targets = client.process_rdata(&record.target, RecordType::A)?;
// ```

use async_trait::async_trait;

use akamai_core::Result;

use crate::model::{ParsedData, RecordBody, RecordType};
use crate::rdata;

/// Client for the Edge DNS record API
///
/// # Error Contract
///
/// - A missing record is reported as `Error::NotFound`, distinct from every
///   other failure
/// - No retries and no backoff; each method issues at most one request
/// - `process_rdata` and `parse_rdata` never touch the network
#[async_trait]
pub trait DnsClient: Send + Sync {
    /// Fetch the record at `(zone, name, record_type)`
    ///
    /// # Returns
    ///
    /// - `Ok(RecordBody)`: The remote record
    /// - `Err(Error::NotFound)`: No such record
    /// - `Err(Error)`: Any other failure
    async fn get_record(&self, zone: &str, name: &str, record_type: RecordType)
    -> Result<RecordBody>;

    /// Create a record in `zone`
    async fn create_record(&self, record: &RecordBody, zone: &str) -> Result<()>;

    /// Replace a record in `zone`
    async fn update_record(&self, record: &RecordBody, zone: &str) -> Result<()>;

    /// Delete a record from `zone`
    async fn delete_record(&self, record: &RecordBody, zone: &str) -> Result<()>;

    /// Normalize record data for writing
    ///
    /// An empty result means the data carries nothing to write.
    fn process_rdata(&self, values: &[String], record_type: RecordType) -> Result<Vec<String>> {
        rdata::process(values, record_type)
    }

    /// Split record data into comparable fields
    fn parse_rdata(&self, record_type: RecordType, values: &[String]) -> ParsedData {
        rdata::parse(record_type, values)
    }

    /// Get the client name (for logging/debugging)
    fn client_name(&self) -> &'static str;
}
