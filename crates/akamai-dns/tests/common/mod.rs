//! Test doubles and common utilities for reconciler contract tests
//!
//! `MockDnsClient` behaves like a single-record Edge DNS zone: writes
//! store the record, reads return it. Tests can script the next
//! `get_record` answers and `process_rdata` results to reach specific
//! branches.

#![allow(dead_code)]

use akamai_core::{Error, Result};
use akamai_dns::{DnsClient, ParsedData, RecordBody, RecordSpec, RecordType};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const ZONE: &str = "exampleterraform.io";

/// Scripted answer to one `get_record` call
#[derive(Debug, Clone)]
pub enum GetResponse {
    /// The record does not exist
    NotFound,
    /// The record exists with this body
    Found(RecordBody),
    /// The API fails with this HTTP status
    Fail(u16),
}

/// Error the real client would return for an HTTP status
pub fn status_error(status: u16) -> Error {
    match status {
        401 | 403 => Error::auth(format!("status {}", status)),
        404 => Error::not_found(format!("status {}", status)),
        429 => Error::rate_limited(format!("status {}", status)),
        _ => Error::remote(status, format!("status {}", status)),
    }
}

/// A mock DnsClient that tracks calls
pub struct MockDnsClient {
    /// Scripted `get_record` answers, consumed before `stored` is consulted
    gets: Mutex<VecDeque<GetResponse>>,
    /// Current remote record
    stored: Mutex<Option<RecordBody>>,
    /// Scripted `process_rdata` results, consumed before the real transform
    processed: Mutex<VecDeque<Vec<String>>>,
    /// Status every write fails with, if set
    write_failure: Mutex<Option<u16>>,

    get_call_count: Arc<AtomicUsize>,
    create_call_count: Arc<AtomicUsize>,
    update_call_count: Arc<AtomicUsize>,
    delete_call_count: Arc<AtomicUsize>,
    process_call_count: Arc<AtomicUsize>,

    created: Arc<Mutex<Vec<RecordBody>>>,
    updated: Arc<Mutex<Vec<RecordBody>>>,
    deleted: Arc<Mutex<Vec<RecordBody>>>,
}

impl MockDnsClient {
    /// An empty zone
    pub fn new() -> Self {
        Self {
            gets: Mutex::new(VecDeque::new()),
            stored: Mutex::new(None),
            processed: Mutex::new(VecDeque::new()),
            write_failure: Mutex::new(None),
            get_call_count: Arc::new(AtomicUsize::new(0)),
            create_call_count: Arc::new(AtomicUsize::new(0)),
            update_call_count: Arc::new(AtomicUsize::new(0)),
            delete_call_count: Arc::new(AtomicUsize::new(0)),
            process_call_count: Arc::new(AtomicUsize::new(0)),
            created: Arc::new(Mutex::new(Vec::new())),
            updated: Arc::new(Mutex::new(Vec::new())),
            deleted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A zone already holding `record`
    pub fn with_record(record: RecordBody) -> Self {
        let client = Self::new();
        *client.stored.lock().unwrap() = Some(record);
        client
    }

    /// Queue the next `get_record` answers
    pub fn script_gets(&self, responses: impl IntoIterator<Item = GetResponse>) {
        self.gets.lock().unwrap().extend(responses);
    }

    /// Queue the next `process_rdata` results
    pub fn script_processed(&self, results: impl IntoIterator<Item = Vec<String>>) {
        self.processed.lock().unwrap().extend(results);
    }

    /// Make every write fail with `status`
    pub fn fail_writes(&self, status: u16) {
        *self.write_failure.lock().unwrap() = Some(status);
    }

    pub fn stored(&self) -> Option<RecordBody> {
        self.stored.lock().unwrap().clone()
    }

    pub fn get_call_count(&self) -> usize {
        self.get_call_count.load(Ordering::SeqCst)
    }

    pub fn create_call_count(&self) -> usize {
        self.create_call_count.load(Ordering::SeqCst)
    }

    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    pub fn delete_call_count(&self) -> usize {
        self.delete_call_count.load(Ordering::SeqCst)
    }

    pub fn process_call_count(&self) -> usize {
        self.process_call_count.load(Ordering::SeqCst)
    }

    /// Total writes of any kind
    pub fn write_call_count(&self) -> usize {
        self.create_call_count() + self.update_call_count() + self.delete_call_count()
    }

    pub fn created(&self) -> Vec<RecordBody> {
        self.created.lock().unwrap().clone()
    }

    pub fn updated(&self) -> Vec<RecordBody> {
        self.updated.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<RecordBody> {
        self.deleted.lock().unwrap().clone()
    }

    fn check_write(&self) -> Result<()> {
        match *self.write_failure.lock().unwrap() {
            Some(status) => Err(status_error(status)),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl DnsClient for MockDnsClient {
    async fn get_record(&self, _zone: &str, name: &str, record_type: RecordType) -> Result<RecordBody> {
        self.get_call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(scripted) = self.gets.lock().unwrap().pop_front() {
            return match scripted {
                GetResponse::NotFound => Err(Error::not_found(format!("{} {}", name, record_type))),
                GetResponse::Found(body) => Ok(body),
                GetResponse::Fail(status) => Err(status_error(status)),
            };
        }

        match self.stored.lock().unwrap().clone() {
            Some(body) if body.name == name && body.record_type == record_type => Ok(body),
            _ => Err(Error::not_found(format!("{} {}", name, record_type))),
        }
    }

    async fn create_record(&self, record: &RecordBody, _zone: &str) -> Result<()> {
        self.create_call_count.fetch_add(1, Ordering::SeqCst);
        self.created.lock().unwrap().push(record.clone());
        self.check_write()?;
        *self.stored.lock().unwrap() = Some(record.clone());
        Ok(())
    }

    async fn update_record(&self, record: &RecordBody, _zone: &str) -> Result<()> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        self.updated.lock().unwrap().push(record.clone());
        self.check_write()?;
        *self.stored.lock().unwrap() = Some(record.clone());
        Ok(())
    }

    async fn delete_record(&self, record: &RecordBody, _zone: &str) -> Result<()> {
        self.delete_call_count.fetch_add(1, Ordering::SeqCst);
        self.deleted.lock().unwrap().push(record.clone());
        self.check_write()?;
        match self.stored.lock().unwrap().take() {
            Some(_) => Ok(()),
            None => Err(Error::not_found(format!("{} {}", record.name, record.record_type))),
        }
    }

    fn process_rdata(&self, values: &[String], record_type: RecordType) -> Result<Vec<String>> {
        self.process_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(scripted) = self.processed.lock().unwrap().pop_front() {
            return Ok(scripted);
        }
        akamai_dns::rdata::process(values, record_type)
    }

    fn parse_rdata(&self, record_type: RecordType, values: &[String]) -> ParsedData {
        akamai_dns::rdata::parse(record_type, values)
    }

    fn client_name(&self) -> &'static str {
        "mock"
    }
}

/// Declaration of an A record at the zone apex
pub fn a_record(targets: &[&str]) -> RecordSpec {
    RecordSpec::new(ZONE, ZONE, RecordType::A).with_targets(targets.iter().copied())
}

/// Remote body for `name`/`record_type` holding `targets`
pub fn remote(name: &str, record_type: RecordType, targets: &[&str]) -> RecordBody {
    RecordBody {
        name: name.to_string(),
        record_type,
        ttl: 300,
        active: true,
        target: targets.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
