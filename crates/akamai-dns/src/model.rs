//! DNS record data model
//!
//! - [`RecordSpec`]: a record as declared by the user
//! - [`RecordBody`]: a record as the Edge DNS API sends and receives it
//! - [`RecordState`]: what the reconciler reports back to the host
//! - [`ParsedData`]: normalized record fields used for equality

use akamai_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Separator used in record identifiers (`zone#name#type`)
const ID_SEPARATOR: char = '#';

/// DNS record types managed by the record resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address
    A,
    /// IPv6 address
    Aaaa,
    /// Certification authority authorization
    Caa,
    /// Canonical name
    Cname,
    /// Mail exchanger
    Mx,
    /// Name server
    Ns,
    /// Pointer
    Ptr,
    /// Start of authority
    Soa,
    /// Service locator
    Srv,
    /// Text
    Txt,
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Caa => "CAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Soa => "SOA",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            "CAA" => Ok(RecordType::Caa),
            "CNAME" => Ok(RecordType::Cname),
            "MX" => Ok(RecordType::Mx),
            "NS" => Ok(RecordType::Ns),
            "PTR" => Ok(RecordType::Ptr),
            "SOA" => Ok(RecordType::Soa),
            "SRV" => Ok(RecordType::Srv),
            "TXT" => Ok(RecordType::Txt),
            other => Err(Error::validation(format!("unsupported record type: {}", other))),
        }
    }
}

/// The (zone, name, record type) tuple identifying one remote record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordTriple {
    /// Zone the record lives in
    pub zone: String,
    /// Owner name of the record
    pub name: String,
    /// Record type
    #[serde(rename = "recordtype")]
    pub record_type: RecordType,
}

impl RecordTriple {
    /// Create a triple
    pub fn new(zone: impl Into<String>, name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            zone: zone.into(),
            name: name.into(),
            record_type,
        }
    }

    /// Tracked identity of the record (`zone#name#type`)
    pub fn id(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.zone,
            self.name,
            self.record_type,
            sep = ID_SEPARATOR
        )
    }

    /// Parse a tracked identity back into a triple
    pub fn from_id(id: &str) -> Result<Self> {
        let parts: Vec<&str> = id.split(ID_SEPARATOR).collect();
        match parts.as_slice() {
            [zone, name, record_type] if !zone.is_empty() && !name.is_empty() => {
                Ok(Self::new(*zone, *name, record_type.parse()?))
            }
            _ => Err(Error::validation(format!(
                "invalid record id {:?}, expected zone#name#type",
                id
            ))),
        }
    }
}

impl fmt::Display for RecordTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zone, self.name, self.record_type)
    }
}

/// Record payload as exchanged with the Edge DNS API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordBody {
    /// Owner name
    pub name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Time-to-live in seconds
    #[serde(default)]
    pub ttl: u32,
    /// Whether the record is served
    #[serde(default = "default_active")]
    pub active: bool,
    /// Record data values
    #[serde(rename = "rdata", default)]
    pub target: Vec<String>,
}

impl RecordBody {
    /// A body carrying only the identifying fields (used for deletes)
    pub fn identity(triple: &RecordTriple) -> Self {
        Self {
            name: triple.name.clone(),
            record_type: triple.record_type,
            ttl: 0,
            active: true,
            target: Vec::new(),
        }
    }
}

/// A DNS record as declared in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSpec {
    /// Zone the record lives in
    pub zone: String,
    /// Owner name of the record
    pub name: String,
    /// Record type
    #[serde(rename = "recordtype")]
    pub record_type: RecordType,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Whether the record is served
    #[serde(default = "default_active")]
    pub active: bool,
    /// Raw record data values, in declaration order
    #[serde(default)]
    pub target: Vec<String>,
}

impl RecordSpec {
    /// Create a declaration with no targets and a 300 second TTL
    pub fn new(zone: impl Into<String>, name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            zone: zone.into(),
            name: name.into(),
            record_type,
            ttl: 300,
            active: true,
            target: Vec::new(),
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the record data values
    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable the record
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// The triple this declaration targets
    pub fn triple(&self) -> RecordTriple {
        RecordTriple::new(self.zone.clone(), self.name.clone(), self.record_type)
    }

    /// Build an API payload carrying the declared metadata and the given data
    pub fn body(&self, target: Vec<String>) -> RecordBody {
        RecordBody {
            name: self.name.clone(),
            record_type: self.record_type,
            ttl: self.ttl,
            active: self.active,
            target,
        }
    }

    /// Check the declared values before any remote call
    pub fn validate(&self) -> Result<()> {
        if self.zone.trim().is_empty() {
            return Err(Error::validation("zone cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(Error::validation("name cannot be empty"));
        }
        if self.zone.contains(ID_SEPARATOR) || self.name.contains(ID_SEPARATOR) {
            return Err(Error::validation(format!(
                "zone and name cannot contain {:?}",
                ID_SEPARATOR
            )));
        }
        if self.ttl == 0 {
            return Err(Error::validation("ttl must be greater than 0"));
        }
        if self.target.iter().all(|t| t.trim().is_empty()) {
            return Err(Error::validation(format!(
                "{} record {} requires at least one target",
                self.record_type, self.name
            )));
        }
        Ok(())
    }
}

/// Normalized record fields, compared to detect real drift
///
/// Keys are field names (`target`, `priority`, `serial`, ...); each value
/// lists that field for every record data entry, in a canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedData(BTreeMap<String, Vec<String>>);

impl ParsedData {
    /// Create an empty field map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to a field
    pub fn push(&mut self, field: &str, value: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(value.into());
    }

    /// Values of a field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Whether no field was parsed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Tracked state of a managed record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordState {
    /// Tracked identity (`zone#name#type`)
    pub id: String,
    /// Zone the record lives in
    pub zone: String,
    /// Owner name of the record
    pub name: String,
    /// Record type
    #[serde(rename = "recordtype")]
    pub record_type: RecordType,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Whether the record is served
    pub active: bool,
    /// Processed record data
    pub target: Vec<String>,
    /// Parsed record fields
    #[serde(default)]
    pub parsed: ParsedData,
}

impl RecordState {
    /// The triple this state tracks
    pub fn triple(&self) -> RecordTriple {
        RecordTriple::new(self.zone.clone(), self.name.clone(), self.record_type)
    }
}

fn default_active() -> bool {
    true
}
