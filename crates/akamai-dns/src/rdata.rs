//! Record data normalization
//!
//! [`process`] turns raw record data into the canonical form written to the
//! API. [`parse`] splits record data into named fields for comparison.
//! Both are pure.
//!
//! Normalization per type:
//!
//! | Type              | Canonical form                                   |
//! |-------------------|--------------------------------------------------|
//! | A / AAAA          | parsed IP address (AAAA in RFC 5952 form)        |
//! | CNAME / NS / PTR  | lowercase host name, no trailing dot             |
//! | MX                | `priority host`                                  |
//! | SRV               | `priority weight port host`                      |
//! | CAA               | `flags tag "value"`                              |
//! | TXT               | double-quoted text                               |
//! | SOA               | `mname rname serial refresh retry expire minimum`|
//!
//! Duplicates are removed keeping the first occurrence. Blank values are
//! skipped, so input with no data yields an empty result.

use std::net::{Ipv4Addr, Ipv6Addr};

use akamai_core::{Error, Result};

use crate::model::{ParsedData, RecordType};

/// Normalize raw record data for `record_type`
///
/// # Returns
///
/// - `Ok(Vec<String>)`: Canonical values, possibly empty
/// - `Err(Error::Validation)`: A value is malformed for the record type
pub fn process(values: &[String], record_type: RecordType) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());

    for raw in values {
        let value = raw.trim();
        if value.is_empty() {
            continue;
        }
        let normalized = normalize(value, record_type)?;
        if !out.contains(&normalized) {
            out.push(normalized);
        }
    }

    Ok(out)
}

/// Split record data into named fields
///
/// Values are normalized first (malformed values are kept verbatim) and
/// sorted, so two sets of data that only differ in spelling or order parse
/// to the same fields.
pub fn parse(record_type: RecordType, values: &[String]) -> ParsedData {
    let mut entries = process(values, record_type).unwrap_or_else(|_| {
        values
            .iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    });
    entries.sort();

    let fields = field_names(record_type);
    let mut parsed = ParsedData::new();

    for entry in &entries {
        if fields.len() == 1 {
            parsed.push(fields[0], entry.clone());
            continue;
        }
        let parts: Vec<&str> = entry.splitn(fields.len(), char::is_whitespace).collect();
        for (i, field) in fields.iter().enumerate() {
            parsed.push(field, parts.get(i).map(|p| p.trim()).unwrap_or_default());
        }
    }

    parsed
}

/// Field names produced by [`parse`] for a record type
fn field_names(record_type: RecordType) -> &'static [&'static str] {
    match record_type {
        RecordType::Mx => &["priority", "target"],
        RecordType::Srv => &["priority", "weight", "port", "target"],
        RecordType::Caa => &["flags", "tag", "value"],
        RecordType::Soa => &[
            "name_server",
            "email_address",
            "serial",
            "refresh",
            "retry",
            "expiry",
            "nxdomain_ttl",
        ],
        _ => &["target"],
    }
}

fn normalize(value: &str, record_type: RecordType) -> Result<String> {
    match record_type {
        RecordType::A => value
            .parse::<Ipv4Addr>()
            .map(|ip| ip.to_string())
            .map_err(|_| invalid(record_type, value, "not an IPv4 address")),
        RecordType::Aaaa => value
            .parse::<Ipv6Addr>()
            .map(|ip| ip.to_string())
            .map_err(|_| invalid(record_type, value, "not an IPv6 address")),
        RecordType::Cname | RecordType::Ns | RecordType::Ptr => host(value, record_type),
        RecordType::Mx => {
            let fields = split_exact(value, 2, record_type)?;
            let priority = number::<u16>(fields[0], record_type, value)?;
            Ok(format!("{} {}", priority, host(fields[1], record_type)?))
        }
        RecordType::Srv => {
            let fields = split_exact(value, 4, record_type)?;
            let priority = number::<u16>(fields[0], record_type, value)?;
            let weight = number::<u16>(fields[1], record_type, value)?;
            let port = number::<u16>(fields[2], record_type, value)?;
            Ok(format!(
                "{} {} {} {}",
                priority,
                weight,
                port,
                host(fields[3], record_type)?
            ))
        }
        RecordType::Caa => {
            let parts: Vec<&str> = value.splitn(3, char::is_whitespace).collect();
            if parts.len() != 3 {
                return Err(invalid(record_type, value, "expected flags tag value"));
            }
            let flags = number::<u8>(parts[0], record_type, value)?;
            let tag = parts[1].to_ascii_lowercase();
            if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(invalid(record_type, value, "tag must be alphanumeric"));
            }
            Ok(format!("{} {} {}", flags, tag, quote(unquote(parts[2].trim(), record_type)?)))
        }
        RecordType::Txt => Ok(quote(unquote(value, record_type)?)),
        RecordType::Soa => {
            let fields = split_exact(value, 7, record_type)?;
            let mut out = vec![host(fields[0], record_type)?, host(fields[1], record_type)?];
            for field in &fields[2..] {
                out.push(number::<u32>(field, record_type, value)?.to_string());
            }
            Ok(out.join(" "))
        }
    }
}

fn host(value: &str, record_type: RecordType) -> Result<String> {
    let name = value.trim().trim_end_matches('.').to_ascii_lowercase();
    if name.is_empty() {
        return Err(invalid(record_type, value, "empty host name"));
    }
    if name.len() > 253 || name.chars().any(char::is_whitespace) {
        return Err(invalid(record_type, value, "invalid host name"));
    }
    if name.split('.').any(|label| label.is_empty() || label.len() > 63) {
        return Err(invalid(record_type, value, "invalid host name label"));
    }
    Ok(name)
}

fn split_exact(value: &str, count: usize, record_type: RecordType) -> Result<Vec<&str>> {
    let fields: Vec<&str> = value.split_whitespace().collect();
    if fields.len() != count {
        return Err(invalid(
            record_type,
            value,
            &format!("expected {} fields, got {}", count, fields.len()),
        ));
    }
    Ok(fields)
}

fn number<T: std::str::FromStr>(field: &str, record_type: RecordType, value: &str) -> Result<T> {
    field
        .parse::<T>()
        .map_err(|_| invalid(record_type, value, &format!("{:?} is not a valid number", field)))
}

/// Strip one pair of surrounding quotes; a quote on one side only is malformed
fn unquote(value: &str, record_type: RecordType) -> Result<&str> {
    if !value.starts_with('"') && !value.ends_with('"') {
        return Ok(value);
    }
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(|| invalid(record_type, value, "unbalanced quote"))
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value)
}

fn invalid(record_type: RecordType, value: &str, reason: &str) -> Error {
    Error::validation(format!("invalid {} rdata {:?}: {}", record_type, value, reason))
}
