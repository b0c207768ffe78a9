//! Configuration types for the Akamai provider
//!
//! Provider-level settings select an `.edgerc` file and a section in it.
//! The section holds the EdgeGrid credentials every sub-provider client
//! signs its requests with.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default section used when none is configured
pub const DEFAULT_CONFIG_SECTION: &str = "default";

/// Default maximum request body size included in the EdgeGrid content hash
pub const DEFAULT_MAX_BODY: usize = 131_072;

/// Provider-level configuration
///
/// Mirrors the provider schema keys `edgerc` and `config_section`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Path to the edgerc file (None = `$EDGERC` or `~/.edgerc`)
    #[serde(default)]
    pub edgerc: Option<PathBuf>,

    /// Section of the edgerc file to read credentials from
    #[serde(default = "default_config_section")]
    pub config_section: String,
}

impl ProviderConfig {
    /// Create a configuration for the given edgerc path and section
    pub fn new(edgerc: Option<PathBuf>, config_section: impl Into<String>) -> Self {
        Self {
            edgerc,
            config_section: config_section.into(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.config_section.trim().is_empty() {
            return Err(crate::Error::config("config_section cannot be empty"));
        }
        if let Some(path) = &self.edgerc
            && path.as_os_str().is_empty()
        {
            return Err(crate::Error::config("edgerc path cannot be empty"));
        }
        Ok(())
    }

    /// Resolve the edgerc path: explicit value, then `$EDGERC`, then `~/.edgerc`
    pub fn edgerc_path(&self) -> Result<PathBuf, crate::Error> {
        if let Some(path) = &self.edgerc {
            return Ok(path.clone());
        }
        if let Ok(path) = std::env::var("EDGERC")
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }
        dirs::home_dir()
            .map(|home| home.join(".edgerc"))
            .ok_or_else(|| crate::Error::config("no edgerc configured and no home directory found"))
    }

    /// Load the EdgeGrid credentials this configuration points at
    pub fn load_credentials(&self) -> Result<EdgeGridCredentials, crate::Error> {
        self.validate()?;
        let path = self.edgerc_path()?;
        EdgeGridCredentials::from_edgerc(&path, &self.config_section)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            edgerc: None,
            config_section: default_config_section(),
        }
    }
}

fn default_config_section() -> String {
    DEFAULT_CONFIG_SECTION.to_string()
}

/// EdgeGrid API client credentials
///
/// # Security
///
/// The Debug implementation does NOT expose the secret or tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct EdgeGridCredentials {
    /// API host, without scheme (e.g. `akab-xxx.luna.akamaiapis.net`)
    pub host: String,
    /// Client token
    pub client_token: String,
    /// Client secret, base64 as issued
    pub client_secret: String,
    /// Access token
    pub access_token: String,
    /// Maximum body size to hash when signing
    pub max_body: usize,
}

impl std::fmt::Debug for EdgeGridCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeGridCredentials")
            .field("host", &self.host)
            .field("client_token", &"<REDACTED>")
            .field("client_secret", &"<REDACTED>")
            .field("access_token", &"<REDACTED>")
            .field("max_body", &self.max_body)
            .finish()
    }
}

impl EdgeGridCredentials {
    /// Read a section from an edgerc file
    pub fn from_edgerc(path: &Path, section: &str) -> Result<Self, crate::Error> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config(format!("failed to read edgerc {}: {}", path.display(), e))
        })?;
        Self::parse_edgerc(&contents, section)
    }

    /// Parse edgerc (INI) contents and extract the given section
    pub fn parse_edgerc(contents: &str, section: &str) -> Result<Self, crate::Error> {
        let sections = parse_ini(contents)?;
        let values = sections
            .get(section)
            .ok_or_else(|| crate::Error::config(format!("edgerc section not found: {}", section)))?;

        let required = |key: &str| -> Result<String, crate::Error> {
            values
                .get(key)
                .filter(|v| !v.is_empty())
                .cloned()
                .ok_or_else(|| {
                    crate::Error::config(format!("edgerc section [{}] is missing {}", section, key))
                })
        };

        let host = required("host")?;
        let host = host
            .trim_start_matches("https://")
            .trim_end_matches('/')
            .to_string();

        let max_body = match values.get("max_body") {
            Some(raw) => raw.parse().map_err(|_| {
                crate::Error::config(format!("edgerc max_body is not a number: {}", raw))
            })?,
            None => DEFAULT_MAX_BODY,
        };

        Ok(Self {
            host,
            client_token: required("client_token")?,
            client_secret: required("client_secret")?,
            access_token: required("access_token")?,
            max_body,
        })
    }
}

/// Minimal INI reader for edgerc files
///
/// Keys outside of any section are rejected; `#` and `;` start comments;
/// values may be wrapped in double quotes.
fn parse_ini(contents: &str) -> Result<HashMap<String, HashMap<String, String>>, crate::Error> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for (lineno, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| {
            crate::Error::config(format!("edgerc line {}: expected key = value", lineno + 1))
        })?;
        let section = current.as_ref().ok_or_else(|| {
            crate::Error::config(format!("edgerc line {}: key outside of a section", lineno + 1))
        })?;

        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);

        sections
            .entry(section.clone())
            .or_default()
            .insert(key.trim().to_string(), value.to_string());
    }

    Ok(sections)
}
