// # akamai - Akamai provider driver
//
// Thin integration layer over the provider registry:
// 1. Reading configuration from environment variables
// 2. Building the registry and configuring sub-providers
// 3. Running one action over a file of declared resources
//
// Reconcile logic lives in the sub-provider crates; nothing here retries.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `EDGERC`: Path to the edgerc credentials file (default `~/.edgerc`)
// - `AKAMAI_CONFIG_SECTION`: edgerc section to use (default `default`)
// - `AKAMAI_RESOURCES_FILE`: JSON list of `{"type": ..., "config": {...}}`
// - `AKAMAI_ACTION`: `apply`, `refresh` or `destroy` (default `apply`)
// - `AKAMAI_CACHE_TTL_SECS`: API response cache TTL, 0 disables (default 600)
// - `AKAMAI_LOG_LEVEL`: trace, debug, info, warn, error (default `info`)
//
// ## Example
//
// ```bash
// cat > records.json <<'JSON'
// [{"type": "akamai_dns_record",
//   "config": {"zone": "example.com", "name": "www.example.com",
//              "recordtype": "A", "ttl": 300, "target": ["10.0.0.2"]}}]
// JSON
//
// export AKAMAI_RESOURCES_FILE=records.json
// akamai
// ```

use akamai_core::{MemoryResponseCache, OperationMeta, ProviderConfig, ProviderRegistry, Resource};
use akamai_dns::DnsSubprovider;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: All resources processed
/// - 1: Configuration or startup error
/// - 2: Runtime error (a resource operation failed)
#[derive(Debug, Clone, Copy)]
enum AkamaiExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<AkamaiExitCode> for ExitCode {
    fn from(code: AkamaiExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// What to do with every declared resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Create missing resources and update drifted ones
    Apply,
    /// Print the current remote state of every resource
    Refresh,
    /// Delete every resource, last declared first
    Destroy,
}

impl Action {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "apply" => Ok(Action::Apply),
            "refresh" => Ok(Action::Refresh),
            "destroy" => Ok(Action::Destroy),
            other => anyhow::bail!(
                "AKAMAI_ACTION '{}' is not valid. Valid actions: apply, refresh, destroy",
                other
            ),
        }
    }
}

/// One entry of the resources file
#[derive(Debug, Clone, Deserialize)]
struct Declared {
    /// Resource type or data source identifier
    #[serde(rename = "type")]
    kind: String,
    /// Declared configuration
    config: Value,
}

/// Application configuration
struct Config {
    edgerc: Option<PathBuf>,
    config_section: String,
    resources_file: String,
    action: String,
    cache_ttl_secs: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            edgerc: env::var("EDGERC").ok().filter(|s| !s.is_empty()).map(PathBuf::from),
            config_section: env::var("AKAMAI_CONFIG_SECTION")
                .unwrap_or_else(|_| akamai_core::config::DEFAULT_CONFIG_SECTION.to_string()),
            resources_file: env::var("AKAMAI_RESOURCES_FILE")
                .context("AKAMAI_RESOURCES_FILE is required")?,
            action: env::var("AKAMAI_ACTION").unwrap_or_else(|_| "apply".to_string()),
            cache_ttl_secs: env::var("AKAMAI_CACHE_TTL_SECS").unwrap_or_else(|_| "600".to_string()),
            log_level: env::var("AKAMAI_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.resources_file.is_empty() {
            anyhow::bail!(
                "AKAMAI_RESOURCES_FILE cannot be empty. \
                Set it via: export AKAMAI_RESOURCES_FILE=resources.json"
            );
        }
        if !Path::new(&self.resources_file).is_file() {
            anyhow::bail!("AKAMAI_RESOURCES_FILE does not exist: {}", self.resources_file);
        }

        Action::parse(&self.action)?;
        self.cache_ttl()?;
        self.provider_config().validate()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "AKAMAI_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn action(&self) -> Result<Action> {
        Action::parse(&self.action)
    }

    /// Response cache TTL, `None` when caching is disabled
    fn cache_ttl(&self) -> Result<Option<Duration>> {
        let secs: u64 = self.cache_ttl_secs.trim().parse().with_context(|| {
            format!(
                "AKAMAI_CACHE_TTL_SECS must be a number of seconds. Got: {}",
                self.cache_ttl_secs
            )
        })?;
        Ok((secs > 0).then(|| Duration::from_secs(secs)))
    }

    fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::new(self.edgerc.clone(), self.config_section.clone())
    }
}

/// Parse the resources file contents
fn parse_resources(contents: &str) -> Result<Vec<Declared>> {
    serde_json::from_str(contents).context("resources file must be a JSON list of {type, config}")
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return AkamaiExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return AkamaiExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return AkamaiExitCode::ConfigError.into();
    }

    let registry = match build_registry(&config) {
        Ok(registry) => registry,
        Err(e) => {
            error!("Provider setup failed: {:#}", e);
            return AkamaiExitCode::ConfigError.into();
        }
    };

    let declared = match std::fs::read_to_string(&config.resources_file)
        .with_context(|| format!("reading {}", config.resources_file))
        .and_then(|contents| parse_resources(&contents))
    {
        Ok(declared) => declared,
        Err(e) => {
            error!("Invalid resources file: {:#}", e);
            return AkamaiExitCode::ConfigError.into();
        }
    };

    let action = match config.action() {
        Ok(action) => action,
        Err(e) => {
            error!("{:#}", e);
            return AkamaiExitCode::ConfigError.into();
        }
    };

    info!("Running {:?} over {} declared resource(s)", action, declared.len());

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return AkamaiExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        tokio::select! {
            outcome = run(&registry, action, &declared) => outcome,
            _ = tokio::signal::ctrl_c() => Err(anyhow::anyhow!("interrupted")),
        }
    });

    match result {
        Ok(()) => AkamaiExitCode::Success.into(),
        Err(e) => {
            error!("{:#}", e);
            if e
                .downcast_ref::<akamai_core::Error>()
                .is_some_and(akamai_core::Error::is_transient)
            {
                warn!("The failure is transient; running again may succeed");
            }
            AkamaiExitCode::RuntimeError.into()
        }
    }
}

/// Build the registry and configure every sub-provider
fn build_registry(config: &Config) -> Result<ProviderRegistry> {
    let mut dns = DnsSubprovider::new();
    if let Some(ttl) = config.cache_ttl()? {
        info!("API response cache enabled (ttl {:?})", ttl);
        dns = dns.with_cache(Arc::new(MemoryResponseCache::new(ttl)));
    }

    let registry = ProviderRegistry::builder()
        .with_subprovider(Arc::new(dns))
        .build()?;

    for (name, version) in registry.list_subproviders() {
        info!("Sub-provider {} v{}", name, version);
    }

    registry.configure(&OperationMeta::new(), &config.provider_config())?;
    Ok(registry)
}

/// Run `action` over every declared resource
///
/// Stops at the first failure.
async fn run(registry: &ProviderRegistry, action: Action, declared: &[Declared]) -> Result<()> {
    let ordered: Vec<&Declared> = match action {
        Action::Destroy => declared.iter().rev().collect(),
        _ => declared.iter().collect(),
    };

    for entry in ordered {
        let meta = OperationMeta::new();

        if !registry.has_resource(&entry.kind) {
            if action == Action::Destroy {
                continue;
            }
            let data_source = registry.data_source(&entry.kind)?;
            let value = data_source
                .read(&meta, &entry.config)
                .await
                .with_context(|| format!("{} lookup failed", entry.kind))?;
            print_state(&entry.kind, &value)?;
            continue;
        }

        let resource = registry.resource(&entry.kind)?;
        match action {
            Action::Apply => {
                let state = apply(resource.as_ref(), &meta, &entry.config)
                    .await
                    .with_context(|| format!("{} apply failed", entry.kind))?;
                print_state(&entry.kind, &state)?;
            }
            Action::Refresh => {
                match resource
                    .read(&meta, &entry.config)
                    .await
                    .with_context(|| format!("{} refresh failed", entry.kind))?
                {
                    Some(state) => print_state(&entry.kind, &state)?,
                    None => warn!("{} does not exist remotely", describe(&entry.config)),
                }
            }
            Action::Destroy => {
                resource
                    .delete(&meta, &entry.config)
                    .await
                    .with_context(|| format!("{} destroy failed", entry.kind))?;
                info!("Destroyed {}", describe(&entry.config));
            }
        }
    }

    Ok(())
}

/// Create the resource if it is missing, update it if it drifted
async fn apply(
    resource: &dyn Resource,
    meta: &OperationMeta,
    config: &Value,
) -> akamai_core::Result<Value> {
    match resource.read(meta, config).await? {
        None => resource.create(meta, config).await,
        Some(state) if resource.in_sync(config, &state)? => {
            debug!("{} is up to date", describe(config));
            Ok(state)
        }
        Some(_) => {
            info!("{} drifted, updating", describe(config));
            resource.update(meta, config).await
        }
    }
}

fn print_state(kind: &str, state: &Value) -> Result<()> {
    let line = serde_json::to_string(&serde_json::json!({ "type": kind, "state": state }))?;
    println!("{}", line);
    Ok(())
}

/// Short label for log lines
fn describe(config: &Value) -> String {
    let field = |key: &str| config.get(key).and_then(Value::as_str).unwrap_or("?").to_string();
    format!("{}/{}/{}", field("zone"), field("name"), field("recordtype"))
}
