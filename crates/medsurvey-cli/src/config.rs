use std::path::{Path, PathBuf};

use eyre::WrapErr;
use medsurvey_core::models::user::AuthSession;
use serde::{Deserialize, Serialize};

/// On-disk schema version written by this build; see [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Read by the `--api-url` flag; overrides `api_url` without persisting it.
pub const API_URL_ENV: &str = "MEDSURVEY_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// 0 for files written before versioning existed.
    #[serde(default)]
    pub config_version: u32,
    pub api_url: String,
    /// Added in v1; older configs get [`DEFAULT_TIMEOUT_SECS`].
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<StoredSession>,
}

/// The signed-in account, kept between invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub email: String,
    pub auth: AuthSession,
    pub signed_in_at: jiff::Timestamp,
}

pub const DEFAULT_TIMEOUT_SECS: u64 = medsurvey_client::client::DEFAULT_TIMEOUT_SECS;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            session: None,
        }
    }
}

pub fn config_dir() -> eyre::Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join("com.medsurvey.cli"))
        .ok_or_else(|| eyre::eyre!("cannot determine the user config directory"))
}

/// Load from `dir/config.json`, or defaults when no file exists yet.
pub fn load_config_from(dir: &Path) -> eyre::Result<CliConfig> {
    let path = dir.join("config.json");
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let raw = std::fs::read_to_string(&path)
        .wrap_err_with(|| format!("reading {}", path.display()))?;

    // Migrations operate on the untyped document.
    let document: serde_json::Value = serde_json::from_str(&raw)?;
    let version = stored_version(&document)?;
    Ok(serde_json::from_value(migrate(document, version)?)?)
}

fn stored_version(document: &serde_json::Value) -> eyre::Result<u32> {
    match document.get("config_version").and_then(serde_json::Value::as_u64) {
        None => Ok(0),
        Some(v) => u32::try_from(v).wrap_err("config_version out of range"),
    }
}

pub fn load_config() -> eyre::Result<CliConfig> {
    load_config_from(&config_dir()?)
}

/// For commands that rewrite the file anyway: an unreadable config is
/// replaced by defaults instead of blocking them.
pub fn load_config_or_default_from(dir: &Path) -> CliConfig {
    load_config_from(dir).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "unreadable config ignored; it will be overwritten");
        CliConfig::default()
    })
}

pub fn load_config_or_default() -> eyre::Result<CliConfig> {
    Ok(load_config_or_default_from(&config_dir()?))
}

/// Upgrade `document` one version at a time until it is current.
fn migrate(mut document: serde_json::Value, version: u32) -> eyre::Result<serde_json::Value> {
    if version > CURRENT_VERSION {
        eyre::bail!(
            "config was written by a newer medsurvey (version {version}, this build reads up to {CURRENT_VERSION})"
        );
    }

    // v0 -> v1: `base_url` renamed to `api_url`, timeout added
    if version < 1 {
        let Some(obj) = document.as_object_mut() else {
            eyre::bail!("config root must be a JSON object");
        };
        if let Some(base_url) = obj.remove("base_url") {
            obj.entry("api_url").or_insert(base_url);
        }
        obj.entry("api_url")
            .or_insert(serde_json::Value::String(DEFAULT_API_URL.to_string()));
        obj.entry("timeout_secs")
            .or_insert(serde_json::Value::Number(DEFAULT_TIMEOUT_SECS.into()));
        obj.insert("config_version".into(), 1.into());
        tracing::info!(from = version, to = 1, "config migrated");
    }

    Ok(document)
}

pub fn save_config_to(dir: &Path, config: &CliConfig) -> eyre::Result<()> {
    std::fs::create_dir_all(dir)?;

    let current = CliConfig {
        config_version: CURRENT_VERSION,
        ..config.clone()
    };
    let body = serde_json::to_string_pretty(&current)?;

    // Readers never observe a half-written file.
    let target = dir.join("config.json");
    let staging = dir.join("config.json.tmp");
    std::fs::write(&staging, body)?;

    // Holds a bearer token.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&staging, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&staging, &target)?;
    tracing::debug!(path = %target.display(), "config written");
    Ok(())
}

pub fn save_config(config: &CliConfig) -> eyre::Result<()> {
    save_config_to(&config_dir()?, config)
}
