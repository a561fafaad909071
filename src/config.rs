//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$OUTREACHKIT_CONFIG` (environment variable)
//! 2. `~/.config/outreachkit/config.toml` (Linux/macOS)
//!    `%APPDATA%\outreachkit\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::attachment::constraints::{
    AttachmentLimits, MAX_FILE_COUNT, MAX_SINGLE_FILE_BYTES, MAX_TOTAL_BYTES,
};
use crate::attachment::mime::{MimeAllowList, DEFAULT_ALLOWED_MIME_TYPES};
use crate::composer::limits::{
    CharacterLimits, CONNECTION_INVITE_LIMIT, CONNECTION_INVITE_PREMIUM_LIMIT,
    DIRECT_MESSAGE_LIMIT, INMAIL_LIMIT,
};
use crate::error::Result;
use crate::model::variable::VariableDescriptor;
use crate::snippet::catalog::VariableCatalog;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Attachment batch constraints.
    pub attachments: AttachmentsConfig,
    /// Per-kind body character limits.
    pub limits: LimitsConfig,
    /// Extra placeholder variables appended to the builtin catalog.
    pub variables: Vec<VariableDescriptor>,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Attachment batch constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentsConfig {
    /// Maximum number of attachments on one template.
    pub max_file_count: usize,
    /// Maximum size of a single file in bytes (default: 1048576 = 1 MiB).
    pub max_single_file_bytes: u64,
    /// Maximum combined size of all attachments (default: 52428800 = 50 MiB).
    pub max_total_bytes: u64,
    /// Accepted MIME types. A file also passes when its extension equals
    /// the subtype of one of these.
    pub allowed_mime_types: Vec<String>,
}

/// Per-kind body character limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Direct messages.
    pub direct_message: usize,
    /// Connection invites without a premium integration.
    pub connection_invite: usize,
    /// Connection invites when the premium integration is active.
    pub connection_invite_premium: usize,
    /// InMail messages.
    pub inmail: usize,
    /// How long to wait for the premium-status check before falling back
    /// to the standard limit.
    pub premium_check_timeout_ms: u64,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for AttachmentsConfig {
    fn default() -> Self {
        Self {
            max_file_count: MAX_FILE_COUNT,
            max_single_file_bytes: MAX_SINGLE_FILE_BYTES, // 1 MiB
            max_total_bytes: MAX_TOTAL_BYTES,             // 50 MiB
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            direct_message: DIRECT_MESSAGE_LIMIT,
            connection_invite: CONNECTION_INVITE_LIMIT,
            connection_invite_premium: CONNECTION_INVITE_PREMIUM_LIMIT,
            inmail: INMAIL_LIMIT,
            premium_check_timeout_ms: 5_000,
        }
    }
}

// ── Derived runtime settings ────────────────────────────────────

impl Config {
    /// Attachment constraints described by the `[attachments]` section.
    pub fn attachment_limits(&self) -> AttachmentLimits {
        AttachmentLimits {
            max_file_count: self.attachments.max_file_count,
            max_single_file_bytes: self.attachments.max_single_file_bytes,
            max_total_bytes: self.attachments.max_total_bytes,
            allow_list: MimeAllowList::new(&self.attachments.allowed_mime_types),
        }
    }

    /// Character limits described by the `[limits]` section.
    pub fn character_limits(&self) -> CharacterLimits {
        CharacterLimits {
            direct_message: self.limits.direct_message,
            connection_invite: self.limits.connection_invite,
            connection_invite_premium: self.limits.connection_invite_premium,
            inmail: self.limits.inmail,
        }
    }

    /// The builtin catalog extended with the `[[variables]]` entries.
    pub fn catalog(&self) -> Result<VariableCatalog> {
        VariableCatalog::builtin_with(self.variables.iter().cloned())
    }

    /// Timeout applied to the premium-status check.
    pub fn premium_check_timeout(&self) -> Duration {
        Duration::from_millis(self.limits.premium_check_timeout_ms)
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("OUTREACHKIT_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("outreachkit").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("outreachkit")
}
