//! WatchConfig - Config Loader output
//!
//! Describes one watch run: which organization to poll, how to filter,
//! where state lives and which destinations to notify.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::DeliveryPolicy;

/// Lever public postings endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.lever.co/v0/postings";

/// Default state directory (tilde is expanded by the CLI)
pub const DEFAULT_STORAGE_DIR: &str = "~/.lever-watcher";

/// Whether `name` can be used verbatim as a file stem inside the storage directory
pub fn is_safe_file_stem(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Complete watch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Organization identifier as used by the postings API
    pub organization: String,

    /// Case-insensitive regex matched against title and description
    #[serde(default)]
    pub pattern: Option<String>,

    /// Raw query string appended to the postings URL
    #[serde(default)]
    pub query: Option<String>,

    /// Postings API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// HTTP timeout for upstream and webhook calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Snapshot / history directory
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Notification destinations, dispatched in order
    #[serde(default)]
    pub destinations: Vec<DestinationConfig>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STORAGE_DIR)
}

impl WatchConfig {
    /// Minimal config for an organization with defaults everywhere else
    pub fn for_organization(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            pattern: None,
            query: None,
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            storage_dir: default_storage_dir(),
            destinations: Vec::new(),
        }
    }

    /// Find a destination by kind
    pub fn destination_mut(&mut self, kind: DestinationKind) -> Option<&mut DestinationConfig> {
        self.destinations.iter_mut().find(|d| d.kind == kind)
    }

    /// Set the webhook for a destination kind, adding the destination if missing
    pub fn set_webhook(&mut self, kind: DestinationKind, url: String) {
        match self.destination_mut(kind) {
            Some(dest) => dest.webhook_url = Some(url),
            None => {
                let mut dest = DestinationConfig::new(kind);
                dest.webhook_url = Some(url);
                self.destinations.push(dest);
            }
        }
    }
}

/// Destination output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Destination kind
    pub kind: DestinationKind,

    /// Destination name; defaults to the kind name. Keys the history file.
    #[serde(default)]
    pub name: Option<String>,

    /// Webhook URL; a webhook destination without one is skipped
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Override the kind's default batch limit
    #[serde(default)]
    pub batch_limit: Option<usize>,

    /// Override whether the delivery history is used
    #[serde(default)]
    pub use_history: Option<bool>,
}

impl DestinationConfig {
    /// Destination of the given kind with default settings
    pub fn new(kind: DestinationKind) -> Self {
        Self {
            kind,
            name: None,
            webhook_url: None,
            batch_limit: None,
            use_history: None,
        }
    }

    /// Effective destination name
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.kind.as_str())
    }

    /// Effective delivery policy (config overrides on top of kind defaults)
    pub fn policy(&self) -> DeliveryPolicy {
        let defaults = self.kind.default_policy();
        DeliveryPolicy {
            batch_limit: self.batch_limit.or(defaults.batch_limit),
            uses_history: self.use_history.unwrap_or(defaults.uses_history),
        }
    }

    /// Whether the destination can send at all
    pub fn is_enabled(&self) -> bool {
        !self.kind.requires_webhook() || self.webhook_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Destination kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationKind {
    /// Slack incoming webhook (block layout)
    Slack,
    /// Discord webhook (embed list)
    Discord,
    /// tracing log output
    Log,
}

impl DestinationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slack => "slack",
            Self::Discord => "discord",
            Self::Log => "log",
        }
    }

    pub fn requires_webhook(&self) -> bool {
        matches!(self, Self::Slack | Self::Discord)
    }

    /// Kind defaults: Slack allows 50 blocks (header + 49 sections),
    /// Discord 10 embeds per message and tracks history.
    pub fn default_policy(&self) -> DeliveryPolicy {
        match self {
            Self::Slack => DeliveryPolicy {
                batch_limit: Some(49),
                uses_history: false,
            },
            Self::Discord => DeliveryPolicy {
                batch_limit: Some(10),
                uses_history: true,
            },
            Self::Log => DeliveryPolicy {
                batch_limit: None,
                uses_history: false,
            },
        }
    }
}
