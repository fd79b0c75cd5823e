use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All non-secret configuration entries, keyed by name.
///
/// Secret-flagged entries never appear with their values here; the backend
/// lists keys and metadata only.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigResponse {
    pub config: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpsertConfigQuery {
    pub key: String,
    pub value: serde_json::Value,
    pub is_secret: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigKeyQuery {
    pub key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreSecretQuery {
    pub key: String,
    pub value: String,
}

/// One secret slot a provider depends on, with the backend-reported
/// resolution state. Values are never included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretStatus {
    pub key: String,
    pub is_set: bool,
}

/// Provider descriptor as reported by `GET /config/providers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDetails {
    pub name: String,
    #[serde(default)]
    pub keys: Vec<SecretStatus>,
}

/// How an extension is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExtensionConfig {
    /// Ships inside the tern binary.
    Builtin { name: String },
    /// Spawned as a local child process speaking stdio.
    Stdio {
        name: String,
        cmd: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        envs: HashMap<String, String>,
        #[serde(default)]
        timeout: Option<u64>,
    },
    /// Reached over server-sent events.
    Sse {
        name: String,
        uri: String,
        #[serde(default)]
        timeout: Option<u64>,
    },
}

impl ExtensionConfig {
    pub fn name(&self) -> &str {
        match self {
            ExtensionConfig::Builtin { name } => name,
            ExtensionConfig::Stdio { name, .. } => name,
            ExtensionConfig::Sse { name, .. } => name,
        }
    }

    /// Canonical storage key for this extension.
    pub fn key(&self) -> String {
        name_to_key(self.name())
    }
}

pub fn name_to_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Wire shape for extension add/update/remove requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionQuery {
    pub name: String,
    pub config: ExtensionConfig,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveExtensionQuery {
    pub name: String,
}

/// An extension as stored in the backend's `extensions` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionEntry {
    pub enabled: bool,
    #[serde(flatten)]
    pub config: ExtensionConfig,
}
