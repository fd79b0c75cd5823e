use std::collections::HashMap;
use std::sync::Mutex;

use tern_client::types::name_to_key;
use tern_client::{ExtensionEntry, ExtensionQuery, TernClient, TernClientError};
use tokio::sync::mpsc;

use crate::error::SettingsError;

/// Backend config entry holding the installed-extension map.
const EXTENSIONS_CONFIG_KEY: &str = "extensions";

/// Emitted after a backend-confirmed extension transition so the agent
/// runtime can invalidate its tool set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionEvent {
    Added(String),
    Updated(String),
    Removed(String),
}

/// Drives add/update/remove of extension records against the backend.
///
/// Each extension moves through `absent -> present(enabled) <->
/// present(disabled) -> absent`, one round trip per transition. There is
/// no optimistic local state: observers hear about a transition only after
/// the backend confirms it, so a failed request can never surface a state
/// the backend does not hold.
pub struct ExtensionLifecycle {
    client: TernClient,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<ExtensionEvent>>>,
}

impl ExtensionLifecycle {
    pub fn new(client: TernClient) -> Self {
        Self {
            client,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Register an observer for confirmed transitions. A receiver dropped
    /// by an unmounted consumer is pruned silently on the next send.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<ExtensionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        rx
    }

    /// Valid only from `absent`; an existing name surfaces as a conflict.
    pub async fn add(&self, entry: ExtensionEntry) -> Result<(), SettingsError> {
        let query = Self::query(&entry);
        self.client.add_extension(&query).await?;
        self.notify(ExtensionEvent::Added(query.name));
        Ok(())
    }

    /// Valid only from `present`; a never-added name surfaces as not
    /// found.
    pub async fn update(&self, entry: ExtensionEntry) -> Result<(), SettingsError> {
        let query = Self::query(&entry);
        self.client.update_extension(&query).await?;
        self.notify(ExtensionEvent::Updated(query.name));
        Ok(())
    }

    /// Flip the enabled flag of an installed extension, keeping its
    /// connection descriptor intact.
    pub async fn set_enabled(&self, name: &str, enabled: bool) -> Result<(), SettingsError> {
        let mut entry = self.installed().await?.remove(&name_to_key(name)).ok_or_else(|| {
            TernClientError::NotFound(format!("extension {name} is not installed"))
        })?;
        entry.enabled = enabled;
        self.update(entry).await
    }

    /// Idempotent from `absent`: removing a never-added extension reports
    /// success.
    pub async fn remove(&self, name: &str) -> Result<(), SettingsError> {
        self.client.remove_extension(name).await?;
        self.notify(ExtensionEvent::Removed(name.to_string()));
        Ok(())
    }

    /// The backend-confirmed extension map, storage key to entry, read
    /// from the `extensions` config entry. Empty when the entry is absent.
    pub async fn installed(&self) -> Result<HashMap<String, ExtensionEntry>, SettingsError> {
        match self.client.read_config(EXTENSIONS_CONFIG_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(HashMap::new()),
        }
    }

    fn query(entry: &ExtensionEntry) -> ExtensionQuery {
        ExtensionQuery {
            name: entry.config.name().to_string(),
            config: entry.config.clone(),
            enabled: entry.enabled,
        }
    }

    fn notify(&self, event: ExtensionEvent) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
