use std::collections::HashSet;
use std::sync::RwLock;

use tern_client::TernClient;

use crate::catalog;
use crate::error::SettingsError;

/// Process-wide cache of the secret keys that currently resolve in the
/// backend's secret store.
///
/// The cache starts empty on every launch and is rebuilt wholesale from
/// backend truth by [`refresh`](Self::refresh); readers never observe a
/// partially-updated set because the replacement lands as a single
/// assignment under the write lock. No other component writes to it.
///
/// Refresh only after a backend-confirmed secret mutation. A failed store
/// or delete must return before any refresh so stale "previously
/// configured" state cannot mask the failure.
#[derive(Debug, Default)]
pub struct ActiveKeys {
    resolvable: RwLock<HashSet<String>>,
}

impl ActiveKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-query the backend and swap in the new set of resolvable keys.
    pub async fn refresh(&self, client: &TernClient) -> Result<(), SettingsError> {
        let providers = client.list_providers().await?;
        let mut next = HashSet::new();
        for provider in &providers {
            for status in &provider.keys {
                if status.is_set {
                    next.insert(status.key.clone());
                }
            }
        }
        tracing::debug!(resolvable = next.len(), "active keys refreshed");
        *self.resolvable.write().unwrap() = next;
        Ok(())
    }

    /// Pure cache lookup, no I/O: true iff every key the provider requires
    /// currently resolves. Providers absent from the catalog are never
    /// configured.
    pub fn is_configured(&self, provider: &str) -> bool {
        let Some(info) = catalog::resolve(provider) else {
            return false;
        };
        let resolvable = self.resolvable.read().unwrap();
        info.required_keys
            .iter()
            .all(|key| resolvable.contains(*key))
    }

    /// Canonical names of the catalog providers whose full required-key
    /// set resolves.
    pub fn active_providers(&self) -> Vec<String> {
        let resolvable = self.resolvable.read().unwrap();
        catalog::all()
            .iter()
            .filter(|p| p.required_keys.iter().all(|key| resolvable.contains(*key)))
            .map(|p| p.name.to_string())
            .collect()
    }
}
