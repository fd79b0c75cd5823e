use crate::error::{Result, TernClientError};
use crate::types::{
    ConfigKeyQuery, ConfigResponse, ExtensionQuery, ProviderDetails, RemoveExtensionQuery,
    UpsertConfigQuery,
};
use crate::TernClient;

impl TernClient {
    /// All non-secret configuration entries currently held by the backend.
    pub async fn read_all_config(&self) -> Result<ConfigResponse> {
        self.http.get("/config").await
    }

    /// Read a single entry. An absent key is an expected steady state and
    /// comes back as `Ok(None)`, never as an error.
    pub async fn read_config(&self, key: impl Into<String>) -> Result<Option<serde_json::Value>> {
        let query = ConfigKeyQuery { key: key.into() };
        match self.http.post("/config/read", &query).await {
            Ok(value) => Ok(Some(value)),
            Err(TernClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create or replace an entry. Upserting the same key/value twice is a
    /// no-op on the second call.
    pub async fn upsert_config(
        &self,
        key: impl Into<String>,
        value: serde_json::Value,
        is_secret: bool,
    ) -> Result<()> {
        self.http
            .post_empty(
                "/config/upsert",
                &UpsertConfigQuery {
                    key: key.into(),
                    value,
                    is_secret,
                },
            )
            .await
    }

    /// Removing a missing key is treated as already-satisfied intent.
    pub async fn remove_config(&self, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        match self
            .http
            .post_empty("/config/remove", &ConfigKeyQuery { key: key.clone() })
            .await
        {
            Err(TernClientError::NotFound(_)) => {
                tracing::debug!(key = %key, "remove on absent config entry");
                Ok(())
            }
            other => other,
        }
    }

    /// Provider descriptors known to the backend, each carrying the
    /// resolution state of its secret slots.
    pub async fn list_providers(&self) -> Result<Vec<ProviderDetails>> {
        self.http.get("/config/providers").await
    }

    /// Register a new extension. A name that already exists surfaces as
    /// [`TernClientError::Conflict`]; there are no auto-upsert semantics.
    pub async fn add_extension(&self, query: &ExtensionQuery) -> Result<()> {
        self.http.post_empty("/config/extension", query).await
    }

    /// Update an installed extension. A name that was never added surfaces
    /// as [`TernClientError::NotFound`].
    pub async fn update_extension(&self, query: &ExtensionQuery) -> Result<()> {
        self.http.put_empty("/config/extension", query).await
    }

    /// Removing an extension that was never added reports success.
    pub async fn remove_extension(&self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        match self
            .http
            .delete_empty("/config/extension", &RemoveExtensionQuery { name: name.clone() })
            .await
        {
            Err(TernClientError::NotFound(_)) => {
                tracing::debug!(name = %name, "remove on absent extension");
                Ok(())
            }
            other => other,
        }
    }
}
