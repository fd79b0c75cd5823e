use crate::error::{Result, TernClientError};
use crate::types::{ConfigKeyQuery, StoreSecretQuery};
use crate::TernClient;

impl TernClient {
    /// Store a credential value, replacing any existing value for the key.
    /// There is no separate update verb.
    pub async fn store_secret(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.http
            .post_empty(
                "/secrets/store",
                &StoreSecretQuery {
                    key: key.into(),
                    value: value.into(),
                },
            )
            .await
    }

    /// Deleting an absent key reports success, which keeps the
    /// delete-then-store replace flow simple under retry.
    pub async fn delete_secret(&self, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        match self
            .http
            .delete_empty("/secrets/delete", &ConfigKeyQuery { key: key.clone() })
            .await
        {
            Err(TernClientError::NotFound(_)) => {
                tracing::debug!(key = %key, "delete on absent secret");
                Ok(())
            }
            other => other,
        }
    }
}
