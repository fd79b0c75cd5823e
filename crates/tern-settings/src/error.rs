use tern_client::TernClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// The delete-then-store replace sequence failed after the delete
    /// succeeded. The provider is left unconfigured with no automatic
    /// rollback; callers should prompt for re-entry.
    #[error("failed to replace credentials for {provider}")]
    ReplaceFailed {
        provider: String,
        #[source]
        source: TernClientError,
    },

    #[error(transparent)]
    Client(#[from] TernClientError),

    #[error("could not determine home directory: {0}")]
    HomeDir(#[from] etcetera::HomeDirError),

    #[error("failed to access local settings state: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode local settings state: {0}")]
    Serde(#[from] serde_json::Error),
}
