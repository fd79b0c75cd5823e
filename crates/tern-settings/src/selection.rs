use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::mpsc;

use crate::catalog;
use crate::error::SettingsError;

/// Cap on the recent-models list; the oldest entry is evicted past this.
pub const MAX_RECENT_MODELS: usize = 3;

/// The (provider, model) pair currently designated for agent invocation.
/// `provider` holds the catalog alias id, matching what selection flows
/// pass around and persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedModel {
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentModel {
    #[serde(flatten)]
    pub selection: SelectedModel,
    pub last_used: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SelectionState {
    selected: Option<SelectedModel>,
    #[serde(default)]
    recent: Vec<RecentModel>,
}

/// Persisted model/provider selection plus a bounded recency list.
///
/// State lives in a JSON file under the app data dir so it survives
/// restarts independently of the active-keys rebuild. Subscribers receive
/// the new selection after every persisted change; a receiver dropped by
/// an unmounted consumer is pruned silently on the next send.
pub struct ModelSelection {
    path: PathBuf,
    state: Mutex<SelectionState>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<SelectedModel>>>,
}

impl ModelSelection {
    /// Load persisted state from `path`, starting empty when the file does
    /// not exist yet.
    pub fn load(path: PathBuf) -> Result<Self, SettingsError> {
        let state = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            SelectionState::default()
        };
        Ok(Self {
            path,
            state: Mutex::new(state),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    /// Register an observer for active-model changes. The handoff is
    /// fire-and-forget; no acknowledgment is expected.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SelectedModel> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        rx
    }

    /// Switch to `provider_id`'s catalog default model, persist the pair,
    /// record it in the recents list, and notify subscribers.
    pub fn select_provider(&self, provider_id: &str) -> Result<SelectedModel, SettingsError> {
        let provider = catalog::resolve(provider_id)
            .ok_or_else(|| SettingsError::UnknownProvider(provider_id.to_string()))?;
        let selection = SelectedModel {
            provider: provider.alias.to_string(),
            model: provider.default_model.to_string(),
        };
        self.switch_model(selection.clone())?;
        Ok(selection)
    }

    /// Direct override of the active pair, with the same persistence and
    /// notification path as [`select_provider`](Self::select_provider).
    pub fn switch_model(&self, selection: SelectedModel) -> Result<(), SettingsError> {
        {
            let mut state = self.state.lock().unwrap();
            state.recent.retain(|recent| recent.selection != selection);
            state.recent.insert(
                0,
                RecentModel {
                    selection: selection.clone(),
                    last_used: Utc::now(),
                },
            );
            state.recent.truncate(MAX_RECENT_MODELS);
            state.selected = Some(selection.clone());
            self.save(&state)?;
        }
        self.notify(selection);
        Ok(())
    }

    pub fn selected(&self) -> Option<SelectedModel> {
        self.state.lock().unwrap().selected.clone()
    }

    /// Most-recent-first, deduplicated by (provider, model) pair.
    pub fn recent_models(&self) -> Vec<RecentModel> {
        self.state.lock().unwrap().recent.clone()
    }

    fn save(&self, state: &SelectionState) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn notify(&self, selection: SelectedModel) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| tx.send(selection.clone()).is_ok());
    }
}
