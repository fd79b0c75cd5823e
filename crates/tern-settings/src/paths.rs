use etcetera::{choose_app_strategy, AppStrategy, AppStrategyArgs};
use once_cell::sync::Lazy;
use std::path::PathBuf;

use crate::error::SettingsError;

pub static APP_STRATEGY: Lazy<AppStrategyArgs> = Lazy::new(|| AppStrategyArgs {
    top_level_domain: "sh.tern".to_string(),
    author: "Tern".to_string(),
    app_name: "tern".to_string(),
});

/// Where the selected model and recents list live between runs.
pub fn selection_file() -> Result<PathBuf, SettingsError> {
    Ok(choose_app_strategy(APP_STRATEGY.clone())?.in_data_dir("model_selection.json"))
}
