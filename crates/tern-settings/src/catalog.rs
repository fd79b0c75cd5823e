use once_cell::sync::Lazy;
use std::collections::HashMap;
use tern_client::ProviderDetails;

use crate::active_keys::ActiveKeys;

/// Catalog entry for one supported provider. Immutable, defined at compile
/// time; the backend's own provider list is merged in loosely at display
/// time rather than kept in strict sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderInfo {
    /// Canonical display name, unique.
    pub name: &'static str,
    /// Lowercase short form used in selection ids and persisted state.
    pub alias: &'static str,
    pub description: &'static str,
    /// Secret keys that must all resolve before the provider is usable.
    /// Non-empty for every credentialed provider.
    pub required_keys: &'static [&'static str],
    pub default_model: &'static str,
}

pub static PROVIDERS: &[ProviderInfo] = &[
    ProviderInfo {
        name: "OpenAI",
        alias: "openai",
        description: "GPT-4o and other hosted models from OpenAI",
        required_keys: &["OPENAI_API_KEY"],
        default_model: "gpt-4o",
    },
    ProviderInfo {
        name: "Anthropic",
        alias: "anthropic",
        description: "Claude and other models from Anthropic",
        required_keys: &["ANTHROPIC_API_KEY"],
        default_model: "claude-3-5-sonnet-latest",
    },
    ProviderInfo {
        name: "Databricks",
        alias: "databricks",
        description: "Models served through Databricks model serving endpoints",
        required_keys: &["DATABRICKS_HOST"],
        default_model: "claude-3-5-sonnet-2",
    },
    ProviderInfo {
        name: "Google",
        alias: "google",
        description: "Gemini models from Google",
        required_keys: &["GOOGLE_API_KEY"],
        default_model: "gemini-1.5-flash",
    },
    ProviderInfo {
        name: "Groq",
        alias: "groq",
        description: "Open models on Groq's low-latency inference hardware",
        required_keys: &["GROQ_API_KEY"],
        default_model: "llama-3.3-70b-versatile",
    },
    ProviderInfo {
        name: "Ollama",
        alias: "ollama",
        description: "Local models served by an Ollama instance",
        required_keys: &["OLLAMA_HOST"],
        default_model: "qwen2.5",
    },
    ProviderInfo {
        name: "OpenRouter",
        alias: "openrouter",
        description: "A unified gateway over many hosted model providers",
        required_keys: &["OPENROUTER_API_KEY"],
        default_model: "anthropic/claude-3.5-sonnet",
    },
];

static BY_NAME: Lazy<HashMap<&'static str, &'static ProviderInfo>> =
    Lazy::new(|| PROVIDERS.iter().map(|p| (p.name, p)).collect());

static BY_ALIAS: Lazy<HashMap<&'static str, &'static ProviderInfo>> =
    Lazy::new(|| PROVIDERS.iter().map(|p| (p.alias, p)).collect());

/// Look up a provider by canonical name.
pub fn describe(name: &str) -> Option<&'static ProviderInfo> {
    BY_NAME.get(name).copied()
}

/// Resolve a selection id: the explicit alias table first, then a
/// case-insensitive match on the canonical name.
pub fn resolve(id: &str) -> Option<&'static ProviderInfo> {
    BY_ALIAS
        .get(id)
        .copied()
        .or_else(|| PROVIDERS.iter().find(|p| p.name.eq_ignore_ascii_case(id)))
}

pub fn all() -> &'static [ProviderInfo] {
    PROVIDERS
}

/// Display row for the provider grid: a backend-known provider with
/// catalog metadata where available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub configured: bool,
}

/// Merge the backend's provider list with the catalog. A provider the
/// backend reports but the catalog does not know degrades to its raw name
/// with no description instead of failing.
pub fn summaries(known: &[ProviderDetails], active: &ActiveKeys) -> Vec<ProviderSummary> {
    known
        .iter()
        .map(|details| match describe(&details.name) {
            Some(info) => ProviderSummary {
                id: info.alias.to_string(),
                name: info.name.to_string(),
                description: info.description.to_string(),
                configured: active.is_configured(info.name),
            },
            None => {
                tracing::warn!(provider = %details.name, "provider not present in catalog");
                ProviderSummary {
                    id: details.name.to_lowercase(),
                    name: details.name.clone(),
                    description: String::new(),
                    configured: false,
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_uses_canonical_names() {
        let openai = describe("OpenAI").unwrap();
        assert_eq!(openai.alias, "openai");
        assert_eq!(openai.required_keys, &["OPENAI_API_KEY"]);
        assert_eq!(openai.default_model, "gpt-4o");

        assert!(describe("openai").is_none());
    }

    #[test]
    fn test_resolve_prefers_alias_then_lowercased_name() {
        assert_eq!(resolve("openai").unwrap().name, "OpenAI");
        assert_eq!(resolve("OpenAI").unwrap().name, "OpenAI");
        assert!(resolve("acme").is_none());
    }

    #[test]
    fn test_catalog_names_and_aliases_are_unique() {
        assert_eq!(BY_NAME.len(), PROVIDERS.len());
        assert_eq!(BY_ALIAS.len(), PROVIDERS.len());
    }

    #[test]
    fn test_every_provider_requires_at_least_one_key() {
        for provider in PROVIDERS {
            assert!(
                !provider.required_keys.is_empty(),
                "{} has no required keys",
                provider.name
            );
        }
    }

    #[test]
    fn test_unknown_backend_provider_degrades_to_raw_name() {
        let active = ActiveKeys::new();
        let known = vec![ProviderDetails {
            name: "Acme".to_string(),
            keys: vec![],
        }];

        let rows = summaries(&known, &active);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Acme");
        assert_eq!(rows[0].id, "acme");
        assert!(rows[0].description.is_empty());
        assert!(!rows[0].configured);
    }
}
