/// Application-level constants
pub const APP_NAME: &str = "Medfolio";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default Ollama endpoint (local instance).
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default multimodal model used for summaries and image analysis.
pub const DEFAULT_MODEL: &str = "medgemma:4b";

/// Default request timeout for AI calls (5 minutes, summaries are slow on CPU).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

pub const ENV_OLLAMA_URL: &str = "MEDFOLIO_OLLAMA_URL";
pub const ENV_MODEL: &str = "MEDFOLIO_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "MEDFOLIO_TIMEOUT_SECS";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "medfolio=debug,medfolio_lib=debug,warn"
    } else {
        "medfolio=info,medfolio_lib=info,warn"
    }
}

/// Where and how to reach the text/vision model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiSettings {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AiSettings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let timeout_secs = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        default = DEFAULT_TIMEOUT_SECS,
                        "Invalid {ENV_TIMEOUT_SECS}, using default"
                    );
                    defaults.timeout_secs
                }
            },
            None => defaults.timeout_secs,
        };

        Self {
            base_url: get(ENV_OLLAMA_URL).unwrap_or(defaults.base_url),
            model: get(ENV_MODEL).unwrap_or(defaults.model),
            timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_name_is_medfolio() {
        assert_eq!(APP_NAME, "Medfolio");
    }

    #[test]
    fn defaults_when_nothing_set() {
        let settings = AiSettings::from_lookup(lookup(&[]));
        assert_eq!(settings, AiSettings::default());
        assert_eq!(settings.base_url, "http://localhost:11434");
    }

    #[test]
    fn env_values_override_defaults() {
        let settings = AiSettings::from_lookup(lookup(&[
            (ENV_OLLAMA_URL, "http://10.0.0.5:11434"),
            (ENV_MODEL, "llava:7b"),
            (ENV_TIMEOUT_SECS, "60"),
        ]));
        assert_eq!(settings.base_url, "http://10.0.0.5:11434");
        assert_eq!(settings.model, "llava:7b");
        assert_eq!(settings.timeout_secs, 60);
    }

    #[test]
    fn invalid_timeout_falls_back() {
        let settings = AiSettings::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")]));
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);

        let settings = AiSettings::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "0")]));
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn blank_values_are_ignored() {
        let settings = AiSettings::from_lookup(lookup(&[(ENV_MODEL, "   ")]));
        assert_eq!(settings.model, DEFAULT_MODEL);
    }

    #[test]
    fn log_filter_targets_both_crates() {
        let filter = default_log_filter();
        assert!(filter.contains("medfolio_lib="));
        assert!(filter.contains("medfolio="));
    }
}
