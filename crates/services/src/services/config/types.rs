use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Full profile configuration as stored in a profile's config.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Human readable profile name
    #[serde(default)]
    pub name: Option<String>,
    /// System message prepended to every conversation
    #[serde(default)]
    pub system_message: Option<String>,
    /// Models available to this profile
    #[serde(default)]
    pub models: Vec<ModelDescription>,
    /// Context providers, in the order they are offered to the user
    #[serde(default)]
    pub context_providers: Vec<ContextProvider>,
    /// Whether anonymous usage telemetry may be sent
    #[serde(default)]
    pub allow_anonymous_telemetry: bool,
}

/// A model entry, including its credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDescription {
    pub title: String,
    pub provider: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u32>,
}

/// A context provider registered on a profile.
///
/// `params` is free-form provider configuration and may carry credentials,
/// so it never leaves the process in a [`BrowserSerializedConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextProvider {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_title: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
}

impl ContextProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_display_title(mut self, title: impl Into<String>) -> Self {
        self.display_title = Some(title.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Browser-safe projection of a [`ProfileConfig`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowserSerializedConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub system_message: Option<String>,
    #[serde(default)]
    pub models: Vec<BrowserModelDescription>,
    #[serde(default)]
    pub context_providers: Vec<ContextProviderDescription>,
    #[serde(default)]
    pub allow_anonymous_telemetry: bool,
}

/// Model entry with credentials and endpoints removed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowserModelDescription {
    pub title: String,
    pub provider: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextProviderDescription {
    pub name: String,
    pub display_title: String,
}

impl From<&ModelDescription> for BrowserModelDescription {
    fn from(model: &ModelDescription) -> Self {
        Self {
            title: model.title.clone(),
            provider: model.provider.clone(),
            model: model.model.clone(),
            context_length: model.context_length,
        }
    }
}

impl From<&ContextProvider> for ContextProviderDescription {
    fn from(provider: &ContextProvider) -> Self {
        Self {
            name: provider.name.clone(),
            display_title: provider
                .display_title
                .clone()
                .unwrap_or_else(|| provider.name.clone()),
        }
    }
}

impl From<&ProfileConfig> for BrowserSerializedConfig {
    fn from(config: &ProfileConfig) -> Self {
        Self {
            name: config.name.clone(),
            system_message: config.system_message.clone(),
            models: config.models.iter().map(Into::into).collect(),
            context_providers: config.context_providers.iter().map(Into::into).collect(),
            allow_anonymous_telemetry: config.allow_anonymous_telemetry,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn projection_strips_credentials() {
        let config = ProfileConfig {
            name: Some("work".into()),
            system_message: None,
            models: vec![ModelDescription {
                title: "GPT".into(),
                provider: "openai".into(),
                model: "gpt-4o".into(),
                api_key: Some("sk-fake".into()),
                api_base: Some("https://proxy.internal".into()),
                context_length: Some(128_000),
            }],
            context_providers: vec![
                ContextProvider::new("docs").with_param("token", "secret"),
                ContextProvider::new("web").with_display_title("Web Search"),
            ],
            allow_anonymous_telemetry: true,
        };

        let browser = BrowserSerializedConfig::from(&config);

        assert_eq!(
            browser,
            BrowserSerializedConfig {
                name: Some("work".into()),
                system_message: None,
                models: vec![BrowserModelDescription {
                    title: "GPT".into(),
                    provider: "openai".into(),
                    model: "gpt-4o".into(),
                    context_length: Some(128_000),
                }],
                context_providers: vec![
                    ContextProviderDescription {
                        name: "docs".into(),
                        display_title: "docs".into(),
                    },
                    ContextProviderDescription {
                        name: "web".into(),
                        display_title: "Web Search".into(),
                    },
                ],
                allow_anonymous_telemetry: true,
            }
        );

        let serialized = serde_json::to_string(&browser).expect("should serialize");
        assert!(!serialized.contains("sk-fake"));
        assert!(!serialized.contains("secret"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: ProfileConfig = serde_json::from_value(json!({
            "models": [{ "title": "Local", "provider": "ollama", "model": "llama3" }]
        }))
        .expect("partial config should deserialize");

        assert!(config.name.is_none());
        assert!(config.context_providers.is_empty());
        assert!(!config.allow_anonymous_telemetry);
        assert_eq!(config.models[0].api_key, None);
    }
}
