use std::collections::HashSet;

use super::types::ProfileConfig;

/// Validate a loaded profile config and return field-level problems (if any).
///
/// Problems are reported in document order. An empty vector means the config is valid.
pub fn validate_config(config: &ProfileConfig) -> Vec<String> {
    let mut problems = Vec::new();
    let mut seen_titles = HashSet::new();

    for (index, model) in config.models.iter().enumerate() {
        if model.title.trim().is_empty() {
            problems.push(format!("models[{index}].title must not be empty"));
        } else if !seen_titles.insert(model.title.as_str()) {
            problems.push(format!("duplicate model title \"{}\"", model.title));
        }

        if model.provider.trim().is_empty() {
            problems.push(format!("models[{index}].provider must not be empty"));
        }

        if model.model.trim().is_empty() {
            problems.push(format!("models[{index}].model must not be empty"));
        }

        if model.context_length == Some(0) {
            problems.push(format!(
                "models[{index}].context_length must be greater than zero"
            ));
        }
    }

    for (index, provider) in config.context_providers.iter().enumerate() {
        if provider.name.trim().is_empty() {
            problems.push(format!("context_providers[{index}].name must not be empty"));
        }
    }

    problems
}
