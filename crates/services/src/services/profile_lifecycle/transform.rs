use anyhow::Result;

use crate::services::config::{BrowserSerializedConfig, ContextProvider, ProfileConfig};

/// Pure transforms applied around a load.
///
/// `augment` runs once per successful load before the config is published.
/// `project` runs at most once per published config.
pub trait ConfigTransforms: Send + Sync {
    fn augment(
        &self,
        config: ProfileConfig,
        extensions: &[ContextProvider],
    ) -> Result<ProfileConfig>;

    fn project(&self, config: &ProfileConfig) -> Result<BrowserSerializedConfig>;
}

/// Appends extensions after the loaded context providers and projects with
/// [`BrowserSerializedConfig::from`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTransforms;

impl ConfigTransforms for DefaultTransforms {
    fn augment(
        &self,
        mut config: ProfileConfig,
        extensions: &[ContextProvider],
    ) -> Result<ProfileConfig> {
        config.context_providers.extend(extensions.iter().cloned());
        Ok(config)
    }

    fn project(&self, config: &ProfileConfig) -> Result<BrowserSerializedConfig> {
        Ok(BrowserSerializedConfig::from(config))
    }
}
