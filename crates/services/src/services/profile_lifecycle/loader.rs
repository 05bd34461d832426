use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::LoaderError;
use crate::services::config::ProfileConfig;

/// Identity of the profile a manager is bound to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDescription {
    pub title: String,
    pub id: String,
}

/// Produces the raw configuration for one profile.
///
/// Implementations decide where the config comes from. The lifecycle manager
/// only calls [`load`](ProfileLoader::load) and reads the identity once.
#[async_trait]
pub trait ProfileLoader: Send + Sync {
    fn profile_id(&self) -> &str;

    fn profile_title(&self) -> &str;

    /// Load the profile config.
    ///
    /// Return [`LoaderError::Validation`] when the config was read but has
    /// field-level problems; anything else goes through [`LoaderError::Other`].
    async fn load(&self) -> Result<ProfileConfig, LoaderError>;
}
