use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::services::{
    config::{ConfigError, ProfileConfig, load_config_from_file, validate_config},
    profile_lifecycle::{LoaderError, ProfileLoader, ValidationError},
};

pub const LOCAL_PROFILE_ID: &str = "local";
pub const LOCAL_PROFILE_TITLE: &str = "Local Config";

/// Loads a profile from a JSON file
#[derive(Debug, Clone)]
pub struct FileProfileLoader {
    id: String,
    title: String,
    path: PathBuf,
}

impl FileProfileLoader {
    /// Create a loader for the local profile stored at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_identity(LOCAL_PROFILE_ID, LOCAL_PROFILE_TITLE, path)
    }

    pub fn with_identity(
        id: impl Into<String>,
        title: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ProfileLoader for FileProfileLoader {
    fn profile_id(&self) -> &str {
        &self.id
    }

    fn profile_title(&self) -> &str {
        &self.title
    }

    async fn load(&self) -> Result<ProfileConfig, LoaderError> {
        let config = match load_config_from_file(&self.path).await {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "No config file at {:?}, using defaults for profile {}",
                    self.path,
                    self.id
                );
                return Ok(ProfileConfig::default());
            }
            Err(e) => {
                return Err(LoaderError::Other(anyhow::Error::new(e).context(format!(
                    "Failed to read profile config {}",
                    self.path.display()
                ))));
            }
        };

        let problems = validate_config(&config);
        if !problems.is_empty() {
            return Err(ValidationError::new(problems).into());
        }

        Ok(config)
    }
}
