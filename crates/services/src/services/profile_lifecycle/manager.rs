use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use futures::future::{BoxFuture, FutureExt, Shared};

use super::{
    error::LoadError,
    loader::{ProfileDescription, ProfileLoader},
    transform::{ConfigTransforms, DefaultTransforms},
};
use crate::services::config::{BrowserSerializedConfig, ContextProvider, ProfileConfig};

type LoadResult = Result<Arc<ProfileConfig>, LoadError>;

/// In-flight load shared by every caller that arrives while it runs
type PendingLoad = Shared<BoxFuture<'static, LoadResult>>;

/// Observable phase of a [`ProfileLifecycleManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Empty,
    Loading,
    Ready,
}

enum Slot {
    Empty,
    Loading {
        generation: u64,
        pending: PendingLoad,
    },
    Ready {
        config: Arc<ProfileConfig>,
        serialized: Option<Arc<BrowserSerializedConfig>>,
    },
}

struct Inner {
    /// Bumped every time a load starts
    generation: u64,
    slot: Slot,
}

/// Single-flight, invalidatable cache around one profile's config.
///
/// The first caller to find the cache empty starts a load on the Tokio
/// runtime; callers arriving while it runs await the same result. A
/// successful load is cached until [`clear`](Self::clear) or
/// [`reload_config`](Self::reload_config). Failures are never cached.
///
/// The browser-safe view is derived lazily and stored alongside the config it
/// was projected from, so both are always discarded together.
///
/// Clones share the same cache.
#[derive(Clone)]
pub struct ProfileLifecycleManager {
    description: ProfileDescription,
    loader: Arc<dyn ProfileLoader>,
    transforms: Arc<dyn ConfigTransforms>,
    inner: Arc<Mutex<Inner>>,
}

impl ProfileLifecycleManager {
    pub fn new(loader: Arc<dyn ProfileLoader>) -> Self {
        Self::with_transforms(loader, Arc::new(DefaultTransforms))
    }

    pub fn with_transforms(
        loader: Arc<dyn ProfileLoader>,
        transforms: Arc<dyn ConfigTransforms>,
    ) -> Self {
        let description = ProfileDescription {
            title: loader.profile_title().to_string(),
            id: loader.profile_id().to_string(),
        };

        Self {
            description,
            loader,
            transforms,
            inner: Arc::new(Mutex::new(Inner {
                generation: 0,
                slot: Slot::Empty,
            })),
        }
    }

    pub fn profile_id(&self) -> &str {
        &self.description.id
    }

    pub fn profile_title(&self) -> &str {
        &self.description.title
    }

    pub fn profile_description(&self) -> ProfileDescription {
        self.description.clone()
    }

    pub fn state(&self) -> LifecycleState {
        match self.lock().slot {
            Slot::Empty => LifecycleState::Empty,
            Slot::Loading { .. } => LifecycleState::Loading,
            Slot::Ready { .. } => LifecycleState::Ready,
        }
    }

    /// The cached config, if one is published
    pub fn cached_config(&self) -> Option<Arc<ProfileConfig>> {
        match &self.lock().slot {
            Slot::Ready { config, .. } => Some(Arc::clone(config)),
            _ => None,
        }
    }

    /// The cached browser-safe view, if one has been projected
    pub fn cached_serialized_config(&self) -> Option<Arc<BrowserSerializedConfig>> {
        match &self.lock().slot {
            Slot::Ready {
                serialized: Some(view),
                ..
            } => Some(Arc::clone(view)),
            _ => None,
        }
    }

    /// Drop the cached config, its serialized view, and any pending load.
    ///
    /// An in-flight load keeps running; callers already awaiting it still get
    /// its result, but it will not repopulate the cache.
    pub fn clear(&self) {
        let previous = std::mem::replace(&mut self.lock().slot, Slot::Empty);
        if !matches!(previous, Slot::Empty) {
            tracing::debug!(profile_id = %self.description.id, "cleared profile config");
        }
    }

    /// Clear the cache and load again, without extensions
    pub async fn reload_config(&self) -> Result<Arc<ProfileConfig>, LoadError> {
        self.reload_config_with(&[]).await
    }

    /// Clear the cache and load again, appending `extensions` to the result.
    ///
    /// The new load becomes the pending load, so concurrent
    /// [`load_config`](Self::load_config) callers share it.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub async fn reload_config_with(
        &self,
        extensions: &[ContextProvider],
    ) -> Result<Arc<ProfileConfig>, LoadError> {
        let pending = {
            let mut inner = self.lock();
            inner.slot = Slot::Empty;
            self.begin_load(&mut inner, extensions.to_vec())
        };

        pending.await
    }

    /// Return the cached config, join the pending load, or start a new one.
    ///
    /// `extensions` are only applied when this call starts the load; they are
    /// ignored on a cache hit or when joining a load already in flight.
    ///
    /// # Panics
    ///
    /// Panics if it has to start a load outside a Tokio runtime.
    pub async fn load_config(
        &self,
        extensions: &[ContextProvider],
    ) -> Result<Arc<ProfileConfig>, LoadError> {
        let pending = {
            let mut inner = self.lock();
            match &inner.slot {
                Slot::Ready { config, .. } => return Ok(Arc::clone(config)),
                Slot::Loading { pending, .. } => pending.clone(),
                Slot::Empty => self.begin_load(&mut inner, extensions.to_vec()),
            }
        };

        pending.await
    }

    /// Return the browser-safe view, loading the config first if needed.
    ///
    /// The projection runs at most once per published config.
    ///
    /// # Panics
    ///
    /// Panics if it has to start a load outside a Tokio runtime.
    pub async fn get_serialized_config(
        &self,
        extensions: &[ContextProvider],
    ) -> Result<Arc<BrowserSerializedConfig>, LoadError> {
        if let Some(view) = self.cached_serialized_config() {
            return Ok(view);
        }

        let config = self.load_config(extensions).await?;

        {
            let mut inner = self.lock();
            if let Slot::Ready {
                config: current,
                serialized,
            } = &mut inner.slot
                && Arc::ptr_eq(current, &config)
            {
                if let Some(view) = serialized.as_ref() {
                    return Ok(Arc::clone(view));
                }

                let view = Arc::new(self.transforms.project(&config)?);
                *serialized = Some(Arc::clone(&view));
                return Ok(view);
            }
        }

        // Invalidated between the load and now; hand back a view of what we
        // loaded without caching it against a newer generation.
        tracing::debug!(
            profile_id = %self.description.id,
            "profile config replaced before projection, returning uncached view"
        );
        Ok(Arc::new(self.transforms.project(&config)?))
    }

    /// Start a load and install it as the pending load. Caller holds the lock.
    fn begin_load(&self, inner: &mut Inner, extensions: Vec<ContextProvider>) -> PendingLoad {
        inner.generation = inner.generation.wrapping_add(1);
        let generation = inner.generation;

        tracing::debug!(
            profile_id = %self.description.id,
            generation,
            extensions = extensions.len(),
            "loading profile config"
        );

        let loader = Arc::clone(&self.loader);
        let transforms = Arc::clone(&self.transforms);
        let state = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let result = run_load(loader.as_ref(), transforms.as_ref(), &extensions).await;
            settle(&state, generation, &result);
            result
        });

        let state = Arc::clone(&self.inner);
        let pending = async move {
            match task.await {
                Ok(result) => result,
                Err(err) => {
                    let result = Err(LoadError::Interrupted(err.to_string()));
                    settle(&state, generation, &result);
                    result
                }
            }
        }
        .boxed()
        .shared();

        inner.slot = Slot::Loading {
            generation,
            pending: pending.clone(),
        };
        pending
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock_state(&self.inner)
    }
}

impl fmt::Debug for ProfileLifecycleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileLifecycleManager")
            .field("description", &self.description)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

async fn run_load(
    loader: &dyn ProfileLoader,
    transforms: &dyn ConfigTransforms,
    extensions: &[ContextProvider],
) -> LoadResult {
    let config = loader.load().await?;
    let config = transforms.augment(config, extensions)?;
    Ok(Arc::new(config))
}

/// Publish the outcome of a load if it is still the pending one
fn settle(state: &Mutex<Inner>, generation: u64, result: &LoadResult) {
    let mut inner = lock_state(state);
    let current = matches!(
        inner.slot,
        Slot::Loading { generation: pending, .. } if pending == generation
    );

    if !current {
        tracing::trace!(generation, "discarding superseded profile load");
        return;
    }

    inner.slot = match result {
        Ok(config) => {
            tracing::debug!(generation, "profile config ready");
            Slot::Ready {
                config: Arc::clone(config),
                serialized: None,
            }
        }
        Err(_) => {
            tracing::debug!(generation, "profile config load failed, cache left empty");
            Slot::Empty
        }
    };
}

fn lock_state(state: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    // Every mutation leaves the slot consistent, so a poisoned lock is still usable.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
