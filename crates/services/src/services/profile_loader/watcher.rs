use std::{
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

/// Profile File Watcher
///
/// Watches a profile's config file and invalidates (or reloads) its lifecycle
/// manager when the file changes.
use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::services::profile_lifecycle::ProfileLifecycleManager;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What to do with the manager once a change has settled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WatchMode {
    /// Clear the cache; the next caller triggers a load
    #[default]
    Invalidate,
    /// Reload immediately on the runtime the watcher was started from
    Reload,
}

#[derive(Debug, Clone)]
pub struct WatcherSettings {
    pub mode: WatchMode,
    /// Quiet period after the last relevant event before acting
    pub settle: Duration,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            mode: WatchMode::default(),
            settle: Duration::from_millis(500),
        }
    }
}

/// Stops the watcher thread when dropped
#[derive(Debug)]
#[must_use = "dropping the handle stops the watcher"]
pub struct WatcherHandle {
    stop: Arc<AtomicBool>,
}

impl WatcherHandle {
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Keeps a [`ProfileLifecycleManager`] in step with a config file on disk
pub struct ProfileWatcher {
    manager: ProfileLifecycleManager,
    config_path: PathBuf,
    settings: WatcherSettings,
}

impl ProfileWatcher {
    pub fn new(manager: ProfileLifecycleManager, config_path: impl Into<PathBuf>) -> Self {
        Self::with_settings(manager, config_path, WatcherSettings::default())
    }

    pub fn with_settings(
        manager: ProfileLifecycleManager,
        config_path: impl Into<PathBuf>,
        settings: WatcherSettings,
    ) -> Self {
        Self {
            manager,
            config_path: config_path.into(),
            settings,
        }
    }

    /// Start watching on a dedicated thread.
    ///
    /// Must be called from within a Tokio runtime when using [`WatchMode::Reload`].
    pub fn start(self) -> Result<WatcherHandle> {
        let watch_dir = self
            .config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        if !watch_dir.exists() {
            anyhow::bail!("Cannot watch {:?}: directory does not exist", watch_dir);
        }

        let runtime = match self.settings.mode {
            WatchMode::Reload => Some(
                tokio::runtime::Handle::try_current()
                    .context("WatchMode::Reload requires a Tokio runtime")?,
            ),
            WatchMode::Invalidate => None,
        };

        tracing::info!(
            "Watching {:?} for profile {} changes",
            self.config_path,
            self.manager.profile_id()
        );

        let stop = Arc::new(AtomicBool::new(false));
        let handle = WatcherHandle { stop: stop.clone() };

        std::thread::Builder::new()
            .name(format!("profile-watcher-{}", self.manager.profile_id()))
            .spawn(move || {
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    if let Err(e) = self.watch_loop(&watch_dir, runtime, &stop) {
                        tracing::error!("Profile watcher error: {}", e);
                    }
                }));

                if let Err(panic) = result {
                    tracing::error!("Profile watcher thread panicked: {:?}", panic);
                }
            })
            .context("Failed to spawn profile watcher thread")?;

        Ok(handle)
    }

    /// Watch loop (runs in separate thread)
    fn watch_loop(
        &self,
        watch_dir: &Path,
        runtime: Option<tokio::runtime::Handle>,
        stop: &AtomicBool,
    ) -> Result<()> {
        let (tx, rx) = std::sync::mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = tx.send(event);
                }
            },
            Config::default(),
        )?;
        watcher.watch(watch_dir, RecursiveMode::NonRecursive)?;

        tracing::debug!("File watcher started for {:?}", watch_dir);

        let mut last_event: Option<Instant> = None;

        while !stop.load(Ordering::SeqCst) {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(event) => {
                    if self.is_relevant_event(&event) {
                        tracing::debug!("Detected change to {:?}: {:?}", self.config_path, event.kind);
                        last_event = Some(Instant::now());
                    }
                }
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                    if last_event.is_some_and(|at| at.elapsed() >= self.settings.settle) {
                        last_event = None;
                        self.apply_change(runtime.as_ref());
                    }
                }
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                    tracing::warn!("Profile watcher channel disconnected");
                    break;
                }
            }
        }

        tracing::debug!("Profile watcher for {:?} stopped", watch_dir);
        Ok(())
    }

    fn apply_change(&self, runtime: Option<&tokio::runtime::Handle>) {
        match runtime {
            Some(runtime) => {
                tracing::info!(
                    "Profile {} config changed, reloading...",
                    self.manager.profile_id()
                );
                if let Err(e) = runtime.block_on(self.manager.reload_config()) {
                    tracing::error!(
                        "Failed to reload profile {}: {}",
                        self.manager.profile_id(),
                        e
                    );
                }
            }
            None => {
                tracing::info!(
                    "Profile {} config changed, invalidating cache",
                    self.manager.profile_id()
                );
                self.manager.clear();
            }
        }
    }

    /// Check if event touches the watched config file
    fn is_relevant_event(&self, event: &Event) -> bool {
        match event.kind {
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => event
                .paths
                .iter()
                .any(|p| p.file_name() == self.config_path.file_name()),
            _ => false,
        }
    }
}
