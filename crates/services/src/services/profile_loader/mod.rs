//! Profile Loader Service
//!
//! Loads profile configs from disk for the lifecycle manager.
//! Supports invalidation or hot-reload when the profile file changes.

mod local;
mod watcher;

pub use local::{FileProfileLoader, LOCAL_PROFILE_ID, LOCAL_PROFILE_TITLE};
pub use watcher::{ProfileWatcher, WatchMode, WatcherHandle, WatcherSettings};
