//! Profile Lifecycle Service
//!
//! Caches one profile's config behind a single-flight load, with a lazily
//! projected browser-safe view that is invalidated together with it.

pub mod error;
pub mod loader;
pub mod manager;
pub mod transform;


pub use error::{LoadError, LoaderError, PROBLEM_SEPARATOR, ValidationError};
pub use loader::{ProfileDescription, ProfileLoader};
pub use manager::{LifecycleState, ProfileLifecycleManager};
pub use transform::{ConfigTransforms, DefaultTransforms};
