pub mod config;
pub mod profile_lifecycle;
pub mod profile_loader;
