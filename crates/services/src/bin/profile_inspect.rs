use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use profile_core_services::services::{
    profile_lifecycle::ProfileLifecycleManager, profile_loader::FileProfileLoader,
};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Print a profile's browser-safe config as JSON
#[derive(Debug, Parser)]
#[command(name = "profile-inspect", version)]
struct Args {
    /// Path to the profile's config.json
    path: PathBuf,

    /// Print the full loaded config, credentials included
    #[arg(long)]
    raw: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                ),
        )
        .init();

    // The loader treats a missing file as an empty profile; a typo'd path should not.
    if !args.path.is_file() {
        anyhow::bail!("No profile config at {}", args.path.display());
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let manager =
                ProfileLifecycleManager::new(Arc::new(FileProfileLoader::new(&args.path)));
            tracing::info!(
                "Loading profile {} ({}) from {:?}",
                manager.profile_title(),
                manager.profile_id(),
                args.path
            );

            let output = if args.raw {
                serde_json::to_string_pretty(manager.load_config(&[]).await?.as_ref())?
            } else {
                serde_json::to_string_pretty(manager.get_serialized_config(&[]).await?.as_ref())?
            };

            println!("{output}");
            Ok::<(), anyhow::Error>(())
        })
}
