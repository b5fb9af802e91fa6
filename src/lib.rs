mod cli;
pub mod core;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use crate::core::error::{ErrorKind, LauncherError, LauncherResult};
pub use crate::core::loaders::{LoaderKind, LoaderRequest, RequestedVersion};
pub use crate::core::manifest::{merge, merge_all, LaunchManifest};
pub use crate::core::platform::{resolve_native_profile, Os, Platform, ProfileKey};
pub use crate::core::resolver::LaunchResolver;
pub use crate::core::settings::ResolverSettings;
pub use crate::core::version::{compare_versions, SemanticVersion, Version, VersionPredicate};

pub async fn run() -> ExitCode {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,launchkit=debug")),
        )
        .init();

    tracing::info!("launchkit {} starting...", env!("CARGO_PKG_VERSION"));

    cli::run(cli::Cli::parse()).await
}
