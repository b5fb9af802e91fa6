use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::core::error::LauncherResult;
use crate::core::loaders::LoaderRequest;
use crate::core::platform::{resolve_native_profile, Os, SystemKernel};
use crate::core::resolver::LaunchResolver;
use crate::core::settings::{default_data_dir, ResolverSettings};
use crate::core::sources::KernelReleaseSource;
use crate::core::version::{compare_versions, Version};

/// launchkit - resolve Minecraft launch manifests with mod loaders applied
#[derive(Parser)]
#[command(name = "launchkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding resolver_settings.json
    #[arg(long, global = true)]
    data_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two versions (prints less, equal or greater)
    Compare { a: String, b: String },

    /// Print the native profile key for a platform (defaults to this machine)
    NativeProfile {
        #[arg(long)]
        os: Option<String>,

        #[arg(long)]
        arch: Option<String>,

        /// Kernel release, e.g. 5.19.0
        #[arg(long)]
        kernel: Option<String>,
    },

    /// Resolve the launch manifest for a game version
    Install {
        /// Minecraft version (e.g., 1.20.1)
        game: String,

        /// Loader to apply, repeatable (e.g., --loader fabric@0.15.x)
        #[arg(short, long = "loader")]
        loaders: Vec<LoaderRequest>,

        /// Resolve `latest` to the newest stable loader
        #[arg(long)]
        stable: bool,
    },
}

#[derive(Serialize)]
struct ProfileOutput<'a> {
    profile: &'a str,
    mainstream: bool,
}

pub async fn run(cli: Cli) -> ExitCode {
    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = ?e.kind(), "{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> LauncherResult<()> {
    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);

    match cli.command {
        Commands::Compare { a, b } => {
            let ordering = compare_versions(&a, &b)?;
            println!("{}", format!("{:?}", ordering).to_lowercase());
        }
        Commands::NativeProfile { os, arch, kernel } => {
            let os: Os = os.as_deref().unwrap_or(std::env::consts::OS).parse()?;
            let arch = arch.unwrap_or_else(|| std::env::consts::ARCH.to_string());
            let kernel = kernel
                .or_else(|| SystemKernel.kernel_release())
                .unwrap_or_default();
            let key = resolve_native_profile(os, &arch, &Version::parse(kernel.trim()))?;
            let output = ProfileOutput {
                profile: key.as_str(),
                mainstream: key.is_mainstream(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Install {
            game,
            loaders,
            stable,
        } => {
            let settings = ResolverSettings::load(&data_dir);
            let resolver =
                LaunchResolver::from_settings(&settings)?.prefer_stable(settings.prefer_stable_loaders || stable);
            let manifest = resolver.install_stack(&game, &loaders).await?;
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use crate::core::loaders::{LoaderKind, RequestedVersion};

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_install_with_loaders() {
        let cli = Cli::try_parse_from([
            "launchkit", "install", "1.20.1", "--loader", "fabric@0.15.x", "-l", "quilt",
        ])
        .unwrap();
        match cli.command {
            Commands::Install { game, loaders, stable } => {
                assert_eq!(game, "1.20.1");
                assert_eq!(loaders.len(), 2);
                assert_eq!(loaders[0].kind, LoaderKind::Fabric);
                assert_eq!(loaders[1].version, RequestedVersion::Latest);
                assert!(!stable);
            }
            _ => panic!("expected install"),
        }
    }

    #[test]
    fn unknown_loader_is_rejected_by_the_parser() {
        assert!(Cli::try_parse_from(["launchkit", "install", "1.20.1", "--loader", "rift"]).is_err());
    }

    #[tokio::test]
    async fn compare_and_profile_commands_succeed() {
        let cli = Cli::try_parse_from(["launchkit", "compare", "1.2.0-beta.1", "1.2.0"]).unwrap();
        assert!(execute(cli).await.is_ok());

        let cli = Cli::try_parse_from([
            "launchkit", "native-profile", "--os", "linux", "--arch", "loongarch64", "--kernel", "5.19",
        ])
        .unwrap();
        assert!(execute(cli).await.is_ok());

        let cli = Cli::try_parse_from(["launchkit", "compare", "1.x.2", "1.0"]).unwrap();
        assert!(execute(cli).await.is_err());
    }
}
