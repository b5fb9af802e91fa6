// ─── External Collaborators ───
// Everything that performs I/O on behalf of the core sits behind these traits.
// HTTP implementations live next to the data they fetch; tests use in-memory
// fakes.

use async_trait::async_trait;

use crate::core::error::LauncherResult;
use crate::core::loaders::{InstallProfile, LoaderKind, LoaderRelease};
use crate::core::manifest::{LaunchManifest, VersionDocument};
use crate::core::platform::{NativeOverrides, ProfileKey};

/// Vanilla launch manifest for a game version.
#[async_trait]
pub trait BaseManifestSource: Send + Sync {
    async fn base_manifest(&self, minecraft_version: &str) -> LauncherResult<LaunchManifest>;
}

/// Raw overlay as published by a loader.
#[derive(Debug)]
pub enum OverlayDocument {
    /// Fabric-like launcher profile.
    Profile(VersionDocument),
    /// Forge-like installer contents.
    Installer {
        version: VersionDocument,
        install_profile: InstallProfile,
    },
}

/// Loader release listings and overlay documents.
#[async_trait]
pub trait LoaderMetadataSource: Send + Sync {
    /// Releases with their game-version constraints. `minecraft_version`
    /// lets a source narrow the listing; callers still filter the result.
    async fn loader_releases(
        &self,
        kind: LoaderKind,
        minecraft_version: &str,
    ) -> LauncherResult<Vec<LoaderRelease>>;

    async fn overlay_document(
        &self,
        kind: LoaderKind,
        minecraft_version: &str,
        loader_version: &str,
    ) -> LauncherResult<OverlayDocument>;
}

/// Community native-library substitutions for a profile key.
#[async_trait]
pub trait NativesSource: Send + Sync {
    async fn native_overrides(&self, profile: &ProfileKey) -> LauncherResult<NativeOverrides>;
}

/// Raw kernel release of the running system (`uname -r`).
pub trait KernelReleaseSource: Send + Sync {
    fn kernel_release(&self) -> Option<String>;
}
