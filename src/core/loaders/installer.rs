use async_trait::async_trait;

use crate::core::error::LauncherResult;
use crate::core::manifest::{merge, LaunchManifest};
use crate::core::sources::LoaderMetadataSource;
use crate::core::version::Version;

use super::{
    context::InstallContext,
    fabric::FabricLikeInstaller,
    forge::ForgeLikeInstaller,
    kind::{LoaderFamily, LoaderKind},
    release::{select_release, LoaderRelease, RequestedVersion},
};

/// Post-merge transformation contributed by a loader (Forge processors).
pub trait ManifestStage: Send + Sync {
    fn apply(&self, manifest: LaunchManifest) -> LauncherResult<LaunchManifest>;
}

/// A resolved loader overlay, ready to be layered on a manifest.
pub struct LoaderOverlay {
    pub kind: LoaderKind,
    pub release: LoaderRelease,
    pub manifest: LaunchManifest,
    pub stage: Option<Box<dyn ManifestStage>>,
}

impl std::fmt::Debug for LoaderOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderOverlay")
            .field("kind", &self.kind)
            .field("release", &self.release)
            .field("manifest", &self.manifest.id)
            .field("stage", &self.stage.is_some())
            .finish()
    }
}

impl LoaderOverlay {
    /// Merge onto `base`, then run the loader's stage if it has one.
    pub fn apply_to(&self, base: &LaunchManifest) -> LauncherResult<LaunchManifest> {
        let merged = merge(base, &self.manifest);
        match &self.stage {
            Some(stage) => stage.apply(merged),
            None => Ok(merged),
        }
    }
}

#[async_trait]
pub trait LoaderInstaller: Send + Sync {
    fn kind(&self) -> LoaderKind;

    /// Newest published release that admits `minecraft_version` and
    /// satisfies `requested`.
    async fn resolve_compatible_version(
        &self,
        metadata: &dyn LoaderMetadataSource,
        minecraft_version: &str,
        requested: &RequestedVersion,
    ) -> LauncherResult<LoaderRelease> {
        let releases = metadata
            .loader_releases(self.kind(), minecraft_version)
            .await?;
        tracing::debug!(
            loader = %self.kind(),
            game = minecraft_version,
            count = releases.len(),
            "Fetched loader releases"
        );
        select_release(
            self.kind(),
            releases,
            &Version::parse(minecraft_version),
            requested,
        )
    }

    async fn fetch_overlay(
        &self,
        metadata: &dyn LoaderMetadataSource,
        minecraft_version: &str,
        release: LoaderRelease,
    ) -> LauncherResult<LoaderOverlay>;

    /// Resolve and fetch the overlay without applying it.
    async fn prepare(&self, ctx: &InstallContext<'_>) -> LauncherResult<LoaderOverlay> {
        let release = self
            .resolve_compatible_version(ctx.metadata, ctx.minecraft_version, ctx.requested)
            .await?;
        tracing::info!(
            loader = %self.kind(),
            version = %release.version,
            game = ctx.minecraft_version,
            "Resolved loader version"
        );
        self.fetch_overlay(ctx.metadata, ctx.minecraft_version, release)
            .await
    }

    /// Base manifest with this loader applied.
    async fn install(&self, ctx: InstallContext<'_>) -> LauncherResult<LaunchManifest> {
        let (base, overlay) = tokio::try_join!(
            ctx.base.base_manifest(ctx.minecraft_version),
            self.prepare(&ctx),
        )?;
        overlay.apply_to(&base)
    }
}

/// Dispatcher without Box<dyn>
pub enum Installer {
    FabricLike(FabricLikeInstaller),
    ForgeLike(ForgeLikeInstaller),
}

impl Installer {
    pub fn new(kind: LoaderKind) -> Self {
        match kind.family() {
            LoaderFamily::FabricLike => Self::FabricLike(FabricLikeInstaller::new(kind)),
            LoaderFamily::ForgeLike => Self::ForgeLike(ForgeLikeInstaller::new(kind)),
        }
    }

    pub fn kind(&self) -> LoaderKind {
        match self {
            Installer::FabricLike(i) => i.kind(),
            Installer::ForgeLike(i) => i.kind(),
        }
    }

    pub async fn prepare(&self, ctx: &InstallContext<'_>) -> LauncherResult<LoaderOverlay> {
        match self {
            Installer::FabricLike(i) => i.prepare(ctx).await,
            Installer::ForgeLike(i) => i.prepare(ctx).await,
        }
    }

    pub async fn install(&self, ctx: InstallContext<'_>) -> LauncherResult<LaunchManifest> {
        match self {
            Installer::FabricLike(i) => i.install(ctx).await,
            Installer::ForgeLike(i) => i.install(ctx).await,
        }
    }
}
