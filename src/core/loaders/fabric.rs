use async_trait::async_trait;
use tracing::info;

use super::installer::{LoaderInstaller, LoaderOverlay};
use super::kind::LoaderKind;
use super::release::LoaderRelease;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::manifest::{LaunchManifest, LibraryDescriptor};
use crate::core::maven::{FABRIC_MAVEN, QUILT_MAVEN};
use crate::core::sources::{LoaderMetadataSource, OverlayDocument};

/// Fabric and Quilt: the meta service hands out a ready launcher profile
/// that only adds libraries, arguments and a new main class.
pub struct FabricLikeInstaller {
    kind: LoaderKind,
}

impl FabricLikeInstaller {
    pub fn new(kind: LoaderKind) -> Self {
        Self { kind }
    }

    fn loader_coordinate(&self, loader_version: &str) -> (String, &'static str) {
        match self.kind {
            LoaderKind::Quilt => (
                format!("org.quiltmc:quilt-loader:{}", loader_version),
                QUILT_MAVEN,
            ),
            _ => (
                format!("net.fabricmc:fabric-loader:{}", loader_version),
                FABRIC_MAVEN,
            ),
        }
    }

    fn default_repository(&self) -> &'static str {
        match self.kind {
            LoaderKind::Quilt => QUILT_MAVEN,
            _ => FABRIC_MAVEN,
        }
    }

    /// Profiles normally list the loader jar; add it when they don't.
    fn ensure_loader_artifact(&self, manifest: &mut LaunchManifest, loader_version: &str) {
        let (coord, repo) = self.loader_coordinate(loader_version);
        let loader = LibraryDescriptor::new(coord).with_repository(repo);
        let identity = loader.identity();
        if manifest.libraries.iter().any(|lib| lib.identity() == identity) {
            return;
        }
        manifest.libraries.insert(0, loader);
    }

    fn build_overlay(
        &self,
        document: OverlayDocument,
        minecraft_version: &str,
        release: &LoaderRelease,
    ) -> LauncherResult<LaunchManifest> {
        let OverlayDocument::Profile(profile) = document else {
            return Err(LauncherError::Fetch(format!(
                "{} metadata returned an installer instead of a launcher profile",
                self.kind
            )));
        };

        let fallback_id = format!(
            "{}-loader-{}-{}",
            self.kind, release.version, minecraft_version
        );
        let mut manifest = profile.into_manifest(&fallback_id);

        let repo = self.default_repository();
        for lib in &mut manifest.libraries {
            if lib.url.is_none() && lib.downloads.is_none() {
                lib.url = Some(repo.to_string());
            }
        }
        self.ensure_loader_artifact(&mut manifest, release.version.as_str());
        Ok(manifest)
    }
}

#[async_trait]
impl LoaderInstaller for FabricLikeInstaller {
    fn kind(&self) -> LoaderKind {
        self.kind
    }

    async fn fetch_overlay(
        &self,
        metadata: &dyn LoaderMetadataSource,
        minecraft_version: &str,
        release: LoaderRelease,
    ) -> LauncherResult<LoaderOverlay> {
        let document = metadata
            .overlay_document(self.kind, minecraft_version, release.version.as_str())
            .await?;
        let manifest = self.build_overlay(document, minecraft_version, &release)?;

        info!(
            "{} {} profile ready ({} libraries)",
            self.kind,
            release.version,
            manifest.libraries.len()
        );

        Ok(LoaderOverlay {
            kind: self.kind,
            release,
            manifest,
            stage: None,
        })
    }
}
