use async_trait::async_trait;
use tracing::info;

use super::installer::{LoaderInstaller, LoaderOverlay};
use super::kind::LoaderKind;
use super::processors::ProcessorStage;
use super::release::LoaderRelease;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::manifest::LaunchManifest;
use crate::core::maven::{FORGE_MAVEN, NEOFORGE_MAVEN};
use crate::core::sources::{LoaderMetadataSource, OverlayDocument};

/// Forge and NeoForge: the overlay is the installer's `version.json`; the
/// install profile's processors become a post-merge stage.
pub struct ForgeLikeInstaller {
    kind: LoaderKind,
}

impl ForgeLikeInstaller {
    pub fn new(kind: LoaderKind) -> Self {
        Self { kind }
    }

    fn repository(&self) -> &'static str {
        match self.kind {
            LoaderKind::NeoForge => NEOFORGE_MAVEN,
            _ => FORGE_MAVEN,
        }
    }

    fn version_id(&self, minecraft_version: &str, loader_version: &str) -> String {
        match self.kind {
            LoaderKind::NeoForge => format!("neoforge-{}", loader_version),
            _ => format!("{}-forge-{}", minecraft_version, loader_version),
        }
    }

    fn build_overlay(
        &self,
        document: OverlayDocument,
        minecraft_version: &str,
        release: &LoaderRelease,
    ) -> LauncherResult<(LaunchManifest, ProcessorStage)> {
        let OverlayDocument::Installer {
            version,
            install_profile,
        } = document
        else {
            return Err(LauncherError::Fetch(format!(
                "{} metadata returned a launcher profile instead of an installer",
                self.kind
            )));
        };

        let fallback_id = self.version_id(minecraft_version, release.version.as_str());
        let mut manifest = version.into_manifest(&fallback_id);

        let repo = self.repository();
        for lib in &mut manifest.libraries {
            if lib.url.is_none() && lib.downloads.is_none() {
                lib.url = Some(repo.to_string());
            }
        }

        let stage = ProcessorStage::new(install_profile, minecraft_version)?;
        Ok((manifest, stage))
    }
}

#[async_trait]
impl LoaderInstaller for ForgeLikeInstaller {
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
        let (manifest, stage) = self.build_overlay(document, minecraft_version, &release)?;

        info!(
            "{} {} installer read ({} libraries, {} processors)",
            self.kind,
            release.version,
            manifest.libraries.len(),
            stage.tasks()?.len()
        );

        Ok(LoaderOverlay {
            kind: self.kind,
            release,
            manifest,
            stage: Some(Box::new(stage)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::VersionDocument;
    use crate::core::version::{DependencyConstraint, Version, VersionPredicate};

    fn release(version: &str, game: &str) -> LoaderRelease {
        LoaderRelease::new(
            Version::parse(version),
            DependencyConstraint::new("minecraft", VersionPredicate::parse(game).unwrap()),
            true,
        )
    }

    fn installer_document(version_json: &str) -> OverlayDocument {
        OverlayDocument::Installer {
            version: VersionDocument::parse(version_json).unwrap(),
            install_profile: serde_json::from_value(serde_json::json!({
                "data": {"SIDE_MARKER": {"client": "'yes'", "server": "'no'"}},
                "processors": [
                    {"sides": ["client"], "jar": "net.minecraftforge:installertools:1.4.1", "args": ["{SIDE_MARKER}"]}
                ]
            }))
            .unwrap(),
        }
    }

    #[test]
    fn forge_overlay_and_stage() {
        let installer = ForgeLikeInstaller::new(LoaderKind::Forge);
        let (manifest, stage) = installer
            .build_overlay(
                installer_document(
                    r#"{
                        "id": "1.20.1-forge-47.2.0",
                        "inheritsFrom": "1.20.1",
                        "mainClass": "cpw.mods.bootstraplauncher.BootstrapLauncher",
                        "arguments": {"game": ["--launchTarget", "forgeclient"]},
                        "libraries": [{"name": "net.minecraftforge:fmlloader:1.20.1-47.2.0"}]
                    }"#,
                ),
                "1.20.1",
                &release("47.2.0", "1.20.1"),
            )
            .unwrap();

        assert_eq!(manifest.id, "1.20.1-forge-47.2.0");
        assert_eq!(manifest.game_arguments.len(), 2);
        assert_eq!(manifest.libraries[0].url.as_deref(), Some(FORGE_MAVEN));

        let tasks = stage.tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].args, vec!["yes"]);
    }

    #[test]
    fn neoforge_fallback_id() {
        let installer = ForgeLikeInstaller::new(LoaderKind::NeoForge);
        let (manifest, _) = installer
            .build_overlay(
                installer_document(r#"{"mainClass": "cpw.mods.bootstraplauncher.BootstrapLauncher"}"#),
                "1.20.4",
                &release("20.4.237", "1.20.4"),
            )
            .unwrap();
        assert_eq!(manifest.id, "neoforge-20.4.237");
    }

    #[test]
    fn profile_documents_are_rejected() {
        let installer = ForgeLikeInstaller::new(LoaderKind::Forge);
        let document = OverlayDocument::Profile(
            VersionDocument::parse(r#"{"mainClass": "x.Main"}"#).unwrap(),
        );
        assert!(installer
            .build_overlay(document, "1.20.1", &release("47.2.0", "1.20.1"))
            .is_err());
    }
}
