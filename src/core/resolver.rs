// ─── Launch Resolver ───
// Entry point for the launcher shell: base manifest + loader overlays +
// native substitutions, in that order.

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::{debug, info};

use crate::core::error::LauncherResult;
use crate::core::http::build_http_client;
use crate::core::loaders::{
    HttpLoaderMetadata, InstallContext, Installer, LoaderOverlay, LoaderRequest, RequestedVersion,
};
use crate::core::manifest::{LaunchManifest, MojangBaseManifestSource};
use crate::core::platform::{HmclNativesIndex, Platform, SystemKernel};
use crate::core::settings::ResolverSettings;
use crate::core::sources::{BaseManifestSource, LoaderMetadataSource, NativesSource};

pub struct LaunchResolver {
    base: Arc<dyn BaseManifestSource>,
    metadata: Arc<dyn LoaderMetadataSource>,
    natives: Option<Arc<dyn NativesSource>>,
    /// Target machine. `None` skips native profile resolution entirely.
    platform: Option<Platform>,
    prefer_stable: bool,
}

impl LaunchResolver {
    pub fn new(base: Arc<dyn BaseManifestSource>, metadata: Arc<dyn LoaderMetadataSource>) -> Self {
        Self {
            base,
            metadata,
            natives: None,
            platform: None,
            prefer_stable: false,
        }
    }

    /// HTTP collaborators for every endpoint in `settings`, targeting the
    /// running machine.
    pub fn from_settings(settings: &ResolverSettings) -> LauncherResult<Self> {
        let client = build_http_client(settings)?;
        let base = MojangBaseManifestSource::new(client.clone(), settings.mojang_manifest_url.clone());
        let metadata = HttpLoaderMetadata::new(client.clone(), settings);
        let natives = HmclNativesIndex::new(client, settings.natives_index_url.clone());
        let platform = Platform::current(&SystemKernel)?;
        debug!(
            "Resolver targeting {} {} (kernel {})",
            platform.os, platform.arch, platform.kernel_release
        );

        Ok(Self::new(Arc::new(base), Arc::new(metadata))
            .with_natives(Arc::new(natives))
            .with_platform(platform)
            .prefer_stable(settings.prefer_stable_loaders))
    }

    pub fn with_natives(mut self, natives: Arc<dyn NativesSource>) -> Self {
        self.natives = Some(natives);
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Treat `latest` as "latest stable".
    pub fn prefer_stable(mut self, prefer: bool) -> Self {
        self.prefer_stable = prefer;
        self
    }

    fn effective_request(&self, requested: &RequestedVersion) -> RequestedVersion {
        match requested {
            RequestedVersion::Latest if self.prefer_stable => RequestedVersion::LatestStable,
            other => other.clone(),
        }
    }

    fn context<'a>(
        &'a self,
        minecraft_version: &'a str,
        requested: &'a RequestedVersion,
    ) -> InstallContext<'a> {
        InstallContext {
            minecraft_version,
            requested,
            base: self.base.as_ref(),
            metadata: self.metadata.as_ref(),
        }
    }

    async fn prepare_overlay(
        &self,
        minecraft_version: &str,
        request: &LoaderRequest,
    ) -> LauncherResult<LoaderOverlay> {
        let requested = self.effective_request(&request.version);
        let ctx = self.context(minecraft_version, &requested);
        Installer::new(request.kind).prepare(&ctx).await
    }

    /// Manifest for `minecraft_version`, with `loader` applied when given.
    pub async fn install(
        &self,
        minecraft_version: &str,
        loader: Option<LoaderRequest>,
    ) -> LauncherResult<LaunchManifest> {
        let manifest = match loader {
            Some(request) => {
                info!("Resolving Minecraft {} with {}", minecraft_version, request.kind);
                let requested = self.effective_request(&request.version);
                let ctx = self.context(minecraft_version, &requested);
                Installer::new(request.kind).install(ctx).await?
            }
            None => self.base.base_manifest(minecraft_version).await?,
        };
        self.apply_native_overrides(manifest).await
    }

    /// Apply several loaders in order. Overlays are fetched concurrently but
    /// folded left to right, so the last request owns the entry point.
    pub async fn install_stack(
        &self,
        minecraft_version: &str,
        loaders: &[LoaderRequest],
    ) -> LauncherResult<LaunchManifest> {
        info!(
            "Resolving Minecraft {} with {} loader(s)",
            minecraft_version,
            loaders.len()
        );

        let (base, overlays) = tokio::try_join!(
            self.base.base_manifest(minecraft_version),
            try_join_all(
                loaders
                    .iter()
                    .map(|request| self.prepare_overlay(minecraft_version, request))
            ),
        )?;

        let manifest = overlays
            .iter()
            .try_fold(base, |acc, overlay| overlay.apply_to(&acc))?;

        self.apply_native_overrides(manifest).await
    }

    async fn apply_native_overrides(&self, manifest: LaunchManifest) -> LauncherResult<LaunchManifest> {
        let Some(platform) = &self.platform else {
            return Ok(manifest);
        };

        let profile = platform.native_profile()?;
        if profile.is_mainstream() {
            return Ok(manifest);
        }

        match &self.natives {
            Some(natives) => {
                let overrides = natives.native_overrides(&profile).await?;
                info!("Applying native overrides for {}", profile);
                Ok(overrides.apply(&manifest))
            }
            None => Ok(manifest),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use async_trait::async_trait;

    use super::*;
    use crate::core::error::{ErrorKind, LauncherError};
    use crate::core::loaders::{LoaderKind, LoaderRelease};
    use crate::core::manifest::{Argument, LibraryDescriptor, VersionDocument};
    use crate::core::platform::{NativeOverrides, Os, ProfileKey};
    use crate::core::sources::OverlayDocument;
    use crate::core::version::{DependencyConstraint, Version, VersionPredicate};

    struct FakeBase(HashMap<String, LaunchManifest>);

    #[async_trait]
    impl BaseManifestSource for FakeBase {
        async fn base_manifest(&self, minecraft_version: &str) -> LauncherResult<LaunchManifest> {
            self.0
                .get(minecraft_version)
                .cloned()
                .ok_or_else(|| LauncherError::GameVersionNotFound(minecraft_version.to_string()))
        }
    }

    #[derive(Default)]
    struct FakeMeta {
        releases: HashMap<LoaderKind, Vec<(&'static str, &'static str, bool)>>,
        profiles: HashMap<(LoaderKind, String), String>,
        installers: HashMap<(LoaderKind, String), (String, serde_json::Value)>,
    }

    #[async_trait]
    impl LoaderMetadataSource for FakeMeta {
        async fn loader_releases(
            &self,
            kind: LoaderKind,
            _minecraft_version: &str,
        ) -> LauncherResult<Vec<LoaderRelease>> {
            Ok(self
                .releases
                .get(&kind)
                .into_iter()
                .flatten()
                .map(|(version, game, stable)| {
                    LoaderRelease::new(
                        Version::parse(version),
                        DependencyConstraint::new("minecraft", VersionPredicate::parse(game).unwrap()),
                        *stable,
                    )
                })
                .collect())
        }

        async fn overlay_document(
            &self,
            kind: LoaderKind,
            _minecraft_version: &str,
            loader_version: &str,
        ) -> LauncherResult<OverlayDocument> {
            let key = (kind, loader_version.to_string());
            if let Some(raw) = self.profiles.get(&key) {
                return Ok(OverlayDocument::Profile(VersionDocument::parse(raw)?));
            }
            if let Some((version, profile)) = self.installers.get(&key) {
                return Ok(OverlayDocument::Installer {
                    version: VersionDocument::parse(version)?,
                    install_profile: serde_json::from_value(profile.clone())?,
                });
            }
            Err(LauncherError::FetchStatus {
                url: format!("fake://{}/{}", kind, loader_version),
                status: 404,
            })
        }
    }

    struct FakeNatives(NativeOverrides);

    #[async_trait]
    impl NativesSource for FakeNatives {
        async fn native_overrides(&self, _profile: &ProfileKey) -> LauncherResult<NativeOverrides> {
            Ok(self.0.clone())
        }
    }

    fn vanilla() -> LaunchManifest {
        LaunchManifest {
            id: "1.20.1".into(),
            main_class: "net.minecraft.client.main.Main".into(),
            game_arguments: vec![Argument::plain("--username"), Argument::plain("${auth_player_name}")],
            libraries: vec![
                LibraryDescriptor::new("org.lwjgl:lwjgl:3.3.1"),
                LibraryDescriptor::new("com.mojang:brigadier:1.1.8"),
            ],
            java_version: Some(17),
            ..LaunchManifest::default()
        }
    }

    fn fabric_profile(version: &str) -> String {
        format!(
            r#"{{
                "id": "fabric-loader-{v}-1.20.1",
                "inheritsFrom": "1.20.1",
                "mainClass": "net.fabricmc.loader.impl.launch.knot.KnotClient",
                "libraries": [
                    {{"name": "net.fabricmc:fabric-loader:{v}", "url": "https://maven.fabricmc.net/"}},
                    {{"name": "net.fabricmc:intermediary:1.20.1", "url": "https://maven.fabricmc.net/"}}
                ]
            }}"#,
            v = version
        )
    }

    fn fake_meta() -> FakeMeta {
        let mut meta = FakeMeta::default();
        meta.releases.insert(
            LoaderKind::Fabric,
            vec![
                ("0.14.0", ">=1.19", true),
                ("0.15.0", ">=1.20", true),
                ("0.15.1", ">=1.20", true),
                ("0.16.0-beta.1", ">=1.20", false),
                ("0.16.5", ">=1.21", true),
            ],
        );
        for v in ["0.14.0", "0.15.0", "0.15.1", "0.16.0-beta.1"] {
            meta.profiles.insert((LoaderKind::Fabric, v.to_string()), fabric_profile(v));
        }

        meta.releases.insert(LoaderKind::Quilt, vec![("0.23.1", "1.20.1", true)]);
        meta.profiles.insert(
            (LoaderKind::Quilt, "0.23.1".to_string()),
            r#"{"mainClass": "org.quiltmc.loader.impl.launch.knot.KnotClient",
                "libraries": [{"name": "org.quiltmc:quilt-loader:0.23.1"}]}"#
                .to_string(),
        );

        meta.releases.insert(LoaderKind::Forge, vec![("47.2.0", "1.20.1", true)]);
        meta.installers.insert(
            (LoaderKind::Forge, "47.2.0".to_string()),
            (
                r#"{"id": "1.20.1-forge-47.2.0", "inheritsFrom": "1.20.1",
                    "mainClass": "cpw.mods.bootstraplauncher.BootstrapLauncher",
                    "arguments": {"game": ["--launchTarget", "forgeclient"]},
                    "libraries": [{"name": "net.minecraftforge:fmlloader:1.20.1-47.2.0"}]}"#
                    .to_string(),
                serde_json::json!({
                    "data": {"PATCHED": {"client": "[net.minecraftforge:forge:1.20.1-47.2.0:client]", "server": "''"}},
                    "processors": [
                        {"jar": "net.minecraftforge:binarypatcher:1.1.1", "args": ["--output", "{PATCHED}"]}
                    ]
                }),
            ),
        );
        meta
    }

    fn resolver() -> LaunchResolver {
        let base = FakeBase(HashMap::from([("1.20.1".to_string(), vanilla())]));
        LaunchResolver::new(Arc::new(base), Arc::new(fake_meta()))
            .with_platform(Platform::new(Os::Linux, "x86_64", Version::parse("6.5.0")))
    }

    fn names(m: &LaunchManifest) -> Vec<&str> {
        m.libraries.iter().map(|l| l.name.as_str()).collect()
    }

    #[tokio::test]
    async fn vanilla_install_is_the_base_manifest() {
        let manifest = resolver().install("1.20.1", None).await.unwrap();
        assert_eq!(manifest, vanilla());
    }

    #[tokio::test]
    async fn fabric_latest_picks_newest_admissible() {
        let manifest = resolver()
            .install("1.20.1", Some("fabric@0.15.x".parse().unwrap()))
            .await
            .unwrap();
        assert_eq!(manifest.id, "fabric-loader-0.15.1-1.20.1");

        let manifest = resolver()
            .prefer_stable(true)
            .install("1.20.1", Some(LoaderRequest::latest(LoaderKind::Fabric)))
            .await
            .unwrap();
        assert_eq!(manifest.id, "fabric-loader-0.15.1-1.20.1");
        assert_eq!(manifest.main_class, "net.fabricmc.loader.impl.launch.knot.KnotClient");
        assert_eq!(
            names(&manifest),
            vec![
                "net.fabricmc:fabric-loader:0.15.1",
                "net.fabricmc:intermediary:1.20.1",
                "org.lwjgl:lwjgl:3.3.1",
                "com.mojang:brigadier:1.1.8",
            ]
        );
        assert_eq!(manifest.java_version, Some(17));
    }

    #[tokio::test]
    async fn plain_latest_includes_prereleases() {
        let manifest = resolver()
            .install("1.20.1", Some(LoaderRequest::latest(LoaderKind::Fabric)))
            .await
            .unwrap();
        assert_eq!(manifest.id, "fabric-loader-0.16.0-beta.1-1.20.1");
    }

    #[tokio::test]
    async fn forge_runs_processor_stage() {
        let manifest = resolver()
            .install("1.20.1", Some("forge@47.2.0".parse().unwrap()))
            .await
            .unwrap();
        assert_eq!(manifest.main_class, "cpw.mods.bootstraplauncher.BootstrapLauncher");
        assert_eq!(manifest.game_arguments.len(), 4);
        assert_eq!(manifest.processors.len(), 1);
        assert_eq!(
            manifest.processors[0].args[1],
            "${library_directory}/net/minecraftforge/forge/1.20.1-47.2.0/forge-1.20.1-47.2.0-client.jar"
        );
    }

    #[tokio::test]
    async fn forge_installer_merges_and_stages() {
        let base = FakeBase(HashMap::from([("1.20.1".to_string(), vanilla())]));
        let meta = fake_meta();
        let requested = RequestedVersion::LatestStable;
        let ctx = InstallContext {
            minecraft_version: "1.20.1",
            requested: &requested,
            base: &base,
            metadata: &meta,
        };
        let manifest = Installer::new(LoaderKind::Forge).install(ctx).await.unwrap();

        assert_eq!(manifest.id, "1.20.1-forge-47.2.0");
        assert_eq!(manifest.main_class, "cpw.mods.bootstraplauncher.BootstrapLauncher");
        assert_eq!(
            names(&manifest),
            vec![
                "net.minecraftforge:fmlloader:1.20.1-47.2.0",
                "org.lwjgl:lwjgl:3.3.1",
                "com.mojang:brigadier:1.1.8",
            ]
        );
        assert_eq!(manifest.java_version, Some(17));
        assert_eq!(manifest.processors.len(), 1);
        assert_eq!(manifest.processors[0].jar, "net.minecraftforge:binarypatcher:1.1.1");
    }

    #[tokio::test]
    async fn fabric_installer_skips_processor_stage() {
        let base = FakeBase(HashMap::from([("1.20.1".to_string(), vanilla())]));
        let meta = fake_meta();
        let requested = RequestedVersion::Exact(Version::parse("0.15.0"));
        let ctx = InstallContext {
            minecraft_version: "1.20.1",
            requested: &requested,
            base: &base,
            metadata: &meta,
        };
        let manifest = Installer::new(LoaderKind::Fabric).install(ctx).await.unwrap();
        assert_eq!(manifest.id, "fabric-loader-0.15.0-1.20.1");
        assert!(manifest.processors.is_empty());
        assert_eq!(names(&manifest)[0], "net.fabricmc:fabric-loader:0.15.0");
    }

    #[tokio::test]
    async fn stacked_loaders_fold_in_request_order() {
        let stack: Vec<LoaderRequest> = vec!["fabric@0.15.1".parse().unwrap(), "quilt".parse().unwrap()];
        let manifest = resolver().install_stack("1.20.1", &stack).await.unwrap();
        assert_eq!(manifest.main_class, "org.quiltmc.loader.impl.launch.knot.KnotClient");
        assert_eq!(
            names(&manifest)[..3],
            [
                "org.quiltmc:quilt-loader:0.23.1",
                "net.fabricmc:fabric-loader:0.15.1",
                "net.fabricmc:intermediary:1.20.1",
            ]
        );
    }

    #[tokio::test]
    async fn missing_loader_version_is_not_found() {
        let err = resolver()
            .install("1.20.1", Some("fabric@0.16.5".parse().unwrap()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = resolver().install("1.99", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn community_platforms_get_native_overrides() {
        let overrides = NativeOverrides {
            entries: BTreeMap::from([
                (
                    "org.lwjgl:lwjgl:3.3.1".to_string(),
                    Some(LibraryDescriptor::new("org.lwjgl:lwjgl:3.3.1").with_repository("https://example.invalid/arm64")),
                ),
                ("com.mojang:brigadier:1.1.8".to_string(), None),
            ]),
        };
        let manifest = resolver()
            .with_platform(Platform::new(Os::Linux, "aarch64", Version::parse("6.1")))
            .with_natives(Arc::new(FakeNatives(overrides.clone())))
            .install("1.20.1", None)
            .await
            .unwrap();
        assert_eq!(names(&manifest), vec!["org.lwjgl:lwjgl:3.3.1"]);
        assert_eq!(manifest.libraries[0].url.as_deref(), Some("https://example.invalid/arm64"));

        // Mainstream platforms never consult the overrides.
        let manifest = resolver()
            .with_natives(Arc::new(FakeNatives(overrides)))
            .install("1.20.1", None)
            .await
            .unwrap();
        assert_eq!(manifest, vanilla());
    }

    #[tokio::test]
    async fn unsupported_platform_fails_install() {
        let err = resolver()
            .with_platform(Platform::new(Os::Linux, "sparc64", Version::parse("6.1")))
            .install("1.20.1", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedPlatform);
    }
}
