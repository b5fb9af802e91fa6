// ─── Loader Metadata over HTTP ───
// Fabric/Quilt meta services and the Forge/NeoForge Maven repositories.

use std::io::Read;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::kind::LoaderKind;
use super::processors::InstallProfile;
use super::release::LoaderRelease;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::{get_bytes, get_optional_text, get_text, verify_sha1};
use crate::core::manifest::VersionDocument;
use crate::core::maven::MavenMetadata;
use crate::core::settings::ResolverSettings;
use crate::core::sources::{LoaderMetadataSource, OverlayDocument};
use crate::core::version::{DependencyConstraint, Version, VersionPredicate};

const GAME_ARTIFACT: &str = "minecraft";

/// NeoForge for 1.20.1 was published as `net.neoforged:forge` with Forge-style
/// `{game}-{loader}` ids.
const LEGACY_NEOFORGE_GAME: &str = "1.20.1";

pub struct HttpLoaderMetadata {
    client: reqwest::Client,
    fabric_meta: String,
    quilt_meta: String,
    forge_maven: String,
    neoforge_maven: String,
}

impl HttpLoaderMetadata {
    pub fn new(client: reqwest::Client, settings: &ResolverSettings) -> Self {
        Self {
            client,
            fabric_meta: settings.fabric_meta_url.trim_end_matches('/').to_string(),
            quilt_meta: settings.quilt_meta_url.trim_end_matches('/').to_string(),
            forge_maven: settings.forge_maven_url.trim_end_matches('/').to_string(),
            neoforge_maven: settings.neoforge_maven_url.trim_end_matches('/').to_string(),
        }
    }

    fn meta_base(&self, kind: LoaderKind) -> &str {
        match kind {
            LoaderKind::Quilt => &self.quilt_meta,
            _ => &self.fabric_meta,
        }
    }

    fn installer_url(&self, kind: LoaderKind, minecraft_version: &str, loader_version: &str) -> String {
        match kind {
            LoaderKind::NeoForge if is_legacy_neoforge(minecraft_version, loader_version) => {
                let id = format!("{}-{}", minecraft_version, loader_version);
                format!(
                    "{}/net/neoforged/forge/{id}/forge-{id}-installer.jar",
                    self.neoforge_maven,
                    id = id
                )
            }
            LoaderKind::NeoForge => format!(
                "{}/net/neoforged/neoforge/{v}/neoforge-{v}-installer.jar",
                self.neoforge_maven,
                v = loader_version
            ),
            _ => {
                let id = format!("{}-{}", minecraft_version, loader_version);
                format!(
                    "{}/net/minecraftforge/forge/{id}/forge-{id}-installer.jar",
                    self.forge_maven,
                    id = id
                )
            }
        }
    }

    /// Download an installer and check it against the published `.sha1`.
    async fn download_installer(&self, url: &str) -> LauncherResult<Vec<u8>> {
        let bytes = get_bytes(&self.client, url).await?;
        match get_optional_text(&self.client, &format!("{}.sha1", url)).await? {
            Some(expected) => verify_sha1(url, &bytes, &expected)?,
            None => debug!("No published checksum for {}", url),
        }
        Ok(bytes)
    }
}

#[async_trait]
impl LoaderMetadataSource for HttpLoaderMetadata {
    async fn loader_releases(
        &self,
        kind: LoaderKind,
        minecraft_version: &str,
    ) -> LauncherResult<Vec<LoaderRelease>> {
        match kind {
            LoaderKind::Fabric | LoaderKind::Quilt => {
                let url = format!("{}/versions/loader/{}", self.meta_base(kind), minecraft_version);
                let body = get_text(&self.client, &url).await?;
                parse_meta_releases(&body, minecraft_version)
            }
            LoaderKind::Forge => {
                let url = MavenMetadata::metadata_url(&self.forge_maven, "net.minecraftforge", "forge");
                let metadata = MavenMetadata::parse(&get_text(&self.client, &url).await?)?;
                Ok(forge_releases(&metadata))
            }
            LoaderKind::NeoForge => {
                let url = MavenMetadata::metadata_url(&self.neoforge_maven, "net.neoforged", "neoforge");
                let metadata = MavenMetadata::parse(&get_text(&self.client, &url).await?)?;
                let mut releases = neoforge_releases(&metadata);

                if minecraft_version == LEGACY_NEOFORGE_GAME {
                    let url = MavenMetadata::metadata_url(&self.neoforge_maven, "net.neoforged", "forge");
                    let legacy = MavenMetadata::parse(&get_text(&self.client, &url).await?)?;
                    releases.extend(forge_releases(&legacy));
                }

                Ok(releases)
            }
        }
    }

    async fn overlay_document(
        &self,
        kind: LoaderKind,
        minecraft_version: &str,
        loader_version: &str,
    ) -> LauncherResult<OverlayDocument> {
        match kind {
            LoaderKind::Fabric | LoaderKind::Quilt => {
                let url = format!(
                    "{}/versions/loader/{}/{}/profile/json",
                    self.meta_base(kind),
                    minecraft_version,
                    loader_version
                );
                let body = get_text(&self.client, &url).await?;
                Ok(OverlayDocument::Profile(VersionDocument::parse(&body)?))
            }
            LoaderKind::Forge | LoaderKind::NeoForge => {
                let url = self.installer_url(kind, minecraft_version, loader_version);
                info!("Downloading {} installer {}", kind, url);
                let bytes = self.download_installer(&url).await?;
                let (version, install_profile) = read_installer_archive(&bytes)?;
                Ok(OverlayDocument::Installer {
                    version,
                    install_profile,
                })
            }
        }
    }
}

#[derive(Deserialize)]
struct MetaLoaderEntry {
    loader: MetaLoaderVersion,
}

#[derive(Deserialize)]
struct MetaLoaderVersion {
    version: String,
    /// Quilt meta omits this.
    #[serde(default)]
    stable: Option<bool>,
}

fn exact_game(minecraft_version: &str) -> DependencyConstraint {
    DependencyConstraint::new(
        GAME_ARTIFACT,
        VersionPredicate::exactly(Version::parse(minecraft_version)),
    )
}

fn has_prerelease(version: &Version) -> bool {
    version
        .as_semantic()
        .map_or(true, |v| v.prerelease_key().is_some())
}

/// Entries of `versions/loader/{game}`. Without an explicit flag a release
/// is stable when it has no prerelease part.
pub fn parse_meta_releases(body: &str, minecraft_version: &str) -> LauncherResult<Vec<LoaderRelease>> {
    let entries: Vec<MetaLoaderEntry> = serde_json::from_str(body)?;
    Ok(entries
        .into_iter()
        .map(|entry| {
            let version = Version::parse(&entry.loader.version);
            let stable = entry.loader.stable.unwrap_or_else(|| !has_prerelease(&version));
            LoaderRelease::new(version, exact_game(minecraft_version), stable)
        })
        .collect())
}

/// Forge ids are `{game}-{loader}`. Old branches repeat the game version as
/// a suffix (`1.7.10-10.13.4.1614-1.7.10`); the suffix stays in the release
/// version since installer paths need it, but does not mark it unstable.
pub fn forge_releases(metadata: &MavenMetadata) -> Vec<LoaderRelease> {
    metadata
        .versions()
        .iter()
        .filter_map(|id| id.split_once('-'))
        .map(|(game, loader)| {
            let branch_suffix = format!("-{}", game);
            let build = loader.strip_suffix(branch_suffix.as_str()).unwrap_or(loader);
            let stable = !has_prerelease(&Version::parse(build));
            LoaderRelease::new(Version::parse(loader), exact_game(game), stable)
        })
        .collect()
}

/// A NeoForge loader version that does not encode its game version belongs
/// to the legacy `net.neoforged:forge` artifact.
fn is_legacy_neoforge(minecraft_version: &str, loader_version: &str) -> bool {
    minecraft_version == LEGACY_NEOFORGE_GAME
        && neoforge_game_version(loader_version).as_deref() != Some(minecraft_version)
}

/// NeoForge `{minor}.{patch}.{build}` targets game `1.{minor}[.{patch}]`.
pub fn neoforge_game_version(loader_version: &str) -> Option<String> {
    let mut parts = loader_version.split('.');
    let minor: u32 = parts.next()?.parse().ok()?;
    let patch: u32 = parts.next()?.parse().ok()?;
    parts.next()?;
    if minor == 0 {
        return None;
    }
    Some(if patch == 0 {
        format!("1.{}", minor)
    } else {
        format!("1.{}.{}", minor, patch)
    })
}

pub fn neoforge_releases(metadata: &MavenMetadata) -> Vec<LoaderRelease> {
    metadata
        .versions()
        .iter()
        .filter_map(|id| {
            let game = neoforge_game_version(id)?;
            let version = Version::parse(id);
            let stable = !has_prerelease(&version);
            Some(LoaderRelease::new(version, exact_game(&game), stable))
        })
        .collect()
}

/// `version.json` and `install_profile.json` from an installer jar.
pub fn read_installer_archive(bytes: &[u8]) -> LauncherResult<(VersionDocument, InstallProfile)> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let install_profile: InstallProfile = {
        let file = archive.by_name("install_profile.json").map_err(|e| {
            LauncherError::Fetch(format!("Missing install_profile.json: {}", e))
        })?;
        serde_json::from_reader(file)?
    };

    let version = {
        let mut file = archive
            .by_name("version.json")
            .map_err(|e| LauncherError::Fetch(format!("Missing version.json: {}", e)))?;
        let mut raw = String::new();
        file.read_to_string(&mut raw)?;
        VersionDocument::parse(&raw)?
    };

    Ok((version, install_profile))
}
