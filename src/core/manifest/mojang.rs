// ─── Version Manifest ───
// Mojang version manifest v2 and the per-version JSON it points to.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::info;

use super::document::VersionDocument;
use super::model::LaunchManifest;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::{get_text, verify_sha1};
use crate::core::sources::BaseManifestSource;

/// Top-level Mojang version manifest.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionEntry>,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
}

impl VersionManifest {
    pub fn parse(raw: &str) -> LauncherResult<Self> {
        serde_json::from_str(raw).map_err(LauncherError::from)
    }

    /// Find a specific version entry by ID (e.g. "1.20.4").
    pub fn find_version(&self, id: &str) -> LauncherResult<&VersionEntry> {
        self.versions
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| LauncherError::GameVersionNotFound(id.to_string()))
    }
}

/// Base manifests straight from Mojang. The version listing is fetched once
/// per source.
pub struct MojangBaseManifestSource {
    client: reqwest::Client,
    manifest_url: String,
    listing: OnceCell<VersionManifest>,
}

impl MojangBaseManifestSource {
    pub fn new(client: reqwest::Client, manifest_url: impl Into<String>) -> Self {
        Self {
            client,
            manifest_url: manifest_url.into(),
            listing: OnceCell::new(),
        }
    }

    async fn listing(&self) -> LauncherResult<&VersionManifest> {
        self.listing
            .get_or_try_init(|| async {
                info!("Fetching Minecraft version manifest...");
                let manifest = VersionManifest::parse(&get_text(&self.client, &self.manifest_url).await?)?;
                info!("Loaded {} versions from manifest", manifest.versions.len());
                Ok::<_, LauncherError>(manifest)
            })
            .await
    }
}

#[async_trait]
impl BaseManifestSource for MojangBaseManifestSource {
    async fn base_manifest(&self, minecraft_version: &str) -> LauncherResult<LaunchManifest> {
        let entry = self.listing().await?.find_version(minecraft_version)?;
        let raw = get_text(&self.client, &entry.url).await?;
        if let Some(expected) = &entry.sha1 {
            verify_sha1(&entry.url, raw.as_bytes(), expected)?;
        }
        Ok(VersionDocument::parse(&raw)?.into_manifest(&entry.id))
    }
}
