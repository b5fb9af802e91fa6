// ─── Native Overrides ───
// HMCL-style `natives.json`: for each non-mainstream profile key, library
// name -> replacement library, or `null` to drop it. Libraries carrying a
// `natives` map are looked up as `<name>:natives`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;

use super::arch::ProfileKey;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::get_text;
use crate::core::manifest::{LaunchManifest, LibraryDescriptor};
use crate::core::sources::NativesSource;

type NativesIndex = BTreeMap<String, BTreeMap<String, Option<LibraryDescriptor>>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeOverrides {
    pub entries: BTreeMap<String, Option<LibraryDescriptor>>,
}

impl NativeOverrides {
    /// Overrides for `profile` out of a whole index document.
    pub fn parse_index(raw: &str, profile: &ProfileKey) -> LauncherResult<Self> {
        let mut index: NativesIndex = serde_json::from_str(raw)?;
        let entries = index.remove(profile.as_str()).ok_or_else(|| {
            let (os, arch) = profile
                .as_str()
                .split_once('-')
                .unwrap_or((profile.as_str(), ""));
            LauncherError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
                reason: format!("no native overrides published for {}", profile),
            }
        })?;
        Ok(Self { entries })
    }

    fn lookup_key(library: &LibraryDescriptor) -> String {
        if library.natives.is_some() {
            format!("{}:natives", library.name)
        } else {
            library.name.clone()
        }
    }

    /// Copy of `manifest` with substitutions applied. Order is preserved.
    pub fn apply(&self, manifest: &LaunchManifest) -> LaunchManifest {
        let libraries = manifest
            .libraries
            .iter()
            .filter_map(|lib| match self.entries.get(&Self::lookup_key(lib)) {
                Some(Some(replacement)) => Some(replacement.clone()),
                Some(None) => None,
                None => Some(lib.clone()),
            })
            .collect();

        LaunchManifest {
            libraries,
            ..manifest.clone()
        }
    }
}

/// The published HMCL index, downloaded once per source.
pub struct HmclNativesIndex {
    client: reqwest::Client,
    url: String,
    document: OnceCell<String>,
}

impl HmclNativesIndex {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            document: OnceCell::new(),
        }
    }
}

#[async_trait]
impl NativesSource for HmclNativesIndex {
    async fn native_overrides(&self, profile: &ProfileKey) -> LauncherResult<NativeOverrides> {
        let raw = self
            .document
            .get_or_try_init(|| get_text(&self.client, &self.url))
            .await?;
        let overrides = NativeOverrides::parse_index(raw, profile)?;
        info!(
            "Loaded {} native overrides for {}",
            overrides.entries.len(),
            profile
        );
        Ok(overrides)
    }
}
