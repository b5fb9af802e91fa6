use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{LauncherError, LauncherResult};

const APP_DIR_NAME: &str = "launchkit";
const SETTINGS_FILE: &str = "resolver_settings.json";

/// Endpoints and transport knobs. Every field has a default so partial
/// files stay valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    pub mojang_manifest_url: String,
    pub fabric_meta_url: String,
    pub quilt_meta_url: String,
    pub forge_maven_url: String,
    pub neoforge_maven_url: String,
    pub natives_index_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Resolve `latest` to the newest stable release instead of the newest one.
    pub prefer_stable_loaders: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            mojang_manifest_url:
                "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json".into(),
            fabric_meta_url: "https://meta.fabricmc.net/v2".into(),
            quilt_meta_url: "https://meta.quiltmc.org/v3".into(),
            forge_maven_url: crate::core::maven::FORGE_MAVEN.into(),
            neoforge_maven_url: crate::core::maven::NEOFORGE_MAVEN.into(),
            natives_index_url:
                "https://raw.githubusercontent.com/huanghongxun/HMCL/javafx/HMCL/src/main/resources/assets/natives.json"
                    .into(),
            user_agent: concat!("launchkit/", env!("CARGO_PKG_VERSION")).into(),
            timeout_secs: 30,
            prefer_stable_loaders: false,
        }
    }
}

impl ResolverSettings {
    /// Settings stored in `data_dir`, or defaults when the file is missing
    /// or unreadable.
    pub fn load(data_dir: &Path) -> Self {
        load_settings_from_disk(data_dir).unwrap_or_default()
    }

    pub fn save(&self, data_dir: &Path) -> LauncherResult<()> {
        std::fs::create_dir_all(data_dir).map_err(|e| LauncherError::Io {
            path: data_dir.to_path_buf(),
            source: e,
        })?;
        let path = data_dir.join(SETTINGS_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json).map_err(|e| LauncherError::Io { path, source: e })
    }
}

fn load_settings_from_disk(data_dir: &Path) -> Option<ResolverSettings> {
    let path = data_dir.join(SETTINGS_FILE);
    let raw = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!("Ignoring corrupt {}: {}", path.display(), e);
            None
        }
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
