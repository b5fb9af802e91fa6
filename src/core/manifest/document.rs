// ─── Version Documents ───
// Wire format shared by Mojang version JSON, Forge/NeoForge `version.json`
// and Fabric/Quilt launcher profiles.

use serde::Deserialize;

use super::model::{Argument, AssetIndexInfo, LaunchManifest, LibraryDescriptor};
use crate::core::error::{LauncherError, LauncherResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDocument {
    #[serde(default)]
    pub id: Option<String>,
    pub main_class: String,
    #[serde(default)]
    pub inherits_from: Option<String>,
    #[serde(default)]
    pub libraries: Vec<LibraryDescriptor>,
    #[serde(default)]
    pub asset_index: Option<AssetIndexInfo>,
    #[serde(default)]
    pub arguments: Option<DocumentArguments>,
    /// Pre-1.13 space separated game arguments.
    #[serde(default)]
    pub minecraft_arguments: Option<String>,
    #[serde(default)]
    pub java_version: Option<JavaVersionInfo>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentArguments {
    #[serde(default)]
    pub game: Vec<Argument>,
    #[serde(default)]
    pub jvm: Vec<Argument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaVersionInfo {
    pub major_version: u32,
}

impl VersionDocument {
    pub fn parse(raw: &str) -> LauncherResult<Self> {
        let document: VersionDocument = serde_json::from_str(raw)?;
        if document.main_class.trim().is_empty() {
            return Err(LauncherError::Fetch(format!(
                "version document {} has no main class",
                document.id.as_deref().unwrap_or("<unnamed>")
            )));
        }
        Ok(document)
    }

    /// Convert into the launch model. `fallback_id` names documents that
    /// carry no `id` of their own.
    pub fn into_manifest(self, fallback_id: &str) -> LaunchManifest {
        let (mut game_arguments, jvm_arguments) = match self.arguments {
            Some(args) => (args.game, args.jvm),
            None => (vec![], vec![]),
        };
        if game_arguments.is_empty() {
            if let Some(legacy) = &self.minecraft_arguments {
                game_arguments = legacy.split_whitespace().map(Argument::plain).collect();
            }
        }

        LaunchManifest {
            id: self.id.unwrap_or_else(|| fallback_id.to_string()),
            inherits_from: self.inherits_from,
            main_class: self.main_class,
            game_arguments,
            jvm_arguments,
            libraries: self.libraries,
            asset_index: self.asset_index,
            java_version: self.java_version.map(|j| j.major_version),
            processors: vec![],
        }
    }
}
