// ─── Launch Manifest ───
// The resolved launch specification: arguments, classpath libraries and
// entry point for one game version plus any loader overlays.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::rules::{rules_allow, Rule, RuleEnvironment};
use crate::core::maven::{MavenArtifact, MOJANG_LIBRARIES};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchManifest {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits_from: Option<String>,
    pub main_class: String,
    #[serde(default)]
    pub game_arguments: Vec<Argument>,
    #[serde(default)]
    pub jvm_arguments: Vec<Argument>,
    /// Classpath order: earlier entries shadow later ones with the same identity.
    #[serde(default)]
    pub libraries: Vec<LibraryDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_index: Option<AssetIndexInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_version: Option<u32>,
    /// Install-time jobs the shell must run before the first launch.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processors: Vec<ProcessorTask>,
}

/// One argument token, or a group of tokens gated by rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Argument {
    Plain(String),
    Conditional {
        rules: Vec<Rule>,
        value: ArgumentValue,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    Single(String),
    Many(Vec<String>),
}

impl Argument {
    pub fn plain(token: impl Into<String>) -> Self {
        Argument::Plain(token.into())
    }

    fn tokens(&self, env: &RuleEnvironment) -> Vec<String> {
        match self {
            Argument::Plain(token) => vec![token.clone()],
            Argument::Conditional { rules, value } if rules_allow(rules, env) => match value {
                ArgumentValue::Single(token) => vec![token.clone()],
                ArgumentValue::Many(tokens) => tokens.clone(),
            },
            Argument::Conditional { .. } => vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryDescriptor {
    /// Maven coordinate.
    pub name: String,
    /// Repository base for libraries without explicit downloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<LibraryDownloads>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<Rule>>,
    /// OS name → native classifier, possibly containing `${arch}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natives: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<DownloadArtifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifiers: Option<BTreeMap<String, DownloadArtifact>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadArtifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndexInfo {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_size: Option<u64>,
}

/// A Forge-style processor invocation with every variable already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorTask {
    pub jar: String,
    #[serde(default)]
    pub classpath: Vec<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, String>,
}

impl LibraryDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
            downloads: None,
            rules: None,
            natives: None,
        }
    }

    pub fn with_repository(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn artifact(&self) -> Option<MavenArtifact> {
        MavenArtifact::parse(&self.name).ok()
    }

    /// Classpath identity; falls back to the raw name for non-Maven entries.
    pub fn identity(&self) -> String {
        self.artifact()
            .map(|a| a.identity())
            .unwrap_or_else(|| self.name.clone())
    }

    pub fn is_allowed(&self, env: &RuleEnvironment) -> bool {
        self.rules
            .as_deref()
            .map_or(true, |rules| rules_allow(rules, env))
    }

    /// Native classifier for the environment, with `${arch}` substituted.
    pub fn native_classifier(&self, env: &RuleEnvironment) -> Option<String> {
        self.natives
            .as_ref()?
            .get(&env.os_name)
            .map(|c| c.replace("${arch}", env.pointer_width()))
    }

    /// Old-style native-only entries carry no main artifact.
    fn is_native_only(&self) -> bool {
        self.natives.is_some()
            && self
                .downloads
                .as_ref()
                .map_or(true, |d| d.artifact.is_none())
    }

    pub fn relative_path(&self) -> Option<PathBuf> {
        if let Some(path) = self
            .downloads
            .as_ref()
            .and_then(|d| d.artifact.as_ref())
            .and_then(|a| a.path.as_deref())
        {
            return Some(path.split('/').collect());
        }
        self.artifact().map(|a| a.local_path())
    }

    pub fn download_url(&self) -> Option<String> {
        if let Some(artifact) = self.downloads.as_ref().and_then(|d| d.artifact.as_ref()) {
            if !artifact.url.is_empty() {
                return Some(artifact.url.clone());
            }
        }
        let repo = self.url.as_deref().unwrap_or(MOJANG_LIBRARIES);
        self.artifact().map(|a| a.url(repo))
    }
}

impl LaunchManifest {
    pub fn resolve_game_arguments(&self, env: &RuleEnvironment) -> Vec<String> {
        self.game_arguments.iter().flat_map(|a| a.tokens(env)).collect()
    }

    pub fn resolve_jvm_arguments(&self, env: &RuleEnvironment) -> Vec<String> {
        self.jvm_arguments.iter().flat_map(|a| a.tokens(env)).collect()
    }

    /// Libraries that belong on the classpath: rule-allowed, not native-only,
    /// first occurrence per artifact identity.
    pub fn classpath_libraries(&self, env: &RuleEnvironment) -> Vec<&LibraryDescriptor> {
        let mut seen = HashSet::new();
        self.libraries
            .iter()
            .filter(|lib| lib.is_allowed(env) && !lib.is_native_only())
            .filter(|lib| seen.insert(lib.identity()))
            .collect()
    }

    pub fn classpath_paths(&self, env: &RuleEnvironment, libs_dir: &Path) -> Vec<PathBuf> {
        self.classpath_libraries(env)
            .into_iter()
            .filter_map(|lib| lib.relative_path())
            .map(|rel| libs_dir.join(rel))
            .collect()
    }
}
