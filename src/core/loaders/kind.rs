use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::release::RequestedVersion;
use crate::core::error::{LauncherError, LauncherResult};

/// Supported mod loaders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LoaderKind {
    Fabric,
    Quilt,
    Forge,
    NeoForge,
}

/// Loaders sharing a metadata shape and install pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderFamily {
    /// Launcher profile with extra libraries and a new entry point.
    FabricLike,
    /// Installer archive with a version JSON and processors.
    ForgeLike,
}

impl LoaderKind {
    pub fn family(self) -> LoaderFamily {
        match self {
            LoaderKind::Fabric | LoaderKind::Quilt => LoaderFamily::FabricLike,
            LoaderKind::Forge | LoaderKind::NeoForge => LoaderFamily::ForgeLike,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LoaderKind::Fabric => "fabric",
            LoaderKind::Quilt => "quilt",
            LoaderKind::Forge => "forge",
            LoaderKind::NeoForge => "neoforge",
        }
    }
}

impl fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoaderKind {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fabric" => Ok(LoaderKind::Fabric),
            "quilt" => Ok(LoaderKind::Quilt),
            "forge" => Ok(LoaderKind::Forge),
            "neoforge" => Ok(LoaderKind::NeoForge),
            other => Err(LauncherError::UnknownLoader(other.to_string())),
        }
    }
}

/// One entry of a loader stack: which loader, which version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderRequest {
    pub kind: LoaderKind,
    pub version: RequestedVersion,
}

impl LoaderRequest {
    pub fn new(kind: LoaderKind, version: RequestedVersion) -> Self {
        Self { kind, version }
    }

    pub fn latest(kind: LoaderKind) -> Self {
        Self::new(kind, RequestedVersion::Latest)
    }
}

impl FromStr for LoaderRequest {
    type Err = LauncherError;

    /// `fabric`, `fabric@latest`, `forge@47.2.0`.
    fn from_str(s: &str) -> LauncherResult<Self> {
        let (kind, version) = match s.split_once('@') {
            Some((kind, version)) => (kind, version),
            None => (s, "latest"),
        };
        Ok(Self::new(kind.parse()?, version.parse()?))
    }
}
