// ─── Loader Release Selection ───
// Filters published releases by their game-version constraint and picks the
// requested one.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::kind::LoaderKind;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::version::{DependencyConstraint, Version, VersionOrdering};

/// A published loader release and the game versions it supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderRelease {
    pub version: Version,
    pub game: DependencyConstraint,
    pub stable: bool,
}

impl LoaderRelease {
    pub fn new(version: Version, game: DependencyConstraint, stable: bool) -> Self {
        Self {
            version,
            game,
            stable,
        }
    }
}

/// Which release the caller wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestedVersion {
    Latest,
    LatestStable,
    /// A specific release. A wildcard (`0.15.x`) picks the newest match.
    Exact(Version),
}

impl FromStr for RequestedVersion {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "latest" => Ok(RequestedVersion::Latest),
            "stable" | "recommended" => Ok(RequestedVersion::LatestStable),
            _ => Ok(RequestedVersion::Exact(Version::parse(trimmed))),
        }
    }
}

impl fmt::Display for RequestedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestedVersion::Latest => f.write_str("latest"),
            RequestedVersion::LatestStable => f.write_str("stable"),
            RequestedVersion::Exact(v) => write!(f, "{}", v),
        }
    }
}

/// Semantic versions by strict order; they rank above opaque ones, which
/// rank equal among themselves.
fn release_order(a: &LoaderRelease, b: &LoaderRelease) -> Ordering {
    match (a.version.as_semantic(), b.version.as_semantic()) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

pub fn select_release(
    kind: LoaderKind,
    releases: Vec<LoaderRelease>,
    minecraft_version: &Version,
    requested: &RequestedVersion,
) -> LauncherResult<LoaderRelease> {
    releases
        .into_iter()
        .filter(|release| release.game.admits(minecraft_version))
        .filter(|release| match requested {
            RequestedVersion::Latest => true,
            RequestedVersion::LatestStable => release.stable,
            RequestedVersion::Exact(wanted) => {
                release.version.compare(wanted) == VersionOrdering::Equal
            }
        })
        .max_by(release_order)
        .ok_or_else(|| LauncherError::LoaderVersionNotFound {
            loader: kind.to_string(),
            game_version: minecraft_version.to_string(),
            requested: requested.to_string(),
        })
}
