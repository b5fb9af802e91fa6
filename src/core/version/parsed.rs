use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::semantic::SemanticVersion;
use crate::core::error::LauncherResult;

/// Outcome of comparing two arbitrary versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOrdering {
    Less,
    Equal,
    Greater,
    Incomparable,
}

impl From<Ordering> for VersionOrdering {
    fn from(value: Ordering) -> Self {
        match value {
            Ordering::Less => VersionOrdering::Less,
            Ordering::Equal => VersionOrdering::Equal,
            Ordering::Greater => VersionOrdering::Greater,
        }
    }
}

/// Any version token: game versions, loader versions, kernel releases.
///
/// Strings that fit the semantic grammar become `Semantic`; everything else
/// (snapshot ids like `23w13a`, odd kernel strings) is kept `Opaque` and only
/// compares equal to itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Version {
    Semantic(SemanticVersion),
    Opaque(String),
}

impl Version {
    pub fn parse(raw: &str) -> Self {
        match SemanticVersion::parse(raw) {
            Ok(semantic) => Version::Semantic(semantic),
            Err(_) => Version::Opaque(raw.to_string()),
        }
    }

    /// Like [`Version::parse`] but refuses anything non-semantic.
    pub fn parse_semantic(raw: &str) -> LauncherResult<Self> {
        SemanticVersion::parse(raw).map(Version::Semantic)
    }

    pub fn as_semantic(&self) -> Option<&SemanticVersion> {
        match self {
            Version::Semantic(v) => Some(v),
            Version::Opaque(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Version::Semantic(v) => v.as_str(),
            Version::Opaque(raw) => raw,
        }
    }

    pub fn compare(&self, other: &Version) -> VersionOrdering {
        match (self, other) {
            (Version::Semantic(a), Version::Semantic(b)) => a.compare_compatible(b).into(),
            (Version::Opaque(a), Version::Opaque(b)) if a == b => VersionOrdering::Equal,
            _ => VersionOrdering::Incomparable,
        }
    }
}

impl From<SemanticVersion> for Version {
    fn from(value: SemanticVersion) -> Self {
        Version::Semantic(value)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Version::parse(&raw))
    }
}
