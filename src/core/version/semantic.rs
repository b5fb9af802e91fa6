// ─── Semantic Version ───
// Dotted numeric components with optional trailing wildcards, a prerelease
// key after `-` and a build key after `+`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::error::{LauncherError, LauncherResult};

/// A single dotted component.
///
/// `Wildcard` is declared first so the derived ordering places it below
/// every literal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    Wildcard,
    Number(u64),
}

impl Component {
    pub fn is_wildcard(self) -> bool {
        matches!(self, Component::Wildcard)
    }

    pub fn number(self) -> Option<u64> {
        match self {
            Component::Number(n) => Some(n),
            Component::Wildcard => None,
        }
    }
}

/// A parsed semantic version such as `1.20.1`, `0.15.0-beta.2+build.7` or `1.20.x`.
///
/// Two orderings exist:
/// - [`Ord`] is a strict total order where a wildcard is the smallest
///   component. It is consistent with [`PartialEq`].
/// - [`SemanticVersion::compare_compatible`] treats wildcards as matching
///   anything and is what range checks use.
///
/// The build key never takes part in either.
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    raw: String,
    components: Vec<Component>,
    prerelease: Option<String>,
    build: Option<String>,
    wildcard: bool,
}

impl SemanticVersion {
    pub fn parse(raw: &str) -> LauncherResult<Self> {
        let (core, build) = match raw.split_once('+') {
            Some((core, build)) => (core, Some(build)),
            None => (raw, None),
        };
        let (components_part, prerelease) = match core.split_once('-') {
            Some((components, pre)) => (components, Some(pre)),
            None => (core, None),
        };

        if components_part.is_empty() {
            return Err(LauncherError::version_parse(raw, "version core is empty"));
        }
        if let Some(pre) = prerelease {
            if !is_dot_separated_id(pre) {
                return Err(LauncherError::version_parse(raw, "invalid prerelease key"));
            }
        }
        if let Some(build) = build {
            if !is_dot_separated_id(build) {
                return Err(LauncherError::version_parse(raw, "invalid build key"));
            }
        }

        let mut components = Vec::new();
        let mut wildcard = false;
        for token in components_part.split('.') {
            if token.is_empty() {
                return Err(LauncherError::version_parse(raw, "empty version component"));
            }
            if matches!(token, "x" | "X" | "*") {
                wildcard = true;
                components.push(Component::Wildcard);
                continue;
            }
            if !token.bytes().all(|b| b.is_ascii_digit()) {
                return Err(LauncherError::version_parse(
                    raw,
                    format!("malformed component '{}'", token),
                ));
            }
            if wildcard {
                return Err(LauncherError::version_parse(
                    raw,
                    "wildcard components must be trailing",
                ));
            }
            let value = token.parse::<u64>().map_err(|_| {
                LauncherError::version_parse(raw, format!("component '{}' out of range", token))
            })?;
            components.push(Component::Number(value));
        }

        if wildcard && components.len() == 1 {
            return Err(LauncherError::version_parse(
                raw,
                "a lone wildcard is not a version",
            ));
        }
        if wildcard && prerelease.is_some() {
            return Err(LauncherError::version_parse(
                raw,
                "wildcard versions cannot carry a prerelease key",
            ));
        }

        Ok(Self {
            raw: raw.to_string(),
            components,
            prerelease: prerelease.map(str::to_string),
            build: build.map(str::to_string),
            wildcard,
        })
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Component at `index`. Past the end this is a wildcard when the version
    /// has one, otherwise a literal zero.
    pub fn component(&self, index: usize) -> Component {
        match self.components.get(index) {
            Some(c) => *c,
            None if self.wildcard => Component::Wildcard,
            None => Component::Number(0),
        }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn prerelease_key(&self) -> Option<&str> {
        self.prerelease.as_deref()
    }

    pub fn build_key(&self) -> Option<&str> {
        self.build.as_deref()
    }

    pub fn has_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Range-satisfaction comparison: a wildcard on either side matches
    /// whatever the other side holds at that position, and a wildcard
    /// version matches any prerelease.
    pub fn compare_compatible(&self, other: &Self) -> Ordering {
        let len = self.component_count().max(other.component_count());
        for i in 0..len {
            match (self.component(i), other.component(i)) {
                (Component::Number(a), Component::Number(b)) if a != b => return a.cmp(&b),
                _ => continue,
            }
        }

        match (self.prerelease_key(), other.prerelease_key()) {
            (Some(a), Some(b)) => compare_prerelease(a, b),
            (Some(_), None) if other.has_wildcard() => Ordering::Equal,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) if self.has_wildcard() => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

fn is_dot_separated_id(key: &str) -> bool {
    key.is_empty()
        || key.split('.').all(|id| {
            !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
}

fn is_numeric_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

fn compare_numeric_ids(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Prerelease precedence: numeric identifiers compare numerically and sort
/// before alphanumeric ones; a shorter matching prefix is smaller.
fn compare_prerelease(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) => {
                let ord = match (is_numeric_id(x), is_numeric_id(y)) {
                    (true, true) => compare_numeric_ids(x, y),
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    (false, false) => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (None, None) => return Ordering::Equal,
        }
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.component_count().max(other.component_count());
        for i in 0..len {
            match self.component(i).cmp(&other.component(i)) {
                Ordering::Equal => continue,
                non_eq => return non_eq,
            }
        }

        match (self.prerelease_key(), other.prerelease_key()) {
            (Some(a), Some(b)) => compare_prerelease(a, b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for SemanticVersion {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SemanticVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for SemanticVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
