// ─── Rule Evaluation ───
// Mojang-style allow/disallow rules on libraries and argument groups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OsRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    /// Kernel version pattern. Kept for round-tripping; not evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<OsRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<BTreeMap<String, bool>>,
}

/// What rules are evaluated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEnvironment {
    /// Mojang OS name: `windows`, `osx` or `linux`.
    pub os_name: String,
    /// Mojang arch name: `x86`, `x86_64`, `arm64`, ...
    pub arch: String,
    pub features: BTreeMap<String, bool>,
}

impl RuleEnvironment {
    pub fn new(os_name: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os_name: os_name.into(),
            arch: arch.into(),
            features: BTreeMap::new(),
        }
    }

    pub fn current() -> Self {
        let os_name = if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "macos") {
            "osx"
        } else {
            "linux"
        };
        let arch = match std::env::consts::ARCH {
            "aarch64" => "arm64",
            other => other,
        };
        Self::new(os_name, arch)
    }

    pub fn with_feature(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.features.insert(name.into(), enabled);
        self
    }

    /// Substitution for `${arch}` in native classifiers.
    pub fn pointer_width(&self) -> &'static str {
        match self.arch.as_str() {
            "x86" | "arm32" | "arm" => "32",
            _ => "64",
        }
    }
}

impl Rule {
    fn matches(&self, env: &RuleEnvironment) -> bool {
        if let Some(os) = &self.os {
            if os.name.as_deref().is_some_and(|name| name != env.os_name) {
                return false;
            }
            if os.arch.as_deref().is_some_and(|arch| arch != env.arch) {
                return false;
            }
        }

        match &self.features {
            Some(features) => features
                .iter()
                .all(|(name, wanted)| env.features.get(name).copied().unwrap_or(false) == *wanted),
            None => true,
        }
    }
}

/// Rules are read top to bottom starting from "disallowed"; the last rule
/// that matches decides. No rules at all means allowed.
pub fn rules_allow(rules: &[Rule], env: &RuleEnvironment) -> bool {
    if rules.is_empty() {
        return true;
    }

    let mut allowed = false;
    for rule in rules {
        if rule.matches(env) {
            allowed = rule.action == RuleAction::Allow;
        }
    }
    allowed
}
