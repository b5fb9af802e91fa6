// ─── Architecture Resolver ───
// Maps OS + CPU architecture (+ kernel release for LoongArch) to the key of
// a native-library profile. Adding an architecture means adding a row to
// ARCH_RULES.

use std::fmt;

use serde::{Serialize, Serializer};

use super::Os;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::version::{Version, VersionOrdering};

/// Key of a native-library profile, e.g. `linux-x86_64` or `linux-arm64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileKey {
    key: String,
    mainstream: bool,
}

impl ProfileKey {
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Mainstream profiles are served by the official manifests as-is.
    pub fn is_mainstream(&self) -> bool {
        self.mainstream
    }
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl Serialize for ProfileKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key)
    }
}

enum ProfileRule {
    /// Official natives; key `{os}-{arch}`.
    Mainstream(&'static str),
    /// Community-maintained natives.
    Community(&'static str),
    /// Two ABI generations split on the kernel release.
    KernelGated {
        threshold: &'static str,
        at_or_below: &'static str,
        above: &'static str,
    },
}

struct ArchRule {
    aliases: &'static [&'static str],
    systems: &'static [Os],
    rule: ProfileRule,
}

const DESKTOP: &[Os] = &[Os::Windows, Os::Osx, Os::Linux];
const LINUX: &[Os] = &[Os::Linux];

const ARCH_RULES: &[ArchRule] = &[
    ArchRule {
        aliases: &["x86_64", "amd64", "x64", "x86-64"],
        systems: DESKTOP,
        rule: ProfileRule::Mainstream("x86_64"),
    },
    ArchRule {
        aliases: &["x86", "i386", "i486", "i586", "i686", "ia32"],
        systems: DESKTOP,
        rule: ProfileRule::Mainstream("x86"),
    },
    ArchRule {
        aliases: &["aarch64", "arm64", "armv8"],
        systems: DESKTOP,
        rule: ProfileRule::Community("arm64"),
    },
    ArchRule {
        aliases: &["arm", "arm32", "armv7", "armv7l", "armhf"],
        systems: LINUX,
        rule: ProfileRule::Community("arm32"),
    },
    ArchRule {
        aliases: &["mips64el", "mips64"],
        systems: LINUX,
        rule: ProfileRule::Community("mips64el"),
    },
    ArchRule {
        aliases: &["loongarch64", "loong64"],
        systems: LINUX,
        rule: ProfileRule::KernelGated {
            threshold: "5.19",
            at_or_below: "loongarch64_ow",
            above: "loongarch64",
        },
    },
    ArchRule {
        aliases: &["riscv64", "riscv64gc"],
        systems: LINUX,
        rule: ProfileRule::Community("riscv64"),
    },
];

fn unsupported(os: Os, arch: &str, reason: impl Into<String>) -> LauncherError {
    LauncherError::UnsupportedPlatform {
        os: os.to_string(),
        arch: arch.to_string(),
        reason: reason.into(),
    }
}

/// Profile key for `os`/`cpu_arch`. `kernel_release` only matters for
/// kernel-gated architectures, where a release at or below the threshold
/// selects the legacy ABI.
pub fn resolve_native_profile(
    os: Os,
    cpu_arch: &str,
    kernel_release: &Version,
) -> LauncherResult<ProfileKey> {
    let arch = cpu_arch.trim().to_ascii_lowercase();
    let rule = ARCH_RULES
        .iter()
        .find(|rule| rule.aliases.contains(&arch.as_str()))
        .ok_or_else(|| unsupported(os, cpu_arch, "unknown architecture"))?;

    if !rule.systems.contains(&os) {
        return Err(unsupported(os, cpu_arch, "no native profile for this system"));
    }

    let (name, mainstream) = match &rule.rule {
        ProfileRule::Mainstream(name) => (*name, true),
        ProfileRule::Community(name) => (*name, false),
        ProfileRule::KernelGated {
            threshold,
            at_or_below,
            above,
        } => {
            let threshold = Version::parse(threshold);
            match kernel_release.compare(&threshold) {
                VersionOrdering::Less | VersionOrdering::Equal => (*at_or_below, false),
                VersionOrdering::Greater => (*above, false),
                VersionOrdering::Incomparable => {
                    return Err(unsupported(
                        os,
                        cpu_arch,
                        format!("cannot compare kernel release '{}'", kernel_release),
                    ))
                }
            }
        }
    };

    Ok(ProfileKey {
        key: format!("{}-{}", os.natives_name(), name),
        mainstream,
    })
}
