pub mod arch;
pub mod natives;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::sources::KernelReleaseSource;
use crate::core::version::Version;

pub use arch::{resolve_native_profile, ProfileKey};
pub use natives::{HmclNativesIndex, NativeOverrides};

/// Desktop systems with Minecraft native bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Windows,
    Osx,
    Linux,
}

impl Os {
    /// Name used by Mojang rules and native profile keys.
    pub fn natives_name(self) -> &'static str {
        match self {
            Os::Windows => "windows",
            Os::Osx => "osx",
            Os::Linux => "linux",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.natives_name())
    }
}

impl FromStr for Os {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "windows" | "win" | "win32" | "win64" => Ok(Os::Windows),
            "osx" | "macos" | "mac" | "darwin" => Ok(Os::Osx),
            "linux" => Ok(Os::Linux),
            other => Err(LauncherError::UnsupportedPlatform {
                os: other.to_string(),
                arch: std::env::consts::ARCH.to_string(),
                reason: "unknown operating system".into(),
            }),
        }
    }
}

/// Kernel release as reported by `sysinfo` (`uname -r` on Linux).
pub struct SystemKernel;

impl KernelReleaseSource for SystemKernel {
    fn kernel_release(&self) -> Option<String> {
        sysinfo::System::kernel_version()
    }
}

/// The machine a manifest is resolved for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: String,
    pub kernel_release: Version,
}

impl Platform {
    pub fn new(os: Os, arch: impl Into<String>, kernel_release: Version) -> Self {
        Self {
            os,
            arch: arch.into(),
            kernel_release,
        }
    }

    /// The running system. A missing kernel release stays opaque, which only
    /// matters for kernel-gated architectures.
    pub fn current(kernel: &dyn KernelReleaseSource) -> LauncherResult<Self> {
        let os: Os = std::env::consts::OS.parse()?;
        let release = kernel.kernel_release().unwrap_or_default();
        Ok(Self::new(os, std::env::consts::ARCH, Version::parse(release.trim())))
    }

    pub fn native_profile(&self) -> LauncherResult<ProfileKey> {
        resolve_native_profile(self.os, &self.arch, &self.kernel_release)
    }
}
