use crate::core::sources::{BaseManifestSource, LoaderMetadataSource};

use super::release::RequestedVersion;

/// Everything an installer needs to resolve one loader.
pub struct InstallContext<'a> {
    pub minecraft_version: &'a str,
    pub requested: &'a RequestedVersion,
    pub base: &'a dyn BaseManifestSource,
    pub metadata: &'a dyn LoaderMetadataSource,
}
