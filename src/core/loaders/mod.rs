pub mod context;
pub mod fabric;
pub mod forge;
pub mod installer;
pub mod kind;
pub mod meta;
pub mod processors;
pub mod release;

pub use context::InstallContext;
pub use installer::{Installer, LoaderInstaller, LoaderOverlay, ManifestStage};
pub use kind::{LoaderFamily, LoaderKind, LoaderRequest};
pub use meta::HttpLoaderMetadata;
pub use processors::{InstallProfile, ProcessorStage};
pub use release::{select_release, LoaderRelease, RequestedVersion};
