pub mod document;
pub mod merge;
pub mod model;
pub mod mojang;
pub mod rules;

pub use document::VersionDocument;
pub use merge::{merge, merge_all};
pub use model::{
    Argument, ArgumentValue, AssetIndexInfo, DownloadArtifact, LaunchManifest, LibraryDescriptor,
    LibraryDownloads, ProcessorTask,
};
pub use mojang::MojangBaseManifestSource;
pub use rules::{rules_allow, Rule, RuleAction, RuleEnvironment};
