// ─── launchkit Core ───
// Version resolution and launch manifest composition for Minecraft launchers.
//
// Architecture:
//   core/
//     version/    - Semantic + opaque versions, predicates, comparison
//     manifest/   - Launch manifest model, document parsing, merge engine
//     maven/      - Artifact coordinates + maven-metadata.xml listings
//     loaders/    - Fabric/Quilt and Forge/NeoForge resolution pipelines
//     platform/   - OS/arch detection, native profiles, native overrides
//     sources     - I/O collaborator traits
//     resolver    - Façade used by the launcher shell

pub mod error;
pub mod http;
pub mod loaders;
pub mod manifest;
pub mod maven;
pub mod platform;
pub mod resolver;
pub mod settings;
pub mod sources;
pub mod version;
