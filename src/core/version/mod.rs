pub mod parsed;
pub mod predicate;
pub mod semantic;

use std::cmp::Ordering;

pub use parsed::{Version, VersionOrdering};
pub use predicate::{DependencyConstraint, Operator, PredicateTerm, VersionPredicate};
pub use semantic::{Component, SemanticVersion};

use crate::core::error::LauncherResult;

/// Compare two raw version strings with range-compatible semantics:
/// `1.2.*` equals `1.2.7`, build keys are ignored, prereleases sort first.
pub fn compare_versions(a: &str, b: &str) -> LauncherResult<Ordering> {
    let a = SemanticVersion::parse(a)?;
    let b = SemanticVersion::parse(b)?;
    Ok(a.compare_compatible(&b))
}
