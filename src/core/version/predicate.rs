// ─── Version Predicates ───
// Fabric-style dependency notation: `*`, `1.20.1`, `>=0.14`, `<1.21`, `~1.20`,
// `^0.15`, `1.20.x`; space-separated terms must all hold.

use std::cmp::Ordering;
use std::fmt;

use super::parsed::{Version, VersionOrdering};
use super::semantic::SemanticVersion;
use crate::core::error::{LauncherError, LauncherResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    /// `~v`: same major and minor, at least `v`.
    SameMinor,
    /// `^v`: same major, at least `v`.
    SameMajor,
}

impl Operator {
    fn symbol(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::Greater => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::Less => "<",
            Operator::LessOrEqual => "<=",
            Operator::SameMinor => "~",
            Operator::SameMajor => "^",
        }
    }

    fn split(term: &str) -> (Self, &str) {
        // Two-character operators first so `>=` is not read as `>`.
        for (prefix, op) in [
            (">=", Operator::GreaterOrEqual),
            ("<=", Operator::LessOrEqual),
            (">", Operator::Greater),
            ("<", Operator::Less),
            ("=", Operator::Equal),
            ("~", Operator::SameMinor),
            ("^", Operator::SameMajor),
        ] {
            if let Some(rest) = term.strip_prefix(prefix) {
                return (op, rest);
            }
        }
        (Operator::Equal, term)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateTerm {
    pub operator: Operator,
    pub version: SemanticVersion,
}

impl PredicateTerm {
    pub fn test(&self, candidate: &SemanticVersion) -> bool {
        let ord = candidate.compare_compatible(&self.version);
        match self.operator {
            Operator::Equal => ord == Ordering::Equal,
            Operator::Greater => ord == Ordering::Greater,
            Operator::GreaterOrEqual => ord != Ordering::Less,
            Operator::Less => ord == Ordering::Less,
            Operator::LessOrEqual => ord != Ordering::Greater,
            Operator::SameMinor => {
                ord != Ordering::Less
                    && candidate.component(0) == self.version.component(0)
                    && candidate.component(1) == self.version.component(1)
            }
            Operator::SameMajor => {
                ord != Ordering::Less && candidate.component(0) == self.version.component(0)
            }
        }
    }
}

impl fmt::Display for PredicateTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator.symbol(), self.version)
    }
}

/// A test over versions. `Exact` exists for non-semantic targets such as
/// snapshot ids, which no ordered term can express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionPredicate {
    Any,
    Exact(Version),
    All(Vec<PredicateTerm>),
}

impl VersionPredicate {
    pub fn parse(raw: &str) -> LauncherResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Ok(VersionPredicate::Any);
        }

        let raw_terms: Vec<&str> = trimmed.split_whitespace().collect();
        let mut terms = Vec::with_capacity(raw_terms.len());
        for term in &raw_terms {
            let (operator, version) = Operator::split(term);
            match SemanticVersion::parse(version) {
                Ok(version) => terms.push(PredicateTerm { operator, version }),
                // A bare non-semantic token is an exact match on that string.
                Err(_) if raw_terms.len() == 1 && operator == Operator::Equal && !version.is_empty() => {
                    return Ok(VersionPredicate::Exact(Version::Opaque(version.to_string())));
                }
                Err(_) => return Err(LauncherError::PredicateParse(raw.to_string())),
            }
        }

        Ok(VersionPredicate::All(terms))
    }

    pub fn exactly(version: Version) -> Self {
        VersionPredicate::Exact(version)
    }

    pub fn at_least(min: SemanticVersion) -> Self {
        VersionPredicate::All(vec![PredicateTerm {
            operator: Operator::GreaterOrEqual,
            version: min,
        }])
    }

    /// `[min, max_exclusive)`.
    pub fn between(min: SemanticVersion, max_exclusive: SemanticVersion) -> Self {
        VersionPredicate::All(vec![
            PredicateTerm {
                operator: Operator::GreaterOrEqual,
                version: min,
            },
            PredicateTerm {
                operator: Operator::Less,
                version: max_exclusive,
            },
        ])
    }

    pub fn admits(&self, candidate: &Version) -> bool {
        match self {
            VersionPredicate::Any => true,
            VersionPredicate::Exact(target) => candidate.compare(target) == VersionOrdering::Equal,
            VersionPredicate::All(terms) => match candidate.as_semantic() {
                Some(semantic) => terms.iter().all(|term| term.test(semantic)),
                None => false,
            },
        }
    }
}

impl fmt::Display for VersionPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionPredicate::Any => f.write_str("*"),
            VersionPredicate::Exact(v) => write!(f, "={}", v),
            VersionPredicate::All(terms) => {
                let rendered: Vec<String> = terms.iter().map(ToString::to_string).collect();
                f.write_str(&rendered.join(" "))
            }
        }
    }
}

/// "artifact X must satisfy predicate P", e.g. a loader release that only
/// supports `minecraft` in `[1.20, 1.21)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyConstraint {
    pub artifact: String,
    pub predicate: VersionPredicate,
}

impl DependencyConstraint {
    pub fn new(artifact: impl Into<String>, predicate: VersionPredicate) -> Self {
        Self {
            artifact: artifact.into(),
            predicate,
        }
    }

    pub fn admits(&self, candidate: &Version) -> bool {
        self.predicate.admits(candidate)
    }
}

impl fmt::Display for DependencyConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.artifact, self.predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admits(predicate: &str, version: &str) -> bool {
        VersionPredicate::parse(predicate)
            .unwrap()
            .admits(&Version::parse(version))
    }

    #[test]
    fn star_and_empty_admit_everything() {
        assert!(admits("*", "1.20.1"));
        assert!(admits("", "23w13a"));
    }

    #[test]
    fn comparison_operators() {
        assert!(admits(">=0.14.0", "0.15.1"));
        assert!(admits(">=0.14.0", "0.14.0"));
        assert!(!admits(">0.14.0", "0.14.0"));
        assert!(admits("<1.21", "1.20.6"));
        assert!(!admits("<1.21", "1.21.0"));
        assert!(admits("<=1.21", "1.21.0"));
    }

    #[test]
    fn anded_terms_form_ranges() {
        assert!(admits(">=1.20 <1.21", "1.20.4"));
        assert!(!admits(">=1.20 <1.21", "1.21.1"));
        assert!(!admits(">=1.20 <1.21", "1.19.4"));
    }

    #[test]
    fn tilde_and_caret() {
        assert!(admits("~1.20.1", "1.20.6"));
        assert!(!admits("~1.20.1", "1.21.0"));
        assert!(!admits("~1.20.1", "1.20.0"));
        assert!(admits("^0.15.0", "0.99.0"));
        assert!(!admits("^0.15.0", "1.0.0"));
    }

    #[test]
    fn wildcards_match_ranges() {
        assert!(admits("1.20.x", "1.20.4"));
        assert!(admits("1.20.*", "1.20"));
        assert!(!admits("1.20.x", "1.21"));
    }

    #[test]
    fn bare_snapshot_is_an_exact_match() {
        let predicate = VersionPredicate::parse("23w13a").unwrap();
        assert!(matches!(predicate, VersionPredicate::Exact(_)));
        assert!(predicate.admits(&Version::parse("23w13a")));
        assert!(!predicate.admits(&Version::parse("1.20")));
    }

    #[test]
    fn ordered_terms_reject_opaque_candidates() {
        assert!(!admits(">=1.14", "23w13a"));
    }

    #[test]
    fn malformed_terms_fail() {
        assert!(VersionPredicate::parse(">=abc").is_err());
        assert!(VersionPredicate::parse(">=1.0 foo").is_err());
    }

    #[test]
    fn constructors_and_display() {
        let min = SemanticVersion::parse("1.20").unwrap();
        let max = SemanticVersion::parse("1.21").unwrap();
        let range = VersionPredicate::between(min.clone(), max);
        assert_eq!(range.to_string(), ">=1.20 <1.21");
        assert!(VersionPredicate::at_least(min).admits(&Version::parse("1.20.1")));

        let constraint = DependencyConstraint::new("minecraft", range);
        assert!(constraint.admits(&Version::parse("1.20.1")));
        assert_eq!(constraint.to_string(), "minecraft >=1.20 <1.21");
    }
}
