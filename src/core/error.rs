use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the resolution core.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── Versions ────────────────────────────────────────
    #[error("Invalid version '{raw}': {reason}")]
    VersionParse { raw: String, reason: String },

    #[error("Invalid version predicate '{0}'")]
    PredicateParse(String),

    // ── Selection ───────────────────────────────────────
    #[error("No {loader} version matching '{requested}' is compatible with Minecraft {game_version}")]
    LoaderVersionNotFound {
        loader: String,
        game_version: String,
        requested: String,
    },

    #[error("Minecraft version {0} not found in manifest")]
    GameVersionNotFound(String),

    #[error("Unknown loader: {0}")]
    UnknownLoader(String),

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch failed for {url}: HTTP {status}")]
    FetchStatus { url: String, status: u16 },

    #[error("Fetch failed: {0}")]
    Fetch(String),

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {url}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        url: String,
        expected: String,
        actual: String,
    },

    // ── Formats ─────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid Maven coordinate: {0}")]
    InvalidMavenCoordinate(String),

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Platform ────────────────────────────────────────
    #[error("Unsupported platform {os}/{arch}: {reason}")]
    UnsupportedPlatform {
        os: String,
        arch: String,
        reason: String,
    },
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

/// Coarse classification callers use to decide how to react to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed version or predicate. Never retried.
    Parse,
    /// Requested loader or game version is absent or incompatible.
    NotFound,
    /// Network, transport or document failure in a collaborator.
    Fetch,
    /// No native profile exists for the platform.
    UnsupportedPlatform,
}

impl LauncherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LauncherError::VersionParse { .. } | LauncherError::PredicateParse(_) => {
                ErrorKind::Parse
            }
            LauncherError::LoaderVersionNotFound { .. }
            | LauncherError::GameVersionNotFound(_)
            | LauncherError::UnknownLoader(_) => ErrorKind::NotFound,
            LauncherError::UnsupportedPlatform { .. } => ErrorKind::UnsupportedPlatform,
            LauncherError::Http(_)
            | LauncherError::FetchStatus { .. }
            | LauncherError::Fetch(_)
            | LauncherError::Sha1Mismatch { .. }
            | LauncherError::Json(_)
            | LauncherError::Xml(_)
            | LauncherError::Zip(_)
            | LauncherError::InvalidMavenCoordinate(_)
            | LauncherError::Io { .. } => ErrorKind::Fetch,
        }
    }

    /// Only collaborator failures are worth retrying, and only by the caller.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Fetch
    }

    pub(crate) fn version_parse(raw: &str, reason: impl Into<String>) -> Self {
        LauncherError::VersionParse {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl serde::Serialize for LauncherError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
