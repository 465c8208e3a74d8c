use std::fmt;
use std::path::PathBuf;

/// Engine-level errors used across toygal crates.
///
/// Contract rule: this type lives in `toygal-core` and is re-exported by
/// runtime backends.
#[derive(Debug)]
pub enum EngineError {
    // ---- Config / content (SDK-level) ----
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    InvalidConfig {
        path: PathBuf,
        msg: String,
    },

    /// Two gallery entries claimed the same key.
    DuplicateKey(String),

    /// Lookup by key found nothing.
    UnknownEntry(String),

    /// An entry failed structural validation (missing mainImage, too many
    /// channels, conflicting buffer declarations, ...).
    Validation {
        key: String,
        issues: Vec<String>,
    },

    // ---- Runtime-facing (backend) ----
    VertexCompile(String),
    FragmentCompile(String),
    Link(String),
    GlCreate(String),
    TextureLoad {
        path: PathBuf,
        msg: String,
    },

    // ---- Fallback ----
    Other(String),
}

impl EngineError {
    pub fn other<T: Into<String>>(s: T) -> Self {
        EngineError::Other(s.into())
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Io { path, source } => {
                write!(f, "io error at {}: {}", path.display(), source)
            }
            EngineError::Json { path, source } => {
                write!(f, "json parse error at {}: {}", path.display(), source)
            }
            EngineError::InvalidConfig { path, msg } => {
                write!(f, "invalid config at {}: {}", path.display(), msg)
            }
            EngineError::DuplicateKey(key) => {
                write!(f, "duplicate gallery key '{key}'")
            }
            EngineError::UnknownEntry(key) => {
                write!(f, "no gallery entry with key '{key}'")
            }
            EngineError::Validation { key, issues } => {
                write!(f, "entry '{key}' failed validation: {}", issues.join("; "))
            }

            EngineError::VertexCompile(msg) => write!(f, "vertex shader compile error: {msg}"),
            EngineError::FragmentCompile(msg) => write!(f, "fragment shader compile error: {msg}"),
            EngineError::Link(msg) => write!(f, "program link error: {msg}"),
            EngineError::GlCreate(msg) => write!(f, "backend object creation failed: {msg}"),
            EngineError::TextureLoad { path, msg } => {
                write!(f, "texture load failed at {}: {}", path.display(), msg)
            }

            EngineError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io { source, .. } => Some(source),
            EngineError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}
