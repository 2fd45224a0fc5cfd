use std::path::PathBuf;

use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("window error: {0}")]
    WindowError(String),

    #[error("webview error: {0}")]
    WebViewError(String),

    #[error("event loop error: {0}")]
    EventLoopError(String),

    #[error("not supported: {0}")]
    NotSupported(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WeaveError {
    /// The instance was destroyed, terminated, or never existed.
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    #[error("function not bound: {0}")]
    NotBound(String),

    #[error("unknown request: {0}")]
    UnknownRequest(String),

    #[error("navigation to {url} failed: {reason}")]
    NavigationFailure { url: String, reason: String },

    #[error("malformed arguments: {0}")]
    MalformedArguments(String),

    /// A UI-thread operation was attempted from another thread.
    #[error("instance is owned by another thread")]
    WrongThread,

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WeaveError {
    /// Stable name of the error kind, used in script-facing error objects.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInstance(_) => "InvalidInstance",
            Self::NotBound(_) => "NotBound",
            Self::UnknownRequest(_) => "UnknownRequest",
            Self::NavigationFailure { .. } => "NavigationFailure",
            Self::MalformedArguments(_) => "MalformedArguments",
            Self::WrongThread => "WrongThread",
            Self::InvalidState(_) => "InvalidState",
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::Platform(_) => "Platform",
            Self::Config(_) => "Config",
            Self::Io(_) => "Io",
        }
    }

    /// JSON error object delivered to a script caller when a bound call fails.
    pub fn to_script_value(&self) -> serde_json::Value {
        json!({ "error": self.kind(), "message": self.to_string() })
    }
}
