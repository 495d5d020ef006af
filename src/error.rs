use std::path::PathBuf;

/// Where in the pipeline an error originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reading stdin failed or timed out.
    Input,
    /// Malformed top-level JSON, a payload that does not fit its event type,
    /// or an unreadable transcript file.
    Decode,
    /// Missing/invalid `hook_event_name`, or an unknown value for it.
    Dispatch,
    /// A callback returned an error or panicked.
    Handler,
    /// The handler's response could not be serialized.
    Encode,
    /// Setup of the bundled hooks (policy files, globs, regexes).
    Config,
}

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("timeout reading stdin")]
    InputTimeout,

    #[error("failed to read stdin: {0}")]
    Input(#[source] std::io::Error),

    #[error("failed to decode stdin: {0}")]
    DecodeStdin(#[source] serde_json::Error),

    #[error("failed to parse {kind}Event: {source}")]
    DecodeEvent {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {what}: {source}")]
    DecodePayload {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to open transcript {path}: {source}")]
    TranscriptOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read transcript: {0}")]
    TranscriptRead(#[source] std::io::Error),

    #[error("{reason}")]
    InvalidPayload { reason: String },

    #[error("missing or invalid hook_event_name field")]
    MissingEventName,

    #[error("unknown event type: {name}")]
    UnknownEvent { name: String },

    #[error("{message}")]
    Handler { message: String, panicked: bool },

    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("config parse error in {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("invalid policy: {reason}")]
    InvalidPolicy { reason: String },

    #[error("glob pattern error: {pattern}: {reason}")]
    GlobPattern { pattern: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl HookError {
    /// Wrap an error returned by a user callback.
    pub fn handler(err: anyhow::Error) -> Self {
        Self::Handler {
            message: format!("{err:#}"),
            panicked: false,
        }
    }

    /// Build the error for a recovered panic. `value` is the stringified payload.
    pub fn panic(value: impl std::fmt::Display) -> Self {
        Self::Handler {
            message: format!("panic: {value}"),
            panicked: true,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InputTimeout | Self::Input(_) => ErrorKind::Input,
            Self::DecodeStdin(_)
            | Self::DecodeEvent { .. }
            | Self::DecodePayload { .. }
            | Self::TranscriptOpen { .. }
            | Self::TranscriptRead(_)
            | Self::InvalidPayload { .. } => ErrorKind::Decode,
            Self::MissingEventName | Self::UnknownEvent { .. } => ErrorKind::Dispatch,
            Self::Handler { .. } => ErrorKind::Handler,
            Self::Encode(_) => ErrorKind::Encode,
            Self::ConfigParse { .. }
            | Self::InvalidPolicy { .. }
            | Self::GlobPattern { .. }
            | Self::Io(_) => ErrorKind::Config,
        }
    }

    /// True when this error came from a handler panic rather than a returned error.
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Handler { panicked: true, .. })
    }
}

pub type Result<T> = std::result::Result<T, HookError>;
