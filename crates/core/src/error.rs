use std::fmt;

/// The failure classes a user-facing component distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A local precondition failed; the backend was never contacted.
    Validation,
    /// Transport failure or a non-2xx status.
    Network,
    /// The response body did not match the expected shape.
    Decode,
    /// The component already has a request outstanding.
    Busy,
    /// The request's cancellation token fired before it completed.
    Cancelled,
    /// Startup configuration was rejected.
    Config,
}

/// Backend operation names used in error messages and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListPatients,
    Assess,
    Chat,
    ClearChat,
    ChatHistory,
    Health,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ListPatients => "Patient listing",
            Self::Assess => "Assessment",
            Self::Chat => "Chat",
            Self::ClearChat => "Clearing chat",
            Self::ChatHistory => "Chat history",
            Self::Health => "Health check",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Please select a patient")]
    NoPatientSelected,
    #[error("Message cannot be empty")]
    EmptyMessage,
    #[error("{0} already in progress")]
    Busy(Operation),
    #[error("Request cancelled")]
    Cancelled,

    #[error("{operation} failed: {message}")]
    Transport {
        operation: Operation,
        message: String,
    },
    #[error("{operation} failed: {status} {reason}")]
    Status {
        operation: Operation,
        status: u16,
        reason: String,
    },
    #[error("{operation} returned an unexpected body at {path}: {message}")]
    Decode {
        operation: Operation,
        path: String,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    SessionId(#[from] ng12_uuid::SessionIdError),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoPatientSelected | Self::EmptyMessage => ErrorKind::Validation,
            Self::Busy(_) => ErrorKind::Busy,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Transport { .. } | Self::Status { .. } => ErrorKind::Network,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::InvalidConfig(_) | Self::SessionId(_) => ErrorKind::Config,
        }
    }

    /// HTTP status of a non-2xx response, when that is what failed.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
