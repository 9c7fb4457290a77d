//! Error types for the Broadcastt client.

use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias using BroadcasttError.
pub type Result<T> = std::result::Result<T, BroadcasttError>;

/// Errors that can occur when using the Broadcastt client.
///
/// Every variant except [`BroadcasttError::Transport`] is raised before any
/// network I/O takes place.
#[derive(Error, Debug)]
pub enum BroadcasttError {
    /// Channel name contains characters outside `[-a-zA-Z0-9_=@,.;]`.
    #[error("invalid channel name {0:?}")]
    InvalidChannelName(String),

    /// More channels than a single trigger call accepts.
    #[error("an event can be triggered on a maximum of {max} channels in a single call, got {count}")]
    TooManyChannels { count: usize, max: usize },

    /// Socket ID is not of the form `<digits>.<digits>`.
    #[error("invalid socket ID {0:?}")]
    InvalidSocketId(String),

    /// Host carries a scheme prefix.
    #[error("invalid host {0:?}: host must not start with http:// or https://")]
    InvalidHost(String),

    /// A batch entry has no `data`.
    #[error("data is missing from event")]
    MissingEventData,

    /// A value could not be encoded as JSON.
    ///
    /// `data` holds a debug rendering of the value that failed.
    #[error("failed to JSON encode {data}: {source}")]
    JsonEncode {
        data: String,
        #[source]
        source: serde_json::Error,
    },

    /// Malformed construction input (e.g. a client URI).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Network or HTTP-layer failure reported by the transport.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// JSON decoding error on a response body.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BroadcasttError {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a JSON encode error for `data`.
    pub fn json_encode(data: &impl std::fmt::Debug, source: serde_json::Error) -> Self {
        Self::JsonEncode {
            data: format!("{:?}", data),
            source,
        }
    }

    /// HTTP status carried by a transport error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(TransportError::Status { status, .. }) => Some(*status),
            Self::Transport(TransportError::Http(e)) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
