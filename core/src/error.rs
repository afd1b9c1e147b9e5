//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response (connection refused, DNS, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The remote service answered with a non-2xx status
    #[error("Remote rejected request ({status}): {message}")]
    RemoteRejection { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Create a RemoteRejection error
    pub fn rejection(status: u16, message: impl Into<String>) -> Self {
        Self::RemoteRejection {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of a remote rejection, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRejection { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the service refused the bearer credential.
    ///
    /// Callers use this to send the user back to the login flow.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TaskNotFound(_)) || self.status() == Some(404)
    }
}
