use std::fmt;

/// Failure to load one inline image. Never fatal to the surrounding layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageError {
    /// The provider answered with an error message.
    Provider { identifier: String, message: String },
    /// The provider dropped its responder without answering.
    Abandoned { identifier: String },
}

impl ImageError {
    pub fn identifier(&self) -> &str {
        match self {
            ImageError::Provider { identifier, .. } | ImageError::Abandoned { identifier } => {
                identifier
            }
        }
    }
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Provider {
                identifier,
                message,
            } => write!(f, "failed to load inline image {identifier:?}: {message}"),
            ImageError::Abandoned { identifier } => {
                write!(f, "request for inline image {identifier:?} was dropped unanswered")
            }
        }
    }
}

impl std::error::Error for ImageError {}
