//! Error taxonomy for backend calls.

use canteen_transport::{TransportError, GENERIC_FAILURE};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// HTTP 401. The session has already been torn down when this is returned.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-2xx reply, with the backend's `detail` or the generic message.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] TransportError),

    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The session a request was bound to ended before it was sent.
    #[error("Session changed before the request was sent")]
    SessionChanged,

    /// Client-side validation failed; nothing was sent.
    #[error("Invalid input: {0}")]
    Invalid(String),
}

impl ApiError {
    /// Text suitable for a transient notice.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Session expired, please log in again".to_string(),
            ApiError::SessionChanged => "Signed out".to_string(),
            ApiError::NotFound(_) => "Not found".to_string(),
            ApiError::Rejected { message, .. } => message.clone(),
            ApiError::Network(_) | ApiError::Decode(_) => GENERIC_FAILURE.to_string(),
            ApiError::Invalid(message) => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let rejected = ApiError::Rejected {
            status: 403,
            message: "Only vendors can update order status".into(),
        };
        assert_eq!(rejected.user_message(), "Only vendors can update order status");
        assert_eq!(
            ApiError::Network(TransportError::Timeout).user_message(),
            GENERIC_FAILURE
        );
        assert_eq!(ApiError::NotFound("token 12".into()).user_message(), "Not found");
    }
}
