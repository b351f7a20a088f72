use thiserror::Error;

use crate::transport::TransportError;

#[derive(Error, Debug)]
pub enum DotcomError {
    /// returned before any request is sent if the access token to check is empty
    #[error("could not check the access token as it is empty")]
    EmptyAccessToken,

    /// returned if the operation could not be serialized into a request body
    #[error("could not encode the {operation} request\nCaused by: {source}")]
    Encode {
        operation: &'static str,
        source: serde_json::Error,
    },

    /// wraps a [`TransportError`]
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// returned if the response body does not match the shape of the operation
    #[error("could not decode the {operation} response\nCaused by: {source}")]
    Decode {
        operation: &'static str,
        source: serde_json::Error,
    },

    /// returned if the response decoded but breaks an invariant of the read models
    #[error("the {operation} response is invalid: {reason}")]
    InvalidResponse { operation: &'static str, reason: String },

    /// returned if the API answered with GraphQL errors, with or without partial data
    #[error("the {operation} request failed: {}", display_errors(.errors))]
    Graphql {
        operation: &'static str,
        errors: Vec<cynic::GraphQlError>,
    },

    /// returned if the caller cancelled the operation before the response arrived
    #[error("the {operation} request was cancelled")]
    Cancelled { operation: &'static str },

    /// returned if the client could not be built from its configuration
    #[error("invalid dotcom client configuration: {0}")]
    Configuration(String),
}

impl DotcomError {
    /// Whether the failure happened before or while talking to the remote API,
    /// as opposed to the remote API answering with something unusable.
    pub fn is_transport(&self) -> bool {
        matches!(self, DotcomError::Transport(_))
    }
}

fn display_errors(errors: &[cynic::GraphQlError]) -> String {
    errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A read model invariant broken by a decoded response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct InvalidShape(pub(crate) String);

impl InvalidShape {
    pub(crate) fn into_error(self, operation: &'static str) -> DotcomError {
        DotcomError::InvalidResponse {
            operation,
            reason: self.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_errors_are_joined() {
        let errors: Vec<cynic::GraphQlError> = serde_json::from_value(serde_json::json!([
            { "message": "access denied" },
            { "message": "token revoked" }
        ]))
        .unwrap();

        let error = DotcomError::Graphql {
            operation: "CheckAccessToken",
            errors,
        };

        assert_eq!(
            error.to_string(),
            "the CheckAccessToken request failed: access denied; token revoked"
        );
    }

    #[test]
    fn transport_errors_are_flagged() {
        let error = DotcomError::from(TransportError::Connection("refused".to_owned()));
        assert!(error.is_transport());
        assert!(!DotcomError::EmptyAccessToken.is_transport());
    }
}
