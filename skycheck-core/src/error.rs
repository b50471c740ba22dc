use thiserror::Error;

/// Classification of everything that can go wrong during one fetch attempt.
///
/// Every error is terminal for the attempt: no retries, no partial results.
/// The `Display` strings double as the fixed user-facing messages, so display
/// layers can print an error as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request URL could not be assembled.
    #[error("invalid URL")]
    InvalidRequest,

    /// The server answered with an empty body.
    #[error("no data returned")]
    NoResponseBody,

    /// The body was not valid JSON for the expected schema.
    #[error("failed to parse response")]
    DecodingFailed,

    /// Anything else: transport failure, timeout, non-2xx status. Carries the
    /// underlying detail for diagnostics.
    #[error("unknown error: {0}")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_strings_match_user_facing_messages() {
        assert_eq!(FetchError::InvalidRequest.to_string(), "invalid URL");
        assert_eq!(FetchError::NoResponseBody.to_string(), "no data returned");
        assert_eq!(FetchError::DecodingFailed.to_string(), "failed to parse response");
        assert_eq!(
            FetchError::Unknown("connection refused".to_string()).to_string(),
            "unknown error: connection refused"
        );
    }
}
