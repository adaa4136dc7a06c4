use egg_mode::error::{Error as EggModeError, TwitterErrors};
use thiserror::Error;

/// Twitter error codes that indicate the request signature or tokens were rejected.
const AUTH_ERROR_CODES: [i32; 3] = [32, 89, 215];
/// Twitter error code for an exhausted rate limit window.
const RATE_LIMIT_ERROR_CODE: i32 = 88;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failure to read key file: {0}")]
    ConfigRead(#[from] std::io::Error),
    #[error("Invalid key file: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("Missing credential in key file: {0}")]
    MissingCredential(&'static str),
    #[error("Twitter API transport error: {0}")]
    Transport(#[source] EggModeError),
    #[error("Twitter API rejected the credentials: {0}")]
    Auth(#[source] EggModeError),
    #[error("Malformed Twitter API response: {0}")]
    MalformedResponse(String),
    #[error("Twitter API rate limit exceeded: {0}")]
    RateLimited(#[source] EggModeError),
    #[error("Twitter API error: {0}")]
    Api(#[source] EggModeError),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

impl Error {
    /// Whether the failure happened before the API answered, so repeating the call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

fn is_auth_rejection(errors: &TwitterErrors) -> bool {
    errors
        .errors
        .iter()
        .any(|code| AUTH_ERROR_CODES.contains(&code.code))
}

fn is_rate_limit(errors: &TwitterErrors) -> bool {
    errors
        .errors
        .iter()
        .any(|code| code.code == RATE_LIMIT_ERROR_CODE)
}

enum Kind {
    Transport,
    Auth,
    RateLimit,
    Malformed,
    Other,
}

fn classify(e: &EggModeError) -> Kind {
    match e {
        EggModeError::NetError(_) => Kind::Transport,
        EggModeError::BadStatus(status) if status.as_u16() == 401 => Kind::Auth,
        EggModeError::TwitterError(_, errors) if is_auth_rejection(errors) => Kind::Auth,
        EggModeError::RateLimit(_) => Kind::RateLimit,
        EggModeError::BadStatus(status) if status.as_u16() == 429 => Kind::RateLimit,
        EggModeError::TwitterError(_, errors) if is_rate_limit(errors) => Kind::RateLimit,
        EggModeError::InvalidResponse(_, _)
        | EggModeError::MissingValue(_)
        | EggModeError::DeserializeError(_) => Kind::Malformed,
        _ => Kind::Other,
    }
}

impl From<EggModeError> for Error {
    fn from(e: EggModeError) -> Self {
        match classify(&e) {
            Kind::Transport => Error::Transport(e),
            Kind::Auth => Error::Auth(e),
            Kind::RateLimit => Error::RateLimited(e),
            Kind::Malformed => Error::MalformedResponse(e.to_string()),
            Kind::Other => Error::Api(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_invalid_response_as_malformed() {
        let error = Error::from(EggModeError::InvalidResponse("no statuses", None));

        assert!(matches!(error, Error::MalformedResponse(_)));
        assert!(!error.is_transient());
    }

    #[test]
    fn classify_missing_value_as_malformed() {
        let error = Error::from(EggModeError::MissingValue("statuses"));

        assert!(matches!(error, Error::MalformedResponse(_)));
    }

    #[test]
    fn classify_rate_limit_separately() {
        let error = Error::from(EggModeError::RateLimit(0));

        assert!(matches!(error, Error::RateLimited(_)));
        assert!(!error.is_transient());
    }

    #[test]
    fn transport_errors_are_transient() {
        let error = Error::Transport(EggModeError::InvalidResponse("connection reset", None));

        assert!(error.is_transient());
    }
}
