//! Error types shared by the HTTP wrapper, the API modules and the stores.

use std::fmt;
use std::str::FromStr;

/// Error codes reported by the locker backend in the `error_code` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    InternalError,
    InvalidCredentials,
    TokenExpired,
    TokenInvalid,
    InvalidToken,
    ParcelNotFound,
    ParcelNotReady,
    ParcelExpired,
    ParcelAlreadyPicked,
    NoAvailableCompartment,
    LockerInactive,
    OtpExpired,
    OtpInvalid,
    OtpAlreadyUsed,
    OtpNotFound,
    TooManyRequests,
    Conflict,
    InvalidStatusTransition,
    /// Code this client does not know about, kept verbatim
    Other(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::TokenExpired => "TOKEN_EXPIRED",
            ErrorCode::TokenInvalid => "TOKEN_INVALID",
            ErrorCode::InvalidToken => "INVALID_TOKEN",
            ErrorCode::ParcelNotFound => "PARCEL_NOT_FOUND",
            ErrorCode::ParcelNotReady => "PARCEL_NOT_READY",
            ErrorCode::ParcelExpired => "PARCEL_EXPIRED",
            ErrorCode::ParcelAlreadyPicked => "PARCEL_ALREADY_PICKED",
            ErrorCode::NoAvailableCompartment => "NO_AVAILABLE_COMPARTMENT",
            ErrorCode::LockerInactive => "LOCKER_INACTIVE",
            ErrorCode::OtpExpired => "OTP_EXPIRED",
            ErrorCode::OtpInvalid => "OTP_INVALID",
            ErrorCode::OtpAlreadyUsed => "OTP_ALREADY_USED",
            ErrorCode::OtpNotFound => "OTP_NOT_FOUND",
            ErrorCode::TooManyRequests => "TOO_MANY_REQUESTS",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
            ErrorCode::Other(code) => code,
        }
    }

    /// Message shown to the person at the terminal for this code
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "Something went wrong. Please try again.",
            ErrorCode::Unauthorized => "You need to sign in to continue.",
            ErrorCode::Forbidden => "You do not have permission for this action.",
            ErrorCode::NotFound => "We could not find what you are looking for.",
            ErrorCode::InternalError => "Server error. Please try again later.",
            ErrorCode::InvalidCredentials => "Invalid phone or password.",
            ErrorCode::TokenExpired => "Your session expired. Please sign in again.",
            ErrorCode::TokenInvalid | ErrorCode::InvalidToken => {
                "Session is not valid. Please sign in again."
            }
            ErrorCode::ParcelNotFound => "Parcel was not found.",
            ErrorCode::ParcelNotReady => "Parcel is not ready for pickup yet.",
            ErrorCode::ParcelExpired => "Parcel pickup window expired.",
            ErrorCode::ParcelAlreadyPicked => "Parcel has already been picked up.",
            ErrorCode::NoAvailableCompartment => "No compartments are available right now.",
            ErrorCode::OtpExpired => "The code has expired. Request a new one.",
            ErrorCode::OtpInvalid => "The code you entered is incorrect.",
            ErrorCode::OtpAlreadyUsed => "The code has already been used.",
            _ => DEFAULT_ERROR_MESSAGE,
        }
    }
}

pub const DEFAULT_ERROR_MESSAGE: &str = "Unexpected error. Please try again.";

impl FromStr for ErrorCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "INVALID_REQUEST" | "INVALID_INPUT" => ErrorCode::InvalidRequest,
            "UNAUTHORIZED" => ErrorCode::Unauthorized,
            "FORBIDDEN" => ErrorCode::Forbidden,
            "NOT_FOUND" => ErrorCode::NotFound,
            "INTERNAL_ERROR" => ErrorCode::InternalError,
            "INVALID_CREDENTIALS" => ErrorCode::InvalidCredentials,
            "TOKEN_EXPIRED" => ErrorCode::TokenExpired,
            "TOKEN_INVALID" => ErrorCode::TokenInvalid,
            "INVALID_TOKEN" => ErrorCode::InvalidToken,
            "PARCEL_NOT_FOUND" => ErrorCode::ParcelNotFound,
            "PARCEL_NOT_READY" => ErrorCode::ParcelNotReady,
            "PARCEL_EXPIRED" => ErrorCode::ParcelExpired,
            "PARCEL_ALREADY_PICKED" => ErrorCode::ParcelAlreadyPicked,
            "NO_AVAILABLE_COMPARTMENT" => ErrorCode::NoAvailableCompartment,
            "LOCKER_INACTIVE" => ErrorCode::LockerInactive,
            "OTP_EXPIRED" => ErrorCode::OtpExpired,
            "OTP_INVALID" | "INVALID_OTP" => ErrorCode::OtpInvalid,
            "OTP_ALREADY_USED" => ErrorCode::OtpAlreadyUsed,
            "OTP_NOT_FOUND" => ErrorCode::OtpNotFound,
            "TOO_MANY_REQUESTS" => ErrorCode::TooManyRequests,
            "CONFLICT" => ErrorCode::Conflict,
            "INVALID_STATUS_TRANSITION" => ErrorCode::InvalidStatusTransition,
            other => ErrorCode::Other(other.to_string()),
        })
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single call through [`crate::http::HttpClient`]
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with an error status or `success: false`
    #[error("{message}")]
    Api {
        /// HTTP status, `None` when the failure came from a 2xx envelope
        status: Option<u16>,
        code: Option<ErrorCode>,
        message: String,
    },
    /// `success: true` without a `data` field
    #[error("INVALID_API_RESPONSE")]
    InvalidResponse,
    /// Body did not follow the `{success, data, error, error_code}` envelope
    #[error("INVALID_API_CONTRACT")]
    InvalidContract,
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => *status,
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            ApiError::Api { code, .. } => code.as_ref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Message for display, derived from the error code when one is present
    pub fn user_message(&self) -> &'static str {
        self.code()
            .map(ErrorCode::user_message)
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Rejected form input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },
    #[error("{field} must be exactly {len} digits")]
    WrongLength { field: &'static str, len: usize },
    #[error("{field} must contain only digits")]
    NotDigits { field: &'static str },
    #[error("invalid {field}: {value}")]
    Invalid { field: &'static str, value: String },
    #[error("compartment number {0} appears more than once")]
    DuplicateCompartment(u32),
    #[error("at most {max} compartments per batch")]
    TooManyCompartments { max: usize },
}

/// Failure of a store action
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// An action was called before the wizard collected what it needs
    #[error("{0}")]
    InvalidState(&'static str),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] crate::session::SessionFileError),
}

impl FlowError {
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            FlowError::Api(e) => Some(e),
            _ => None,
        }
    }
}

pub type FlowResult<T> = Result<T, FlowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_parsing() {
        assert_eq!("OTP_EXPIRED".parse::<ErrorCode>().unwrap(), ErrorCode::OtpExpired);
        assert_eq!("INVALID_OTP".parse::<ErrorCode>().unwrap(), ErrorCode::OtpInvalid);
        assert_eq!(
            "SOMETHING_NEW".parse::<ErrorCode>().unwrap(),
            ErrorCode::Other("SOMETHING_NEW".to_string())
        );
        assert_eq!(ErrorCode::Other("X_Y".to_string()).as_str(), "X_Y");
    }

    #[test]
    fn test_user_message_falls_back_to_default() {
        assert_eq!(
            ErrorCode::Other("WHATEVER".to_string()).user_message(),
            DEFAULT_ERROR_MESSAGE
        );
        assert_eq!(ApiError::InvalidContract.user_message(), DEFAULT_ERROR_MESSAGE);

        let err = ApiError::Api {
            status: Some(410),
            code: Some(ErrorCode::OtpExpired),
            message: "otp expired".to_string(),
        };
        assert_eq!(err.user_message(), "The code has expired. Request a new one.");
        assert_eq!(err.to_string(), "otp expired");
        assert_eq!(err.status(), Some(410));
    }

    #[test]
    fn test_not_found_detection() {
        let err = ApiError::Api {
            status: Some(404),
            code: Some(ErrorCode::ParcelNotFound),
            message: "parcel not found".to_string(),
        };
        assert!(err.is_not_found());

        let err = ApiError::Api {
            status: None,
            code: Some(ErrorCode::ParcelNotFound),
            message: "parcel not found".to_string(),
        };
        assert!(!err.is_not_found());
    }
}
