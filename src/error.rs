// Copyright 2025 The oscloud contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error and result types.

use std::error;
use std::fmt;

use reqwest::StatusCode;

/// Kind of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Authentication failure.
    ///
    /// Maps to HTTP 401.
    AuthenticationFailed,

    /// Access denied.
    ///
    /// Maps to HTTP 403.
    AccessDenied,

    /// Requested resource was not found.
    ///
    /// Maps to HTTP 404 and 410.
    ResourceNotFound,

    /// Request returned more items than expected.
    TooManyItems,

    /// Requested service endpoint was not found.
    EndpointNotFound,

    /// Invalid value passed to one of paremeters.
    ///
    /// May be result of HTTP 400.
    InvalidInput,

    /// Unsupported or incompatible API version.
    ///
    /// May be a result of HTTP 406.
    IncompatibleApiVersion,

    /// Conflict in the request.
    Conflict,

    /// The service is not available.
    ///
    /// Maps to HTTP 503.
    ServiceUnavailable,

    /// Response received from the server is malformed.
    InvalidResponse,

    /// Malformed clouds file or environment variables.
    InvalidConfig,

    /// Generic HTTP error.
    ProtocolError,

    /// The resource is in the expected failure state.
    OperationFailed,

    /// Operation has reached the specified time out.
    OperationTimedOut,

    /// Operation was not supported.
    OperationNotSupported,

    /// Internal server error.
    ///
    /// Maps to HTTP 5xx codes.
    InternalServerError,
}

impl ErrorKind {
    /// Short description of the error kind.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::AuthenticationFailed => "Failed to authenticate",
            ErrorKind::AccessDenied => "Access to the resource is denied",
            ErrorKind::ResourceNotFound => "Requested resource was not found",
            ErrorKind::TooManyItems => "Request returned too many items",
            ErrorKind::EndpointNotFound => "Requested endpoint was not found",
            ErrorKind::InvalidInput => "Input value(s) are invalid or missing",
            ErrorKind::IncompatibleApiVersion => "Incompatible or unsupported API version",
            ErrorKind::Conflict => "Requested cannot be fulfilled due to a conflict",
            ErrorKind::ServiceUnavailable => "Service is not available",
            ErrorKind::InvalidResponse => "Received invalid response",
            ErrorKind::InvalidConfig => "Configuration is invalid",
            ErrorKind::ProtocolError => "Error when accessing the server",
            ErrorKind::OperationFailed => "Requested operation has failed",
            ErrorKind::OperationTimedOut => "Time out reached while waiting for the operation",
            ErrorKind::OperationNotSupported => "Operation is not supported",
            ErrorKind::InternalServerError => "Internal server error or bad gateway",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl From<StatusCode> for ErrorKind {
    fn from(value: StatusCode) -> ErrorKind {
        match value {
            StatusCode::UNAUTHORIZED => ErrorKind::AuthenticationFailed,
            StatusCode::FORBIDDEN => ErrorKind::AccessDenied,
            StatusCode::NOT_FOUND | StatusCode::GONE => ErrorKind::ResourceNotFound,
            StatusCode::BAD_REQUEST => ErrorKind::InvalidInput,
            StatusCode::NOT_ACCEPTABLE => ErrorKind::IncompatibleApiVersion,
            StatusCode::CONFLICT => ErrorKind::Conflict,
            StatusCode::SERVICE_UNAVAILABLE => ErrorKind::ServiceUnavailable,
            c if c.is_server_error() => ErrorKind::InternalServerError,
            _ => ErrorKind::ProtocolError,
        }
    }
}

/// Error from an OpenStack call.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: Option<StatusCode>,
}

impl Error {
    /// Create a new error of the provided kind.
    #[inline]
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Error {
        Error {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status code, if any.
    #[inline]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    #[inline]
    pub(crate) fn with_status(mut self, status: StatusCode) -> Error {
        self.status = Some(status);
        self
    }

    #[inline]
    pub(crate) fn new_endpoint_not_found<D: fmt::Display>(service_type: D) -> Error {
        Error::new(
            ErrorKind::EndpointNotFound,
            format!("Endpoint for service {} was not found", service_type),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Error {
        let kind = if value.is_timeout() {
            ErrorKind::OperationTimedOut
        } else if value.is_decode() {
            ErrorKind::InvalidResponse
        } else {
            match value.status() {
                Some(code) => code.into(),
                None => ErrorKind::ProtocolError,
            }
        };
        let mut result = Error::new(kind, value.to_string());
        result.status = value.status();
        result
    }
}

impl From<http::Error> for Error {
    fn from(value: http::Error) -> Error {
        Error::new(ErrorKind::ProtocolError, value.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(value: url::ParseError) -> Error {
        Error::new(
            ErrorKind::InvalidInput,
            format!("Error parsing URL: {}", value),
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Error {
        Error::new(
            ErrorKind::InvalidResponse,
            format!("Error parsing JSON: {}", value),
        )
    }
}

#[cfg(test)]
mod test {
    use reqwest::StatusCode;

    use super::{Error, ErrorKind};

    #[test]
    fn test_from_status() {
        assert_eq!(
            ErrorKind::from(StatusCode::UNAUTHORIZED),
            ErrorKind::AuthenticationFailed
        );
        assert_eq!(
            ErrorKind::from(StatusCode::NOT_FOUND),
            ErrorKind::ResourceNotFound
        );
        assert_eq!(
            ErrorKind::from(StatusCode::BAD_GATEWAY),
            ErrorKind::InternalServerError
        );
        assert_eq!(
            ErrorKind::from(StatusCode::IM_A_TEAPOT),
            ErrorKind::ProtocolError
        );
    }

    #[test]
    fn test_display() {
        let err = Error::new(ErrorKind::InvalidInput, "boom");
        assert_eq!(err.to_string(), "Input value(s) are invalid or missing: boom");
    }

    #[test]
    fn test_with_status() {
        let err = Error::new(ErrorKind::Conflict, "conflict").with_status(StatusCode::CONFLICT);
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_endpoint_not_found() {
        let err = Error::new_endpoint_not_found("baremetal");
        assert_eq!(err.kind(), ErrorKind::EndpointNotFound);
        assert!(err.to_string().contains("baremetal"));
    }
}
