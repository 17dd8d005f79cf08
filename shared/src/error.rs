use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Timeout,
    Validation,
    NotFound,
    Deserialization,
    Location,
    LocationPermissionDenied,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Validation => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::Location => "LOCATION_ERROR",
            Self::LocationPermissionDenied => "LOCATION_PERMISSION_DENIED",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }
}

/// Error surfaced to the user as a transient notice. Nothing in this core is
/// fatal: every failure leaves the current screen in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub internal_message: Option<String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            internal_message: None,
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Network => {
                "Unable to load webcams. Please check your internet connection and try again."
                    .into()
            }
            ErrorKind::Timeout => "The request timed out. Please try again.".into(),
            ErrorKind::Validation => self.message.clone(),
            ErrorKind::NotFound => "The webcam service could not be found.".into(),
            ErrorKind::Deserialization => {
                "The webcam service returned an unexpected response.".into()
            }
            ErrorKind::Location => {
                "Unable to determine your location. Please enter coordinates manually.".into()
            }
            ErrorKind::LocationPermissionDenied => {
                "Location access is required. Grant the permission and try again.".into()
            }
            ErrorKind::Unknown => "An unexpected error occurred. Please try again.".into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("Latitude {0} is out of valid range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is out of valid range [-180, 180]")]
    LongitudeOutOfRange(f64),
}

impl From<CoordinateError> for AppError {
    fn from(e: CoordinateError) -> Self {
        AppError::new(ErrorKind::Validation, e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("invalid catalog query: {0}")]
    InvalidQuery(String),
    #[error("transport failure: {0}")]
    Transport(crux_http::Error),
    #[error("catalog responded with HTTP {status}")]
    Status { status: u16 },
    #[error("catalog response could not be decoded: {0}")]
    Decode(String),
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        let kind = match &e {
            CatalogError::InvalidQuery(_) => ErrorKind::Validation,
            CatalogError::Transport(crux_http::Error::Timeout) => ErrorKind::Timeout,
            CatalogError::Transport(_) => ErrorKind::Network,
            CatalogError::Status { status: 404 } => ErrorKind::NotFound,
            CatalogError::Status { status: 408 } => ErrorKind::Timeout,
            CatalogError::Status { .. } => ErrorKind::Network,
            CatalogError::Decode(_) => ErrorKind::Deserialization,
        };
        AppError::new(kind, "Webcam catalog unavailable").with_internal(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl From<LinkError> for AppError {
    fn from(e: LinkError) -> Self {
        AppError::new(ErrorKind::Validation, "This link cannot be opened.")
            .with_internal(e.to_string())
    }
}
