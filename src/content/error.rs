use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Authentication,
    Storage,
    AccessDenied,
    SessionRelease,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

pub fn authentication(message: impl Into<String>) -> StoreError {
    StoreError::new(StoreErrorKind::Authentication, message)
}

pub fn storage(message: impl Into<String>) -> StoreError {
    StoreError::new(StoreErrorKind::Storage, message)
}

pub fn access_denied(message: impl Into<String>) -> StoreError {
    StoreError::new(StoreErrorKind::AccessDenied, message)
}

pub fn session_release(message: impl Into<String>) -> StoreError {
    StoreError::new(StoreErrorKind::SessionRelease, message)
}
