use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    UnresolvableUser,
    Transport,
    Rejected,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

pub fn unresolvable_user(message: impl Into<String>) -> ServiceError {
    ServiceError::new(ServiceErrorKind::UnresolvableUser, message)
}

pub fn transport(message: impl Into<String>) -> ServiceError {
    ServiceError::new(ServiceErrorKind::Transport, message)
}

pub fn rejected(message: impl Into<String>) -> ServiceError {
    ServiceError::new(ServiceErrorKind::Rejected, message)
}

pub fn internal_error(message: impl Into<String>) -> ServiceError {
    ServiceError::new(ServiceErrorKind::Internal, message)
}
