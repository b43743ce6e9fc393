use thiserror::Error;

pub mod app;
pub mod auth;
pub mod follow;
pub mod jwt;
pub mod matches;
pub mod ranking;
pub mod stats;
pub mod users;

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Malformed input: empty set list, self-match, unparseable scores.
    /// Raised before any storage mutation; resubmitting corrected input
    /// recovers.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced entity (participant, followed user) does not exist.
    /// Raised before any storage mutation.
    #[error("unknown reference: {0}")]
    Referential(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn validation<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Validation(msg.into()))
    }

    pub fn referential<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Referential(msg.into()))
    }

    pub fn not_found<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::NotFound(msg.into()))
    }

    pub fn unauthorized<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Unauthorized(msg.into()))
    }

    pub fn conflict<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Conflict(msg.into()))
    }

    pub fn internal<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Internal(msg.into()))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
