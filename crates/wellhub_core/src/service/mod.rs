//! Tracker use-case services.
//!
//! # Responsibility
//! - Combine store calls with the pure analytics into page-level operations.
//! - Keep callers away from raw JSON bodies and index names.
//!
//! # Invariants
//! - Each service call issues independent single-collection store calls;
//!   nothing here spans collections atomically.

use crate::analytics::WindowError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod advocacy_service;
pub mod flare_service;
pub mod habit_service;
pub mod journal_service;
pub mod tracker_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Store(StoreError),
    Window(WindowError),
    InvalidInput(String),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Store(err) => err.code(),
            Self::Window(_) => "invalid_window",
            Self::InvalidInput(_) => "invalid_input",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Window(err) => write!(f, "{err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Window(err) => Some(err),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<WindowError> for ServiceError {
    fn from(value: WindowError) -> Self {
        Self::Window(value)
    }
}
