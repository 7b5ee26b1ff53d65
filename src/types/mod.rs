//! Shared types for the entity configuration service

pub mod error;

pub use error::{AssemblyError, Result, ServiceError};
