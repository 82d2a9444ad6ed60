//! # suitter-core
//!
//! Core crate for Suitter. Contains configuration schemas and the unified
//! error system shared by the session store and the web layer.
//!
//! This crate has **no** internal dependencies on other Suitter crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
