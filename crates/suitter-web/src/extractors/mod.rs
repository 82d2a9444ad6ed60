//! Custom Axum extractors.

pub mod session;

pub use session::{LoginRedirect, MaybeSession, RequireSession};
