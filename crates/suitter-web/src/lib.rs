//! # suitter-web
//!
//! Axum glue around the session store: shared state, the extractors that
//! gate pages on a live session, the logout and session-inspection
//! handlers, and the router that ties them together.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use extractors::{MaybeSession, RequireSession};
pub use handlers::auth::establish_login;
pub use router::build_router;
pub use state::AppState;
