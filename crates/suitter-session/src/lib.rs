//! # suitter-session
//!
//! In-memory session store for Suitter.
//!
//! ## Modules
//!
//! - `token` — random session token generation
//! - `data` — typed session keys and values
//! - `entity` — a single session and its locked data bag
//! - `cookie` — session cookie encoding and construction
//! - `manager` — the token registry: start, resolve, end, sweep
//! - `sweeper` — periodic background sweep with shutdown signal
//! - `clock` — wall-clock abstraction so expiry can be tested
//!
//! Locking is two-level: the manager's registry lock covers membership only,
//! each session's own mutex covers its data only.

pub mod clock;
pub mod cookie;
pub mod data;
pub mod entity;
pub mod error;
pub mod manager;
pub mod sweeper;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use data::{SessionKey, SessionValue, UserId};
pub use entity::Session;
pub use error::SessionError;
pub use manager::SessionManager;
pub use sweeper::SessionSweeper;
pub use token::SessionToken;
