//! HTTP surface for the abbr URL registry.
//!
//! Every request that touches the store extracts a [`DbSession`], which
//! acquires one pooled connection for the lifetime of that request and
//! releases it when the handler returns, on success or failure.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod session;
pub mod state;

pub use app::App;
pub use error::{AppError, Result};
pub use session::DbSession;
pub use state::AppState;
