//! Personal notes service
//!
//! Users register and log in to receive a bearer token, then manage their
//! own notes. Every note operation is scoped to the user named by the token.

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use state::AppState;

use sqlx::migrate::Migrator;

/// Schema migrations embedded at compile time
pub static MIGRATOR: Migrator = sqlx::migrate!();
