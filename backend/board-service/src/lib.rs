//! Board Service Library
//!
//! Content-management backend: authenticated users create, read, update,
//! and delete posts (announcements or questions) and attach comments. A
//! session-based gate protects non-public routes; mutating post endpoints
//! perform a per-request ownership/role authorization check.
//!
//! # Modules
//!
//! - `handlers`: HTTP request handlers
//! - `models`: Data structures for users, posts, comments
//! - `services`: Business logic layer
//! - `db`: Repository traits and Postgres implementations
//! - `middleware`: Session identity, login gate, permission checks
//! - `session`: Typed session layer over the session store
//! - `security`: Password hashing
//! - `error`: Error types and handling
//! - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod security;
pub mod services;
pub mod session;

pub use config::Config;
pub use error::{AppError, Result};
