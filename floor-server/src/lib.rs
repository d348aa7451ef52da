//! floor-server - restaurant floor and reservation API
//!
//! # Structure
//!
//! - [`config`] - environment configuration
//! - [`store`] - record store access (REST and in-memory)
//! - [`reservations`] - validation, schema-adaptive writes, status updates
//! - [`floor`] - table status projection and staff actions
//! - [`api`] - HTTP routes
//! - [`middleware`] - request logging
//! - [`utils`] - logging setup and time helpers

pub mod api;
pub mod config;
pub mod error;
pub mod floor;
pub mod middleware;
pub mod reservations;
pub mod state;
pub mod store;
pub mod utils;

pub use config::{Config, ConfigError};
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
