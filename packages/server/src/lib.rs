//! HTTP surface for stored components

mod config;
mod error;
mod routes;

pub use config::ServerConfig;
pub use error::ServerError;
pub use routes::{app, body_value, AppState, CreatedResponse, UpdatedResponse};
