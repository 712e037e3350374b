//! npm-compatible HTTP surface for openpack.
//!
//! GET only, four path shapes:
//!
//! | path                                        | response                       |
//! |---------------------------------------------|--------------------------------|
//! | `/{package}`                                | manifest JSON, whole domain    |
//! | `/{scope}/{package}`                        | manifest JSON, one operation   |
//! | `/{package}/-/{package}-{version}.tgz`      | archive bytes                  |
//! | `/{scope}/{package}/-/{package}-{version}.tgz` | archive bytes               |
//!
//! The empty path serves a fixed banner; anything else is 404. Metadata
//! requests materialize the archive before responding, so the manifest's
//! digest always refers to bytes that are already retrievable. Archive
//! requests only read the store: a missing or expired record is a 404,
//! never a regeneration.

pub mod config;
mod error;
pub mod handlers;
pub mod routes;
mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::{app, classify, parse_version, Route, BANNER};
pub use state::AppState;
