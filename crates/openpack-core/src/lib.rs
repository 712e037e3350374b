//! Package materialization pipeline for openpack.
//!
//! openpack synthesizes installable npm packages on demand from remote
//! OpenAPI descriptions. This crate implements everything between the HTTP
//! surface and the raw archive encoding:
//!
//! - [`openapi`]: the OpenAPI document model and the operation index
//!   (enumeration over the fixed verb set, case-insensitive lookup with the
//!   `__` separator alias).
//! - [`gateway`]: the document gateway. A single-attempt HTTP fetch whose
//!   failures all collapse to "absent", so callers see a plain branch
//!   instead of an exception path.
//! - [`codegen`]: collaborator seams for client-stub generation and type
//!   annotation erasure, with built-in plain-JavaScript defaults.
//! - [`manifest`]: the package manifest synthesizer. Builds the archive,
//!   compresses it, digests the compressed bytes and stores them, and only
//!   then emits the manifest's dist block, so a manifest never advertises
//!   bytes that do not exist.
//! - [`cache`]: the bounded-lifetime archive store keyed by
//!   (package identity, version).
//!
//! The metadata/archive two-phase client protocol makes the (manifest,
//! archive) pair a single transaction: once a manifest has advertised a
//! digest, the archive is served verbatim from the store until its TTL
//! expires, and expiry is final. Regenerating after expiry could silently
//! break the digest contract if the upstream description changed, so it is
//! deliberately not done.

pub mod cache;
pub mod codegen;
mod error;
pub mod gateway;
pub mod manifest;
pub mod openapi;

pub use cache::{archive_key, ArchiveStore, MemoryStore, StoredArchive, GZIP_CONTENT_TYPE};
pub use codegen::{AnnotationEraser, ClientStubGenerator, FetchStubGenerator, NoopEraser};
pub use error::CoreError;
pub use gateway::{normalize_host, DescriptionFetcher, HttpGateway};
pub use manifest::{Synthesizer, PACKAGE_VERSION};
pub use openapi::{normalize_package_name, OpenApiDocument, Operation, OperationRef};
