//! Request handlers for the four path shapes.
//!
//! Metadata handlers run the full materialization pipeline; archive
//! handlers only read the store. An expired or never-stored archive is a
//! 404, because serving regenerated bytes would break the digest
//! advertised by the manifest that introduced the URL.

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use openpack_core::{archive_key, normalize_host, normalize_package_name};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::routes::{classify, parse_version, Route, BANNER};
use crate::state::AppState;

const REASON_NO_DESCRIPTION: &str = "package not found - no OpenAPI spec available";
const REASON_NO_DESCRIPTION_FOR_SCOPE: &str =
    "package not found - no OpenAPI spec available for scope";
const REASON_NO_OPERATION: &str = "operation not found for package name";
const REASON_NO_ARCHIVE: &str = "archive not found or expired";

/// Single entry point: classify the path and dispatch.
pub async fn dispatch(State(state): State<AppState>, uri: Uri) -> Response {
    match classify(uri.path()) {
        Route::Root => (StatusCode::OK, BANNER).into_response(),
        Route::Package { package } => package_metadata(&state, package).await.into_response(),
        Route::Scoped { scope, package } => {
            scoped_metadata(&state, scope, package).await.into_response()
        }
        Route::Archive { package, filename } => {
            serve_archive(&state, package, package, filename).into_response()
        }
        Route::ScopedArchive {
            scope,
            package,
            filename,
        } => {
            let identity = format!("@{scope}/{package}");
            serve_archive(&state, &identity, package, filename).into_response()
        }
        Route::Unmatched => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// `/{package}`: whole-domain manifest.
async fn package_metadata(state: &AppState, package: &str) -> Result<Json<Value>, ApiError> {
    let domain = normalize_package_name(package);
    let Some(doc) = state.fetcher.fetch(&domain).await else {
        return Err(ApiError::not_found(REASON_NO_DESCRIPTION));
    };

    let host = normalize_host(&domain);
    let manifest = state.synthesizer.whole_domain(package, &host, &doc)?;
    Ok(Json(manifest))
}

/// `/{scope}/{package}`: single-operation manifest.
async fn scoped_metadata(
    state: &AppState,
    scope: &str,
    package: &str,
) -> Result<Json<Value>, ApiError> {
    let Some(doc) = state.fetcher.fetch(scope).await else {
        return Err(ApiError::not_found(REASON_NO_DESCRIPTION_FOR_SCOPE));
    };

    let Some(operation) = doc.find_operation(package) else {
        return Err(ApiError::not_found(REASON_NO_OPERATION));
    };

    let host = normalize_host(scope);
    let manifest = state
        .synthesizer
        .scoped(scope, package, &host, &doc, &operation)?;
    Ok(Json(manifest))
}

/// Tarball retrieval: store lookup only, no regeneration.
fn serve_archive(
    state: &AppState,
    identity: &str,
    package: &str,
    filename: &str,
) -> Result<Response, ApiError> {
    let Some(version) = parse_version(package, filename) else {
        debug!(package = %package, filename = %filename, "tarball filename does not match package");
        return Err(ApiError::not_found(REASON_NO_ARCHIVE));
    };

    let key = archive_key(identity, version);
    let Some(stored) = state.store.get(&key) else {
        debug!(key = %key, "archive absent or expired");
        return Err(ApiError::not_found(REASON_NO_ARCHIVE));
    };

    Ok((
        [(header::CONTENT_TYPE, stored.content_type)],
        stored.bytes,
    )
        .into_response())
}
