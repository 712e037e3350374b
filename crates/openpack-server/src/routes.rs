//! Path router.
//!
//! Requests are classified into one of four shapes (plus the root banner)
//! by splitting the raw path; leading and trailing empty segments are
//! stripped. Malformed components inside a matched shape are not router
//! errors; they flow downstream and surface as ordinary lookup misses.

use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Fixed informational body served at the root path.
pub const BANNER: &str = "openpack - npm packages synthesized from OpenAPI descriptions";

/// Build the HTTP application.
pub fn app(state: AppState) -> Router {
    Router::new()
        .fallback(handlers::dispatch)
        .with_state(state)
}

/// The recognized request shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<'a> {
    Root,
    Package {
        package: &'a str,
    },
    Scoped {
        scope: &'a str,
        package: &'a str,
    },
    Archive {
        package: &'a str,
        filename: &'a str,
    },
    ScopedArchive {
        scope: &'a str,
        package: &'a str,
        filename: &'a str,
    },
    Unmatched,
}

/// Classify a request path.
pub fn classify(path: &str) -> Route<'_> {
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match parts.as_slice() {
        &[] => Route::Root,
        &[package] => Route::Package { package },
        &[scope, package] => Route::Scoped { scope, package },
        &[package, "-", filename] if filename.ends_with(".tgz") => Route::Archive {
            package,
            filename,
        },
        &[scope, package, "-", filename] if filename.ends_with(".tgz") => Route::ScopedArchive {
            scope,
            package,
            filename,
        },
        _ => Route::Unmatched,
    }
}

/// Extract the version from a tarball filename: the substring between the
/// `{package}-` prefix and the trailing `.tgz` suffix.
pub fn parse_version<'a>(package: &str, filename: &'a str) -> Option<&'a str> {
    let version = filename
        .strip_suffix(".tgz")?
        .strip_prefix(package)?
        .strip_prefix('-')?;
    (!version.is_empty()).then_some(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_the_four_shapes() {
        assert_eq!(classify("/"), Route::Root);
        assert_eq!(
            classify("/example.com"),
            Route::Package {
                package: "example.com"
            }
        );
        assert_eq!(
            classify("/acme/list__items"),
            Route::Scoped {
                scope: "acme",
                package: "list__items"
            }
        );
        assert_eq!(
            classify("/pkg/-/pkg-1.0.0.tgz"),
            Route::Archive {
                package: "pkg",
                filename: "pkg-1.0.0.tgz"
            }
        );
        assert_eq!(
            classify("/acme/pkg/-/pkg-1.0.0.tgz"),
            Route::ScopedArchive {
                scope: "acme",
                package: "pkg",
                filename: "pkg-1.0.0.tgz"
            }
        );
    }

    #[test]
    fn strips_empty_segments() {
        assert_eq!(
            classify("//example.com/"),
            Route::Package {
                package: "example.com"
            }
        );
    }

    #[test]
    fn rejects_unknown_shapes() {
        assert_eq!(classify("/a/b/c"), Route::Unmatched);
        assert_eq!(classify("/a/-/file.txt"), Route::Unmatched);
        assert_eq!(classify("/a/b/c/d/e"), Route::Unmatched);
        assert_eq!(classify("/a/b/-/file.txt"), Route::Unmatched);
    }

    #[test]
    fn version_extraction() {
        assert_eq!(parse_version("pkg", "pkg-1.0.0.tgz"), Some("1.0.0"));
        assert_eq!(
            parse_version("example.com", "example.com-1.0.0.tgz"),
            Some("1.0.0")
        );
        // Wrong package prefix, missing suffix, empty version: lookup misses.
        assert_eq!(parse_version("pkg", "other-1.0.0.tgz"), None);
        assert_eq!(parse_version("pkg", "pkg-1.0.0.zip"), None);
        assert_eq!(parse_version("pkg", "pkg-.tgz"), None);
    }
}
