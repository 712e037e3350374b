//! OpenAPI document model and operation index.
//!
//! Documents are deserialized fresh on every request and never cached: the
//! upstream description may change between two calls, and a stale index
//! would hand out operations that no longer exist.

use indexmap::IndexMap;
use serde::Deserialize;

/// Fixed verb set enumerated per path template, in this order.
pub const VERBS: [&str; 5] = ["get", "post", "put", "patch", "delete"];

/// Machine-readable listing of a remote API's operations.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenApiDocument {
    #[serde(default)]
    pub openapi: Option<String>,
    pub info: Info,
    #[serde(default)]
    pub servers: Vec<Server>,
    /// Path template → operations per verb. Document order is preserved so
    /// enumeration order is stable across requests for the same document.
    pub paths: IndexMap<String, PathItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Info {
    pub title: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub get: Option<Operation>,
    #[serde(default)]
    pub post: Option<Operation>,
    #[serde(default)]
    pub put: Option<Operation>,
    #[serde(default)]
    pub patch: Option<Operation>,
    #[serde(default)]
    pub delete: Option<Operation>,
}

impl PathItem {
    fn operation(&self, verb: &str) -> Option<&Operation> {
        match verb {
            "get" => self.get.as_ref(),
            "post" => self.post.as_ref(),
            "put" => self.put.as_ref(),
            "patch" => self.patch.as_ref(),
            "delete" => self.delete.as_ref(),
            _ => None,
        }
    }
}

/// One callable endpoint inside a document.
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    #[serde(default, rename = "operationId")]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, rename = "requestBody")]
    pub request_body: Option<serde_json::Value>,
    #[serde(default)]
    pub responses: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Where the parameter lives: "query", "header", "path" or "cookie".
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub schema: Option<serde_json::Value>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A named operation with its position in the document.
#[derive(Debug, Clone)]
pub struct OperationRef<'a> {
    pub id: &'a str,
    pub verb: &'a str,
    pub path: &'a str,
    pub operation: &'a Operation,
}

impl OpenApiDocument {
    /// Enumerate named operations: every path template crossed with the
    /// fixed verb set, skipping operations without an `operationId`.
    pub fn operations(&self) -> Vec<OperationRef<'_>> {
        let mut out = Vec::new();
        for (path, item) in &self.paths {
            for verb in VERBS {
                let Some(operation) = item.operation(verb) else {
                    continue;
                };
                let Some(id) = operation.operation_id.as_deref() else {
                    continue;
                };
                out.push(OperationRef {
                    id,
                    verb,
                    path,
                    operation,
                });
            }
        }
        out
    }

    /// Look up an operation by requested package name.
    ///
    /// The name is normalized (`__` → `/`) and compared case-insensitively
    /// against operation ids. When a document carries duplicate ids, the
    /// first in enumeration order wins; that ambiguity is a property of the
    /// upstream document and is left undisguised.
    pub fn find_operation(&self, name: &str) -> Option<OperationRef<'_>> {
        let wanted = normalize_package_name(name);
        self.operations()
            .into_iter()
            .find(|op| op.id.eq_ignore_ascii_case(&wanted))
    }

    /// Base URL for generated clients: the document's first server entry.
    pub fn base_url(&self) -> Option<&str> {
        self.servers.first().map(|s| s.url.as_str())
    }
}

/// A double underscore in a requested package name is a separator alias for
/// `/` inside operation ids (npm package names cannot contain slashes).
pub fn normalize_package_name(name: &str) -> String {
    name.replace("__", "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(value: serde_json::Value) -> OpenApiDocument {
        serde_json::from_value(value).unwrap()
    }

    fn fixture() -> OpenApiDocument {
        doc(serde_json::json!({
            "info": { "title": "Test", "version": "2.0" },
            "servers": [{ "url": "https://api.example.com/v1" }],
            "paths": {
                "/items": {
                    "get": { "operationId": "listItems", "responses": { "200": {} } },
                    "post": { "operationId": "createItem", "responses": {} }
                },
                "/items/{id}": {
                    "delete": { "operationId": "items/delete", "responses": {} },
                    "get": { "summary": "anonymous", "responses": {} }
                }
            }
        }))
    }

    #[test]
    fn enumerates_in_document_then_verb_order() {
        let doc = fixture();
        let ids: Vec<&str> = doc.operations().iter().map(|op| op.id).collect();
        assert_eq!(ids, ["listItems", "createItem", "items/delete"]);
    }

    #[test]
    fn skips_operations_without_id() {
        let doc = fixture();
        assert!(doc.operations().iter().all(|op| op.path != "/items/{id}" || op.verb != "get"));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let doc = fixture();
        let a = doc.find_operation("listitems").unwrap();
        let b = doc.find_operation("LISTITEMS").unwrap();
        assert_eq!(a.id, "listItems");
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn double_underscore_aliases_path_separator() {
        let doc = fixture();
        let op = doc.find_operation("items__delete").unwrap();
        assert_eq!(op.id, "items/delete");
        assert_eq!(op.verb, "delete");
    }

    #[test]
    fn missing_operation_is_none() {
        assert!(fixture().find_operation("nope").is_none());
    }

    #[test]
    fn duplicate_ids_resolve_to_first_in_enumeration_order() {
        let doc = doc(serde_json::json!({
            "info": { "title": "Dup" },
            "paths": {
                "/a": { "get": { "operationId": "op", "summary": "first", "responses": {} } },
                "/b": { "get": { "operationId": "OP", "summary": "second", "responses": {} } }
            }
        }));
        let found = doc.find_operation("op").unwrap();
        assert_eq!(found.operation.summary.as_deref(), Some("first"));
    }

    #[test]
    fn base_url_is_first_server() {
        assert_eq!(fixture().base_url(), Some("https://api.example.com/v1"));
        let bare = doc(serde_json::json!({ "info": { "title": "t" }, "paths": {} }));
        assert_eq!(bare.base_url(), None);
    }

    #[test]
    fn document_without_paths_does_not_parse() {
        let result: Result<OpenApiDocument, _> =
            serde_json::from_value(serde_json::json!({ "info": { "title": "t" } }));
        assert!(result.is_err());
    }
}
