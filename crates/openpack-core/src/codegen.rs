//! Collaborator seams for client source synthesis.
//!
//! Stub generation and annotation erasure are external concerns of the
//! materialization pipeline; the pipeline only requires the two contracts
//! below. The built-in implementations keep the server self-contained: the
//! generator emits plain JavaScript `fetch` wrappers, so the matching
//! eraser has nothing to remove.

use std::fmt::Write as _;

use crate::openapi::OperationRef;

/// Emits client source text for one operation against a base URL.
pub trait ClientStubGenerator: Send + Sync {
    fn generate(&self, operation: &OperationRef<'_>, base_url: &str) -> String;
}

/// Removes static type annotations from generated source, preserving
/// runtime behavior.
pub trait AnnotationEraser: Send + Sync {
    fn strip(&self, source: String) -> String;
}

/// Built-in generator: one CommonJS-exported `fetch` wrapper per operation.
#[derive(Debug, Clone, Default)]
pub struct FetchStubGenerator;

impl ClientStubGenerator for FetchStubGenerator {
    fn generate(&self, operation: &OperationRef<'_>, base_url: &str) -> String {
        let name = identifier(operation.id);
        let method = operation.verb.to_ascii_uppercase();
        let base = base_url.trim_end_matches('/');
        let params = &operation.operation.parameters;
        let has_body = operation.operation.request_body.is_some();

        let mut out = String::new();
        let _ = writeln!(out, "/** {}: {} {} */", operation.id, method, operation.path);
        let _ = writeln!(out, "async function {name}(params = {{}}) {{");
        let _ = writeln!(out, "  let path = {};", js_string(operation.path));
        for p in params.iter().filter(|p| p.location == "path") {
            let _ = writeln!(
                out,
                "  path = path.replace({}, encodeURIComponent(params[{}]));",
                js_string(&format!("{{{}}}", p.name)),
                js_string(&p.name),
            );
        }
        let _ = writeln!(out, "  const url = new URL({} + path);", js_string(base));
        for p in params.iter().filter(|p| p.location == "query") {
            let key = js_string(&p.name);
            let _ = writeln!(
                out,
                "  if (params[{key}] !== undefined) url.searchParams.set({key}, params[{key}]);",
            );
        }
        let _ = writeln!(out, "  const response = await fetch(url, {{");
        let _ = writeln!(out, "    method: {},", js_string(&method));
        if has_body {
            let _ = writeln!(out, "    headers: {{ \"content-type\": \"application/json\" }},");
            let _ = writeln!(out, "    body: JSON.stringify(params.body),");
        }
        let _ = writeln!(out, "  }});");
        let _ = writeln!(out, "  if (!response.ok) {{");
        let _ = writeln!(
            out,
            "    throw new Error({} + response.status);",
            js_string(&format!("{} failed: ", operation.id)),
        );
        let _ = writeln!(out, "  }}");
        let _ = writeln!(out, "  return response.json();");
        let _ = writeln!(out, "}}");
        let _ = writeln!(out, "module.exports.{name} = {name};");
        out
    }
}

/// Built-in eraser: the built-in generator already emits annotation-free
/// source, so stripping is the identity transform.
#[derive(Debug, Clone, Default)]
pub struct NoopEraser;

impl AnnotationEraser for NoopEraser {
    fn strip(&self, source: String) -> String {
        source
    }
}

/// Turn an operation id into a valid JavaScript identifier.
fn identifier(id: &str) -> String {
    let mut out: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Encode a string as a JavaScript string literal (JSON is a subset).
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
