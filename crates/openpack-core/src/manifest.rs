//! Package manifest synthesis.
//!
//! The synthesizer drives the whole materialization pipeline for one
//! request: generate the package files, encode them into a tar stream,
//! compress, digest the compressed bytes, store them under
//! `{identity}@{version}`, and only then emit the manifest whose dist
//! block advertises that digest. Dist fields are never invented ahead of
//! the bytes they describe.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use openpack_archive::{compress, digest, ArchiveBuilder, ArchiveError};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::cache::{archive_key, ArchiveStore, StoredArchive, GZIP_CONTENT_TYPE};
use crate::codegen::{AnnotationEraser, ClientStubGenerator, FetchStubGenerator, NoopEraser};
use crate::error::CoreResult;
use crate::openapi::{OpenApiDocument, OperationRef};

/// The single published version. There is no multi-version history: every
/// materialization is "the" current package for its identity.
pub const PACKAGE_VERSION: &str = "1.0.0";

const NPM_TEST_SCRIPT: &str = "echo \"Error: no test specified\" && exit 1";
const PACKAGE_AUTHOR: &str = "openpack";

/// Digest and URL of a freshly stored archive.
struct Dist {
    shasum: String,
    tarball: String,
}

/// Builds registry manifests and the archives they advertise.
pub struct Synthesizer {
    store: Arc<dyn ArchiveStore>,
    generator: Arc<dyn ClientStubGenerator>,
    eraser: Arc<dyn AnnotationEraser>,
    public_url: String,
}

impl Synthesizer {
    /// Create a synthesizer with the built-in codegen collaborators.
    ///
    /// `public_url` is the externally reachable base under which tarball
    /// URLs are advertised.
    pub fn new(store: Arc<dyn ArchiveStore>, public_url: impl Into<String>) -> Self {
        Self {
            store,
            generator: Arc::new(FetchStubGenerator),
            eraser: Arc::new(NoopEraser),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Swap in custom codegen collaborators.
    pub fn with_codegen(
        mut self,
        generator: Arc<dyn ClientStubGenerator>,
        eraser: Arc<dyn AnnotationEraser>,
    ) -> Self {
        self.generator = generator;
        self.eraser = eraser;
        self
    }

    /// Whole-domain mode: every operation of the document bundled into one
    /// synthetic module.
    pub fn whole_domain(
        &self,
        package: &str,
        host: &str,
        doc: &OpenApiDocument,
    ) -> CoreResult<Value> {
        let now = Utc::now();
        let operations = doc.operations();
        let base_url = self.client_base_url(doc, host);

        let source: Vec<String> = operations
            .iter()
            .map(|op| self.generator.generate(op, &base_url))
            .collect();
        let index_js = self.eraser.strip(source.join("\n"));

        let operation_list: String = operations
            .iter()
            .map(|op| format!("- {}\n", op.id))
            .collect();
        let readme = format!(
            "# {package}\n\nGenerated API client for {}\n\n## Included Operations\n\n{operation_list}",
            doc.info.title,
        );

        let files = package_files(package, "Generated API client", &readme, &index_js)?;
        let dist = self.materialize(package, package, package, files, now)?;

        let operations_json: Vec<Value> = operations
            .iter()
            .map(|op| {
                json!({
                    "id": op.id,
                    "method": op.verb,
                    "path": op.path,
                    "summary": op.operation.summary.clone().unwrap_or_default(),
                    "description": op.operation.description.clone().unwrap_or_default(),
                })
            })
            .collect();

        let version_record = json!({
            "name": package,
            "version": PACKAGE_VERSION,
            "description": format!("Complete API client for {}", doc.info.title),
            "main": "index.js",
            "scripts": { "test": NPM_TEST_SCRIPT },
            "dependencies": {},
            "operations": operations_json,
            "dist": { "shasum": dist.shasum, "tarball": dist.tarball },
        });

        Ok(self.metadata(
            package,
            &format!("API client for {}", doc.info.title),
            version_record,
            &readme,
            now,
        ))
    }

    /// Scoped mode: a single operation as its own package.
    pub fn scoped(
        &self,
        scope: &str,
        package: &str,
        host: &str,
        doc: &OpenApiDocument,
        operation: &OperationRef<'_>,
    ) -> CoreResult<Value> {
        let now = Utc::now();
        let full_name = format!("@{scope}/{package}");
        let base_url = self.client_base_url(doc, host);

        let description = operation
            .operation
            .description
            .clone()
            .or_else(|| operation.operation.summary.clone())
            .unwrap_or_else(|| format!("Generated from {}", doc.info.title));

        let index_js = self
            .eraser
            .strip(self.generator.generate(operation, &base_url));
        let readme = format!("# {full_name}\n\n{description}");

        let files = package_files(&full_name, &description, &readme, &index_js)?;
        let dist = self.materialize(
            &full_name,
            &format!("{scope}/{package}"),
            package,
            files,
            now,
        )?;

        let version_record = json!({
            "name": full_name,
            "version": PACKAGE_VERSION,
            "description": description,
            "main": "index.js",
            "scripts": { "test": NPM_TEST_SCRIPT },
            "dependencies": {},
            "dist": { "shasum": dist.shasum, "tarball": dist.tarball },
        });

        Ok(self.metadata(&full_name, &description, version_record, &readme, now))
    }

    /// Base URL generated clients call: the document's first server entry,
    /// falling back to the fetched host itself.
    fn client_base_url(&self, doc: &OpenApiDocument, host: &str) -> String {
        doc.base_url()
            .map(str::to_string)
            .unwrap_or_else(|| format!("https://{host}"))
    }

    /// Encode, compress, digest and store the archive; returns the dist
    /// block contents. This must complete before any manifest field that
    /// references the archive is produced.
    fn materialize(
        &self,
        identity: &str,
        url_prefix: &str,
        package: &str,
        files: Vec<(String, String)>,
        now: DateTime<Utc>,
    ) -> CoreResult<Dist> {
        let mut builder = ArchiveBuilder::new();
        for (path, content) in files {
            builder.append(path, content.into_bytes())?;
        }
        let tar_bytes = builder.finish(now.timestamp().max(0) as u64);
        let compressed = compress::gzip(&tar_bytes).map_err(ArchiveError::from)?;
        let shasum = digest::sha1_hex(&compressed);

        let key = archive_key(identity, PACKAGE_VERSION);
        debug!(key = %key, bytes = compressed.len(), digest = %shasum, "archive materialized");
        self.store.put(
            key,
            StoredArchive {
                bytes: compressed.into(),
                digest: shasum.clone(),
                content_type: GZIP_CONTENT_TYPE,
                created_at: now,
            },
        );

        let tarball = format!(
            "{}/{url_prefix}/-/{package}-{PACKAGE_VERSION}.tgz",
            self.public_url,
        );
        Ok(Dist { shasum, tarball })
    }

    /// Assemble the outer registry metadata document.
    fn metadata(
        &self,
        name: &str,
        description: &str,
        version_record: Value,
        readme: &str,
        now: DateTime<Utc>,
    ) -> Value {
        let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let rev = format!("1-{:x}", now.timestamp_millis());

        let mut versions = Map::new();
        versions.insert(PACKAGE_VERSION.to_string(), version_record);

        let mut time = Map::new();
        time.insert("created".to_string(), Value::String(stamp.clone()));
        time.insert("modified".to_string(), Value::String(stamp.clone()));
        time.insert(PACKAGE_VERSION.to_string(), Value::String(stamp));

        json!({
            "_id": name,
            "_rev": rev,
            "name": name,
            "description": description,
            "dist-tags": { "latest": PACKAGE_VERSION },
            "versions": versions,
            "time": time,
            "readme": readme,
        })
    }
}

/// The three files every synthesized package carries.
fn package_files(
    manifest_name: &str,
    description: &str,
    readme: &str,
    index_js: &str,
) -> CoreResult<Vec<(String, String)>> {
    let package_json = serde_json::to_string_pretty(&json!({
        "name": manifest_name,
        "version": PACKAGE_VERSION,
        "description": description,
        "main": "index.js",
        "scripts": { "test": NPM_TEST_SCRIPT },
        "dependencies": {},
        "author": PACKAGE_AUTHOR,
        "license": "MIT",
    }))?;

    Ok(vec![
        ("package/package.json".to_string(), package_json),
        ("package/README.md".to_string(), readme.to_string()),
        ("package/index.js".to_string(), index_js.to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use std::io::Read;
    use std::time::Duration;

    fn fixture() -> OpenApiDocument {
        serde_json::from_value(json!({
            "info": { "title": "Test" },
            "paths": {
                "/items": {
                    "get": { "operationId": "listItems", "responses": { "200": {} } }
                },
                "/items/{id}": {
                    "delete": {
                        "operationId": "list/items",
                        "summary": "Remove one item",
                        "responses": {}
                    }
                }
            }
        }))
        .unwrap()
    }

    fn setup() -> (Arc<MemoryStore>, Synthesizer) {
        let store = Arc::new(MemoryStore::new(Duration::from_secs(60)));
        let synth = Synthesizer::new(store.clone(), "https://registry.test/");
        (store, synth)
    }

    fn unpack(gz: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut decoder = flate2::read::GzDecoder::new(gz);
        let mut tar_bytes = Vec::new();
        decoder.read_to_end(&mut tar_bytes).unwrap();

        let mut archive = tar::Archive::new(std::io::Cursor::new(tar_bytes));
        archive
            .entries()
            .unwrap()
            .map(|entry| {
                let mut entry = entry.unwrap();
                let path = entry.path().unwrap().to_str().unwrap().to_string();
                let mut content = Vec::new();
                entry.read_to_end(&mut content).unwrap();
                (path, content)
            })
            .collect()
    }

    #[test]
    fn whole_domain_manifest_shape() {
        let (_store, synth) = setup();
        let manifest = synth
            .whole_domain("example.com", "example.com", &fixture())
            .unwrap();

        assert_eq!(manifest["_id"], "example.com");
        assert_eq!(manifest["dist-tags"]["latest"], PACKAGE_VERSION);

        let record = &manifest["versions"][PACKAGE_VERSION];
        assert_eq!(record["name"], "example.com");
        assert_eq!(record["main"], "index.js");

        let ops = record["operations"].as_array().unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0]["id"], "listItems");
        assert_eq!(ops[0]["method"], "get");
        assert_eq!(ops[0]["path"], "/items");

        assert_eq!(
            record["dist"]["tarball"],
            "https://registry.test/example.com/-/example.com-1.0.0.tgz"
        );
        assert_eq!(record["dist"]["shasum"].as_str().unwrap().len(), 40);
    }

    #[test]
    fn manifest_digest_matches_stored_bytes() {
        let (store, synth) = setup();
        let manifest = synth
            .whole_domain("example.com", "example.com", &fixture())
            .unwrap();
        let shasum = manifest["versions"][PACKAGE_VERSION]["dist"]["shasum"]
            .as_str()
            .unwrap();

        let stored = store.get("example.com@1.0.0").unwrap();
        assert_eq!(digest::sha1_hex(&stored.bytes), shasum);
        assert_eq!(stored.digest, shasum);
        assert_eq!(stored.content_type, GZIP_CONTENT_TYPE);
    }

    #[test]
    fn scoped_manifest_uses_operation_description_first() {
        let (_store, synth) = setup();
        let doc = fixture();
        let op = doc.find_operation("list__items").unwrap();
        let manifest = synth
            .scoped("acme", "list__items", "acme.com", &doc, &op)
            .unwrap();

        // No description on the operation, so the summary wins.
        assert_eq!(manifest["description"], "Remove one item");
        assert_eq!(manifest["_id"], "@acme/list__items");
        assert_eq!(
            manifest["versions"][PACKAGE_VERSION]["dist"]["tarball"],
            "https://registry.test/acme/list__items/-/list__items-1.0.0.tgz"
        );
    }

    #[test]
    fn scoped_description_falls_back_to_title() {
        let (_store, synth) = setup();
        let doc: OpenApiDocument = serde_json::from_value(json!({
            "info": { "title": "Fallback API" },
            "paths": { "/x": { "get": { "operationId": "bare", "responses": {} } } }
        }))
        .unwrap();
        let op = doc.find_operation("bare").unwrap();
        let manifest = synth.scoped("acme", "bare", "acme.com", &doc, &op).unwrap();
        assert_eq!(manifest["description"], "Generated from Fallback API");
    }

    #[test]
    fn scoped_archive_is_a_valid_npm_package() {
        let (store, synth) = setup();
        let doc = fixture();
        let op = doc.find_operation("list__items").unwrap();
        synth
            .scoped("acme", "list__items", "acme.com", &doc, &op)
            .unwrap();

        let stored = store.get("@acme/list__items@1.0.0").unwrap();
        let entries = unpack(&stored.bytes);
        let paths: Vec<&str> = entries.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(
            paths,
            ["package/package.json", "package/README.md", "package/index.js"]
        );

        let package_json: Value = serde_json::from_slice(&entries[0].1).unwrap();
        assert_eq!(package_json["name"], "@acme/list__items");
        assert_eq!(package_json["version"], PACKAGE_VERSION);

        let readme = std::str::from_utf8(&entries[1].1).unwrap();
        assert!(readme.starts_with("# @acme/list__items"));

        let index_js = std::str::from_utf8(&entries[2].1).unwrap();
        assert!(index_js.contains("async function list_items"));
    }

    #[test]
    fn client_base_url_falls_back_to_host() {
        let (store, synth) = setup();
        synth
            .whole_domain("example.com", "example.com", &fixture())
            .unwrap();
        let stored = store.get("example.com@1.0.0").unwrap();
        let entries = unpack(&stored.bytes);
        let index_js = std::str::from_utf8(&entries[2].1).unwrap();
        // Fixture has no servers entry, so stubs target the fetched host.
        assert!(index_js.contains("https://example.com"));
    }

    #[test]
    fn timestamps_and_rev_are_coherent() {
        let (_store, synth) = setup();
        let manifest = synth
            .whole_domain("example.com", "example.com", &fixture())
            .unwrap();

        let rev = manifest["_rev"].as_str().unwrap();
        assert!(rev.starts_with("1-"));

        let time = manifest["time"].as_object().unwrap();
        assert_eq!(time["created"], time["modified"]);
        assert!(time.contains_key(PACKAGE_VERSION));
    }
}
