//! Schema loading and merging.
//!
//! Handles loading schema documents from files, strings and HTTP URLs, and
//! combining the NERDm core schema with an extension schema into the single
//! `definitions` mapping the resolver works on.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::ResolveError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// `$schema` identifier written into generated documents.
pub const SCHEMA_ID_URL: &str = "https://data.nist.gov/od/dm/nerdm-schema/pub/v0.3";

/// Well-known source of the NERDm core schema.
pub const CORE_SCHEMA_URL: &str =
    "https://data.nist.gov/od/dm/nerdm-schema/nerdm-schema-0.3.json";

/// Well-known source of the NERDm publication extension schema.
pub const PUB_SCHEMA_URL: &str =
    "https://data.nist.gov/od/dm/nerdm-schema/pub/nerdm-pub-schema-0.3.json";

/// URL prefix the extension schema uses for cross-document references.
///
/// Stripping it turns those references into local `#/definitions/...`
/// fragments of the merged document.
pub const REBASE_URL: &str = "https://data.nist.gov/od/dm/nerdm-schema/v0.3";

/// Load a schema document from a file path.
///
/// # Errors
///
/// Returns `ResolveError::FileNotFound` if the file doesn't exist,
/// or `ResolveError::InvalidJson` if the file isn't valid JSON.
pub fn load_schema(path: &Path) -> Result<Value, ResolveError> {
    if !path.exists() {
        return Err(ResolveError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ResolveError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ResolveError::InvalidJson { source })
}

/// Load a schema document from a JSON string.
///
/// # Errors
///
/// Returns `ResolveError::InvalidJson` if the string isn't valid JSON.
pub fn load_schema_str(content: &str) -> Result<Value, ResolveError> {
    serde_json::from_str(content.trim()).map_err(|source| ResolveError::InvalidJson { source })
}

/// Load a schema document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `ResolveError::NetworkError` if the request fails,
/// or `ResolveError::InvalidJson` if the response isn't valid JSON.
#[cfg(feature = "remote")]
pub fn load_schema_url(url: &str) -> Result<Value, ResolveError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|source| ResolveError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|source| ResolveError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let body = response.text().map_err(|source| ResolveError::NetworkError {
        url: url.to_string(),
        source,
    })?;

    load_schema_str(&body)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a schema document from a file path or URL.
///
/// Automatically detects whether the source is a URL or file path.
/// URL loading requires the `remote` feature.
pub fn load_schema_auto(source: &str) -> Result<Value, ResolveError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_schema_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(ResolveError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_schema(Path::new(source))
    }
}

/// Borrow the `definitions` mapping of a schema document.
///
/// # Errors
///
/// Returns `ResolveError::MissingDefinitions` if the document has no
/// `definitions` object.
pub fn definitions(schema: &Value) -> Result<&Map<String, Value>, ResolveError> {
    schema
        .get("definitions")
        .and_then(Value::as_object)
        .ok_or(ResolveError::MissingDefinitions)
}

/// Rewrite every `$ref` in the tree that starts with `base` into a local
/// reference by stripping the prefix.
///
/// The extension schema points at the core schema with absolute URLs like
/// `https://.../v0.3#/definitions/Resource`; once both documents share one
/// `definitions` mapping, those must become `#/definitions/Resource`.
pub fn rebase_refs(schema: &mut Value, base: &str) {
    match schema {
        Value::Object(map) => {
            if let Some(Value::String(path)) = map.get_mut("$ref") {
                if let Some(local) = path.strip_prefix(base) {
                    *path = local.to_string();
                }
            }
            for value in map.values_mut() {
                rebase_refs(value, base);
            }
        }
        Value::Array(items) => {
            for item in items {
                rebase_refs(item, base);
            }
        }
        _ => {}
    }
}

/// Merge the definitions of an extension schema document into a core
/// schema document. On a name collision the extension's definition wins.
///
/// # Errors
///
/// Returns `ResolveError::MissingDefinitions` if either document lacks a
/// `definitions` object.
pub fn merge_definitions(core: &mut Value, extension: &Value) -> Result<(), ResolveError> {
    let incoming = definitions(extension)?.clone();

    let target = core
        .get_mut("definitions")
        .and_then(Value::as_object_mut)
        .ok_or(ResolveError::MissingDefinitions)?;

    for (name, definition) in incoming {
        target.insert(name, definition);
    }

    Ok(())
}
