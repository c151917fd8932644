//! Metadata document assembly.
//!
//! Builds the output document a metadata author edits: a header block,
//! plus per-definition instance lists appended to over time. Instances are
//! synthesized from the resolver so every required field is pre-seeded and
//! the type-discriminator chain is already in place.

use chrono::{DateTime, Local};
use serde_json::{json, Map, Value};

use crate::compose::list_key;
use crate::error::{DocumentError, ResolveError};
use crate::resolver::Resolver;
use crate::types::{ID_PROPERTY, TYPE_PROPERTY};

/// Licence recorded in the document header.
pub const DEFAULT_LICENCE: &str = "CC-BY";

/// Licence URL recorded in the document header.
pub const DEFAULT_LICENCE_URL: &str =
    "https://creativecommons.org/licenses/by/4.0/legalcode";

/// Create a fresh metadata document holding only the header block.
///
/// The creation time is rendered in local time without zero padding
/// (`2026-8-7 9:05` becomes `2026-8-7 9:5`), matching existing documents.
pub fn new_document(schema_url: &str, author: &str, created: DateTime<Local>) -> Value {
    json!({
        "$schema": schema_url,
        "Created on": created.format("%Y-%-m-%-d %-H:%-M").to_string(),
        "Author": author,
        "Licence": DEFAULT_LICENCE,
        "Licence URL": DEFAULT_LICENCE_URL,
    })
}

/// Synthesize a seeded instance of a named definition.
///
/// Starts from the definition's default value. Object-shaped instances are
/// additionally populated with every required property's default, the
/// `@type` chain (when the definition declares an `@type` property) and an
/// empty `@id` (when declared). The discriminator fields are written last
/// so a generic required-default never clobbers them.
///
/// # Errors
///
/// Returns `ResolveError::UnknownDefinition` if `name` (or any definition
/// it references) is not in the resolver's definitions mapping.
pub fn new_instance(resolver: &Resolver, name: &str) -> Result<Value, ResolveError> {
    let definition = resolver.definition(name)?;
    let mut value = resolver.default_value(definition)?;

    if let Value::Object(instance) = &mut value {
        let set = resolver.properties(definition)?;

        for (required, default) in set.required.iter().zip(set.required_defaults) {
            instance.insert(required.clone(), default);
        }
        if set.properties.contains_key(TYPE_PROPERTY) {
            let chain = resolver.type_chain(name, definition)?;
            instance.insert(TYPE_PROPERTY.into(), json!(chain));
        }
        if set.properties.contains_key(ID_PROPERTY) {
            instance.insert(ID_PROPERTY.into(), json!(""));
        }
    }

    Ok(value)
}

/// Append an instance to the document's `"<name> list"` array, creating
/// the array if it doesn't exist yet.
///
/// # Errors
///
/// Returns `DocumentError::NotAnObject` if the document root is not a
/// JSON object.
pub fn add_instance(
    document: &mut Value,
    name: &str,
    instance: Value,
) -> Result<(), DocumentError> {
    let root: &mut Map<String, Value> =
        document.as_object_mut().ok_or(DocumentError::NotAnObject)?;

    let key = list_key(name);
    match root.get_mut(&key) {
        Some(Value::Array(list)) => list.push(instance),
        _ => {
            root.insert(key, json!([instance]));
        }
    }

    Ok(())
}
