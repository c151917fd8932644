//! Collection schema composition.
//!
//! A merged NERDm schema describes single objects. The editor works on a
//! whole metadata document holding any number of objects per definition, so
//! this module wraps the definitions in a collection schema: one root object
//! with an array property `"<Name> list"` per definition, each item
//! referencing the definition it collects.

use serde_json::{json, Map, Value};

use crate::error::ResolveError;
use crate::loader::definitions;

/// Title of the collection root object.
pub const COLLECTION_TITLE: &str = "MetaData";

/// Document key holding the instances of one definition.
pub fn list_key(name: &str) -> String {
    format!("{} list", name)
}

/// Build the collection schema for a schema document's definitions.
///
/// The result is self-contained: it carries a copy of the `definitions`
/// mapping and roots itself at the collection object, so an editor can
/// auto-complete any definition from the one document.
///
/// # Errors
///
/// Returns `ResolveError::MissingDefinitions` if the document has no
/// `definitions` object.
pub fn collection_schema(schema: &Value) -> Result<Value, ResolveError> {
    let defs = definitions(schema)?;

    let mut properties = Map::new();
    properties.insert("title".into(), json!("Meta Data"));
    for name in defs.keys() {
        properties.insert(
            list_key(name),
            json!({
                "description": format!("List of {} objects", name),
                "type": "array",
                "items": { "$ref": format!("#/definitions/{}", name) }
            }),
        );
    }

    Ok(json!({
        "title": COLLECTION_TITLE,
        COLLECTION_TITLE: { "properties": properties },
        "definitions": defs,
        "$ref": format!("#/{}", COLLECTION_TITLE)
    }))
}
