//! NERDm Schema Resolver
//!
//! Resolution of NERDm schema definitions into editable metadata documents.
//!
//! The NERDm schema (<https://data.nist.gov/od/dm/nerdm/>) describes every
//! metadata object as a named definition composed through `$ref` (single
//! inheritance), `allOf` (multiple inheritance) and `anyOf` (optionality).
//! This library walks that composition graph to synthesize the minimal
//! default instance of any definition, enumerate its inheritable properties
//! and required fields, and derive the `ndrm:`-qualified type chain used as
//! a type discriminator on generated objects.
//!
//! # Example
//!
//! ```
//! use nerdm_schema::{new_instance, Resolver};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "definitions": {
//!         "Person": {
//!             "properties": {
//!                 "name": { "type": "string" },
//!                 "age": { "type": "string" }
//!             },
//!             "required": ["name"]
//!         }
//!     }
//! });
//!
//! let resolver = Resolver::for_document(&schema).unwrap();
//!
//! // Required fields are pre-seeded with their defaults
//! let instance = new_instance(&resolver, "Person").unwrap();
//! assert_eq!(instance, json!({ "name": "" }));
//!
//! // All inheritable properties, and which of them are required
//! let set = resolver.properties_of("Person").unwrap();
//! assert_eq!(set.properties.len(), 2);
//! assert_eq!(set.required, vec!["name"]);
//! ```
//!
//! # Default Synthesis Rules
//!
//! | Node shape | Default value |
//! |------------|---------------|
//! | `properties` | `{}` (required keys seeded by the caller) |
//! | `type: "string"` | `""` |
//! | `type: "array"` | `[]` |
//! | `type: *` | `{}` |
//! | `anyOf` | default of the first non-`"null"` typed alternative |
//! | `$ref` | default of the referenced definition |
//! | anything else | `{}` |
//!
//! The resolver performs no I/O and never mutates the schema; every
//! operation is a pure walk over the `definitions` mapping. `$ref` and
//! `allOf` graphs must be acyclic - this is a precondition, not checked.

mod compose;
mod document;
mod error;
mod loader;
mod resolver;
mod types;

pub use compose::{collection_schema, list_key, COLLECTION_TITLE};
pub use document::{
    add_instance, new_document, new_instance, DEFAULT_LICENCE, DEFAULT_LICENCE_URL,
};
pub use error::{DocumentError, ResolveError};
pub use loader::{
    definitions, is_url, load_schema, load_schema_auto, load_schema_str, merge_definitions,
    rebase_refs, CORE_SCHEMA_URL, PUB_SCHEMA_URL, REBASE_URL, SCHEMA_ID_URL,
};
pub use resolver::{PropertySet, Resolver};
pub use types::{
    qualified_name, ref_target, SchemaNode, TypeTag, ID_PROPERTY, TYPE_PREFIX, TYPE_PROPERTY,
};

#[cfg(feature = "remote")]
pub use loader::load_schema_url;
