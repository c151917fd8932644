//! Core types for NERDm schema resolution.

use serde_json::{json, Map, Value};

/// Namespace prefix qualifying definition names in a type chain.
pub const TYPE_PREFIX: &str = "ndrm";

/// Type-discriminator property seeded on generated instances.
pub const TYPE_PROPERTY: &str = "@type";

/// Identifier property seeded on generated instances.
pub const ID_PROPERTY: &str = "@id";

/// Qualify a definition name for use in a type chain (e.g. `ndrm:Resource`).
pub fn qualified_name(name: &str) -> String {
    format!("{}:{}", TYPE_PREFIX, name)
}

/// Extract the bare definition name from a `$ref` path.
///
/// Definitions are addressed by the final segment of the path, so
/// `#/definitions/Resource` and `https://example.org/schema#/definitions/Resource`
/// both name `Resource`.
pub fn ref_target(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// The three-way type lattice the resolver distinguishes.
///
/// Everything that is not explicitly `"string"` or `"array"` collapses to
/// `Object`; numbers, booleans and enums are not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeTag {
    String,
    Array,
    #[default]
    Object,
}

impl TypeTag {
    /// Map a `type` keyword onto the lattice.
    pub fn parse(keyword: &str) -> Self {
        match keyword {
            "string" => TypeTag::String,
            "array" => TypeTag::Array,
            _ => TypeTag::Object,
        }
    }

    /// The placeholder value an instance of this tag starts out as.
    pub fn empty_value(&self) -> Value {
        match self {
            TypeTag::String => json!(""),
            TypeTag::Array => json!([]),
            TypeTag::Object => json!({}),
        }
    }
}

/// A sub-schema node classified by the composition keyword it carries.
///
/// Classification probes keys in a fixed order (`properties`, `type`,
/// `anyOf`, `$ref`, `allOf`); a well-formed node carries exactly one of
/// these shapes, so the order only matters for malformed input. Nodes
/// matching none of the shapes classify as [`SchemaNode::Unrecognized`]
/// and degrade to the object default rather than failing.
#[derive(Debug, Clone, Copy)]
pub enum SchemaNode<'a> {
    /// Object shape: carries a `properties` mapping.
    Object(&'a Map<String, Value>),
    /// Primitive leaf: carries a `type` keyword.
    Typed(TypeTag),
    /// Union (`anyOf`): alternatives, conventionally including a null option.
    Union(&'a Vec<Value>),
    /// Reference (`$ref`): the bare name of another definition.
    Reference(&'a str),
    /// Intersection (`allOf`): ordered parents for multiple inheritance.
    Intersection(&'a Vec<Value>),
    /// None of the recognized shapes.
    Unrecognized,
}

impl<'a> SchemaNode<'a> {
    /// Classify a sub-schema node once, so callers dispatch on a tag
    /// instead of re-probing the key set.
    pub fn classify(schema: &'a Value) -> Self {
        let Some(map) = schema.as_object() else {
            return SchemaNode::Unrecognized;
        };

        if let Some(props) = map.get("properties").and_then(Value::as_object) {
            return SchemaNode::Object(props);
        }
        if let Some(keyword) = map.get("type") {
            // A non-string `type` value still marks a typed node; it maps
            // to the object default like any unknown keyword.
            let tag = keyword.as_str().map(TypeTag::parse).unwrap_or_default();
            return SchemaNode::Typed(tag);
        }
        if let Some(alternatives) = map.get("anyOf").and_then(Value::as_array) {
            return SchemaNode::Union(alternatives);
        }
        if let Some(path) = map.get("$ref").and_then(Value::as_str) {
            return SchemaNode::Reference(ref_target(path));
        }
        if let Some(parents) = map.get("allOf").and_then(Value::as_array) {
            return SchemaNode::Intersection(parents);
        }

        SchemaNode::Unrecognized
    }
}
