//! Schema resolution - derives default instances, inheritable properties
//! and type chains from a NERDm `definitions` mapping.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ResolveError;
use crate::types::{qualified_name, SchemaNode, TypeTag};

/// Aggregated property view of an object-shaped definition.
///
/// `required` and `required_defaults` are index-paired: the default value
/// synthesized for `required[i]` is `required_defaults[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertySet {
    /// Declared properties, in schema order (first writer wins under `allOf`).
    pub properties: Map<String, Value>,
    /// Required property names, in first-seen order, without duplicates.
    pub required: Vec<String>,
    /// Default value for each required property.
    pub required_defaults: Vec<Value>,
}

/// Resolves definitions of a merged NERDm schema document.
///
/// Holds a read-only reference to the document's `definitions` mapping and
/// exposes four operations: default values, property sets, per-property
/// defaults and type chains. Every operation is a stateless tree walk, so a
/// single resolver can be shared between callers without synchronization.
///
/// The `$ref`/`allOf` graph is assumed acyclic; no cycle guard is applied,
/// and resolution of a cyclic graph will not terminate.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    definitions: &'a Map<String, Value>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over a `definitions` mapping.
    pub fn new(definitions: &'a Map<String, Value>) -> Self {
        Self { definitions }
    }

    /// Create a resolver over the `definitions` mapping of a full schema
    /// document.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::MissingDefinitions` if the document has no
    /// `definitions` object.
    pub fn for_document(schema: &'a Value) -> Result<Self, ResolveError> {
        let definitions = schema
            .get("definitions")
            .and_then(Value::as_object)
            .ok_or(ResolveError::MissingDefinitions)?;
        Ok(Self { definitions })
    }

    /// All definition names, sorted.
    ///
    /// Callers are expected to validate user-supplied names against this
    /// set (e.g. a closed selection list) so that `UnknownDefinition` does
    /// not surface in normal operation.
    pub fn definition_names(&self) -> Vec<&'a str> {
        let mut names: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up a definition by bare name.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::UnknownDefinition` if the name is not present.
    pub fn definition(&self, name: &str) -> Result<&'a Value, ResolveError> {
        self.definitions
            .get(name)
            .ok_or_else(|| ResolveError::UnknownDefinition { name: name.into() })
    }

    /// Synthesize the default placeholder value for a sub-schema node.
    ///
    /// Object-shaped nodes (and anything unrecognized) yield an empty
    /// mapping; `type` maps through the fixed lattice; `anyOf` yields the
    /// default of the first alternative whose `type` is not `"null"`;
    /// `$ref` resolves through the referenced definition.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::UnknownDefinition` if a `$ref` target is not
    /// in the definitions mapping.
    pub fn default_value(&self, schema: &Value) -> Result<Value, ResolveError> {
        match SchemaNode::classify(schema) {
            SchemaNode::Object(_) => Ok(TypeTag::Object.empty_value()),
            SchemaNode::Typed(tag) => Ok(tag.empty_value()),
            SchemaNode::Union(alternatives) => Ok(first_typed_default(alternatives)
                .unwrap_or_else(|| TypeTag::Object.empty_value())),
            SchemaNode::Reference(target) => self.default_value(self.definition(target)?),
            SchemaNode::Intersection(_) | SchemaNode::Unrecognized => {
                Ok(TypeTag::Object.empty_value())
            }
        }
    }

    /// Synthesize the default placeholder value for a named definition.
    pub fn default_value_of(&self, name: &str) -> Result<Value, ResolveError> {
        self.default_value(self.definition(name)?)
    }

    /// Build the qualified type chain for a definition: the definition
    /// itself followed by every definition it transitively inherits from
    /// via `$ref` and `allOf`.
    ///
    /// `allOf` parents are walked depth-first in listed order, each
    /// appended in full before the next entry starts. Repeated ancestors
    /// (diamond inheritance) appear once per inheritance path; the chain
    /// is not deduplicated.
    pub fn type_chain(&self, name: &str, schema: &Value) -> Result<Vec<String>, ResolveError> {
        let mut chain = vec![qualified_name(name)];
        match SchemaNode::classify(schema) {
            SchemaNode::Intersection(parents) => {
                for parent in parents {
                    if let SchemaNode::Reference(target) = SchemaNode::classify(parent) {
                        chain.extend(self.type_chain(target, self.definition(target)?)?);
                    }
                }
            }
            SchemaNode::Reference(target) => {
                chain.extend(self.type_chain(target, self.definition(target)?)?);
            }
            _ => {}
        }
        Ok(chain)
    }

    /// Build the qualified type chain for a named definition.
    pub fn type_chain_of(&self, name: &str) -> Result<Vec<String>, ResolveError> {
        self.type_chain(name, self.definition(name)?)
    }

    /// Collect the declared properties of a sub-schema node, which of them
    /// are required, and a default value for each required property.
    ///
    /// String- and array-shaped nodes have no properties and return empty
    /// collections. `$ref` nodes delegate to the referenced definition.
    /// `allOf` nodes aggregate their entries with deterministic precedence:
    /// properties merge first-writer-wins, required names union in
    /// first-seen order, and each required default is computed against the
    /// entry that contributed the name.
    pub fn properties(&self, schema: &Value) -> Result<PropertySet, ResolveError> {
        if !self.default_value(schema)?.is_object() {
            return Ok(PropertySet::default());
        }

        match SchemaNode::classify(schema) {
            SchemaNode::Object(props) => {
                let mut set = PropertySet {
                    properties: props.clone(),
                    ..PropertySet::default()
                };
                for name in required_names(schema) {
                    set.required.push(name.to_string());
                    set.required_defaults.push(self.property_type(name, schema)?);
                }
                Ok(set)
            }
            SchemaNode::Reference(target) => self.properties(self.definition(target)?),
            SchemaNode::Intersection(parents) => {
                let mut set = PropertySet::default();
                for parent in parents {
                    if let SchemaNode::Reference(target) = SchemaNode::classify(parent) {
                        let inherited = self.properties(self.definition(target)?)?;
                        merge_property_set(&mut set, inherited);
                    } else {
                        self.merge_inline_entry(&mut set, parent)?;
                    }
                }
                Ok(set)
            }
            _ => Ok(PropertySet::default()),
        }
    }

    /// Collect the property set of a named definition.
    pub fn properties_of(&self, name: &str) -> Result<PropertySet, ResolveError> {
        self.properties(self.definition(name)?)
    }

    /// Synthesize the default value for one named property of an
    /// object-shaped sub-schema node.
    ///
    /// A property absent from the node's `properties` yields the empty
    /// string. This is a deliberate sentinel rather than a type-correct
    /// placeholder; required names contributed by one `allOf` entry but
    /// declared in another resolve to it.
    pub fn property_type(&self, name: &str, schema: &Value) -> Result<Value, ResolveError> {
        let Some(prop) = schema.get("properties").and_then(|p| p.get(name)) else {
            return Ok(Value::String(String::new()));
        };

        match SchemaNode::classify(prop) {
            SchemaNode::Typed(tag) => Ok(tag.empty_value()),
            SchemaNode::Reference(target) => self.default_value(self.definition(target)?),
            // An allOf property is always an embedded object.
            SchemaNode::Intersection(_) => Ok(TypeTag::Object.empty_value()),
            SchemaNode::Union(alternatives) => self.union_property_default(alternatives),
            SchemaNode::Object(_) | SchemaNode::Unrecognized => {
                Ok(TypeTag::Object.empty_value())
            }
        }
    }

    /// First non-null typed alternative; failing that, the first `$ref`
    /// alternative resolved through its definition; failing that, the
    /// object default.
    fn union_property_default(&self, alternatives: &[Value]) -> Result<Value, ResolveError> {
        if let Some(default) = first_typed_default(alternatives) {
            return Ok(default);
        }
        for alternative in alternatives {
            if let SchemaNode::Reference(target) = SchemaNode::classify(alternative) {
                return self.default_value(self.definition(target)?);
            }
        }
        Ok(TypeTag::Object.empty_value())
    }

    /// Merge an inline `allOf` entry (one that is not a `$ref`) into the
    /// accumulator: its properties first-writer-wins, its required names
    /// append-if-absent with defaults computed against this entry.
    fn merge_inline_entry(
        &self,
        set: &mut PropertySet,
        entry: &Value,
    ) -> Result<(), ResolveError> {
        if let Some(props) = entry.get("properties").and_then(Value::as_object) {
            for (name, sub) in props {
                if !set.properties.contains_key(name) {
                    set.properties.insert(name.clone(), sub.clone());
                }
            }
        }
        for name in required_names(entry) {
            if !set.required.iter().any(|r| r == name) {
                set.required.push(name.to_string());
                set.required_defaults.push(self.property_type(name, entry)?);
            }
        }
        Ok(())
    }
}

/// Mapped default of the first `anyOf` alternative carrying a `type` other
/// than the literal `"null"`. First match wins; this is a deliberately
/// simple tie-break, not schema-standard union semantics.
fn first_typed_default(alternatives: &[Value]) -> Option<Value> {
    for alternative in alternatives {
        match alternative.get("type") {
            None => continue,
            Some(Value::String(t)) if t == "null" => continue,
            Some(Value::String(t)) => return Some(TypeTag::parse(t).empty_value()),
            Some(_) => return Some(TypeTag::Object.empty_value()),
        }
    }
    None
}

fn required_names(schema: &Value) -> impl Iterator<Item = &str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

/// Merge a recursively-resolved parent property set into the accumulator.
fn merge_property_set(set: &mut PropertySet, inherited: PropertySet) {
    for (name, sub) in inherited.properties {
        set.properties.entry(name).or_insert(sub);
    }
    for (name, default) in inherited
        .required
        .into_iter()
        .zip(inherited.required_defaults)
    {
        if !set.required.contains(&name) {
            set.required.push(name);
            set.required_defaults.push(default);
        }
    }
}
