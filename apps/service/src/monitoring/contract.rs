//! Response-contract validation.
//!
//! A contract is a tree of field descriptors: leaves name a primitive kind,
//! interior nodes are nested field maps. The wire form is a JSON object whose
//! leaf values are the tags `"str" | "int" | "float" | "bool"`; it round-trips
//! through the endpoint's persisted configuration unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Recursion limit for validation. Descriptors are operator-supplied, but a
/// pathological one must fail the check rather than blow the stack.
const MAX_DEPTH: usize = 64;

/// Primitive kind a leaf field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Str,
    Int,
    Float,
    Bool,
}

/// One node of the descriptor tree: either a leaf primitive tag or a nested
/// field map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaNode {
    Field(FieldType),
    Object(BTreeMap<String, SchemaNode>),
}

/// Top-level contract: field name to descriptor.
pub type Schema = BTreeMap<String, SchemaNode>;

/// Check `value` against `schema`.
///
/// Every declared field is required, at every depth. Fields present in the
/// value but not declared are ignored. Primitive kinds match exactly: an
/// integer does not satisfy `float`, a bool does not satisfy `int`, and no
/// string/number coercion happens. Total over arbitrary JSON input.
pub fn validate(value: &Value, schema: &Schema) -> bool {
    validate_object(value, schema, 0)
}

fn validate_object(value: &Value, schema: &Schema, depth: usize) -> bool {
    if depth >= MAX_DEPTH {
        return false;
    }

    let Value::Object(fields) = value else {
        return false;
    };

    schema.iter().all(|(name, node)| match (fields.get(name), node) {
        (None, _) => false,
        (Some(nested), SchemaNode::Object(subschema)) => {
            validate_object(nested, subschema, depth + 1)
        }
        (Some(leaf), SchemaNode::Field(kind)) => matches_kind(leaf, *kind),
    })
}

fn matches_kind(value: &Value, kind: FieldType) -> bool {
    match kind {
        FieldType::Str => value.is_string(),
        // serde_json keeps integers and floats distinct; no widening across them
        FieldType::Int => value.is_i64() || value.is_u64(),
        FieldType::Float => value.is_f64(),
        FieldType::Bool => value.is_boolean(),
    }
}
