// crates/vault-contract-core/src/schema.rs
// ============================================================================
// Module: Structural Schema Validation
// Description: Declarative response contracts and their validator.
// Purpose: Check response bodies field-by-field and report every violation.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`SchemaContract`] describes the expected shape of a response body as a
//! tree of [`Shape`] nodes. Objects are open-world unless marked `closed`.
//! Validation is pure and total: it walks the whole value and reports every
//! violation found, stopping descent only below a type mismatch.
//!
//! Contracts can be rendered as JSON Schema documents via
//! [`SchemaContract::to_json_schema`] for consumption by external tooling.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::error::HarnessError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// JSON Schema dialect emitted by [`SchemaContract::to_json_schema`].
pub const JSON_SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

// ============================================================================
// SECTION: Contract Types
// ============================================================================

/// Expected shape of a JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// JSON string.
    String,
    /// JSON number without a fractional part.
    Integer,
    /// Any JSON number.
    Number,
    /// JSON boolean.
    Boolean,
    /// JSON null.
    Null,
    /// Any value, including null.
    Any,
    /// Array whose every element matches `items`.
    Array {
        /// Element shape.
        items: Box<Shape>,
    },
    /// Object with declared fields.
    Object(ObjectContract),
    /// Either `null` or the inner shape.
    Nullable {
        /// Shape accepted when the value is not null.
        inner: Box<Shape>,
    },
}

impl Shape {
    /// Array of `items`.
    #[must_use]
    pub fn array(items: Self) -> Self {
        Self::Array {
            items: Box::new(items),
        }
    }

    /// Null or `inner`.
    #[must_use]
    pub fn nullable(inner: Self) -> Self {
        Self::Nullable {
            inner: Box::new(inner),
        }
    }

    /// Stable type label used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Any => "any",
            Self::Array {
                ..
            } => "array",
            Self::Object(_) => "object",
            Self::Nullable {
                ..
            } => "nullable",
        }
    }

    /// Renders the shape as a JSON Schema fragment.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        match self {
            Self::String => json!({"type": "string"}),
            Self::Integer => json!({"type": "integer"}),
            Self::Number => json!({"type": "number"}),
            Self::Boolean => json!({"type": "boolean"}),
            Self::Null => json!({"type": "null"}),
            Self::Any => json!({}),
            Self::Array {
                items,
            } => json!({"type": "array", "items": items.to_json_schema()}),
            Self::Object(object) => object.to_json_schema(),
            Self::Nullable {
                inner,
            } => json!({"anyOf": [inner.to_json_schema(), {"type": "null"}]}),
        }
    }
}

/// Object contract: declared fields plus the open/closed policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectContract {
    /// Declared fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldContract>,
    /// Rejects undeclared fields when true.
    #[serde(default)]
    pub closed: bool,
}

impl ObjectContract {
    /// Empty open object contract.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required field.
    #[must_use]
    pub fn required(mut self, name: &str, shape: Shape) -> Self {
        self.fields.push(FieldContract {
            name: name.to_string(),
            shape,
            required: true,
        });
        self
    }

    /// Adds an optional field.
    #[must_use]
    pub fn optional(mut self, name: &str, shape: Shape) -> Self {
        self.fields.push(FieldContract {
            name: name.to_string(),
            shape,
            required: false,
        });
        self
    }

    /// Marks the object closed-world.
    #[must_use]
    pub const fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    /// Wraps the contract as a [`Shape`].
    #[must_use]
    pub fn into_shape(self) -> Shape {
        Shape::Object(self)
    }

    /// Renders the object as a JSON Schema node.
    fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &self.fields {
            properties.insert(field.name.clone(), field.shape.to_json_schema());
            if field.required {
                required.push(Value::String(field.name.clone()));
            }
        }
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert("required".to_string(), Value::Array(required));
        if self.closed {
            schema.insert("additionalProperties".to_string(), Value::Bool(false));
        }
        Value::Object(schema)
    }
}

/// Single declared object field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldContract {
    /// Field name.
    pub name: String,
    /// Expected field shape.
    pub shape: Shape,
    /// Whether the field must be present.
    #[serde(default = "default_required")]
    pub required: bool,
}

/// Fields are required unless stated otherwise.
const fn default_required() -> bool {
    true
}

/// Named structural contract for one endpoint + outcome pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaContract {
    /// Contract identifier.
    pub id: String,
    /// Shape of the whole body.
    pub root: Shape,
}

impl SchemaContract {
    /// Creates a contract.
    #[must_use]
    pub fn new(id: &str, root: Shape) -> Self {
        Self {
            id: id.to_string(),
            root,
        }
    }

    /// Validates a value against this contract.
    #[must_use]
    pub fn validate(&self, value: &Value) -> ValidationReport {
        validate(value, self)
    }

    /// Validates and converts a failing report into an error.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::SchemaViolation`] listing every violation.
    pub fn enforce(&self, value: &Value) -> Result<(), HarnessError> {
        let report = self.validate(value);
        if report.valid {
            return Ok(());
        }
        Err(HarnessError::SchemaViolation {
            contract: self.id.clone(),
            diagnostics: report.errors,
        })
    }

    /// Renders the contract as a standalone JSON Schema document.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut schema = match self.root.to_json_schema() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        schema.insert("$schema".to_string(), json!(JSON_SCHEMA_DIALECT));
        schema.insert("title".to_string(), json!(self.id));
        Value::Object(schema)
    }
}

// ============================================================================
// SECTION: Diagnostics
// ============================================================================

/// Violation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Required field absent.
    MissingField,
    /// Value has the wrong JSON type.
    TypeMismatch,
    /// Field not declared by a closed object contract.
    UnexpectedField,
}

/// Single validation violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// JSON pointer to the offending location (empty for the root).
    pub path: String,
    /// Violation category.
    pub kind: DiagnosticKind,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { self.path.as_str() };
        write!(f, "{path}: {}", self.message)
    }
}

/// Validation outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when no violation was found.
    pub valid: bool,
    /// Every violation found.
    pub errors: Vec<Diagnostic>,
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates `value` against `contract`.
#[must_use]
pub fn validate(value: &Value, contract: &SchemaContract) -> ValidationReport {
    let mut errors = Vec::new();
    check(value, &contract.root, "", &mut errors);
    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Checks `value` against `shape`, appending diagnostics under `path`.
fn check(value: &Value, shape: &Shape, path: &str, errors: &mut Vec<Diagnostic>) {
    match (shape, value) {
        (Shape::Any, _)
        | (Shape::String, Value::String(_))
        | (Shape::Boolean, Value::Bool(_))
        | (Shape::Null, Value::Null)
        | (Shape::Number, Value::Number(_))
        | (Shape::Nullable { .. }, Value::Null) => {}
        (Shape::Integer, Value::Number(number)) if is_integral(number) => {}
        (Shape::Nullable { inner }, other) => check(other, inner, path, errors),
        (Shape::Array { items }, Value::Array(elements)) => {
            for (index, element) in elements.iter().enumerate() {
                check(element, items, &format!("{path}/{index}"), errors);
            }
        }
        (Shape::Object(object), Value::Object(map)) => check_object(map, object, path, errors),
        (expected, found) => errors.push(Diagnostic {
            path: path.to_string(),
            kind: DiagnosticKind::TypeMismatch,
            message: format!("expected {}, found {}", expected.type_name(), value_type(found)),
        }),
    }
}

/// Integral per JSON Schema: `7.0` is an integer, `7.5` is not.
#[allow(clippy::float_cmp, reason = "Exact zero fraction is the integer test.")]
fn is_integral(number: &serde_json::Number) -> bool {
    number.is_i64()
        || number.is_u64()
        || number.as_f64().is_some_and(|float| float.is_finite() && float.fract() == 0.0)
}

/// Checks declared fields and, when closed, rejects undeclared ones.
fn check_object(
    map: &Map<String, Value>,
    object: &ObjectContract,
    path: &str,
    errors: &mut Vec<Diagnostic>,
) {
    for field in &object.fields {
        let field_path = format!("{path}/{}", escape_pointer(&field.name));
        match map.get(&field.name) {
            Some(value) => check(value, &field.shape, &field_path, errors),
            None if field.required => errors.push(Diagnostic {
                path: field_path,
                kind: DiagnosticKind::MissingField,
                message: format!("missing required field {}", field.name),
            }),
            None => {}
        }
    }
    if object.closed {
        for name in map.keys() {
            if object.fields.iter().all(|field| &field.name != name) {
                errors.push(Diagnostic {
                    path: format!("{path}/{}", escape_pointer(name)),
                    kind: DiagnosticKind::UnexpectedField,
                    message: format!("field {name} is not declared"),
                });
            }
        }
    }
}

/// JSON type label of a value.
const fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Escapes a key for use inside a JSON pointer (RFC 6901).
fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::use_debug, reason = "Test assertions render values with Debug.")]

    use serde_json::json;

    use super::DiagnosticKind;
    use super::ObjectContract;
    use super::SchemaContract;
    use super::Shape;

    fn file_contract() -> SchemaContract {
        SchemaContract::new(
            "files",
            Shape::array(
                ObjectContract::new()
                    .required("id", Shape::String)
                    .required("size", Shape::Integer)
                    .optional("label", Shape::nullable(Shape::String))
                    .into_shape(),
            ),
        )
    }

    #[test]
    fn accepts_conforming_value_and_ignores_extra_fields() {
        let report = file_contract().validate(&json!([
            {"id": "a", "size": 3, "extra": true},
            {"id": "b", "size": 0, "label": null}
        ]));
        assert!(report.valid, "{:?}", report.errors);
    }

    #[test]
    fn single_bad_element_fails_array_and_every_violation_is_reported() {
        let report = file_contract().validate(&json!([
            {"id": "a", "size": 1},
            {"size": "big"},
        ]));
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].path, "/1/id");
        assert_eq!(report.errors[0].kind, DiagnosticKind::MissingField);
        assert_eq!(report.errors[1].path, "/1/size");
        assert_eq!(report.errors[1].kind, DiagnosticKind::TypeMismatch);
    }

    #[test]
    fn closed_objects_reject_undeclared_fields() {
        let contract = SchemaContract::new(
            "closed",
            ObjectContract::new().required("a/b", Shape::Boolean).closed().into_shape(),
        );
        let report = contract.validate(&json!({"a/b": true, "c~": 1}));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, "/c~0");
        assert_eq!(report.errors[0].kind, DiagnosticKind::UnexpectedField);
    }

    #[test]
    fn integer_rejects_fractions() {
        let contract = SchemaContract::new("int", Shape::Integer);
        assert!(contract.validate(&json!(7)).valid);
        assert!(!contract.validate(&json!(7.5)).valid);
    }

    #[test]
    fn integer_accepts_integral_floats() {
        let contract = SchemaContract::new("int", Shape::Integer);
        assert!(contract.validate(&json!(7.0)).valid);
        assert!(contract.validate(&json!(-2048.0)).valid);
    }

    #[test]
    fn root_type_mismatch_stops_descent() {
        let report = file_contract().validate(&json!({"id": "a"}));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, "");
        assert_eq!(report.errors[0].to_string(), "/: expected array, found object");
    }

    #[test]
    fn contracts_deserialize_from_tagged_json() {
        let contract: Result<SchemaContract, _> = serde_json::from_value(json!({
            "id": "login_success",
            "root": {
                "type": "object",
                "fields": [{"name": "token", "shape": {"type": "string"}}]
            }
        }));
        let Ok(contract) = contract else {
            panic!("contract did not deserialize");
        };
        assert!(contract.validate(&json!({"token": "t"})).valid);
        assert!(!contract.validate(&json!({})).valid);
    }
}
