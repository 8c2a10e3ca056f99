//! Response-shape declarations for structured generation.
//!
//! A [`ResponseSchema`] is derived with `schemars` from the typed struct the
//! answer is decoded into, so the shape sent to the generative service and
//! the shape the client reads back come from one definition. The service
//! does not reliably honor the declaration, so every answer is validated
//! against it again before decoding.

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde_json::{Map, Value};

/// A self-contained JSON Schema for one response type
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema(Value);

impl ResponseSchema {
    /// Derive the schema of `T` with every subschema inlined.
    ///
    /// The result carries no `$ref`/`definitions` and no `$schema` key, which
    /// is what the service accepts as a response declaration.
    pub fn of<T: JsonSchema>() -> Result<Self, serde_json::Error> {
        let settings = SchemaSettings::draft07().with(|s| {
            s.inline_subschemas = true;
            s.meta_schema = None;
        });
        let root = settings.into_generator().into_root_schema_for::<T>();
        serde_json::to_value(root).map(Self)
    }

    /// The declaration as JSON, ready to put on the wire
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Look up a direct property of the root object
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get("properties")?.get(name)
    }

    /// Whether the root object lists `name` as required
    pub fn is_required(&self, name: &str) -> bool {
        required_names(&self.0).contains(&name)
    }

    /// Validate a value, returning the path of every offending field.
    ///
    /// An empty result means the value conforms. Paths look like `cta`,
    /// `hook.text` or `development[2].action`; the root itself is `response`.
    /// A required property that is present but `null` counts as missing.
    pub fn validate(&self, value: &Value) -> Vec<String> {
        let mut errors = Vec::new();
        validate_at(&self.0, value, "", &mut errors);
        errors
    }
}

fn required_names(schema: &Value) -> Vec<&str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn validate_at(schema: &Value, value: &Value, path: &str, errors: &mut Vec<String>) {
    let here = || {
        if path.is_empty() {
            "response".to_string()
        } else {
            path.to_string()
        }
    };

    if !type_matches(schema.get("type"), value) {
        errors.push(here());
        return;
    }

    match value {
        Value::Number(n) => {
            let bound = |key: &str| schema.get(key).and_then(Value::as_f64);
            let in_range = n.as_f64().is_some_and(|x| {
                bound("minimum").map_or(true, |min| x >= min)
                    && bound("maximum").map_or(true, |max| x <= max)
            });
            if !in_range {
                errors.push(here());
            }
        }
        Value::Array(elements) => {
            let len = elements.len() as u64;
            let min = schema.get("minItems").and_then(Value::as_u64).unwrap_or(0);
            let max = schema.get("maxItems").and_then(Value::as_u64);
            if len < min || max.is_some_and(|max| len > max) {
                errors.push(here());
                return;
            }
            if let Some(items) = schema.get("items").filter(|items| items.is_object()) {
                for (i, element) in elements.iter().enumerate() {
                    validate_at(items, element, &format!("{}[{}]", path, i), errors);
                }
            }
        }
        Value::Object(object) => validate_object(schema, object, path, errors),
        _ => {}
    }
}

fn validate_object(schema: &Value, object: &Map<String, Value>, path: &str, errors: &mut Vec<String>) {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return;
    };
    let required = required_names(schema);

    for (name, property) in properties {
        let child_path = if path.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", path, name)
        };
        match object.get(name) {
            None | Some(Value::Null) => {
                if required.contains(&name.as_str()) {
                    errors.push(child_path);
                }
            }
            Some(child) => validate_at(property, child, &child_path, errors),
        }
    }
}

fn type_matches(declared: Option<&Value>, value: &Value) -> bool {
    match declared {
        Some(Value::String(name)) => is_type(name, value),
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .any(|name| is_type(name, value)),
        _ => true,
    }
}

fn is_type(name: &str, value: &Value) -> bool {
    match name {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        _ => true,
    }
}
