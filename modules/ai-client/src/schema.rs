use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Keywords the Gemini `responseSchema` (an OpenAPI 3.0 subset) rejects.
const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "$schema",
    "$id",
    "title",
    "definitions",
    "additionalProperties",
    "default",
    "examples",
];

const SUPPORTED_FORMATS: &[&str] = &["int32", "int64", "float", "double", "enum", "date-time"];

/// Trait for types that can be used as Gemini structured output.
///
/// Automatically implemented for any type that implements `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate a Gemini-compatible response schema for this type.
    ///
    /// Gemini requires:
    /// 1. Fully inlined schemas (no `$ref` references)
    /// 2. Upper-case type names and `nullable` instead of `["T", "null"]` unions
    /// 3. None of the JSON-Schema-only keywords (`title`, `additionalProperties`, ...)
    fn gemini_schema() -> Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        inline_refs(&mut value);
        to_openapi_subset(&mut value);

        value
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

fn inline_refs(value: &mut Value) {
    let definitions = if let Value::Object(map) = value {
        map.get("definitions").cloned()
    } else {
        None
    };

    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(ref_path)) = map.get("$ref").cloned() {
                if let Some(type_name) = ref_path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(type_name) {
                        let description = map.get("description").cloned();
                        *value = def.clone();
                        if let (Some(desc), Value::Object(inlined)) = (description, &mut *value) {
                            inlined.insert("description".to_string(), desc);
                        }
                        inline_refs_recursive(value, definitions);
                        return;
                    }
                }
            }

            if let Some(Value::Array(all_of)) = map.get("allOf").cloned() {
                if all_of.len() == 1 {
                    if let Some(only) = all_of.into_iter().next() {
                        let description = map.get("description").cloned();
                        *value = only;
                        if let (Some(desc), Value::Object(inlined)) = (description, &mut *value) {
                            inlined.insert("description".to_string(), desc);
                        }
                        inline_refs_recursive(value, definitions);
                        return;
                    }
                }
            }

            for (key, v) in map.iter_mut() {
                if key != "definitions" {
                    inline_refs_recursive(v, definitions);
                }
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}

/// Rewrite a single schema node (and its children) into the subset Gemini accepts.
fn to_openapi_subset(value: &mut Value) {
    let Value::Object(map) = value else {
        return;
    };

    for keyword in UNSUPPORTED_KEYWORDS {
        map.remove(*keyword);
    }

    if let Some(Value::String(format)) = map.get("format") {
        if !SUPPORTED_FORMATS.contains(&format.as_str()) {
            map.remove("format");
        }
    }

    // `"type": ["string", "null"]` -> `"type": "STRING", "nullable": true`
    if let Some(Value::Array(types)) = map.get("type").cloned() {
        let non_null: Vec<Value> = types
            .iter()
            .filter(|t| t.as_str() != Some("null"))
            .cloned()
            .collect();
        if non_null.len() < types.len() {
            map.insert("nullable".to_string(), Value::Bool(true));
        }
        if let Some(first) = non_null.into_iter().next() {
            map.insert("type".to_string(), first);
        } else {
            map.remove("type");
        }
    }

    // `anyOf: [X, {"type": "null"}]` -> X with `nullable: true`
    if let Some(Value::Array(any_of)) = map.get("anyOf").cloned() {
        let non_null: Vec<Value> = any_of
            .iter()
            .filter(|s| s.get("type").and_then(Value::as_str) != Some("null"))
            .cloned()
            .collect();
        if non_null.len() == 1 && any_of.len() == 2 {
            let description = map.get("description").cloned();
            let mut replacement = non_null.into_iter().next().unwrap_or_default();
            if let Value::Object(inner) = &mut replacement {
                inner.insert("nullable".to_string(), Value::Bool(true));
                if let Some(desc) = description {
                    inner.entry("description").or_insert(desc);
                }
            }
            *value = replacement;
            to_openapi_subset(value);
            return;
        }
    }

    if let Some(Value::String(type_name)) = map.get("type").cloned() {
        map.insert("type".to_string(), Value::String(type_name.to_uppercase()));
    }

    if let Some(Value::Object(props)) = map.get_mut("properties") {
        for (_, prop) in props.iter_mut() {
            to_openapi_subset(prop);
        }
    }

    if let Some(items) = map.get_mut("items") {
        to_openapi_subset(items);
    }

    for combinator in ["anyOf", "oneOf", "allOf"] {
        if let Some(Value::Array(variants)) = map.get_mut(combinator) {
            for variant in variants.iter_mut() {
                to_openapi_subset(variant);
            }
        }
    }
}
