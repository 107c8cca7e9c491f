//! condition decoder - converts JSON to condition trees and back
//!
//! dispatch order for a node, first match wins:
//! - non-empty `and` array
//! - non-empty `or` array
//! - single property leaf (`property` + `operator`, optional `value`)
//!
//! the service does not reject objects that carry both an array and leaf fields,
//! so neither do we; the array always takes precedence.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

use super::types::{Operator, RuleCondition, RuleRequiredConfig, SingleProperty};

/// error type for decoding condition trees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub message: String,
    pub path: String,
}

impl DecodeError {
    pub fn new(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: path.into(),
        }
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for DecodeError {}

/// decode a JSON value into a [`RuleCondition`]
pub fn decode_condition(json: &JsonValue) -> Result<RuleCondition, DecodeError> {
    decode_condition_at(json, "")
}

/// decode a JSON value into a [`RuleRequiredConfig`]
pub fn decode_required_config(json: &JsonValue) -> Result<RuleRequiredConfig, DecodeError> {
    let obj = expect_object(json, "")?;

    if let Some(items) = non_empty_array(obj, "and", "")? {
        let conditions = decode_items(items, "and", "", decode_condition_at)?;
        return Ok(RuleRequiredConfig::And {
            description: optional_string(obj, "description", "")?,
            conditions,
        });
    }
    if let Some(items) = non_empty_array(obj, "or", "")? {
        let conditions = decode_items(items, "or", "", decode_condition_at)?;
        return Ok(RuleRequiredConfig::Or {
            description: optional_string(obj, "description", "")?,
            conditions,
        });
    }

    decode_leaf(obj, "").map(RuleRequiredConfig::Single)
}

/// decode a JSON value into a [`SingleProperty`]
pub fn decode_single_property(json: &JsonValue) -> Result<SingleProperty, DecodeError> {
    decode_single_at(json, "")
}

fn decode_condition_at(json: &JsonValue, path: &str) -> Result<RuleCondition, DecodeError> {
    let obj = expect_object(json, path)?;

    if let Some(items) = non_empty_array(obj, "and", path)? {
        let conditions = decode_items(items, "and", path, decode_single_at)?;
        return Ok(RuleCondition::And {
            description: optional_string(obj, "description", path)?,
            conditions,
        });
    }
    if let Some(items) = non_empty_array(obj, "or", path)? {
        let conditions = decode_items(items, "or", path, decode_single_at)?;
        return Ok(RuleCondition::Or {
            description: optional_string(obj, "description", path)?,
            conditions,
        });
    }

    decode_leaf(obj, path).map(RuleCondition::Single)
}

fn decode_single_at(json: &JsonValue, path: &str) -> Result<SingleProperty, DecodeError> {
    let obj = expect_object(json, path)?;
    decode_leaf(obj, path)
}

fn decode_items<T>(
    items: &[JsonValue],
    key: &str,
    path: &str,
    decode: fn(&JsonValue, &str) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    items
        .iter()
        .enumerate()
        .map(|(i, v)| decode(v, &format!("{}[{}]", join(path, key), i)))
        .collect()
}

fn decode_leaf(obj: &Map<String, JsonValue>, path: &str) -> Result<SingleProperty, DecodeError> {
    let property = optional_string(obj, "property", path)?
        .ok_or_else(|| DecodeError::new("missing required field 'property'", path))?;

    let operator_str = optional_string(obj, "operator", path)?
        .ok_or_else(|| DecodeError::new("missing required field 'operator'", path))?;
    let operator = Operator::parse(&operator_str).ok_or_else(|| {
        DecodeError::new(
            format!("unknown operator: '{}'", operator_str),
            join(path, "operator"),
        )
    })?;

    Ok(SingleProperty {
        description: optional_string(obj, "description", path)?,
        property,
        operator,
        value: optional_string(obj, "value", path)?,
    })
}

fn expect_object<'a>(
    json: &'a JsonValue,
    path: &str,
) -> Result<&'a Map<String, JsonValue>, DecodeError> {
    json.as_object()
        .ok_or_else(|| DecodeError::new(format!("expected object, got {}", kind(json)), path))
}

/// `None` when the key is absent, null or an empty array
fn non_empty_array<'a>(
    obj: &'a Map<String, JsonValue>,
    key: &str,
    path: &str,
) -> Result<Option<&'a Vec<JsonValue>>, DecodeError> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Array(items)) if items.is_empty() => Ok(None),
        Some(JsonValue::Array(items)) => Ok(Some(items)),
        Some(other) => Err(DecodeError::new(
            format!("'{}' must be an array, got {}", key, kind(other)),
            path,
        )),
    }
}

fn optional_string(
    obj: &Map<String, JsonValue>,
    key: &str,
    path: &str,
) -> Result<Option<String>, DecodeError> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(DecodeError::new(
            format!("expected string, got {}", kind(other)),
            join(path, key),
        )),
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// encode a single property; absent optionals are left out, never null
pub fn encode_single_property(p: &SingleProperty) -> JsonValue {
    let mut obj = Map::new();
    if let Some(description) = &p.description {
        obj.insert("description".into(), JsonValue::String(description.clone()));
    }
    obj.insert("property".into(), JsonValue::String(p.property.clone()));
    obj.insert(
        "operator".into(),
        JsonValue::String(p.operator.as_str().to_string()),
    );
    if let Some(value) = &p.value {
        obj.insert("value".into(), JsonValue::String(value.clone()));
    }
    JsonValue::Object(obj)
}

pub fn encode_condition(c: &RuleCondition) -> JsonValue {
    match c {
        RuleCondition::Single(p) => encode_single_property(p),
        RuleCondition::Or {
            description,
            conditions,
        } => encode_group(
            "or",
            description,
            conditions.iter().map(encode_single_property),
        ),
        RuleCondition::And {
            description,
            conditions,
        } => encode_group(
            "and",
            description,
            conditions.iter().map(encode_single_property),
        ),
    }
}

pub fn encode_required_config(c: &RuleRequiredConfig) -> JsonValue {
    match c {
        RuleRequiredConfig::Single(p) => encode_single_property(p),
        RuleRequiredConfig::Or {
            description,
            conditions,
        } => encode_group("or", description, conditions.iter().map(encode_condition)),
        RuleRequiredConfig::And {
            description,
            conditions,
        } => encode_group("and", description, conditions.iter().map(encode_condition)),
    }
}

fn encode_group(
    key: &str,
    description: &Option<String>,
    children: impl Iterator<Item = JsonValue>,
) -> JsonValue {
    let mut obj = Map::new();
    if let Some(description) = description {
        obj.insert("description".into(), JsonValue::String(description.clone()));
    }
    obj.insert(key.into(), JsonValue::Array(children.collect()));
    JsonValue::Object(obj)
}

impl Serialize for SingleProperty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode_single_property(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SingleProperty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        decode_single_property(&json).map_err(D::Error::custom)
    }
}

impl Serialize for RuleCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode_condition(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RuleCondition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        decode_condition(&json).map_err(D::Error::custom)
    }
}

impl Serialize for RuleRequiredConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode_required_config(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RuleRequiredConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        decode_required_config(&json).map_err(D::Error::custom)
    }
}
