// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Polymorphic JSON envelope codec.
//!
//! Every object crossing the client/server boundary carries a reserved
//! discriminator field (`"@type"`) whose value names its concrete type.
//! Decoding resolves that discriminator against a [`TypeResolver`] and
//! produces a [`TypedObject`]; nested tagged objects decode recursively.
//! An unknown discriminator is a hard error -- the server speaks a
//! protocol version the client does not know, and that must never be
//! silently swallowed.

use std::collections::BTreeMap;
use std::fmt;

use crate::object::{ObjectError, TypedObject};
use crate::registry::{RegistryError, TypeResolver};
use crate::value::FieldValue;

/// Reserved discriminator field name.
pub const DISCRIMINATOR_KEY: &str = "@type";

/// Default bound on nested envelope depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

// ---------------------------------------------------------------------------
// EnvelopeError
// ---------------------------------------------------------------------------

/// Errors for envelope encoding/decoding.
#[derive(Debug)]
pub enum EnvelopeError {
    /// The payload is not a JSON object.
    NotAnObject,
    /// The payload carries no discriminator field.
    MissingDiscriminator,
    /// The discriminator field is present but not a string.
    InvalidDiscriminator,
    /// Nesting exceeded the configured bound.
    DepthExceeded { limit: usize },
    /// A field the descriptor does not know about, in strict mode.
    UnexpectedField {
        discriminator: String,
        field: String,
    },
    /// Discriminator resolution failed.
    Registry(RegistryError),
    /// Member-table violation (kind mismatch, marker instantiation, ...).
    Object(ObjectError),
    /// Underlying JSON parse/print failure.
    Json(serde_json::Error),
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "envelope payload is not a JSON object"),
            Self::MissingDiscriminator => {
                write!(f, "envelope carries no discriminator field")
            }
            Self::InvalidDiscriminator => {
                write!(f, "envelope discriminator is not a string")
            }
            Self::DepthExceeded { limit } => {
                write!(f, "envelope nesting exceeds {} levels", limit)
            }
            Self::UnexpectedField {
                discriminator,
                field,
            } => write!(f, "{} does not declare field '{}'", discriminator, field),
            Self::Registry(e) => write!(f, "{}", e),
            Self::Object(e) => write!(f, "{}", e),
            Self::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for EnvelopeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Registry(e) => Some(e),
            Self::Object(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RegistryError> for EnvelopeError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

impl From<ObjectError> for EnvelopeError {
    fn from(e: ObjectError) -> Self {
        Self::Object(e)
    }
}

impl From<serde_json::Error> for EnvelopeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// ---------------------------------------------------------------------------
// EnvelopeConfig
// ---------------------------------------------------------------------------

/// Envelope codec configuration.
#[derive(Debug, Clone)]
pub struct EnvelopeConfig {
    /// Reserved discriminator field name.
    pub discriminator_key: String,

    /// Maximum nested envelope depth.
    pub max_depth: usize,

    /// Retain fields the descriptor does not declare (default: true --
    /// the server may be newer than the client).  When false, an unknown
    /// field fails the decode.
    pub keep_unknown_fields: bool,

    /// Reject values that violate a member's declared kind (default:
    /// true).  When false, mismatches are kept and logged.
    pub strict_kinds: bool,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            discriminator_key: DISCRIMINATOR_KEY.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            keep_unknown_fields: true,
            strict_kinds: true,
        }
    }
}

impl EnvelopeConfig {
    /// Create a new config builder.
    pub fn builder() -> EnvelopeConfigBuilder {
        EnvelopeConfigBuilder::default()
    }
}

/// Config builder for fluent API.
#[derive(Debug, Default)]
pub struct EnvelopeConfigBuilder {
    discriminator_key: Option<String>,
    max_depth: Option<usize>,
    keep_unknown_fields: Option<bool>,
    strict_kinds: Option<bool>,
}

impl EnvelopeConfigBuilder {
    /// Set the reserved discriminator field name.
    pub fn discriminator_key(mut self, key: impl Into<String>) -> Self {
        self.discriminator_key = Some(key.into());
        self
    }

    /// Set the maximum nested envelope depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Retain (true) or reject (false) undeclared fields.
    pub fn keep_unknown_fields(mut self, keep: bool) -> Self {
        self.keep_unknown_fields = Some(keep);
        self
    }

    /// Reject (true) or keep-and-log (false) kind violations.
    pub fn strict_kinds(mut self, strict: bool) -> Self {
        self.strict_kinds = Some(strict);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> EnvelopeConfig {
        let defaults = EnvelopeConfig::default();
        EnvelopeConfig {
            discriminator_key: self
                .discriminator_key
                .unwrap_or(defaults.discriminator_key),
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            keep_unknown_fields: self
                .keep_unknown_fields
                .unwrap_or(defaults.keep_unknown_fields),
            strict_kinds: self.strict_kinds.unwrap_or(defaults.strict_kinds),
        }
    }
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Decode a tagged JSON value into a [`TypedObject`].
pub fn decode<R: TypeResolver>(
    resolver: &R,
    value: &serde_json::Value,
    config: &EnvelopeConfig,
) -> Result<TypedObject, EnvelopeError> {
    decode_at(resolver, value, config, 0)
}

/// Decode a tagged JSON string into a [`TypedObject`].
pub fn decode_str<R: TypeResolver>(
    resolver: &R,
    json: &str,
    config: &EnvelopeConfig,
) -> Result<TypedObject, EnvelopeError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    decode(resolver, &value, config)
}

fn decode_at<R: TypeResolver>(
    resolver: &R,
    value: &serde_json::Value,
    config: &EnvelopeConfig,
    depth: usize,
) -> Result<TypedObject, EnvelopeError> {
    if depth >= config.max_depth {
        return Err(EnvelopeError::DepthExceeded {
            limit: config.max_depth,
        });
    }

    let map = value.as_object().ok_or(EnvelopeError::NotAnObject)?;
    let discriminator = match map.get(&config.discriminator_key) {
        None => return Err(EnvelopeError::MissingDiscriminator),
        Some(serde_json::Value::String(s)) => s.as_str(),
        Some(_) => return Err(EnvelopeError::InvalidDiscriminator),
    };

    let descriptor = resolver.resolve(discriminator)?;
    if !descriptor.is_concrete() {
        return Err(ObjectError::NotConcrete(descriptor.discriminator.clone()).into());
    }

    let mut values: BTreeMap<String, FieldValue> = BTreeMap::new();
    let mut extra = serde_json::Map::new();

    for (key, raw) in map {
        if *key == config.discriminator_key {
            continue;
        }
        match descriptor.member(key) {
            Some(member) if member.implemented => {
                let field = decode_field(resolver, raw, config, depth)?;
                if !member.kind.accepts(&field) {
                    if config.strict_kinds {
                        return Err(ObjectError::KindMismatch {
                            member: member.name.clone(),
                            expected: member.kind,
                        }
                        .into());
                    }
                    log::warn!(
                        "[envelope] {}.{} violates declared kind {:?}, keeping value",
                        discriminator,
                        key,
                        member.kind
                    );
                }
                values.insert(member.name.clone(), field);
            }
            Some(member) => {
                // Data arrived for a member the client only knows as a
                // marker declaration; keep it reachable via raw().
                log::debug!(
                    "[envelope] {}.{} is declared-only ({}), retaining raw",
                    discriminator,
                    key,
                    member.declared_by
                );
                extra.insert(key.clone(), raw.clone());
            }
            None => {
                if !config.keep_unknown_fields {
                    return Err(EnvelopeError::UnexpectedField {
                        discriminator: discriminator.to_string(),
                        field: key.clone(),
                    });
                }
                log::debug!(
                    "[envelope] {} carries undeclared field '{}', retaining raw",
                    discriminator,
                    key
                );
                extra.insert(key.clone(), raw.clone());
            }
        }
    }

    // Members the payload omitted are present with their defaults, the
    // same as a fresh instance.
    for member in descriptor.implemented_members() {
        if !values.contains_key(&member.name) {
            let value = match &member.default {
                Some(json) => FieldValue::from_json(json.clone()),
                None => FieldValue::Null,
            };
            values.insert(member.name.clone(), value);
        }
    }

    Ok(TypedObject::from_parts(descriptor, values, extra))
}

/// Decode a single field value, recursing into tagged objects and lists.
fn decode_field<R: TypeResolver>(
    resolver: &R,
    raw: &serde_json::Value,
    config: &EnvelopeConfig,
    depth: usize,
) -> Result<FieldValue, EnvelopeError> {
    match raw {
        serde_json::Value::Object(map) if map.contains_key(&config.discriminator_key) => {
            let nested = decode_at(resolver, raw, config, depth + 1)?;
            Ok(FieldValue::Object(Box::new(nested)))
        }
        serde_json::Value::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                list.push(decode_field(resolver, item, config, depth)?);
            }
            Ok(FieldValue::List(list))
        }
        other => Ok(FieldValue::from_json(other.clone())),
    }
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Encode a [`TypedObject`] into a tagged JSON value.
///
/// The discriminator field is always emitted; retained unknown fields are
/// written back so decode/encode round-trips are lossless.
pub fn encode(object: &TypedObject, config: &EnvelopeConfig) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    map.insert(
        config.discriminator_key.clone(),
        serde_json::Value::String(object.discriminator().to_string()),
    );
    for (name, value) in object.iter() {
        map.insert(name.to_string(), field_to_json(value, config));
    }
    for (name, value) in object.raw_fields() {
        map.insert(name.clone(), value.clone());
    }
    serde_json::Value::Object(map)
}

/// Encode a [`TypedObject`] into a tagged JSON string.
pub fn encode_string(
    object: &TypedObject,
    config: &EnvelopeConfig,
) -> Result<String, EnvelopeError> {
    Ok(serde_json::to_string(&encode(object, config))?)
}

fn field_to_json(value: &FieldValue, config: &EnvelopeConfig) -> serde_json::Value {
    match value {
        FieldValue::Null => serde_json::Value::Null,
        FieldValue::Bool(b) => serde_json::Value::Bool(*b),
        FieldValue::Integer(i) => serde_json::Value::Number((*i).into()),
        FieldValue::Float(x) => serde_json::Number::from_f64(*x)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        FieldValue::Text(s) => serde_json::Value::String(s.clone()),
        FieldValue::List(items) => serde_json::Value::Array(
            items.iter().map(|v| field_to_json(v, config)).collect(),
        ),
        FieldValue::Object(obj) => encode(obj, config),
        FieldValue::Raw(map) => serde_json::Value::Object(map.clone()),
    }
}
