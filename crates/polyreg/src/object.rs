// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed-object container with validated member access.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::descriptor::{MemberKind, MemberSpec, TypeDescriptor};
use crate::value::FieldValue;

const NULL: &FieldValue = &FieldValue::Null;

// ---------------------------------------------------------------------------
// ObjectError
// ---------------------------------------------------------------------------

/// Errors for typed-object operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectError {
    /// The member is not part of the type's merged member table.
    UnknownMember {
        discriminator: String,
        member: String,
    },
    /// The member is declared by a capability marker with no concrete
    /// implementation.  This signals a programming/contract error, not a
    /// data error.
    UnsupportedCapability {
        discriminator: String,
        member: String,
        declared_by: String,
    },
    /// The value does not satisfy the member's declared kind.
    KindMismatch {
        member: String,
        expected: MemberKind,
    },
    /// Capability tags are never instantiated.
    NotConcrete(String),
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMember {
                discriminator,
                member,
            } => write!(f, "{} has no member '{}'", discriminator, member),
            Self::UnsupportedCapability {
                discriminator,
                member,
                declared_by,
            } => write!(
                f,
                "member '{}' on {} is declared by {} without an implementation",
                member, discriminator, declared_by
            ),
            Self::KindMismatch { member, expected } => {
                write!(f, "member '{}' requires a {:?} value", member, expected)
            }
            Self::NotConcrete(disc) => {
                write!(f, "{} is a capability tag and cannot be instantiated", disc)
            }
        }
    }
}

impl std::error::Error for ObjectError {}

// ---------------------------------------------------------------------------
// TypedObject
// ---------------------------------------------------------------------------

/// An instance of a registered concrete type.
///
/// Holds a value for every implemented member of its descriptor.  Fields
/// the server sent that the descriptor does not know about are retained
/// separately (see [`TypedObject::raw`]) so envelopes round-trip against
/// newer servers.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedObject {
    descriptor: Arc<TypeDescriptor>,
    values: BTreeMap<String, FieldValue>,
    extra: serde_json::Map<String, serde_json::Value>,
}

impl TypedObject {
    /// Instantiate a fresh object with declared defaults.
    ///
    /// This is the factory step: every implemented member is populated
    /// with its default, or `Null` when none is declared.
    pub fn new(descriptor: &Arc<TypeDescriptor>) -> Result<Self, ObjectError> {
        if !descriptor.is_concrete() {
            return Err(ObjectError::NotConcrete(descriptor.discriminator.clone()));
        }
        let mut values = BTreeMap::new();
        for member in descriptor.implemented_members() {
            let value = match &member.default {
                Some(json) => FieldValue::from_json(json.clone()),
                None => FieldValue::Null,
            };
            values.insert(member.name.clone(), value);
        }
        Ok(Self {
            descriptor: descriptor.clone(),
            values,
            extra: serde_json::Map::new(),
        })
    }

    /// Reassemble an object from decoded parts (envelope codec only).
    pub(crate) fn from_parts(
        descriptor: Arc<TypeDescriptor>,
        values: BTreeMap<String, FieldValue>,
        extra: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            descriptor,
            values,
            extra,
        }
    }

    /// The type descriptor.
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// The wire discriminator.
    pub fn discriminator(&self) -> &str {
        &self.descriptor.discriminator
    }

    /// Get a member value.
    ///
    /// Fails with `UnknownMember` for names outside the member table and
    /// with `UnsupportedCapability` for members declared only by a marker.
    pub fn get(&self, name: &str) -> Result<&FieldValue, ObjectError> {
        let member = self.checked_member(name)?;
        Ok(self.values.get(&member.name).unwrap_or(NULL))
    }

    /// Set a member value.  The value must satisfy the member's kind.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), ObjectError> {
        let member = self.checked_member(name)?;
        let value = value.into();
        if !member.kind.accepts(&value) {
            return Err(ObjectError::KindMismatch {
                member: member.name.clone(),
                expected: member.kind,
            });
        }
        let name = member.name.clone();
        self.values.insert(name, value);
        Ok(())
    }

    /// Retained field the descriptor does not know about, if any.
    pub fn raw(&self, name: &str) -> Option<&serde_json::Value> {
        self.extra.get(name)
    }

    /// All retained unknown fields.
    pub fn raw_fields(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.extra
    }

    /// Iterate implemented member values in member-table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.descriptor
            .members
            .iter()
            .filter(|m| m.implemented)
            .map(move |m| {
                (
                    m.name.as_str(),
                    self.values.get(&m.name).unwrap_or(NULL),
                )
            })
    }

    fn checked_member(&self, name: &str) -> Result<&MemberSpec, ObjectError> {
        let member = self.descriptor.member(name).ok_or_else(|| {
            ObjectError::UnknownMember {
                discriminator: self.descriptor.discriminator.clone(),
                member: name.to_string(),
            }
        })?;
        if !member.implemented {
            return Err(ObjectError::UnsupportedCapability {
                discriminator: self.descriptor.discriminator.clone(),
                member: member.name.clone(),
                declared_by: member.declared_by.clone(),
            });
        }
        Ok(member)
    }
}
