// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Immutable per-type descriptors for wire-level polymorphic objects.
//!
//! A [`TypeDescriptor`] is built once (see [`crate::builder::TypeBuilder`])
//! and never mutated afterwards: its member table is the result of merging,
//! in order, the superclass table, each capability tag's table, and the
//! type's own overrides.  Later layers always win.

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

// ---------------------------------------------------------------------------
// TypeRole
// ---------------------------------------------------------------------------

/// Role of a registered type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRole {
    /// Instantiable type; the wire emits its discriminator.
    Concrete,
    /// Capability tag (marker interface), queried via is-a checks.
    /// May carry default members; never instantiated directly.
    Capability,
}

// ---------------------------------------------------------------------------
// MemberKind
// ---------------------------------------------------------------------------

/// Shape a member's decoded value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberKind {
    Bool,
    Integer,
    Float,
    Text,
    /// A nested tagged object or an untagged JSON map.
    Object,
    List,
    /// No shape constraint.
    Any,
}

impl MemberKind {
    /// Check whether a field value satisfies this kind.
    ///
    /// `Null` is accepted by every kind: the wire omits or nulls absent
    /// sub-objects, and absence is not a shape violation.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        if value.is_null() {
            return true;
        }
        match self {
            Self::Bool => matches!(value, FieldValue::Bool(_)),
            Self::Integer => matches!(value, FieldValue::Integer(_)),
            Self::Float => matches!(value, FieldValue::Float(_) | FieldValue::Integer(_)),
            Self::Text => matches!(value, FieldValue::Text(_)),
            Self::Object => matches!(value, FieldValue::Object(_) | FieldValue::Raw(_)),
            Self::List => matches!(value, FieldValue::List(_)),
            Self::Any => true,
        }
    }
}

// ---------------------------------------------------------------------------
// MemberSpec
// ---------------------------------------------------------------------------

/// A single entry in a type's merged member table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSpec {
    /// Member name as it appears on the wire.
    pub name: String,
    /// Shape constraint for decoded values.
    pub kind: MemberKind,
    /// Discriminator of the type that contributed the winning definition.
    /// Stamped by the builder; preserved when a member is inherited.
    pub declared_by: String,
    /// `false` for members declared by a capability marker with no
    /// concrete implementation.  Reading such a member from an instance
    /// is a contract error, not a data error.
    pub implemented: bool,
    /// Initial value for fresh instances.
    pub default: Option<serde_json::Value>,
}

impl MemberSpec {
    /// Create an implemented member with the given kind.
    pub fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
            declared_by: String::new(),
            implemented: true,
            default: None,
        }
    }

    /// Text member.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Text)
    }

    /// Integer member.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Integer)
    }

    /// Boolean member.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Bool)
    }

    /// Nested-object member.
    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Object)
    }

    /// List member.
    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::List)
    }

    /// Set the default value for fresh instances.
    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Mark as declared-only (no concrete implementation).
    pub fn declared_only(mut self) -> Self {
        self.implemented = false;
        self
    }
}

// ---------------------------------------------------------------------------
// TypeDescriptor
// ---------------------------------------------------------------------------

/// Complete description of one registered wire type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Dotted namespace-qualified wire name (the `@type` value).
    pub discriminator: String,
    /// Concrete type or capability tag.
    pub role: TypeRole,
    /// Discriminator of the single emulated superclass, if any.
    pub superclass: Option<String>,
    /// Discriminators of directly-implemented capability tags, in
    /// declaration order.
    pub capabilities: Vec<String>,
    /// Merged member table.  First-definition position is retained on
    /// override, so ordering is stable across layers.
    pub members: Vec<MemberSpec>,
}

impl TypeDescriptor {
    /// Look up a member by name.
    pub fn member(&self, name: &str) -> Option<&MemberSpec> {
        self.members.iter().find(|m| m.name == name)
    }

    /// `true` if the member table contains `name`.
    pub fn has_member(&self, name: &str) -> bool {
        self.member(name).is_some()
    }

    /// `true` for instantiable types.
    pub fn is_concrete(&self) -> bool {
        self.role == TypeRole::Concrete
    }

    /// `true` for capability tags.
    pub fn is_capability(&self) -> bool {
        self.role == TypeRole::Capability
    }

    /// Members with a concrete implementation.
    pub fn implemented_members(&self) -> impl Iterator<Item = &MemberSpec> {
        self.members.iter().filter(|m| m.implemented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TypeBuilder;

    #[test]
    fn member_lookup() {
        let desc = TypeBuilder::concrete("as.dto.space.id.SpacePermId")
            .member(MemberSpec::text("permId"))
            .build();

        assert!(desc.has_member("permId"));
        assert!(desc.member("missing").is_none());
        assert_eq!(
            desc.member("permId").map(|m| m.kind),
            Some(MemberKind::Text)
        );
    }

    #[test]
    fn kind_accepts_null_everywhere() {
        for kind in [
            MemberKind::Bool,
            MemberKind::Integer,
            MemberKind::Float,
            MemberKind::Text,
            MemberKind::Object,
            MemberKind::List,
            MemberKind::Any,
        ] {
            assert!(kind.accepts(&FieldValue::Null));
        }
    }

    #[test]
    fn kind_accepts_shapes() {
        assert!(MemberKind::Text.accepts(&FieldValue::Text("x".into())));
        assert!(!MemberKind::Text.accepts(&FieldValue::Integer(1)));
        assert!(MemberKind::Float.accepts(&FieldValue::Integer(1)));
        assert!(MemberKind::Any.accepts(&FieldValue::Bool(true)));
        assert!(MemberKind::List.accepts(&FieldValue::List(vec![])));
        assert!(!MemberKind::Integer.accepts(&FieldValue::Float(0.5)));
    }

    #[test]
    fn declared_only_members_are_flagged() {
        let spec = MemberSpec::text("permId").declared_only();
        assert!(!spec.implemented);
    }

    #[test]
    fn descriptor_serde_roundtrip() {
        let desc = TypeBuilder::concrete("as.dto.tag.id.TagCode")
            .member(MemberSpec::text("code").with_default(serde_json::json!("")))
            .build();

        let json = serde_json::to_string(&desc).unwrap();
        let back: TypeDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(desc, back);
    }
}
