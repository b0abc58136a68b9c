// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder for [`TypeDescriptor`].
//!
//! The builder is where inheritance emulation happens: it merges member
//! tables at definition time instead of chasing prototype chains at call
//! time.  Layers are applied in a fixed order -- superclass, then each
//! capability tag in declaration order, then the type's own body -- and a
//! later layer always replaces an earlier definition of the same member.

use crate::descriptor::{MemberSpec, TypeDescriptor, TypeRole};

/// Builder for [`TypeDescriptor`] instances.
#[derive(Debug)]
pub struct TypeBuilder {
    discriminator: String,
    role: TypeRole,
    superclass: Option<String>,
    capabilities: Vec<String>,
    /// Members inherited from the superclass and capability layers,
    /// merged as layers are applied.
    inherited: Vec<MemberSpec>,
    /// The type's own body, applied last.
    own: Vec<MemberSpec>,
}

impl TypeBuilder {
    /// Start a concrete (instantiable) type.
    pub fn concrete(discriminator: impl Into<String>) -> Self {
        Self::new(discriminator, TypeRole::Concrete)
    }

    /// Start a capability tag (marker interface).
    pub fn capability(discriminator: impl Into<String>) -> Self {
        Self::new(discriminator, TypeRole::Capability)
    }

    fn new(discriminator: impl Into<String>, role: TypeRole) -> Self {
        Self {
            discriminator: discriminator.into(),
            role,
            superclass: None,
            capabilities: Vec::new(),
            inherited: Vec::new(),
            own: Vec::new(),
        }
    }

    /// Set the single emulated superclass and layer its member table in.
    ///
    /// Calling this twice replaces the superclass reference; the second
    /// call's members are layered on top of the first's.
    pub fn extends(mut self, superclass: &TypeDescriptor) -> Self {
        self.superclass = Some(superclass.discriminator.clone());
        layer(&mut self.inherited, &superclass.members);
        self
    }

    /// Add a capability tag and layer its member table in.
    ///
    /// Repeatable; tags are recorded in declaration order and each tag's
    /// members override anything layered before it.
    pub fn implements(mut self, tag: &TypeDescriptor) -> Self {
        self.capabilities.push(tag.discriminator.clone());
        layer(&mut self.inherited, &tag.members);
        self
    }

    /// Add a member to the type's own body.  Own members are applied
    /// last and win over every inherited definition.
    pub fn member(mut self, spec: MemberSpec) -> Self {
        self.own.push(spec);
        self
    }

    /// Build the immutable descriptor.
    pub fn build(self) -> TypeDescriptor {
        let mut members = self.inherited;
        for mut spec in self.own {
            if spec.declared_by.is_empty() {
                spec.declared_by = self.discriminator.clone();
            }
            layer_one(&mut members, spec);
        }
        TypeDescriptor {
            discriminator: self.discriminator,
            role: self.role,
            superclass: self.superclass,
            capabilities: self.capabilities,
            members,
        }
    }
}

/// Layer `incoming` onto `table`: same-name entries are replaced in place
/// (keeping first-definition position), new entries are appended.
fn layer(table: &mut Vec<MemberSpec>, incoming: &[MemberSpec]) {
    for spec in incoming {
        layer_one(table, spec.clone());
    }
}

fn layer_one(table: &mut Vec<MemberSpec>, spec: MemberSpec) {
    match table.iter().position(|m| m.name == spec.name) {
        Some(idx) => table[idx] = spec,
        None => table.push(spec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::MemberKind;

    fn marker(disc: &str) -> TypeDescriptor {
        TypeBuilder::capability(disc).build()
    }

    #[test]
    fn concrete_records_superclass_and_tags() {
        let base = TypeBuilder::concrete("as.dto.common.id.ObjectPermId")
            .member(MemberSpec::text("permId"))
            .build();
        let tag_a = marker("as.dto.space.id.ISpaceId");
        let tag_b = marker("as.dto.common.id.ICreationIdHolder");

        let desc = TypeBuilder::concrete("as.dto.space.id.SpacePermId")
            .extends(&base)
            .implements(&tag_a)
            .implements(&tag_b)
            .build();

        assert_eq!(
            desc.superclass.as_deref(),
            Some("as.dto.common.id.ObjectPermId")
        );
        assert_eq!(
            desc.capabilities,
            vec![
                "as.dto.space.id.ISpaceId".to_string(),
                "as.dto.common.id.ICreationIdHolder".to_string()
            ]
        );
        assert!(desc.has_member("permId"));
    }

    #[test]
    fn capability_layer_overrides_superclass() {
        let base = TypeBuilder::concrete("Base")
            .member(MemberSpec::text("m").with_default(serde_json::json!("from-base")))
            .build();
        let tag = TypeBuilder::capability("Tag")
            .member(MemberSpec::text("m").with_default(serde_json::json!("from-tag")))
            .build();

        let desc = TypeBuilder::concrete("Derived")
            .extends(&base)
            .implements(&tag)
            .build();

        let m = desc.member("m").unwrap();
        assert_eq!(m.default, Some(serde_json::json!("from-tag")));
        assert_eq!(m.declared_by, "Tag");
    }

    #[test]
    fn own_body_overrides_everything() {
        let base = TypeBuilder::concrete("Base")
            .member(MemberSpec::text("m").with_default(serde_json::json!("from-base")))
            .build();
        let tag = TypeBuilder::capability("Tag")
            .member(MemberSpec::text("m").with_default(serde_json::json!("from-tag")))
            .build();

        let desc = TypeBuilder::concrete("Derived")
            .extends(&base)
            .implements(&tag)
            .member(MemberSpec::text("m").with_default(serde_json::json!("own")))
            .build();

        let m = desc.member("m").unwrap();
        assert_eq!(m.default, Some(serde_json::json!("own")));
        assert_eq!(m.declared_by, "Derived");
    }

    #[test]
    fn override_keeps_first_definition_position() {
        let base = TypeBuilder::concrete("Base")
            .member(MemberSpec::text("a"))
            .member(MemberSpec::text("b"))
            .build();

        let desc = TypeBuilder::concrete("Derived")
            .extends(&base)
            .member(MemberSpec::integer("a"))
            .build();

        let names: Vec<&str> = desc.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(desc.member("a").map(|m| m.kind), Some(MemberKind::Integer));
    }

    #[test]
    fn pure_marker_contributes_nothing() {
        let tag = marker("as.dto.sample.id.ISampleId");
        let desc = TypeBuilder::concrete("as.dto.sample.id.SamplePermId")
            .implements(&tag)
            .member(MemberSpec::text("permId"))
            .build();

        assert_eq!(desc.members.len(), 1);
    }

    #[test]
    fn declared_only_member_survives_layering() {
        let tag = TypeBuilder::capability("Tag")
            .member(MemberSpec::text("ghost").declared_only())
            .build();
        let desc = TypeBuilder::concrete("Derived").implements(&tag).build();

        let m = desc.member("ghost").unwrap();
        assert!(!m.implemented);
        assert_eq!(m.declared_by, "Tag");
    }

    #[test]
    fn inherited_declared_by_is_preserved() {
        let grandparent = TypeBuilder::concrete("Grandparent")
            .member(MemberSpec::text("deep"))
            .build();
        let parent = TypeBuilder::concrete("Parent").extends(&grandparent).build();
        let child = TypeBuilder::concrete("Child").extends(&parent).build();

        assert_eq!(child.member("deep").unwrap().declared_by, "Grandparent");
    }
}
