// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in descriptor catalog.
//!
//! The registration pass a client performs once at startup, before any
//! request is issued: the entity-identifier families of the application
//! server (`as.dto.*`) and the data-store server (`dss.dto.*`).  Each
//! family pairs capability tags (`ISpaceId`, `ISampleId`, ...) with the
//! concrete identifier types the server emits (`SpacePermId`,
//! `SampleIdentifier`, ...).

use crate::builder::TypeBuilder;
use crate::descriptor::MemberSpec;
use crate::namespace::RegistryGroup;
use crate::registry::TypeRegistry;

/// Application-server (`as.dto`) identifier types.
pub fn application_registry() -> TypeRegistry {
    let mut reg = TypeRegistry::new();

    // Common bases.  Every identifier is an IObjectId; the three concrete
    // bases carry the one member their subtypes share.
    let i_object_id = reg.register(TypeBuilder::capability("as.dto.common.id.IObjectId").build());
    let object_perm_id = reg.register(
        TypeBuilder::concrete("as.dto.common.id.ObjectPermId")
            .implements(&i_object_id)
            .member(MemberSpec::text("permId").with_default(serde_json::json!("")))
            .build(),
    );
    let object_identifier = reg.register(
        TypeBuilder::concrete("as.dto.common.id.ObjectIdentifier")
            .implements(&i_object_id)
            .member(MemberSpec::text("identifier").with_default(serde_json::json!("")))
            .build(),
    );
    reg.register(
        TypeBuilder::concrete("as.dto.common.id.ObjectTechId")
            .implements(&i_object_id)
            .member(MemberSpec::integer("techId"))
            .build(),
    );
    reg.register(
        TypeBuilder::concrete("as.dto.common.id.CreationId")
            .implements(&i_object_id)
            .member(MemberSpec::text("creationId"))
            .build(),
    );

    // Space.
    let i_space_id = reg.register(
        TypeBuilder::capability("as.dto.space.id.ISpaceId")
            .implements(&i_object_id)
            .build(),
    );
    reg.register(
        TypeBuilder::concrete("as.dto.space.id.SpacePermId")
            .extends(&object_perm_id)
            .implements(&i_space_id)
            .build(),
    );

    // Project.
    let i_project_id = reg.register(
        TypeBuilder::capability("as.dto.project.id.IProjectId")
            .implements(&i_object_id)
            .build(),
    );
    reg.register(
        TypeBuilder::concrete("as.dto.project.id.ProjectPermId")
            .extends(&object_perm_id)
            .implements(&i_project_id)
            .build(),
    );
    reg.register(
        TypeBuilder::concrete("as.dto.project.id.ProjectIdentifier")
            .extends(&object_identifier)
            .implements(&i_project_id)
            .build(),
    );

    // Experiment.
    let i_experiment_id = reg.register(
        TypeBuilder::capability("as.dto.experiment.id.IExperimentId")
            .implements(&i_object_id)
            .build(),
    );
    reg.register(
        TypeBuilder::concrete("as.dto.experiment.id.ExperimentPermId")
            .extends(&object_perm_id)
            .implements(&i_experiment_id)
            .build(),
    );
    reg.register(
        TypeBuilder::concrete("as.dto.experiment.id.ExperimentIdentifier")
            .extends(&object_identifier)
            .implements(&i_experiment_id)
            .build(),
    );

    // Sample.
    let i_sample_id = reg.register(
        TypeBuilder::capability("as.dto.sample.id.ISampleId")
            .implements(&i_object_id)
            .build(),
    );
    reg.register(
        TypeBuilder::concrete("as.dto.sample.id.SamplePermId")
            .extends(&object_perm_id)
            .implements(&i_sample_id)
            .build(),
    );
    reg.register(
        TypeBuilder::concrete("as.dto.sample.id.SampleIdentifier")
            .extends(&object_identifier)
            .implements(&i_sample_id)
            .build(),
    );

    // Data set.
    let i_data_set_id = reg.register(
        TypeBuilder::capability("as.dto.dataset.id.IDataSetId")
            .implements(&i_object_id)
            .build(),
    );
    reg.register(
        TypeBuilder::concrete("as.dto.dataset.id.DataSetPermId")
            .extends(&object_perm_id)
            .implements(&i_data_set_id)
            .build(),
    );

    // Tag.  TagCode is the one identifier that is not perm-id shaped.
    let i_tag_id = reg.register(
        TypeBuilder::capability("as.dto.tag.id.ITagId")
            .implements(&i_object_id)
            .build(),
    );
    reg.register(
        TypeBuilder::concrete("as.dto.tag.id.TagPermId")
            .extends(&object_perm_id)
            .implements(&i_tag_id)
            .build(),
    );
    reg.register(
        TypeBuilder::concrete("as.dto.tag.id.TagCode")
            .implements(&i_tag_id)
            .member(MemberSpec::text("code").with_default(serde_json::json!("")))
            .build(),
    );

    reg
}

/// Data-store-server (`dss.dto`) identifier types.
pub fn datastore_registry() -> TypeRegistry {
    let mut reg = TypeRegistry::new();

    let i_file_id =
        reg.register(TypeBuilder::capability("dss.dto.datasetfile.id.IDataSetFileId").build());
    reg.register(
        TypeBuilder::concrete("dss.dto.datasetfile.id.DataSetFilePermId")
            .implements(&i_file_id)
            .member(MemberSpec::object("dataSetId"))
            .member(MemberSpec::text("filePath").with_default(serde_json::json!("")))
            .build(),
    );

    reg
}

/// Both server surfaces under their namespace roots.
pub fn standard_group() -> RegistryGroup {
    let mut group = RegistryGroup::new();
    group.insert_root("as.dto", application_registry());
    group.insert_root("dss.dto", datastore_registry());
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{decode, encode, EnvelopeConfig};
    use crate::object::TypedObject;
    use crate::registry::TypeResolver;

    #[test]
    fn identifier_families_are_registered() {
        let reg = application_registry();
        for disc in [
            "as.dto.space.id.SpacePermId",
            "as.dto.project.id.ProjectIdentifier",
            "as.dto.experiment.id.ExperimentPermId",
            "as.dto.sample.id.SampleIdentifier",
            "as.dto.dataset.id.DataSetPermId",
            "as.dto.tag.id.TagCode",
        ] {
            assert!(reg.contains(disc), "missing {}", disc);
        }
    }

    #[test]
    fn sample_perm_id_capability_set() {
        let reg = application_registry();
        let desc = reg.resolve("as.dto.sample.id.SamplePermId").unwrap();

        assert!(reg.is_capable_of(&desc, "as.dto.sample.id.ISampleId"));
        assert!(reg.is_capable_of(&desc, "as.dto.common.id.ObjectPermId"));
        // Transitive: SamplePermId -> ISampleId -> IObjectId.
        assert!(reg.is_capable_of(&desc, "as.dto.common.id.IObjectId"));
        assert!(!reg.is_capable_of(&desc, "as.dto.space.id.ISpaceId"));
    }

    #[test]
    fn perm_id_member_is_inherited() {
        let reg = application_registry();
        let desc = reg.resolve("as.dto.space.id.SpacePermId").unwrap();

        let member = desc.member("permId").unwrap();
        assert_eq!(member.declared_by, "as.dto.common.id.ObjectPermId");
    }

    #[test]
    fn group_routes_both_surfaces() {
        let group = standard_group();
        assert!(group.lookup("as.dto.space.id.SpacePermId").is_some());
        assert!(group.lookup("dss.dto.datasetfile.id.DataSetFilePermId").is_some());
    }

    #[test]
    fn catalog_instance_roundtrips() {
        let group = standard_group();
        let config = EnvelopeConfig::default();

        let desc = group.resolve("dss.dto.datasetfile.id.DataSetFilePermId").unwrap();
        let mut file_id = TypedObject::new(&desc).unwrap();
        file_id.set("filePath", "original/plate-1/readout.csv").unwrap();

        let data_set = group.resolve("as.dto.dataset.id.DataSetPermId").unwrap();
        let mut ds = TypedObject::new(&data_set).unwrap();
        ds.set("permId", "20240101000000000-42").unwrap();

        // dataSetId crosses namespace roots; encode stays group-agnostic.
        file_id.set("dataSetId", ds).unwrap();

        let encoded = encode(&file_id, &config);
        let decoded = decode(&group, &encoded, &config).unwrap();
        assert_eq!(decoded, file_id);
        assert_eq!(
            decoded
                .get("dataSetId")
                .unwrap()
                .as_object()
                .unwrap()
                .get("permId")
                .unwrap()
                .as_str(),
            Some("20240101000000000-42")
        );
    }
}
