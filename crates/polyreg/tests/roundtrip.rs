// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end flow: catalog -> envelope -> snapshot -> envelope.

use polyreg::{catalog, envelope, EnvelopeConfig, SnapshotStore, TypeResolver, TypedObject};

#[test]
fn decode_reply_then_reencode_request() {
    let group = catalog::standard_group();
    let config = EnvelopeConfig::default();

    // A reply as the application server would emit it, including fields
    // this client version does not declare (@id back-references).
    let reply = serde_json::json!({
        "@type": "as.dto.sample.id.SampleIdentifier",
        "@id": 1,
        "identifier": "/MY_SPACE/MY_PROJECT/SAMPLE-7"
    });

    let sample_id = envelope::decode(&group, &reply, &config).unwrap();
    assert_eq!(
        sample_id.get("identifier").unwrap().as_str(),
        Some("/MY_SPACE/MY_PROJECT/SAMPLE-7")
    );
    assert!(group.is_capable_of(sample_id.descriptor(), "as.dto.sample.id.ISampleId"));
    assert!(group.is_capable_of(sample_id.descriptor(), "as.dto.common.id.IObjectId"));

    // Re-encoding produces a payload the server accepts back, with the
    // retained back-reference intact.
    let request = envelope::encode(&sample_id, &config);
    assert_eq!(
        request.get("@type").and_then(|v| v.as_str()),
        Some("as.dto.sample.id.SampleIdentifier")
    );
    assert_eq!(request.get("@id"), Some(&serde_json::json!(1)));

    let again = envelope::decode(&group, &request, &config).unwrap();
    assert_eq!(again, sample_id);
}

#[test]
fn reply_with_unknown_type_is_a_protocol_mismatch() {
    let group = catalog::standard_group();
    let config = EnvelopeConfig::default();

    let reply = serde_json::json!({
        "@type": "as.dto.plate.id.PlatePermId",
        "permId": "P1"
    });

    let err = envelope::decode(&group, &reply, &config).unwrap_err();
    assert!(err.to_string().contains("as.dto.plate.id.PlatePermId"));
}

#[test]
fn snapshot_survives_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = EnvelopeConfig::default();

    // First process: register, snapshot, exit.
    {
        let store = SnapshotStore::new(dir.path().to_path_buf()).unwrap();
        store.save_group(&catalog::standard_group()).unwrap();
    }

    // Second process: reload and decode against the reloaded group.
    let store = SnapshotStore::new(dir.path().to_path_buf()).unwrap();
    let group = store.load_group().unwrap();
    assert_eq!(group.roots(), vec!["as.dto".to_string(), "dss.dto".to_string()]);

    let reply = serde_json::json!({
        "@type": "dss.dto.datasetfile.id.DataSetFilePermId",
        "dataSetId": {
            "@type": "as.dto.dataset.id.DataSetPermId",
            "permId": "20240101000000000-42"
        },
        "filePath": "original/plate-1/readout.csv"
    });

    // The dss group only routes dss.dto.*; the nested as.dto identifier
    // needs the full group, which is exactly what a restarted client has.
    let file_id = envelope::decode(&group, &reply, &config).unwrap();
    let nested = file_id.get("dataSetId").unwrap().as_object().unwrap();
    assert_eq!(nested.get("permId").unwrap().as_str(), Some("20240101000000000-42"));
}

#[test]
fn fresh_instances_match_decoded_defaults() {
    let group = catalog::standard_group();
    let config = EnvelopeConfig::default();

    let desc = group.resolve("as.dto.tag.id.TagCode").unwrap();
    let fresh = TypedObject::new(&desc).unwrap();

    let minimal = serde_json::json!({"@type": "as.dto.tag.id.TagCode"});
    let decoded = envelope::decode(&group, &minimal, &config).unwrap();

    assert_eq!(fresh, decoded);
    assert_eq!(decoded.get("code").unwrap().as_str(), Some(""));
}
