// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed-object registry and polymorphic JSON envelope codec.
//!
//! Client-side type layer for a laboratory information management API:
//! the server tags every serialized object with a dotted discriminator
//! string (`"@type": "as.dto.space.id.SpacePermId"`), and this crate maps
//! those discriminators to immutable type descriptors, decodes tagged
//! payloads into dynamic typed objects, and answers capability ("is-a")
//! queries against an emulated single-superclass + capability-tag graph.
//!
//! # Features
//!
//! - **Type registry**: discriminator-to-descriptor mapping, populated
//!   once at startup, read-only afterwards (last registration wins)
//! - **Definition-time composition**: member tables are merged when a
//!   type is built -- superclass, then capability tags, then own body --
//!   instead of chasing prototype chains per call
//! - **Polymorphic envelope codec**: recursive decode/encode of
//!   `@type`-tagged JSON with depth bounds and unknown-field retention
//! - **Namespace roots**: independent registries per API surface
//!   (`as.dto.*`, `dss.dto.*`) with longest-prefix routing
//! - **Snapshots**: registries persist as one JSON file per descriptor
//!
//! # Architecture
//!
//! ```text
//! Remote layer (excluded)
//!        |
//!        v  @type-tagged JSON
//!   envelope::decode / encode
//!        |
//!        v
//!   TypeRegistry / RegistryGroup  (immutable after startup)
//!        |
//!        v
//!   TypeDescriptor -> TypedObject
//! ```
//!
//! # Example
//!
//! ```rust
//! use polyreg::{catalog, envelope, EnvelopeConfig, TypeResolver};
//!
//! let group = catalog::standard_group();
//! let config = EnvelopeConfig::default();
//!
//! let payload = serde_json::json!({
//!     "@type": "as.dto.space.id.SpacePermId",
//!     "permId": "MY_SPACE"
//! });
//!
//! let space_id = envelope::decode(&group, &payload, &config).unwrap();
//! assert_eq!(space_id.get("permId").unwrap().as_str(), Some("MY_SPACE"));
//! assert!(group.is_capable_of(space_id.descriptor(), "as.dto.common.id.IObjectId"));
//! ```

pub mod builder;
pub mod catalog;
pub mod descriptor;
pub mod envelope;
pub mod namespace;
pub mod object;
pub mod registry;
pub mod snapshot;
pub mod value;

pub use builder::TypeBuilder;
pub use descriptor::{MemberKind, MemberSpec, TypeDescriptor, TypeRole};
pub use envelope::{EnvelopeConfig, EnvelopeError, DEFAULT_MAX_DEPTH, DISCRIMINATOR_KEY};
pub use namespace::RegistryGroup;
pub use object::{ObjectError, TypedObject};
pub use registry::{RegistryError, TypeRegistry, TypeResolver};
pub use snapshot::{SnapshotError, SnapshotStore};
pub use value::FieldValue;
