// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Field exclusion applied to node properties on encode and decode.
//!
//! Extensions and bus components own a back-reference to their parent.
//! Following it while encoding would loop, so any `parent` field declared by
//! those categories is dropped. Boards have no parent and keep every field.

use serde_json::{Map, Value};

use crate::capability::Capability;

/// Name of the back-reference field.
pub const PARENT_FIELD: &str = "parent";

/// Whether `field`, declared by a node of category `declaring`, is excluded
/// from the persisted form.
pub fn should_skip_field(declaring: Capability, field: &str) -> bool {
    declaring.has_parent() && field == PARENT_FIELD
}

/// Remove every excluded field from a node's properties.
pub fn retain_included(declaring: Capability, properties: &mut Map<String, Value>) {
    properties.retain(|field, _| !should_skip_field(declaring, field));
}
