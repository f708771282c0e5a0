//! Shared domain types for appliance object management

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata marker identifying nodes created and managed by this engine.
///
/// Nodes carrying this tag in their metadata block may be deleted or re-tagged
/// by reconciliation; nodes without it belong to someone else and are left
/// untouched.
pub const METADATA_TAG: &str = "appsvcs-discovery";

/// A node the caller wants present on (or absent from) the appliance.
///
/// Diffing identity is the `ip`; `id` is the desired object path. When an
/// object already exists under a different name for the same address, plan
/// computation rewrites `id` to the appliance's authoritative name so that
/// follow-up commands address the real object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesiredNode {
    pub id: String,
    pub ip: String,
    /// Opaque caller payload, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl DesiredNode {
    pub fn new(id: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ip: ip.into(),
            metadata: None,
        }
    }
}

/// One pool member entry for a full-replace member update.
///
/// Option keys are camelCase (`connectionLimit`) and are rendered as
/// kebab-case tmsh properties (`connection-limit`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolMember {
    pub name: String,
    #[serde(default, flatten)]
    pub options: BTreeMap<String, serde_json::Value>,
}

impl PoolMember {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: BTreeMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// One record of an internal string data-group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataGroupRecord {
    pub name: String,
    pub data: String,
}

impl DataGroupRecord {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}
