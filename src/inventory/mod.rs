//! Point-in-time node inventory scanned from one-line recursive listings

pub mod extractor;

pub use extractor::build;

use crate::types::METADATA_TAG;
use std::collections::HashMap;

/// One appliance-resident node as scanned from a dump line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingNode {
    pub id: String,
    pub ip: String,
    /// Raw interior of the node's `metadata { ... }` block, empty when the node
    /// has none. Kept as text; ownership checks only ever look for the tag.
    pub metadata: String,
}

impl ExistingNode {
    /// Whether the node carries the ownership tag and may be managed.
    pub fn is_tagged(&self) -> bool {
        self.metadata.contains(METADATA_TAG)
    }
}

/// Snapshot mapping each node address to the node listed at that address.
///
/// Rebuilt fresh for every reconciliation pass; never cached or merged across
/// passes.
pub type Inventory = HashMap<String, ExistingNode>;

/// Strips a single leading slash so ids compare regardless of absolute form.
pub fn strip_slash(id: &str) -> &str {
    id.strip_prefix('/').unwrap_or(id)
}

/// Returns the leading-slash absolute form of an object path.
pub fn absolute(id: &str) -> String {
    if id.starts_with('/') {
        id.to_string()
    } else {
        format!("/{id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_slash() {
        assert_eq!(strip_slash("/Common/web1"), "Common/web1");
        assert_eq!(strip_slash("Common/web1"), "Common/web1");
    }

    #[test]
    fn test_absolute() {
        assert_eq!(absolute("Common/web1"), "/Common/web1");
        assert_eq!(absolute("/Common/web1"), "/Common/web1");
    }

    #[test]
    fn test_is_tagged_checks_raw_metadata() {
        let tagged = ExistingNode {
            id: "/Common/web1".to_string(),
            ip: "10.0.0.1".to_string(),
            metadata: " appsvcs-discovery { } ".to_string(),
        };
        let bare = ExistingNode {
            metadata: String::new(),
            ..tagged.clone()
        };
        assert!(tagged.is_tagged());
        assert!(!bare.is_tagged());
    }
}
