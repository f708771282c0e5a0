//! Scans one-line node dumps into an [`Inventory`]

use crate::inventory::{ExistingNode, Inventory};
use crate::listing::balanced_block;
use once_cell::sync::Lazy;
use regex::Regex;

static NODE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"node (\S+).*address (\S+)").expect("node line pattern"));

/// Builds the address-keyed inventory from `list /ltm node recursive
/// one-line` output.
///
/// Lines that do not carry both a node name and an address are ignored; the
/// raw dump is full of decoration the scan does not care about. When two
/// lines list the same address the later one wins.
pub fn build<'a, I>(lines: I) -> Inventory
where
    I: IntoIterator<Item = &'a str>,
{
    let mut inventory = Inventory::new();
    for line in lines {
        if let Some(caps) = NODE_LINE.captures(line) {
            let id = caps[1].to_string();
            let ip = caps[2].to_string();
            let metadata = line
                .split_once("metadata {")
                .map(|(_, rest)| balanced_block(rest).to_string())
                .unwrap_or_default();
            inventory.insert(ip.clone(), ExistingNode { id, ip, metadata });
        }
    }
    inventory
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scans_tagged_node_line() {
        let line = "ltm node /Common/web1 { address 10.0.0.1 metadata { appsvcs-discovery { } } session user-enabled state unchecked }";
        let inventory = build([line]);

        let node = inventory.get("10.0.0.1").unwrap();
        assert_eq!(node.id, "/Common/web1");
        assert_eq!(node.ip, "10.0.0.1");
        assert_eq!(node.metadata, " appsvcs-discovery { } ");
        assert!(node.is_tagged());
    }

    #[test]
    fn test_node_without_metadata_block() {
        let line = "ltm node /Common/db1 { address 10.0.0.9 session monitor-enabled state up }";
        let inventory = build([line]);

        let node = inventory.get("10.0.0.9").unwrap();
        assert_eq!(node.metadata, "");
        assert!(!node.is_tagged());
    }

    #[test]
    fn test_metadata_scan_honors_nested_braces() {
        let line = "ltm node /Common/web2 { address 10.0.0.2 metadata { appsvcs-discovery { persist true } extra { a { b } } } state up }";
        let inventory = build([line]);

        let node = inventory.get("10.0.0.2").unwrap();
        assert_eq!(
            node.metadata,
            " appsvcs-discovery { persist true } extra { a { b } } "
        );
    }

    #[test]
    fn test_decoration_lines_are_skipped() {
        let lines = [
            "Displaying configuration...",
            "",
            "ltm node /Common/web1 { address 10.0.0.1 }",
            "ltm pool /Common/web-pool { members none }",
        ];
        let inventory = build(lines);

        assert_eq!(inventory.len(), 1);
        assert!(inventory.contains_key("10.0.0.1"));
    }

    #[test]
    fn test_duplicate_address_keeps_last_line() {
        let lines = [
            "ltm node /Common/old { address 10.0.0.5 }",
            "ltm node /Common/new { address 10.0.0.5 metadata { appsvcs-discovery { } } }",
        ];
        let inventory = build(lines);

        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.get("10.0.0.5").unwrap().id, "/Common/new");
    }

    #[test]
    fn test_partition_qualified_names() {
        let line = "ltm node /Tenant-1/app/svc_10.1.2.3 { address 10.1.2.3 monitor /Common/icmp }";
        let inventory = build([line]);

        assert_eq!(
            inventory.get("10.1.2.3").unwrap().id,
            "/Tenant-1/app/svc_10.1.2.3"
        );
    }
}
