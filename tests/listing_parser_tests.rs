//! Round-trip and whole-dump tests for the listing parser

use proptest::prelude::*;
use std::collections::HashMap;
use tmsh_sync::listing::{parse, parse_listed, render, ListingObject, ListingValue};

fn listing_value() -> impl Strategy<Value = ListingValue> {
    let scalar = "[a-z0-9./:-]{1,12}".prop_map(ListingValue::Scalar);
    scalar.prop_recursive(3, 24, 4, |inner| {
        prop::collection::hash_map("[a-z][a-z0-9-]{0,8}", inner, 0..4)
            .prop_map(ListingValue::Object)
    })
}

fn listing_tree() -> impl Strategy<Value = ListingObject> {
    prop::collection::hash_map("[a-z][a-z0-9-]{0,8}", listing_value(), 0..5)
}

proptest! {
    // Rendering writes one key-value or one block per line with the same
    // bracing convention the parser consumes, so parsing the rendition must
    // reproduce the tree exactly.
    #[test]
    fn prop_render_parse_round_trip(tree in listing_tree()) {
        prop_assert_eq!(parse(&render(&tree)), tree);
    }
}

#[test]
fn test_realistic_recursive_dump() {
    let dump = "\
ltm node /Common/web1 {
    address 10.0.0.1
    metadata {
        appsvcs-discovery { }
    }
    session user-enabled
    state unchecked
}
ltm node /Tenant-1/app/svc {
    address 10.1.2.3
    monitor /Common/icmp
}
";
    let tree = parse(dump);
    assert_eq!(tree.len(), 2);

    let web1 = tree
        .get("ltm node /Common/web1")
        .and_then(ListingValue::as_object)
        .unwrap();
    assert_eq!(
        web1.get("address").and_then(ListingValue::as_scalar),
        Some("10.0.0.1")
    );
    let metadata = web1
        .get("metadata")
        .and_then(ListingValue::as_object)
        .unwrap();
    assert_eq!(
        metadata.get("appsvcs-discovery {").and_then(ListingValue::as_scalar),
        Some("}")
    );

    let svc = tree
        .get("ltm node /Tenant-1/app/svc")
        .and_then(ListingValue::as_object)
        .unwrap();
    assert_eq!(
        svc.get("monitor").and_then(ListingValue::as_scalar),
        Some("/Common/icmp")
    );
}

#[test]
fn test_object_end_is_first_line_reaching_depth_zero() {
    // The deeper "options { }" pair and the double close on one line must
    // not confuse the depth accounting for either scope.
    let dump = "\
ltm virtual /Common/http {
    profiles {
        /Common/tcp {
            context all
        } }
    destination 10.0.0.5:80
}
";
    let tree = parse(dump);
    let virtual_server = tree
        .get("ltm virtual /Common/http")
        .and_then(ListingValue::as_object)
        .unwrap();
    assert_eq!(
        virtual_server
            .get("destination")
            .and_then(ListingValue::as_scalar),
        Some("10.0.0.5:80")
    );

    let profiles = virtual_server
        .get("profiles")
        .and_then(ListingValue::as_object)
        .unwrap();
    let tcp = profiles
        .get("/Common/tcp")
        .and_then(ListingValue::as_object)
        .unwrap();
    assert_eq!(tcp.get("context").and_then(ListingValue::as_scalar), Some("all"));
}

#[test]
fn test_parse_listed_matches_manual_unwrap() {
    let output = "\
ltm pool /Common/web-pool {
    load-balancing-mode round-robin
    members {
        /Common/web1:80 {
            address 10.0.0.1
        }
    }
}
";
    let unwrapped = parse_listed(output);
    let mut expected_members = HashMap::new();
    expected_members.insert(
        "/Common/web1:80".to_string(),
        ListingValue::Object(HashMap::from([(
            "address".to_string(),
            ListingValue::Scalar("10.0.0.1".to_string()),
        )])),
    );

    assert_eq!(
        unwrapped.get("load-balancing-mode"),
        Some(&ListingValue::Scalar("round-robin".to_string()))
    );
    assert_eq!(
        unwrapped.get("members"),
        Some(&ListingValue::Object(expected_members))
    );
}
