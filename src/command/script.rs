//! Tcl script generation for transactional bulk node changes

use crate::command::SCRIPT_NAME;
use crate::types::{DesiredNode, METADATA_TAG};

/// Source of the cli script installed on the appliance.
///
/// The script parses `--names` (and, for creates, `--addresses`) from its
/// argument list and applies the requested action to every node inside one
/// transaction. The delete branch re-reads each node's live metadata and
/// skips nodes whose first metadata entry is not the ownership tag; nodes
/// whose metadata cannot be read stay in the deletion list. Braces that must
/// reach tmsh as literal tokens are backslash-escaped so the script body
/// still parses as balanced Tcl.
pub fn discovery_script_source() -> String {
    DISCOVERY_SCRIPT_TEMPLATE
        .replace("{name}", SCRIPT_NAME)
        .replace("{tag}", METADATA_TAG)
}

const DISCOVERY_SCRIPT_TEMPLATE: &str = r#"cli script {name} {
proc script::run {} {
    set names {}
    set addresses {}
    set shouldGet ''
    set action [lindex $tmsh::argv 1]
    foreach i $tmsh::argv {
        if { $i eq "--names" } {
            set shouldGet "names"
            continue
        }
        if { $i eq "--addresses" } {
            set shouldGet "addresses"
            continue
        }
        if { $shouldGet eq "names" } {
            if { $action eq "delete" } {
                set skip 0
                catch {
                    set node [tmsh::get_config /ltm node $i]
                    set metadata [tmsh::get_field_value [lindex $node 0] "metadata"]
                    if { [lindex [lindex $metadata 0] 1] ne "{tag}" } {
                        set skip 1
                    }
                } err
                if { $skip } {
                    continue
                }
            }
            lappend names $i
        }
        if { $shouldGet eq "addresses" } {
            lappend addresses $i
        }
    }
    set i 0
    tmsh::stateless enabled
    tmsh::begin_transaction
    foreach name $names {
        if { $action eq "create" } {
            set address [lindex $addresses $i]
            tmsh::create ltm node $name address $address metadata replace-all-with \{ {tag} \{ \} \}
        } elseif { $action eq "delete" } {
            tmsh::delete ltm node $name
        } elseif { $action eq "addMetadata" } {
            tmsh::modify ltm node $name metadata add \{ {tag} \{ \} \}
        } elseif { $action eq "removeMetadata" } {
            tmsh::modify ltm node $name metadata delete \{ {tag} \{ \} \}
        }
        incr i
    }
    tmsh::commit_transaction
}
}
"#;

/// Generates a standalone script creating every node in one transaction.
///
/// A transaction failure aborts the whole batch; there is no partial-create
/// fallback. Returns `None` for an empty node set.
pub fn bulk_create_script(nodes: &[DesiredNode]) -> Option<String> {
    if nodes.is_empty() {
        return None;
    }
    let mut script = format!("cli script {SCRIPT_NAME} {{\nproc script::run {{}} {{\n");
    script.push_str("    tmsh::begin_transaction\n");
    for node in nodes {
        script.push_str(&format!(
            "    tmsh::create ltm node {} address {} metadata replace-all-with \\{{ {METADATA_TAG} \\{{ \\}} \\}}\n",
            node.id, node.ip
        ));
    }
    script.push_str("    tmsh::commit_transaction\n}\n}\n");
    Some(script)
}

/// Generates a standalone script deleting every node in one transaction.
///
/// Deliberately all-or-nothing: when the transaction fails, the caller walks
/// the nodes individually and records an outcome per node instead of hiding
/// the partial result inside the script. Returns `None` for an empty node
/// set.
pub fn bulk_delete_script(nodes: &[DesiredNode]) -> Option<String> {
    if nodes.is_empty() {
        return None;
    }
    let mut script = format!("cli script {SCRIPT_NAME} {{\nproc script::run {{}} {{\n");
    script.push_str("    tmsh::begin_transaction\n");
    for node in nodes {
        script.push_str(&format!("    tmsh::delete ltm node {}\n", node.id));
    }
    script.push_str("    tmsh::commit_transaction\n}\n}\n");
    Some(script)
}
