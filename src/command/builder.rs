//! Single serializer for every appliance shell command the engine issues

use crate::command::SCRIPT_NAME;
use crate::types::{DataGroupRecord, DesiredNode, PoolMember, METADATA_TAG};
use std::path::PathBuf;

/// Written to address lists that would otherwise end up empty, since the
/// appliance rejects an empty replace-all-with set.
const EMPTY_LIST_PLACEHOLDER: &str = "::1:5ee:bad:c0de";

/// Which branch of the appliance-side cli script a bulk run takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptAction {
    Create,
    Delete,
    AddMetadata,
    RemoveMetadata,
}

impl ScriptAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptAction::Create => "create",
            ScriptAction::Delete => "delete",
            ScriptAction::AddMetadata => "addMetadata",
            ScriptAction::RemoveMetadata => "removeMetadata",
        }
    }
}

/// One appliance shell command, rendered to its exact command line by
/// [`TmshCommand::render`].
///
/// Construction cannot produce a malformed command line; everything the
/// engine runs goes through here.
#[derive(Debug, Clone, PartialEq)]
pub enum TmshCommand {
    /// `list` of an arbitrary object path, used both for reads and for
    /// existence probes.
    List { path: String },
    /// One-line recursive node dump across all partitions.
    ListNodesOneLine,
    /// Multi-line recursive node listing across all partitions.
    ListNodesRecursive,
    CreateNode { id: String, ip: String },
    DeleteNode { id: String },
    CreateFolder { path: String },
    CreateDataGroup { path: String },
    UpdateDataGroup {
        path: String,
        records: Vec<DataGroupRecord>,
    },
    ReadDataGroup { path: String },
    UpdatePoolMembers {
        pool: String,
        members: Vec<PoolMember>,
    },
    UpdateAddressList {
        path: String,
        addresses: Vec<String>,
    },
    /// Address-list update that never renders an empty set; an empty input
    /// becomes a single placeholder address instead.
    UpdateAddressListSafe {
        path: String,
        addresses: Vec<String>,
    },
    RunDiscoveryScript {
        action: ScriptAction,
        nodes: Vec<DesiredNode>,
    },
    /// Merges a staged cli script file into the running configuration and
    /// removes the file afterwards.
    MergeScriptFile { path: PathBuf },
}

impl TmshCommand {
    pub fn render(&self) -> String {
        match self {
            TmshCommand::List { path } => format!("tmsh -a list {path}"),
            TmshCommand::ListNodesOneLine => {
                "tmsh -a -c 'cd /; list /ltm node recursive one-line'".to_string()
            }
            TmshCommand::ListNodesRecursive => {
                "tmsh -a -c 'cd /; list ltm node recursive'".to_string()
            }
            TmshCommand::CreateNode { id, ip } => format!(
                "tmsh -a create ltm node {id} address {ip} metadata replace-all-with {{ {METADATA_TAG} {{ }} }}"
            ),
            TmshCommand::DeleteNode { id } => format!("tmsh -a delete ltm node {id}"),
            TmshCommand::CreateFolder { path } => format!("tmsh -a create sys folder {path}"),
            TmshCommand::CreateDataGroup { path } => {
                format!("tmsh -a create ltm data-group internal {path} type string")
            }
            TmshCommand::UpdateDataGroup { path, records } => {
                let entries = records
                    .iter()
                    .map(|record| format!("{} {{ data {} }}", record.name, record.data))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!(
                    "tmsh -a modify ltm data-group internal {path} records replace-all-with {{ {entries} }}"
                )
            }
            TmshCommand::ReadDataGroup { path } => {
                format!("tmsh -a list ltm data-group internal {path}")
            }
            TmshCommand::UpdatePoolMembers { pool, members } => {
                if members.is_empty() {
                    format!("tmsh -a modify ltm pool {pool} members none")
                } else {
                    let entries = members
                        .iter()
                        .map(member_entry)
                        .collect::<Vec<_>>()
                        .join(" ");
                    format!("tmsh -a modify ltm pool {pool} members replace-all-with {{ {entries} }}")
                }
            }
            TmshCommand::UpdateAddressList { path, addresses } => {
                if addresses.is_empty() {
                    format!("tmsh -a modify security firewall address-list {path} addresses none")
                } else {
                    format!(
                        "tmsh -a modify security firewall address-list {path} addresses replace-all-with {{ {} }}",
                        addresses.join(" ")
                    )
                }
            }
            TmshCommand::UpdateAddressListSafe { path, addresses } => {
                let rendered = if addresses.is_empty() {
                    EMPTY_LIST_PLACEHOLDER.to_string()
                } else {
                    addresses.join(" ")
                };
                format!(
                    "tmsh -a modify security firewall address-list {path} addresses replace-all-with {{ {rendered} }}"
                )
            }
            TmshCommand::RunDiscoveryScript { action, nodes } => {
                let names = nodes
                    .iter()
                    .map(|node| node.id.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                let mut command = format!(
                    "tmsh -a run cli script {SCRIPT_NAME} {} --names {names}",
                    action.as_str()
                );
                if *action == ScriptAction::Create {
                    let addresses = nodes
                        .iter()
                        .map(|node| node.ip.as_str())
                        .collect::<Vec<_>>()
                        .join(" ");
                    command.push_str(&format!(" --addresses {addresses}"));
                }
                command
            }
            TmshCommand::MergeScriptFile { path } => format!(
                "tmsh -a -c 'load sys config merge file {path}; run util unix-rm {path}'",
                path = path.display()
            ),
        }
    }
}

fn member_entry(member: &PoolMember) -> String {
    let options = member
        .options
        .iter()
        .map(|(key, value)| format!("{} {}", kebab_case(key), value_text(value)))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{} {{ {options} }}", member.name)
}

/// Rewrites a camelCase property name to the kebab-case form tmsh expects.
fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Renders a JSON value the way it should appear on a command line: strings
/// lose their quotes, everything else keeps its JSON form.
fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_command() {
        let command = TmshCommand::List {
            path: "ltm pool /Common/web-pool".to_string(),
        };
        assert_eq!(command.render(), "tmsh -a list ltm pool /Common/web-pool");
    }

    #[test]
    fn test_node_dump_commands() {
        assert_eq!(
            TmshCommand::ListNodesOneLine.render(),
            "tmsh -a -c 'cd /; list /ltm node recursive one-line'"
        );
        assert_eq!(
            TmshCommand::ListNodesRecursive.render(),
            "tmsh -a -c 'cd /; list ltm node recursive'"
        );
    }

    #[test]
    fn test_create_node_carries_ownership_tag() {
        let command = TmshCommand::CreateNode {
            id: "/Common/web1".to_string(),
            ip: "10.0.0.1".to_string(),
        };
        assert_eq!(
            command.render(),
            "tmsh -a create ltm node /Common/web1 address 10.0.0.1 metadata replace-all-with { appsvcs-discovery { } }"
        );
    }

    #[test]
    fn test_delete_node() {
        let command = TmshCommand::DeleteNode {
            id: "/Common/web1".to_string(),
        };
        assert_eq!(command.render(), "tmsh -a delete ltm node /Common/web1");
    }

    #[test]
    fn test_folder_and_data_group_creation() {
        assert_eq!(
            TmshCommand::CreateFolder {
                path: "/Common/Shared".to_string()
            }
            .render(),
            "tmsh -a create sys folder /Common/Shared"
        );
        assert_eq!(
            TmshCommand::CreateDataGroup {
                path: "/Common/Shared/services".to_string()
            }
            .render(),
            "tmsh -a create ltm data-group internal /Common/Shared/services type string"
        );
        assert_eq!(
            TmshCommand::ReadDataGroup {
                path: "/Common/Shared/services".to_string()
            }
            .render(),
            "tmsh -a list ltm data-group internal /Common/Shared/services"
        );
    }

    #[test]
    fn test_data_group_record_rendering() {
        let command = TmshCommand::UpdateDataGroup {
            path: "/Common/services".to_string(),
            records: vec![
                DataGroupRecord::new("web1", "10.0.0.1"),
                DataGroupRecord::new("web2", "10.0.0.2"),
            ],
        };
        assert_eq!(
            command.render(),
            "tmsh -a modify ltm data-group internal /Common/services records replace-all-with { web1 { data 10.0.0.1 } web2 { data 10.0.0.2 } }"
        );
    }

    #[test]
    fn test_empty_record_set_still_replaces() {
        let command = TmshCommand::UpdateDataGroup {
            path: "/Common/services".to_string(),
            records: vec![],
        };
        assert_eq!(
            command.render(),
            "tmsh -a modify ltm data-group internal /Common/services records replace-all-with {  }"
        );
    }

    #[test]
    fn test_pool_member_without_options_renders_empty_braces() {
        let command = TmshCommand::UpdatePoolMembers {
            pool: "/Common/web-pool".to_string(),
            members: vec![PoolMember::new("/Common/web1:80")],
        };
        assert_eq!(
            command.render(),
            "tmsh -a modify ltm pool /Common/web-pool members replace-all-with { /Common/web1:80 {  } }"
        );
    }

    #[test]
    fn test_pool_member_options_become_kebab_case() {
        let command = TmshCommand::UpdatePoolMembers {
            pool: "/Common/web-pool".to_string(),
            members: vec![PoolMember::new("/Common/web1:80")
                .with_option("connectionLimit", 100)
                .with_option("ratio", 2)],
        };
        assert_eq!(
            command.render(),
            "tmsh -a modify ltm pool /Common/web-pool members replace-all-with { /Common/web1:80 { connection-limit 100 ratio 2 } }"
        );
    }

    #[test]
    fn test_no_members_clears_the_pool() {
        let command = TmshCommand::UpdatePoolMembers {
            pool: "/Common/web-pool".to_string(),
            members: vec![],
        };
        assert_eq!(
            command.render(),
            "tmsh -a modify ltm pool /Common/web-pool members none"
        );
    }

    #[test]
    fn test_address_list_update() {
        let addresses = vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()];
        let command = TmshCommand::UpdateAddressList {
            path: "/Common/allow".to_string(),
            addresses,
        };
        assert_eq!(
            command.render(),
            "tmsh -a modify security firewall address-list /Common/allow addresses replace-all-with { 10.0.0.1 10.0.0.2 }"
        );
    }

    #[test]
    fn test_empty_address_list_renders_none() {
        let command = TmshCommand::UpdateAddressList {
            path: "/Common/allow".to_string(),
            addresses: vec![],
        };
        assert_eq!(
            command.render(),
            "tmsh -a modify security firewall address-list /Common/allow addresses none"
        );
    }

    #[test]
    fn test_safe_address_list_substitutes_placeholder_when_empty() {
        let command = TmshCommand::UpdateAddressListSafe {
            path: "/Common/allow".to_string(),
            addresses: vec![],
        };
        assert_eq!(
            command.render(),
            "tmsh -a modify security firewall address-list /Common/allow addresses replace-all-with { ::1:5ee:bad:c0de }"
        );
    }

    #[test]
    fn test_script_run_create_passes_names_and_addresses() {
        let command = TmshCommand::RunDiscoveryScript {
            action: ScriptAction::Create,
            nodes: vec![
                DesiredNode::new("/Common/web1", "10.0.0.1"),
                DesiredNode::new("/Common/web2", "10.0.0.2"),
            ],
        };
        assert_eq!(
            command.render(),
            "tmsh -a run cli script __service-discovery create --names /Common/web1 /Common/web2 --addresses 10.0.0.1 10.0.0.2"
        );
    }

    #[test]
    fn test_script_run_delete_passes_names_only() {
        let command = TmshCommand::RunDiscoveryScript {
            action: ScriptAction::Delete,
            nodes: vec![DesiredNode::new("/Common/web1", "10.0.0.1")],
        };
        assert_eq!(
            command.render(),
            "tmsh -a run cli script __service-discovery delete --names /Common/web1"
        );
    }

    #[test]
    fn test_merge_script_file() {
        let command = TmshCommand::MergeScriptFile {
            path: PathBuf::from("/var/tmp/service-discovery.cli"),
        };
        assert_eq!(
            command.render(),
            "tmsh -a -c 'load sys config merge file /var/tmp/service-discovery.cli; run util unix-rm /var/tmp/service-discovery.cli'"
        );
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("connectionLimit"), "connection-limit");
        assert_eq!(kebab_case("rateLimitDstMask"), "rate-limit-dst-mask");
        assert_eq!(kebab_case("ratio"), "ratio");
    }
}
