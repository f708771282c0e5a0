//! High-level operations for service-discovery objects on the appliance

use crate::client::error::{ClientError, Result};
use crate::command::{discovery_script_source, ScriptAction, TmshCommand};
use crate::inventory::{self, strip_slash, Inventory};
use crate::listing::{self, ListingValue};
use crate::reconcile::{plan_create, plan_delete, BulkReport, Outcome};
use crate::shell::{ProcessRunner, ShellExecutor};
use crate::types::{DataGroupRecord, DesiredNode, PoolMember};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

static NODE_NAME_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ltm node ([^ ]*) \{").expect("node name pattern"));

/// Client configuration.
#[derive(Debug, Clone)]
pub struct TmshConfig {
    /// Where the generated cli script is staged before being merged into the
    /// running configuration.
    pub script_path: PathBuf,
}

impl Default for TmshConfig {
    fn default() -> Self {
        Self {
            script_path: PathBuf::from("/var/tmp/service-discovery.cli"),
        }
    }
}

/// High-level appliance operations. Every command funnels through one
/// serialized [`ShellExecutor`]; clone the client (or share it behind an
/// `Arc`) rather than constructing a second one for the same appliance.
#[derive(Clone)]
pub struct TmshClient {
    executor: ShellExecutor,
    config: TmshConfig,
}

impl TmshClient {
    pub fn new(config: TmshConfig) -> Self {
        Self {
            executor: ShellExecutor::new(),
            config,
        }
    }

    pub fn with_runner(config: TmshConfig, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            executor: ShellExecutor::with_runner(runner),
            config,
        }
    }

    async fn run(&self, command: TmshCommand) -> crate::shell::Result<String> {
        self.executor.execute(&command.render()).await
    }

    /// Raw `list` of an object path.
    pub async fn list(&self, path: &str) -> Result<String> {
        Ok(self.run(TmshCommand::List { path: path.to_string() }).await?)
    }

    /// `list` of an object path, parsed into the object's own properties.
    pub async fn list_parsed(&self, path: &str) -> Result<listing::ListingObject> {
        Ok(listing::parse_listed(&self.list(path).await?))
    }

    /// Whether an object exists. The appliance's "was not found" answer is a
    /// legitimate negative here; every other failure propagates.
    pub async fn item_exists(&self, path: &str) -> Result<bool> {
        match self.run(TmshCommand::List { path: path.to_string() }).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn folder_exists(&self, path: &str) -> Result<bool> {
        self.item_exists(&format!("sys folder {path}")).await
    }

    pub async fn data_group_exists(&self, path: &str) -> Result<bool> {
        self.item_exists(&format!("ltm data-group internal {path}")).await
    }

    /// Creates a single node carrying the ownership tag.
    pub async fn add_node(&self, node: &DesiredNode) -> Result<String> {
        Ok(self
            .run(TmshCommand::CreateNode {
                id: node.id.clone(),
                ip: node.ip.clone(),
            })
            .await?)
    }

    pub async fn delete_node(&self, id: &str) -> Result<String> {
        Ok(self.run(TmshCommand::DeleteNode { id: id.to_string() }).await?)
    }

    pub async fn add_folder(&self, path: &str) -> Result<String> {
        Ok(self.run(TmshCommand::CreateFolder { path: path.to_string() }).await?)
    }

    pub async fn add_data_group(&self, path: &str) -> Result<String> {
        Ok(self
            .run(TmshCommand::CreateDataGroup { path: path.to_string() })
            .await?)
    }

    /// Full-replace update of a string data-group's records.
    pub async fn update_data_group(
        &self,
        path: &str,
        records: &[DataGroupRecord],
    ) -> Result<String> {
        Ok(self
            .run(TmshCommand::UpdateDataGroup {
                path: path.to_string(),
                records: records.to_vec(),
            })
            .await?)
    }

    /// Reads a string data-group back as records, sorted by record name.
    pub async fn read_data_group(&self, path: &str) -> Result<Vec<DataGroupRecord>> {
        let output = self
            .run(TmshCommand::ReadDataGroup { path: path.to_string() })
            .await?;
        let tree = listing::parse_listed(&output);

        let mut records = Vec::new();
        if let Some(ListingValue::Object(entries)) = tree.get("records") {
            for (name, value) in entries {
                if let ListingValue::Object(fields) = value {
                    if let Some(ListingValue::Scalar(data)) = fields.get("data") {
                        records.push(DataGroupRecord::new(name.clone(), data.clone()));
                    }
                }
            }
        }
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    /// Full-replace update of a pool's member set.
    pub async fn update_pool_members(
        &self,
        pool: &str,
        members: &[PoolMember],
    ) -> Result<String> {
        Ok(self
            .run(TmshCommand::UpdatePoolMembers {
                pool: pool.to_string(),
                members: members.to_vec(),
            })
            .await?)
    }

    pub async fn update_address_list(&self, path: &str, addresses: &[String]) -> Result<String> {
        Ok(self
            .run(TmshCommand::UpdateAddressList {
                path: path.to_string(),
                addresses: addresses.to_vec(),
            })
            .await?)
    }

    /// Address-list update that keeps the list non-empty by substituting a
    /// placeholder address, for lists the appliance refuses to empty out.
    pub async fn update_address_list_safe(
        &self,
        path: &str,
        addresses: &[String],
    ) -> Result<String> {
        Ok(self
            .run(TmshCommand::UpdateAddressListSafe {
                path: path.to_string(),
                addresses: addresses.to_vec(),
            })
            .await?)
    }

    /// One-line dump of every node on the appliance, one line per node.
    pub async fn get_all_nodes(&self) -> Result<Vec<String>> {
        let output = self.run(TmshCommand::ListNodesOneLine).await?;
        Ok(output.trim().lines().map(str::to_string).collect())
    }

    /// Fresh address-keyed inventory snapshot.
    pub async fn fetch_inventory(&self) -> Result<Inventory> {
        let lines = self.get_all_nodes().await?;
        Ok(inventory::build(lines.iter().map(String::as_str)))
    }

    /// Finds the node listed with the given address. The name comes from the
    /// header line preceding the matching `address` line; when several lines
    /// match, the last one wins.
    pub async fn get_node_by_ip(&self, ip: &str) -> Result<DesiredNode> {
        let output = self.run(TmshCommand::ListNodesRecursive).await?;
        let lines: Vec<&str> = output.lines().collect();

        let mut id = None;
        for (i, line) in lines.iter().enumerate() {
            if i > 0 && line.contains(ip) && line.contains("address") {
                if let Some(caps) = NODE_NAME_LINE.captures(lines[i - 1]) {
                    id = Some(caps[1].to_string());
                }
            }
        }

        match id {
            Some(id) => Ok(DesiredNode::new(id, ip)),
            None => Err(ClientError::NodeNotFound { ip: ip.to_string() }),
        }
    }

    /// Asserts that every desired node's id appears in the appliance's node
    /// listing, by normalized-id substring match.
    pub async fn check_nodes_exist(&self, nodes: &[DesiredNode]) -> Result<()> {
        if nodes.is_empty() {
            return Err(ClientError::EmptyNodeSet);
        }

        let output = self.run(TmshCommand::ListNodesRecursive).await?;
        let mut missing: Vec<String> = nodes
            .iter()
            .map(|node| strip_slash(&node.id).to_string())
            .collect();

        for line in output.lines() {
            if line.contains("ltm node") {
                missing.retain(|id| !line.contains(id.as_str()));
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ClientError::NodesMissing { ids: missing })
        }
    }

    /// Stages the cli script file and merges it into the running
    /// configuration, making the bulk script available to `run cli script`.
    pub async fn install_discovery_script(&self) -> Result<String> {
        info!(
            "installing service discovery cli script via {}",
            self.config.script_path.display()
        );
        let source = discovery_script_source();
        self.stage_script_file(source.as_bytes()).await?;
        Ok(self
            .run(TmshCommand::MergeScriptFile {
                path: self.config.script_path.clone(),
            })
            .await?)
    }

    async fn stage_script_file(&self, contents: &[u8]) -> Result<()> {
        match self.open_exclusive().await {
            Ok(file) => Ok(write_contents(file, contents).await?),
            Err(err) => {
                // leftover file from an interrupted install; unlink and retry once
                debug!(
                    "exclusive create of {} failed ({}), unlinking stale file",
                    self.config.script_path.display(),
                    err
                );
                if tokio::fs::remove_file(&self.config.script_path).await.is_err() {
                    return Err(ClientError::ScriptFileStuck {
                        path: self.config.script_path.clone(),
                    });
                }
                match self.open_exclusive().await {
                    Ok(file) => Ok(write_contents(file, contents).await?),
                    Err(_) => Err(ClientError::ScriptFileStuck {
                        path: self.config.script_path.clone(),
                    }),
                }
            }
        }
    }

    async fn open_exclusive(&self) -> std::io::Result<tokio::fs::File> {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.config.script_path)
            .await
    }

    /// Reconciles the desired nodes into existence: computes the create plan
    /// against a fresh inventory, then runs the create and metadata-add
    /// phases through the installed cli script. A phase failure is captured
    /// and the remaining phase still runs; per-node outcomes land in the
    /// returned report.
    pub async fn add_bulk_nodes(&self, desired: &[DesiredNode]) -> Result<BulkReport> {
        if desired.is_empty() {
            return Ok(BulkReport::default());
        }

        let inventory = self.fetch_inventory().await?;
        let plan = plan_create(&inventory, desired)?;
        info!(
            "create plan: {} node(s) to create, {} to tag",
            plan.create_nodes.len(),
            plan.add_metadata.len()
        );

        let mut report = BulkReport::default();

        if !plan.create_nodes.is_empty() {
            match self
                .run(TmshCommand::RunDiscoveryScript {
                    action: ScriptAction::Create,
                    nodes: plan.create_nodes.clone(),
                })
                .await
            {
                Ok(_) => report.record_node_batch(&plan.create_nodes, None),
                Err(err) => {
                    let detail = err.to_string();
                    warn!("bulk node create failed: {}", detail);
                    report.capture_error(&detail);
                    report.record_node_batch(&plan.create_nodes, Some(&detail));
                }
            }
        }

        if !plan.add_metadata.is_empty() {
            match self
                .run(TmshCommand::RunDiscoveryScript {
                    action: ScriptAction::AddMetadata,
                    nodes: plan.add_metadata.clone(),
                })
                .await
            {
                Ok(_) => report.record_metadata_batch(&plan.add_metadata, None),
                Err(err) => {
                    let detail = err.to_string();
                    warn!("bulk metadata add failed: {}", detail);
                    report.capture_error(&detail);
                    report.record_metadata_batch(&plan.add_metadata, Some(&detail));
                }
            }
        }

        Ok(report)
    }

    /// Reconciles the desired nodes out of existence: transactional bulk
    /// delete first, then per-node deletion retries when the transaction
    /// fails, then the metadata-remove phase. The first phase-level error is
    /// kept on the report even when retries recover.
    pub async fn delete_bulk_nodes(&self, desired: &[DesiredNode]) -> Result<BulkReport> {
        if desired.is_empty() {
            return Ok(BulkReport::default());
        }

        let inventory = self.fetch_inventory().await?;
        let plan = plan_delete(&inventory, desired)?;
        info!(
            "delete plan: {} node(s) to delete, {} to untag",
            plan.delete_nodes.len(),
            plan.remove_metadata.len()
        );

        let mut report = BulkReport::default();

        if !plan.delete_nodes.is_empty() {
            match self
                .run(TmshCommand::RunDiscoveryScript {
                    action: ScriptAction::Delete,
                    nodes: plan.delete_nodes.clone(),
                })
                .await
            {
                Ok(_) => report.record_node_batch(&plan.delete_nodes, None),
                Err(err) => {
                    let detail = err.to_string();
                    warn!(
                        "transactional delete failed, retrying nodes individually: {}",
                        detail
                    );
                    report.capture_error(&detail);
                    for node in &plan.delete_nodes {
                        match self.run(TmshCommand::DeleteNode { id: node.id.clone() }).await {
                            Ok(_) => report.record_node(node, Outcome::Succeeded),
                            Err(retry_err) => report.record_node(
                                node,
                                Outcome::Failed {
                                    detail: retry_err.to_string(),
                                },
                            ),
                        }
                    }
                }
            }
        }

        if !plan.remove_metadata.is_empty() {
            match self
                .run(TmshCommand::RunDiscoveryScript {
                    action: ScriptAction::RemoveMetadata,
                    nodes: plan.remove_metadata.clone(),
                })
                .await
            {
                Ok(_) => report.record_metadata_batch(&plan.remove_metadata, None),
                Err(err) => {
                    let detail = err.to_string();
                    warn!("bulk metadata remove failed: {}", detail);
                    report.capture_error(&detail);
                    report.record_metadata_batch(&plan.remove_metadata, Some(&detail));
                }
            }
        }

        Ok(report)
    }
}

async fn write_contents(mut file: tokio::fs::File, contents: &[u8]) -> std::io::Result<()> {
    file.write_all(contents).await?;
    file.flush().await
}
