//! Create/delete plan computation against a point-in-time inventory

use crate::inventory::{absolute, strip_slash, Inventory};
use crate::reconcile::error::ReconcileError;
use crate::reconcile::plan::{CreatePlan, DeletePlan};
use crate::types::DesiredNode;
use std::collections::HashSet;

/// Partitions desired nodes into those to create and those to tag.
///
/// A desired node whose address is unknown to the appliance is created. A
/// node whose address exists but whose metadata lacks the ownership tag gets
/// a metadata-add operation addressed at the existing object's absolute id.
/// Addresses already present and tagged need nothing.
pub fn plan_create(
    inventory: &Inventory,
    desired: &[DesiredNode],
) -> Result<CreatePlan, ReconcileError> {
    ensure_unique_addresses(desired)?;

    let mut plan = CreatePlan::default();
    for node in desired {
        if !inventory.contains_key(&node.ip) {
            plan.create_nodes.push(node.clone());
        }
    }

    let creating: HashSet<&str> = plan.create_nodes.iter().map(|n| n.ip.as_str()).collect();
    for node in desired {
        if creating.contains(node.ip.as_str()) {
            continue;
        }
        if let Some(existing) = inventory.get(&node.ip) {
            if !existing.is_tagged() {
                plan.add_metadata.push(rewrite_id(node, &existing.id));
            }
        }
    }

    Ok(plan)
}

/// Partitions desired removals into full deletions and tag removals.
///
/// A node is deleted only when its normalized id matches an existing node's
/// normalized id. Nodes matched by address alone lose the ownership tag
/// instead, and only when the existing node actually carries it; untagged
/// nodes belong to someone else and are never touched.
pub fn plan_delete(
    inventory: &Inventory,
    desired: &[DesiredNode],
) -> Result<DeletePlan, ReconcileError> {
    ensure_unique_addresses(desired)?;

    let existing_ids: HashSet<&str> = inventory.values().map(|n| strip_slash(&n.id)).collect();

    let mut plan = DeletePlan::default();
    for node in desired {
        if existing_ids.contains(strip_slash(&node.id)) {
            plan.delete_nodes.push(node.clone());
        }
    }

    let deleting: HashSet<&str> = plan.delete_nodes.iter().map(|n| n.ip.as_str()).collect();
    for node in desired {
        if deleting.contains(node.ip.as_str()) {
            continue;
        }
        if let Some(existing) = inventory.get(&node.ip) {
            if existing.is_tagged() {
                plan.remove_metadata.push(rewrite_id(node, &existing.id));
            }
        }
    }

    Ok(plan)
}

fn ensure_unique_addresses(desired: &[DesiredNode]) -> Result<(), ReconcileError> {
    let mut seen = HashSet::new();
    for node in desired {
        if !seen.insert(node.ip.as_str()) {
            return Err(ReconcileError::DuplicateAddress {
                ip: node.ip.clone(),
            });
        }
    }
    Ok(())
}

fn rewrite_id(node: &DesiredNode, existing_id: &str) -> DesiredNode {
    let mut rewritten = node.clone();
    rewritten.id = absolute(existing_id);
    rewritten
}
