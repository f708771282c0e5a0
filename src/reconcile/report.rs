//! Per-node outcome reporting for bulk operations

use crate::types::DesiredNode;
use serde::Serialize;

/// What happened to one node during a bulk pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    Failed { detail: String },
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeOutcome {
    pub node: DesiredNode,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Everything one bulk call did, with per-node visibility.
///
/// A report is returned even when individual nodes failed; only errors that
/// prevent planning or the inventory read short-circuit the call itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkReport {
    /// Outcomes of the create or delete phase.
    pub node_outcomes: Vec<NodeOutcome>,
    /// Outcomes of the metadata tag/untag phase.
    pub metadata_outcomes: Vec<NodeOutcome>,
    /// First phase-level failure, in the order the phases ran. Set even when
    /// later per-node retries recovered, so callers still see the batch
    /// failure that triggered the retries.
    pub first_error: Option<String>,
}

impl BulkReport {
    pub fn is_empty(&self) -> bool {
        self.node_outcomes.is_empty()
            && self.metadata_outcomes.is_empty()
            && self.first_error.is_none()
    }

    /// The error this bulk call should surface, if any: the first phase-level
    /// failure when one was captured, otherwise the first failed per-node
    /// outcome in phase order.
    pub fn first_failure(&self) -> Option<&str> {
        if let Some(detail) = &self.first_error {
            return Some(detail);
        }
        self.node_outcomes
            .iter()
            .chain(&self.metadata_outcomes)
            .find_map(|entry| match &entry.outcome {
                Outcome::Failed { detail } => Some(detail.as_str()),
                Outcome::Succeeded => None,
            })
    }

    pub fn failed_count(&self) -> usize {
        self.node_outcomes
            .iter()
            .chain(&self.metadata_outcomes)
            .filter(|entry| entry.outcome.is_failed())
            .count()
    }

    pub(crate) fn capture_error(&mut self, detail: &str) {
        if self.first_error.is_none() {
            self.first_error = Some(detail.to_string());
        }
    }

    pub(crate) fn record_node_batch(&mut self, nodes: &[DesiredNode], failure: Option<&str>) {
        record_batch(&mut self.node_outcomes, nodes, failure);
    }

    pub(crate) fn record_metadata_batch(&mut self, nodes: &[DesiredNode], failure: Option<&str>) {
        record_batch(&mut self.metadata_outcomes, nodes, failure);
    }

    pub(crate) fn record_node(&mut self, node: &DesiredNode, outcome: Outcome) {
        self.node_outcomes.push(NodeOutcome {
            node: node.clone(),
            outcome,
        });
    }
}

fn record_batch(outcomes: &mut Vec<NodeOutcome>, nodes: &[DesiredNode], failure: Option<&str>) {
    for node in nodes {
        let outcome = match failure {
            Some(detail) => Outcome::Failed {
                detail: detail.to_string(),
            },
            None => Outcome::Succeeded,
        };
        outcomes.push(NodeOutcome {
            node: node.clone(),
            outcome,
        });
    }
}
