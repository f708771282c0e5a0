//! Reconciliation plans computed by the diff engine

use crate::types::DesiredNode;
use serde::Serialize;

/// Operations needed to bring a desired node set into existence.
///
/// Desired nodes already present and tagged appear in neither list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreatePlan {
    /// Nodes whose address is absent from the appliance.
    pub create_nodes: Vec<DesiredNode>,
    /// Nodes whose address exists but is missing the ownership tag; ids are
    /// rewritten to the appliance's absolute name.
    pub add_metadata: Vec<DesiredNode>,
}

impl CreatePlan {
    pub fn is_empty(&self) -> bool {
        self.create_nodes.is_empty() && self.add_metadata.is_empty()
    }
}

/// Operations needed to remove a desired node set.
///
/// Nodes matching neither list are untouched by the removal pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeletePlan {
    /// Nodes whose normalized id matches an existing node's normalized id.
    pub delete_nodes: Vec<DesiredNode>,
    /// Nodes matched by address only, and only when the existing node is
    /// tagged; ids are rewritten to the appliance's absolute name.
    pub remove_metadata: Vec<DesiredNode>,
}

impl DeletePlan {
    pub fn is_empty(&self) -> bool {
        self.delete_nodes.is_empty() && self.remove_metadata.is_empty()
    }
}
