//! Desired-versus-actual node reconciliation

pub mod diff;
pub mod error;
pub mod plan;
pub mod report;

pub use diff::{plan_create, plan_delete};
pub use error::ReconcileError;
pub use plan::{CreatePlan, DeletePlan};
pub use report::{BulkReport, NodeOutcome, Outcome};
