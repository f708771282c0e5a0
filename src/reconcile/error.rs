//! Plan validation errors

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// Two desired nodes share one address. Per-address diffing has no sane
    /// answer for which id should win, so the whole set is rejected before
    /// anything touches the appliance.
    #[error("duplicate address {ip} in desired node set")]
    DuplicateAddress { ip: String },
}
