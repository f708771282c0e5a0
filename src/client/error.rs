//! Client-level errors

use crate::reconcile::ReconcileError;
use crate::shell::ShellError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("shell error: {0}")]
    Shell(#[from] ShellError),

    #[error("plan error: {0}")]
    Plan(#[from] ReconcileError),

    /// No node line with this address exists in the recursive listing.
    #[error("node with IP {ip} was not found")]
    NodeNotFound { ip: String },

    /// An existence assertion over a node set found names the appliance does
    /// not know.
    #[error("nodes not present on the appliance: {ids:?}")]
    NodesMissing { ids: Vec<String> },

    /// The caller passed an empty node set to an operation that requires one.
    #[error("a non-empty desired node set is required")]
    EmptyNodeSet,

    /// Exclusive creation of the staged script file failed even after
    /// unlinking whatever was in the way.
    #[error("unable to create {}, please delete this file to use service discovery", path.display())]
    ScriptFileStuck { path: PathBuf },

    #[error("script file error: {0}")]
    Io(#[from] std::io::Error),
}
