//! tmsh-sync - Service discovery node reconciliation for BIG-IP appliances
//!
//! This crate provides functionality for managing load-balancer node, pool,
//! data-group and address-list objects through the appliance's `tmsh`
//! configuration shell, run as a local subprocess. Desired node sets are
//! reconciled against the live inventory with ownership-tag safety.

pub mod client;
pub mod command;
pub mod inventory;
pub mod listing;
pub mod reconcile;
pub mod shell;
pub mod types;

pub use client::{TmshClient, TmshConfig};
pub use shell::ShellExecutor;
pub use types::*;
