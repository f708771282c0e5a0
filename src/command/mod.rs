//! Typed construction of appliance shell commands and bulk scripts

pub mod builder;
pub mod script;

pub use builder::{ScriptAction, TmshCommand};
pub use script::{bulk_create_script, bulk_delete_script, discovery_script_source};

/// Name of the cli script installed on the appliance for bulk operations.
pub const SCRIPT_NAME: &str = "__service-discovery";
