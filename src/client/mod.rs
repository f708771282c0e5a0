//! High-level appliance operations over the serialized executor

pub mod error;
pub mod tmsh;

pub use error::{ClientError, Result};
pub use tmsh::{TmshClient, TmshConfig};
