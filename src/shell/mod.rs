//! Serialized execution of appliance shell commands

pub mod error;
pub mod executor;
pub mod runner;

pub use error::{Result, ShellError};
pub use executor::ShellExecutor;
pub use runner::{ProcessRunner, SystemProcessRunner};
