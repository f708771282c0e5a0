//! Shell execution errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShellError>;

#[derive(Debug, Error)]
pub enum ShellError {
    /// The appliance shell ran but reported failure, either by writing to
    /// stderr or by exiting non-zero. `detail` is the captured text, not a
    /// structured code.
    #[error("appliance command failed: {detail}")]
    CommandFailed { detail: String },

    /// The shell process could not be started at all.
    #[error("failed to spawn appliance shell: {source}")]
    Spawn {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid command line: {reason}")]
    InvalidCommandLine { reason: String },
}

impl From<shell_words::ParseError> for ShellError {
    fn from(err: shell_words::ParseError) -> Self {
        ShellError::InvalidCommandLine {
            reason: err.to_string(),
        }
    }
}

impl ShellError {
    /// Whether this is the appliance's "was not found" answer to a listing
    /// query, which existence checks treat as a legitimate negative rather
    /// than a failure.
    pub fn is_not_found(&self) -> bool {
        match self {
            ShellError::CommandFailed { detail } => detail.contains("was not found"),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let missing = ShellError::CommandFailed {
            detail: "01020036:3: The requested Pool (/Common/nope) was not found.".to_string(),
        };
        let broken = ShellError::CommandFailed {
            detail: "Syntax Error: unexpected argument".to_string(),
        };
        assert!(missing.is_not_found());
        assert!(!broken.is_not_found());
    }
}
