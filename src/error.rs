use crate::tree_decomposition::TreeDecompositionValidationError;
use std::error::Error;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum InstanceError {
    Io(io::Error),
    InvalidParameter(String),
    AttemptsExhausted(usize),
    Interrupted,
    InvalidDecomposition(TreeDecompositionValidationError),
    Parse { line: usize, msg: String },
}

impl InstanceError {
    pub(crate) fn parse(line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            line,
            msg: msg.into(),
        }
    }
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            Self::AttemptsExhausted(attempts) => write!(
                f,
                "No connected graph found within {} attempts",
                attempts
            ),
            Self::Interrupted => f.write_str("Interrupted"),
            Self::InvalidDecomposition(e) => write!(f, "Invalid tree decomposition: {}", e),
            Self::Parse { line, msg } => write!(f, "Parse error in line {}: {}", line, msg),
        }
    }
}

impl Error for InstanceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::InvalidDecomposition(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for InstanceError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<TreeDecompositionValidationError> for InstanceError {
    fn from(e: TreeDecompositionValidationError) -> Self {
        Self::InvalidDecomposition(e)
    }
}
