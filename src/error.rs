use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Reasons a submitted form is rejected before anything touches the disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    PdbIdLength(usize),
    ChainLength(usize),
    Whitespace(&'static str),
    MissingField(&'static str),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InputError::PdbIdLength(_) => write!(f, "Sorry but PDB IDs are 4 characters"),
            InputError::ChainLength(_) => write!(f, "Sorry but PDB chain IDs are 1 character"),
            InputError::Whitespace(field) => write!(f, "Sorry but the {field} may not contain spaces"),
            InputError::MissingField(field) => write!(f, "Sorry but the {field} field is missing"),
        }
    }
}

impl std::error::Error for InputError {}

#[derive(Debug)]
pub enum StageError {
    /// Rejected input, nothing was created
    Invalid(InputError),
    /// Every drawn token was already taken
    Exhausted { attempts: u32 },
    /// Directory or file creation failed part way through staging
    Io { path: PathBuf, source: io::Error },
}

impl StageError {
    pub fn io(path: &Path, source: io::Error) -> StageError {
        StageError::Io { path: path.to_path_buf(), source }
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StageError::Invalid(err) => write!(f, "{err}"),
            StageError::Exhausted { attempts } => {
                write!(f, "no free job identifier after {attempts} attempts")
            }
            StageError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for StageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StageError::Invalid(err) => Some(err),
            StageError::Io { source, .. } => Some(source),
            StageError::Exhausted { .. } => None,
        }
    }
}

impl From<InputError> for StageError {
    fn from(err: InputError) -> Self {
        StageError::Invalid(err)
    }
}
