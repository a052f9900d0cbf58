use std::error;
use std::fmt;

/// Error type for code generation operations.
#[derive(Debug)]
pub enum CodeGenError {
    /// Generic error with a message.
    GenericError(String),

    /// I/O error (e.g., writing finalized output files).
    IoError(std::io::Error),

    /// JSON parsing error (e.g., reading a descriptor-set file).
    JsonError(serde_json::Error),

    /// `create_file` was called twice with the same output file name.
    DuplicateFile(String),

    /// `open_for_insert` named an output file that was never created.
    UnknownFile(String),

    /// `open_for_insert` named an insertion point with no marker line in the file.
    UnknownPoint { file: String, point: String },

    /// A generator requested immediate process exit with the given status.
    /// The library never exits; the driver decides whether to honor this.
    FaultExit { status: i32, message: String },

    /// A generator requested abnormal process termination.
    /// The library never aborts; the driver decides whether to honor this.
    FaultAbort { message: String },
}

impl error::Error for CodeGenError {}

impl fmt::Display for CodeGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenericError(message) => write!(f, "{message}"),
            Self::IoError(io_error) => fmt::Display::fmt(io_error, f),
            Self::JsonError(json_error) => fmt::Display::fmt(json_error, f),
            Self::DuplicateFile(name) => {
                write!(f, "output file \"{name}\" was already created")
            }
            Self::UnknownFile(name) => {
                write!(f, "output file \"{name}\" was never created")
            }
            Self::UnknownPoint { file, point } => {
                write!(f, "output file \"{file}\" has no insertion point \"{point}\"")
            }
            Self::FaultExit { status, message } => {
                write!(f, "{message} (exit {status})")
            }
            Self::FaultAbort { message } => write!(f, "{message} (abort)"),
        }
    }
}

impl From<&str> for CodeGenError {
    fn from(message: &str) -> Self {
        Self::GenericError(message.to_string())
    }
}

impl From<String> for CodeGenError {
    fn from(message: String) -> Self {
        Self::GenericError(message)
    }
}

impl From<std::io::Error> for CodeGenError {
    fn from(io_error: std::io::Error) -> Self {
        Self::IoError(io_error)
    }
}

impl From<serde_json::Error> for CodeGenError {
    fn from(json_error: serde_json::Error) -> Self {
        Self::JsonError(json_error)
    }
}
