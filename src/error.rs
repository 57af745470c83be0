//! Error enum
use std::fmt;
use std::path::Path;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Walk(walkdir::Error),
    /// Malformed container framing.
    Format(String),
    /// Clean lines and predictions do not line up.
    Alignment(String),
    /// Traversal stopped because the run was cancelled.
    Cancelled,
    UnknownLang(String),
    /// The oracle could not be spawned or exited unsuccessfully.
    Oracle(String),
    Custom(String),
}

impl Error {
    /// Attach the offending path to the error message, when the variant carries one.
    pub fn at(self, path: &Path) -> Self {
        match self {
            Error::Format(msg) => Error::Format(format!("{:?}: {}", path, msg)),
            Error::Alignment(msg) => Error::Alignment(format!("{:?}: {}", path, msg)),
            Error::Oracle(msg) => Error::Oracle(format!("{:?}: {}", path, msg)),
            e => e,
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Walk(e) => write!(f, "traversal error: {}", e),
            Error::Format(msg) => write!(f, "format error: {}", msg),
            Error::Alignment(msg) => write!(f, "alignment error: {}", msg),
            Error::Cancelled => write!(f, "walk canceled"),
            Error::UnknownLang(lang) => write!(f, "unknown language: {}", lang),
            Error::Oracle(msg) => write!(f, "oracle error: {}", msg),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Walk(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<walkdir::Error> for Error {
    fn from(e: walkdir::Error) -> Error {
        Error::Walk(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
