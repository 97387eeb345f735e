//! # Error Handling
//!
//! The dispatch pipeline is deliberately forgiving: unmatched parameter
//! names, disallowed per-page values, undeclared sort or search columns are
//! all policy no-ops, never errors. Malformed client input must not be able
//! to abort a run, only fail to take effect.
//!
//! The one fatal condition is binding the query source itself: a named
//! source that no factory resolves means the caller wired the filter wrong,
//! and that is surfaced as [`FilterError::InvalidQuerySource`].
//!
//! Scaffolding has its own small taxonomy ([`ScaffoldError`]) because the
//! `make-filter` binary needs to distinguish "refusing to overwrite" from
//! plain I/O failure for its exit status.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error raised while binding a query source to a filter run.
#[derive(Debug)]
pub enum FilterError {
    /// The query source could not be resolved to a builder.
    ///
    /// Raised when a named source is passed to `of`/`set_query` and the
    /// filter type's `resolve` hook does not recognize it.
    InvalidQuerySource {
        /// The name that failed to resolve.
        given: String,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidQuerySource { given } => {
                write!(f, "query source [{given}] is not resolvable to a builder")
            }
        }
    }
}

impl std::error::Error for FilterError {}

/// Error raised by the filter scaffolding command.
#[derive(Debug)]
pub enum ScaffoldError {
    /// The target file already exists and `--force` was not given.
    AlreadyExists(PathBuf),
    /// Creating the directory or writing the file failed.
    Io(io::Error),
}

impl ScaffoldError {
    /// Whether the failure is the refuse-to-overwrite case.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }
}

impl fmt::Display for ScaffoldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists(path) => write!(f, "{} already exists", path.display()),
            Self::Io(err) => write!(f, "failed to write filter file: {err}"),
        }
    }
}

impl std::error::Error for ScaffoldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AlreadyExists(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for ScaffoldError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
