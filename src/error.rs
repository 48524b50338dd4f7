use std::io;

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents all the ways introspection can fail.
///
/// A server rejection of the probed statement is *not* an `Error`; it is
/// surfaced as [`ParseError`](crate::ParseError) through the resolver's
/// return value.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Error occurred while parsing a connection string.
    #[error("error occurred while parsing a connection string: {0}")]
    Configuration(String),

    /// Error communicating with the database backend.
    #[error("error communicating with the server: {0}")]
    Io(#[from] io::Error),

    /// Unexpected or invalid data encountered while communicating with the
    /// database.
    ///
    /// The connection is desynchronized and must be discarded; none of the
    /// operations in this crate retry after a protocol error.
    #[error("encountered unexpected or invalid data: {0}")]
    Protocol(String),

    /// The server did not produce a message within the configured window.
    #[error("timed out waiting for a message from the server")]
    RecvTimedOut,
}

impl Error {
    pub(crate) fn config(err: impl std::fmt::Display) -> Self {
        Error::Configuration(err.to_string())
    }
}

// Format an error message as a `Protocol` error
macro_rules! err_protocol {
    ($expr:expr) => {
        $crate::error::Error::Protocol($expr.into())
    };

    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::Error::Protocol(format!($fmt, $($arg)*))
    };
}
