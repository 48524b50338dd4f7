//! Type introspection for PostgreSQL queries over a live connection.
//!
//! The crate answers one question: given a SQL query with named `:param`
//! placeholders, what are the types of its parameters and result columns,
//! and which result columns can be NULL? It does so without ever executing
//! the query, by driving the extended query protocol's Parse and Describe
//! phases and cross-referencing the returned type OIDs against the system
//! catalogs.
//!
//! ```no_run
//! use pg_typegen_core::{PgConnectOptions, PgConnection, TypeResolution};
//!
//! # async fn run() -> Result<(), pg_typegen_core::Error> {
//! let options: PgConnectOptions = "postgres://postgres@localhost/app".parse()?;
//! let mut conn = PgConnection::connect(&options).await?;
//!
//! let query = "SELECT id, email FROM users WHERE id = :id";
//!
//! match conn.resolve_types(query, "users_by_id").await? {
//!     TypeResolution::Resolved(types) => {
//!         assert_eq!(types.param_types["id"], "int4");
//!     }
//!     TypeResolution::Failed(parse_error) => {
//!         eprintln!("query rejected: {}", parse_error);
//!     }
//! }
//!
//! conn.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! A statement rejected by the server is a *result*, not an error: it comes
//! back as [`TypeResolution::Failed`] carrying the server's diagnostics, and
//! the connection remains usable. [`Error::Protocol`], by contrast, means
//! the message stream no longer lines up with what was sent; the connection
//! is desynchronized and must be discarded.

#[macro_use]
mod error;

mod connection;
mod io;
mod message;
mod options;

pub mod desugar;

pub use connection::{
    Described, ParseError, PgConnection, ResolvedTypes, ReturnColumn, StatementDescription,
    TypeResolution,
};
pub use desugar::{desugar, DesugaredQuery, Placeholder};
pub use error::{Error, Result};
pub use message::{Field, RowDescription};
pub use options::PgConnectOptions;
