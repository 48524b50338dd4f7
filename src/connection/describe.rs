use tokio::io::{AsyncRead, AsyncWrite};

use crate::connection::PgConnection;
use crate::error::Result;
use crate::message::{
    Close, Describe, Field, Flush, MessageFormat, ParameterDescription, Parse, Response,
    RowDescription, Sync,
};

/// Type metadata for a successfully parsed statement.
///
/// Parameter OIDs are in placeholder order; fields are in RowDescription
/// order.
#[derive(Debug, Clone)]
pub struct StatementDescription {
    /// The object ID of each parameter's data type.
    pub parameters: Vec<u32>,

    /// A descriptor per result column; empty for statements that return no
    /// rows.
    pub fields: Vec<Field>,
}

/// The server rejected the statement during parsing.
///
/// This is a first-class result value, not an [`Error`](crate::Error): it is
/// produced exclusively from a genuine server error response during the parse
/// phase of a probe, and it carries the server's own diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The SQLSTATE code for the error.
    pub code: String,

    /// The primary, human-readable error message.
    pub message: String,

    /// An optional suggestion of what to do about the problem.
    pub hint: Option<String>,

    /// An index into the statement text, counted in characters from 1.
    pub position: Option<usize>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;

        if let Some(position) = self.position {
            write!(f, " (at position {})", position)?;
        }

        Ok(())
    }
}

impl From<Response> for ParseError {
    fn from(response: Response) -> Self {
        Self {
            code: response.code,
            message: response.message,
            hint: response.hint,
            position: response.position,
        }
    }
}

/// The outcome of a statement probe.
#[derive(Debug, Clone)]
pub enum Described {
    /// The statement parsed; type metadata was collected.
    Statement(StatementDescription),

    /// The statement was rejected by the server.
    Failed(ParseError),
}

impl<S> PgConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Obtains parameter and result-column type metadata for `query` without
    /// executing it.
    ///
    /// The statement is parsed under `statement` as its name, described, and
    /// immediately closed again; no Bind or Execute is ever sent, so this is
    /// safe to run against arbitrary queries (assuming the statement itself
    /// has no side effects when merely parsed).
    ///
    /// All four frontend messages are sent eagerly before any reply is
    /// awaited, costing a single round trip.
    pub async fn describe_statement(
        &mut self,
        statement: &str,
        query: &str,
    ) -> Result<Described> {
        self.send(Parse {
            statement,
            query,
            param_types: &[],
        });

        self.send(Describe::Statement(statement));
        self.send(Close::Statement(statement));
        self.send(Flush);
        self.flush().await?;

        // indicates that the query string was successfully parsed and has
        // semantic validity; otherwise the server reports why not
        let message = self
            .recv(&[MessageFormat::ErrorResponse, MessageFormat::ParseComplete])
            .await?;

        if message.format == MessageFormat::ErrorResponse {
            let error = ParseError::from(message.decode::<Response>()?);

            // after a failed Parse the server discards the pending Describe
            // and Close until it sees Sync; send one and drain to
            // ReadyForQuery so the connection stays usable
            self.send(Sync);
            self.flush().await?;

            let message = self.recv(&[MessageFormat::ReadyForQuery]).await?;
            self.handle_ready_for_query(message)?;

            return Ok(Described::Failed(error));
        }

        // describes the parameters needed by the statement
        let message = self
            .recv(&[
                MessageFormat::ParameterDescription,
                MessageFormat::NoData,
            ])
            .await?;

        let parameters = if message.format == MessageFormat::ParameterDescription {
            message.decode::<ParameterDescription>()?.types
        } else {
            Vec::new()
        };

        // describes the rows that would be returned on execution; NoData for
        // statements that return none
        let message = self
            .recv(&[MessageFormat::RowDescription, MessageFormat::NoData])
            .await?;

        let fields = if message.format == MessageFormat::RowDescription {
            message.decode::<RowDescription>()?.fields
        } else {
            Vec::new()
        };

        let _ = self.recv(&[MessageFormat::CloseComplete]).await?;

        Ok(Described::Statement(StatementDescription {
            parameters,
            fields,
        }))
    }
}
