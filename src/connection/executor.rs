use tokio::io::{AsyncRead, AsyncWrite};

use crate::connection::PgConnection;
use crate::error::{Error, Result};
use crate::message::{CommandComplete, DataRow, MessageFormat, Query};

impl<S> PgConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Executes a plain query with the simple query protocol and collects
    /// every result row.
    ///
    /// Each value is the textual wire representation of the column; no type
    /// coercion happens at this layer. `None` is a SQL `NULL`. Zero matching
    /// rows is valid and yields an empty vector.
    ///
    /// The query must be one that produces a row description (a `SELECT` or
    /// similar); this is all the catalog resolution needs.
    pub async fn fetch_all(&mut self, query: &str) -> Result<Vec<Vec<Option<String>>>> {
        self.send(Query(query));
        self.flush().await?;

        // the server replies with a description of the result columns,
        // then zero or more rows, then the completion tag
        let _ = self.recv(&[MessageFormat::RowDescription]).await?;

        let mut rows = Vec::new();

        loop {
            let message = self
                .recv(&[MessageFormat::DataRow, MessageFormat::CommandComplete])
                .await?;

            match message.format {
                MessageFormat::DataRow => {
                    let row: DataRow = message.decode()?;

                    rows.push(
                        row.values
                            .into_iter()
                            .map(|value| {
                                value
                                    .map(|bytes| {
                                        String::from_utf8(bytes.to_vec())
                                            .map_err(|err| Error::Protocol(err.to_string()))
                                    })
                                    .transpose()
                            })
                            .collect::<Result<Vec<Option<String>>>>()?,
                    );
                }

                _ => {
                    let complete: CommandComplete = message.decode()?;

                    log::trace!("query returned {} rows", complete.affected_rows);

                    break;
                }
            }
        }

        // the simple query cycle always ends with ReadyForQuery
        let message = self.recv(&[MessageFormat::ReadyForQuery]).await?;
        self.handle_ready_for_query(message)?;

        Ok(rows)
    }
}
