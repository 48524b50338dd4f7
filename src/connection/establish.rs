use tokio::io::{AsyncRead, AsyncWrite};

use crate::connection::PgConnection;
use crate::error::Result;
use crate::message::{Authentication, BackendKeyData, MessageFormat, Password, Startup};
use crate::options::PgConnectOptions;

// https://www.postgresql.org/docs/current/protocol-flow.html#id-1.10.5.7.3

impl<S> PgConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Performs the startup handshake over an already-open transport.
    ///
    /// A server-side rejection of the handshake (an ErrorResponse instead of
    /// an authentication challenge) surfaces as a protocol desync rather
    /// than a distinguished error; see the crate-level notes on error
    /// handling.
    pub async fn establish(stream: S, options: &PgConnectOptions) -> Result<Self> {
        let mut conn = PgConnection::new(stream, options);

        // To begin a session, a frontend opens a connection to the server
        // and sends a startup message.

        let mut params = vec![
            ("user", &*options.username),
            // Sets the client-side encoding (character set).
            ("client_encoding", "UTF8"),
        ];

        if let Some(ref database) = options.database {
            params.push(("database", database));
        }

        if let Some(ref application_name) = options.application_name {
            params.push(("application_name", application_name));
        }

        conn.send(Startup { params: &params });
        conn.flush().await?;

        // The server then decides what additional authentication it
        // requires (if any), and eventually reports readiness.

        loop {
            let message = conn
                .recv(&[
                    MessageFormat::Authentication,
                    MessageFormat::BackendKeyData,
                    MessageFormat::ReadyForQuery,
                ])
                .await?;

            match message.format {
                MessageFormat::Authentication => match message.decode()? {
                    Authentication::Ok => {
                        // the authentication exchange is successfully
                        // completed; no more information is required
                    }

                    Authentication::CleartextPassword => {
                        conn.send(Password::Cleartext(
                            options.password.as_deref().unwrap_or_default(),
                        ));

                        conn.flush().await?;
                    }

                    Authentication::Md5Password(body) => {
                        conn.send(Password::Md5 {
                            password: options.password.as_deref().unwrap_or_default(),
                            username: &options.username,
                            salt: body.salt,
                        });

                        conn.flush().await?;
                    }

                    Authentication::Other(method) => {
                        return Err(err_protocol!(
                            "unsupported authentication method: {}",
                            method
                        ));
                    }
                },

                MessageFormat::BackendKeyData => {
                    let data: BackendKeyData = message.decode()?;

                    conn.process_id = data.process_id;
                    conn.secret_key = data.secret_key;
                }

                MessageFormat::ReadyForQuery => {
                    // start-up is completed; the frontend can now issue
                    // commands
                    conn.handle_ready_for_query(message)?;

                    break;
                }

                _ => unreachable!(),
            }
        }

        Ok(conn)
    }
}
