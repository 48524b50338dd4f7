use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::time;

use crate::error::{Error, Result};
use crate::io::{BufStream, Encode};
use crate::message::{
    Message, MessageFormat, ParameterStatus, Response, Terminate, TransactionStatus,
};
use crate::options::PgConnectOptions;

mod describe;
mod establish;
mod executor;
mod resolve;

pub use describe::{Described, ParseError, StatementDescription};
pub use resolve::{ResolvedTypes, ReturnColumn, TypeResolution};

use std::time::Duration;

/// A connection to a PostgreSQL database, used exclusively to introspect
/// queries.
///
/// This type is the protocol sequencer: it owns one physical connection and
/// serializes every send/receive exchange on it. All operations take
/// `&mut self`, so two logical operations can never interleave their replies
/// through the same instance. If a connection needs to be shared, the owner
/// must serialize access externally; this crate provides no locking.
///
/// Once any method has returned [`Error::Protocol`], the connection is
/// desynchronized and must be discarded. There are no retries.
pub struct PgConnection<S = TcpStream>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) stream: BufStream<S>,

    // process id of this backend, from BackendKeyData
    // would be used to send cancel requests; kept for diagnostics
    #[allow(dead_code)]
    pub(crate) process_id: u32,

    #[allow(dead_code)]
    pub(crate) secret_key: u32,

    pub(crate) transaction_status: TransactionStatus,

    // optional hardening; the protocol itself models no timeouts
    recv_timeout: Option<Duration>,
}

impl PgConnection<TcpStream> {
    /// Opens a TCP connection to the configured host and performs the
    /// startup handshake.
    pub async fn connect(options: &PgConnectOptions) -> Result<Self> {
        let stream = TcpStream::connect((&*options.host, options.port)).await?;

        Self::establish(stream, options).await
    }
}

impl<S> PgConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(stream: S, options: &PgConnectOptions) -> Self {
        Self {
            stream: BufStream::new(stream),
            process_id: 0,
            secret_key: 0,
            transaction_status: TransactionStatus::Idle,
            recv_timeout: options.recv_timeout,
        }
    }

    /// Terminates the session and shuts the transport down.
    pub async fn close(mut self) -> Result<()> {
        // The normal, graceful termination procedure is that the frontend
        // sends a Terminate message and immediately closes the connection.
        self.stream.write(Terminate);
        self.stream.flush().await?;
        self.stream.shutdown().await?;

        Ok(())
    }

    // Buffer one outbound message; nothing is put on the wire until `flush`.
    // This is what lets the probe batch Parse+Describe+Close+Flush into a
    // single round trip.
    pub(crate) fn send<T>(&mut self, message: T)
    where
        T: Encode,
    {
        self.stream.write(message);
    }

    pub(crate) async fn flush(&mut self) -> Result<()> {
        self.stream.flush().await
    }

    /// Receive the next backend message, which must be one of `expected`.
    ///
    /// Asynchronous traffic (notices, parameter-status changes) is consumed
    /// and logged without counting against the expectation. Any other
    /// unexpected message kind is a fatal framing error: the connection is
    /// desynchronized and must not be used again.
    pub(crate) async fn recv(&mut self, expected: &[MessageFormat]) -> Result<Message> {
        loop {
            let message = match self.recv_timeout {
                Some(timeout) => time::timeout(timeout, next_message(&mut self.stream))
                    .await
                    .map_err(|_| Error::RecvTimedOut)??,

                None => next_message(&mut self.stream).await?,
            };

            match message.format {
                MessageFormat::NoticeResponse => {
                    let notice: Response = message.decode()?;

                    if notice.severity.is_error() {
                        log::warn!("{} {}", notice.code, notice.message);
                    } else {
                        log::debug!("{} {}", notice.code, notice.message);
                    }
                }

                MessageFormat::ParameterStatus => {
                    let status: ParameterStatus = message.decode()?;

                    log::debug!("parameter {} = {}", status.name, status.value);
                }

                format if expected.contains(&format) => {
                    return Ok(message);
                }

                format => {
                    return Err(err_protocol!(
                        "expecting one of {:?} but received {:?}",
                        expected,
                        format
                    ));
                }
            }
        }
    }

    pub(crate) fn handle_ready_for_query(&mut self, message: Message) -> Result<()> {
        self.transaction_status = message
            .decode::<crate::message::ReadyForQuery>()?
            .transaction_status;

        Ok(())
    }
}

// all packets in postgres start with a 5-byte header containing the
// message format and the total length of the message
async fn next_message<S>(stream: &mut BufStream<S>) -> Result<Message>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    use bytes::Buf;

    let mut header = stream.read(5).await?;

    let format = MessageFormat::try_from_u8(header.get_u8())?;
    let size = (header.get_u32() - 4) as usize;

    let contents = stream.read(size).await?;

    Ok(Message { format, contents })
}

impl<S> std::fmt::Debug for PgConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgConnection").finish()
    }
}
