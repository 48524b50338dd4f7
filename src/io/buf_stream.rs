use std::io;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};
use crate::io::Encode;

// writes are buffered until an explicit `flush`, which is what lets the
// probe batch Parse+Describe+Close+Flush into a single round trip

pub(crate) struct BufStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream: S,

    wbuf: Vec<u8>,

    // we read into the read buffer using 100% safe code
    // `rbuf_len` tracks how many of those bytes are initialized from the wire
    rbuf: BytesMut,
    rbuf_len: usize,
}

impl<S> BufStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(stream: S) -> Self {
        Self {
            stream,
            wbuf: Vec::with_capacity(512),
            rbuf: BytesMut::with_capacity(1024),
            rbuf_len: 0,
        }
    }

    pub(crate) fn write<T>(&mut self, value: T)
    where
        T: Encode,
    {
        value.encode(&mut self.wbuf);
    }

    pub(crate) async fn flush(&mut self) -> Result<()> {
        self.stream.write_all(&self.wbuf).await?;
        self.stream.flush().await?;
        self.wbuf.clear();

        Ok(())
    }

    pub(crate) async fn read(&mut self, cnt: usize) -> Result<Bytes> {
        if self.rbuf.len() < self.rbuf_len + cnt {
            // not enough space remaining in our read buffer; extend it
            self.rbuf.resize(self.rbuf_len + cnt, 0);
        }

        while self.rbuf_len < cnt {
            let n = self.stream.read(&mut self.rbuf[self.rbuf_len..]).await?;

            if n == 0 {
                // a zero read when we had space in the read buffer
                // means the server told us to go away
                return Err(io::Error::from(io::ErrorKind::ConnectionAborted).into());
            }

            self.rbuf_len += n;
        }

        self.rbuf_len -= cnt;

        Ok(self.rbuf.split_to(cnt).freeze())
    }

    pub(crate) async fn shutdown(&mut self) -> Result<()> {
        self.stream.shutdown().await.map_err(Error::from)
    }
}
