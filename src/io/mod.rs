mod buf;
mod buf_stream;

pub(crate) use buf::{BufExt, BufMutExt};
pub(crate) use buf_stream::BufStream;

use crate::error::Result;
use bytes::Bytes;

/// Serialization of a frontend protocol message, including its format prefix
/// and length frame.
pub(crate) trait Encode {
    fn encode(&self, buf: &mut Vec<u8>);
}

/// Deserialization of a backend protocol message body. The format code and
/// length prefix have already been consumed.
pub(crate) trait Decode {
    fn decode(buf: Bytes) -> Result<Self>
    where
        Self: Sized;
}
