use bytes::{Buf, Bytes};

use crate::error::Result;
use crate::io::Decode;

/// Provides cancellation-key data. The frontend must save these values if it
/// wishes to be able to issue CancelRequest messages later.
#[derive(Debug)]
pub(crate) struct BackendKeyData {
    /// The process ID of this backend.
    pub(crate) process_id: u32,

    /// The secret key of this backend.
    pub(crate) secret_key: u32,
}

impl Decode for BackendKeyData {
    fn decode(mut buf: Bytes) -> Result<Self> {
        Ok(Self {
            process_id: buf.get_u32(),
            secret_key: buf.get_u32(),
        })
    }
}
