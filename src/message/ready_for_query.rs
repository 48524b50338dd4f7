use bytes::Bytes;

use crate::error::Result;
use crate::io::Decode;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum TransactionStatus {
    /// Not in a transaction block.
    Idle,

    /// In a transaction block.
    Transaction,

    /// In a _failed_ transaction block. Queries will be rejected until the
    /// block is ended.
    Error,
}

/// `ReadyForQuery` is sent whenever the backend is ready for a new query
/// cycle.
#[derive(Debug)]
pub(crate) struct ReadyForQuery {
    pub(crate) transaction_status: TransactionStatus,
}

impl Decode for ReadyForQuery {
    fn decode(buf: Bytes) -> Result<Self> {
        let transaction_status = match buf[0] {
            b'I' => TransactionStatus::Idle,
            b'T' => TransactionStatus::Transaction,
            b'E' => TransactionStatus::Error,

            status => {
                return Err(err_protocol!(
                    "unknown transaction status: {:?}",
                    status as char
                ));
            }
        };

        Ok(Self { transaction_status })
    }
}
