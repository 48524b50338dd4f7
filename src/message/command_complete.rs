use bytes::Bytes;

use crate::error::Result;
use crate::io::{BufExt, Decode};

#[derive(Debug)]
pub(crate) struct CommandComplete {
    /// The number of rows affected, parsed from the trailing word of the
    /// command tag. Tags like `CREATE TABLE` carry no count and yield zero.
    pub(crate) affected_rows: u64,
}

impl Decode for CommandComplete {
    fn decode(mut buf: Bytes) -> Result<Self> {
        let rows = buf
            .get_str_nul()?
            .rsplit(' ')
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        Ok(Self {
            affected_rows: rows,
        })
    }
}
