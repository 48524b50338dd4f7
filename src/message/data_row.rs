use bytes::{Buf, Bytes};

use crate::error::Result;
use crate::io::Decode;

/// One row of a simple-query result.
///
/// Values are kept as raw bytes from the wire; with the simple query
/// protocol these are always the text representation. A `None` value is a
/// SQL `NULL`.
#[derive(Debug)]
pub(crate) struct DataRow {
    pub(crate) values: Vec<Option<Bytes>>,
}

impl Decode for DataRow {
    fn decode(mut buf: Bytes) -> Result<Self> {
        let cnt = buf.get_u16() as usize;
        let mut values = Vec::with_capacity(cnt);

        for _ in 0..cnt {
            // The length of the column value, in bytes (this count does not
            // include itself). As a special case, -1 indicates a NULL column
            // value; no value bytes follow in the NULL case.
            let size = buf.get_i32();

            if size == -1 {
                values.push(None);
            } else {
                values.push(Some(buf.split_to(size as usize)));
            }
        }

        Ok(Self { values })
    }
}
